//! # IO Module
//!
//! Interface layer that exposes the booking domain to clients. The only
//! interface today is the REST API in [`rest`].

pub mod rest;

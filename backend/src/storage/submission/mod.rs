//! Submission service implementations.

pub mod http;
pub mod simulated;

pub use http::HttpSubmissionService;
pub use simulated::SimulatedSubmissionService;

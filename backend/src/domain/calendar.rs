//! Calendar domain logic for the booking flow.
//!
//! This module turns a (year, month) pair into the grid of day cells the date
//! picker shows, and classifies each day as today, past, weekend and
//! available. "Today" comes from the injected [`Clock`], so the same inputs
//! always produce the same grid.

use chrono::{Datelike, Days, NaiveDate};
use log::debug;
use shared::{CalendarMonthView, CurrentDateResponse, DayCell, YearMonth};
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::errors::BookingError;

/// Column headers, Sunday first to match `leading_blanks`
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Calendar service that handles all calendar-related business logic
#[derive(Clone)]
pub struct CalendarService {
    clock: Arc<dyn Clock>,
}

impl CalendarService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Today's date according to the injected clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Build the grid for one month. The grid freezes "today" at this call,
    /// so iterating it repeatedly always yields the same cells.
    pub fn generate_month(&self, year: i32, month: u32) -> Result<MonthGrid, BookingError> {
        YearMonth::new(year, month).ok_or(BookingError::InvalidMonth(month))?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(BookingError::InvalidYear(year))?;

        let grid = MonthGrid {
            first,
            days_in_month: self.days_in_month(month, year),
            leading_blanks: first.weekday().num_days_from_sunday(),
            today: self.today(),
        };

        debug!(
            "🗓️ Generated grid for {}/{}: {} leading blanks, {} days",
            month, year, grid.leading_blanks, grid.days_in_month
        );
        Ok(grid)
    }

    /// Classify a single date against today
    pub fn day_cell(&self, date: NaiveDate) -> DayCell {
        classify_day(date, self.today())
    }

    /// Month grid plus the labels a date picker needs
    pub fn month_view(&self, year: i32, month: u32) -> Result<CalendarMonthView, BookingError> {
        let grid = self.generate_month(year, month)?;
        Ok(CalendarMonthView {
            year,
            month,
            month_name: self.month_name(month).to_string(),
            weekday_labels: WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect(),
            leading_blanks: grid.leading_blanks(),
            days_in_month: grid.days_in_month(),
            cells: grid.iter().collect(),
        })
    }

    /// Get the number of days in a given month and year
    pub fn days_in_month(&self, month: u32, year: i32) -> u32 {
        match month {
            2 => {
                if self.is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Check if a year is a leap year
    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January", 2 => "February", 3 => "March", 4 => "April",
            5 => "May", 6 => "June", 7 => "July", 8 => "August",
            9 => "September", 10 => "October", 11 => "November", 12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Navigate to the previous month. No lower bound besides the year range.
    pub fn previous_month(&self, focus: YearMonth) -> Result<YearMonth, BookingError> {
        focus.previous().ok_or(BookingError::InvalidYear(focus.year))
    }

    /// Navigate to the next month. No upper bound besides the year range.
    pub fn next_month(&self, focus: YearMonth) -> Result<YearMonth, BookingError> {
        focus.next().ok_or(BookingError::InvalidYear(focus.year))
    }

    /// Get current date information
    pub fn get_current_date(&self) -> CurrentDateResponse {
        let today = self.today();
        CurrentDateResponse {
            date: today,
            year: today.year(),
            month: today.month(),
            day: today.day(),
            formatted_date: format!("{} {}, {}", self.month_name(today.month()), today.day(), today.year()),
        }
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

/// e.g. "Monday, June 16, 2025"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn classify_day(date: NaiveDate, today: NaiveDate) -> DayCell {
    let is_past = date < today;
    let is_weekend = date.weekday().num_days_from_monday() >= 5;
    DayCell {
        date,
        is_today: date == today,
        is_past,
        is_weekend,
        available: !is_past && !is_weekend,
    }
}

/// One month laid out Sunday-first. Yields `None` for each leading padding
/// column, then one [`DayCell`] per day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    first: NaiveDate,
    days_in_month: u32,
    leading_blanks: u32,
    today: NaiveDate,
}

impl MonthGrid {
    pub fn leading_blanks(&self) -> u32 {
        self.leading_blanks
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    /// `leading_blanks + days_in_month`
    pub fn len(&self) -> usize {
        (self.leading_blanks + self.days_in_month) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh iterator from the first cell
    pub fn iter(&self) -> MonthCells {
        MonthCells {
            grid: *self,
            position: 0,
        }
    }

    /// Cell for a day of this month (1-based)
    pub fn day(&self, day: u32) -> Option<DayCell> {
        if day == 0 || day > self.days_in_month {
            return None;
        }
        self.first
            .checked_add_days(Days::new(u64::from(day - 1)))
            .map(|date| classify_day(date, self.today))
    }
}

impl IntoIterator for MonthGrid {
    type Item = Option<DayCell>;
    type IntoIter = MonthCells;

    fn into_iter(self) -> MonthCells {
        self.iter()
    }
}

impl IntoIterator for &MonthGrid {
    type Item = Option<DayCell>;
    type IntoIter = MonthCells;

    fn into_iter(self) -> MonthCells {
        self.iter()
    }
}

/// Iterator over a [`MonthGrid`]
#[derive(Debug, Clone)]
pub struct MonthCells {
    grid: MonthGrid,
    position: u32,
}

impl Iterator for MonthCells {
    type Item = Option<DayCell>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position as usize >= self.grid.len() {
            return None;
        }
        let index = self.position;
        self.position += 1;

        if index < self.grid.leading_blanks {
            Some(None)
        } else {
            Some(self.grid.day(index - self.grid.leading_blanks + 1))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len().saturating_sub(self.position as usize);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthCells {}

impl FusedIterator for MonthCells {}

//! Timesheet request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::TimeRange,
};

/// Optional `from`/`to` window (RFC 3339), applied to clock-in times
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl WindowQuery {
    /// Convert to a [`TimeRange`], rejecting windows that end before they start
    pub fn into_range(self) -> AppResult<TimeRange> {
        let range = TimeRange::new(self.from, self.to);
        if range.is_inverted() {
            return Err(AppError::InvalidInput("'from' must not be after 'to'".to_string()));
        }
        Ok(range)
    }
}

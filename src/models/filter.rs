use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{AppError, Result};

/// Inclusive publish-date window passed as `?start=&end=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DateRangeParams {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRangeParams {
    /// Both bounds are required and the window must not be inverted.
    /// Checked before any query executes.
    pub fn validated(self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Ok((start, end)),
            _ => Err(AppError::ValidationError(
                "Start or End has invalid value".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn inverted_range_is_rejected() {
        let now = Utc::now();
        let params = DateRangeParams {
            start: Some(now),
            end: Some(now - Duration::hours(1)),
        };

        assert!(params.validated().is_err());
    }

    #[test]
    fn missing_bound_is_rejected() {
        let params = DateRangeParams {
            start: Some(Utc::now()),
            end: None,
        };

        assert!(params.validated().is_err());
    }

    #[test]
    fn equal_bounds_are_accepted() {
        let now = Utc::now();
        let params = DateRangeParams {
            start: Some(now),
            end: Some(now),
        };

        assert_eq!(params.validated().unwrap(), (now, now));
    }
}

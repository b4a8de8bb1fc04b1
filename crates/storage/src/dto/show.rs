use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{EventStatus, ShowType};

/// Request payload for creating a new show
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateShowRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[validate(custom(function = "validate_show_type"))]
    #[serde(default = "default_show_type")]
    pub show_type: String,
}

/// Request payload for updating an existing show.
///
/// Status follows the calendar; the only status an operator may set is `cancelled`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateShowRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_show_type"))]
    pub show_type: Option<String>,

    #[validate(custom(function = "validate_operator_status"))]
    pub status: Option<String>,
}

fn default_show_type() -> String {
    ShowType::National.as_str().to_string()
}

fn validate_show_type(show_type: &str) -> Result<(), validator::ValidationError> {
    show_type
        .parse::<ShowType>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_show_type"))
}

fn validate_operator_status(status: &str) -> Result<(), validator::ValidationError> {
    match status.parse::<EventStatus>() {
        Ok(EventStatus::Cancelled) => Ok(()),
        _ => Err(validator::ValidationError::new("status_not_settable")
            .with_message("Only 'cancelled' can be set on a show".into())),
    }
}

pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), &'static str> {
    if end < start {
        return Err("End date must be on or after start date");
    }
    Ok(())
}

impl CreateShowRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_dates(&self) -> Result<(), &'static str> {
        check_date_range(self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::day;

    fn create(show_type: &str) -> CreateShowRequest {
        CreateShowRequest {
            name: "Spring Tour".to_string(),
            start_date: day("2026-05-01"),
            end_date: day("2026-05-03"),
            show_type: show_type.to_string(),
        }
    }

    #[test]
    fn test_show_type_must_be_known() {
        assert!(create("international").validate().is_ok());
        assert!(create("regional").validate().is_err());
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut request = create("national");
        request.end_date = day("2026-04-30");
        assert!(request.validate_dates().is_err());
    }

    #[test]
    fn test_only_cancelled_is_settable() {
        let cancel = UpdateShowRequest {
            status: Some("cancelled".to_string()),
            ..Default::default()
        };
        let reopen = UpdateShowRequest {
            status: Some("upcoming".to_string()),
            ..Default::default()
        };

        assert!(cancel.validate().is_ok());
        assert!(reopen.validate().is_err());
    }
}

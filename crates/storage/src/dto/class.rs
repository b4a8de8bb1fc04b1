use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::EventStatus;
use crate::rules::ClassRule;

/// Request payload for creating a class within a show
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateClassRequest {
    pub show_id: Uuid,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Class name must be between 1 and 255 characters"
    ))]
    pub class_name: String,

    #[validate(custom(function = "validate_class_rule"))]
    pub class_rule: String,

    /// Fence height in centimetres
    pub height: Option<Decimal>,

    pub price: Option<Decimal>,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,

    pub class_date: NaiveDate,

    pub start_time: Option<NaiveTime>,

    pub time_allowed: Option<Decimal>,

    pub time_allowed_round2: Option<Decimal>,

    pub optimum_time: Option<Decimal>,

    pub max_points: Option<Decimal>,

    /// Defaults to the rule's main rounds
    #[validate(range(min = 1, max = 3))]
    pub number_of_rounds: Option<i32>,

    pub linked_stream_id: Option<Uuid>,
}

/// Request payload for updating a class.
///
/// `status` may close a class (`completed`) or cancel it; it never returns to `upcoming`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, max = 255))]
    pub class_name: Option<String>,

    #[validate(custom(function = "validate_class_rule"))]
    pub class_rule: Option<String>,

    pub height: Option<Decimal>,

    pub price: Option<Decimal>,

    #[validate(length(equal = 3))]
    pub currency: Option<String>,

    pub class_date: Option<NaiveDate>,

    pub start_time: Option<NaiveTime>,

    pub time_allowed: Option<Decimal>,

    pub time_allowed_round2: Option<Decimal>,

    pub optimum_time: Option<Decimal>,

    pub max_points: Option<Decimal>,

    #[validate(range(min = 1, max = 3))]
    pub number_of_rounds: Option<i32>,

    #[validate(custom(function = "validate_event_status"))]
    pub status: Option<String>,

    pub linked_stream_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ClassFilter {
    pub show_id: Option<Uuid>,
}

fn validate_class_rule(rule: &str) -> Result<(), validator::ValidationError> {
    rule.parse::<ClassRule>().map(|_| ()).map_err(|e| {
        validator::ValidationError::new("invalid_class_rule").with_message(e.to_string().into())
    })
}

fn validate_event_status(status: &str) -> Result<(), validator::ValidationError> {
    status
        .parse::<EventStatus>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_status"))
}

/// Rejects negative times, points and prices.
pub(crate) fn check_quantities(fields: &[(&'static str, Option<Decimal>)]) -> Result<(), String> {
    for (name, value) in fields {
        if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
            return Err(format!("{name} cannot be negative"));
        }
    }
    Ok(())
}

impl CreateClassRequest {
    pub fn validate_quantities(&self) -> Result<(), String> {
        check_quantities(&[
            ("height", self.height),
            ("price", self.price),
            ("time_allowed", self.time_allowed),
            ("time_allowed_round2", self.time_allowed_round2),
            ("optimum_time", self.optimum_time),
            ("max_points", self.max_points),
        ])
    }
}

impl UpdateClassRequest {
    pub fn validate_quantities(&self) -> Result<(), String> {
        check_quantities(&[
            ("height", self.height),
            ("price", self.price),
            ("time_allowed", self.time_allowed),
            ("time_allowed_round2", self.time_allowed_round2),
            ("optimum_time", self.optimum_time),
            ("max_points", self.max_points),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, dec};

    fn create(rule: &str) -> CreateClassRequest {
        CreateClassRequest {
            show_id: Uuid::new_v4(),
            class_name: "Grand Prix".to_string(),
            class_rule: rule.to_string(),
            height: Some(dec("145")),
            price: None,
            currency: None,
            class_date: day("2026-05-03"),
            start_time: None,
            time_allowed: Some(dec("78")),
            time_allowed_round2: None,
            optimum_time: None,
            max_points: None,
            number_of_rounds: None,
            linked_stream_id: None,
        }
    }

    #[test]
    fn test_unknown_rule_fails_validation() {
        assert!(create("two_rounds_with_tiebreaker").validate().is_ok());

        let errors = create("puissance").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("class_rule"));
    }

    #[test]
    fn test_negative_time_allowed_is_rejected() {
        let mut request = create("six_bars");
        request.time_allowed = Some(dec("-1"));
        assert_eq!(
            request.validate_quantities(),
            Err("time_allowed cannot be negative".to_string())
        );
    }
}

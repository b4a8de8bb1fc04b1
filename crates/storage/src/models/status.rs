use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::UnknownVariant;

/// Lifecycle status shared by shows and classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub const NAMES: &'static [&'static str] = &["upcoming", "ongoing", "completed", "cancelled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether an operator may move an entity from `self` to `next`.
    ///
    /// Cancelled is terminal and nothing ever returns to upcoming.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        if *self == next {
            return true;
        }
        match (self, next) {
            (Self::Cancelled, _) => false,
            (_, Self::Upcoming) => false,
            (Self::Completed, Self::Ongoing) => false,
            _ => true,
        }
    }
}

impl FromStr for EventStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(UnknownVariant::new("status", s, Self::NAMES)),
        }
    }
}

impl TryFrom<String> for EventStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShowType {
    National,
    International,
}

impl ShowType {
    pub const NAMES: &'static [&'static str] = &["national", "international"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::National => "national",
            Self::International => "international",
        }
    }
}

impl FromStr for ShowType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "national" => Ok(Self::National),
            "international" => Ok(Self::International),
            _ => Err(UnknownVariant::new("show type", s, Self::NAMES)),
        }
    }
}

impl TryFrom<String> for ShowType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ShowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    Pending,
    Completed,
}

impl ScoreStatus {
    pub const NAMES: &'static [&'static str] = &["pending", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for ScoreStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownVariant::new("score status", s, Self::NAMES)),
        }
    }
}

impl TryFrom<String> for ScoreStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("Ongoing".parse::<EventStatus>().unwrap(), EventStatus::Ongoing);
        assert_eq!(
            EventStatus::try_from("CANCELLED".to_string()).unwrap(),
            EventStatus::Cancelled
        );
        assert!("live".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_nothing_returns_to_upcoming() {
        assert!(!EventStatus::Ongoing.can_transition_to(EventStatus::Upcoming));
        assert!(!EventStatus::Completed.can_transition_to(EventStatus::Upcoming));
        assert!(!EventStatus::Completed.can_transition_to(EventStatus::Ongoing));
        assert!(EventStatus::Ongoing.can_transition_to(EventStatus::Completed));
        assert!(EventStatus::Upcoming.can_transition_to(EventStatus::Cancelled));
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for next in [
            EventStatus::Upcoming,
            EventStatus::Ongoing,
            EventStatus::Completed,
        ] {
            assert!(!EventStatus::Cancelled.can_transition_to(next));
        }
        assert!(EventStatus::Cancelled.can_transition_to(EventStatus::Cancelled));
    }

    #[test]
    fn test_unknown_variant_lists_expected_values() {
        let err = "regional".parse::<ShowType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown show type 'regional'. Expected one of: national, international"
        );
    }
}

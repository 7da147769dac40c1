// Path: crates/client/src/intents/draft.rs
//! Proposal form input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const TITLE_MIN: usize = 5;
const TITLE_MAX: usize = 100;
const DESCRIPTION_MIN: usize = 20;
const DESCRIPTION_MAX: usize = 1000;

/// The unit a proposal duration is entered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    #[default]
    Hours,
    Days,
}

impl DurationUnit {
    pub fn to_minutes(self, duration: u64) -> u64 {
        let factor = match self {
            Self::Minutes => 1,
            Self::Hours => 60,
            Self::Days => 60 * 24,
        };
        duration.saturating_mul(factor)
    }

    /// Longest accepted duration in this unit (30 days in every unit).
    pub fn max_duration(self) -> u64 {
        match self {
            Self::Minutes => 43_200,
            Self::Hours => 720,
            Self::Days => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationUnit {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            other => Err(DraftError::UnknownUnit(other.to_string())),
        }
    }
}

/// Converts a duration entered in `unit` to the minutes the contract takes.
pub fn to_minutes(duration: u64, unit: DurationUnit) -> u64 {
    unit.to_minutes(duration)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Title must be at least 5 characters")]
    TitleTooShort,
    #[error("Title must be less than 100 characters")]
    TitleTooLong,
    #[error("Description must be at least 20 characters")]
    DescriptionTooShort,
    #[error("Description must be less than 1000 characters")]
    DescriptionTooLong,
    #[error("Category is required")]
    MissingCategory,
    #[error("Duration must be at least 1")]
    DurationTooShort,
    #[error("Duration cannot exceed {max} {unit}")]
    DurationTooLong { max: u64, unit: DurationUnit },
    #[error("Unknown duration unit '{0}'")]
    UnknownUnit(String),
}

/// The fields of the create-proposal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDraft {
    pub title: String,
    pub description: String,
    pub duration: u64,
    pub duration_unit: DurationUnit,
    pub category: String,
}

impl Default for ProposalDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            duration: 24,
            duration_unit: DurationUnit::Hours,
            category: "Governance".to_string(),
        }
    }
}

impl ProposalDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        let title_len = self.title.chars().count();
        if title_len < TITLE_MIN {
            return Err(DraftError::TitleTooShort);
        }
        if title_len > TITLE_MAX {
            return Err(DraftError::TitleTooLong);
        }
        let description_len = self.description.chars().count();
        if description_len < DESCRIPTION_MIN {
            return Err(DraftError::DescriptionTooShort);
        }
        if description_len > DESCRIPTION_MAX {
            return Err(DraftError::DescriptionTooLong);
        }
        if self.category.trim().is_empty() {
            return Err(DraftError::MissingCategory);
        }
        if self.duration < 1 {
            return Err(DraftError::DurationTooShort);
        }
        let max = self.duration_unit.max_duration();
        if self.duration > max {
            return Err(DraftError::DurationTooLong {
                max,
                unit: self.duration_unit,
            });
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> u64 {
        self.duration_unit.to_minutes(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProposalDraft {
        ProposalDraft {
            title: "Fund the audit".into(),
            description: "Pay for an external audit of the v2 contracts".into(),
            ..ProposalDraft::default()
        }
    }

    #[test]
    fn converts_units_to_minutes() {
        assert_eq!(to_minutes(2, DurationUnit::Hours), 120);
        assert_eq!(to_minutes(45, DurationUnit::Minutes), 45);
        assert_eq!(to_minutes(3, DurationUnit::Days), 4320);
    }

    #[test]
    fn parses_unit_names() {
        assert_eq!("hours".parse::<DurationUnit>(), Ok(DurationUnit::Hours));
        assert_eq!(" Days ".parse::<DurationUnit>(), Ok(DurationUnit::Days));
        assert_eq!(
            "weeks".parse::<DurationUnit>(),
            Err(DraftError::UnknownUnit("weeks".into()))
        );
    }

    #[test]
    fn default_form_values_validate_once_filled() {
        assert_eq!(draft().validate(), Ok(()));
        assert_eq!(draft().duration_minutes(), 24 * 60);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let mut d = draft();
        d.title = "Hey".into();
        assert_eq!(d.validate(), Err(DraftError::TitleTooShort));

        let mut d = draft();
        d.description = "x".repeat(1001);
        assert_eq!(d.validate(), Err(DraftError::DescriptionTooLong));

        let mut d = draft();
        d.category = "  ".into();
        assert_eq!(d.validate(), Err(DraftError::MissingCategory));

        let mut d = draft();
        d.duration = 0;
        assert_eq!(d.validate(), Err(DraftError::DurationTooShort));
    }

    #[test]
    fn duration_cap_depends_on_unit() {
        let mut d = draft();
        d.duration_unit = DurationUnit::Days;
        d.duration = 30;
        assert_eq!(d.validate(), Ok(()));
        d.duration = 31;
        assert_eq!(
            d.validate(),
            Err(DraftError::DurationTooLong {
                max: 30,
                unit: DurationUnit::Days
            })
        );

        d.duration_unit = DurationUnit::Minutes;
        d.duration = 43_200;
        assert_eq!(d.validate(), Ok(()));
    }
}

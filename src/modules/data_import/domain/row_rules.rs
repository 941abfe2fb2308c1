/// Validation rules for a single spreadsheet row.
///
/// Id, name and date checks are independent and all run. The duplicate check
/// only runs on a row the other three accepted, and is the only rule that
/// touches the record store.
use super::raw_row::{RawRow, DATE_COLUMN, ID_COLUMN, NAME_COLUMN};
use crate::modules::records::domain::RecordRepository;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::validation::{ValidationResult, ValidationRule};
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::Arc;

/// Values parsed by the rules, kept so nothing is parsed twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedField {
    ExternalId(i64),
    Name(String),
    Date(NaiveDate),
}

pub type RowResult = ValidationResult<ParsedField>;

/// `id` must be a non-empty run of ASCII digits
pub struct IdRule;

#[async_trait]
impl ValidationRule<RawRow, ParsedField> for IdRule {
    async fn validate(&self, row: &RawRow, _so_far: &RowResult) -> AppResult<RowResult> {
        let raw = row.get(ID_COLUMN).unwrap_or("");

        let digits_only = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());
        // Digit strings past i64::MAX cannot be stored
        match raw.parse::<i64>() {
            Ok(id) if digits_only => {
                Ok(ValidationResult::valid_with(ParsedField::ExternalId(id)))
            }
            _ => Ok(ValidationResult::invalid(format!("invalid id {}", raw))),
        }
    }

    fn rule_name(&self) -> &'static str {
        "IdRule"
    }
}

/// `name`, once trimmed, must consist of Latin letters and spaces
pub struct NameRule {
    pattern: Regex,
}

impl NameRule {
    pub fn new() -> AppResult<Self> {
        let pattern = Regex::new(r"^[A-Za-z ]+$")
            .map_err(|e| AppError::InternalError(format!("Invalid name pattern: {}", e)))?;
        Ok(Self { pattern })
    }
}

#[async_trait]
impl ValidationRule<RawRow, ParsedField> for NameRule {
    async fn validate(&self, row: &RawRow, _so_far: &RowResult) -> AppResult<RowResult> {
        let raw = row.get(NAME_COLUMN).unwrap_or("");

        if self.pattern.is_match(raw.trim()) {
            // Stored as written, surrounding spaces included
            Ok(ValidationResult::valid_with(ParsedField::Name(raw.to_string())))
        } else {
            Ok(ValidationResult::invalid(format!("invalid name {}", raw)))
        }
    }

    fn rule_name(&self) -> &'static str {
        "NameRule"
    }
}

/// `date` must be a real calendar date written as `d.m.Y`
pub struct DateRule {
    pattern: Regex,
}

impl DateRule {
    pub fn new() -> AppResult<Self> {
        let pattern = Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{1,4})$")
            .map_err(|e| AppError::InternalError(format!("Invalid date pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    fn split(&self, raw: &str) -> Option<(u32, u32, i32)> {
        let caps = self.pattern.captures(raw)?;
        let day = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let year = caps.get(3)?.as_str().parse().ok()?;
        Some((day, month, year))
    }
}

#[async_trait]
impl ValidationRule<RawRow, ParsedField> for DateRule {
    async fn validate(&self, row: &RawRow, _so_far: &RowResult) -> AppResult<RowResult> {
        let raw = match row.get(DATE_COLUMN) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(ValidationResult::invalid("empty date".to_string())),
        };

        let Some((day, month, year)) = self.split(raw) else {
            return Ok(ValidationResult::invalid(format!(
                "invalid date format {}",
                raw
            )));
        };

        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => Ok(ValidationResult::valid_with(ParsedField::Date(date))),
            None => Ok(ValidationResult::invalid(format!("nonexistent date {}", raw))),
        }
    }

    fn rule_name(&self) -> &'static str {
        "DateRule"
    }
}

/// Rejects ids already present in the record store
pub struct DuplicateIdRule {
    record_repo: Arc<dyn RecordRepository>,
}

impl DuplicateIdRule {
    pub fn new(record_repo: Arc<dyn RecordRepository>) -> Self {
        Self { record_repo }
    }
}

#[async_trait]
impl ValidationRule<RawRow, ParsedField> for DuplicateIdRule {
    async fn validate(&self, row: &RawRow, so_far: &RowResult) -> AppResult<RowResult> {
        let external_id = so_far.values.iter().find_map(|field| match field {
            ParsedField::ExternalId(id) => Some(*id),
            _ => None,
        });

        let Some(external_id) = external_id else {
            return Ok(ValidationResult::valid());
        };

        if self.record_repo.exists(external_id).await? {
            let raw = row.get(ID_COLUMN).unwrap_or("");
            Ok(ValidationResult::invalid(format!("duplicate id {}", raw)))
        } else {
            Ok(ValidationResult::valid())
        }
    }

    fn rule_name(&self) -> &'static str {
        "DuplicateIdRule"
    }

    fn should_skip(&self, _row: &RawRow, so_far: &RowResult) -> bool {
        !so_far.is_valid()
    }
}

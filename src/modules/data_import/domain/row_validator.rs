use super::ledger::ValidationErrors;
use super::raw_row::RawRow;
use super::row_rules::{DateRule, DuplicateIdRule, IdRule, NameRule, ParsedField};
use crate::modules::records::domain::{NormalizedRow, RecordRepository};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::validation::ValidationChain;
use std::sync::Arc;

/// Turns a raw row into a [`NormalizedRow`] or the full list of what is wrong with it.
///
/// The outer `AppResult` only fails when the record store cannot be queried.
#[derive(Clone)]
pub struct RowValidator {
    chain: ValidationChain<RawRow, ParsedField>,
}

impl RowValidator {
    pub fn new(record_repo: Arc<dyn RecordRepository>) -> AppResult<Self> {
        let chain = ValidationChain::new()
            .add_rule(Arc::new(IdRule))
            .add_rule(Arc::new(NameRule::new()?))
            .add_rule(Arc::new(DateRule::new()?))
            .add_rule(Arc::new(DuplicateIdRule::new(record_repo)));

        Ok(Self { chain })
    }

    pub async fn validate(
        &self,
        row: &RawRow,
        line: u64,
    ) -> AppResult<Result<NormalizedRow, ValidationErrors>> {
        let result = self.chain.validate(row).await?;

        if !result.is_valid() {
            return Ok(Err(ValidationErrors::new(line, result.errors)));
        }

        let mut external_id = None;
        let mut name = None;
        let mut date = None;
        for field in result.values {
            match field {
                ParsedField::ExternalId(id) => external_id = Some(id),
                ParsedField::Name(value) => name = Some(value),
                ParsedField::Date(value) => date = Some(value),
            }
        }

        match (external_id, name, date) {
            (Some(external_id), Some(name), Some(date)) => {
                Ok(Ok(NormalizedRow::new(external_id, name, date)))
            }
            _ => Err(AppError::InternalError(format!(
                "Line {} passed validation without every field parsed",
                line
            ))),
        }
    }
}

pub mod ledger;
pub mod raw_row;
pub mod row_rules;
pub mod row_validator;

// Re-exports for easy access
pub use ledger::{ErrorLedger, ValidationErrors};
pub use raw_row::{normalize_header, RawRow};
pub use row_rules::ParsedField;
pub use row_validator::RowValidator;

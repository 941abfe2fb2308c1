use crate::shared::errors::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of one or more validation rules.
///
/// `errors` keeps the order rules reported them in. `values` carries whatever the
/// rules parsed on the way, so later consumers never have to parse a field twice.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult<V> {
    pub errors: Vec<String>,
    pub values: Vec<V>,
}

impl<V> ValidationResult<V> {
    pub fn valid() -> Self {
        Self {
            errors: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn valid_with(value: V) -> Self {
        Self {
            errors: Vec::new(),
            values: vec![value],
        }
    }

    pub fn invalid(error: String) -> Self {
        Self {
            errors: vec![error],
            values: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Merge two validation results
    pub fn merge(mut self, other: ValidationResult<V>) -> Self {
        self.errors.extend(other.errors);
        self.values.extend(other.values);
        self
    }
}

/// A single check in a [`ValidationChain`].
///
/// Rules see the context being validated and, read-only, everything the earlier
/// rules in the chain produced.
#[async_trait]
pub trait ValidationRule<C, V>: Send + Sync
where
    C: Sync,
    V: Send + Sync,
{
    /// Execute this validation rule
    async fn validate(
        &self,
        context: &C,
        so_far: &ValidationResult<V>,
    ) -> AppResult<ValidationResult<V>>;

    /// Get the name of this validation rule for logging
    fn rule_name(&self) -> &'static str;

    /// Check if this rule should be skipped
    fn should_skip(&self, _context: &C, _so_far: &ValidationResult<V>) -> bool {
        false
    }
}

/// Ordered list of rules; every rule runs unless it opts out.
pub struct ValidationChain<C, V> {
    rules: Vec<Arc<dyn ValidationRule<C, V>>>,
}

impl<C, V> Clone for ValidationChain<C, V> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<C, V> ValidationChain<C, V>
where
    C: Sync,
    V: Send + Sync,
{
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a validation rule to the chain
    pub fn add_rule(mut self, rule: Arc<dyn ValidationRule<C, V>>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Execute all validation rules in the chain
    ///
    /// Rule failures land in the returned result. An `Err` means a rule could not
    /// run at all (e.g. its backing store was unreachable).
    pub async fn validate(&self, context: &C) -> AppResult<ValidationResult<V>> {
        let mut combined_result = ValidationResult::valid();

        for rule in &self.rules {
            if rule.should_skip(context, &combined_result) {
                continue;
            }

            let rule_result = rule.validate(context, &combined_result).await?;

            if !rule_result.is_valid() {
                log::debug!(
                    "Validation rule '{}' failed: {}",
                    rule.rule_name(),
                    rule_result.errors.join(", ")
                );
            }

            combined_result = combined_result.merge(rule_result);
        }

        Ok(combined_result)
    }
}

impl<C, V> Default for ValidationChain<C, V>
where
    C: Sync,
    V: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

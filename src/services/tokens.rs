//! Token record service: CRUD, derived-field computation, bulk operations.

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::token::{BulkOperation, ComputedAmounts, Token, TokenFilter, TokenInput},
    repository::Repository,
};

/// Coerce a raw JSON amount to f64. Strings are trimmed and parsed; absent,
/// null, and non-numeric values are coercion failures.
fn coerce_amount(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render an amount the way the dashboard stores it: integral values without
/// a trailing `.0`, fractions as-is.
fn format_amount(value: f64) -> String {
    format!("{}", value)
}

/// Derived-field calculator.
///
/// If ANY of the three inputs fails coercion, all three reset to zero; the
/// failure is absorbed here and never surfaced to the caller. Runs
/// identically on create and update.
pub fn compute_amounts(
    charges: Option<&Value>,
    payment_received: Option<&Value>,
    charges_to_executive: Option<&Value>,
) -> ComputedAmounts {
    let (charges, payment_received, charges_to_executive) = match (
        coerce_amount(charges),
        coerce_amount(payment_received),
        coerce_amount(charges_to_executive),
    ) {
        (Some(c), Some(p), Some(x)) => (c, p, x),
        _ => (0.0, 0.0, 0.0),
    };

    ComputedAmounts {
        amount_due: format_amount(charges - payment_received),
        margin: format_amount(charges - charges_to_executive),
        charges: format_amount(charges),
        payment_received: format_amount(payment_received),
        charges_to_executive: format_amount(charges_to_executive),
    }
}

#[derive(Clone)]
pub struct TokenService {
    repository: Repository,
}

impl TokenService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, filter: &TokenFilter) -> AppResult<Vec<Token>> {
        self.repository.tokens.list(filter).await
    }

    pub async fn create(&self, input: &TokenInput) -> AppResult<i64> {
        let amounts = compute_amounts(
            input.charges.as_ref(),
            input.payment_received.as_ref(),
            input.charges_to_executive.as_ref(),
        );
        let id = self.repository.tokens.create(input, &amounts).await?;
        tracing::info!("Created token {}", id);
        Ok(id)
    }

    pub async fn update(&self, id: i64, input: &TokenInput) -> AppResult<()> {
        let amounts = compute_amounts(
            input.charges.as_ref(),
            input.payment_received.as_ref(),
            input.charges_to_executive.as_ref(),
        );
        self.repository.tokens.update(id, input, &amounts).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.tokens.delete(id).await
    }

    pub async fn agents(&self) -> AppResult<Vec<String>> {
        self.repository.tokens.distinct_agents().await
    }

    pub async fn executives(&self) -> AppResult<Vec<String>> {
        self.repository.tokens.distinct_executives().await
    }

    /// Apply one bulk operation to every id. Returns the number of ids
    /// submitted, matching the original service's `processed` count.
    pub async fn bulk_apply(&self, operation: &str, ids: &[i64]) -> AppResult<usize> {
        if operation.is_empty() || ids.is_empty() {
            return Err(AppError::BadRequest(
                "Operation and IDs required".to_string(),
            ));
        }

        let operation: BulkOperation = operation.parse().map_err(|_| {
            AppError::BadRequest(format!("Unknown operation: {}", operation))
        })?;

        let affected = match operation {
            BulkOperation::ApplyAgentPayment => {
                self.repository.tokens.apply_agent_payment(ids).await?
            }
            BulkOperation::ApplyExecutivePayment => {
                self.repository.tokens.apply_executive_payment(ids).await?
            }
            BulkOperation::MarkCompleted => {
                // One date for the whole batch, computed once per request.
                let today = chrono::Local::now().date_naive();
                self.repository.tokens.mark_completed(ids, today).await?
            }
        };

        tracing::info!(
            "Bulk {:?}: {} ids submitted, {} rows updated",
            operation,
            ids.len(),
            affected
        );
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amounts_derive_from_valid_inputs() {
        let amounts = compute_amounts(
            Some(&json!("100")),
            Some(&json!(40)),
            Some(&json!("25.5")),
        );
        assert_eq!(amounts.charges, "100");
        assert_eq!(amounts.payment_received, "40");
        assert_eq!(amounts.amount_due, "60");
        assert_eq!(amounts.charges_to_executive, "25.5");
        assert_eq!(amounts.margin, "74.5");
    }

    #[test]
    fn any_bad_input_zeroes_all_three() {
        let amounts = compute_amounts(
            Some(&json!("100")),
            Some(&json!("not-a-number")),
            Some(&json!("25")),
        );
        assert_eq!(amounts.charges, "0");
        assert_eq!(amounts.payment_received, "0");
        assert_eq!(amounts.charges_to_executive, "0");
        assert_eq!(amounts.amount_due, "0");
        assert_eq!(amounts.margin, "0");
    }

    #[test]
    fn missing_and_null_inputs_zero_all_three() {
        let amounts = compute_amounts(Some(&json!("100")), None, Some(&json!("25")));
        assert_eq!(amounts.amount_due, "0");
        assert_eq!(amounts.margin, "0");

        let amounts = compute_amounts(
            Some(&json!("100")),
            Some(&Value::Null),
            Some(&json!("25")),
        );
        assert_eq!(amounts.charges, "0");
    }

    #[test]
    fn integral_amounts_render_without_decimal_point() {
        let amounts = compute_amounts(
            Some(&json!("100.0")),
            Some(&json!("100.0")),
            Some(&json!("0")),
        );
        assert_eq!(amounts.charges, "100");
        assert_eq!(amounts.amount_due, "0");
        assert_eq!(amounts.margin, "100");
    }

    #[test]
    fn string_amounts_are_trimmed() {
        let amounts = compute_amounts(
            Some(&json!(" 50 ")),
            Some(&json!("10")),
            Some(&json!("5")),
        );
        assert_eq!(amounts.amount_due, "40");
        assert_eq!(amounts.margin, "45");
    }
}

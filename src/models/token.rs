//! Token record model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::wire;

/// Completion status of a token.
///
/// The original table stored this as free text, which let typos fragment the
/// report queries. It is now a closed set validated on write; the wire labels
/// are unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TokenStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "Not Completed")]
    NotCompleted,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Pending => "Pending",
            TokenStatus::InProgress => "In Progress",
            TokenStatus::Completed => "Completed",
            TokenStatus::NotCompleted => "Not Completed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown token status: '{0}'")]
pub struct ParseStatusError(String);

impl std::str::FromStr for TokenStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TokenStatus::Pending),
            "In Progress" => Ok(TokenStatus::InProgress),
            "Completed" => Ok(TokenStatus::Completed),
            "Not Completed" => Ok(TokenStatus::NotCompleted),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl std::fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored as TEXT in the status column; delegate to the string codecs.

impl sqlx::Type<sqlx::Postgres> for TokenStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for TokenStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TokenStatus {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

/// A token record as stored (field order matches the table definition).
///
/// Dates serialize as `DD-MM-YYYY`, the payment flags as `"yes"`/`"no"`, so
/// the JSON shape is identical to what the dashboard has always consumed.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Token {
    pub id: i64,
    #[serde(with = "wire::date_ddmmyyyy")]
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub sub_location: Option<String>,
    pub token: Option<String>,
    pub password: Option<String>,
    pub client_name: Option<String>,
    pub contact: Option<String>,
    pub who_will_ship: Option<String>,
    pub contacted_client: Option<String>,
    #[serde(with = "wire::opt_status")]
    #[schema(value_type = Option<String>)]
    pub status: Option<TokenStatus>,
    pub forwarded: Option<String>,
    pub charges: Option<String>,
    pub payment_received: Option<String>,
    pub amount_due: Option<String>,
    pub agent_name: Option<String>,
    pub executive_name: Option<String>,
    pub charges_to_executive: Option<String>,
    pub margin: Option<String>,
    pub process_by: Option<String>,
    #[serde(with = "wire::date_ddmmyyyy")]
    #[schema(value_type = Option<String>)]
    pub completion_date: Option<NaiveDate>,
    #[serde(with = "wire::yes_no")]
    #[schema(value_type = String)]
    pub agent_payment_applied: bool,
    #[serde(with = "wire::yes_no")]
    #[schema(value_type = String)]
    pub executive_payment_applied: bool,
}

/// Create/update request body (full field set, everything optional).
///
/// The financial fields arrive as arbitrary JSON (the dashboard sends strings
/// or numbers); coercion happens in the derived-field calculator.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenInput {
    #[serde(default, with = "wire::date_ddmmyyyy")]
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sub_location: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub who_will_ship: Option<String>,
    #[serde(default)]
    pub contacted_client: Option<String>,
    #[serde(default, with = "wire::opt_status")]
    #[schema(value_type = Option<String>)]
    pub status: Option<TokenStatus>,
    #[serde(default)]
    pub forwarded: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub charges: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub payment_received: Option<serde_json::Value>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub executive_name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub charges_to_executive: Option<serde_json::Value>,
    #[serde(default)]
    pub process_by: Option<String>,
    #[serde(default, with = "wire::date_ddmmyyyy")]
    #[schema(value_type = Option<String>)]
    pub completion_date: Option<NaiveDate>,
}

/// Text renderings of the five financial fields, ready for storage.
///
/// Produced by the derived-field calculator on every create and update;
/// `amount_due` and `margin` are never taken from the request.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedAmounts {
    pub charges: String,
    pub payment_received: String,
    pub amount_due: String,
    pub charges_to_executive: String,
    pub margin: String,
}

/// Optional list filters, straight from the query string.
///
/// Empty strings and the literal `"All"` mean "no filter"; the date range
/// only activates when both bounds are present.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenFilter {
    pub location: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub agent: Option<String>,
    pub executive: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Bulk operation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkRequest {
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// The closed set of bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOperation {
    ApplyAgentPayment,
    ApplyExecutivePayment,
    MarkCompleted,
}

impl std::str::FromStr for BulkOperation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apply_agent_payment" => Ok(BulkOperation::ApplyAgentPayment),
            "apply_executive_payment" => Ok(BulkOperation::ApplyExecutivePayment),
            "mark_completed" => Ok(BulkOperation::MarkCompleted),
            _ => Err(()),
        }
    }
}

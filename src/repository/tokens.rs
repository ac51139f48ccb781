//! Tokens repository for database operations.
//!
//! Filter parameters are assembled into a single parameterized statement;
//! every value travels as a bind, never interpolated into the SQL text.

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::token::{ComputedAmounts, Token, TokenFilter, TokenInput, TokenStatus},
};

/// Which name column a payment report is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOwner {
    Agent,
    Executive,
}

impl ReportOwner {
    fn column(&self) -> &'static str {
        match self {
            ReportOwner::Agent => "agent_name",
            ReportOwner::Executive => "executive_name",
        }
    }

    /// Agent reports list oldest-first, executive reports newest-first.
    /// The dashboard renders them that way; keep the asymmetry.
    fn order(&self) -> &'static str {
        match self {
            ReportOwner::Agent => "ASC",
            ReportOwner::Executive => "DESC",
        }
    }
}

/// Bind argument collected while building a dynamic WHERE clause.
#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Text(String),
    Date(NaiveDate),
}

/// Outcome of interpreting a from/to query-parameter pair.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DateRange {
    /// One or both bounds absent: the range filter stays off.
    Inactive,
    /// Bounds present but unparseable: matches nothing, never errors.
    Invalid,
    Between(NaiveDate, NaiveDate),
}

fn parse_range(from: Option<&str>, to: Option<&str>) -> DateRange {
    let (from, to) = match (non_empty(from), non_empty(to)) {
        (Some(f), Some(t)) => (f, t),
        _ => return DateRange::Inactive,
    };
    match (
        NaiveDate::parse_from_str(from, "%Y-%m-%d"),
        NaiveDate::parse_from_str(to, "%Y-%m-%d"),
    ) {
        (Ok(f), Ok(t)) => DateRange::Between(f, t),
        _ => DateRange::Invalid,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// A parameter is an active filter when present, non-empty and not "All".
fn active(value: &Option<String>) -> Option<&str> {
    non_empty(value.as_deref()).filter(|s| *s != "All")
}

/// Build WHERE conditions and bind arguments for the list query.
fn list_conditions(filter: &TokenFilter) -> (Vec<String>, Vec<Arg>) {
    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if let Some(location) = active(&filter.location) {
        args.push(Arg::Text(location.to_string()));
        conditions.push(format!("LOWER(location) = LOWER(${})", args.len()));
    }

    if let Some(status) = active(&filter.status) {
        args.push(Arg::Text(status.to_string()));
        conditions.push(format!("LOWER(status) = LOWER(${})", args.len()));
    }

    if let Some(needle) = non_empty(filter.search.as_deref()) {
        args.push(Arg::Text(format!("%{}%", needle)));
        let i = args.len();
        conditions.push(format!(
            "(token ILIKE ${i} OR client_name ILIKE ${i} OR contact ILIKE ${i} OR sub_location ILIKE ${i})",
        ));
    }

    if let Some(agent) = active(&filter.agent) {
        args.push(Arg::Text(agent.to_string()));
        conditions.push(format!("agent_name = ${}", args.len()));
    }

    if let Some(executive) = active(&filter.executive) {
        args.push(Arg::Text(executive.to_string()));
        conditions.push(format!("executive_name = ${}", args.len()));
    }

    match parse_range(filter.from_date.as_deref(), filter.to_date.as_deref()) {
        DateRange::Inactive => {}
        DateRange::Invalid => conditions.push("FALSE".to_string()),
        DateRange::Between(from, to) => {
            args.push(Arg::Date(from));
            args.push(Arg::Date(to));
            conditions.push(format!(
                "date BETWEEN ${} AND ${}",
                args.len() - 1,
                args.len()
            ));
        }
    }

    (conditions, args)
}

#[derive(Clone)]
pub struct TokensRepository {
    pool: Pool<Postgres>,
}

impl TokensRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List tokens matching the given filters, most recent date first.
    pub async fn list(&self, filter: &TokenFilter) -> AppResult<Vec<Token>> {
        let (conditions, args) = list_conditions(filter);

        let mut sql = String::from("SELECT * FROM tokens");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY date DESC NULLS LAST, id DESC");

        let mut query = sqlx::query_as::<_, Token>(&sql);
        for arg in &args {
            query = match arg {
                Arg::Text(s) => query.bind(s),
                Arg::Date(d) => query.bind(*d),
            };
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Insert a new token; payment flags start off unapplied.
    pub async fn create(
        &self,
        input: &TokenInput,
        amounts: &ComputedAmounts,
    ) -> AppResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tokens (
                date, location, sub_location, token, password, client_name, contact,
                who_will_ship, contacted_client, status, forwarded, charges,
                payment_received, amount_due, agent_name, executive_name,
                charges_to_executive, margin, process_by, completion_date,
                agent_payment_applied, executive_payment_applied
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, FALSE, FALSE
            )
            RETURNING id
            "#,
        )
        .bind(input.date)
        .bind(&input.location)
        .bind(&input.sub_location)
        .bind(&input.token)
        .bind(&input.password)
        .bind(&input.client_name)
        .bind(&input.contact)
        .bind(&input.who_will_ship)
        .bind(&input.contacted_client)
        .bind(input.status)
        .bind(&input.forwarded)
        .bind(&amounts.charges)
        .bind(&amounts.payment_received)
        .bind(&amounts.amount_due)
        .bind(&input.agent_name)
        .bind(&input.executive_name)
        .bind(&amounts.charges_to_executive)
        .bind(&amounts.margin)
        .bind(&input.process_by)
        .bind(input.completion_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Full-record replace of every non-id, non-flag field.
    pub async fn update(
        &self,
        id: i64,
        input: &TokenInput,
        amounts: &ComputedAmounts,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tokens SET
                date = $1, location = $2, sub_location = $3, token = $4,
                password = $5, client_name = $6, contact = $7, who_will_ship = $8,
                contacted_client = $9, status = $10, forwarded = $11, charges = $12,
                payment_received = $13, amount_due = $14, agent_name = $15,
                executive_name = $16, charges_to_executive = $17, margin = $18,
                process_by = $19, completion_date = $20
            WHERE id = $21
            "#,
        )
        .bind(input.date)
        .bind(&input.location)
        .bind(&input.sub_location)
        .bind(&input.token)
        .bind(&input.password)
        .bind(&input.client_name)
        .bind(&input.contact)
        .bind(&input.who_will_ship)
        .bind(&input.contacted_client)
        .bind(input.status)
        .bind(&input.forwarded)
        .bind(&amounts.charges)
        .bind(&amounts.payment_received)
        .bind(&amounts.amount_due)
        .bind(&input.agent_name)
        .bind(&input.executive_name)
        .bind(&amounts.charges_to_executive)
        .bind(&amounts.margin)
        .bind(&input.process_by)
        .bind(input.completion_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Token {} not found", id)));
        }
        Ok(())
    }

    /// Delete by id; deleting an absent row is a no-op.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Sorted distinct non-empty agent names.
    pub async fn distinct_agents(&self) -> AppResult<Vec<String>> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT DISTINCT agent_name FROM tokens
            WHERE agent_name IS NOT NULL AND agent_name <> ''
            ORDER BY agent_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Sorted distinct non-empty executive names.
    pub async fn distinct_executives(&self) -> AppResult<Vec<String>> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT DISTINCT executive_name FROM tokens
            WHERE executive_name IS NOT NULL AND executive_name <> ''
            ORDER BY executive_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Every token, id ascending (export order).
    pub async fn list_all_by_id(&self) -> AppResult<Vec<Token>> {
        Ok(
            sqlx::query_as::<_, Token>("SELECT * FROM tokens ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Payment report: tokens owned by `name` that carry a completion date,
    /// optionally narrowed by status and completion-date range.
    pub async fn report(
        &self,
        owner: ReportOwner,
        name: &str,
        status: Option<TokenStatus>,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> AppResult<Vec<Token>> {
        let mut conditions = vec![
            format!("{} = $1", owner.column()),
            "completion_date IS NOT NULL".to_string(),
        ];
        let mut idx = 2;

        if status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }

        let mut range = None;
        match parse_range(from_date, to_date) {
            DateRange::Inactive => {}
            DateRange::Invalid => conditions.push("FALSE".to_string()),
            DateRange::Between(from, to) => {
                conditions.push(format!("completion_date BETWEEN ${} AND ${}", idx, idx + 1));
                range = Some((from, to));
            }
        }

        let sql = format!(
            "SELECT * FROM tokens WHERE {} ORDER BY completion_date {}",
            conditions.join(" AND "),
            owner.order()
        );

        let mut query = sqlx::query_as::<_, Token>(&sql).bind(name);
        if let Some(status) = status {
            query = query.bind(status);
        }
        if let Some((from, to)) = range {
            query = query.bind(from).bind(to);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Mark agent payment received: the row's own charges become the payment,
    /// leaving nothing due. Single statement, so the batch is atomic.
    pub async fn apply_agent_payment(&self, ids: &[i64]) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tokens
            SET agent_payment_applied = TRUE,
                payment_received = charges,
                amount_due = '0'
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark executive payment: charges pass through to the executive in full,
    /// leaving no margin.
    pub async fn apply_executive_payment(&self, ids: &[i64]) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tokens
            SET executive_payment_applied = TRUE,
                charges_to_executive = charges,
                margin = '0'
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark every id completed with the same completion date.
    pub async fn mark_completed(
        &self,
        ids: &[i64],
        completion_date: NaiveDate,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE tokens SET status = $1, completion_date = $2 WHERE id = ANY($3)",
        )
        .bind(TokenStatus::Completed)
        .bind(completion_date)
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(f: impl FnOnce(&mut TokenFilter)) -> TokenFilter {
        let mut filter = TokenFilter::default();
        f(&mut filter);
        filter
    }

    #[test]
    fn no_filters_means_no_conditions() {
        let (conditions, args) = list_conditions(&TokenFilter::default());
        assert!(conditions.is_empty());
        assert!(args.is_empty());
    }

    #[test]
    fn all_and_empty_values_are_ignored() {
        let f = filter(|f| {
            f.location = Some("All".to_string());
            f.status = Some("".to_string());
            f.agent = Some("All".to_string());
            f.search = Some("  ".to_string());
        });
        let (conditions, args) = list_conditions(&f);
        assert!(conditions.is_empty());
        assert!(args.is_empty());
    }

    #[test]
    fn location_and_status_match_case_insensitively() {
        let f = filter(|f| {
            f.location = Some("Mumbai".to_string());
            f.status = Some("Completed".to_string());
        });
        let (conditions, args) = list_conditions(&f);
        assert_eq!(
            conditions,
            vec![
                "LOWER(location) = LOWER($1)".to_string(),
                "LOWER(status) = LOWER($2)".to_string(),
            ]
        );
        assert_eq!(
            args,
            vec![
                Arg::Text("Mumbai".to_string()),
                Arg::Text("Completed".to_string()),
            ]
        );
    }

    #[test]
    fn search_spans_four_columns_with_one_bind() {
        let f = filter(|f| f.search = Some("acme".to_string()));
        let (conditions, args) = list_conditions(&f);
        assert_eq!(args, vec![Arg::Text("%acme%".to_string())]);
        assert_eq!(conditions.len(), 1);
        assert!(conditions[0].contains("token ILIKE $1"));
        assert!(conditions[0].contains("client_name ILIKE $1"));
        assert!(conditions[0].contains("contact ILIKE $1"));
        assert!(conditions[0].contains("sub_location ILIKE $1"));
    }

    #[test]
    fn agent_match_is_exact_and_case_sensitive() {
        let f = filter(|f| f.agent = Some("Ravi".to_string()));
        let (conditions, _) = list_conditions(&f);
        assert_eq!(conditions, vec!["agent_name = $1".to_string()]);
    }

    #[test]
    fn date_range_needs_both_bounds() {
        let f = filter(|f| f.from_date = Some("2024-03-01".to_string()));
        let (conditions, _) = list_conditions(&f);
        assert!(conditions.is_empty());
    }

    #[test]
    fn valid_date_range_becomes_between() {
        let f = filter(|f| {
            f.from_date = Some("2024-03-01".to_string());
            f.to_date = Some("2024-03-31".to_string());
        });
        let (conditions, args) = list_conditions(&f);
        assert_eq!(conditions, vec!["date BETWEEN $1 AND $2".to_string()]);
        assert_eq!(
            args,
            vec![
                Arg::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                Arg::Date(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()),
            ]
        );
    }

    #[test]
    fn malformed_date_range_matches_nothing() {
        let f = filter(|f| {
            f.from_date = Some("01-03-2024".to_string());
            f.to_date = Some("2024-03-31".to_string());
        });
        let (conditions, args) = list_conditions(&f);
        assert_eq!(conditions, vec!["FALSE".to_string()]);
        assert!(args.is_empty());
    }

    #[test]
    fn report_owner_columns_and_order() {
        assert_eq!(ReportOwner::Agent.column(), "agent_name");
        assert_eq!(ReportOwner::Agent.order(), "ASC");
        assert_eq!(ReportOwner::Executive.column(), "executive_name");
        assert_eq!(ReportOwner::Executive.order(), "DESC");
    }
}

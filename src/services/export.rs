//! CSV export of the full token table.

use crate::{
    error::AppResult,
    models::{token::Token, wire},
    repository::Repository,
};

/// Column headers in table order (what the dashboard re-imports).
const COLUMNS: [&str; 23] = [
    "id",
    "date",
    "location",
    "sub_location",
    "token",
    "password",
    "client_name",
    "contact",
    "who_will_ship",
    "contacted_client",
    "status",
    "forwarded",
    "charges",
    "payment_received",
    "amount_due",
    "agent_name",
    "executive_name",
    "charges_to_executive",
    "margin",
    "process_by",
    "completion_date",
    "agent_payment_applied",
    "executive_payment_applied",
];

/// UTF-8 byte-order mark so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Quote a field when it contains a separator, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// One CSV row in wire formats: `DD-MM-YYYY` dates, yes/no flags.
fn render_row(token: &Token) -> Vec<String> {
    let date = token
        .date
        .map(|d| d.format(wire::date_ddmmyyyy::FORMAT).to_string())
        .unwrap_or_default();
    let completion_date = token
        .completion_date
        .map(|d| d.format(wire::date_ddmmyyyy::FORMAT).to_string())
        .unwrap_or_default();
    let status = token.status.map(|s| s.as_str()).unwrap_or("");

    vec![
        token.id.to_string(),
        date,
        opt(&token.location).to_string(),
        opt(&token.sub_location).to_string(),
        opt(&token.token).to_string(),
        opt(&token.password).to_string(),
        opt(&token.client_name).to_string(),
        opt(&token.contact).to_string(),
        opt(&token.who_will_ship).to_string(),
        opt(&token.contacted_client).to_string(),
        status.to_string(),
        opt(&token.forwarded).to_string(),
        opt(&token.charges).to_string(),
        opt(&token.payment_received).to_string(),
        opt(&token.amount_due).to_string(),
        opt(&token.agent_name).to_string(),
        opt(&token.executive_name).to_string(),
        opt(&token.charges_to_executive).to_string(),
        opt(&token.margin).to_string(),
        opt(&token.process_by).to_string(),
        completion_date,
        yes_no(token.agent_payment_applied).to_string(),
        yes_no(token.executive_payment_applied).to_string(),
    ]
}

/// Serialize tokens to CSV bytes: BOM, header row, one row per token.
fn build_csv(tokens: &[Token]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&COLUMNS.join(","));
    out.push_str("\r\n");
    for token in tokens {
        let row: Vec<String> = render_row(token)
            .iter()
            .map(|field| csv_field(field))
            .collect();
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }

    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + out.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(out.as_bytes());
    bytes
}

#[derive(Clone)]
pub struct ExportService {
    repository: Repository,
}

impl ExportService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Export the whole table; returns the timestamped attachment filename
    /// and the CSV body.
    pub async fn export_csv(&self) -> AppResult<(String, Vec<u8>)> {
        let tokens = self.repository.tokens.list_all_by_id().await?;
        let filename = chrono::Local::now()
            .format("tokens_export_%Y%m%d_%H%M%S.csv")
            .to_string();
        tracing::info!("Exporting {} tokens to {}", tokens.len(), filename);
        Ok((filename, build_csv(&tokens)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::token::TokenStatus;

    fn sample_token(id: i64) -> Token {
        Token {
            id,
            date: NaiveDate::from_ymd_opt(2024, 3, 15),
            location: Some("Mumbai".to_string()),
            sub_location: None,
            token: Some("TK-100".to_string()),
            password: None,
            client_name: Some("Acme, Ltd".to_string()),
            contact: None,
            who_will_ship: None,
            contacted_client: None,
            status: Some(TokenStatus::Completed),
            forwarded: None,
            charges: Some("100".to_string()),
            payment_received: Some("40".to_string()),
            amount_due: Some("60".to_string()),
            agent_name: Some("Ravi".to_string()),
            executive_name: None,
            charges_to_executive: Some("25".to_string()),
            margin: Some("75".to_string()),
            process_by: None,
            completion_date: None,
            agent_payment_applied: false,
            executive_payment_applied: true,
        }
    }

    #[test]
    fn csv_starts_with_bom_and_header() {
        let bytes = build_csv(&[]);
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text.lines().next().unwrap(), COLUMNS.join(","));
    }

    #[test]
    fn one_row_per_token() {
        let tokens = vec![sample_token(1), sample_token(2), sample_token(3)];
        let bytes = build_csv(&tokens);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 1 + tokens.len());
    }

    #[test]
    fn row_uses_wire_formats() {
        let bytes = build_csv(&[sample_token(7)]);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("7,15-03-2024,Mumbai,"));
        assert!(row.contains("Completed"));
        assert!(row.ends_with(",no,yes"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let bytes = build_csv(&[sample_token(1)]);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.contains("\"Acme, Ltd\""));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(csv_field(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn header_matches_field_count() {
        assert_eq!(render_row(&sample_token(1)).len(), COLUMNS.len());
    }
}

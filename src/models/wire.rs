//! Serde modules for the legacy dashboard wire formats.
//!
//! The original service stored dates as `DD-MM-YYYY` text and the
//! payment-applied flags as `"yes"`/`"no"` text. Internally these are now
//! `NaiveDate` and `bool`; these modules keep the external JSON identical.

pub mod date_ddmmyyyy {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d-%m-%Y";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts `null`, the empty string, or a `DD-MM-YYYY` date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT).map(Some).map_err(|_| {
                de::Error::custom(format!("invalid date '{}', expected DD-MM-YYYY", s))
            }),
        }
    }
}

pub mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "yes" } else { "no" })
    }

    /// Accepts `"yes"`/`"no"` (any case), a JSON bool, or `null` (= no).
    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum YesNo {
            Bool(bool),
            Text(String),
        }

        Ok(match Option::<YesNo>::deserialize(deserializer)? {
            Some(YesNo::Bool(b)) => b,
            Some(YesNo::Text(s)) => s.trim().eq_ignore_ascii_case("yes"),
            None => false,
        })
    }
}

pub mod opt_status {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::models::token::TokenStatus;

    pub fn serialize<S>(value: &Option<TokenStatus>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(status) => serializer.serialize_str(status.as_str()),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts `null`, the empty string, or one of the known status labels.
    /// Anything else is rejected so typos cannot fragment the reports.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<TokenStatus>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};

    use crate::models::token::TokenStatus;

    #[derive(Serialize, Deserialize)]
    struct DateHolder {
        #[serde(with = "super::date_ddmmyyyy")]
        date: Option<NaiveDate>,
    }

    #[derive(Serialize, Deserialize)]
    struct FlagHolder {
        #[serde(with = "super::yes_no")]
        flag: bool,
    }

    #[derive(Serialize, Deserialize)]
    struct StatusHolder {
        #[serde(with = "super::opt_status")]
        status: Option<TokenStatus>,
    }

    #[test]
    fn date_round_trips_in_ddmmyyyy() {
        let h: DateHolder = serde_json::from_str(r#"{"date": "15-03-2024"}"#).unwrap();
        assert_eq!(h.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(serde_json::to_string(&h).unwrap(), r#"{"date":"15-03-2024"}"#);
    }

    #[test]
    fn empty_and_null_dates_are_none() {
        let h: DateHolder = serde_json::from_str(r#"{"date": ""}"#).unwrap();
        assert_eq!(h.date, None);
        let h: DateHolder = serde_json::from_str(r#"{"date": null}"#).unwrap();
        assert_eq!(h.date, None);
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(serde_json::from_str::<DateHolder>(r#"{"date": "2024-03-15"}"#).is_err());
    }

    #[test]
    fn flags_serialize_as_yes_no() {
        assert_eq!(
            serde_json::to_string(&FlagHolder { flag: true }).unwrap(),
            r#"{"flag":"yes"}"#
        );
        assert_eq!(
            serde_json::to_string(&FlagHolder { flag: false }).unwrap(),
            r#"{"flag":"no"}"#
        );
        let h: FlagHolder = serde_json::from_str(r#"{"flag": "YES"}"#).unwrap();
        assert!(h.flag);
        let h: FlagHolder = serde_json::from_str(r#"{"flag": "maybe"}"#).unwrap();
        assert!(!h.flag);
    }

    #[test]
    fn status_labels_round_trip() {
        let h: StatusHolder = serde_json::from_str(r#"{"status": "Not Completed"}"#).unwrap();
        assert_eq!(h.status, Some(TokenStatus::NotCompleted));
        assert_eq!(
            serde_json::to_string(&h).unwrap(),
            r#"{"status":"Not Completed"}"#
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<StatusHolder>(r#"{"status": "Compelted"}"#).is_err());
    }
}

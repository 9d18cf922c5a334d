use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::election::{Candidate, ElectionId, ElectionState};

/// All elections known to the API, keyed and ordered by ID.
pub type Elections = BTreeMap<ElectionId, ElectionDescription>;

/// An election as reported by the API.
///
/// The API is free to omit or reshape what it doesn't track, so every field
/// decodes leniently: a value that doesn't fit is dropped rather than failing
/// the whole listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionDescription {
    /// Election title.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    /// Election state.
    #[serde(default, deserialize_with = "lenient::state")]
    pub state: ElectionState,
    /// Election start time.
    #[serde(default, alias = "start_time", deserialize_with = "lenient::time")]
    pub start_time: Option<DateTime<Utc>>,
    /// Election end time.
    #[serde(default, alias = "end_time", deserialize_with = "lenient::time")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub budget: Option<f64>,
    /// Candidates standing, in ballot order.
    #[serde(default, deserialize_with = "lenient::entries")]
    pub candidates: Vec<Candidate>,
}

/// Payload of `getAllElections`.
#[derive(Debug, Default, Deserialize)]
pub struct ElectionList {
    #[serde(default, deserialize_with = "lenient::records")]
    pub elections: Option<Elections>,
}

mod lenient {
    use std::collections::BTreeMap;

    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};
    use serde_json::Value;

    use super::{ElectionDescription, Elections};
    use crate::model::common::election::{ElectionId, ElectionState};

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).unwrap_or_default())
    }

    pub fn state<'de, D>(deserializer: D) -> Result<ElectionState, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(ElectionState::deserialize(value).unwrap_or(ElectionState::Unknown))
    }

    /// RFC 3339, or an ISO 8601 timestamp without offset taken as UTC.
    pub fn time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let time = match Value::deserialize(deserializer)? {
            Value::String(text) => DateTime::parse_from_rfc3339(&text)
                .map(|time| time.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    text.parse::<NaiveDateTime>()
                        .ok()
                        .map(|time| Utc.from_utc_datetime(&time))
                }),
            _ => None,
        };
        Ok(time)
    }

    /// Keep the entries of a list that decode, skip the rest.
    pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let entries = match Value::deserialize(deserializer)? {
            Value::Array(entries) => entries,
            _ => return Ok(Vec::new()),
        };
        Ok(entries
            .into_iter()
            .filter_map(|entry| T::deserialize(entry).ok())
            .collect())
    }

    /// Every election record is kept, however little of it makes sense.
    pub fn records<'de, D>(deserializer: D) -> Result<Option<Elections>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = match Option::<BTreeMap<ElectionId, Value>>::deserialize(deserializer)? {
            Some(records) => records,
            None => return Ok(None),
        };
        let elections = records
            .into_iter()
            .map(|(id, record)| {
                let election = ElectionDescription::deserialize(record).unwrap_or_else(|e| {
                    warn!("Election {id} is unreadable, listing it untitled: {e}");
                    ElectionDescription::default()
                });
                (id, election)
            })
            .collect();
        Ok(Some(elections))
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    use chrono::TimeZone;

    impl ElectionDescription {
        pub fn example1() -> Self {
            Self {
                title: "Quidditch Captain".to_string(),
                state: ElectionState::Open,
                start_time: Some(Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()),
                end_time: Some(Utc.with_ymd_and_hms(2026, 10, 31, 0, 0, 0).unwrap()),
                budget: Some(1500.0),
                candidates: vec![Candidate::example1(), Candidate::example2()],
            }
        }

        pub fn example2() -> Self {
            Self {
                title: "Moongolf President".to_string(),
                state: ElectionState::Closed,
                start_time: None,
                end_time: None,
                budget: None,
                candidates: vec![],
            }
        }
    }
}

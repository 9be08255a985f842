//! Outage feed document model.
//!
//! Only the parts of the feed we consume are modelled; every other key is
//! ignored. Missing sections deserialize to empty values so that a partial
//! document still yields a (partial) report.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::slots::HourCodes;
use crate::status::StatusCode;

/// Opaque identifier of one feed revision. Only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First 16 characters, for log lines.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(16) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Group id → hourly codes, for one feed day.
pub type GroupHours = HashMap<String, HourCodes>;

/// The feed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub meta: FeedMeta,
    #[serde(default)]
    pub fact: FeedFact,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedMeta {
    #[serde(default, rename = "contentHash")]
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedFact {
    /// Decimal UNIX timestamp → group id → hour label → code.
    #[serde(default, deserialize_with = "lenient_days")]
    pub data: BTreeMap<String, GroupHours>,
}

/// Decode `fact.data` without letting one malformed entry fail the document.
/// Days and groups that are not objects become empty maps.
fn lenient_days<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, GroupHours>, D::Error> {
    let Value::Object(days) = Value::deserialize(deserializer)? else {
        tracing::warn!("Feed data is not an object, ignoring it");
        return Ok(BTreeMap::new());
    };
    Ok(days
        .into_iter()
        .map(|(key, day)| {
            let groups = group_hours(&key, day);
            (key, groups)
        })
        .collect())
}

fn group_hours(day_key: &str, day: Value) -> GroupHours {
    let Value::Object(groups) = day else {
        tracing::debug!(key = %day_key, "Feed day is not an object, treating as empty");
        return GroupHours::new();
    };
    groups
        .into_iter()
        .map(|(group, hours)| {
            let codes = match hours {
                Value::Object(hours) => hours
                    .into_iter()
                    .map(|(label, code)| {
                        let code = code.as_str().map_or(StatusCode::Unknown, StatusCode::from_feed);
                        (label, code)
                    })
                    .collect(),
                _ => {
                    tracing::debug!(key = %day_key, group = %group, "Group data is not an object, treating as absent");
                    HourCodes::new()
                }
            };
            (group, codes)
        })
        .collect()
}

/// Which of the two published days a schedule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayLabel {
    Today,
    Tomorrow,
}

/// One published day of the feed.
#[derive(Debug, Clone, Copy)]
pub struct FeedDay<'a> {
    pub label: DayLabel,
    /// UNIX timestamp the feed keyed this day by.
    pub timestamp: i64,
    pub groups: &'a GroupHours,
}

impl<'a> FeedDay<'a> {
    /// Hourly codes for `group`, or `None` when the feed has no data for it.
    pub fn group(&self, group: &str) -> Option<&'a HourCodes> {
        self.groups.get(group).filter(|hours| !hours.is_empty())
    }
}

impl FeedDocument {
    /// The feed's revision fingerprint. A missing hash is the empty fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self.meta.content_hash.clone().unwrap_or_default())
    }

    /// Today and tomorrow: the two earliest numeric timestamp keys, in
    /// ascending order. Keys that are not integers are ignored.
    pub fn schedule_days(&self) -> Vec<FeedDay<'_>> {
        let mut days: Vec<(i64, &GroupHours)> = self
            .fact
            .data
            .iter()
            .filter_map(|(key, groups)| match key.trim().parse::<i64>() {
                Ok(ts) => Some((ts, groups)),
                Err(_) => {
                    tracing::debug!(key = %key, "Skipping non-numeric feed day key");
                    None
                }
            })
            .collect();
        days.sort_by_key(|(ts, _)| *ts);

        days.into_iter()
            .zip([DayLabel::Today, DayLabel::Tomorrow])
            .map(|((timestamp, groups), label)| FeedDay {
                label,
                timestamp,
                groups,
            })
            .collect()
    }
}

//! Serde helper functions for query strings and seed records.
//!
//! Query strings arrive with empty values for unset fields, so empty strings
//! are treated as None. Weekdays travel as integers 0..6 with Sunday as 0.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional NaiveDate, treating empty strings as None.
/// Expects format: YYYY-MM-DD
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Deserialize an optional NaiveTime, treating empty strings as None.
/// Accepts formats: HH:MM or HH:MM:SS
pub fn deserialize_optional_time<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Deserialize a comma-separated list of numeric ids ("1,4,7").
/// Missing or empty input yields an empty list.
pub fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    let Some(s) = s else {
        return Ok(Vec::new());
    };

    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>().map_err(serde::de::Error::custom))
        .collect()
}

fn weekday_from_number<E: serde::de::Error>(value: u8) -> Result<Weekday, E> {
    crate::calendar::weekday_from_index(u32::from(value))
        .ok_or_else(|| E::custom(format!("weekday must be 0..6 (Sunday = 0), got {value}")))
}

/// A single weekday as 0..6, Sunday = 0.
pub mod sunday_weekday {
    use super::*;

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(weekday.num_days_from_sunday() as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let value = u8::deserialize(deserializer)?;
        weekday_from_number(value)
    }
}

/// A set of weekdays as a sorted list of 0..6, Sunday = 0.
pub mod sunday_weekdays {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(
        weekdays: &HashSet<Weekday>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut values: Vec<u8> = weekdays
            .iter()
            .map(|day| day.num_days_from_sunday() as u8)
            .collect();
        values.sort_unstable();

        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashSet<Weekday>, D::Error> {
        let values: Vec<u8> = Vec::deserialize(deserializer)?;
        values.into_iter().map(weekday_from_number).collect()
    }
}

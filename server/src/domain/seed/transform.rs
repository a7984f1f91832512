//! Seed record types and their conversion into rows
//!
//! Opening hours look like `Mon, Fri 2:30 pm - 8 pm / Sat - Tues 11 am - 2:15 am`:
//! `/`-separated segments, each a day list followed by a time band.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Deserialize;

use super::error::ImportError;
use crate::data::types::{NewMenuItem, NewTiming, OPENS_BEFORE_MIDNIGHT};

const SECONDS_PER_DAY: i32 = 86_400;
const DAY_PREFIXES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
const TRANSACTION_DATE_FORMAT: &str = "%m/%d/%Y %I:%M %p";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    pub restaurant_name: String,
    pub cash_balance: f64,
    pub opening_hours: String,
    #[serde(default)]
    pub menu: Vec<MenuRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRecord {
    pub dish_name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub cash_balance: f64,
    #[serde(default)]
    pub purchase_history: Vec<PurchaseRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub dish_name: String,
    pub restaurant_name: String,
    pub transaction_amount: f64,
    pub transaction_date: String,
}

impl RestaurantRecord {
    pub fn menu_items(&self) -> Vec<NewMenuItem> {
        self.menu
            .iter()
            .map(|m| NewMenuItem {
                dish_name: m.dish_name.clone(),
                price: m.price,
            })
            .collect()
    }
}

/// Collapse records sharing a name to the last one, keeping first-seen order
pub fn dedup_by_name(records: Vec<RestaurantRecord>) -> Vec<RestaurantRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<RestaurantRecord> = Vec::with_capacity(records.len());
    for record in records {
        match index.get(&record.restaurant_name) {
            Some(&i) => unique[i] = record,
            None => {
                index.insert(record.restaurant_name.clone(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

fn segment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<days>[A-Za-z]+(?:\s*[,-]\s*[A-Za-z]+)*)\s+(?P<open>\d{1,2}(?::\d{2})?\s*[AaPp][Mm])\s*-\s*(?P<close>\d{1,2}(?::\d{2})?\s*[AaPp][Mm])$",
        )
        .expect("Invalid regex")
    })
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<h>\d{1,2})(?::(?P<m>\d{2}))?\s*(?P<ampm>[AaPp][Mm])$")
            .expect("Invalid regex")
    })
}

/// Parse a full opening-hours string into per-day windows
///
/// A band that closes at or before it opens runs past midnight and is split
/// into a window until midnight and a carried-over window on the following
/// day that already counts as open at 00:00:00.
pub fn parse_opening_hours(hours: &str) -> Result<Vec<NewTiming>, ImportError> {
    let mut timings = Vec::new();
    for segment in hours.split('/').map(str::trim).filter(|s| !s.is_empty()) {
        let invalid = || ImportError::OpeningHours {
            segment: segment.to_string(),
        };
        let caps = segment_regex().captures(segment).ok_or_else(invalid)?;
        let days = parse_days(&caps["days"]).ok_or_else(invalid)?;
        let opens = parse_time_of_day(&caps["open"]).ok_or_else(invalid)?;
        let closes = parse_time_of_day(&caps["close"]).ok_or_else(invalid)?;

        for day in days {
            if opens < closes {
                timings.push(NewTiming { day, opens, closes });
            } else {
                timings.push(NewTiming {
                    day,
                    opens,
                    closes: SECONDS_PER_DAY,
                });
                if closes > 0 {
                    timings.push(NewTiming {
                        day: (day + 1) % 7,
                        opens: OPENS_BEFORE_MIDNIGHT,
                        closes,
                    });
                }
            }
        }
    }

    if timings.is_empty() {
        return Err(ImportError::OpeningHours {
            segment: hours.to_string(),
        });
    }
    Ok(timings)
}

/// `Mon`, `Mon, Fri`, `Mon-Thu` or `Sat - Tues, Thu`, wrapping past Sunday
fn parse_days(days: &str) -> Option<Vec<u8>> {
    let mut result = Vec::new();
    for part in days.split(',').map(str::trim) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = day_index(start)?;
                let end = day_index(end)?;
                let span = (end + 7 - start) % 7;
                result.extend((0..=span).map(|offset| (start + offset) % 7));
            }
            None => result.push(day_index(part)?),
        }
    }
    Some(result)
}

fn day_index(name: &str) -> Option<u8> {
    let name = name.trim().to_ascii_lowercase();
    DAY_PREFIXES
        .iter()
        .position(|prefix| name.starts_with(prefix))
        .map(|i| i as u8)
}

/// `11 am`, `2:30 pm`, `12 am` (midnight) to seconds since midnight
fn parse_time_of_day(time: &str) -> Option<i32> {
    let caps = time_regex().captures(time.trim())?;
    let hour: i32 = caps["h"].parse().ok()?;
    let minute: i32 = caps.name("m").map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    if !(1..=12).contains(&hour) || minute >= 60 {
        return None;
    }

    let pm = caps["ampm"].eq_ignore_ascii_case("pm");
    let hour24 = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some(hour24 * 3600 + minute * 60)
}

/// `MM/DD/YYYY hh:mm AM` read as UTC, to unix seconds
pub fn parse_transaction_date(date: &str) -> Result<i64, ImportError> {
    NaiveDateTime::parse_from_str(date.trim(), TRANSACTION_DATE_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|_| ImportError::TransactionDate(date.to_string()))
}

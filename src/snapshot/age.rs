//! Resource age derivation

use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::{Serialize, Serializer};
use std::fmt;

/// Age rendered in whole hours below one day, whole days otherwise.
///
/// Serializes as its display form (`"4h"`, `"31d"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    Hours(i64),
    Days(i64),
}

impl Age {
    pub fn between(created: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let hours = now.signed_duration_since(created).num_hours().max(0);
        if hours < 24 {
            Age::Hours(hours)
        } else {
            Age::Days(hours / 24)
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Hours(h) => write!(f, "{}h", h),
            Age::Days(d) => write!(f, "{}d", d),
        }
    }
}

impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whole days elapsed, floored
pub fn age_in_days(created: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(created).num_days().max(0)
}

/// Convert an API timestamp into a chrono UTC timestamp
pub fn to_utc(time: &Time) -> DateTime<Utc> {
    time.0
}

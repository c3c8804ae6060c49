// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::Days;
use chrono::NaiveDateTime;
use chrono::SubsecRound;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::types::date::Date;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Accepts both millisecond and whole-second precision.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A timestamp without a timezone and millisecond precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(ndt: NaiveDateTime) -> Self {
        Self(ndt.trunc_subsecs(3))
    }

    /// Converts a timestamp into a `NaiveDateTime`.
    pub fn into_inner(self) -> NaiveDateTime {
        self.0
    }

    /// The current timestamp in the user's local time.
    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self(chrono::Local::now().naive_local().trunc_subsecs(3))
    }

    /// The date component of this timestamp.
    pub fn date(self) -> Date {
        Date::new(self.0.date())
    }

    /// Moves this timestamp forward by whole calendar days, keeping the
    /// wall-clock time. Saturates at the largest representable timestamp.
    pub fn add_days(self, days: u32) -> Self {
        match self.0.checked_add_days(Days::new(u64::from(days))) {
            Some(ndt) => Self(ndt),
            None => Self(NaiveDateTime::MAX.trunc_subsecs(3)),
        }
    }

    /// Milliseconds from this timestamp until `later`. Negative when `later`
    /// is in the past.
    pub fn millis_until(self, later: Timestamp) -> i64 {
        (later.0 - self.0).num_milliseconds()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let ndt = NaiveDateTime::parse_from_str(&value, PARSE_FORMAT)
            .map_err(|_| ErrorReport::new(format!("Failed to parse timestamp: '{value}'.")))?;
        Ok(Timestamp::new(ndt))
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> String {
        ts.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ndt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, FORMAT).unwrap()
    }

    #[test]
    fn test_timestamp_to_string() {
        let ts = Timestamp(ndt("2023-10-05T14:30:15.123"));
        assert_eq!(ts.to_string(), "2023-10-05T14:30:15.123");
    }

    #[test]
    fn test_try_from_string() {
        let ts = Timestamp::try_from("2023-10-05T14:30:15.123".to_string()).unwrap();
        assert_eq!(ts.0, ndt("2023-10-05T14:30:15.123"));
    }

    #[test]
    fn test_try_from_string_without_millis() {
        let ts = Timestamp::try_from("2023-10-05T14:30:15".to_string()).unwrap();
        assert_eq!(ts.0, ndt("2023-10-05T14:30:15.000"));
    }

    #[test]
    fn test_try_from_string_truncates_to_millis() {
        let ts = Timestamp::try_from("2023-10-05T14:30:15.123456".to_string()).unwrap();
        assert_eq!(ts.to_string(), "2023-10-05T14:30:15.123");
    }

    #[test]
    fn test_try_from_invalid_string() {
        for s in ["", "yesterday", "2023-10-05", "2023-13-05T14:30:15.123"] {
            assert!(Timestamp::try_from(s.to_string()).is_err());
        }
    }

    #[test]
    fn test_serialize() {
        let ts = Timestamp(ndt("2023-10-05T14:30:15.123"));
        let serialized = serde_json::to_string(&ts).unwrap();
        assert_eq!(serialized, "\"2023-10-05T14:30:15.123\"");
    }

    #[test]
    fn test_deserialize() {
        let ts: Timestamp = serde_json::from_str("\"2023-10-05T14:30:15.123\"").unwrap();
        assert_eq!(ts.0, ndt("2023-10-05T14:30:15.123"));
    }

    #[test]
    fn test_add_days_keeps_wall_clock_time() {
        let ts = Timestamp(ndt("2024-03-09T08:15:00.000"));
        // Crosses the US spring-forward weekend and a month boundary.
        assert_eq!(ts.add_days(1).to_string(), "2024-03-10T08:15:00.000");
        assert_eq!(ts.add_days(23).to_string(), "2024-04-01T08:15:00.000");
        assert_eq!(ts.add_days(0), ts);
    }

    #[test]
    fn test_add_days_saturates() {
        let ts = Timestamp(ndt("2024-01-01T00:00:00.000"));
        let far = ts.add_days(u32::MAX);
        assert!(far > ts);
        assert_eq!(far.add_days(1), far);
    }

    #[test]
    fn test_millis_until() {
        let a = Timestamp(ndt("2024-01-01T00:00:00.000"));
        let b = Timestamp(ndt("2024-01-01T00:00:01.500"));
        assert_eq!(a.millis_until(b), 1500);
        assert_eq!(b.millis_until(a), -1500);
    }
}

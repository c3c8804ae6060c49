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

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::sm2::EaseFactor;
use crate::sm2::INITIAL_EASE;
use crate::sm2::MIN_EASE;
use crate::types::timestamp::Timestamp;

/// Scheduling information for a single card.
///
/// A value of this type is never edited after a review: the state machine
/// in [`crate::sm2`] builds a fresh one every time. A card that has never
/// been reviewed has no `ReviewState` at all; callers pass `None`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ReviewStateRecord")]
pub struct ReviewState {
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: u32,
    /// Multiplier applied to the interval on each success. Never below 1.3.
    pub ease_factor: EaseFactor,
    /// Days between the last review and the next one.
    pub interval: u32,
    /// When the card becomes due.
    pub next_review_at: Timestamp,
    /// When the card was last reviewed.
    pub last_reviewed_at: Option<Timestamp>,
}

impl ReviewState {
    /// The state a never-reviewed card is treated as having: due at `now`.
    pub fn initial(now: Timestamp) -> Self {
        ReviewState {
            repetitions: 0,
            ease_factor: INITIAL_EASE,
            interval: 0,
            next_review_at: now,
            last_reviewed_at: None,
        }
    }

    /// Whether the card has been reviewed at least once.
    pub fn is_reviewed(&self) -> bool {
        self.last_reviewed_at.is_some()
    }

    /// Checks the invariants a stored state must satisfy.
    pub fn validate(&self) -> Fallible<()> {
        if !self.ease_factor.is_finite() {
            return fail(format!("ease factor is not finite: {}", self.ease_factor));
        }
        if self.ease_factor < MIN_EASE {
            return fail(format!(
                "ease factor {} is below the minimum of {MIN_EASE}",
                self.ease_factor
            ));
        }
        if self.is_reviewed() && self.interval == 0 {
            return fail("a reviewed card must have an interval of at least one day");
        }
        Ok(())
    }
}

/// The persisted shape of a [`ReviewState`], before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewStateRecord {
    repetitions: u32,
    ease_factor: EaseFactor,
    interval: u32,
    next_review_at: Timestamp,
    #[serde(default)]
    last_reviewed_at: Option<Timestamp>,
}

impl TryFrom<ReviewStateRecord> for ReviewState {
    type Error = ErrorReport;

    fn try_from(record: ReviewStateRecord) -> Result<Self, Self::Error> {
        let state = ReviewState {
            repetitions: record.repetitions,
            ease_factor: record.ease_factor,
            interval: record.interval,
            next_review_at: record.next_review_at,
            last_reviewed_at: record.last_reviewed_at,
        };
        state.validate()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::Arbitrary;
    use quickcheck::Gen;
    use quickcheck::quickcheck;

    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    impl Arbitrary for Timestamp {
        fn arbitrary(g: &mut Gen) -> Self {
            // Any millisecond within roughly the years 2000 to 2100.
            let base = ts("2000-01-01T00:00:00.000");
            let days = u32::arbitrary(g) % 36_500;
            let millis = i64::from(u32::arbitrary(g) % 86_400_000);
            Timestamp::new(base.add_days(days).into_inner() + chrono::Duration::milliseconds(millis))
        }
    }

    impl Arbitrary for ReviewState {
        fn arbitrary(g: &mut Gen) -> Self {
            let now = Timestamp::arbitrary(g);
            if bool::arbitrary(g) {
                return ReviewState::initial(now);
            }
            let interval = 1 + u32::arbitrary(g) % 10_000;
            // Arbitrary bit patterns, not just round decimals.
            let ease_factor = MIN_EASE + f64::from(u32::arbitrary(g)) / 7_919.0;
            ReviewState {
                repetitions: u32::arbitrary(g) % 1_000,
                ease_factor,
                interval,
                next_review_at: now.add_days(interval),
                last_reviewed_at: Some(now),
            }
        }
    }

    #[test]
    fn test_serialization_format() -> Fallible<()> {
        let state = ReviewState {
            repetitions: 3,
            ease_factor: 2.46,
            interval: 15,
            next_review_at: ts("2024-01-16T09:30:00.000"),
            last_reviewed_at: Some(ts("2024-01-01T09:30:00.000")),
        };
        let json = serde_json::to_string(&state)?;
        assert_eq!(
            json,
            "{\"repetitions\":3,\"easeFactor\":2.46,\"interval\":15,\
             \"nextReviewAt\":\"2024-01-16T09:30:00.000\",\
             \"lastReviewedAt\":\"2024-01-01T09:30:00.000\"}"
        );
        Ok(())
    }

    #[test]
    fn test_initial_state_serializes_null_last_review() -> Fallible<()> {
        let state = ReviewState::initial(ts("2024-01-01T00:00:00.000"));
        let value = serde_json::to_value(state)?;
        assert!(value["lastReviewedAt"].is_null());
        assert_eq!(value["interval"], 0);
        assert_eq!(value["easeFactor"], 2.5);
        Ok(())
    }

    #[test]
    fn test_deserialize_without_last_review() -> Fallible<()> {
        let json = r#"{"repetitions":0,"easeFactor":2.5,"interval":0,"nextReviewAt":"2024-01-01T00:00:00.000"}"#;
        let state: ReviewState = serde_json::from_str(json)?;
        assert_eq!(state, ReviewState::initial(ts("2024-01-01T00:00:00.000")));
        assert!(!state.is_reviewed());
        Ok(())
    }

    #[test]
    fn test_deserialize_rejects_low_ease() {
        let json = r#"{"repetitions":1,"easeFactor":1.2,"interval":1,"nextReviewAt":"2024-01-02T00:00:00.000","lastReviewedAt":"2024-01-01T00:00:00.000"}"#;
        let result: Result<ReviewState, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_reviewed_zero_interval() {
        let json = r#"{"repetitions":1,"easeFactor":2.5,"interval":0,"nextReviewAt":"2024-01-01T00:00:00.000","lastReviewedAt":"2024-01-01T00:00:00.000"}"#;
        let result: Result<ReviewState, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_bad_timestamp() {
        let json = r#"{"repetitions":0,"easeFactor":2.5,"interval":0,"nextReviewAt":"tomorrow"}"#;
        let result: Result<ReviewState, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut state = ReviewState::initial(ts("2024-01-01T00:00:00.000"));
        state.ease_factor = f64::NAN;
        assert!(state.validate().is_err());
    }

    quickcheck! {
        fn prop_json_roundtrip(state: ReviewState) -> bool {
            let json = serde_json::to_string(&state).unwrap();
            let back: ReviewState = serde_json::from_str(&json).unwrap();
            back == state
        }
    }
}

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

//! Read-only questions about when a card is due.
//!
//! A card with no review state has never been seen and is always due.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::date::check_date_format;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn is_due(state: Option<&ReviewState>, now: Timestamp) -> bool {
    match state {
        None => true,
        Some(state) => now >= state.next_review_at,
    }
}

/// Whole days until the card is due, rounded up. Overdue cards report 0.
pub fn days_until_due(state: Option<&ReviewState>, now: Timestamp) -> u64 {
    let Some(state) = state else {
        return 0;
    };
    match u64::try_from(now.millis_until(state.next_review_at)) {
        Ok(millis) => millis.div_ceil(MILLIS_PER_DAY),
        Err(_) => 0,
    }
}

/// How due labels render dates more than a day away.
#[derive(Clone, Debug, PartialEq)]
pub struct DueLabelStyle {
    date_format: String,
}

impl DueLabelStyle {
    /// A style rendering dates with a `strftime` pattern.
    pub fn new(date_format: impl Into<String>) -> Fallible<Self> {
        let date_format = date_format.into();
        check_date_format(&date_format)?;
        Ok(DueLabelStyle { date_format })
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }
}

impl Default for DueLabelStyle {
    fn default() -> Self {
        DueLabelStyle {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// A human-facing label: "Now", "Today", "Tomorrow", or the due date.
pub fn format_due_label(state: Option<&ReviewState>, now: Timestamp) -> String {
    format_due_label_with(state, now, &DueLabelStyle::default())
}

pub fn format_due_label_with(
    state: Option<&ReviewState>,
    now: Timestamp,
    style: &DueLabelStyle,
) -> String {
    let Some(reviewed) = state else {
        return "Now".to_string();
    };
    match days_until_due(state, now) {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => reviewed
            .next_review_at
            .date()
            .format_with(style.date_format()),
    }
}

/// Queue order: never-reviewed cards first, then the most overdue.
fn queue_order(a: Option<&ReviewState>, b: Option<&ReviewState>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.next_review_at.cmp(&b.next_review_at),
    }
}

/// The keys of the due cards, in the order they should be shown. Cards that
/// tie keep their input order.
pub fn due_queue<'a, K>(
    cards: impl IntoIterator<Item = (K, Option<&'a ReviewState>)>,
    now: Timestamp,
) -> Vec<K> {
    let mut due: Vec<(K, Option<&'a ReviewState>)> = cards
        .into_iter()
        .filter(|(_, state)| is_due(*state, now))
        .collect();
    due.sort_by(|(_, a), (_, b)| queue_order(*a, *b));
    due.into_iter().map(|(key, _)| key).collect()
}

/// Counts over a collection of cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueSummary {
    /// All cards.
    pub total: usize,
    /// Cards due now, new ones included.
    pub due: usize,
    /// Cards never reviewed.
    pub new: usize,
}

impl DueSummary {
    pub fn of<'a>(
        states: impl IntoIterator<Item = Option<&'a ReviewState>>,
        now: Timestamp,
    ) -> Self {
        states
            .into_iter()
            .fold(DueSummary::default(), |mut summary, state| {
                summary.total += 1;
                if is_due(state, now) {
                    summary.due += 1;
                }
                if state.is_none() {
                    summary.new += 1;
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm2::Quality;
    use crate::sm2::apply;

    fn ts(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    fn due_at(s: &str) -> ReviewState {
        let next_review_at = ts(s);
        ReviewState {
            repetitions: 1,
            ease_factor: 2.5,
            interval: 1,
            next_review_at,
            last_reviewed_at: Some(ts("2020-01-01T00:00:00.000")),
        }
    }

    #[test]
    fn test_never_reviewed_is_always_due() {
        for now in ["1999-12-31T23:59:59.999", "2024-01-01T00:00:00.000"] {
            assert!(is_due(None, ts(now)));
            assert_eq!(days_until_due(None, ts(now)), 0);
            assert_eq!(format_due_label(None, ts(now)), "Now");
        }
    }

    #[test]
    fn test_due_exactly_at_next_review() {
        let state = due_at("2024-01-10T09:00:00.000");
        assert!(is_due(Some(&state), state.next_review_at));
        assert!(!is_due(Some(&state), ts("2024-01-10T08:59:59.999")));
        assert!(is_due(Some(&state), ts("2024-02-01T00:00:00.000")));
    }

    #[test]
    fn test_days_until_due_rounds_up() {
        let state = due_at("2024-01-10T09:00:00.000");
        let cases = [
            ("2024-01-10T09:00:00.000", 0),
            ("2024-01-10T08:00:00.000", 1),
            ("2024-01-09T09:00:00.000", 1),
            ("2024-01-09T08:59:59.999", 2),
            ("2024-01-01T09:00:00.000", 9),
            ("2024-01-12T00:00:00.000", 0),
        ];
        for (now, expected) in cases {
            assert_eq!(days_until_due(Some(&state), ts(now)), expected, "{now}");
        }
    }

    #[test]
    fn test_labels() {
        let state = due_at("2024-01-10T09:00:00.000");
        assert_eq!(
            format_due_label(Some(&state), ts("2024-01-11T00:00:00.000")),
            "Today"
        );
        assert_eq!(
            format_due_label(Some(&state), ts("2024-01-09T12:00:00.000")),
            "Tomorrow"
        );
        assert_eq!(
            format_due_label(Some(&state), ts("2024-01-01T12:00:00.000")),
            "2024-01-10"
        );
    }

    #[test]
    fn test_label_with_custom_style() -> Fallible<()> {
        let state = due_at("2024-01-10T09:00:00.000");
        let style = DueLabelStyle::new("%d/%m/%Y")?;
        assert_eq!(
            format_due_label_with(Some(&state), ts("2024-01-01T12:00:00.000"), &style),
            "10/01/2024"
        );
        assert!(DueLabelStyle::new("%Q").is_err());
        assert!(DueLabelStyle::new("%H").is_err());
        Ok(())
    }

    #[test]
    fn test_label_after_review() {
        let now = ts("2024-03-01T18:00:00.000");
        let state = apply(None, Quality::Perfect, now);
        assert_eq!(format_due_label(Some(&state), now), "Tomorrow");
        let state = apply(Some(&state), Quality::Perfect, now);
        assert_eq!(format_due_label(Some(&state), now), "2024-03-07");
    }

    #[test]
    fn test_due_queue_order() {
        let now = ts("2024-01-10T12:00:00.000");
        let overdue = due_at("2024-01-01T00:00:00.000");
        let due_today = due_at("2024-01-10T06:00:00.000");
        let later = due_at("2024-01-20T00:00:00.000");
        let cards = vec![
            ("today", Some(&due_today)),
            ("later", Some(&later)),
            ("new-a", None),
            ("overdue", Some(&overdue)),
            ("new-b", None),
        ];
        assert_eq!(
            due_queue(cards, now),
            vec!["new-a", "new-b", "overdue", "today"]
        );
    }

    #[test]
    fn test_summary() {
        let now = ts("2024-01-10T12:00:00.000");
        let overdue = due_at("2024-01-01T00:00:00.000");
        let later = due_at("2024-01-20T00:00:00.000");
        let summary = DueSummary::of([Some(&overdue), Some(&later), None], now);
        assert_eq!(
            summary,
            DueSummary {
                total: 3,
                due: 2,
                new: 1
            }
        );
        assert_eq!(DueSummary::of(std::iter::empty(), now), DueSummary::default());
    }
}

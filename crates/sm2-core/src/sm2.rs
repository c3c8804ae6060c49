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

//! The SM-2 review state machine.
//!
//! Every review updates the ease factor, then either resets the card (a
//! lapse) or grows its interval: one day after the first success, six
//! after the second, and the previous interval times the ease factor from
//! then on.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::InvalidRatingError;
use crate::types::review_state::ReviewState;
use crate::types::timestamp::Timestamp;

pub type EaseFactor = f64;

/// The ease factor of a card that has never been reviewed.
pub const INITIAL_EASE: EaseFactor = 2.5;

/// The ease factor never drops below this.
pub const MIN_EASE: EaseFactor = 1.3;

/// Interval after the first consecutive success, in days.
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second consecutive success, in days.
const SECOND_INTERVAL: u32 = 6;

/// Interval after a lapse, in days.
const LAPSE_INTERVAL: u32 = 1;

/// The learner's self-assessed recall, from 1 (worst) to 5 (best).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
    /// Complete blackout.
    Blackout = 1,
    /// Wrong, but the answer was familiar once shown.
    Recognized = 2,
    /// Correct, with serious difficulty.
    Difficult = 3,
    /// Correct after some hesitation.
    Hesitant = 4,
    /// Perfect recall.
    Perfect = 5,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::Blackout,
        Quality::Recognized,
        Quality::Difficult,
        Quality::Hesitant,
        Quality::Perfect,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Blackout => "blackout",
            Quality::Recognized => "recognized",
            Quality::Difficult => "difficult",
            Quality::Hesitant => "hesitant",
            Quality::Perfect => "perfect",
        }
    }

    /// The wording shown to the learner next to the rating button.
    pub fn label(&self) -> &'static str {
        match self {
            Quality::Blackout => "Not at all",
            Quality::Recognized => "Barely",
            Quality::Difficult => "Somewhat",
            Quality::Hesitant => "Well",
            Quality::Perfect => "Perfectly",
        }
    }

    /// Whether this rating counts as a successful recall.
    pub fn is_pass(self) -> bool {
        self >= Quality::Difficult
    }

    /// The rating on the 0-based scale the ease formula is defined on.
    fn working_scale(self) -> f64 {
        f64::from(self.value() - 1)
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl TryFrom<i64> for Quality {
    type Error = InvalidRatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Quality::Blackout),
            2 => Ok(Quality::Recognized),
            3 => Ok(Quality::Difficult),
            4 => Ok(Quality::Hesitant),
            5 => Ok(Quality::Perfect),
            _ => Err(InvalidRatingError::new(value)),
        }
    }
}

impl TryFrom<u8> for Quality {
    type Error = InvalidRatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::try_from(i64::from(value))
    }
}

impl TryFrom<i32> for Quality {
    type Error = InvalidRatingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Quality::try_from(i64::from(value))
    }
}

/// Numbers coming from JavaScript or JSON may be fractional.
impl TryFrom<f64> for Quality {
    type Error = InvalidRatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 || !(1.0..=5.0).contains(&value) {
            return Err(InvalidRatingError::new(value));
        }
        Quality::try_from(value as i64)
    }
}

/// Accepts the digit (`"4"`) or the name (`"hesitant"`).
impl FromStr for Quality {
    type Err = InvalidRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Quality::try_from(n);
        }
        Quality::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidRatingError::new(s))
    }
}

impl TryFrom<&str> for Quality {
    type Error = InvalidRatingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> u8 {
        q.value()
    }
}

/// The ease factor after a review, floored at [`MIN_EASE`].
pub fn new_ease(prior: EaseFactor, quality: Quality) -> EaseFactor {
    let q = quality.working_scale();
    let d = 5.0 - q;
    f64::max(MIN_EASE, prior + (0.1 - d * (0.08 + d * 0.02)))
}

/// The interval for the `repetitions`-th consecutive success.
fn success_interval(repetitions: u32, prior_interval: u32, ease: EaseFactor) -> u32 {
    match repetitions {
        1 => FIRST_INTERVAL,
        2 => SECOND_INTERVAL,
        // Float-to-int casts saturate, so a runaway interval pins at u32::MAX.
        _ => (f64::from(prior_interval) * ease).round() as u32,
    }
}

/// Applies a review to a card. `None` means the card was never reviewed.
pub fn apply(prior: Option<&ReviewState>, quality: Quality, now: Timestamp) -> ReviewState {
    let prior: ReviewState = prior.copied().unwrap_or_else(|| ReviewState::initial(now));
    let ease_factor: EaseFactor = new_ease(prior.ease_factor, quality);
    let (repetitions, interval): (u32, u32) = if quality.is_pass() {
        let repetitions = prior.repetitions.saturating_add(1);
        (
            repetitions,
            success_interval(repetitions, prior.interval, ease_factor),
        )
    } else {
        (0, LAPSE_INTERVAL)
    };
    ReviewState {
        repetitions,
        ease_factor,
        interval,
        next_review_at: now.add_days(interval),
        last_reviewed_at: Some(now),
    }
}

/// Validates a raw rating and applies it.
///
/// Fails without doing anything when the rating is not an integer in
/// `1..=5`.
pub fn transition<R>(
    prior: Option<&ReviewState>,
    rating: R,
    now: Timestamp,
) -> Result<ReviewState, InvalidRatingError>
where
    Quality: TryFrom<R, Error = InvalidRatingError>,
{
    let quality = Quality::try_from(rating)?;
    Ok(apply(prior, quality, now))
}

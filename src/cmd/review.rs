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

use sm2_core::Quality;
use sm2_core::ReviewState;
use sm2_core::apply;
use sm2_core::format_due_label_with;

use crate::config::Settings;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;

/// Records a review of `card_id` and persists the new state.
///
/// The card id and rating are validated before the store is opened, so
/// invalid input leaves everything as it was.
pub fn review_card(settings: &Settings, card_id: &str, rating: &str) -> Fallible<ReviewState> {
    if card_id.trim().is_empty() {
        return fail(format!("invalid card id: '{card_id}'"));
    }
    let quality: Quality = rating.parse()?;
    let now = settings.now;
    let mut db = Database::new(settings.database_path())?;
    let next: ReviewState = db.update_state(card_id, now, |prior| Ok(apply(prior, quality, now)))?;
    log::debug!(
        "Reviewed {card_id} with {quality}: repetitions={}, ease={:.2}, interval={}",
        next.repetitions,
        next.ease_factor,
        next.interval
    );
    let label = format_due_label_with(Some(&next), now, &settings.label_style);
    println!("Rated {card_id}: {quality} ({}).", quality.label());
    println!("Next review: {label} (in {} day(s)).", next.interval);
    Ok(next)
}

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

//! WASM bindings for sm2cards - schedules reviews in the browser.
//!
//! Review states cross the boundary as JSON strings in their persisted
//! form, and timestamps as `YYYY-MM-DDTHH:MM:SS.mmm` strings.

use wasm_bindgen::prelude::*;
use web_sys::console;

use sm2_core::due::DueSummary;
use sm2_core::due::due_queue;
use sm2_core::sm2::Quality;
use sm2_core::types::review_state::ReviewState;
use sm2_core::types::timestamp::Timestamp;

mod states;
mod storage;

use states::CardStates;
use states::StateMap;
use storage::Storage;

const STATES_KEY: &str = "sm2cards_states";

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"sm2cards WASM initialized".into());
}

// Plain-Rust helpers, so they can be tested off the browser.

fn parse_now(now: &str) -> Result<Timestamp, String> {
    Timestamp::try_from(now.to_string()).map_err(|e| format!("Invalid timestamp: {}", e.message()))
}

fn parse_state(state_json: Option<&str>) -> Result<Option<ReviewState>, String> {
    match state_json {
        None => Ok(None),
        Some(json) => serde_json::from_str(json)
            .map(Some)
            .map_err(|e| format!("Invalid review state: {}", e)),
    }
}

fn parse_card_ids(card_ids_json: &str) -> Result<Vec<String>, String> {
    serde_json::from_str(card_ids_json).map_err(|e| format!("Failed to parse card ids: {}", e))
}

fn review_json(state_json: Option<&str>, rating: f64, now: &str) -> Result<String, String> {
    let prior = parse_state(state_json)?;
    let now = parse_now(now)?;
    let next = sm2_core::transition(prior.as_ref(), rating, now).map_err(|e| e.to_string())?;
    serde_json::to_string(&next).map_err(|e| e.to_string())
}

fn to_js(e: String) -> JsValue {
    JsValue::from_str(&e)
}

/// Applies a review. `state_json` is `null` for a card never reviewed.
/// Returns the new state as JSON.
#[wasm_bindgen]
pub fn transition(state_json: Option<String>, rating: f64, now: &str) -> Result<String, JsValue> {
    review_json(state_json.as_deref(), rating, now).map_err(to_js)
}

#[wasm_bindgen]
pub fn is_due(state_json: Option<String>, now: &str) -> Result<bool, JsValue> {
    let state = parse_state(state_json.as_deref()).map_err(to_js)?;
    let now = parse_now(now).map_err(to_js)?;
    Ok(sm2_core::is_due(state.as_ref(), now))
}

#[wasm_bindgen]
pub fn days_until_due(state_json: Option<String>, now: &str) -> Result<u32, JsValue> {
    let state = parse_state(state_json.as_deref()).map_err(to_js)?;
    let now = parse_now(now).map_err(to_js)?;
    let days = sm2_core::days_until_due(state.as_ref(), now);
    Ok(u32::try_from(days).unwrap_or(u32::MAX))
}

#[wasm_bindgen]
pub fn format_due_label(state_json: Option<String>, now: &str) -> Result<String, JsValue> {
    let state = parse_state(state_json.as_deref()).map_err(to_js)?;
    let now = parse_now(now).map_err(to_js)?;
    Ok(sm2_core::format_due_label(state.as_ref(), now))
}

/// The rating buttons as a JSON array of `[value, label]` pairs.
#[wasm_bindgen]
pub fn rating_labels() -> String {
    let labels: Vec<(u8, &str)> = Quality::ALL.iter().map(|q| (q.value(), q.label())).collect();
    serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
}

/// Review states for a set of cards, persisted in `localStorage`.
#[wasm_bindgen]
pub struct Scheduler {
    /// Review state for each reviewed card, by card id
    states: CardStates,
    /// Storage backend
    storage: Storage,
}

#[wasm_bindgen]
impl Scheduler {
    /// Create a scheduler, loading any previously saved states.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Scheduler, JsValue> {
        let storage = Storage::new();
        let states = CardStates::new(storage.load(STATES_KEY)?.unwrap_or_default());
        console::log_1(&format!("Loaded {} review states", states.len()).into());
        Ok(Self { states, storage })
    }

    /// Record a review of a card. Returns the new state as JSON. If the
    /// state cannot be saved the review is discarded.
    #[wasm_bindgen]
    pub fn review(&mut self, card_id: &str, rating: f64, now: &str) -> Result<String, JsValue> {
        let now = parse_now(now).map_err(to_js)?;
        let storage = &self.storage;
        let next: ReviewState = self
            .states
            .review(card_id, rating, now, |states| persist(storage, states))?;
        serde_json::to_string(&next).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The stored state of a card as JSON, if it was ever reviewed.
    #[wasm_bindgen]
    pub fn state(&self, card_id: &str) -> Option<String> {
        self.states
            .get(card_id)
            .and_then(|state| serde_json::to_string(state).ok())
    }

    /// Which of the given cards are due, in study order.
    /// Takes and returns a JSON array of card ids.
    #[wasm_bindgen]
    pub fn due_cards(&self, card_ids_json: &str, now: &str) -> Result<String, JsValue> {
        let card_ids = parse_card_ids(card_ids_json).map_err(to_js)?;
        let now = parse_now(now).map_err(to_js)?;
        let queue: Vec<&String> = due_queue(
            card_ids.iter().map(|id| (id, self.states.get(id))),
            now,
        );
        serde_json::to_string(&queue).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn due_label(&self, card_id: &str, now: &str) -> Result<String, JsValue> {
        let now = parse_now(now).map_err(to_js)?;
        Ok(sm2_core::format_due_label(self.states.get(card_id), now))
    }

    /// Counts for the given cards as a JSON object with `total`, `due` and
    /// `new`.
    #[wasm_bindgen]
    pub fn summary(&self, card_ids_json: &str, now: &str) -> Result<String, JsValue> {
        let card_ids = parse_card_ids(card_ids_json).map_err(to_js)?;
        let now = parse_now(now).map_err(to_js)?;
        let summary = DueSummary::of(card_ids.iter().map(|id| self.states.get(id)), now);
        serde_json::to_string(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Drop a card's state, e.g. after the card is deleted.
    #[wasm_bindgen]
    pub fn forget(&mut self, card_id: &str) -> Result<(), JsValue> {
        let storage = &self.storage;
        self.states.forget(card_id, |states| persist(storage, states))
    }
}

/// Writes the full map, clearing the key once no card has a state.
fn persist(storage: &Storage, states: &StateMap) -> Result<(), JsValue> {
    if states.is_empty() {
        storage.remove(STATES_KEY)
    } else {
        storage.save(STATES_KEY, states)
    }
}

/// Get the current local time as a timestamp string.
#[wasm_bindgen]
pub fn now_timestamp() -> String {
    let date = js_sys::Date::new_0();
    let year = date.get_full_year();
    let month = date.get_month() + 1;
    let day = date.get_date();
    let hours = date.get_hours();
    let minutes = date.get_minutes();
    let seconds = date.get_seconds();
    let millis = date.get_milliseconds();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        year, month, day, hours, minutes, seconds, millis
    )
}

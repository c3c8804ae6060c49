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

//! The in-memory review states behind `Scheduler`.
//!
//! Every change is handed to a `save` callback before it sticks. When the
//! save fails the map is put back as it was, so memory never runs ahead of
//! what was persisted.

use std::collections::HashMap;

use sm2_core::ReviewState;
use sm2_core::Timestamp;

pub type StateMap = HashMap<String, ReviewState>;

#[derive(Debug, Default)]
pub struct CardStates {
    states: StateMap,
}

impl CardStates {
    pub fn new(states: StateMap) -> Self {
        Self { states }
    }

    pub fn get(&self, card_id: &str) -> Option<&ReviewState> {
        self.states.get(card_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Applies a review and saves the updated map. Nothing changes if the
    /// card id or rating is invalid, or if `save` fails.
    pub fn review<E, F>(
        &mut self,
        card_id: &str,
        rating: f64,
        now: Timestamp,
        save: F,
    ) -> Result<ReviewState, E>
    where
        E: From<String>,
        F: FnOnce(&StateMap) -> Result<(), E>,
    {
        if card_id.trim().is_empty() {
            return Err(E::from(format!("invalid card id: '{card_id}'")));
        }
        let next = sm2_core::transition(self.states.get(card_id), rating, now)
            .map_err(|e| E::from(e.to_string()))?;
        let previous = self.states.insert(card_id.to_string(), next);
        if let Err(e) = save(&self.states) {
            match previous {
                Some(state) => self.states.insert(card_id.to_string(), state),
                None => self.states.remove(card_id),
            };
            return Err(e);
        }
        Ok(next)
    }

    /// Drops a card's state and saves the updated map. Unknown cards are a
    /// no-op and `save` is not called.
    pub fn forget<E, F>(&mut self, card_id: &str, save: F) -> Result<(), E>
    where
        F: FnOnce(&StateMap) -> Result<(), E>,
    {
        let Some(previous) = self.states.remove(card_id) else {
            return Ok(());
        };
        if let Err(e) = save(&self.states) {
            self.states.insert(card_id.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

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

use sm2_core::ReviewState;
use sm2_core::format_due_label_with;

use crate::config::Settings;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;

/// Prints a card's stored review state and when it is due.
pub fn show_card(settings: &Settings, card_id: &str) -> Fallible<Option<ReviewState>> {
    let db = Database::new(settings.database_path())?;
    let Some(state) = db.get_card(card_id)? else {
        return fail(format!("no such card: {card_id}"));
    };
    match &state {
        Some(state) => println!("{}", serde_json::to_string_pretty(state)?),
        None => println!("{card_id} has never been reviewed."),
    }
    let label = format_due_label_with(state.as_ref(), settings.now, &settings.label_style);
    println!("Due: {label}");
    Ok(state)
}

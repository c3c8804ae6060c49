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

use crate::config::Settings;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;

/// Registers cards that have not been reviewed yet. Returns how many were
/// new to the store.
pub fn add_cards(settings: &Settings, card_ids: &[String]) -> Fallible<usize> {
    if let Some(blank) = card_ids.iter().find(|id| id.trim().is_empty()) {
        return fail(format!("invalid card id: '{blank}'"));
    }
    let mut db = Database::new(settings.database_path())?;
    let mut added = 0;
    for card_id in card_ids {
        if db.add_card(card_id, settings.now)? {
            added += 1;
        } else {
            log::debug!("Card {card_id} is already registered");
        }
    }
    println!("Added {added} new card(s).");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::cmd::helper::settings_at;

    #[test]
    fn test_add_cards() -> Fallible<()> {
        let dir = tempdir()?;
        let settings = settings_at(dir.path(), "2024-01-01T00:00:00.000");
        let ids = vec!["a".to_string(), "b".to_string()];
        assert_eq!(add_cards(&settings, &ids)?, 2);
        let ids = vec!["b".to_string(), "c".to_string()];
        assert_eq!(add_cards(&settings, &ids)?, 1);
        let db = Database::new(settings.database_path())?;
        assert_eq!(db.all_cards()?.len(), 3);
        Ok(())
    }

    #[test]
    fn test_blank_id_is_rejected() -> Fallible<()> {
        let dir = tempdir()?;
        let settings = settings_at(dir.path(), "2024-01-01T00:00:00.000");
        let ids = vec!["a".to_string(), "  ".to_string()];
        assert!(add_cards(&settings, &ids).is_err());
        // Validation happens before the store is touched.
        assert!(!settings.database_path().exists());
        Ok(())
    }
}

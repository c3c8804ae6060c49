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

use sm2_core::DueSummary;
use sm2_core::due_queue;
use sm2_core::format_due_label_with;

use crate::config::Settings;
use crate::db::CardId;
use crate::db::Database;
use crate::error::Fallible;

/// Prints the cards due now in the order they should be studied, capped at
/// `limit` (or the configured default). Returns (card, label) pairs.
pub fn list_due(settings: &Settings, limit: Option<usize>) -> Fallible<Vec<(CardId, String)>> {
    let db = Database::new(settings.database_path())?;
    let cards = db.all_cards()?;
    let queue = due_queue(
        cards.iter().map(|(id, state)| ((id, state), state.as_ref())),
        settings.now,
    );
    let limit = limit.or(settings.due_limit).unwrap_or(usize::MAX);
    let listing: Vec<(CardId, String)> = queue
        .into_iter()
        .take(limit)
        .map(|(id, state)| {
            let label = format_due_label_with(state.as_ref(), settings.now, &settings.label_style);
            (id.clone(), label)
        })
        .collect();
    if listing.is_empty() {
        println!("No cards due.");
    }
    for (id, label) in &listing {
        println!("{id}\t{label}");
    }
    Ok(listing)
}

/// Prints how many cards there are, and how many are due or new.
pub fn print_stats(settings: &Settings) -> Fallible<DueSummary> {
    let db = Database::new(settings.database_path())?;
    let cards = db.all_cards()?;
    let summary = DueSummary::of(cards.iter().map(|(_, state)| state.as_ref()), settings.now);
    println!(
        "{} cards, {} due, {} new",
        summary.total, summary.due, summary.new
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::cmd::add::add_cards;
    use crate::cmd::helper::settings_at;
    use crate::cmd::review::review_card;

    #[test]
    fn test_empty_store() -> Fallible<()> {
        let dir = tempdir()?;
        let settings = settings_at(dir.path(), "2024-01-01T00:00:00.000");
        assert!(list_due(&settings, None)?.is_empty());
        assert_eq!(print_stats(&settings)?, DueSummary::default());
        Ok(())
    }

    #[test]
    fn test_due_listing_and_stats() -> Fallible<()> {
        let dir = tempdir()?;
        let mut settings = settings_at(dir.path(), "2024-01-01T09:00:00.000");
        add_cards(&settings, &["fresh".to_string()])?;
        review_card(&settings, "lapsed", "1")?;
        review_card(&settings, "known", "5")?;
        review_card(&settings, "known", "5")?;

        // Nothing reviewed today is due yet; only the new card is.
        let listing = list_due(&settings, None)?;
        assert_eq!(listing, vec![("fresh".to_string(), "Now".to_string())]);

        // A day later the lapsed card is due too; "known" waits six days.
        settings.now = settings.now.add_days(1);
        let listing = list_due(&settings, None)?;
        assert_eq!(
            listing,
            vec![
                ("fresh".to_string(), "Now".to_string()),
                ("lapsed".to_string(), "Today".to_string()),
            ]
        );
        assert_eq!(list_due(&settings, Some(1))?.len(), 1);

        let summary = print_stats(&settings)?;
        assert_eq!(
            summary,
            DueSummary {
                total: 3,
                due: 2,
                new: 1
            }
        );
        Ok(())
    }

    #[test]
    fn test_configured_limit() -> Fallible<()> {
        let dir = tempdir()?;
        let mut settings = settings_at(dir.path(), "2024-01-01T09:00:00.000");
        settings.due_limit = Some(2);
        let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        add_cards(&settings, &ids)?;
        assert_eq!(list_due(&settings, None)?.len(), 2);
        assert_eq!(list_due(&settings, Some(3))?.len(), 3);
        Ok(())
    }
}

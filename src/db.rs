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

use std::path::Path;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::TransactionBehavior;
use rusqlite::params;
use sm2_core::ReviewState;
use sm2_core::Timestamp;

use crate::error::Fallible;

const SCHEMA: &str = "
create table if not exists cards (
    card_id text primary key,
    -- JSON review state; null until the first review.
    state text,
    added_at text not null
) strict;
";

pub type CardId = String;

/// A card and its review state. `None` means never reviewed.
pub type CardRow = (CardId, Option<ReviewState>);

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(path: &Path) -> Fallible<Self> {
        log::debug!("Opening card store at {}", path.display());
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Registers a card with no review state. Returns false if the card was
    /// already present.
    pub fn add_card(&mut self, card_id: &str, added_at: Timestamp) -> Fallible<bool> {
        let inserted = self.conn.execute(
            "insert or ignore into cards (card_id, state, added_at) values (?1, null, ?2)",
            params![card_id, added_at.to_string()],
        )?;
        Ok(inserted == 1)
    }

    /// `None` if the card is unknown, `Some(None)` if it was never reviewed.
    pub fn get_card(&self, card_id: &str) -> Fallible<Option<Option<ReviewState>>> {
        let state: Option<Option<String>> = self
            .conn
            .query_row(
                "select state from cards where card_id = ?1",
                [card_id],
                |row| row.get(0),
            )
            .optional()?;
        match state {
            None => Ok(None),
            Some(None) => Ok(Some(None)),
            Some(Some(json)) => Ok(Some(Some(serde_json::from_str(&json)?))),
        }
    }

    /// All cards, oldest first.
    pub fn all_cards(&self) -> Fallible<Vec<CardRow>> {
        let mut stmt = self
            .conn
            .prepare("select card_id, state from cards order by added_at, card_id")?;
        let rows = stmt.query_map([], |row| {
            let card_id: String = row.get(0)?;
            let state: Option<String> = row.get(1)?;
            Ok((card_id, state))
        })?;
        let mut cards = Vec::new();
        for row in rows {
            let (card_id, state) = row?;
            let state: Option<ReviewState> = match state {
                Some(json) => Some(serde_json::from_str(&json)?),
                None => None,
            };
            cards.push((card_id, state));
        }
        Ok(cards)
    }

    /// Reads a card's state, computes the next one, and writes it back in a
    /// single write transaction. Nothing is written if `update` fails.
    /// Unknown cards are registered on the way.
    pub fn update_state<F>(
        &mut self,
        card_id: &str,
        now: Timestamp,
        update: F,
    ) -> Fallible<ReviewState>
    where
        F: FnOnce(Option<&ReviewState>) -> Fallible<ReviewState>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let prior: Option<String> = tx
            .query_row(
                "select state from cards where card_id = ?1",
                [card_id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();
        let prior: Option<ReviewState> = match prior {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };
        let next: ReviewState = update(prior.as_ref())?;
        tx.execute(
            "insert into cards (card_id, state, added_at) values (?1, ?2, ?3)
             on conflict (card_id) do update set state = excluded.state",
            params![card_id, serde_json::to_string(&next)?, now.to_string()],
        )?;
        tx.commit()?;
        Ok(next)
    }
}

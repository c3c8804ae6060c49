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

use clap::Args;
use clap::Parser;

use crate::cmd::add::add_cards;
use crate::cmd::due::list_due;
use crate::cmd::due::print_stats;
use crate::cmd::review::review_card;
use crate::cmd::show::show_card;
use crate::config::Config;
use crate::config::Overrides;
use crate::config::Settings;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Register cards that have not been reviewed yet.
    Add {
        /// Identifiers of the cards to add.
        #[arg(required = true)]
        cards: Vec<String>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Record a review and reschedule the card.
    Review {
        /// Identifier of the card. Unknown cards are added on the fly.
        card: String,
        /// How well you recalled it: 1 (not at all) to 5 (perfectly), or one
        /// of blackout, recognized, difficult, hesitant, perfect.
        rating: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print a card's review state and when it is due.
    Show {
        /// Identifier of the card.
        card: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// List the cards due now, in study order.
    Due {
        /// Maximum number of cards to list. Overrides `due_limit` in the config.
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print how many cards there are, and how many are due or new.
    Stats {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to the config file. By default, `sm2cards.toml` in the current
    /// directory is used if it exists.
    #[arg(long)]
    config: Option<String>,
    /// Path to the card store. Overrides `database` in the config.
    #[arg(long)]
    database: Option<String>,
    /// Pretend the current time is this timestamp (YYYY-MM-DDTHH:MM:SS.mmm).
    #[arg(long)]
    now: Option<String>,
}

impl CommonArgs {
    fn settings(self) -> Fallible<Settings> {
        let config = Config::load(self.config.as_deref())?;
        let overrides = Overrides {
            database: self.database,
            now: self.now,
        };
        let settings = Settings::resolve(config, overrides)?;
        log::debug!("Resolved settings: {settings:?}");
        Ok(settings)
    }
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Add { cards, common } => {
            add_cards(&common.settings()?, &cards)?;
        }
        Command::Review {
            card,
            rating,
            common,
        } => {
            review_card(&common.settings()?, &card, &rating)?;
        }
        Command::Show { card, common } => {
            show_card(&common.settings()?, &card)?;
        }
        Command::Due { limit, common } => {
            list_due(&common.settings()?, limit)?;
        }
        Command::Stats { common } => {
            print_stats(&common.settings()?)?;
        }
    }
    Ok(())
}

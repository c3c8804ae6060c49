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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use sm2_core::DueLabelStyle;
use sm2_core::Timestamp;

use crate::error::Fallible;
use crate::error::fail;

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "sm2cards.toml";

pub const DEFAULT_DATABASE: &str = "sm2cards.db";

/// The contents of `sm2cards.toml`. Every key is optional.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the SQLite card store.
    pub database: Option<String>,
    /// `strftime` pattern for due dates more than a day away.
    pub date_format: Option<String>,
    /// Default cap on the number of cards `due` lists.
    pub due_limit: Option<usize>,
}

impl Config {
    pub fn parse(text: &str) -> Fallible<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the config file. An explicit path must exist; the default one
    /// may be absent.
    pub fn load(path: Option<&str>) -> Fallible<Self> {
        let path: PathBuf = match path {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return fail(format!("config file does not exist: {}", path.display()));
                }
                path
            }
            None => {
                let path = PathBuf::from(CONFIG_FILE_NAME);
                if !path.exists() {
                    log::debug!("No {CONFIG_FILE_NAME} found, using defaults");
                    return Ok(Config::default());
                }
                path
            }
        };
        log::debug!("Loading config from {}", path.display());
        Config::parse(&read_to_string(&path)?)
    }
}

/// Everything a command needs, after merging flags over the config file.
#[derive(Debug)]
pub struct Settings {
    pub database: PathBuf,
    pub label_style: DueLabelStyle,
    pub due_limit: Option<usize>,
    pub now: Timestamp,
}

/// Flag values that override the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub database: Option<String>,
    pub now: Option<String>,
}

impl Settings {
    pub fn resolve(config: Config, overrides: Overrides) -> Fallible<Self> {
        let database = overrides
            .database
            .or(config.database)
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let label_style = match config.date_format {
            Some(pattern) => DueLabelStyle::new(pattern)?,
            None => DueLabelStyle::default(),
        };
        let now = match overrides.now {
            Some(now) => Timestamp::try_from(now)?,
            None => Timestamp::now(),
        };
        Ok(Settings {
            database: PathBuf::from(database),
            label_style,
            due_limit: config.due_limit,
            now,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database
    }
}

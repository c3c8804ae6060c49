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

//! sm2-core: the scheduling engine behind sm2cards.
//!
//! This library is pure: it performs no I/O and never reads the clock
//! unless the `clock` feature is enabled. It provides:
//! - The SM-2 review state machine
//! - Due-date queries and labels over a card's review state
//! - Serializable timestamps and review states for callers to persist

pub mod due;
pub mod error;
pub mod sm2;
pub mod types;

// Re-exports for convenience
pub use due::{
    DueLabelStyle, DueSummary, days_until_due, due_queue, format_due_label, format_due_label_with,
    is_due,
};
pub use error::{ErrorReport, Fallible, InvalidRatingError, fail};
pub use sm2::{Quality, apply, transition};
pub use types::date::Date;
pub use types::review_state::ReviewState;
pub use types::timestamp::Timestamp;

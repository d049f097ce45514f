// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Audit history records.
//!
//! Every successful charge or use appends exactly one [`HistoryEntry`].
//! Entries are immutable once appended and are returned in insertion order.
//! The history is a derived audit log; the balance itself is always read
//! from the balance table, never reconstructed from history.

use crate::base::{EntryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which kind of mutation a history entry documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    Charge,
    Use,
}

/// Immutable audit record of one successful charge or use.
///
/// `occurred_at` carries the timestamp of the balance write the entry
/// documents, not the time the entry itself was appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Assigned by the store on append, unique across all users.
    pub entry_id: EntryId,
    pub user_id: UserId,
    pub kind: EntryKind,
    pub amount: i64,
    pub occurred_at: DateTime<Utc>,
}

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

//! # Point Ledger
//!
//! A single-resource balance ledger: each user holds a non-negative point
//! balance that can be charged up to a ceiling or used down to zero, with
//! every successful mutation recorded in an append-only audit history.
//!
//! ## Core Components
//!
//! - [`Ledger`]: the service that validates operations and serializes
//!   concurrent writers per user
//! - [`BalanceStore`] / [`MemoryStore`]: keyed storage for balances and
//!   history, with no cross-call atomicity of its own
//! - [`UserBalance`] / [`HistoryEntry`]: the balance snapshot and its audit
//!   records
//! - [`LedgerError`]: one variant per failure kind
//!
//! ## Example
//!
//! ```
//! use point_ledger_rs::{EntryKind, Ledger, UserId};
//!
//! let ledger = Ledger::in_memory();
//!
//! ledger.charge(UserId(1), 1_000).unwrap();
//! ledger.use_points(UserId(1), 400).unwrap();
//!
//! assert_eq!(ledger.balance(UserId(1)).unwrap().balance, 600);
//!
//! let history = ledger.history(UserId(1)).unwrap();
//! assert_eq!(history.len(), 2);
//! assert_eq!(history[1].kind, EntryKind::Use);
//! ```
//!
//! ## Thread Safety
//!
//! A shared `Ledger` can be driven from any number of threads. Operations
//! for the same user are serialized through a per-user lock; operations for
//! different users run in parallel without contention.

mod balance;
mod base;
pub mod error;
mod history;
mod ledger;
pub mod store;

pub use balance::{MAX_BALANCE, UserBalance};
pub use base::{EntryId, UserId};
pub use error::{LedgerError, StoreError};
pub use history::{EntryKind, HistoryEntry};
pub use ledger::Ledger;
pub use store::{BalanceStore, MemoryStore};

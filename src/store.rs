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

//! Balance store contract and the in-memory implementation.
//!
//! The store holds the current balance per user and the append-only audit
//! history. Individual calls are linearizable, but the store offers no
//! cross-call atomicity: a `get` followed by a `put` from two different
//! operations may interleave. The [`Ledger`](crate::Ledger) compensates
//! with per-user locking; the store must never be trusted to serialize a
//! read-modify-write on its own.

use crate::balance::UserBalance;
use crate::base::{EntryId, UserId};
use crate::error::StoreError;
use crate::history::{EntryKind, HistoryEntry};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Keyed storage for balances and history.
///
/// Implementations may be an in-process map or a networked database; the
/// ledger works with either as long as each single call is linearizable
/// and returns promptly or fails with a [`StoreError`].
pub trait BalanceStore: Send + Sync {
    /// Returns the stored balance, or `None` if the user has no row yet.
    fn get(&self, user_id: UserId) -> Result<Option<UserBalance>, StoreError>;

    /// Inserts or replaces the user's balance, assigning the stored
    /// timestamp. Returns the persisted record.
    fn put(&self, user_id: UserId, balance: i64) -> Result<UserBalance, StoreError>;

    /// Appends one audit entry, assigning its id. Returns the persisted
    /// entry.
    fn append_history(
        &self,
        user_id: UserId,
        kind: EntryKind,
        amount: i64,
        occurred_at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StoreError>;

    /// Returns the user's entries in insertion order. Empty if the user has
    /// no history.
    fn list_history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, StoreError>;
}

impl<S: BalanceStore + ?Sized> BalanceStore for Arc<S> {
    fn get(&self, user_id: UserId) -> Result<Option<UserBalance>, StoreError> {
        (**self).get(user_id)
    }

    fn put(&self, user_id: UserId, balance: i64) -> Result<UserBalance, StoreError> {
        (**self).put(user_id, balance)
    }

    fn append_history(
        &self,
        user_id: UserId,
        kind: EntryKind,
        amount: i64,
        occurred_at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StoreError> {
        (**self).append_history(user_id, kind, amount, occurred_at)
    }

    fn list_history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, StoreError> {
        (**self).list_history(user_id)
    }
}

/// In-memory balance store.
///
/// Balances and per-user history vectors live in [`DashMap`] tables, so
/// single calls are safe under concurrent access. True to the store
/// contract, nothing here serializes a get-then-put sequence.
#[derive(Debug)]
pub struct MemoryStore {
    balances: DashMap<UserId, UserBalance>,
    histories: DashMap<UserId, Vec<HistoryEntry>>,
    /// Next entry id to assign, starting at 1.
    next_entry_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
            histories: DashMap::new(),
            next_entry_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of every stored balance, for reporting output.
    ///
    /// Not part of the [`BalanceStore`] contract; the ledger core never
    /// depends on it.
    pub fn balances(&self) -> Vec<UserBalance> {
        self.balances.iter().map(|entry| *entry.value()).collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceStore for MemoryStore {
    fn get(&self, user_id: UserId) -> Result<Option<UserBalance>, StoreError> {
        Ok(self.balances.get(&user_id).map(|entry| *entry.value()))
    }

    fn put(&self, user_id: UserId, balance: i64) -> Result<UserBalance, StoreError> {
        let stored = UserBalance {
            user_id,
            balance,
            updated_at: Utc::now(),
        };
        self.balances.insert(user_id, stored);
        Ok(stored)
    }

    fn append_history(
        &self,
        user_id: UserId,
        kind: EntryKind,
        amount: i64,
        occurred_at: DateTime<Utc>,
    ) -> Result<HistoryEntry, StoreError> {
        let entry = HistoryEntry {
            entry_id: EntryId(self.next_entry_id.fetch_add(1, Ordering::Relaxed)),
            user_id,
            kind,
            amount,
            occurred_at,
        };
        self.histories
            .entry(user_id)
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    fn list_history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self
            .histories
            .get(&user_id)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }
}

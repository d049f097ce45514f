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

//! The ledger service: validated, per-user-atomic balance operations.
//!
//! [`Ledger`] owns the serialization discipline the store does not provide.
//! Each charge or use runs its read-validate-compute-persist-append
//! sequence under a lock dedicated to that user, so two writers for the
//! same user never compute from the same stale read, while writers for
//! different users proceed in parallel on independent locks.
//!
//! # Locking
//!
//! - One [`FairMutex`] per distinct user, created lazily on first use and
//!   retained for the life of the process. The registry is a [`DashMap`],
//!   and insertion goes through its entry API so two first-time callers
//!   for the same user can never observe two different lock instances.
//! - The `Arc` is cloned out of the registry before blocking; the map
//!   shard is never held across a lock wait.
//! - `balance` and `history` take no lock. The contract only requires
//!   that writers never interleave; reads observe the latest completed
//!   write for their user.
//!
//! # Known inconsistency window
//!
//! A store fault while appending history after the balance write has
//! already succeeded is surfaced to the caller without rolling the balance
//! back. The mutation stands and the audit log misses one entry.

use crate::balance::UserBalance;
use crate::base::UserId;
use crate::error::LedgerError;
use crate::history::{EntryKind, HistoryEntry};
use crate::store::{BalanceStore, MemoryStore};
use dashmap::DashMap;
use parking_lot::FairMutex;
use std::sync::Arc;

/// Point ledger with per-user write serialization.
///
/// Operations are synchronous and safe to call from any number of threads
/// through a shared reference.
///
/// # Example
///
/// ```
/// use point_ledger_rs::{Ledger, UserId};
///
/// let ledger = Ledger::in_memory();
/// ledger.charge(UserId(1), 500).unwrap();
/// let balance = ledger.use_points(UserId(1), 200).unwrap();
/// assert_eq!(balance.balance, 300);
/// ```
pub struct Ledger<S> {
    store: S,
    /// Per-user locks, keyed lazily; never evicted.
    locks: DashMap<UserId, Arc<FairMutex<()>>>,
}

impl Ledger<MemoryStore> {
    /// Ledger backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: BalanceStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Returns the user's current balance.
    ///
    /// A user the store has never seen reads as a zero balance; nothing is
    /// persisted for it until the first successful mutation.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidUserId`] if `user_id <= 0`.
    /// - [`LedgerError::Store`] if the store read fails.
    pub fn balance(&self, user_id: UserId) -> Result<UserBalance, LedgerError> {
        if !user_id.is_valid() {
            return Err(LedgerError::InvalidUserId);
        }
        let balance = self
            .store
            .get(user_id)?
            .unwrap_or_else(|| UserBalance::empty(user_id));
        Ok(balance)
    }

    /// Returns the user's audit history in the order entries were recorded.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidUserId`] if `user_id <= 0`.
    /// - [`LedgerError::Store`] if the store read fails.
    pub fn history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, LedgerError> {
        if !user_id.is_valid() {
            return Err(LedgerError::InvalidUserId);
        }
        Ok(self.store.list_history(user_id)?)
    }

    /// Charges `amount` points, returning the updated balance.
    ///
    /// A zero amount is permitted and still records a history entry.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidUserId`] if `user_id <= 0`.
    /// - [`LedgerError::InvalidAmount`] if `amount < 0`.
    /// - [`LedgerError::BalanceLimitExceeded`] if the result would exceed
    ///   [`MAX_BALANCE`](crate::MAX_BALANCE). No mutation occurs.
    /// - [`LedgerError::Store`] on a store fault.
    pub fn charge(&self, user_id: UserId, amount: i64) -> Result<UserBalance, LedgerError> {
        self.mutate(user_id, amount, EntryKind::Charge)
    }

    /// Uses `amount` points, returning the updated balance.
    ///
    /// A zero amount is permitted and still records a history entry.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidUserId`] if `user_id <= 0`.
    /// - [`LedgerError::InvalidAmount`] if `amount < 0`.
    /// - [`LedgerError::InsufficientBalance`] if the result would be
    ///   negative. No mutation occurs.
    /// - [`LedgerError::Store`] on a store fault.
    pub fn use_points(&self, user_id: UserId, amount: i64) -> Result<UserBalance, LedgerError> {
        self.mutate(user_id, amount, EntryKind::Use)
    }

    /// Shared write path: validate, serialize per user, read-modify-write,
    /// append history.
    ///
    /// Validation order is fixed: identifier, then amount, then the
    /// business rule inside the lock. Identifier and amount failures are
    /// raised before the store is touched.
    fn mutate(
        &self,
        user_id: UserId,
        amount: i64,
        kind: EntryKind,
    ) -> Result<UserBalance, LedgerError> {
        if !user_id.is_valid() {
            return Err(LedgerError::InvalidUserId);
        }
        if amount < 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let current = self
            .store
            .get(user_id)?
            .unwrap_or_else(|| UserBalance::empty(user_id));

        let next = match kind {
            EntryKind::Charge => current.charged(amount)?,
            EntryKind::Use => current.used(amount)?,
        };

        let stored = self.store.put(user_id, next)?;

        // The history entry carries the persisted timestamp. A fault here
        // is surfaced as-is: the balance write above is not undone.
        if let Err(fault) = self
            .store
            .append_history(user_id, kind, amount, stored.updated_at)
        {
            tracing::warn!(
                user = %user_id,
                ?kind,
                amount,
                balance = stored.balance,
                %fault,
                "history append failed after balance write; balance kept"
            );
            return Err(fault.into());
        }

        tracing::debug!(
            user = %user_id,
            ?kind,
            amount,
            balance = stored.balance,
            "balance updated"
        );
        Ok(stored)
    }

    /// Lock dedicated to `user_id`, created on first use.
    ///
    /// The entry API makes the insert-if-absent atomic; the clone drops
    /// the map reference before the caller blocks on the mutex.
    fn user_lock(&self, user_id: UserId) -> Arc<FairMutex<()>> {
        self.locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(FairMutex::new(())))
            .clone()
    }
}

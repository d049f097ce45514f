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

//! User balance records and the business rules that govern them.
//!
//! [`UserBalance`] is a plain snapshot of one user's points. The arithmetic
//! methods are pure: they validate a mutation against the current snapshot
//! and return the resulting balance value without touching any shared state.
//! Persisting the result (and serializing concurrent writers) is the
//! ledger's job.

use crate::base::UserId;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ceiling a balance may never exceed.
pub const MAX_BALANCE: i64 = 10_000;

/// One user's current point balance.
///
/// # Invariants
///
/// - `0 <= balance <= MAX_BALANCE` at every point observable through the
///   ledger.
/// - `updated_at` is assigned by the store on each persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub user_id: UserId,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
}

impl UserBalance {
    /// Zero balance for a user the store has never seen.
    ///
    /// The store's "absent" state is equivalent to this value; it is never
    /// an error to address a user with no prior activity.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: 0,
            updated_at: Utc::now(),
        }
    }

    /// Computes the balance after charging `amount` points.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] if `amount` is negative.
    /// - [`LedgerError::BalanceLimitExceeded`] if the result would exceed
    ///   [`MAX_BALANCE`].
    pub fn charged(&self, amount: i64) -> Result<i64, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount);
        }
        // checked_add: an overflowing sum certainly exceeds the ceiling.
        let next = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceLimitExceeded)?;
        if next > MAX_BALANCE {
            return Err(LedgerError::BalanceLimitExceeded);
        }
        debug_assert!(next >= 0);
        Ok(next)
    }

    /// Computes the balance after using `amount` points.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] if `amount` is negative.
    /// - [`LedgerError::InsufficientBalance`] if the result would be
    ///   negative.
    pub fn used(&self, amount: i64) -> Result<i64, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let remaining = self.balance - amount;
        if remaining < 0 {
            return Err(LedgerError::InsufficientBalance);
        }
        Ok(remaining)
    }
}

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

//! Error types for ledger operations.

use thiserror::Error;

/// A fault reported by the balance store for a single `get`/`put`/append
/// call.
///
/// The in-memory store never produces these; networked or disk-backed
/// implementations report their failures through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("store fault: {0}")]
pub struct StoreError(pub String);

/// Ledger operation errors.
///
/// Each failure kind is a distinct variant so callers can branch on it
/// without matching on messages. Validation errors are raised before any
/// store mutation; `Store` may be raised at any point of an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// User id is zero or negative
    #[error("invalid user id")]
    InvalidUserId,

    /// Amount is negative
    #[error("invalid amount (must not be negative)")]
    InvalidAmount,

    /// Charge would push the balance above the maximum
    #[error("charge would exceed the maximum balance")]
    BalanceLimitExceeded,

    /// Use would push the balance below zero
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The underlying store failed a call
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::{LedgerError, StoreError};

    #[test]
    fn error_display_messages() {
        assert_eq!(LedgerError::InvalidUserId.to_string(), "invalid user id");
        assert_eq!(
            LedgerError::InvalidAmount.to_string(),
            "invalid amount (must not be negative)"
        );
        assert_eq!(
            LedgerError::BalanceLimitExceeded.to_string(),
            "charge would exceed the maximum balance"
        );
        assert_eq!(
            LedgerError::InsufficientBalance.to_string(),
            "insufficient balance"
        );
        assert_eq!(
            LedgerError::Store(StoreError("unreachable".into())).to_string(),
            "store fault: unreachable"
        );
    }

    #[test]
    fn store_error_converts_into_ledger_error() {
        let fault = StoreError("append failed".into());
        let error: LedgerError = fault.clone().into();
        assert_eq!(error, LedgerError::Store(fault));
    }

    #[test]
    fn errors_are_cloneable() {
        let error = LedgerError::InsufficientBalance;
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}

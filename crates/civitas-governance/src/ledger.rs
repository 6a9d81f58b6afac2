//! Ledger seam consumed by the governance core.
//!
//! The core reads voting weight from a token ledger and moves treasury funds
//! on a funds ledger. Both present the same interface; the host decides
//! whether they are the same asset.

use std::collections::HashMap;

use civitas_types::{Address, U256};
use thiserror::Error;

/// Errors reported by a ledger transfer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },

    #[error("Balance overflow")]
    Overflow,

    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Balance oracle and transfer primitive provided by the host ledger.
///
/// `transfer` must be all-or-nothing: on error no balance may have changed.
pub trait Ledger {
    /// Current balance of `owner`. Unknown accounts hold zero.
    fn balance_of(&self, owner: &Address) -> U256;

    /// Move `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: U256) -> Result<(), LedgerError>;
}

/// Simple in-process ledger backed by a balance map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Address, U256>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with the given opening balances.
    pub fn with_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = (Address, U256)>,
    {
        Self {
            balances: balances.into_iter().collect(),
        }
    }

    /// Overwrite the balance of `owner`.
    pub fn set_balance(&mut self, owner: Address, balance: U256) {
        if balance.is_zero() {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, balance);
        }
    }

    /// Add `amount` to `owner` from outside the ledger (mint or external deposit).
    pub fn credit(&mut self, owner: Address, amount: U256) -> Result<(), LedgerError> {
        let current = self.balance_of(&owner);
        let updated = current.checked_add(&amount).ok_or(LedgerError::Overflow)?;
        self.set_balance(owner, updated);
        Ok(())
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> Result<U256, LedgerError> {
        self.balances
            .values()
            .try_fold(U256::ZERO, |acc, b| acc.checked_add(b))
            .ok_or(LedgerError::Overflow)
    }

    /// Number of accounts with a non-zero balance.
    pub fn holders(&self) -> usize {
        self.balances.len()
    }
}

impl Ledger for InMemoryLedger {
    fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or(U256::ZERO)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: U256) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(&amount)
            .ok_or(LedgerError::InsufficientBalance {
                required: amount,
                available,
            })?;

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(&amount)
            .ok_or(LedgerError::Overflow)?;

        self.set_balance(*from, debited);
        self.set_balance(*to, credited);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn test_balance_of_unknown_is_zero() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance_of(&addr(1)), U256::ZERO);
        assert_eq!(ledger.holders(), 0);
    }

    #[test]
    fn test_transfer_moves_funds() {
        let mut ledger = InMemoryLedger::with_balances([(addr(1), U256::from(100u64))]);

        ledger.transfer(&addr(1), &addr(2), U256::from(40u64)).unwrap();

        assert_eq!(ledger.balance_of(&addr(1)), U256::from(60u64));
        assert_eq!(ledger.balance_of(&addr(2)), U256::from(40u64));
        assert_eq!(ledger.total_supply().unwrap(), U256::from(100u64));
    }

    #[test]
    fn test_transfer_insufficient_leaves_state() {
        let mut ledger = InMemoryLedger::with_balances([(addr(1), U256::from(10u64))]);

        let err = ledger
            .transfer(&addr(1), &addr(2), U256::from(11u64))
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                required: U256::from(11u64),
                available: U256::from(10u64),
            }
        );
        assert_eq!(ledger.balance_of(&addr(1)), U256::from(10u64));
        assert_eq!(ledger.balance_of(&addr(2)), U256::ZERO);
    }

    #[test]
    fn test_transfer_overflow_leaves_state() {
        let mut ledger = InMemoryLedger::with_balances([
            (addr(1), U256::from(5u64)),
            (addr(2), U256::MAX),
        ]);

        assert_eq!(
            ledger.transfer(&addr(1), &addr(2), U256::from(1u64)),
            Err(LedgerError::Overflow)
        );
        assert_eq!(ledger.balance_of(&addr(1)), U256::from(5u64));
    }

    #[test]
    fn test_self_transfer_is_noop() {
        let mut ledger = InMemoryLedger::with_balances([(addr(1), U256::from(5u64))]);
        ledger.transfer(&addr(1), &addr(1), U256::from(5u64)).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), U256::from(5u64));
    }

    #[test]
    fn test_credit() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(addr(7), U256::tokens(1000)).unwrap();
        ledger.credit(addr(7), U256::tokens(1)).unwrap();
        assert_eq!(ledger.balance_of(&addr(7)), U256::tokens(1001));
        assert_eq!(ledger.credit(addr(7), U256::MAX), Err(LedgerError::Overflow));
    }
}

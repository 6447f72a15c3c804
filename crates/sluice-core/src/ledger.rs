//! the external fungible-asset ledger collaborator
//!
//! the distributor never holds funds; it instructs the ledger to move
//! pre-authorized funds from the operator to each recipient. the real
//! ledger lives outside this crate; MemoryLedger is the in-process
//! reference implementation used in tests and local tooling

use crate::value::{AccountId, Amount};
use std::collections::BTreeMap;
use thiserror::Error;

/// ledger-side rejection, surfaced to callers as Error::TransferFailed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("insufficient authorization")]
    InsufficientAllowance,

    #[error("balance overflow")]
    Overflow,
}

/// handle to an external asset ledger
///
/// `transfer_from` moves funds a holder has pre-authorized for
/// disbursement. `checkpoint`/`restore` bracket one engine call so a
/// multi-transfer disbursement is all-or-nothing: the engine takes a
/// checkpoint, applies transfers, and restores on any failure
pub trait Ledger {
    type Checkpoint;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn restore(&mut self, checkpoint: Self::Checkpoint);

    fn transfer_from(
        &mut self,
        owner: &AccountId,
        recipient: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// in-memory ledger with balances and per-holder disbursement allowances
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    balances: BTreeMap<AccountId, Amount>,
    allowances: BTreeMap<AccountId, Amount>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, who: &AccountId) -> Amount {
        self.balances.get(who).copied().unwrap_or(Amount::ZERO)
    }

    pub fn allowance_of(&self, owner: &AccountId) -> Amount {
        self.allowances.get(owner).copied().unwrap_or(Amount::ZERO)
    }

    /// credit an account (test/setup helper)
    pub fn mint(&mut self, who: &AccountId, amount: Amount) {
        let balance = self.balance_of(who);
        self.balances
            .insert(*who, balance.checked_add(amount).unwrap_or(balance));
    }

    /// set the amount a holder authorizes for disbursement
    pub fn approve(&mut self, owner: &AccountId, amount: Amount) {
        self.allowances.insert(*owner, amount);
    }
}

impl Ledger for MemoryLedger {
    type Checkpoint = MemoryLedger;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.clone()
    }

    fn restore(&mut self, checkpoint: Self::Checkpoint) {
        *self = checkpoint;
    }

    fn transfer_from(
        &mut self,
        owner: &AccountId,
        recipient: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowance = self
            .allowance_of(owner)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance)?;
        let debited = self
            .balance_of(owner)
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance)?;
        // recipient == owner: credit lands on the already-debited balance
        let recipient_base = if recipient == owner {
            debited
        } else {
            self.balance_of(recipient)
        };
        let credited = recipient_base
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.allowances.insert(*owner, allowance);
        self.balances.insert(*owner, debited);
        self.balances.insert(*recipient, credited);
        Ok(())
    }
}

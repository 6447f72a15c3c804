//! the distributor: commitment store + batch verifier + disbursement engine
//!
//! holds the single committed root and the executed set; verifies a
//! submitted batch against the root and drives the ledger transfers,
//! all-or-nothing per call

use crate::error::{Error, Result};
use crate::leaf::{ExecutedSet, LeafId};
use crate::ledger::Ledger;
use crate::proof::{MerkleProof, Root};
use crate::value::{AccountId, Amount};

/// proof-gated batch disbursement engine
///
/// state is exclusively owned here and mutated only through `submit`
/// and `batch_transfer`; `&mut self` on both serializes all invocations
pub struct Distributor<L: Ledger> {
    /// handle to the external asset ledger, fixed at construction
    ledger: L,
    /// the only identity allowed to submit roots; disbursements are
    /// drawn from this identity's pre-authorized balance
    operator: AccountId,
    /// current committed root, Root::EMPTY until first submission
    root: Root,
    /// consumed batches, global across root generations
    executed: ExecutedSet,
}

impl<L: Ledger> Distributor<L> {
    pub fn new(ledger: L, operator: AccountId) -> Self {
        Self {
            ledger,
            operator,
            root: Root::EMPTY,
            executed: ExecutedSet::new(),
        }
    }

    /// replace the committed root wholesale
    ///
    /// operator-only. the sentinel is permitted and disables
    /// verification until a real root is submitted. proofs built
    /// against the previous root are silently invalidated unless their
    /// leaves also exist under the new tree
    pub fn submit(&mut self, caller: &AccountId, new_root: Root) -> Result<()> {
        if caller != &self.operator {
            return Err(Error::Unauthorized);
        }
        self.root = new_root;
        Ok(())
    }

    pub fn current_root(&self) -> Root {
        self.root
    }

    pub fn operator(&self) -> &AccountId {
        &self.operator
    }

    /// the ledger this distributor disburses from
    pub fn asset_reference(&self) -> &L {
        &self.ledger
    }

    /// mutable access to the ledger handle (it is externally owned
    /// state; holders adjust balances and authorizations through it)
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn is_executed(&self, leaf: &LeafId) -> bool {
        self.executed.contains(leaf)
    }

    /// verify one batch against the committed root and disburse it
    ///
    /// check order: shape, commitment set, replay, proof, then the
    /// transfer loop. the whole call is all-or-nothing: the ledger is
    /// checkpointed before the loop and restored on any failure, and
    /// the leaf is only recorded executed once every transfer has
    /// succeeded, so a failed call leaves the batch retryable
    pub fn batch_transfer(
        &mut self,
        proof: &MerkleProof,
        recipients: &[AccountId],
        amounts: &[Amount],
    ) -> Result<()> {
        if recipients.len() != amounts.len() {
            return Err(Error::MalformedBatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        if self.root.is_empty() {
            return Err(Error::NoCommitment);
        }

        let leaf = LeafId::derive(recipients, amounts);
        if self.executed.contains(&leaf) {
            return Err(Error::AlreadyExecuted(leaf));
        }
        if !proof.verify(&leaf, &self.root) {
            return Err(Error::InvalidProof);
        }

        let checkpoint = self.ledger.checkpoint();
        for (index, (recipient, amount)) in recipients.iter().zip(amounts).enumerate() {
            if amount.is_zero() {
                self.ledger.restore(checkpoint);
                return Err(Error::ZeroAmount(index));
            }
            if let Err(rejection) = self.ledger.transfer_from(&self.operator, recipient, *amount) {
                self.ledger.restore(checkpoint);
                return Err(Error::TransferFailed(rejection));
            }
        }

        self.executed.insert(leaf);
        Ok(())
    }
}

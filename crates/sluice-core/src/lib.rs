//! sluice - proof-gated one-time batch disbursement
//!
//! an operator commits a merkle root summarizing many (recipients, amounts)
//! payout batches; anyone holding a batch plus its inclusion proof can
//! trigger the corresponding transfers, exactly once
//!
//! # architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        DISTRIBUTOR                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  operator ──submit──▶ root (single, no history)             │
//! │                                                              │
//! │  caller ──batch_transfer(proof, recipients, amounts)──▶     │
//! │    ├─ shape check                                           │
//! │    ├─ leaf = blake3(recipients ‖ amounts)                   │
//! │    ├─ replay check against executed set (global)            │
//! │    ├─ proof folds to committed root (sorted-pair combine)   │
//! │    └─ ledger.transfer_from(operator, recipient, amount)     │
//! │       all-or-nothing per call                               │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! tree construction happens entirely operator-side (see sluice-tree);
//! this crate only verifies proofs against a root it was given

pub mod distributor;
pub mod error;
pub mod leaf;
pub mod ledger;
pub mod proof;
pub mod value;

pub use distributor::Distributor;
pub use error::{Error, Result};
pub use leaf::{ExecutedSet, LeafId};
pub use ledger::{Ledger, LedgerError, MemoryLedger};
pub use proof::{hash_pair, MerkleProof, Root};
pub use value::{AccountId, Amount};

/// domain separator for leaf derivation
pub const LEAF_DOMAIN: &[u8] = b"sluice.leaf.v1";
/// domain separator for interior node combination
pub const NODE_DOMAIN: &[u8] = b"sluice.node.v1";

//! operator-side payout tree construction
//!
//! the distributor only ever verifies proofs against a root it was
//! given; building the tree over the committed batches happens here,
//! on the operator's machine. uses the same leaf derivation and
//! sorted-pair combine as the verifier, so proofs produced here fold
//! back to the root the verifier reconstructs
//!
//! layer rule: nodes pair up left to right; an unpaired trailing node
//! is promoted to the next layer unhashed, so its proof simply has no
//! sibling at that level

use sluice_core::{hash_pair, AccountId, Amount, LeafId, MerkleProof, Root};

/// complete merkle tree over payout batch leaves
pub struct PayoutTree {
    /// layers[0] is the leaves, last layer is the root (when non-empty)
    layers: Vec<Vec<[u8; 32]>>,
}

impl PayoutTree {
    /// build a tree over precomputed leaves
    pub fn new(leaves: Vec<LeafId>) -> Self {
        let mut layers: Vec<Vec<[u8; 32]>> = vec![leaves.iter().map(LeafId::to_bytes).collect()];

        while layers.last().map_or(false, |layer| layer.len() > 1) {
            let current = layers.last().unwrap();
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(hash_pair(left, right)),
                    [promoted] => next.push(*promoted),
                    _ => unreachable!(),
                }
            }
            layers.push(next);
        }

        Self { layers }
    }

    /// build directly from (recipients, amounts) batches
    pub fn from_batches(batches: &[(Vec<AccountId>, Vec<Amount>)]) -> Self {
        Self::new(
            batches
                .iter()
                .map(|(recipients, amounts)| LeafId::derive(recipients, amounts))
                .collect(),
        )
    }

    /// tree root; Root::EMPTY for an empty tree
    pub fn root(&self) -> Root {
        match self.layers[0].len() {
            0 => Root::EMPTY,
            _ => Root(self.layers[self.layers.len() - 1][0]),
        }
    }

    /// number of leaves
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// inclusion proof for the leaf at `index`, None if out of range
    pub fn prove(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.layers[0].len() {
            return None;
        }

        let mut siblings = Vec::with_capacity(self.layers.len());
        let mut position = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = position ^ 1;
            if sibling < layer.len() {
                siblings.push(layer[sibling]);
            }
            // promoted nodes carry no sibling at this level
            position /= 2;
        }

        Some(MerkleProof::new(siblings))
    }
}

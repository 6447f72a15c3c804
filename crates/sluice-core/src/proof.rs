//! merkle root and inclusion proofs
//!
//! proofs fold bottom-up with a sorted-pair combine: the two hashes at
//! each step are ordered numerically before hashing, so a proof carries
//! no left/right position bits and cannot be broken by positional
//! re-encoding

use crate::leaf::LeafId;
use crate::NODE_DOMAIN;
use serde::{Deserialize, Serialize};

/// the committed merkle root
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Root(pub [u8; 32]);

impl Root {
    /// unset sentinel - distinguishable from any real root
    pub const EMPTY: Self = Self([0u8; 32]);

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl core::fmt::Display for Root {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// combine two sibling hashes into their parent
///
/// the pair is sorted before hashing; hash_pair(a, b) == hash_pair(b, a)
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = blake3::Hasher::new();
    hasher.update(NODE_DOMAIN);
    hasher.update(lo);
    hasher.update(hi);
    *hasher.finalize().as_bytes()
}

/// merkle inclusion proof
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// sibling hashes from leaf to root
    pub siblings: Vec<[u8; 32]>,
}

impl MerkleProof {
    pub fn new(siblings: Vec<[u8; 32]>) -> Self {
        Self { siblings }
    }

    /// verify that leaf is under root
    pub fn verify(&self, leaf: &LeafId, root: &Root) -> bool {
        let mut current = leaf.0;
        for sibling in &self.siblings {
            current = hash_pair(&current, sibling);
        }
        current == root.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_pair_order_independent() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
        assert_ne!(hash_pair(&a, &b), hash_pair(&a, &a));
    }

    #[test]
    fn test_single_leaf_proof() {
        // a one-leaf tree has root == leaf and an empty proof
        let leaf = LeafId([9u8; 32]);
        let root = Root(leaf.0);
        assert!(MerkleProof::default().verify(&leaf, &root));
    }

    #[test]
    fn test_two_leaf_proof() {
        let l0 = LeafId([1u8; 32]);
        let l1 = LeafId([2u8; 32]);
        let root = Root(hash_pair(&l0.0, &l1.0));

        assert!(MerkleProof::new(vec![l1.0]).verify(&l0, &root));
        assert!(MerkleProof::new(vec![l0.0]).verify(&l1, &root));

        // wrong sibling fails
        assert!(!MerkleProof::new(vec![[3u8; 32]]).verify(&l0, &root));
        // wrong leaf fails
        assert!(!MerkleProof::new(vec![l1.0]).verify(&LeafId([3u8; 32]), &root));
    }

    #[test]
    fn test_four_leaf_proof() {
        let leaves: Vec<LeafId> = (1u8..=4).map(|i| LeafId([i; 32])).collect();
        let n01 = hash_pair(&leaves[0].0, &leaves[1].0);
        let n23 = hash_pair(&leaves[2].0, &leaves[3].0);
        let root = Root(hash_pair(&n01, &n23));

        let proof = MerkleProof::new(vec![leaves[3].0, n01]);
        assert!(proof.verify(&leaves[2], &root));
        assert!(!proof.verify(&leaves[0], &root));

        // truncated proof fails
        assert!(!MerkleProof::new(vec![leaves[3].0]).verify(&leaves[2], &root));
    }
}

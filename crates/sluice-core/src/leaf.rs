//! canonical batch leaves and the executed set
//!
//! a batch is identified by the hash of its contents; once a leaf is
//! executed, it is recorded here and can never be executed again,
//! regardless of any later root submissions

use crate::value::{AccountId, Amount};
use crate::LEAF_DOMAIN;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// canonical identifier of one payout batch
///
/// derived from the ordered recipient sequence followed by the ordered
/// amount sequence, each element at fixed width (32 bytes per recipient,
/// 16 per amount), so any change to an element, to either order, or to
/// the sequence partition changes the identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeafId(pub [u8; 32]);

impl LeafId {
    pub fn derive(recipients: &[AccountId], amounts: &[Amount]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(LEAF_DOMAIN);
        for recipient in recipients {
            hasher.update(recipient.as_bytes());
        }
        for amount in amounts {
            hasher.update(&amount.to_bytes());
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for LeafId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Display for LeafId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// executed set - tracks consumed batches
///
/// grow-only; entries survive root submissions, so replay protection is
/// global across root generations rather than scoped to one root
#[derive(Debug, Default, Clone)]
pub struct ExecutedSet {
    leaves: HashSet<LeafId>,
}

impl ExecutedSet {
    pub fn new() -> Self {
        Self {
            leaves: HashSet::new(),
        }
    }

    /// check whether a batch was already executed
    pub fn contains(&self, leaf: &LeafId) -> bool {
        self.leaves.contains(leaf)
    }

    /// mark a batch executed
    /// returns false if already present (replay attempt)
    pub fn insert(&mut self, leaf: LeafId) -> bool {
        self.leaves.insert(leaf)
    }

    /// number of executed batches
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn accounts(tags: &[&[u8]]) -> Vec<AccountId> {
        tags.iter().map(|t| AccountId::derive(t)).collect()
    }

    #[test]
    fn test_leaf_derivation_deterministic() {
        let recipients = accounts(&[b"a", b"b", b"c"]);
        let amounts: Vec<Amount> = vec![100u64.into(), 200u64.into(), 300u64.into()];

        assert_eq!(
            LeafId::derive(&recipients, &amounts),
            LeafId::derive(&recipients, &amounts)
        );
    }

    #[test]
    fn test_leaf_sensitive_to_order() {
        let recipients = accounts(&[b"a", b"b"]);
        let amounts: Vec<Amount> = vec![1u64.into(), 2u64.into()];
        let leaf = LeafId::derive(&recipients, &amounts);

        let mut swapped_recipients = recipients.clone();
        swapped_recipients.swap(0, 1);
        assert_ne!(leaf, LeafId::derive(&swapped_recipients, &amounts));

        let swapped_amounts: Vec<Amount> = vec![2u64.into(), 1u64.into()];
        assert_ne!(leaf, LeafId::derive(&recipients, &swapped_amounts));
    }

    #[test]
    fn test_leaf_sensitive_to_each_element() {
        let recipients = accounts(&[b"a", b"b"]);
        let amounts: Vec<Amount> = vec![1u64.into(), 2u64.into()];
        let leaf = LeafId::derive(&recipients, &amounts);

        let other_recipients = accounts(&[b"a", b"x"]);
        assert_ne!(leaf, LeafId::derive(&other_recipients, &amounts));

        let other_amounts: Vec<Amount> = vec![1u64.into(), 3u64.into()];
        assert_ne!(leaf, LeafId::derive(&recipients, &other_amounts));
    }

    #[test]
    fn test_executed_set() {
        let mut set = ExecutedSet::new();
        let leaf = LeafId([7u8; 32]);

        assert!(!set.contains(&leaf));
        assert!(set.insert(leaf));
        assert!(set.contains(&leaf));
        assert!(!set.insert(leaf)); // replay rejected
        assert_eq!(set.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_leaf_deterministic(
            seeds in prop::collection::vec((any::<[u8; 32]>(), any::<u128>()), 1..16)
        ) {
            let recipients: Vec<AccountId> =
                seeds.iter().map(|(r, _)| AccountId::from_bytes(*r)).collect();
            let amounts: Vec<Amount> = seeds.iter().map(|(_, a)| Amount::new(*a)).collect();

            prop_assert_eq!(
                LeafId::derive(&recipients, &amounts),
                LeafId::derive(&recipients, &amounts)
            );
        }

        #[test]
        fn prop_leaf_injective_on_amount_change(
            seeds in prop::collection::vec((any::<[u8; 32]>(), any::<u128>()), 1..16),
            idx in any::<prop::sample::Index>(),
            delta in 1u128..1_000_000,
        ) {
            let recipients: Vec<AccountId> =
                seeds.iter().map(|(r, _)| AccountId::from_bytes(*r)).collect();
            let amounts: Vec<Amount> = seeds.iter().map(|(_, a)| Amount::new(*a)).collect();

            let i = idx.index(amounts.len());
            let mut tweaked = amounts.clone();
            tweaked[i] = Amount::new(tweaked[i].0.wrapping_add(delta));

            prop_assert_ne!(
                LeafId::derive(&recipients, &amounts),
                LeafId::derive(&recipients, &tweaked)
            );
        }
    }
}

//! Off-chain tree builder for the claim trees. Produces roots and proofs that
//! `utils::verify_merkle_proof` accepts. Host builds only.

use anchor_lang::prelude::Pubkey;

use crate::utils::{hash_pair, leaf_hash};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub index: u64,
    pub account: Pubkey,
    pub amount: u64,
}

pub struct MerkleTree {
    // levels[0] are the leaves, the last level holds the root
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    pub fn from_leaves(leaves: Vec<[u8; 32]>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let mut levels = vec![leaves];
        while let Some(last) = levels.last() {
            if last.len() == 1 {
                break;
            }
            // an odd node is carried up unchanged
            let next = last
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => hash_pair(a, b),
                    _ => pair[0],
                })
                .collect();
            levels.push(next);
        }
        Some(Self { levels })
    }

    pub fn from_allocations(allocations: &[Allocation]) -> Option<Self> {
        Self::from_leaves(
            allocations
                .iter()
                .map(|a| leaf_hash(a.index, &a.account, a.amount))
                .collect(),
        )
    }

    pub fn root(&self) -> [u8; 32] {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_default()
    }

    /// Sibling hashes from the leaf at `position` up to the root.
    pub fn proof(&self, position: usize) -> Option<Vec<[u8; 32]>> {
        if position >= self.levels[0].len() {
            return None;
        }

        let mut proof = Vec::new();
        let mut pos = position;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = pos ^ 1;
            if let Some(node) = level.get(sibling) {
                proof.push(*node);
            }
            pos /= 2;
        }
        Some(proof)
    }
}

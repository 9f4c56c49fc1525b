use anchor_lang::prelude::*;
use solana_sha256_hasher::hashv;

use crate::constants::{DRAW_REQUEST_DOMAIN, REVEAL_DOMAIN};
use crate::errors::FairDropError;

// -------------------------
// Merkle leaves + proofs
// -------------------------

/// Canonical leaf for both claim trees: `index u64 LE ‖ pubkey ‖ amount u64 LE`.
pub fn leaf_hash(index: u64, account: &Pubkey, amount: u64) -> [u8; 32] {
    hashv(&[
        index.to_le_bytes().as_ref(),
        account.as_ref(),
        amount.to_le_bytes().as_ref(),
    ])
    .to_bytes()
}

/// Internal node: the smaller child goes first.
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    if a <= b {
        hashv(&[a.as_ref(), b.as_ref()]).to_bytes()
    } else {
        hashv(&[b.as_ref(), a.as_ref()]).to_bytes()
    }
}

pub fn verify_merkle_proof(proof: &[[u8; 32]], root: &[u8; 32], leaf: [u8; 32]) -> bool {
    let computed = proof
        .iter()
        .fold(leaf, |acc, sibling| hash_pair(&acc, sibling));
    computed == *root
}

// -------------------------
// Reveal: starting index + permutation
// -------------------------

/// Starting offset in `[1, span)` derived from the previous slot hash and the
/// current slot. `0` is reserved for "unrevealed" and is bumped to `1`.
pub fn derive_starting_index(prev_hash: &[u8; 32], slot: u64, span: u64) -> Result<u64> {
    require!(span > 0, FairDropError::InvalidSaleConfig);

    let h = hashv(&[REVEAL_DOMAIN, prev_hash.as_ref(), slot.to_le_bytes().as_ref()]).to_bytes();
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&h[..8]);

    let index = u64::from_le_bytes(raw) % span;
    Ok(if index == 0 { 1 } else { index })
}

/// Maps a mint index to its final item id. Ids below `exempt` keep their
/// identity; the rest are rotated by `starting_index` inside `[exempt, max_supply)`.
pub fn permute_mint_index(
    mint_index: u64,
    starting_index: u64,
    exempt: u64,
    max_supply: u64,
) -> Result<u64> {
    require!(mint_index < max_supply, FairDropError::InvalidQuantity);
    if mint_index < exempt {
        return Ok(mint_index);
    }

    let span = max_supply - exempt;
    let offset = (mint_index - exempt)
        .checked_add(starting_index % span)
        .ok_or(FairDropError::MathOverflow)?;
    Ok(offset % span + exempt)
}

// -------------------------
// Draw randomness
// -------------------------

/// Reduces a 32-byte big-endian integer modulo `modulus`, exactly.
pub fn reduce_randomness(raw: &[u8; 32], modulus: u64) -> u64 {
    if modulus == 0 {
        return 0;
    }
    let m = modulus as u128;
    raw.iter()
        .fold(0u128, |acc, byte| ((acc << 8) | *byte as u128) % m) as u64
}

pub fn draw_request_id(book: &Pubkey, nonce: u64) -> [u8; 32] {
    hashv(&[DRAW_REQUEST_DOMAIN, book.as_ref(), nonce.to_le_bytes().as_ref()]).to_bytes()
}

// -------------------------
// Sysvar helpers
// -------------------------

/// Most recent `(slot, hash)` out of raw `SlotHashes` sysvar data:
/// `len u64 LE` followed by `len` entries of `slot u64 LE ‖ hash [u8; 32]`, newest first.
pub fn parse_latest_slot_hash(data: &[u8]) -> Result<(u64, [u8; 32])> {
    require!(data.len() >= 8 + 8 + 32, FairDropError::SlotHashesUnavailable);

    let len = u64::from_le_bytes(
        data[0..8]
            .try_into()
            .map_err(|_| error!(FairDropError::SlotHashesUnavailable))?,
    );
    require!(len > 0, FairDropError::SlotHashesUnavailable);

    let slot = u64::from_le_bytes(
        data[8..16]
            .try_into()
            .map_err(|_| error!(FairDropError::SlotHashesUnavailable))?,
    );
    let hash: [u8; 32] = data[16..48]
        .try_into()
        .map_err(|_| error!(FairDropError::SlotHashesUnavailable))?;

    Ok((slot, hash))
}

/// The running instruction must be a top-level instruction of this program.
/// Under CPI the top-level instruction belongs to the calling program.
pub fn ensure_top_level(top_level_program: &Pubkey, program_id: &Pubkey) -> Result<()> {
    require_keys_eq!(*top_level_program, *program_id, FairDropError::NotExternallyOwned);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_order_does_not_matter_for_pairs() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
    }

    #[test]
    fn single_leaf_tree_verifies_with_empty_proof() {
        let user = Pubkey::new_unique();
        let leaf = leaf_hash(0, &user, 3);
        assert!(verify_merkle_proof(&[], &leaf, leaf));
        assert!(!verify_merkle_proof(&[], &leaf, leaf_hash(0, &user, 4)));
    }

    #[test]
    fn leaf_binds_every_field() {
        let user = Pubkey::new_unique();
        let base = leaf_hash(3, &user, 5);
        assert_ne!(base, leaf_hash(4, &user, 5));
        assert_ne!(base, leaf_hash(3, &Pubkey::new_unique(), 5));
        assert_ne!(base, leaf_hash(3, &user, 6));
    }

    #[test]
    fn permutation_is_bijective_on_small_supply() {
        let (max_supply, exempt, starting_index) = (10u64, 2u64, 4u64);

        let mut image: Vec<u64> = (exempt..max_supply)
            .map(|i| permute_mint_index(i, starting_index, exempt, max_supply).unwrap())
            .collect();
        image.sort_unstable();
        assert_eq!(image, (2..10).collect::<Vec<_>>());

        assert_eq!(permute_mint_index(0, starting_index, exempt, max_supply).unwrap(), 0);
        assert_eq!(permute_mint_index(1, starting_index, exempt, max_supply).unwrap(), 1);
        assert_eq!(permute_mint_index(2, starting_index, exempt, max_supply).unwrap(), 6);
        assert_eq!(permute_mint_index(9, starting_index, exempt, max_supply).unwrap(), 5);
    }

    #[test]
    fn permutation_is_bijective_for_every_offset() {
        for max_supply in 1..=12u64 {
            for exempt in 0..max_supply {
                for s in 1..(max_supply - exempt + 2) {
                    let mut image: Vec<u64> = (0..max_supply)
                        .map(|i| permute_mint_index(i, s, exempt, max_supply).unwrap())
                        .collect();
                    image.sort_unstable();
                    assert_eq!(image, (0..max_supply).collect::<Vec<_>>());
                }
            }
        }
    }

    #[test]
    fn permutation_rejects_out_of_range_index() {
        assert!(permute_mint_index(10, 4, 2, 10).is_err());
    }

    #[test]
    fn starting_index_is_never_zero() {
        let prev = [7u8; 32];
        for slot in 0..200u64 {
            let idx = derive_starting_index(&prev, slot, 2).unwrap();
            assert_eq!(idx, 1);
        }
        for slot in 0..200u64 {
            let idx = derive_starting_index(&prev, slot, 97).unwrap();
            assert!(idx >= 1 && idx < 97);
        }
        assert!(derive_starting_index(&prev, 1, 0).is_err());
    }

    #[test]
    fn reduce_randomness_matches_small_values() {
        let mut raw = [0u8; 32];
        raw[31] = 250;
        assert_eq!(reduce_randomness(&raw, 100), 50);
        raw[30] = 1; // 256 + 250 = 506
        assert_eq!(reduce_randomness(&raw, 100), 6);
        assert_eq!(reduce_randomness(&[0u8; 32], 7), 0);
        assert_eq!(reduce_randomness(&[0xff; 32], 1), 0);
        // 2^256 - 1 is divisible by 3 and 5
        assert_eq!(reduce_randomness(&[0xff; 32], 3), 0);
        assert_eq!(reduce_randomness(&[0xff; 32], 5), 0);
    }

    #[test]
    fn request_ids_differ_by_nonce_and_book() {
        let book = Pubkey::new_unique();
        assert_ne!(draw_request_id(&book, 0), draw_request_id(&book, 1));
        assert_ne!(draw_request_id(&book, 0), draw_request_id(&Pubkey::new_unique(), 0));
    }

    #[test]
    fn slot_hashes_layout() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u64.to_le_bytes());
        data.extend_from_slice(&99u64.to_le_bytes());
        data.extend_from_slice(&[9u8; 32]);
        data.extend_from_slice(&98u64.to_le_bytes());
        data.extend_from_slice(&[8u8; 32]);

        let (slot, hash) = parse_latest_slot_hash(&data).unwrap();
        assert_eq!(slot, 99);
        assert_eq!(hash, [9u8; 32]);

        let mut empty = vec![0u8; 48];
        empty[0..8].copy_from_slice(&0u64.to_le_bytes());
        assert!(parse_latest_slot_hash(&empty).is_err());
        assert!(parse_latest_slot_hash(&data[..20]).is_err());
    }

    #[test]
    fn top_level_check() {
        let program = Pubkey::new_unique();
        assert!(ensure_top_level(&program, &program).is_ok());
        assert!(ensure_top_level(&Pubkey::new_unique(), &program).is_err());
    }
}

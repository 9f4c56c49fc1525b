use anchor_lang::prelude::*;

use crate::{
    constants::MAX_CLAIM_LEAVES,
    errors::FairDropError,
    events::{AllocationClaimed, FreebiesClaimed},
    state::{ClaimBitmap, FreebieRecord, Sale},
    utils::{leaf_hash, verify_merkle_proof},
    Claim, ClaimFreebies,
};

/// Fixed-allocation claim: the whole leaf amount, exactly once per leaf.
/// Returns the first id minted to `recipient`.
pub fn claim_core(
    sale: &mut Sale,
    bitmap: &mut ClaimBitmap,
    index: u64,
    recipient: &Pubkey,
    amount: u64,
    proof: &[[u8; 32]],
) -> Result<u64> {
    let leaf = leaf_hash(index, recipient, amount);
    require!(
        verify_merkle_proof(proof, &sale.config.claim_root, leaf),
        FairDropError::InvalidProof
    );
    require!(index < MAX_CLAIM_LEAVES, FairDropError::InvalidLeafIndex);
    require!(!bitmap.is_claimed(index), FairDropError::AlreadyClaimed);
    require!(amount > 0, FairDropError::InvalidQuantity);
    require!(
        amount <= sale.claimable_remaining,
        FairDropError::ExceedsRemainingSupply
    );

    let first_id = sale.total_minted;
    let total_minted = first_id
        .checked_add(amount)
        .ok_or(FairDropError::MathOverflow)?;

    bitmap.set_claimed(index)?;
    sale.total_minted = total_minted;
    sale.claimable_remaining -= amount;
    Ok(first_id)
}

/// Capped cumulative claim against the freebies root installed by stop-sale.
/// Freebies draw from unsold supply, never from the allocation carve-out.
pub fn claim_freebies_core(
    sale: &mut Sale,
    record: &mut FreebieRecord,
    index: u64,
    recipient: &Pubkey,
    max_amount: u64,
    proof: &[[u8; 32]],
    requested: u64,
) -> Result<u64> {
    let stop = sale.stop.ok_or(FairDropError::FreebiesNotOpen)?;

    let leaf = leaf_hash(index, recipient, max_amount);
    require!(
        verify_merkle_proof(proof, &stop.freebies_root, leaf),
        FairDropError::InvalidProof
    );
    require!(requested > 0, FairDropError::InvalidQuantity);

    let claimed = record
        .claimed
        .checked_add(requested)
        .ok_or(FairDropError::MathOverflow)?;
    require!(claimed <= max_amount, FairDropError::ExceedsPerAddressCap);
    require!(
        requested <= sale.purchasable_supply(),
        FairDropError::ExceedsRemainingSupply
    );

    let first_id = sale.total_minted;
    sale.total_minted = first_id
        .checked_add(requested)
        .ok_or(FairDropError::MathOverflow)?;
    record.claimed = claimed;
    Ok(first_id)
}

// -------------------------
// Handlers
// -------------------------
pub fn claim(
    ctx: Context<Claim>,
    index: u64,
    recipient: Pubkey,
    amount: u64,
    proof: Vec<[u8; 32]>,
) -> Result<()> {
    let sale_key = ctx.accounts.sale.key();
    let first_id = claim_core(
        &mut ctx.accounts.sale,
        &mut ctx.accounts.claim_bitmap,
        index,
        &recipient,
        amount,
        &proof,
    )?;

    emit!(AllocationClaimed {
        sale: sale_key,
        recipient,
        leaf_index: index,
        first_id,
        amount,
    });
    msg!(
        "Claim successful - Recipient: {}, Amount: {}, Leaf: {}",
        recipient,
        amount,
        index
    );
    Ok(())
}

pub fn claim_freebies(
    ctx: Context<ClaimFreebies>,
    index: u64,
    recipient: Pubkey,
    max_amount: u64,
    proof: Vec<[u8; 32]>,
    requested: u64,
) -> Result<()> {
    let sale_key = ctx.accounts.sale.key();

    let record = &mut ctx.accounts.freebie_record;
    if record.recipient == Pubkey::default() {
        record.sale = sale_key;
        record.recipient = recipient;
        record.bump = ctx.bumps.freebie_record;
        record.claimed = 0;
    }

    let first_id = claim_freebies_core(
        &mut ctx.accounts.sale,
        record,
        index,
        &recipient,
        max_amount,
        &proof,
        requested,
    )?;

    emit!(FreebiesClaimed {
        sale: sale_key,
        recipient,
        first_id,
        amount: requested,
        total_claimed: record.claimed,
    });
    msg!(
        "Freebies claimed - Recipient: {}, Amount: {}, Total: {}",
        recipient,
        requested,
        record.claimed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::{Allocation, MerkleTree};
    use crate::state::SaleStop;
    use crate::test_utils::*;

    struct Fixture {
        sale: Sale,
        allocations: Vec<Allocation>,
        tree: MerkleTree,
    }

    fn allocation_fixture() -> Fixture {
        let allocations: Vec<Allocation> = [(0u64, 2u64), (1, 4), (2, 1), (3, 5)]
            .iter()
            .map(|&(index, amount)| Allocation {
                index,
                account: Pubkey::new_unique(),
                amount,
            })
            .collect();
        let tree = MerkleTree::from_allocations(&allocations).unwrap();

        let mut cfg = sale_config();
        cfg.claim_root = tree.root();
        cfg.claimable_supply = 12;
        Fixture {
            sale: live_sale(cfg),
            allocations,
            tree,
        }
    }

    #[test]
    fn claim_succeeds_once() {
        let Fixture { mut sale, allocations, tree } = allocation_fixture();
        let mut bitmap = claim_bitmap();
        let a = &allocations[3];
        let proof = tree.proof(3).unwrap();

        let first = claim_core(&mut sale, &mut bitmap, 3, &a.account, 5, &proof).unwrap();
        assert_eq!(first, 0);
        assert_eq!(sale.total_minted, 5);
        assert_eq!(sale.claimable_remaining, 7);
        assert!(bitmap.is_claimed(3));

        assert_err(
            claim_core(&mut sale, &mut bitmap, 3, &a.account, 5, &proof),
            FairDropError::AlreadyClaimed,
        );
    }

    #[test]
    fn wrong_amount_is_invalid_proof_regardless_of_state() {
        let Fixture { mut sale, allocations, tree } = allocation_fixture();
        let mut bitmap = claim_bitmap();
        let a = &allocations[3];
        let proof = tree.proof(3).unwrap();

        assert_err(
            claim_core(&mut sale, &mut bitmap, 3, &a.account, 6, &proof),
            FairDropError::InvalidProof,
        );
        claim_core(&mut sale, &mut bitmap, 3, &a.account, 5, &proof).unwrap();
        assert_err(
            claim_core(&mut sale, &mut bitmap, 3, &a.account, 6, &proof),
            FairDropError::InvalidProof,
        );
        // another leaf's proof
        assert_err(
            claim_core(&mut sale, &mut bitmap, 3, &a.account, 5, &tree.proof(1).unwrap()),
            FairDropError::InvalidProof,
        );
    }

    #[test]
    fn claims_do_not_touch_purchasable_supply() {
        let Fixture { mut sale, allocations, tree } = allocation_fixture();
        let mut bitmap = claim_bitmap();
        let before = sale.purchasable_supply();

        for (pos, a) in allocations.iter().enumerate() {
            let proof = tree.proof(pos).unwrap();
            claim_core(&mut sale, &mut bitmap, a.index, &a.account, a.amount, &proof).unwrap();
        }
        assert_eq!(sale.claimable_remaining, 0);
        assert_eq!(sale.total_minted, 12);
        assert_eq!(sale.purchasable_supply(), before);
    }

    fn freebies_fixture(left_for_sale: u64) -> (Sale, Vec<Allocation>, MerkleTree) {
        let allocations: Vec<Allocation> = [60u64, 30, 20]
            .iter()
            .enumerate()
            .map(|(i, &amount)| Allocation {
                index: i as u64,
                account: Pubkey::new_unique(),
                amount,
            })
            .collect();
        let tree = MerkleTree::from_allocations(&allocations).unwrap();

        let mut sale = live_sale(sale_config());
        sale.total_minted = 100 - left_for_sale;
        (sale, allocations, tree)
    }

    fn stop(sale: &mut Sale, root: [u8; 32]) {
        sale.stop = Some(SaleStop {
            freebies_root: root,
            reveal_slot: START + 10,
            stopped_slot: START + 10,
        });
    }

    fn record(recipient: Pubkey) -> FreebieRecord {
        FreebieRecord {
            sale: Pubkey::new_unique(),
            recipient,
            bump: 255,
            claimed: 0,
        }
    }

    #[test]
    fn freebies_need_stopped_sale() {
        let (mut sale, allocs, tree) = freebies_fixture(80);
        let alice = &allocs[0];
        let mut rec = record(alice.account);

        assert_err(
            claim_freebies_core(&mut sale, &mut rec, 0, &alice.account, 60, &tree.proof(0).unwrap(), 1),
            FairDropError::FreebiesNotOpen,
        );
    }

    #[test]
    fn freebies_cap_is_cumulative() {
        let (mut sale, allocs, tree) = freebies_fixture(80);
        stop(&mut sale, tree.root());
        let (alice, bob, eve) = (&allocs[0], &allocs[1], &allocs[2]);

        let mut alice_rec = record(alice.account);
        assert_err(
            claim_freebies_core(&mut sale, &mut alice_rec, 0, &alice.account, 60, &tree.proof(1).unwrap(), 1),
            FairDropError::InvalidProof,
        );
        assert_err(
            claim_freebies_core(&mut sale, &mut alice_rec, 0, &alice.account, 60, &tree.proof(0).unwrap(), 61),
            FairDropError::ExceedsPerAddressCap,
        );

        let mut bob_rec = record(bob.account);
        let bob_proof = tree.proof(1).unwrap();
        claim_freebies_core(&mut sale, &mut bob_rec, 1, &bob.account, 30, &bob_proof, 30).unwrap();
        assert_eq!(bob_rec.claimed, 30);
        assert_err(
            claim_freebies_core(&mut sale, &mut bob_rec, 1, &bob.account, 30, &bob_proof, 1),
            FairDropError::ExceedsPerAddressCap,
        );

        let mut eve_rec = record(eve.account);
        let eve_proof = tree.proof(2).unwrap();
        claim_freebies_core(&mut sale, &mut eve_rec, 2, &eve.account, 20, &eve_proof, 10).unwrap();
        claim_freebies_core(&mut sale, &mut eve_rec, 2, &eve.account, 20, &eve_proof, 10).unwrap();
        assert_eq!(eve_rec.claimed, 20);

        // 80 left, 50 gone to bob and eve
        let alice_proof = tree.proof(0).unwrap();
        assert_err(
            claim_freebies_core(&mut sale, &mut alice_rec, 0, &alice.account, 60, &alice_proof, 31),
            FairDropError::ExceedsRemainingSupply,
        );
        let first = claim_freebies_core(&mut sale, &mut alice_rec, 0, &alice.account, 60, &alice_proof, 30).unwrap();
        assert_eq!(first, 70);
        assert_eq!(sale.total_minted, 100);
        assert_eq!(sale.purchasable_supply(), 0);
    }
}

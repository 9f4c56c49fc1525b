use anchor_lang::prelude::*;

use crate::{
    errors::FairDropError,
    events::Revealed,
    state::{RevealState, Sale},
    utils::{derive_starting_index, parse_latest_slot_hash, permute_mint_index},
    Reveal, ViewSale,
};

// -------------------------
// Shared reveal logic
// -------------------------
pub fn reveal_core(sale: &mut Sale, prev_hash: &[u8; 32], current_slot: u64) -> Result<u64> {
    let by_slot = sale
        .effective_reveal_slot()
        .map_or(false, |reveal_slot| current_slot >= reveal_slot);
    require!(
        by_slot || sale.is_exhausted(),
        FairDropError::NotYetRevealable
    );
    require!(
        sale.reveal == RevealState::Pending,
        FairDropError::AlreadyRevealed
    );

    let span = sale
        .max_supply()
        .checked_sub(sale.offset_exempt_count())
        .ok_or(FairDropError::MathOverflow)?;
    let starting_index = derive_starting_index(prev_hash, current_slot, span)?;

    sale.reveal = RevealState::Revealed {
        starting_index,
        revealed_slot: current_slot,
    };
    Ok(starting_index)
}

pub fn item_id_core(sale: &Sale, mint_index: u64) -> Result<u64> {
    let starting_index = sale
        .starting_index()
        .ok_or(FairDropError::NotYetRevealed)?;
    permute_mint_index(
        mint_index,
        starting_index,
        sale.offset_exempt_count(),
        sale.max_supply(),
    )
}

// -------------------------
// Handlers
// -------------------------

/// Callable by anyone once eligible.
pub fn reveal(ctx: Context<Reveal>) -> Result<()> {
    let current_slot = Clock::get()?.slot;

    let prev_hash = {
        let data = ctx.accounts.slot_hashes.try_borrow_data()?;
        parse_latest_slot_hash(&data)?.1
    };

    let sale_key = ctx.accounts.sale.key();
    let starting_index = reveal_core(&mut ctx.accounts.sale, &prev_hash, current_slot)?;

    emit!(Revealed {
        sale: sale_key,
        caller: ctx.accounts.caller.key(),
        starting_index,
        slot: current_slot,
    });
    msg!("Revealed sale {}: starting index {}", sale_key, starting_index);
    Ok(())
}

pub fn item_id(ctx: Context<ViewSale>, mint_index: u64) -> Result<u64> {
    item_id_core(&ctx.accounts.sale, mint_index)
}

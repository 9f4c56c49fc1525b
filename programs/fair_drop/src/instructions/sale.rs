use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};
use anchor_lang::solana_program::{program::invoke, system_instruction};

use crate::{
    errors::FairDropError,
    events::{Minted, Preminted, Refunded, ReserveMinted},
    pricing::PricingModel,
    state::{PurchaseRecord, PurchaseWindow, Sale},
    utils::ensure_top_level,
    AdminSale, MintItems, ViewSale,
};

/// Outcome of a purchase. `charged + refund` is the offered payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintReceipt {
    pub first_id: u64,
    pub quantity: u64,
    pub unit_price: u64,
    pub charged: u64,
    pub refund: u64,
}

// -------------------------
// Public sale
// -------------------------
pub fn mint_core(
    sale: &mut Sale,
    record: &mut PurchaseRecord,
    quantity: u64,
    payment: u64,
    current_slot: u64,
) -> Result<MintReceipt> {
    let cfg = sale.config;

    require!(sale.in_sale_period(current_slot), FairDropError::NotInSalePeriod);
    require!(sale.birth_cert.is_some(), FairDropError::ProvenanceNotSet);
    require!(quantity > 0, FairDropError::InvalidQuantity);
    require!(
        quantity <= cfg.max_per_transaction,
        FairDropError::ExceedsPerTransactionCap
    );

    let window = record.active_window(current_slot, cfg.window_size_slots);
    let by_window = cfg.max_per_window.saturating_sub(window.counter);
    let by_address = cfg.max_per_address.saturating_sub(record.purchased);
    let by_supply = sale.purchasable_supply();

    require!(by_supply > 0, FairDropError::SoldOut);
    let minted = quantity.min(by_window).min(by_address).min(by_supply);
    require!(minted > 0, FairDropError::Unpurchasable);

    // funds are checked against the requested quantity, not the clamped one
    let unit_price = cfg.price_model.price(current_slot);
    let required = unit_price
        .checked_mul(quantity)
        .ok_or(FairDropError::MathOverflow)?;
    require!(payment >= required, FairDropError::InsufficientFunds);

    let charged = unit_price
        .checked_mul(minted)
        .ok_or(FairDropError::MathOverflow)?;
    let refund = payment
        .checked_sub(charged)
        .ok_or(FairDropError::MathOverflow)?;

    let first_id = sale.total_minted;
    let total_minted = first_id
        .checked_add(minted)
        .ok_or(FairDropError::MathOverflow)?;
    let total_proceeds = sale
        .total_proceeds
        .checked_add(charged)
        .ok_or(FairDropError::MathOverflow)?;
    let counter = window
        .counter
        .checked_add(minted)
        .ok_or(FairDropError::MathOverflow)?;
    let purchased = record
        .purchased
        .checked_add(minted)
        .ok_or(FairDropError::MathOverflow)?;

    sale.total_minted = total_minted;
    sale.total_proceeds = total_proceeds;
    record.window = Some(PurchaseWindow {
        start_slot: window.start_slot,
        counter,
    });
    record.purchased = purchased;

    Ok(MintReceipt {
        first_id,
        quantity: minted,
        unit_price,
        charged,
        refund,
    })
}

/// Units `record`'s owner could still buy at `current_slot`, ignoring supply.
pub fn maximum_purchasable_core(
    sale: &Sale,
    record: Option<&PurchaseRecord>,
    current_slot: u64,
) -> u64 {
    let cfg = &sale.config;
    match record {
        None => cfg.max_per_window.min(cfg.max_per_address),
        Some(r) => {
            let window = r.active_window(current_slot, cfg.window_size_slots);
            cfg.max_per_window
                .saturating_sub(window.counter)
                .min(cfg.max_per_address.saturating_sub(r.purchased))
        }
    }
}

// -------------------------
// Pre-sale intake
// -------------------------
fn check_intake_open(sale: &Sale, caller: &Pubkey, quantity: u64, current_slot: u64) -> Result<()> {
    require_keys_eq!(sale.admin, *caller, FairDropError::Unauthorized);
    require!(quantity > 0, FairDropError::InvalidQuantity);
    require!(
        current_slot < sale.config.start_slot,
        FairDropError::SaleAlreadyStarted
    );
    require!(sale.birth_cert.is_none(), FairDropError::ProvenanceAlreadySet);
    Ok(())
}

/// Reserve ids must stay the prefix `[0, reserve_count)`, so reserve intake is
/// closed as soon as anything else was minted. Before the birth certificate
/// only premint and allocation claims can do that.
pub fn mint_reserve_core(
    sale: &mut Sale,
    caller: &Pubkey,
    quantity: u64,
    current_slot: u64,
) -> Result<u64> {
    check_intake_open(sale, caller, quantity, current_slot)?;
    require!(sale.premint_count == 0, FairDropError::ReserveAfterPremint);
    require!(
        sale.total_minted == sale.reserve_count,
        FairDropError::ReserveAfterClaim
    );

    let reserve_count = sale
        .reserve_count
        .checked_add(quantity)
        .ok_or(FairDropError::MathOverflow)?;
    require!(
        reserve_count <= sale.config.max_reserve,
        FairDropError::ExceedsReserveCap
    );

    let first_id = sale.total_minted;
    sale.reserve_count = reserve_count;
    sale.total_minted = reserve_count;
    Ok(first_id)
}

pub fn premint_core(
    sale: &mut Sale,
    caller: &Pubkey,
    quantity: u64,
    current_slot: u64,
) -> Result<u64> {
    check_intake_open(sale, caller, quantity, current_slot)?;

    let premint_count = sale
        .premint_count
        .checked_add(quantity)
        .ok_or(FairDropError::MathOverflow)?;
    require!(
        premint_count <= sale.config.max_premint,
        FairDropError::ExceedsPremintCap
    );
    require!(
        quantity <= sale.purchasable_supply(),
        FairDropError::ExceedsRemainingSupply
    );

    let first_id = sale.total_minted;
    sale.premint_count = premint_count;
    sale.total_minted = first_id
        .checked_add(quantity)
        .ok_or(FairDropError::MathOverflow)?;
    Ok(first_id)
}

// -------------------------
// Handlers
// -------------------------
pub fn mint_items(ctx: Context<MintItems>, quantity: u64, payment: u64) -> Result<()> {
    // top-level invocations only, never through CPI
    let ix_sys = ctx.accounts.instructions.to_account_info();
    let current_ix = load_current_index_checked(&ix_sys)? as usize;
    let top_level = load_instruction_at_checked(current_ix, &ix_sys)?;
    ensure_top_level(&top_level.program_id, ctx.program_id)?;

    let buyer_key = ctx.accounts.buyer.key();
    let sale_key = ctx.accounts.sale.key();
    require!(
        ctx.accounts.buyer.lamports() >= payment,
        FairDropError::InsufficientFunds
    );

    let current_slot = Clock::get()?.slot;

    let record = &mut ctx.accounts.purchase_record;
    if record.buyer == Pubkey::default() {
        record.sale = sale_key;
        record.buyer = buyer_key;
        record.bump = ctx.bumps.purchase_record;
        record.window = None;
        record.purchased = 0;
    }

    let receipt = mint_core(
        &mut ctx.accounts.sale,
        record,
        quantity,
        payment,
        current_slot,
    )?;

    // only the charge moves; the refund never leaves the buyer
    if receipt.charged > 0 {
        let ix = system_instruction::transfer(&buyer_key, &ctx.accounts.vault.key(), receipt.charged);
        invoke(
            &ix,
            &[
                ctx.accounts.buyer.to_account_info(),
                ctx.accounts.vault.to_account_info(),
                ctx.accounts.system_program.to_account_info(),
            ],
        )?;
    }

    emit!(Minted {
        sale: sale_key,
        owner: buyer_key,
        first_id: receipt.first_id,
        quantity: receipt.quantity,
        unit_price: receipt.unit_price,
        slot: current_slot,
    });
    if receipt.refund > 0 {
        emit!(Refunded {
            sale: sale_key,
            buyer: buyer_key,
            amount: receipt.refund,
            slot: current_slot,
        });
    }

    msg!(
        "Minted {} (requested {}) to {}, first id {}, refund {}",
        receipt.quantity,
        quantity,
        buyer_key,
        receipt.first_id,
        receipt.refund
    );
    Ok(())
}

pub fn mint_reserve(ctx: Context<AdminSale>, quantity: u64) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    let admin = ctx.accounts.admin.key();
    let sale_key = ctx.accounts.sale.key();

    let first_id = mint_reserve_core(&mut ctx.accounts.sale, &admin, quantity, current_slot)?;

    emit!(ReserveMinted {
        sale: sale_key,
        to: admin,
        first_id,
        quantity,
    });
    msg!("Reserve minted: {} from id {}", quantity, first_id);
    Ok(())
}

pub fn premint(ctx: Context<AdminSale>, quantity: u64) -> Result<()> {
    let current_slot = Clock::get()?.slot;
    let admin = ctx.accounts.admin.key();
    let sale_key = ctx.accounts.sale.key();

    let first_id = premint_core(&mut ctx.accounts.sale, &admin, quantity, current_slot)?;

    emit!(Preminted {
        sale: sale_key,
        to: admin,
        first_id,
        quantity,
    });
    msg!("Preminted: {} from id {}", quantity, first_id);
    Ok(())
}

pub fn maximum_purchasable(ctx: Context<ViewSale>) -> Result<u64> {
    let current_slot = Clock::get()?.slot;
    let record = ctx.accounts.purchase_record.as_deref();
    if let Some(r) = record {
        require_keys_eq!(r.sale, ctx.accounts.sale.key(), FairDropError::Unauthorized);
    }
    Ok(maximum_purchasable_core(&ctx.accounts.sale, record, current_slot))
}

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{program::invoke_signed, system_instruction};

use crate::{
    constants::{INITIAL_VERSION, SALE_VAULT_SEED},
    errors::FairDropError,
    events::{BirthCertSet, SaleInitialized, SaleStopped, Withdrawn},
    state::{RevealState, Sale, SaleConfig, SaleStop},
    AdminSale, InitializeSale, Withdraw,
};

pub fn initialize_sale_core(
    sale: &mut Sale,
    admin: Pubkey,
    sale_id: u64,
    config: SaleConfig,
) -> Result<()> {
    config.validate()?;

    sale.admin = admin;
    sale.sale_id = sale_id;
    sale.config = config;
    sale.reserve_count = 0;
    sale.premint_count = 0;
    sale.total_minted = 0;
    sale.claimable_remaining = config.claimable_supply;
    sale.total_proceeds = 0;
    sale.birth_cert = None;
    sale.stop = None;
    sale.reveal = RevealState::Pending;
    sale.version = INITIAL_VERSION;
    Ok(())
}

/// One-shot. Closes reserve/premint intake and opens the public sale.
pub fn set_birth_cert_core(sale: &mut Sale, caller: &Pubkey, birth_cert: [u8; 32]) -> Result<()> {
    require_keys_eq!(sale.admin, *caller, FairDropError::Unauthorized);
    require!(sale.birth_cert.is_none(), FairDropError::ProvenanceAlreadySet);

    sale.birth_cert = Some(birth_cert);
    Ok(())
}

/// One-shot. Freezes purchasing, installs the freebies root and the slot
/// from which reveal becomes eligible.
pub fn stop_sale_core(
    sale: &mut Sale,
    caller: &Pubkey,
    freebies_root: [u8; 32],
    reveal_slot: u64,
    current_slot: u64,
) -> Result<()> {
    require_keys_eq!(sale.admin, *caller, FairDropError::Unauthorized);
    require!(sale.stop.is_none(), FairDropError::SaleAlreadyStopped);

    sale.stop = Some(SaleStop {
        freebies_root,
        reveal_slot,
        stopped_slot: current_slot,
    });
    Ok(())
}

/// `amount == 0` withdraws everything above the vault's rent-exempt minimum.
pub fn withdraw_amount(vault_lamports: u64, min_rent: u64, amount: u64) -> Result<u64> {
    let available = vault_lamports.saturating_sub(min_rent);
    let withdraw = if amount == 0 { available } else { amount };
    require!(withdraw <= available, FairDropError::InsufficientVaultFunds);
    Ok(withdraw)
}

// -------------------------
// Handlers
// -------------------------
pub fn initialize_sale(ctx: Context<InitializeSale>, sale_id: u64, config: SaleConfig) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let vault_key = ctx.accounts.vault.key();
    let bitmap_key = ctx.accounts.claim_bitmap.key();
    let sale_key = ctx.accounts.sale.key();

    let sale = &mut ctx.accounts.sale;
    initialize_sale_core(sale, admin, sale_id, config)?;
    sale.bump = ctx.bumps.sale;
    sale.vault = vault_key;
    sale.vault_bump = ctx.bumps.vault;

    let bitmap = &mut ctx.accounts.claim_bitmap;
    bitmap.sale = sale_key;
    bitmap.bump = ctx.bumps.claim_bitmap;
    bitmap.claimed = Vec::new();

    let slot = Clock::get()?.slot;
    emit!(SaleInitialized {
        sale: sale_key,
        admin,
        vault: vault_key,
        max_sale_supply: config.max_sale_supply,
        start_slot: config.start_slot,
        slot,
    });
    msg!(
        "Sale {} initialized: supply {}, start slot {}, bitmap {}",
        sale_id,
        config.max_sale_supply,
        config.start_slot,
        bitmap_key
    );
    Ok(())
}

pub fn set_birth_cert(ctx: Context<AdminSale>, birth_cert: [u8; 32]) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let sale_key = ctx.accounts.sale.key();
    set_birth_cert_core(&mut ctx.accounts.sale, &admin, birth_cert)?;

    emit!(BirthCertSet {
        sale: sale_key,
        birth_cert,
        slot: Clock::get()?.slot,
    });
    msg!("Birth certificate set for sale {}", sale_key);
    Ok(())
}

pub fn stop_sale(ctx: Context<AdminSale>, freebies_root: [u8; 32], reveal_slot: u64) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let sale_key = ctx.accounts.sale.key();
    let current_slot = Clock::get()?.slot;

    stop_sale_core(
        &mut ctx.accounts.sale,
        &admin,
        freebies_root,
        reveal_slot,
        current_slot,
    )?;

    emit!(SaleStopped {
        sale: sale_key,
        freebies_root,
        reveal_slot,
        slot: current_slot,
    });
    msg!("Sale stopped at slot {}, reveal from slot {}", current_slot, reveal_slot);
    Ok(())
}

pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let sale = &ctx.accounts.sale;
    require_keys_eq!(sale.admin, ctx.accounts.admin.key(), FairDropError::Unauthorized);

    let vault_info = ctx.accounts.vault.to_account_info();
    let min_rent = Rent::get()?.minimum_balance(0); // system account
    let withdraw = withdraw_amount(vault_info.lamports(), min_rent, amount)?;
    if withdraw == 0 {
        return Ok(());
    }

    let ix = system_instruction::transfer(
        &ctx.accounts.vault.key(),
        &ctx.accounts.admin.key(),
        withdraw,
    );

    let sale_key = sale.key();
    let signer_seeds: &[&[u8]] = &[SALE_VAULT_SEED, sale_key.as_ref(), &[sale.vault_bump]];

    invoke_signed(
        &ix,
        &[
            vault_info,
            ctx.accounts.admin.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        ],
        &[signer_seeds],
    )?;

    emit!(Withdrawn {
        sale: sale_key,
        admin: ctx.accounts.admin.key(),
        amount: withdraw,
        slot: Clock::get()?.slot,
    });
    msg!("Withdrew {} lamports from sale vault", withdraw);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn initialize_validates_config() {
        let mut sale = new_sale(sale_config());
        let admin = Pubkey::new_unique();

        let mut bad = sale_config();
        bad.max_per_window = 0;
        assert_err(
            initialize_sale_core(&mut sale, admin, 7, bad),
            FairDropError::InvalidSaleConfig,
        );

        let mut cfg = sale_config();
        cfg.claimable_supply = 12;
        initialize_sale_core(&mut sale, admin, 7, cfg).unwrap();
        assert_eq!(sale.admin, admin);
        assert_eq!(sale.sale_id, 7);
        assert_eq!(sale.claimable_remaining, 12);
        assert_eq!(sale.reveal, RevealState::Pending);
    }

    #[test]
    fn birth_cert_is_set_once() {
        let mut sale = new_sale(sale_config());
        let admin = sale.admin;

        assert_err(
            set_birth_cert_core(&mut sale, &Pubkey::new_unique(), [1u8; 32]),
            FairDropError::Unauthorized,
        );
        set_birth_cert_core(&mut sale, &admin, [1u8; 32]).unwrap();
        assert_err(
            set_birth_cert_core(&mut sale, &admin, [2u8; 32]),
            FairDropError::ProvenanceAlreadySet,
        );
        assert_eq!(sale.birth_cert, Some([1u8; 32]));
    }

    #[test]
    fn stop_sale_is_one_shot_and_closes_the_sale() {
        let mut sale = live_sale(sale_config());
        let admin = sale.admin;
        assert!(sale.in_sale_period(START + 10));

        stop_sale_core(&mut sale, &admin, [9u8; 32], START + 10, START + 10).unwrap();
        assert!(!sale.in_sale_period(START + 11));
        assert_eq!(sale.effective_reveal_slot(), Some(START + 10));

        assert_err(
            stop_sale_core(&mut sale, &admin, [8u8; 32], START + 20, START + 20),
            FairDropError::SaleAlreadyStopped,
        );
        assert_eq!(sale.stop.map(|s| s.freebies_root), Some([9u8; 32]));
    }

    #[test]
    fn withdraw_amounts() {
        assert_eq!(withdraw_amount(1_000, 100, 0).unwrap(), 900);
        assert_eq!(withdraw_amount(1_000, 100, 400).unwrap(), 400);
        assert_eq!(withdraw_amount(50, 100, 0).unwrap(), 0);
        assert_err(
            withdraw_amount(1_000, 100, 901),
            FairDropError::InsufficientVaultFunds,
        );
    }
}

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{
    CLAIM_BITMAP_SEED, FREEBIE_SEED, PURCHASE_SEED, SALE_SEED, SALE_VAULT_SEED, TICKET_BOOK_SEED,
};
use crate::errors::FairDropError;
use crate::state::{ClaimBitmap, FreebieRecord, PurchaseRecord, Sale, TicketBook};

// -----------------
// Sale
// -----------------

#[derive(Accounts)]
#[instruction(sale_id: u64)]
pub struct InitializeSale<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + Sale::INIT_SPACE,
        seeds = [SALE_SEED, admin.key().as_ref(), sale_id.to_le_bytes().as_ref()],
        bump
    )]
    pub sale: Account<'info, Sale>,

    /// CHECK: system-owned vault PDA, holds lamports, no data
    #[account(
        init,
        payer = admin,
        space = 0,
        owner = anchor_lang::solana_program::system_program::ID,
        seeds = [SALE_VAULT_SEED, sale.key().as_ref()],
        bump
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(
        init,
        payer = admin,
        space = 8 + ClaimBitmap::INIT_SPACE,
        seeds = [CLAIM_BITMAP_SEED, sale.key().as_ref()],
        bump
    )]
    pub claim_bitmap: Account<'info, ClaimBitmap>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Owner-gated single-account sale operations (intake, birth cert, stop).
#[derive(Accounts)]
pub struct AdminSale<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.admin.as_ref(), sale.sale_id.to_le_bytes().as_ref()],
        bump = sale.bump
    )]
    pub sale: Account<'info, Sale>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct MintItems<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.admin.as_ref(), sale.sale_id.to_le_bytes().as_ref()],
        bump = sale.bump
    )]
    pub sale: Account<'info, Sale>,

    /// CHECK: system-owned vault PDA. Address enforced against the sale.
    #[account(mut, address = sale.vault @ FairDropError::Unauthorized)]
    pub vault: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = buyer,
        space = 8 + PurchaseRecord::INIT_SPACE,
        seeds = [PURCHASE_SEED, sale.key().as_ref(), buyer.key().as_ref()],
        bump
    )]
    pub purchase_record: Account<'info, PurchaseRecord>,

    #[account(mut)]
    pub buyer: Signer<'info>,

    /// CHECK: instruction sysvar (top-level invocation check). Address enforced.
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Read-only queries (`item_id`, `maximum_purchasable`).
#[derive(Accounts)]
pub struct ViewSale<'info> {
    #[account(
        seeds = [SALE_SEED, sale.admin.as_ref(), sale.sale_id.to_le_bytes().as_ref()],
        bump = sale.bump
    )]
    pub sale: Account<'info, Sale>,

    /// Checked against `sale` in the handler when present.
    pub purchase_record: Option<Account<'info, PurchaseRecord>>,
}

#[derive(Accounts)]
pub struct Reveal<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.admin.as_ref(), sale.sale_id.to_le_bytes().as_ref()],
        bump = sale.bump
    )]
    pub sale: Account<'info, Sale>,

    /// CHECK: SlotHashes sysvar, parsed by hand. Address enforced.
    #[account(address = anchor_lang::solana_program::sysvar::slot_hashes::ID)]
    pub slot_hashes: UncheckedAccount<'info>,

    pub caller: Signer<'info>,
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(
        seeds = [SALE_SEED, sale.admin.as_ref(), sale.sale_id.to_le_bytes().as_ref()],
        bump = sale.bump
    )]
    pub sale: Account<'info, Sale>,

    /// CHECK: system-owned vault PDA. Address enforced by seeds/bump.
    #[account(
        mut,
        seeds = [SALE_VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

// -----------------
// Claims
// -----------------

#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.admin.as_ref(), sale.sale_id.to_le_bytes().as_ref()],
        bump = sale.bump
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        mut,
        seeds = [CLAIM_BITMAP_SEED, sale.key().as_ref()],
        bump = claim_bitmap.bump
    )]
    pub claim_bitmap: Account<'info, ClaimBitmap>,

    pub claimer: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(index: u64, recipient: Pubkey)]
pub struct ClaimFreebies<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.admin.as_ref(), sale.sale_id.to_le_bytes().as_ref()],
        bump = sale.bump
    )]
    pub sale: Account<'info, Sale>,

    #[account(
        init_if_needed,
        payer = claimer,
        space = 8 + FreebieRecord::INIT_SPACE,
        seeds = [FREEBIE_SEED, sale.key().as_ref(), recipient.as_ref()],
        bump
    )]
    pub freebie_record: Account<'info, FreebieRecord>,

    #[account(mut)]
    pub claimer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

// -----------------
// Ticket draw
// -----------------

#[derive(Accounts)]
#[instruction(book_id: u64)]
pub struct InitializeDraw<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + TicketBook::INIT_SPACE,
        seeds = [TICKET_BOOK_SEED, admin.key().as_ref(), book_id.to_le_bytes().as_ref()],
        bump
    )]
    pub ticket_book: Account<'info, TicketBook>,

    pub fee_mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct IssueTickets<'info> {
    #[account(
        mut,
        seeds = [TICKET_BOOK_SEED, ticket_book.admin.as_ref(), ticket_book.book_id.to_le_bytes().as_ref()],
        bump = ticket_book.bump
    )]
    pub ticket_book: Account<'info, TicketBook>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct Draw<'info> {
    #[account(
        mut,
        seeds = [TICKET_BOOK_SEED, ticket_book.admin.as_ref(), ticket_book.book_id.to_le_bytes().as_ref()],
        bump = ticket_book.bump
    )]
    pub ticket_book: Account<'info, TicketBook>,

    #[account(
        mut,
        constraint = admin_fee_account.mint == ticket_book.fee_mint @ FairDropError::InsufficientFeeBalance,
        constraint = admin_fee_account.owner == admin.key() @ FairDropError::Unauthorized
    )]
    pub admin_fee_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = oracle_fee_account.mint == ticket_book.fee_mint @ FairDropError::NotOracle,
        constraint = oracle_fee_account.owner == ticket_book.oracle @ FairDropError::NotOracle
    )]
    pub oracle_fee_account: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct FulfillRandomness<'info> {
    #[account(
        mut,
        seeds = [TICKET_BOOK_SEED, ticket_book.admin.as_ref(), ticket_book.book_id.to_le_bytes().as_ref()],
        bump = ticket_book.bump
    )]
    pub ticket_book: Account<'info, TicketBook>,

    pub oracle: Signer<'info>,
}

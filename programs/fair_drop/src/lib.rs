use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod errors;
pub mod events;
pub mod instructions;
#[cfg(not(target_os = "solana"))]
pub mod merkle;
pub mod pricing;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use constants::*;
pub use contexts::*;
pub use errors::*;
pub use events::*;
pub use pricing::*;
pub use state::*;

declare_id!("HM3qvkPLfiXTWdErzbGonXN4CrqK3sGyqyTkRCcoRCnL");

#[program]
pub mod fair_drop {
    use super::*;
    use crate::instructions::{admin, claim, draw, reveal, sale};

    // ----------------------------
    // Sale setup + admin
    // ----------------------------
    pub fn initialize_sale(
        ctx: Context<InitializeSale>,
        sale_id: u64,
        config: SaleConfig,
    ) -> Result<()> {
        admin::initialize_sale(ctx, sale_id, config)
    }

    pub fn set_birth_cert(ctx: Context<AdminSale>, birth_cert: [u8; 32]) -> Result<()> {
        admin::set_birth_cert(ctx, birth_cert)
    }

    pub fn mint_reserve(ctx: Context<AdminSale>, quantity: u64) -> Result<()> {
        sale::mint_reserve(ctx, quantity)
    }

    pub fn premint(ctx: Context<AdminSale>, quantity: u64) -> Result<()> {
        sale::premint(ctx, quantity)
    }

    pub fn stop_sale(
        ctx: Context<AdminSale>,
        freebies_root: [u8; 32],
        reveal_slot: u64,
    ) -> Result<()> {
        admin::stop_sale(ctx, freebies_root, reveal_slot)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        admin::withdraw(ctx, amount)
    }

    // ----------------------------
    // Public sale
    // ----------------------------
    pub fn mint_items(ctx: Context<MintItems>, quantity: u64, payment: u64) -> Result<()> {
        sale::mint_items(ctx, quantity, payment)
    }

    pub fn maximum_purchasable(ctx: Context<ViewSale>) -> Result<u64> {
        sale::maximum_purchasable(ctx)
    }

    // ----------------------------
    // Reveal
    // ----------------------------
    pub fn reveal(ctx: Context<Reveal>) -> Result<()> {
        reveal::reveal(ctx)
    }

    pub fn item_id(ctx: Context<ViewSale>, mint_index: u64) -> Result<u64> {
        reveal::item_id(ctx, mint_index)
    }

    // ----------------------------
    // Claims
    // ----------------------------
    pub fn claim(
        ctx: Context<Claim>,
        index: u64,
        recipient: Pubkey,
        amount: u64,
        proof: Vec<[u8; 32]>,
    ) -> Result<()> {
        claim::claim(ctx, index, recipient, amount, proof)
    }

    pub fn claim_freebies(
        ctx: Context<ClaimFreebies>,
        index: u64,
        recipient: Pubkey,
        max_amount: u64,
        proof: Vec<[u8; 32]>,
        requested: u64,
    ) -> Result<()> {
        claim::claim_freebies(ctx, index, recipient, max_amount, proof, requested)
    }

    // ----------------------------
    // Ticket draw
    // ----------------------------
    pub fn initialize_draw(
        ctx: Context<InitializeDraw>,
        book_id: u64,
        oracle: Pubkey,
        fee_per_request: u64,
        max_whitelist_spots: u64,
    ) -> Result<()> {
        draw::initialize_draw(ctx, book_id, oracle, fee_per_request, max_whitelist_spots)
    }

    pub fn issue_tickets(ctx: Context<IssueTickets>, owners: Vec<Pubkey>) -> Result<()> {
        draw::issue_tickets(ctx, owners)
    }

    pub fn draw(ctx: Context<Draw>, count: u64) -> Result<()> {
        draw::draw(ctx, count)
    }

    pub fn fulfill_randomness(
        ctx: Context<FulfillRandomness>,
        request_id: [u8; 32],
        randomness: [u8; 32],
    ) -> Result<()> {
        draw::fulfill_randomness(ctx, request_id, randomness)
    }
}

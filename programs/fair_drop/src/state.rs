use anchor_lang::prelude::*;

use crate::constants::{MAX_CLAIM_LEAVES, MAX_TICKETS};
use crate::errors::FairDropError;
use crate::pricing::PriceModel;

// -----------------
// Sale
// -----------------

/// Fixed at `initialize_sale`, never modified afterwards.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct SaleConfig {
    /// Units sold, preminted or claimed. Reserve intake comes on top.
    pub max_sale_supply: u64,
    pub start_slot: u64,
    /// `None` reveals on sellout only (or at the slot installed by stop-sale).
    pub reveal_slot: Option<u64>,
    pub price_model: PriceModel,

    pub max_reserve: u64,
    pub max_premint: u64,
    pub max_per_address: u64,
    pub max_per_transaction: u64,
    pub window_size_slots: u64,
    pub max_per_window: u64,

    /// Root of the fixed-allocation claim tree, and the sum of its amounts.
    pub claim_root: [u8; 32],
    pub claimable_supply: u64,
}

impl SaleConfig {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.max_sale_supply > 0
                && self.max_per_address > 0
                && self.max_per_transaction > 0
                && self.window_size_slots > 0
                && self.max_per_window > 0,
            FairDropError::InvalidSaleConfig
        );
        require!(
            self.claimable_supply <= self.max_sale_supply,
            FairDropError::InvalidSaleConfig
        );
        require!(
            self.max_premint <= self.max_sale_supply - self.claimable_supply,
            FairDropError::InvalidSaleConfig
        );
        require!(
            self.max_sale_supply.checked_add(self.max_reserve).is_some(),
            FairDropError::InvalidSaleConfig
        );
        if let Some(reveal_slot) = self.reveal_slot {
            require!(reveal_slot > self.start_slot, FairDropError::InvalidSaleConfig);
        }
        self.price_model.validate()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct SaleStop {
    pub freebies_root: [u8; 32],
    pub reveal_slot: u64,
    pub stopped_slot: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum RevealState {
    Pending,
    Revealed { starting_index: u64, revealed_slot: u64 },
}

#[account]
#[derive(InitSpace)]
pub struct Sale {
    pub admin: Pubkey,
    pub sale_id: u64,
    pub bump: u8,

    // System-owned PDA vault (holds lamports, no data)
    pub vault: Pubkey,
    pub vault_bump: u8,

    pub config: SaleConfig,

    pub reserve_count: u64,
    pub premint_count: u64,
    pub total_minted: u64,
    pub claimable_remaining: u64,
    pub total_proceeds: u64,

    // one-shot transitions
    pub birth_cert: Option<[u8; 32]>,
    pub stop: Option<SaleStop>,
    pub reveal: RevealState,

    pub version: u16,
}

impl Sale {
    /// Sale supply plus whatever the reserve intake added.
    pub fn max_supply(&self) -> u64 {
        self.config.max_sale_supply.saturating_add(self.reserve_count)
    }

    /// Reserve ids form the prefix `[0, reserve_count)` and keep their identity.
    pub fn offset_exempt_count(&self) -> u64 {
        self.reserve_count
    }

    /// Units still open to purchase or freebies: the claim carve-out stays held back.
    pub fn purchasable_supply(&self) -> u64 {
        self.max_supply()
            .saturating_sub(self.claimable_remaining)
            .saturating_sub(self.total_minted)
    }

    /// The earlier of the configured slot and the one installed by stop-sale,
    /// so stopping can bring the reveal forward but never push it back.
    pub fn effective_reveal_slot(&self) -> Option<u64> {
        match (self.stop.map(|s| s.reveal_slot), self.config.reveal_slot) {
            (Some(stopped), Some(configured)) => Some(stopped.min(configured)),
            (stopped, configured) => stopped.or(configured),
        }
    }

    pub fn in_sale_period(&self, slot: u64) -> bool {
        self.stop.is_none()
            && slot >= self.config.start_slot
            && self.config.reveal_slot.map_or(true, |r| slot < r)
    }

    /// Everything minted and no allocation left outstanding.
    pub fn is_exhausted(&self) -> bool {
        self.claimable_remaining == 0 && self.total_minted >= self.max_supply()
    }

    pub fn starting_index(&self) -> Option<u64> {
        match self.reveal {
            RevealState::Pending => None,
            RevealState::Revealed { starting_index, .. } => Some(starting_index),
        }
    }
}

// -----------------
// Purchase ledger
// -----------------

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct PurchaseWindow {
    pub start_slot: u64,
    pub counter: u64,
}

#[account]
#[derive(InitSpace)]
pub struct PurchaseRecord {
    pub sale: Pubkey,
    pub buyer: Pubkey,
    pub bump: u8,
    pub window: Option<PurchaseWindow>,
    pub purchased: u64,
}

impl PurchaseRecord {
    /// The window in force at `slot`: a fresh `(slot, 0)` if none was ever
    /// opened or the recorded one has run its length.
    pub fn active_window(&self, slot: u64, window_size: u64) -> PurchaseWindow {
        match self.window {
            Some(w) if slot < w.start_slot.saturating_add(window_size) => w,
            _ => PurchaseWindow {
                start_slot: slot,
                counter: 0,
            },
        }
    }
}

// -----------------
// Claim ledger
// -----------------

#[account]
#[derive(InitSpace)]
pub struct ClaimBitmap {
    pub sale: Pubkey,
    pub bump: u8,
    /// One bit per leaf (1 = claimed). Grows lazily up to `CLAIM_BITMAP_BYTES`.
    #[max_len(256)]
    pub claimed: Vec<u8>,
}

impl ClaimBitmap {
    pub fn is_claimed(&self, index: u64) -> bool {
        let byte_index = (index / 8) as usize;
        let bit_index = (index % 8) as u8;

        match self.claimed.get(byte_index) {
            Some(byte) => (byte >> bit_index) & 1 == 1,
            None => false,
        }
    }

    pub fn set_claimed(&mut self, index: u64) -> Result<()> {
        require!(index < MAX_CLAIM_LEAVES, FairDropError::InvalidLeafIndex);

        let byte_index = (index / 8) as usize;
        let bit_index = (index % 8) as u8;

        if byte_index >= self.claimed.len() {
            self.claimed.resize(byte_index + 1, 0);
        }
        self.claimed[byte_index] |= 1 << bit_index;
        Ok(())
    }
}

#[account]
#[derive(InitSpace)]
pub struct FreebieRecord {
    pub sale: Pubkey,
    pub recipient: Pubkey,
    pub bump: u8,
    pub claimed: u64,
}

// -----------------
// Ticket draw
// -----------------

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum TicketMark {
    Unmarked,
    Marked,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct Ticket {
    pub owner: Pubkey,
    pub mark: TicketMark,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct DrawRequest {
    pub request_id: [u8; 32],
    /// Ticket marked by this request, once fulfilled. Stays `None` when the
    /// fulfillment found nothing left to mark.
    pub ticket_index: Option<u64>,
    pub fulfilled: bool,
}

#[account]
#[derive(InitSpace)]
pub struct TicketBook {
    pub admin: Pubkey,
    pub book_id: u64,
    pub bump: u8,

    pub oracle: Pubkey,
    pub fee_mint: Pubkey,
    pub fee_per_request: u64,

    pub max_whitelist_spots: u64,
    pub whitelist_taken: u64,
    pub pending_random: u64,
    pub marked_count: u64,
    pub request_nonce: u64,

    // NOTE: fixed max_len to keep account size deterministic.
    #[max_len(240)]
    pub tickets: Vec<Ticket>,
    /// Requests of the latest batch only.
    #[max_len(32)]
    pub requests: Vec<DrawRequest>,

    pub version: u16,
}

impl TicketBook {
    pub fn total_tickets(&self) -> u64 {
        self.tickets.len() as u64
    }

    pub fn unmarked_count(&self) -> u64 {
        self.total_tickets().saturating_sub(self.marked_count)
    }

    /// Unmarked tickets not already spoken for by an in-flight request.
    pub fn available_count(&self) -> u64 {
        self.unmarked_count().saturating_sub(self.pending_random)
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_TICKETS.saturating_sub(self.tickets.len())
    }

    /// Position in `tickets` of the `nth` unmarked ticket, in issue order.
    pub fn nth_unmarked(&self, nth: u64) -> Option<usize> {
        self.tickets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.mark == TicketMark::Unmarked)
            .nth(nth as usize)
            .map(|(i, _)| i)
    }
}

use anchor_lang::prelude::*;

// -----------------
// Sale
// -----------------

#[event]
pub struct SaleInitialized {
    pub sale: Pubkey,
    pub admin: Pubkey,
    pub vault: Pubkey,
    pub max_sale_supply: u64,
    pub start_slot: u64,
    pub slot: u64,
}

/// Sequential ids `[first_id, first_id + quantity)` now belong to `owner`.
#[event]
pub struct Minted {
    pub sale: Pubkey,
    pub owner: Pubkey,
    pub first_id: u64,
    pub quantity: u64,
    pub unit_price: u64,
    pub slot: u64,
}

/// Payment not charged because the requested quantity was clamped.
#[event]
pub struct Refunded {
    pub sale: Pubkey,
    pub buyer: Pubkey,
    pub amount: u64,
    pub slot: u64,
}

#[event]
pub struct ReserveMinted {
    pub sale: Pubkey,
    pub to: Pubkey,
    pub first_id: u64,
    pub quantity: u64,
}

#[event]
pub struct Preminted {
    pub sale: Pubkey,
    pub to: Pubkey,
    pub first_id: u64,
    pub quantity: u64,
}

#[event]
pub struct BirthCertSet {
    pub sale: Pubkey,
    pub birth_cert: [u8; 32],
    pub slot: u64,
}

#[event]
pub struct SaleStopped {
    pub sale: Pubkey,
    pub freebies_root: [u8; 32],
    pub reveal_slot: u64,
    pub slot: u64,
}

#[event]
pub struct Revealed {
    pub sale: Pubkey,
    pub caller: Pubkey,
    pub starting_index: u64,
    pub slot: u64,
}

#[event]
pub struct AllocationClaimed {
    pub sale: Pubkey,
    pub recipient: Pubkey,
    pub leaf_index: u64,
    pub first_id: u64,
    pub amount: u64,
}

#[event]
pub struct FreebiesClaimed {
    pub sale: Pubkey,
    pub recipient: Pubkey,
    pub first_id: u64,
    pub amount: u64,
    pub total_claimed: u64,
}

#[event]
pub struct Withdrawn {
    pub sale: Pubkey,
    pub admin: Pubkey,
    pub amount: u64,
    pub slot: u64,
}

// -----------------
// Ticket draw
// -----------------

#[event]
pub struct TicketsIssued {
    pub book: Pubkey,
    pub first_index: u64,
    pub count: u64,
}

#[event]
pub struct RandomnessRequested {
    pub book: Pubkey,
    pub request_id: [u8; 32],
    pub fee: u64,
}

#[event]
pub struct TicketMarked {
    pub book: Pubkey,
    pub request_id: [u8; 32],
    pub ticket_index: u64,
    pub owner: Pubkey,
}

/// Fulfillment found no unmarked ticket left; no whitelist spot consumed.
#[event]
pub struct TicketAlreadyMarked {
    pub book: Pubkey,
    pub request_id: [u8; 32],
}

//! Shared fixtures for the inline unit tests.

use anchor_lang::prelude::*;

use crate::constants::INITIAL_VERSION;
use crate::errors::FairDropError;
use crate::pricing::{FixedPrice, PriceModel};
use crate::state::{
    ClaimBitmap, PurchaseRecord, RevealState, Sale, SaleConfig, Ticket, TicketBook, TicketMark,
};

pub const PRICE: u64 = 1_000_000;
pub const START: u64 = 1_000;
pub const REVEAL: u64 = 10_000;

pub fn assert_err<T: std::fmt::Debug>(res: Result<T>, expected: FairDropError) {
    match res {
        Ok(v) => panic!("expected {:?}, got Ok({:?})", expected, v),
        Err(err) => assert_eq!(err, anchor_lang::error::Error::from(expected)),
    }
}

pub fn sale_config() -> SaleConfig {
    SaleConfig {
        max_sale_supply: 100,
        start_slot: START,
        reveal_slot: Some(REVEAL),
        price_model: PriceModel::Fixed(FixedPrice::new(PRICE)),
        max_reserve: 10,
        max_premint: 10,
        max_per_address: 90,
        max_per_transaction: 50,
        window_size_slots: 100,
        max_per_window: 30,
        claim_root: [0u8; 32],
        claimable_supply: 0,
    }
}

/// A freshly initialized sale: no intake, no birth certificate.
pub fn new_sale(config: SaleConfig) -> Sale {
    Sale {
        admin: Pubkey::new_unique(),
        sale_id: 0,
        bump: 255,
        vault: Pubkey::new_unique(),
        vault_bump: 254,
        config,
        reserve_count: 0,
        premint_count: 0,
        total_minted: 0,
        claimable_remaining: config.claimable_supply,
        total_proceeds: 0,
        birth_cert: None,
        stop: None,
        reveal: RevealState::Pending,
        version: INITIAL_VERSION,
    }
}

/// A sale ready to sell once `START` is reached.
pub fn live_sale(config: SaleConfig) -> Sale {
    let mut sale = new_sale(config);
    sale.birth_cert = Some([42u8; 32]);
    sale
}

pub fn purchase_record(buyer: Pubkey) -> PurchaseRecord {
    PurchaseRecord {
        sale: Pubkey::new_unique(),
        buyer,
        bump: 255,
        window: None,
        purchased: 0,
    }
}

pub fn claim_bitmap() -> ClaimBitmap {
    ClaimBitmap {
        sale: Pubkey::new_unique(),
        bump: 255,
        claimed: vec![],
    }
}

pub fn ticket_book(max_whitelist_spots: u64) -> TicketBook {
    let admin = Pubkey::new_unique();
    TicketBook {
        admin,
        book_id: 0,
        bump: 255,
        oracle: Pubkey::new_unique(),
        fee_mint: Pubkey::new_unique(),
        fee_per_request: 10,
        max_whitelist_spots,
        whitelist_taken: 0,
        pending_random: 0,
        marked_count: 0,
        request_nonce: 0,
        tickets: vec![],
        requests: vec![],
        version: INITIAL_VERSION,
    }
}

pub fn owners(n: usize) -> Vec<Pubkey> {
    (0..n).map(|_| Pubkey::new_unique()).collect()
}

pub fn unmarked(owner: Pubkey) -> Ticket {
    Ticket {
        owner,
        mark: TicketMark::Unmarked,
    }
}

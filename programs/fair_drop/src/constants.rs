// Centralized Protocol Constants

// PDA seeds
// =========

pub const SALE_SEED: &[u8] = b"sale_v1";
pub const SALE_VAULT_SEED: &[u8] = b"sale_vault_v1";
pub const CLAIM_BITMAP_SEED: &[u8] = b"claim_bitmap_v1";
pub const PURCHASE_SEED: &[u8] = b"purchase_v1";
pub const FREEBIE_SEED: &[u8] = b"freebie_v1";
pub const TICKET_BOOK_SEED: &[u8] = b"ticket_book_v1";

// Domain separators for hashes
// ============================

pub const REVEAL_DOMAIN: &[u8] = b"fair-drop:reveal";
pub const DRAW_REQUEST_DOMAIN: &[u8] = b"fair-drop:draw";

// Sale defaults
// =============

/// Units one address may buy inside a single purchase window.
pub const DEFAULT_MAX_PER_WINDOW: u64 = 30;

/// Units one address may buy over the whole sale.
pub const DEFAULT_MAX_PER_ADDRESS: u64 = 90;

/// Length of the rolling purchase window, in slots.
/// 100 slots ~ 40 seconds (@ 0.4s/slot).
pub const DEFAULT_WINDOW_SIZE_SLOTS: u64 = 100;

/// Units a single mint instruction may request.
pub const DEFAULT_MAX_PER_TRANSACTION: u64 = 50;

// Capacities (fixed so account sizes stay deterministic)
// ======================================================

/// Bytes in the claim bitmap. Must match `#[max_len]` on `ClaimBitmap::claimed`.
pub const CLAIM_BITMAP_BYTES: usize = 256;

/// Highest leaf index (exclusive) the fixed-allocation tree may use.
pub const MAX_CLAIM_LEAVES: u64 = (CLAIM_BITMAP_BYTES as u64) * 8;

/// Must match `#[max_len]` on `TicketBook::tickets`.
pub const MAX_TICKETS: usize = 240;

/// Must match `#[max_len]` on `TicketBook::requests`.
pub const MAX_DRAW_BATCH: u64 = 32;

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;

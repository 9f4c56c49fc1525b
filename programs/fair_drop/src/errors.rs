use anchor_lang::prelude::*;

#[error_code]
pub enum FairDropError {
    // -----------------
    // Timing
    // -----------------
    #[msg("Not in sale period")]
    NotInSalePeriod,
    #[msg("Not allowed after sale start")]
    SaleAlreadyStarted,
    #[msg("It's not time to reveal yet")]
    NotYetRevealable,
    #[msg("Already revealed")]
    AlreadyRevealed,
    #[msg("Items not revealed yet")]
    NotYetRevealed,
    #[msg("Freebies claim is not open")]
    FreebiesNotOpen,

    // -----------------
    // Capacity
    // -----------------
    #[msg("Sold out")]
    SoldOut,
    #[msg("Unpurchasable")]
    Unpurchasable,
    #[msg("Quantity exceeds per-transaction cap")]
    ExceedsPerTransactionCap,
    #[msg("Exceed max reserve amount")]
    ExceedsReserveCap,
    #[msg("Exceed max premint amount")]
    ExceedsPremintCap,
    #[msg("Ticket pool too small")]
    PoolTooSmall,
    #[msg("No more randomness available")]
    NoRandomnessAvailable,
    #[msg("Ticket book is full")]
    TooManyTickets,
    #[msg("Invalid quantity")]
    InvalidQuantity,

    // -----------------
    // Funds
    // -----------------
    #[msg("Insufficient funds")]
    InsufficientFunds,
    #[msg("Insufficient fee token balance for randomness")]
    InsufficientFeeBalance,
    #[msg("Insufficient vault funds")]
    InsufficientVaultFunds,

    // -----------------
    // Proofs
    // -----------------
    #[msg("Invalid Merkle proof provided")]
    InvalidProof,
    #[msg("This allocation has already been claimed")]
    AlreadyClaimed,
    #[msg("Exceeded max per address")]
    ExceedsPerAddressCap,
    #[msg("Exceeded max supply")]
    ExceedsRemainingSupply,
    #[msg("Invalid leaf index - out of bounds")]
    InvalidLeafIndex,

    // -----------------
    // Authorization
    // -----------------
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Not externally owned: CPI calls are rejected")]
    NotExternallyOwned,
    #[msg("Only the oracle may fulfill randomness")]
    NotOracle,

    // -----------------
    // Sequencing
    // -----------------
    #[msg("Some pending random")]
    RequestAlreadyPending,
    #[msg("Reserve intake must precede premint")]
    ReserveAfterPremint,
    #[msg("Reserve intake closed: allocations were already claimed")]
    ReserveAfterClaim,
    #[msg("Birth certificate not set")]
    ProvenanceNotSet,
    #[msg("Birth certificate already set")]
    ProvenanceAlreadySet,
    #[msg("Sale already stopped")]
    SaleAlreadyStopped,
    #[msg("Unknown randomness request")]
    UnknownRequest,
    #[msg("Randomness request already fulfilled")]
    RequestAlreadyFulfilled,

    // -----------------
    // Configuration
    // -----------------
    #[msg("Invalid price model")]
    InvalidPriceModel,
    #[msg("Invalid sale config")]
    InvalidSaleConfig,
    #[msg("Slot hashes sysvar unavailable")]
    SlotHashesUnavailable,
    #[msg("Math overflow")]
    MathOverflow,
}

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::{
    constants::{INITIAL_VERSION, MAX_DRAW_BATCH},
    errors::FairDropError,
    events::{RandomnessRequested, TicketAlreadyMarked, TicketMarked, TicketsIssued},
    state::{DrawRequest, Ticket, TicketBook, TicketMark},
    utils::{draw_request_id, reduce_randomness},
    Draw, FulfillRandomness, InitializeDraw, IssueTickets,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FulfillOutcome {
    Marked { ticket_index: u64, owner: Pubkey },
    /// Nothing unmarked was left; the request is consumed without a spot.
    AlreadyMarked,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawBatch {
    pub request_ids: Vec<[u8; 32]>,
    pub fee: u64,
}

pub fn initialize_draw_core(
    book: &mut TicketBook,
    admin: Pubkey,
    book_id: u64,
    oracle: Pubkey,
    fee_mint: Pubkey,
    fee_per_request: u64,
    max_whitelist_spots: u64,
) -> Result<()> {
    require!(max_whitelist_spots > 0, FairDropError::InvalidSaleConfig);

    book.admin = admin;
    book.book_id = book_id;
    book.oracle = oracle;
    book.fee_mint = fee_mint;
    book.fee_per_request = fee_per_request;
    book.max_whitelist_spots = max_whitelist_spots;
    book.whitelist_taken = 0;
    book.pending_random = 0;
    book.marked_count = 0;
    book.request_nonce = 0;
    book.tickets = Vec::new();
    book.requests = Vec::new();
    book.version = INITIAL_VERSION;
    Ok(())
}

/// Appends one unmarked ticket per owner, in order. Returns the first new index.
pub fn issue_tickets_core(book: &mut TicketBook, caller: &Pubkey, owners: &[Pubkey]) -> Result<u64> {
    require_keys_eq!(book.admin, *caller, FairDropError::Unauthorized);
    require!(!owners.is_empty(), FairDropError::InvalidQuantity);
    require!(
        owners.len() <= book.remaining_capacity(),
        FairDropError::TooManyTickets
    );

    let first_index = book.total_tickets();
    book.tickets.extend(owners.iter().map(|owner| Ticket {
        owner: *owner,
        mark: TicketMark::Unmarked,
    }));
    Ok(first_index)
}

/// Opens a batch of `count` randomness requests. Only one batch may be in
/// flight; the previous batch's requests are dropped once all are fulfilled.
pub fn draw_core(
    book: &mut TicketBook,
    book_key: &Pubkey,
    caller: &Pubkey,
    count: u64,
    fee_balance: u64,
) -> Result<DrawBatch> {
    require_keys_eq!(book.admin, *caller, FairDropError::Unauthorized);
    require!(book.pending_random == 0, FairDropError::RequestAlreadyPending);
    require!(
        count > 0 && count <= MAX_DRAW_BATCH,
        FairDropError::InvalidQuantity
    );
    require!(book.total_tickets() >= count, FairDropError::PoolTooSmall);
    require!(
        book.available_count() >= count,
        FairDropError::NoRandomnessAvailable
    );

    let spots_after = book
        .whitelist_taken
        .checked_add(book.pending_random)
        .and_then(|v| v.checked_add(count))
        .ok_or(FairDropError::MathOverflow)?;
    require!(
        spots_after <= book.max_whitelist_spots,
        FairDropError::NoRandomnessAvailable
    );

    let fee = book
        .fee_per_request
        .checked_mul(count)
        .ok_or(FairDropError::MathOverflow)?;
    require!(fee_balance >= fee, FairDropError::InsufficientFeeBalance);

    let mut request_ids = Vec::with_capacity(count as usize);
    let mut nonce = book.request_nonce;
    for _ in 0..count {
        request_ids.push(draw_request_id(book_key, nonce));
        nonce = nonce.checked_add(1).ok_or(FairDropError::MathOverflow)?;
    }

    book.requests = request_ids
        .iter()
        .map(|id| DrawRequest {
            request_id: *id,
            ticket_index: None,
            fulfilled: false,
        })
        .collect();
    book.request_nonce = nonce;
    book.pending_random = count;

    Ok(DrawBatch { request_ids, fee })
}

/// Consumes one request. The modulus is the unmarked population at this
/// moment, so fulfillment order never matters and no ticket is marked twice.
pub fn fulfill_core(
    book: &mut TicketBook,
    caller: &Pubkey,
    request_id: &[u8; 32],
    randomness: &[u8; 32],
) -> Result<FulfillOutcome> {
    require_keys_eq!(book.oracle, *caller, FairDropError::NotOracle);

    let req_pos = book
        .requests
        .iter()
        .position(|r| r.request_id == *request_id)
        .ok_or(FairDropError::UnknownRequest)?;
    require!(
        !book.requests[req_pos].fulfilled,
        FairDropError::RequestAlreadyFulfilled
    );

    let pending_random = book
        .pending_random
        .checked_sub(1)
        .ok_or(FairDropError::MathOverflow)?;

    let unmarked = book.unmarked_count();
    if unmarked == 0 {
        book.requests[req_pos].fulfilled = true;
        book.pending_random = pending_random;
        return Ok(FulfillOutcome::AlreadyMarked);
    }

    let nth = reduce_randomness(randomness, unmarked);
    let ticket_index = book
        .nth_unmarked(nth)
        .ok_or(FairDropError::NoRandomnessAvailable)?;
    let marked_count = book
        .marked_count
        .checked_add(1)
        .ok_or(FairDropError::MathOverflow)?;
    let whitelist_taken = book
        .whitelist_taken
        .checked_add(1)
        .ok_or(FairDropError::MathOverflow)?;

    let ticket = &mut book.tickets[ticket_index];
    ticket.mark = TicketMark::Marked;
    let owner = ticket.owner;

    book.marked_count = marked_count;
    book.whitelist_taken = whitelist_taken;
    book.pending_random = pending_random;
    let request = &mut book.requests[req_pos];
    request.fulfilled = true;
    request.ticket_index = Some(ticket_index as u64);

    Ok(FulfillOutcome::Marked {
        ticket_index: ticket_index as u64,
        owner,
    })
}

// -------------------------
// Handlers
// -------------------------
pub fn initialize_draw(
    ctx: Context<InitializeDraw>,
    book_id: u64,
    oracle: Pubkey,
    fee_per_request: u64,
    max_whitelist_spots: u64,
) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let fee_mint = ctx.accounts.fee_mint.key();

    let book = &mut ctx.accounts.ticket_book;
    initialize_draw_core(
        book,
        admin,
        book_id,
        oracle,
        fee_mint,
        fee_per_request,
        max_whitelist_spots,
    )?;
    book.bump = ctx.bumps.ticket_book;

    msg!(
        "Ticket book {} initialized: oracle {}, {} whitelist spots",
        book_id,
        oracle,
        max_whitelist_spots
    );
    Ok(())
}

pub fn issue_tickets(ctx: Context<IssueTickets>, owners: Vec<Pubkey>) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let book_key = ctx.accounts.ticket_book.key();

    let first_index = issue_tickets_core(&mut ctx.accounts.ticket_book, &admin, &owners)?;

    emit!(TicketsIssued {
        book: book_key,
        first_index,
        count: owners.len() as u64,
    });
    msg!("Issued {} tickets from index {}", owners.len(), first_index);
    Ok(())
}

pub fn draw(ctx: Context<Draw>, count: u64) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let book_key = ctx.accounts.ticket_book.key();
    let fee_balance = ctx.accounts.admin_fee_account.amount;

    let batch = draw_core(
        &mut ctx.accounts.ticket_book,
        &book_key,
        &admin,
        count,
        fee_balance,
    )?;

    if batch.fee > 0 {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.admin_fee_account.to_account_info(),
                    to: ctx.accounts.oracle_fee_account.to_account_info(),
                    authority: ctx.accounts.admin.to_account_info(),
                },
            ),
            batch.fee,
        )?;
    }

    let fee_per_request = ctx.accounts.ticket_book.fee_per_request;
    for request_id in &batch.request_ids {
        emit!(RandomnessRequested {
            book: book_key,
            request_id: *request_id,
            fee: fee_per_request,
        });
    }
    msg!("Draw requested: {} tickets, fee {}", count, batch.fee);
    Ok(())
}

pub fn fulfill_randomness(
    ctx: Context<FulfillRandomness>,
    request_id: [u8; 32],
    randomness: [u8; 32],
) -> Result<()> {
    let oracle = ctx.accounts.oracle.key();
    let book_key = ctx.accounts.ticket_book.key();

    match fulfill_core(&mut ctx.accounts.ticket_book, &oracle, &request_id, &randomness)? {
        FulfillOutcome::Marked { ticket_index, owner } => {
            emit!(TicketMarked {
                book: book_key,
                request_id,
                ticket_index,
                owner,
            });
            msg!("Ticket {} marked for {}", ticket_index, owner);
        }
        FulfillOutcome::AlreadyMarked => {
            emit!(TicketAlreadyMarked {
                book: book_key,
                request_id,
            });
            msg!("No unmarked ticket left, request consumed");
        }
    }
    Ok(())
}

//! A No-Limit Texas Hold'em hand engine.
//!
//! The crate drives the full state machine of one poker hand: forced bets,
//! hole and community cards, the four betting rounds, side-pot formation,
//! and showdown payout. A [`game::Table`] wraps all of that with seat
//! lifecycle management (players sitting down and standing up across hands),
//! button rotation, and pre-committed automatic actions.
//!
//! The host application feeds discrete player decisions into the table and
//! reads back exactly what may happen next (`legal_actions`,
//! `legal_automatic_actions`). There is no I/O, no networking, and no
//! rendering in here; everything is synchronous and single-threaded.

pub mod cards;
pub mod game;

pub use cards::{Card, Deck, DeckSeed, Hand, HandRanking, HoleCards, Rank, Suit};
pub use game::{
    Action, ActionKind, ActionRange, AutomaticAction, BetRound, Blinds, Chips, CommunityCards,
    ForcedBets, GameError, Player, Pot, SeatArray, Table,
};

/// Number of seats at a table.
pub const NUM_SEATS: usize = 9;

/// A seat position, `0..NUM_SEATS`.
pub type SeatIdx = usize;

pub mod betting;
pub mod dealer;
pub mod pot;
pub mod round;
pub mod seats;
pub mod table;

pub use betting::BettingRound;
pub use dealer::{ActionRange, Dealer};
pub use pot::{Chips, Pot, PotManager};
pub use round::Round;
pub use seats::{Player, SeatArray};
pub use table::{AutomaticAction, Table};

use crate::cards::{Card, DeckError};
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four streets of a hand, in order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BetRound {
    Preflop,
    Flop,
    Turn,
    River,
}

impl BetRound {
    pub fn next(self) -> BetRound {
        match self {
            BetRound::Preflop => BetRound::Flop,
            BetRound::Flop => BetRound::Turn,
            BetRound::Turn | BetRound::River => BetRound::River,
        }
    }

    /// How many community cards are on the board by the end of this street.
    pub const fn board_cards(self) -> usize {
        match self {
            BetRound::Preflop => 0,
            BetRound::Flop => 3,
            BetRound::Turn => 4,
            BetRound::River => 5,
        }
    }
}

/// The shared board cards. Append-only; a hand leaves it at 0, 3, 4, or 5
/// cards depending on the street it ended at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityCards {
    cards: Vec<Card>,
}

impl CommunityCards {
    pub fn new() -> Self {
        CommunityCards {
            cards: Vec::with_capacity(5),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn deal(&mut self, cards: impl IntoIterator<Item = Card>) {
        for c in cards {
            assert!(self.cards.len() < 5, "board already complete");
            self.cards.push(c);
        }
    }
}

/// The two forced bets posted before cards are dealt.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

/// Blinds plus an optional ante taken from every hand player.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedBets {
    pub blinds: Blinds,
    pub ante: Chips,
}

/// An inclusive range of legal chip amounts for a bet or raise.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipRange {
    pub min: Chips,
    pub max: Chips,
}

impl ChipRange {
    pub fn contains(&self, amount: Chips) -> bool {
        self.min <= amount && amount <= self.max
    }
}

/// A player decision. Bets and raises carry the player's new total bet for
/// the street, not the increment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
}

impl Action {
    pub fn kind(self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Check => ActionKind::Check,
            Action::Call => ActionKind::Call,
            Action::Bet(_) => ActionKind::Bet,
            Action::Raise(_) => ActionKind::Raise,
        }
    }

    pub const fn is_aggressive(self) -> bool {
        matches!(self, Action::Bet(_) | Action::Raise(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "Fold"),
            Action::Check => write!(f, "Check"),
            Action::Call => write!(f, "Call"),
            Action::Bet(v) => write!(f, "Bet({})", v),
            Action::Raise(v) => write!(f, "Raise({})", v),
        }
    }
}

/// [`Action`] without its chip payload, usable as a flag-set key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Enum, Serialize, Deserialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
}

#[derive(Debug, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    SeatTaken,
    SeatEmpty,
    InvalidSeat,
    NotEnoughPlayers,
    HandInProgress,
    NoHandInProgress,
    NoBettingRound,
    BettingRoundInProgress,
    BettingRoundsCompleted,
    BettingRoundsNotCompleted,
    IllegalAction,
    IllegalAutomaticAction,
    CannotSetAutomaticAction,
    Deck(DeckError),
}

impl std::error::Error for GameError {}

impl From<DeckError> for GameError {
    fn from(e: DeckError) -> Self {
        GameError::Deck(e)
    }
}

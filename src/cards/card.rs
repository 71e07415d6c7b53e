use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CLUB: char = 'c';
pub const DIAMOND: char = 'd';
pub const HEART: char = 'h';
pub const SPADE: char = 's';

pub const ALL_SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(
    Hash, Enum, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// The face value of the rank, deuce as 2 through ace as 14.
    pub fn value(self) -> u8 {
        self as u8 + 2
    }

    pub fn from_symbol(c: char) -> Option<Rank> {
        let r = match c {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return None,
        };
        Some(r)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Two => write!(f, "2"),
            Self::Three => write!(f, "3"),
            Self::Four => write!(f, "4"),
            Self::Five => write!(f, "5"),
            Self::Six => write!(f, "6"),
            Self::Seven => write!(f, "7"),
            Self::Eight => write!(f, "8"),
            Self::Nine => write!(f, "9"),
            Self::Ten => write!(f, "T"),
            Self::Jack => write!(f, "J"),
            Self::Queen => write!(f, "Q"),
            Self::King => write!(f, "K"),
            Self::Ace => write!(f, "A"),
        }
    }
}

#[derive(
    Hash, Enum, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    pub fn from_symbol(c: char) -> Option<Suit> {
        let s = match c {
            CLUB => Suit::Club,
            DIAMOND => Suit::Diamond,
            HEART => Suit::Heart,
            SPADE => Suit::Spade,
            _ => return None,
        };
        Some(s)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Club => write!(f, "{}", CLUB),
            Self::Diamond => write!(f, "{}", DIAMOND),
            Self::Heart => write!(f, "{}", HEART),
            Self::Spade => write!(f, "{}", SPADE),
        }
    }
}

/// One of the 52 cards.
///
/// The derived order is suit-major and exists only so collections of cards
/// can be sorted deterministically; no poker rule consults it. Hand
/// comparisons go through [`crate::cards::hand::Hand`].
#[derive(
    Hash, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Card { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Parses the two-character debug form, rank then suit: `"As"`, `"Tc"`.
impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(r), Some(u), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("expected two characters, got {:?}", s));
        };
        let rank = Rank::from_symbol(r).ok_or_else(|| format!("bad rank symbol {:?}", r))?;
        let suit = Suit::from_symbol(u).ok_or_else(|| format!("bad suit symbol {:?}", u))?;
        Ok(Card { suit, rank })
    }
}

/// Returns an UNSHUFFLED array of all 52 cards.
pub fn all_cards() -> [Card; 52] {
    use itertools::Itertools;
    let mut cards = [Card::new(Suit::Club, Rank::Two); 52];
    let every = ALL_SUITS
        .iter()
        .cartesian_product(ALL_RANKS.iter())
        .map(|(s, r)| Card::new(*s, *r));
    for (i, c) in every.enumerate() {
        cards[i] = c;
    }
    cards
}

/// Parses a whitespace-separated list of two-character cards: `"As Kd 2c"`.
#[cfg(test)]
pub(crate) fn cards_from_str(s: &str) -> Vec<Card> {
    s.split_whitespace()
        .map(|w| w.parse().expect("bad card in test string"))
        .collect()
}

use super::card::{all_cards, Card};
use base64ct::{Base64, Encoding};
use rand::prelude::*;
use rand_chacha::ChaChaRng;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

pub const DECK_LEN: usize = 52;
const SEED_LEN: usize = 32;
const ENCODED_SEED_LEN: usize = 4 * ((SEED_LEN + 3 - 1) / 3); // 4 * ceil(SEED_LEN / 3)

#[derive(Debug, PartialEq, Eq)]
pub enum DeckError {
    OutOfCards,
    BadSeed(base64ct::Error),
}

impl Error for DeckError {}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::OutOfCards => write!(f, "No more cards in deck"),
            DeckError::BadSeed(e) => write!(f, "{}", e),
        }
    }
}

impl From<base64ct::Error> for DeckError {
    fn from(e: base64ct::Error) -> Self {
        Self::BadSeed(e)
    }
}

/// A shuffled stack of the 52 cards, consumed from the top over one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(&mut thread_rng())
    }
}

impl Deck {
    /// A full deck shuffled with the given RNG.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        // all_cards() is in a fixed order, so the same RNG state always
        // produces the same deck.
        let mut cards = all_cards().to_vec();
        cards.shuffle(rng);
        Deck { cards }
    }

    /// A full deck shuffled deterministically from a seed. The same seed
    /// always yields the same card order, which is what makes hand replay
    /// and deterministic tests possible.
    pub fn seeded(seed: &DeckSeed) -> Self {
        let mut rng = ChaChaRng::from_seed(seed.0);
        Self::new(&mut rng)
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::OutOfCards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Entropy for one deck shuffle, with a base64 text form so hosts can log
/// the seed of every hand and replay the deal later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckSeed([u8; SEED_LEN]);

impl DeckSeed {
    pub fn new(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }
}

impl Default for DeckSeed {
    fn default() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for DeckSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; ENCODED_SEED_LEN];
        let encoded = Base64::encode(&self.0, &mut buf).unwrap();
        write!(f, "{}", encoded)
    }
}

impl FromStr for DeckSeed {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; SEED_LEN];
        Base64::decode(s, &mut bytes)?;
        Ok(DeckSeed(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    const SEED1: DeckSeed = DeckSeed([1; SEED_LEN]);
    const SEED2: DeckSeed = DeckSeed([2; SEED_LEN]);

    #[test]
    fn full_and_distinct() {
        let d = Deck::seeded(&SEED1);
        assert_eq!(d.len(), DECK_LEN);
        assert_eq!(d.cards.iter().unique().count(), DECK_LEN);
    }

    #[test]
    fn draw_consumes() {
        let mut d = Deck::seeded(&SEED1);
        for left in (0..DECK_LEN).rev() {
            assert!(d.draw().is_ok());
            assert_eq!(d.len(), left);
        }
        assert_eq!(d.draw().unwrap_err(), DeckError::OutOfCards);
    }

    #[test]
    fn seeded_shuffle_is_deterministic() {
        let mut a = Deck::seeded(&SEED1);
        let mut b = Deck::seeded(&SEED1);
        assert_eq!(a, b);
        assert_eq!(a.draw().unwrap(), b.draw().unwrap());
        let c = Deck::seeded(&SEED2);
        assert_ne!(b, c);
    }

    #[test]
    fn rng_shuffle_uses_the_given_rng() {
        use rand_chacha::ChaChaRng;
        let mut rng = ChaChaRng::from_seed([1; 32]);
        let d = Deck::new(&mut rng);
        assert_eq!(d, Deck::seeded(&SEED1));
    }

    #[test]
    fn probably_shuffled() {
        let mut d = Deck::default();
        let first_four: Vec<_> = (0..4).map(|_| d.draw().unwrap()).collect();
        let all_same_rank = first_four.iter().map(|c| c.rank).unique().count() == 1;
        // A deck that starts with four cards of one rank was almost
        // certainly never shuffled.
        assert!(!all_same_rank, "top four cards share a rank: {:?}", first_four);
    }

    #[test]
    fn seed_text_roundtrip() {
        let seed = DeckSeed::default();
        let s = seed.to_string();
        let back: DeckSeed = s.parse().unwrap();
        assert_eq!(seed, back);
    }

    #[test]
    fn bad_seed_text() {
        assert!("!!!not base64!!!".parse::<DeckSeed>().is_err());
    }
}

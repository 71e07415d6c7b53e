use super::card::{Card, Rank, Suit, ALL_SUITS};
use super::HoleCards;
use crate::game::CommunityCards;
use enum_map::EnumMap;
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt;

/// Hand categories from weakest to strongest. The derived order is the
/// first comparison key between two hands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandRanking {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl fmt::Display for HandRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HighCard => "high card",
            Self::Pair => "pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
            Self::RoyalFlush => "royal flush",
        };
        write!(f, "{}", name)
    }
}

/// The best five-card hand out of seven cards.
///
/// Hands compare by `(ranking, strength)`; the five cards themselves are
/// carried for display and never consulted by the comparison.
#[derive(Copy, Clone, Debug)]
pub struct Hand {
    ranking: HandRanking,
    strength: i32,
    cards: [Card; 5],
}

impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.ranking == other.ranking && self.strength == other.strength
    }
}

impl Eq for Hand {}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ranking
            .cmp(&other.ranking)
            .then_with(|| self.strength.cmp(&other.strength))
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ranking, self.cards.iter().join(" "))
    }
}

impl Hand {
    fn new(ranking: HandRanking, strength: i32, cards: [Card; 5]) -> Self {
        Hand {
            ranking,
            strength,
            cards,
        }
    }

    pub fn ranking(&self) -> HandRanking {
        self.ranking
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn cards(&self) -> &[Card; 5] {
        &self.cards
    }

    /// Evaluates a seat's hole cards against a complete five-card board.
    pub fn of(hole: HoleCards, community: &CommunityCards) -> Hand {
        let board = community.cards();
        assert_eq!(board.len(), 5, "board must be complete for evaluation");
        Self::eval([
            hole[0], hole[1], board[0], board[1], board[2], board[3], board[4],
        ])
    }

    /// Evaluates any seven cards to their best five-card hand.
    pub fn eval(cards: [Card; 7]) -> Hand {
        let by_rank = Self::rank_eval(cards);
        match Self::straight_flush_eval(cards) {
            Some(hand) if hand > by_rank => hand,
            _ => by_rank,
        }
    }

    /// The pairing family: high card up through four of a kind, found by
    /// bucketing ranks by frequency.
    fn rank_eval(mut cards: [Card; 7]) -> Hand {
        let mut occurrences: EnumMap<Rank, usize> = EnumMap::default();
        for c in &cards {
            occurrences[c.rank] += 1;
        }
        cards.sort_unstable_by(|a, b| {
            occurrences[b.rank]
                .cmp(&occurrences[a.rank])
                .then_with(|| b.rank.cmp(&a.rank))
        });
        let ranking = match leading_run(&cards) {
            4 => {
                // The frequency sort may leave a paired low card in front of
                // a lone high kicker; past the quads only rank matters.
                cards[4..].sort_unstable_by(|a, b| b.rank.cmp(&a.rank));
                HandRanking::FourOfAKind
            }
            3 => {
                if leading_run(&cards[3..]) >= 2 {
                    HandRanking::FullHouse
                } else {
                    HandRanking::ThreeOfAKind
                }
            }
            2 => {
                if leading_run(&cards[2..]) == 2 {
                    HandRanking::TwoPair
                } else {
                    HandRanking::Pair
                }
            }
            _ => HandRanking::HighCard,
        };
        let five = [cards[0], cards[1], cards[2], cards[3], cards[4]];
        Hand::new(ranking, strength_of(&five), five)
    }

    /// The suited/sequential family: straight, flush, straight flush, royal
    /// flush. Returns `None` when the seven cards hold none of them.
    fn straight_flush_eval(cards: [Card; 7]) -> Option<Hand> {
        let mut suit_counts: EnumMap<Suit, usize> = EnumMap::default();
        for c in &cards {
            suit_counts[c.suit] += 1;
        }
        if let Some(suit) = ALL_SUITS.iter().copied().find(|&s| suit_counts[s] >= 5) {
            let suited: Vec<Card> = cards.iter().copied().filter(|c| c.suit == suit).collect();
            if let Some(run) = best_straight(&suited) {
                if run[0].rank == Rank::Ace {
                    return Some(Hand::new(HandRanking::RoyalFlush, 0, run));
                }
                return Some(Hand::new(
                    HandRanking::StraightFlush,
                    run[0].rank as i32,
                    run,
                ));
            }
            let top: Vec<Card> = suited
                .into_iter()
                .sorted_unstable_by(|a, b| b.rank.cmp(&a.rank))
                .take(5)
                .collect();
            let five = [top[0], top[1], top[2], top[3], top[4]];
            return Some(Hand::new(HandRanking::Flush, five[0].rank as i32, five));
        }
        best_straight(&cards)
            .map(|run| Hand::new(HandRanking::Straight, run[0].rank as i32, run))
    }
}

fn leading_run(cards: &[Card]) -> usize {
    let first = cards[0].rank;
    cards.iter().take_while(|c| c.rank == first).count()
}

/// Base-13 polynomial over the five ranks, most significant first. Within
/// one ranking this orders hands exactly by their ranks in display order.
fn strength_of(cards: &[Card; 5]) -> i32 {
    cards.iter().fold(0, |sum, c| sum * 13 + c.rank as i32)
}

/// The highest five-card straight within the given cards, one card per
/// rank, highest rank first. The wheel comes back as 5-4-3-2-A.
fn best_straight(cards: &[Card]) -> Option<[Card; 5]> {
    let uniq: Vec<Card> = cards
        .iter()
        .copied()
        .sorted_unstable_by(|a, b| b.rank.cmp(&a.rank))
        .dedup_by(|a, b| a.rank == b.rank)
        .collect();
    for w in uniq.windows(5) {
        // Ranks are strictly descending, so a window spanning exactly four
        // steps is consecutive.
        if w[0].rank as i8 - w[4].rank as i8 == 4 {
            return Some([w[0], w[1], w[2], w[3], w[4]]);
        }
    }
    if uniq.first().map(|c| c.rank) == Some(Rank::Ace) {
        let find = |r: Rank| uniq.iter().copied().find(|c| c.rank == r);
        if let (Some(c5), Some(c4), Some(c3), Some(c2)) = (
            find(Rank::Five),
            find(Rank::Four),
            find(Rank::Three),
            find(Rank::Two),
        ) {
            // Ace rotates to the low end; the wheel is five-high.
            return Some([c5, c4, c3, c2, uniq[0]]);
        }
    }
    None
}

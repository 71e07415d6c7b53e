use super::seats::SeatView;
use crate::{SeatIdx, NUM_SEATS};
use derive_more::{Add, AddAssign, Display, From, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};

/// A count of chips. Never negative outside this crate; every write that
/// could go below zero asserts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    PartialEq,
    Eq,
    Default,
    Hash,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Display,
    derive_more::Deref,
    Serialize,
    Deserialize,
)]
pub struct Chips(i32);

impl Chips {
    pub const ZERO: Chips = Chips(0);
}

/// Splits `amount` into `ways` integer shares as evenly as possible,
/// largest shares first. `even_shares(5.into(), 3)` is `[2, 2, 1]`; no chip
/// is ever lost to rounding.
pub(crate) fn even_shares(amount: Chips, ways: usize) -> Vec<Chips> {
    assert!(ways > 0);
    assert!(amount.0 >= 0);
    let quotient = amount.0 / ways as i32;
    let remainder = amount.0 % ways as i32;
    (0..ways as i32)
        .map(|i| Chips(if i < remainder { quotient + 1 } else { quotient }))
        .collect()
}

/// One pot: its chips and the seats allowed to win it. Seats are stored as
/// indices so pots never alias the seat array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    size: Chips,
    eligible: Vec<SeatIdx>,
}

impl Pot {
    pub(crate) fn new() -> Self {
        Pot {
            size: Chips::ZERO,
            eligible: Vec::new(),
        }
    }

    pub fn size(&self) -> Chips {
        self.size
    }

    pub fn eligible_players(&self) -> &[SeatIdx] {
        &self.eligible
    }

    pub(crate) fn add(&mut self, amount: Chips) {
        assert!(amount >= Chips::ZERO);
        self.size += amount;
    }

    /// Takes one even layer of bets off the table into this pot.
    ///
    /// If nobody in the view has an outstanding bet, the eligible set is
    /// refreshed to everyone in the view and nothing moves. Otherwise every
    /// seat with a positive bet pays the minimum such bet into the pot and
    /// becomes eligible for it; the minimum is returned.
    pub(crate) fn collect_bets_from(&mut self, players: &mut SeatView<'_>) -> Chips {
        let mut min_bet = Chips::ZERO;
        for seat in 0..NUM_SEATS {
            if !players.contains(seat) {
                continue;
            }
            let bet = players.player(seat).bet_size();
            if bet > Chips::ZERO && (min_bet == Chips::ZERO || bet < min_bet) {
                min_bet = bet;
            }
        }
        if min_bet == Chips::ZERO {
            self.eligible = (0..NUM_SEATS).filter(|&s| players.contains(s)).collect();
            return Chips::ZERO;
        }
        self.eligible.clear();
        for seat in 0..NUM_SEATS {
            if !players.contains(seat) {
                continue;
            }
            if players.player(seat).bet_size() > Chips::ZERO {
                players.player_mut(seat).take_from_bet(min_bet);
                self.size += min_bet;
                self.eligible.push(seat);
            }
        }
        min_bet
    }
}

/// The hand's pots: a main pot plus any side pots, the last one being the
/// accumulator bets currently collect into. Also tracks chips that folded
/// players had committed this street but no pot has absorbed yet.
#[derive(Debug)]
pub struct PotManager {
    pots: Vec<Pot>,
    folded_bets: Chips,
}

impl PotManager {
    pub(crate) fn new() -> Self {
        PotManager {
            pots: vec![Pot::new()],
            folded_bets: Chips::ZERO,
        }
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    /// Records chips a folding player leaves behind on the street.
    pub(crate) fn bet_folded(&mut self, amount: Chips) {
        self.folded_bets += amount;
    }

    /// Adds chips straight into the current pot (the ante path).
    pub(crate) fn add(&mut self, amount: Chips) {
        self.pots.last_mut().unwrap().add(amount);
    }

    /// Collapses all outstanding bets into pots, creating side pots as
    /// uneven all-in layers peel off.
    ///
    /// Folded chips are spread pot by pot, each pot absorbing at most what
    /// the folder would have owed it had they called
    /// (`eligible_count * layer_depth`); whatever is left after the last
    /// layer tops up the deepest pot.
    pub(crate) fn collect_bets_from(&mut self, players: &mut SeatView<'_>) {
        loop {
            let min_bet = self.pots.last_mut().unwrap().collect_bets_from(players);
            let eligible = self.pots.last().unwrap().eligible_players().len();
            let consumed = self.folded_bets.min(Chips(min_bet.0 * eligible as i32));
            self.pots.last_mut().unwrap().add(consumed);
            self.folded_bets -= consumed;
            let bets_remain = (0..NUM_SEATS)
                .any(|s| players.contains(s) && players.player(s).bet_size() > Chips::ZERO);
            if bets_remain {
                self.pots.push(Pot::new());
                continue;
            }
            if self.folded_bets > Chips::ZERO {
                let leftover = self.folded_bets;
                self.pots.last_mut().unwrap().add(leftover);
                self.folded_bets = Chips::ZERO;
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::seats::{Player, SeatArray};

    fn seats(stacks: &[i32]) -> SeatArray {
        let mut sa = SeatArray::new();
        for (i, &s) in stacks.iter().enumerate() {
            sa.add_player(i, Player::new(s.into()));
        }
        sa
    }

    fn filter(n: usize) -> [bool; NUM_SEATS] {
        let mut f = [false; NUM_SEATS];
        f[..n].iter_mut().for_each(|b| *b = true);
        f
    }

    #[test]
    fn collect_some_bets() {
        let mut sa = seats(&[100, 100, 100]);
        sa.player_mut(1).bet(20.into());
        let mut pot = Pot::new();
        let min = pot.collect_bets_from(&mut SeatView::new(&mut sa, filter(3)));
        assert_eq!(min, 20.into());
        assert_eq!(pot.size(), 20.into());
        assert_eq!(pot.eligible_players(), &[1]);
        assert_eq!(sa.player(1).bet_size(), Chips::ZERO);
        assert_eq!(sa.player(1).total_chips(), 80.into());
    }

    #[test]
    fn collect_no_bets() {
        let mut sa = seats(&[100, 100, 100]);
        let mut pot = Pot::new();
        let min = pot.collect_bets_from(&mut SeatView::new(&mut sa, filter(3)));
        assert_eq!(min, Chips::ZERO);
        assert_eq!(pot.size(), Chips::ZERO);
        assert_eq!(pot.eligible_players(), &[0, 1, 2]);
    }

    #[test]
    fn uneven_bets_form_side_pots() {
        let mut sa = seats(&[100, 100, 100]);
        sa.player_mut(0).bet(20.into());
        sa.player_mut(1).bet(40.into());
        sa.player_mut(2).bet(60.into());
        let mut pm = PotManager::new();
        pm.collect_bets_from(&mut SeatView::new(&mut sa, filter(3)));
        let sizes: Vec<Chips> = pm.pots().iter().map(Pot::size).collect();
        assert_eq!(sizes, vec![60.into(), 40.into(), 20.into()]);
        assert_eq!(pm.pots()[0].eligible_players(), &[0, 1, 2]);
        assert_eq!(pm.pots()[1].eligible_players(), &[1, 2]);
        assert_eq!(pm.pots()[2].eligible_players(), &[2]);
    }

    #[test]
    fn collection_is_idempotent() {
        let mut sa = seats(&[100, 100]);
        sa.player_mut(0).bet(30.into());
        sa.player_mut(1).bet(30.into());
        let mut pm = PotManager::new();
        pm.collect_bets_from(&mut SeatView::new(&mut sa, filter(2)));
        assert_eq!(pm.pots().len(), 1);
        assert_eq!(pm.pots()[0].size(), 60.into());
        pm.collect_bets_from(&mut SeatView::new(&mut sa, filter(2)));
        assert_eq!(pm.pots().len(), 1);
        assert_eq!(pm.pots()[0].size(), 60.into());
        assert_eq!(pm.pots()[0].eligible_players(), &[0, 1]);
    }

    #[test]
    fn folded_bets_flow_into_the_pot() {
        // One player folded 30, two players have 50 on the felt.
        let mut sa = seats(&[100, 100]);
        sa.player_mut(0).bet(50.into());
        sa.player_mut(1).bet(50.into());
        let mut pm = PotManager::new();
        pm.bet_folded(30.into());
        pm.collect_bets_from(&mut SeatView::new(&mut sa, filter(2)));
        assert_eq!(pm.pots().len(), 1);
        assert_eq!(pm.pots()[0].size(), 130.into());
    }

    #[test]
    fn folded_bets_cap_per_pot_and_spill_over() {
        // Folder left 120 behind; the live layers are 10 deep (3 players)
        // and 40 deep (2 players). Each pot absorbs at most its own depth
        // per eligible player; the rest rides up the side pots.
        let mut sa = seats(&[100, 100, 100]);
        sa.player_mut(0).bet(10.into());
        sa.player_mut(1).bet(50.into());
        sa.player_mut(2).bet(50.into());
        let mut pm = PotManager::new();
        pm.bet_folded(120.into());
        pm.collect_bets_from(&mut SeatView::new(&mut sa, filter(3)));
        // Layer one: 3 players x 10 = 30, absorbs min(120, 3*10) = 30 folded.
        // Layer two: 2 players x 40 = 80, absorbs min(90, 2*40) = 80 folded.
        // Remaining 10 folded chips top up the last pot.
        let sizes: Vec<Chips> = pm.pots().iter().map(Pot::size).collect();
        assert_eq!(sizes, vec![60.into(), 170.into()]);
        let total: i32 = pm.pots().iter().map(|p| *p.size()).sum();
        assert_eq!(total, 10 + 50 + 50 + 120);
    }

    #[test]
    fn main_pot_depth_is_per_capita_equal() {
        let mut sa = seats(&[100, 200, 300]);
        sa.player_mut(0).bet(100.into());
        sa.player_mut(1).bet(200.into());
        sa.player_mut(2).bet(200.into());
        let mut pm = PotManager::new();
        pm.collect_bets_from(&mut SeatView::new(&mut sa, filter(3)));
        // Everyone in the main pot put in exactly 100.
        assert_eq!(pm.pots()[0].size(), 300.into());
        assert_eq!(pm.pots()[0].eligible_players().len(), 3);
        for seat in 0..3 {
            assert_eq!(sa.player(seat).bet_size(), Chips::ZERO);
        }
    }

    #[test]
    fn shares_split_evenly() {
        let as_i32 = |v: Vec<Chips>| v.into_iter().map(|c| *c).collect::<Vec<_>>();
        assert_eq!(as_i32(even_shares(5.into(), 3)), vec![2, 2, 1]);
        assert_eq!(as_i32(even_shares(6.into(), 2)), vec![3, 3]);
        assert_eq!(as_i32(even_shares(8.into(), 5)), vec![2, 2, 2, 1, 1]);
        assert_eq!(as_i32(even_shares(40.into(), 1)), vec![40]);
    }
}

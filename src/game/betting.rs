use super::pot::Chips;
use super::round::{Round, RoundAction};
use super::seats::SeatArray;
use super::ChipRange;
use crate::{SeatIdx, NUM_SEATS};

/// The betting round's internal alphabet. `Match` brings the player's
/// commitment up to the standing bet (clamped by their stack); `Raise`
/// carries the player's new total bet for the street.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetAction {
    Leave,
    Match,
    Raise(Chips),
}

/// What the player to act may do with chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetRange {
    pub can_raise: bool,
    pub chip_range: ChipRange,
}

/// A [`Round`] plus the chip state of one street: the bet to match and the
/// minimum re-raise step. Player chips live in the [`SeatArray`] the caller
/// passes into each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingRound {
    round: Round,
    biggest_bet: Chips,
    min_raise: Chips,
}

impl BettingRound {
    /// `min_raise` seeds both the bet to match and the raise step: the big
    /// blind preflop, zero on later streets where the first voluntary bet
    /// sets its own level.
    pub fn new(active: [bool; NUM_SEATS], first_to_act: SeatIdx, min_raise: Chips) -> Self {
        BettingRound {
            round: Round::new(active, first_to_act),
            biggest_bet: min_raise,
            min_raise,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.round.in_progress()
    }

    pub fn player_to_act(&self) -> SeatIdx {
        self.round.player_to_act()
    }

    pub fn biggest_bet(&self) -> Chips {
        self.biggest_bet
    }

    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }

    pub fn num_active_players(&self) -> usize {
        self.round.num_active_players()
    }

    pub fn active_players(&self) -> &[bool; NUM_SEATS] {
        self.round.active_players()
    }

    /// A player can raise whenever their total chips exceed the standing
    /// bet. The legal window is `[biggest_bet + min_raise, total]`, except
    /// that a player too short for a full raise may still push exactly
    /// their total (the short all-in).
    pub fn legal_actions(&self, players: &SeatArray) -> BetRange {
        let player = players.player(self.player_to_act());
        let total = player.total_chips();
        let can_raise = total > self.biggest_bet;
        if can_raise {
            let min_bet = self.biggest_bet + self.min_raise;
            BetRange {
                can_raise,
                chip_range: ChipRange {
                    min: min_bet.min(total),
                    max: total,
                },
            }
        } else {
            BetRange {
                can_raise,
                chip_range: ChipRange {
                    min: Chips::ZERO,
                    max: Chips::ZERO,
                },
            }
        }
    }

    pub fn is_raise_valid(&self, players: &SeatArray, bet: Chips) -> bool {
        let player = players.player(self.player_to_act());
        let player_chips = player.stack() + player.bet_size();
        let min_bet = self.biggest_bet + self.min_raise;
        if player_chips > self.biggest_bet && player_chips < min_bet {
            bet == player_chips
        } else {
            bet >= min_bet && bet <= player_chips
        }
    }

    pub fn action_taken(&mut self, players: &mut SeatArray, action: BetAction) {
        assert!(self.in_progress());
        let seat = self.player_to_act();
        match action {
            BetAction::Raise(bet) => {
                assert!(self.is_raise_valid(players, bet));
                let player = players.player_mut(seat);
                player.bet(bet);
                // A short all-in reopens the action but does not move the
                // raise step; only a full raise resets it.
                if bet - self.biggest_bet >= self.min_raise {
                    self.min_raise = bet - self.biggest_bet;
                }
                self.biggest_bet = bet;
                if player.stack() == Chips::ZERO {
                    self.round.action_taken(RoundAction::AggressiveLeave);
                } else {
                    self.round.action_taken(RoundAction::Aggressive);
                }
            }
            BetAction::Match => {
                let player = players.player_mut(seat);
                player.bet(self.biggest_bet.min(player.total_chips()));
                if player.stack() == Chips::ZERO {
                    self.round.action_taken(RoundAction::PassiveLeave);
                } else {
                    self.round.action_taken(RoundAction::Passive);
                }
            }
            BetAction::Leave => self.round.action_taken(RoundAction::Leave),
        }
    }
}

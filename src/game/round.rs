use crate::{SeatIdx, NUM_SEATS};

/// What a rotation step is told about the action that was just taken.
/// Passive and aggressive are mutually exclusive by construction; leaving
/// can ride along with either (a player betting or calling their whole
/// stack acts and drops out of the rotation in one step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAction {
    Leave,
    Passive,
    PassiveLeave,
    Aggressive,
    AggressiveLeave,
}

impl RoundAction {
    pub const fn is_aggressive(self) -> bool {
        matches!(self, RoundAction::Aggressive | RoundAction::AggressiveLeave)
    }

    pub const fn is_passive(self) -> bool {
        matches!(self, RoundAction::Passive | RoundAction::PassiveLeave)
    }

    pub const fn leaves(self) -> bool {
        matches!(
            self,
            RoundAction::Leave | RoundAction::PassiveLeave | RoundAction::AggressiveLeave
        )
    }
}

/// The pure rotation state machine of one betting round: whose turn it is
/// and when action closes. It knows nothing about chips; the betting layer
/// above translates bets into [`RoundAction`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    active: [bool; NUM_SEATS],
    player_to_act: SeatIdx,
    last_aggressive_actor: SeatIdx,
    contested: bool,
    first_action: bool,
    num_active: usize,
}

impl Round {
    pub fn new(active: [bool; NUM_SEATS], first_to_act: SeatIdx) -> Self {
        assert!(active[first_to_act], "first to act must be active");
        Round {
            active,
            player_to_act: first_to_act,
            last_aggressive_actor: first_to_act,
            contested: false,
            first_action: true,
            num_active: active.iter().filter(|&&a| a).count(),
        }
    }

    pub fn active_players(&self) -> &[bool; NUM_SEATS] {
        &self.active
    }

    /// Only meaningful while [`Round::in_progress`] holds.
    pub fn player_to_act(&self) -> SeatIdx {
        self.player_to_act
    }

    pub fn last_aggressive_actor(&self) -> SeatIdx {
        self.last_aggressive_actor
    }

    pub fn num_active_players(&self) -> usize {
        self.num_active
    }

    /// The round runs until either everyone has responded to the standing
    /// action (the turn comes back around to the last aggressor) or nobody
    /// is left to contest it.
    pub fn in_progress(&self) -> bool {
        (self.contested || self.num_active > 1)
            && (self.first_action || self.player_to_act != self.last_aggressive_actor)
    }

    pub fn action_taken(&mut self, action: RoundAction) {
        assert!(self.in_progress());
        self.first_action = false;
        // Aggression restarts the clock: everyone else gets another turn.
        if action.is_aggressive() {
            self.last_aggressive_actor = self.player_to_act;
            self.contested = true;
        } else if action.is_passive() {
            self.contested = true;
        }
        if action.leaves() {
            self.active[self.player_to_act] = false;
            self.num_active -= 1;
        }
        self.advance();
    }

    fn advance(&mut self) {
        loop {
            self.player_to_act = (self.player_to_act + 1) % NUM_SEATS;
            if self.player_to_act == self.last_aggressive_actor || self.active[self.player_to_act]
            {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(n: usize) -> [bool; NUM_SEATS] {
        let mut a = [false; NUM_SEATS];
        a[..n].iter_mut().for_each(|b| *b = true);
        a
    }

    #[test]
    fn construction() {
        let r = Round::new(active(3), 0);
        assert!(r.in_progress());
        assert_eq!(r.player_to_act(), r.last_aggressive_actor());
        assert_eq!(r.player_to_act(), 0);
        assert_eq!(r.num_active_players(), 3);
    }

    #[test]
    fn aggression_moves_nothing_but_the_turn_at_first() {
        let mut r = Round::new(active(2), 0);
        r.action_taken(RoundAction::Aggressive);
        assert_eq!(r.last_aggressive_actor(), 0);
        assert_eq!(r.player_to_act(), 1);
        assert!(r.in_progress());
        assert_eq!(r.num_active_players(), 2);
    }

    #[test]
    fn aggressive_leave_keeps_the_action_open() {
        // The all-in case: the aggressor leaves the rotation but the action
        // they opened still has to close back on their seat.
        let mut r = Round::new(active(2), 0);
        r.action_taken(RoundAction::AggressiveLeave);
        assert_eq!(r.last_aggressive_actor(), 0);
        assert_eq!(r.player_to_act(), 1);
        assert!(r.in_progress());
        assert_eq!(r.num_active_players(), 1);
    }

    #[test]
    fn passive_response_closes_the_round() {
        let mut r = Round::new(active(2), 0);
        r.action_taken(RoundAction::Aggressive);
        r.action_taken(RoundAction::Passive);
        assert!(!r.in_progress());
    }

    #[test]
    fn re_raise_reopens_the_round() {
        let mut r = Round::new(active(2), 0);
        r.action_taken(RoundAction::Aggressive);
        r.action_taken(RoundAction::Aggressive);
        assert_eq!(r.last_aggressive_actor(), 1);
        assert_eq!(r.player_to_act(), 0);
        assert!(r.in_progress());
    }

    #[test]
    fn opening_leave_heads_up_ends_the_round() {
        let mut r = Round::new(active(2), 0);
        r.action_taken(RoundAction::Leave);
        assert!(!r.in_progress());
        assert_eq!(r.num_active_players(), 1);
    }

    #[test]
    fn two_leavers_one_contesting_do_not_end_the_round() {
        let mut r = Round::new(active(3), 0);
        r.action_taken(RoundAction::AggressiveLeave);
        r.action_taken(RoundAction::PassiveLeave);
        assert!(r.in_progress());
        assert_eq!(r.player_to_act(), 2);
    }

    #[test]
    fn rotation_skips_leavers() {
        let mut r = Round::new(active(4), 0);
        r.action_taken(RoundAction::Aggressive);
        r.action_taken(RoundAction::Leave);
        assert_eq!(r.player_to_act(), 2);
        r.action_taken(RoundAction::Passive);
        r.action_taken(RoundAction::Passive);
        // Back at the aggressor's seat, round over.
        assert!(!r.in_progress());
    }

    #[test]
    fn all_but_one_leaving_ends_with_one_active() {
        let mut r = Round::new(active(4), 0);
        r.action_taken(RoundAction::Leave);
        r.action_taken(RoundAction::Leave);
        r.action_taken(RoundAction::Leave);
        assert!(!r.in_progress());
        assert_eq!(r.num_active_players(), 1);
    }

    #[test]
    fn checked_around_ends_on_the_opener() {
        let mut r = Round::new(active(3), 1);
        r.action_taken(RoundAction::Passive);
        r.action_taken(RoundAction::Passive);
        assert!(r.in_progress());
        r.action_taken(RoundAction::Passive);
        assert!(!r.in_progress());
        assert_eq!(r.player_to_act(), r.last_aggressive_actor());
    }

    #[test]
    fn rounds_terminate_in_bounded_steps() {
        // However the actions fall, a k-player round cannot rotate forever.
        for first in 0..3 {
            let mut r = Round::new(active(3), first);
            let mut steps = 0;
            while r.in_progress() {
                r.action_taken(RoundAction::Passive);
                steps += 1;
                assert!(steps <= 3);
            }
        }
    }
}

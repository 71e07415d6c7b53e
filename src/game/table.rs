use super::dealer::{ActionRange, Dealer};
use super::pot::{Chips, Pot};
use super::seats::{Player, SeatArray};
use super::{Action, ActionKind, BetRound, CommunityCards, ForcedBets, GameError};
use crate::cards::{Deck, HoleCards};
use crate::{SeatIdx, NUM_SEATS};
use enum_map::{Enum, EnumMap};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A decision a player commits to ahead of their turn. It fires by itself
/// when the action reaches them, after being amended to fit whatever the
/// betting situation has become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, Serialize, Deserialize)]
pub enum AutomaticAction {
    Fold,
    CheckFold,
    Check,
    Call,
    CallAny,
    AllIn,
}

/// A poker table: a [`Dealer`] wrapped with seat lifecycle across hands,
/// button rotation, and automatic actions.
///
/// The table owns every resource of the game. Each `start_hand` freezes a
/// snapshot of the seated players for the dealer to mutate; players who sit
/// down mid-hand wait out the current hand, players who stand up mid-hand
/// are folded out of it.
#[derive(Debug)]
pub struct Table {
    // All players physically present at the table.
    table_players: SeatArray,
    // The snapshot the current hand is played over.
    hand_players: SeatArray,
    // Seats that joined (or left) after the current hand started.
    staged: [bool; NUM_SEATS],
    auto_actions: [Option<AutomaticAction>; NUM_SEATS],
    button: SeatIdx,
    first_hand: bool,
    button_set_manually: bool,
    forced_bets: ForcedBets,
    deck: Deck,
    community_cards: CommunityCards,
    dealer: Option<Dealer>,
}

impl Table {
    pub fn new(forced_bets: ForcedBets) -> Self {
        Table {
            table_players: SeatArray::new(),
            hand_players: SeatArray::new(),
            staged: [false; NUM_SEATS],
            auto_actions: [None; NUM_SEATS],
            button: 0,
            first_hand: true,
            button_set_manually: false,
            forced_bets,
            deck: Deck::default(),
            community_cards: CommunityCards::new(),
            dealer: None,
        }
    }

    pub fn seats(&self) -> &SeatArray {
        &self.table_players
    }

    pub fn forced_bets(&self) -> ForcedBets {
        self.forced_bets
    }

    pub fn set_forced_bets(&mut self, forced_bets: ForcedBets) -> Result<(), GameError> {
        if self.hand_in_progress() {
            return Err(GameError::HandInProgress);
        }
        self.forced_bets = forced_bets;
        Ok(())
    }

    pub fn hand_in_progress(&self) -> bool {
        self.dealer.as_ref().map_or(false, Dealer::hand_in_progress)
    }

    pub fn betting_round_in_progress(&self) -> bool {
        self.dealer
            .as_ref()
            .map_or(false, Dealer::betting_round_in_progress)
    }

    pub fn betting_rounds_completed(&self) -> bool {
        self.dealer
            .as_ref()
            .map_or(false, Dealer::betting_rounds_completed)
    }

    pub fn player_to_act(&self) -> Option<SeatIdx> {
        self.dealer.as_ref().and_then(Dealer::player_to_act)
    }

    /// Meaningful from the first `start_hand` on.
    pub fn button(&self) -> SeatIdx {
        self.button
    }

    /// Meaningful while a hand is in progress.
    pub fn round_of_betting(&self) -> BetRound {
        self.dealer
            .as_ref()
            .map_or(BetRound::Preflop, Dealer::round_of_betting)
    }

    pub fn num_active_players(&self) -> usize {
        self.dealer.as_ref().map_or(0, Dealer::num_active_players)
    }

    pub fn community_cards(&self) -> &CommunityCards {
        &self.community_cards
    }

    /// The snapshot of players the current hand is played over.
    pub fn hand_players(&self) -> &SeatArray {
        &self.hand_players
    }

    /// Which seats are still contesting the current hand.
    pub fn hand_filter(&self) -> [bool; NUM_SEATS] {
        self.dealer
            .as_ref()
            .map_or([false; NUM_SEATS], |d| *d.contesting())
    }

    pub fn hole_cards(&self) -> [Option<HoleCards>; NUM_SEATS] {
        self.dealer
            .as_ref()
            .map_or([None; NUM_SEATS], Dealer::hole_cards)
    }

    pub fn legal_actions(&self) -> Option<ActionRange> {
        self.dealer.as_ref()?.legal_actions(&self.hand_players)
    }

    pub fn pots(&self) -> &[Pot] {
        self.dealer.as_ref().map_or(&[][..], Dealer::pots)
    }

    pub fn automatic_actions(&self) -> &[Option<AutomaticAction>; NUM_SEATS] {
        &self.auto_actions
    }

    /// Only players who have been in the hand since it started may put an
    /// automatic action on file, and only while betting is running.
    pub fn can_set_automatic_action(&self, seat: SeatIdx) -> bool {
        self.betting_round_in_progress()
            && !self.staged[seat]
            && self.table_players.is_occupied(seat)
    }

    /// # Panics
    ///
    /// Panics when [`Table::can_set_automatic_action`] does not hold for
    /// the seat.
    pub fn legal_automatic_actions(&self, seat: SeatIdx) -> EnumMap<AutomaticAction, bool> {
        assert!(self.can_set_automatic_action(seat));
        let dealer = self.dealer.as_ref().unwrap();
        let biggest_bet = dealer.biggest_bet();
        let player = self.table_players.player(seat);
        let bet_gap = biggest_bet - player.bet_size();
        let total = player.total_chips();
        let mut legal: EnumMap<AutomaticAction, bool> = EnumMap::default();
        legal[AutomaticAction::Fold] = true;
        legal[AutomaticAction::AllIn] = true;
        if bet_gap == Chips::ZERO {
            legal[AutomaticAction::CheckFold] = true;
            legal[AutomaticAction::Check] = true;
        } else {
            legal[AutomaticAction::Call] = true;
        }
        // When the standing bet already covers the stack there is no "any"
        // left to promise.
        if biggest_bet < total {
            legal[AutomaticAction::CallAny] = true;
        }
        legal
    }

    pub fn set_automatic_action(
        &mut self,
        seat: SeatIdx,
        action: AutomaticAction,
    ) -> Result<(), GameError> {
        if !self.can_set_automatic_action(seat) || Some(seat) == self.player_to_act() {
            return Err(GameError::CannotSetAutomaticAction);
        }
        if !self.legal_automatic_actions(seat)[action] {
            return Err(GameError::IllegalAutomaticAction);
        }
        self.auto_actions[seat] = Some(action);
        Ok(())
    }

    pub fn sit_down(&mut self, seat: SeatIdx, buy_in: Chips) -> Result<(), GameError> {
        if seat >= NUM_SEATS {
            return Err(GameError::InvalidSeat);
        }
        if self.table_players.is_occupied(seat) {
            return Err(GameError::SeatTaken);
        }
        self.table_players.add_player(seat, Player::new(buy_in));
        self.staged[seat] = true;
        Ok(())
    }

    /// Removes a player from the table. Mid-hand the departure plays out as
    /// a fold: immediately when it is their turn, otherwise as an automatic
    /// action; chips they committed stay in the pots.
    pub fn stand_up(&mut self, seat: SeatIdx) -> Result<(), GameError> {
        if seat >= NUM_SEATS {
            return Err(GameError::InvalidSeat);
        }
        if !self.table_players.is_occupied(seat) {
            return Err(GameError::SeatEmpty);
        }
        if !self.hand_in_progress() {
            self.table_players.remove_player(seat);
            return Ok(());
        }
        if self.betting_round_in_progress() && Some(seat) == self.player_to_act() {
            self.action_taken(Action::Fold)?;
            self.table_players.remove_player(seat);
            self.staged[seat] = true;
        } else if self.betting_round_in_progress() && self.hand_players.is_occupied(seat) {
            self.set_automatic_action(seat, AutomaticAction::Fold)?;
            self.table_players.remove_player(seat);
            self.staged[seat] = true;
            if self.single_active_player_remaining() {
                // The lone live player just acts passively; the pending
                // automatic folds unwind the rest of the hand by themselves.
                self.act_passively()?;
            }
        } else {
            // No betting round is running (between streets, or the hand is
            // past its last one), or the player joined mid-hand. The seat
            // frees up now; a player still in the hand leaves an automatic
            // fold behind for the next street.
            if self.hand_players.is_occupied(seat) && !self.betting_rounds_completed() {
                self.auto_actions[seat] = Some(AutomaticAction::Fold);
            }
            self.table_players.remove_player(seat);
            self.staged[seat] = true;
        }
        Ok(())
    }

    /// Starts a new hand over everyone currently seated. `button` forces
    /// the button to a seat; otherwise it advances to the next occupied
    /// seat (the lowest occupied one for the table's first hand).
    pub fn start_hand<R: Rng>(
        &mut self,
        rng: &mut R,
        button: Option<SeatIdx>,
    ) -> Result<(), GameError> {
        if self.hand_in_progress() {
            return Err(GameError::HandInProgress);
        }
        if let Some(seat) = button {
            if seat >= NUM_SEATS {
                return Err(GameError::InvalidSeat);
            }
            if !self.table_players.is_occupied(seat) {
                return Err(GameError::SeatEmpty);
            }
            self.button = seat;
            self.button_set_manually = true;
        }
        if self.table_players.occupied_count() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        self.staged = [false; NUM_SEATS];
        self.auto_actions = [None; NUM_SEATS];
        self.hand_players = self.table_players.clone();
        self.advance_button();
        self.deck = Deck::new(rng);
        self.community_cards = CommunityCards::new();
        let mut dealer = Dealer::new(&self.hand_players, self.button, self.forced_bets);
        dealer.start_hand(&mut self.hand_players, &mut self.deck)?;
        self.dealer = Some(dealer);
        self.update_table_players();
        Ok(())
    }

    pub fn action_taken(&mut self, action: Action) -> Result<(), GameError> {
        let dealer = self.dealer.as_mut().ok_or(GameError::NoHandInProgress)?;
        dealer.action_taken(&mut self.hand_players, action)?;
        self.run_automatic_actions()?;
        if self.betting_round_in_progress() && self.single_active_player_remaining() {
            self.act_passively()?;
        }
        self.update_table_players();
        Ok(())
    }

    pub fn end_betting_round(&mut self) -> Result<(), GameError> {
        let dealer = self.dealer.as_mut().ok_or(GameError::NoHandInProgress)?;
        dealer.end_betting_round(
            &mut self.hand_players,
            &mut self.deck,
            &mut self.community_cards,
        )?;
        self.amend_automatic_actions();
        // The new street may open on a seat with an action already on file.
        self.run_automatic_actions()?;
        if self.betting_round_in_progress() && self.single_active_player_remaining() {
            self.act_passively()?;
        }
        self.update_table_players();
        Ok(())
    }

    pub fn showdown(&mut self) -> Result<(), GameError> {
        let dealer = self.dealer.as_mut().ok_or(GameError::NoHandInProgress)?;
        dealer.showdown(&mut self.hand_players, &self.community_cards)?;
        self.update_table_players();
        Ok(())
    }

    fn advance_button(&mut self) {
        if self.button_set_manually {
            self.button_set_manually = false;
            self.first_hand = false;
        } else if self.first_hand {
            self.button = self.hand_players.first_occupied().unwrap();
            self.first_hand = false;
        } else {
            // Scanning for the next occupied seat also covers a button
            // whose seat has been vacated since the last hand.
            self.button = self.hand_players.next_occupied_after(self.button).unwrap();
        }
    }

    /// Fires pending automatic actions for as long as the turn lands on
    /// seats that have one, amending the rest after every action.
    fn run_automatic_actions(&mut self) -> Result<(), GameError> {
        while self.betting_round_in_progress() {
            self.amend_automatic_actions();
            let seat = self.player_to_act().unwrap();
            match self.auto_actions[seat].take() {
                Some(action) => self.take_automatic_action(action)?,
                None => break,
            }
        }
        Ok(())
    }

    fn take_automatic_action(&mut self, action: AutomaticAction) -> Result<(), GameError> {
        let dealer = self.dealer.as_mut().unwrap();
        let seat = dealer.player_to_act().unwrap();
        let player = self.hand_players.player(seat);
        let biggest_bet = dealer.biggest_bet();
        let bet_gap = biggest_bet - player.bet_size();
        let bet_size = player.bet_size();
        let total = player.total_chips();
        let concrete = match action {
            AutomaticAction::Fold => Action::Fold,
            AutomaticAction::CheckFold => {
                if bet_gap == Chips::ZERO {
                    Action::Check
                } else {
                    Action::Fold
                }
            }
            AutomaticAction::Check => Action::Check,
            AutomaticAction::Call => Action::Call,
            AutomaticAction::CallAny => {
                if bet_gap == Chips::ZERO {
                    Action::Check
                } else {
                    Action::Call
                }
            }
            AutomaticAction::AllIn => {
                if total > biggest_bet {
                    // The aggressive label depends on whether chips are
                    // already committed and a bet stands; the betting round
                    // treats them all as a raise to `total`.
                    if bet_gap == Chips::ZERO && bet_size == Chips::ZERO {
                        Action::Bet(total)
                    } else {
                        Action::Raise(total)
                    }
                } else {
                    Action::Call
                }
            }
        };
        dealer.action_taken(&mut self.hand_players, concrete)
    }

    /// Downgrades pending automatic actions that the latest betting no
    /// longer supports: a promised check becomes a fold (or nothing), an
    /// open-ended call-any collapses to a plain call once the player is
    /// covered.
    fn amend_automatic_actions(&mut self) {
        let Some(dealer) = self.dealer.as_ref() else {
            return;
        };
        let biggest_bet = dealer.biggest_bet();
        for seat in 0..NUM_SEATS {
            let Some(action) = self.auto_actions[seat] else {
                continue;
            };
            let player = self.hand_players.player(seat);
            let bet_gap = biggest_bet - player.bet_size();
            let total = player.total_chips();
            match action {
                AutomaticAction::CheckFold if bet_gap > Chips::ZERO => {
                    self.auto_actions[seat] = Some(AutomaticAction::Fold);
                }
                AutomaticAction::Check if bet_gap > Chips::ZERO => {
                    self.auto_actions[seat] = None;
                }
                AutomaticAction::CallAny if biggest_bet >= total => {
                    self.auto_actions[seat] = Some(AutomaticAction::Call);
                }
                _ => {}
            }
        }
    }

    /// Check if possible, else call.
    fn act_passively(&mut self) -> Result<(), GameError> {
        let range = self.legal_actions().ok_or(GameError::NoBettingRound)?;
        if range.allowed[ActionKind::Check] {
            self.action_taken(Action::Check)
        } else {
            self.action_taken(Action::Call)
        }
    }

    /// A player is live when still contesting the betting round and not
    /// stood up this hand. Stood-up players linger in the round with a
    /// pending automatic fold, which is why the filter alone is not enough.
    fn single_active_player_remaining(&self) -> bool {
        let filter = self.hand_filter();
        let live = (0..NUM_SEATS)
            .filter(|&s| filter[s] && !self.staged[s])
            .count();
        live == 1
    }

    /// Writes the hand snapshot back over the physical seats, skipping any
    /// seat that changed hands since the hand started.
    fn update_table_players(&mut self) {
        for seat in 0..NUM_SEATS {
            if !self.staged[seat] && self.hand_players.is_occupied(seat) {
                *self.table_players.player_mut(seat) = *self.hand_players.player(seat);
            }
        }
    }
}

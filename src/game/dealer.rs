use super::betting::{BetAction, BettingRound};
use super::pot::{even_shares, Chips, Pot, PotManager};
use super::seats::{SeatArray, SeatView};
use super::{Action, ActionKind, BetRound, ChipRange, CommunityCards, ForcedBets, GameError};
use crate::cards::{Deck, Hand, HoleCards};
use crate::{SeatIdx, NUM_SEATS};
use enum_map::EnumMap;

/// The legal moves for the player to act, with the chip window for an
/// aggressive one.
#[derive(Debug, Clone, Copy)]
pub struct ActionRange {
    pub allowed: EnumMap<ActionKind, bool>,
    pub chip_range: ChipRange,
}

impl ActionRange {
    pub fn contains(&self, action: Action) -> bool {
        if !self.allowed[action.kind()] {
            return false;
        }
        match action {
            Action::Bet(amount) | Action::Raise(amount) => self.chip_range.contains(amount),
            _ => true,
        }
    }
}

/// The per-hand orchestrator: forced bets, dealing, the four betting
/// rounds, and showdown payout.
///
/// A dealer is built fresh for every hand. It owns the hand's state (hole
/// cards, pots, the street) but not the table's resources; the seat array,
/// deck, and board are passed into each operation by their owner.
#[derive(Debug)]
pub struct Dealer {
    button: SeatIdx,
    forced_bets: ForcedBets,
    // Seats still contesting the hand. Folding clears a seat here; the pots
    // remember who is eligible for what.
    filter: [bool; NUM_SEATS],
    betting_round: Option<BettingRound>,
    hole_cards: [Option<HoleCards>; NUM_SEATS],
    hand_in_progress: bool,
    round_of_betting: BetRound,
    betting_rounds_completed: bool,
    pot_manager: PotManager,
}

impl Dealer {
    pub fn new(players: &SeatArray, button: SeatIdx, forced_bets: ForcedBets) -> Self {
        assert!(players.is_occupied(button), "button seat must be occupied");
        Dealer {
            button,
            forced_bets,
            filter: players.occupancy(),
            betting_round: None,
            hole_cards: [None; NUM_SEATS],
            hand_in_progress: false,
            round_of_betting: BetRound::Preflop,
            betting_rounds_completed: false,
            pot_manager: PotManager::new(),
        }
    }

    pub fn hand_in_progress(&self) -> bool {
        self.hand_in_progress
    }

    pub fn betting_rounds_completed(&self) -> bool {
        self.betting_rounds_completed
    }

    pub fn betting_round_in_progress(&self) -> bool {
        self.betting_round
            .as_ref()
            .map_or(false, BettingRound::in_progress)
    }

    pub fn player_to_act(&self) -> Option<SeatIdx> {
        self.betting_round
            .as_ref()
            .filter(|br| br.in_progress())
            .map(BettingRound::player_to_act)
    }

    pub fn round_of_betting(&self) -> BetRound {
        self.round_of_betting
    }

    pub fn num_active_players(&self) -> usize {
        self.betting_round
            .as_ref()
            .map_or(0, BettingRound::num_active_players)
    }

    pub fn biggest_bet(&self) -> Chips {
        self.betting_round
            .as_ref()
            .map_or(Chips::ZERO, BettingRound::biggest_bet)
    }

    pub fn button(&self) -> SeatIdx {
        self.button
    }

    /// Which seats are still contesting the hand.
    pub fn contesting(&self) -> &[bool; NUM_SEATS] {
        &self.filter
    }

    pub fn pots(&self) -> &[Pot] {
        self.pot_manager.pots()
    }

    /// Hole cards of the seats still contesting the hand.
    pub fn hole_cards(&self) -> [Option<HoleCards>; NUM_SEATS] {
        let mut cards = [None; NUM_SEATS];
        for seat in 0..NUM_SEATS {
            if self.filter[seat] {
                cards[seat] = self.hole_cards[seat];
            }
        }
        cards
    }

    /// `None` when no betting round is running.
    pub fn legal_actions(&self, players: &SeatArray) -> Option<ActionRange> {
        let br = self.betting_round.as_ref().filter(|br| br.in_progress())?;
        let player = players.player(br.player_to_act());
        let range = br.legal_actions(players);
        let mut allowed: EnumMap<ActionKind, bool> = EnumMap::default();
        allowed[ActionKind::Fold] = true;
        if br.biggest_bet() - player.bet_size() == Chips::ZERO {
            allowed[ActionKind::Check] = true;
            // Nothing to match means the player must be able to push chips.
            assert!(range.can_raise);
            // With chips already committed this street the player is the
            // big blind; their aggressive option reads as a re-raise.
            if player.bet_size() > Chips::ZERO {
                allowed[ActionKind::Raise] = true;
            } else {
                allowed[ActionKind::Bet] = true;
            }
        } else {
            allowed[ActionKind::Call] = true;
            if range.can_raise {
                allowed[ActionKind::Raise] = true;
            }
        }
        Some(ActionRange {
            allowed,
            chip_range: range.chip_range,
        })
    }

    /// Posts forced bets, deals hole cards, and opens the preflop betting
    /// round (unless blinds already put everyone all-in).
    pub fn start_hand(&mut self, players: &mut SeatArray, deck: &mut Deck) -> Result<(), GameError> {
        if self.hand_in_progress {
            return Err(GameError::HandInProgress);
        }
        debug_assert_eq!(deck.len(), 52, "deck must be whole");
        self.betting_rounds_completed = false;
        self.round_of_betting = BetRound::Preflop;
        self.collect_ante(players);
        let big_blind_seat = self.post_blinds(players);
        let first_to_act = self.next_or_wrap(big_blind_seat);
        self.deal_hole_cards(deck)?;
        let can_still_bet = (0..NUM_SEATS)
            .filter(|&s| self.filter[s] && players.player(s).stack() > Chips::ZERO)
            .count();
        if can_still_bet > 1 {
            self.betting_round = Some(BettingRound::new(
                self.filter,
                first_to_act,
                self.forced_bets.blinds.big,
            ));
        }
        self.hand_in_progress = true;
        Ok(())
    }

    pub fn action_taken(&mut self, players: &mut SeatArray, action: Action) -> Result<(), GameError> {
        let range = self
            .legal_actions(players)
            .ok_or(GameError::NoBettingRound)?;
        if !range.contains(action) {
            return Err(GameError::IllegalAction);
        }
        let br = self.betting_round.as_mut().unwrap();
        match action {
            Action::Check | Action::Call => br.action_taken(players, BetAction::Match),
            Action::Bet(amount) | Action::Raise(amount) => {
                br.action_taken(players, BetAction::Raise(amount))
            }
            Action::Fold => {
                let seat = br.player_to_act();
                let folded = players.player(seat).bet_size();
                players.player_mut(seat).take_from_bet(folded);
                self.pot_manager.bet_folded(folded);
                self.filter[seat] = false;
                br.action_taken(players, BetAction::Leave);
            }
        }
        Ok(())
    }

    /// Sweeps the street's bets into the pots and either opens the next
    /// street, runs the board out for an all-in, or flags the betting as
    /// complete at the river.
    pub fn end_betting_round(
        &mut self,
        players: &mut SeatArray,
        deck: &mut Deck,
        community_cards: &mut CommunityCards,
    ) -> Result<(), GameError> {
        if self.betting_rounds_completed {
            return Err(GameError::BettingRoundsCompleted);
        }
        if self.betting_round_in_progress() {
            return Err(GameError::BettingRoundInProgress);
        }
        let mut view = SeatView::new(players, self.filter);
        self.pot_manager.collect_bets_from(&mut view);
        if self.num_active_players() <= 1 {
            self.round_of_betting = BetRound::River;
            // With a lone player in a lone pot there is no hand to compare,
            // so the undealt board stays undealt (and unrevealed).
            let uncontested = self.pot_manager.pots().len() == 1
                && self.pot_manager.pots()[0].eligible_players().len() == 1;
            if !uncontested {
                self.deal_community_cards(deck, community_cards)?;
            }
            self.betting_rounds_completed = true;
        } else if self.round_of_betting < BetRound::River {
            self.round_of_betting = self.round_of_betting.next();
            // Players who went all-in on the closed street leave the filter
            // here; they stay eligible for the pots they funded.
            self.filter = *self.betting_round.as_ref().unwrap().active_players();
            let first_to_act = self.next_or_wrap(self.button);
            self.betting_round = Some(BettingRound::new(self.filter, first_to_act, Chips::ZERO));
            self.deal_community_cards(deck, community_cards)?;
        } else {
            self.betting_rounds_completed = true;
        }
        Ok(())
    }

    /// Pays every pot out to its best eligible hand(s). With a single
    /// uncontested pot the chips move without any evaluation or reveal.
    pub fn showdown(
        &mut self,
        players: &mut SeatArray,
        community_cards: &CommunityCards,
    ) -> Result<(), GameError> {
        if self.betting_round_in_progress() {
            return Err(GameError::BettingRoundInProgress);
        }
        if self.round_of_betting != BetRound::River || !self.betting_rounds_completed {
            return Err(GameError::BettingRoundsNotCompleted);
        }
        self.hand_in_progress = false;
        let pots = self.pot_manager.pots();
        if pots.len() == 1 && pots[0].eligible_players().len() == 1 {
            let seat = pots[0].eligible_players()[0];
            players.player_mut(seat).add_to_stack(pots[0].size());
            return Ok(());
        }
        for pot in self.pot_manager.pots() {
            if pot.eligible_players().is_empty() || pot.size() == Chips::ZERO {
                continue;
            }
            let mut results: Vec<(SeatIdx, Hand)> = pot
                .eligible_players()
                .iter()
                .map(|&seat| {
                    let hole = self.hole_cards[seat].unwrap();
                    (seat, Hand::of(hole, community_cards))
                })
                .collect();
            results.sort_by(|a, b| b.1.cmp(&a.1));
            let best = results[0].1;
            let mut winners: Vec<SeatIdx> = results
                .iter()
                .take_while(|(_, hand)| *hand == best)
                .map(|(seat, _)| *seat)
                .collect();
            // Odd chips go to the earliest winners after the button.
            let button = self.button;
            winners.sort_by_key(|&seat| (seat + NUM_SEATS - button - 1) % NUM_SEATS);
            for (&seat, share) in winners.iter().zip(even_shares(pot.size(), winners.len())) {
                players.player_mut(seat).add_to_stack(share);
            }
        }
        Ok(())
    }

    fn next_or_wrap(&self, mut seat: SeatIdx) -> SeatIdx {
        loop {
            seat = (seat + 1) % NUM_SEATS;
            if self.filter[seat] {
                return seat;
            }
        }
    }

    /// Antes come straight off every stack into the first pot, outside the
    /// bet column.
    fn collect_ante(&mut self, players: &mut SeatArray) {
        let mut collected = Chips::ZERO;
        for seat in 0..NUM_SEATS {
            if self.filter[seat] {
                let player = players.player_mut(seat);
                let amount = self.forced_bets.ante.min(player.total_chips());
                player.take_from_stack(amount);
                collected += amount;
            }
        }
        self.pot_manager.add(collected);
    }

    /// Heads-up the button posts the small blind; otherwise the seat after
    /// it does. Returns the big-blind seat.
    fn post_blinds(&mut self, players: &mut SeatArray) -> SeatIdx {
        let mut seat = self.button;
        let num_players = self.filter.iter().filter(|&&f| f).count();
        if num_players != 2 {
            seat = self.next_or_wrap(seat);
        }
        let player = players.player_mut(seat);
        player.bet(self.forced_bets.blinds.small.min(player.total_chips()));
        seat = self.next_or_wrap(seat);
        let player = players.player_mut(seat);
        player.bet(self.forced_bets.blinds.big.min(player.total_chips()));
        seat
    }

    fn deal_hole_cards(&mut self, deck: &mut Deck) -> Result<(), GameError> {
        for seat in 0..NUM_SEATS {
            if self.filter[seat] {
                self.hole_cards[seat] = Some([deck.draw()?, deck.draw()?]);
            }
        }
        Ok(())
    }

    /// Deals the board up to the count the current street implies.
    fn deal_community_cards(
        &mut self,
        deck: &mut Deck,
        community_cards: &mut CommunityCards,
    ) -> Result<(), GameError> {
        let missing = self.round_of_betting.board_cards() - community_cards.cards().len();
        let mut drawn = Vec::with_capacity(missing);
        for _ in 0..missing {
            drawn.push(deck.draw()?);
        }
        community_cards.deal(drawn);
        Ok(())
    }
}

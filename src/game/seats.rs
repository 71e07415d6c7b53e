use super::pot::Chips;
use crate::{SeatIdx, NUM_SEATS};
use serde::{Deserialize, Serialize};

/// One player's chips, split into the stack and the bet column.
///
/// `total` is everything the player owns including what is currently on the
/// felt; `bet` is the portion committed to the street in progress. The
/// invariant `0 <= bet <= total` holds at every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    total: Chips,
    bet: Chips,
}

impl Player {
    pub fn new(stack: Chips) -> Self {
        assert!(stack >= Chips::ZERO);
        Player {
            total: stack,
            bet: Chips::ZERO,
        }
    }

    /// Chips not committed to the current street.
    pub fn stack(&self) -> Chips {
        self.total - self.bet
    }

    pub fn bet_size(&self) -> Chips {
        self.bet
    }

    pub fn total_chips(&self) -> Chips {
        self.total
    }

    pub(crate) fn add_to_stack(&mut self, amount: Chips) {
        assert!(amount >= Chips::ZERO);
        self.total += amount;
    }

    pub(crate) fn take_from_stack(&mut self, amount: Chips) {
        assert!(amount >= Chips::ZERO && amount <= self.stack());
        self.total -= amount;
    }

    /// Sets the player's total bet for the street. A bet can only grow.
    pub(crate) fn bet(&mut self, amount: Chips) {
        assert!(amount >= self.bet);
        assert!(amount <= self.total);
        self.bet = amount;
    }

    /// Moves `amount` out of the bet column and off the player entirely,
    /// the pot-collection primitive.
    pub(crate) fn take_from_bet(&mut self, amount: Chips) {
        assert!(amount >= Chips::ZERO && amount <= self.bet);
        self.total -= amount;
        self.bet -= amount;
    }
}

/// The table's nine seats, each possibly holding a player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeatArray {
    seats: [Option<Player>; NUM_SEATS],
}

impl SeatArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupancy(&self) -> [bool; NUM_SEATS] {
        let mut occ = [false; NUM_SEATS];
        for (seat, slot) in self.seats.iter().enumerate() {
            occ[seat] = slot.is_some();
        }
        occ
    }

    pub fn is_occupied(&self, seat: SeatIdx) -> bool {
        self.seats[seat].is_some()
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn get(&self, seat: SeatIdx) -> Option<&Player> {
        self.seats[seat].as_ref()
    }

    /// # Panics
    ///
    /// Panics if the seat is empty.
    pub fn player(&self, seat: SeatIdx) -> &Player {
        self.seats[seat].as_ref().unwrap()
    }

    pub(crate) fn player_mut(&mut self, seat: SeatIdx) -> &mut Player {
        self.seats[seat].as_mut().unwrap()
    }

    pub(crate) fn add_player(&mut self, seat: SeatIdx, player: Player) {
        assert!(self.seats[seat].is_none(), "seat already occupied");
        self.seats[seat] = Some(player);
    }

    pub(crate) fn remove_player(&mut self, seat: SeatIdx) -> Player {
        self.seats[seat].take().expect("seat is empty")
    }

    pub fn first_occupied(&self) -> Option<SeatIdx> {
        (0..NUM_SEATS).find(|&s| self.is_occupied(s))
    }

    /// The next occupied seat strictly after `seat`, wrapping around the
    /// table. Comes back to `seat` itself when it is the only one occupied;
    /// `None` on an empty table.
    pub fn next_occupied_after(&self, seat: SeatIdx) -> Option<SeatIdx> {
        (1..=NUM_SEATS)
            .map(|d| (seat + d) % NUM_SEATS)
            .find(|&s| self.is_occupied(s))
    }

    /// Iterates occupied seats in position order.
    pub fn iter(&self) -> impl Iterator<Item = (SeatIdx, &Player)> + '_ {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(seat, slot)| slot.as_ref().map(|p| (seat, p)))
    }
}

/// A borrowed slice of the table: the seat array plus an independent filter
/// saying which seats this operation may touch. Every filtered seat must be
/// occupied.
#[derive(Debug)]
pub(crate) struct SeatView<'a> {
    seats: &'a mut SeatArray,
    filter: [bool; NUM_SEATS],
}

impl<'a> SeatView<'a> {
    pub(crate) fn new(seats: &'a mut SeatArray, filter: [bool; NUM_SEATS]) -> Self {
        for seat in 0..NUM_SEATS {
            if filter[seat] {
                assert!(seats.is_occupied(seat), "filtered seat must be occupied");
            }
        }
        SeatView { seats, filter }
    }

    pub(crate) fn contains(&self, seat: SeatIdx) -> bool {
        self.filter[seat]
    }

    pub(crate) fn player(&self, seat: SeatIdx) -> &Player {
        assert!(self.filter[seat]);
        self.seats.player(seat)
    }

    pub(crate) fn player_mut(&mut self, seat: SeatIdx) -> &mut Player {
        assert!(self.filter[seat]);
        self.seats.player_mut(seat)
    }
}

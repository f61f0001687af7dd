use std::fmt;

/// One of the two players at the table, seen from this agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Seat {
    Me,
    Opponent,
}

impl Seat {
    pub fn other(self) -> Self {
        match self {
            Seat::Me => Seat::Opponent,
            Seat::Opponent => Seat::Me,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Me => write!(f, "me"),
            Seat::Opponent => write!(f, "opponent"),
        }
    }
}

/// The pot of a single betting round.
///
/// `pending` is the amount the follower still has to put in to match the
/// setter. After a call it's zero again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PotLedger {
    pot: u32,
    pending: u32,
    setter: Option<Seat>,
    follower: Option<Seat>,
}

impl PotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the betting. Only valid while nobody has bet.
    pub fn place_bet(&mut self, seat: Seat, amount: u32) {
        self.pot = amount;
        self.pending = amount;
        self.setter = Some(seat);
        self.follower = None;
    }

    /// Match whatever is pending.
    pub fn call(&mut self, seat: Seat) {
        self.pot += self.pending;
        self.pending = 0;
        self.follower = Some(seat);
    }

    /// Match whatever is pending and put `amount` more on top.
    pub fn raise(&mut self, seat: Seat, amount: u32) {
        self.pot += self.pending + amount;
        self.pending = amount;
        self.setter = Some(seat);
        self.follower = None;
    }

    pub fn pot(&self) -> u32 {
        self.pot
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn setter(&self) -> Option<Seat> {
        self.setter
    }

    pub fn follower(&self) -> Option<Seat> {
        self.follower
    }

    /// Someone set a bet and nobody answered it.
    pub fn is_folded(&self) -> bool {
        self.setter.is_some() && self.follower.is_none()
    }

    /// Nobody ever put money in.
    pub fn both_checked(&self) -> bool {
        self.setter.is_none()
    }

    /// The larger of the two contributions.
    pub fn current_stake(&self) -> u32 {
        (self.pot - self.pending) / 2 + self.pending
    }
}

impl fmt::Display for PotLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seat = |s: Option<Seat>| s.map_or_else(|| "none".to_string(), |s| s.to_string());
        write!(
            f,
            "pot: {}, setter: {}, follower: {}",
            self.pot,
            seat(self.setter),
            seat(self.follower)
        )
    }
}

use std::{
    fmt::Display,
    str::FromStr,
};

use crate::error::KuhnError;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Card {
    Jack = 0,
    Queen = 1,
    King = 2,
}

impl Card {
    pub const DECK: [Card; 3] = [Card::Jack, Card::Queen, Card::King];

    pub fn symbol(&self) -> char {
        match self {
            Card::Jack => 'J',
            Card::Queen => 'Q',
            Card::King => 'K',
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// `Pass` doubles as "check" when it opens the hand and as "call" after a bet,
/// both written as `C`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Action {
    Bet,
    Pass,
}

impl Action {
    pub const VALUES: [Action; 2] = [Action::Bet, Action::Pass];
    pub const COUNT: usize = Action::VALUES.len();

    pub fn symbol(&self) -> char {
        match self {
            Action::Bet => 'B',
            Action::Pass => 'C',
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlayerId {
    Player0,
    Player1,
}

impl PlayerId {
    /// Player 0 acts on even-length histories.
    pub fn to_act(history_len: usize) -> PlayerId {
        if history_len % 2 == 0 {
            PlayerId::Player0
        } else {
            PlayerId::Player1
        }
    }

    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::Player0 => PlayerId::Player1,
            PlayerId::Player1 => PlayerId::Player0,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PlayerId::Player0 => 0,
            PlayerId::Player1 => 1,
        }
    }
}

/// Private cards, indexed by `PlayerId::index`.
pub type Deal = [Card; 2];

pub fn is_terminal(history: &str) -> bool {
    matches!(history, "BC" | "BB" | "CC" | "CBB" | "CBC")
}

/// Payoff of a terminal `history` for the player who would act next, i.e.
/// the player selected by the parity of the history length. Recursive callers
/// negate it once per level to move to the previous actor's perspective.
pub fn payoff(history: &str, cards: &Deal) -> f64 {
    debug_assert!(is_terminal(history), "payoff of a non-terminal history {:?}", history);

    if history == "BC" || history == "CBC" {
        // opponent folded
        return 1.0;
    }

    let stake = if history.contains(Action::Bet.symbol()) {
        2.0
    } else {
        1.0
    };
    let player = PlayerId::to_act(history.len());
    let opponent = player.opponent();
    if cards[player.index()] > cards[opponent.index()] {
        stake
    } else {
        -stake
    }
}

#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct History(String);

impl History {
    pub fn root() -> Self {
        History(String::new())
    }

    pub fn with_action(&self, action: Action) -> Self {
        let mut next = self.0.clone();
        next.push(action.symbol());
        History(next)
    }

    pub fn to_act(&self) -> PlayerId {
        PlayerId::to_act(self.0.len())
    }

    pub fn is_terminal(&self) -> bool {
        is_terminal(&self.0)
    }

    pub fn payoff(&self, cards: &Deal) -> f64 {
        payoff(&self.0, cards)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for History {
    type Err = KuhnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().all(|c| c == Action::Bet.symbol() || c == Action::Pass.symbol()) {
            Ok(History(s.to_string()))
        } else {
            Err(KuhnError::InvalidHistory(s.to_string()))
        }
    }
}

impl Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! The outcome rule: a pure, total function over the 3x3 gesture space.

use crate::gesture::Gesture;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who won a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    User,
    Computer,
    Tie,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Winner::User => "You win!",
            Winner::Computer => "Computer wins!",
            Winner::Tie => "It's a tie!",
        };
        write!(f, "{name}")
    }
}

/// Decides a round. Tie on equal gestures, otherwise the fixed beats-table
/// applies. Deterministic, no side effects, no error path.
pub fn decide(user: Gesture, computer: Gesture) -> Winner {
    if user == computer {
        Winner::Tie
    } else if user.beats() == computer {
        Winner::User
    } else {
        Winner::Computer
    }
}

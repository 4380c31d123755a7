//! The three hand gestures and their fixed beats-table.

use rand::Rng;
use rand::distributions::{Distribution, Standard};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A hand gesture shown by either player.
///
/// Serialized as the wire tokens `ROCK` / `PAPER` / `SCISSORS` used by the
/// vision service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
}

impl Gesture {
    /// Every gesture, in canonical order.
    pub const ALL: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    /// The gesture this one defeats: Rock beats Scissors, Paper beats Rock,
    /// Scissors beats Paper.
    pub fn beats(self) -> Gesture {
        match self {
            Gesture::Rock => Gesture::Scissors,
            Gesture::Paper => Gesture::Rock,
            Gesture::Scissors => Gesture::Paper,
        }
    }

    /// Parses a wire token (`ROCK`, `PAPER`, `SCISSORS`), case-insensitively
    /// and ignoring surrounding whitespace.
    pub fn from_token(token: &str) -> Option<Gesture> {
        match token.trim().to_ascii_uppercase().as_str() {
            "ROCK" => Some(Gesture::Rock),
            "PAPER" => Some(Gesture::Paper),
            "SCISSORS" => Some(Gesture::Scissors),
            _ => None,
        }
    }

    /// The wire token for this gesture.
    pub fn token(self) -> &'static str {
        match self {
            Gesture::Rock => "ROCK",
            Gesture::Paper => "PAPER",
            Gesture::Scissors => "SCISSORS",
        }
    }

    /// Emoji used when rendering results and the session log.
    pub fn emoji(self) -> &'static str {
        match self {
            Gesture::Rock => "\u{270a}",
            Gesture::Paper => "\u{270b}",
            Gesture::Scissors => "\u{270c}\u{fe0f}",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gesture::Rock => "Rock",
            Gesture::Paper => "Paper",
            Gesture::Scissors => "Scissors",
        };
        write!(f, "{name}")
    }
}

/// The computer's gesture is drawn uniformly and independently each round.
impl Distribution<Gesture> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Gesture {
        Gesture::ALL[rng.gen_range(0..Gesture::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn beats_table_matches_the_rules() {
        assert_eq!(Gesture::Rock.beats(), Gesture::Scissors);
        assert_eq!(Gesture::Paper.beats(), Gesture::Rock);
        assert_eq!(Gesture::Scissors.beats(), Gesture::Paper);
    }

    #[test]
    fn every_gesture_beats_exactly_one_other() {
        let beaten: HashSet<_> = Gesture::ALL.iter().map(|g| g.beats()).collect();
        assert_eq!(beaten.len(), 3);
        for g in Gesture::ALL {
            assert_ne!(g.beats(), g);
        }
    }

    #[test]
    fn token_round_trip() {
        for g in Gesture::ALL {
            assert_eq!(Gesture::from_token(g.token()), Some(g));
        }
        assert_eq!(Gesture::from_token(" scissors \n"), Some(Gesture::Scissors));
        assert_eq!(Gesture::from_token("NONE"), None);
        assert_eq!(Gesture::from_token(""), None);
    }

    #[test]
    fn serializes_as_wire_tokens() {
        assert_eq!(
            serde_json::to_value(Gesture::Rock).unwrap(),
            serde_json::json!("ROCK")
        );
    }

    #[test]
    fn random_draw_covers_all_gestures() {
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(rand::random::<Gesture>());
        }
        assert_eq!(seen.len(), 3);
    }
}

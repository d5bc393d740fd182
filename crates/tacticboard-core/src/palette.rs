//! Player palette and drop spawning.

use crate::diagram::{Diagram, TokenId};
use kurbo::Point;
use peniko::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Palette errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("Unrecognized drop payload: {0:?}")]
    UnrecognizedDropPayload(String),
}

/// A team that can be dragged out of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    /// The drop payload identifier, also used as the label prefix.
    pub fn identifier(self) -> &'static str {
        match self {
            Team::A => "A",
            Team::B => "B",
        }
    }

    /// Token color for this team.
    pub fn color(self) -> Color {
        match self {
            Team::A => Color::new([1.0, 0.231, 0.188, 1.0]),
            Team::B => Color::new([0.0, 0.478, 1.0, 1.0]),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Team {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Team::ALL
            .into_iter()
            .find(|team| team.identifier() == s)
            .ok_or_else(|| PaletteError::UnrecognizedDropPayload(s.to_string()))
    }
}

/// Next free label for a team, e.g. "A3" when two A tokens exist.
pub fn next_label(diagram: &Diagram, team: Team) -> String {
    let count = diagram.count_labels_with_prefix(team.identifier());
    format!("{}{}", team.identifier(), count + 1)
}

/// Place a new token for `team` at `at`.
pub fn spawn(diagram: &mut Diagram, team: Team, at: Point) -> TokenId {
    let label = next_label(diagram, team);
    log::debug!("Spawning {} at ({}, {})", label, at.x, at.y);
    diagram.add_token(label, team.color(), at)
}

/// Handle a palette drop carrying a raw payload string.
pub fn drop_payload(diagram: &mut Diagram, payload: &str, at: Point) -> Result<TokenId, PaletteError> {
    let team: Team = payload.parse()?;
    Ok(spawn(diagram, team, at))
}

/// Starting positions of the default four-a-side formation.
const DEFAULT_FORMATION: [(Team, f64, f64); 8] = [
    (Team::A, 50.0, 50.0),
    (Team::A, 50.0, 250.0),
    (Team::A, 100.0, 100.0),
    (Team::A, 100.0, 200.0),
    (Team::B, 250.0, 50.0),
    (Team::B, 250.0, 250.0),
    (Team::B, 300.0, 100.0),
    (Team::B, 300.0, 200.0),
];

impl Diagram {
    /// A diagram with both teams lined up, labeled A1..A4 and B1..B4.
    pub fn with_default_formation() -> Self {
        let mut diagram = Self::new();
        for (team, x, y) in DEFAULT_FORMATION {
            spawn(&mut diagram, team, Point::new(x, y));
        }
        diagram
    }
}

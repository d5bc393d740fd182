//! Diagram model: placed player tokens and line annotations.

use kurbo::{Line, Point};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Default radius around a token's position that counts as a hit.
/// Player glyphs are drawn 24 units wide.
pub const TOKEN_HIT_RADIUS: f64 = 12.0;

/// Unique identifier for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub(crate) Uuid);

impl TokenId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a line annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub(crate) Uuid);

impl LineId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Diagram errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("Token not found: {0}")]
    TokenNotFound(TokenId),
}

/// A labeled, colored player marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub(crate) id: TokenId,
    /// Display label, e.g. "A1".
    pub label: String,
    pub color: Color,
    pub position: Point,
}

impl Token {
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Check if a point falls inside this token's hit region.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        self.position.distance(point) <= radius
    }
}

/// A straight pass (solid) or movement (dashed) instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct LineAnnotation {
    pub(crate) id: LineId,
    pub start: Point,
    pub end: Point,
    pub color: Color,
    /// Dashed lines mark player movement, solid lines mark passes.
    pub dashed: bool,
}

impl LineAnnotation {
    /// Create a new line annotation with a fresh id.
    pub fn new(start: Point, end: Point, color: Color, dashed: bool) -> Self {
        Self {
            id: LineId::new(),
            start,
            end,
            color,
            dashed,
        }
    }

    /// Reconstruct a line with a specific ID (for storage).
    pub(crate) fn reconstruct(
        id: LineId,
        start: Point,
        end: Point,
        color: Color,
        dashed: bool,
    ) -> Self {
        Self {
            id,
            start,
            end,
            color,
            dashed,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn length(&self) -> f64 {
        self.as_kurbo().length()
    }

    /// Whether start and end coincide.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn as_kurbo(&self) -> Line {
        Line::new(self.start, self.end)
    }
}

/// The board contents: tokens and committed lines, both in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    tokens: Vec<Token>,
    lines: Vec<LineAnnotation>,
}

impl Diagram {
    /// Create a new empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new token at the end of the token sequence.
    pub fn add_token(&mut self, label: impl Into<String>, color: Color, position: Point) -> TokenId {
        let id = TokenId::new();
        self.tokens.push(Token {
            id,
            label: label.into(),
            color,
            position,
        });
        id
    }

    /// Insert a token with a known id. Callers guarantee uniqueness.
    pub(crate) fn insert_token(&mut self, token: Token) {
        debug_assert!(self.token(token.id).is_none());
        self.tokens.push(token);
    }

    /// Move a token to a new position.
    pub fn move_token(&mut self, id: TokenId, position: Point) -> Result<(), DiagramError> {
        self.token_mut(id)?.position = position;
        Ok(())
    }

    /// Change a token's color.
    pub fn set_token_color(&mut self, id: TokenId, color: Color) -> Result<(), DiagramError> {
        self.token_mut(id)?.color = color;
        Ok(())
    }

    /// Append a line. Editing code goes through [`crate::History::commit`].
    pub fn append_line(&mut self, line: LineAnnotation) {
        debug_assert!(self.lines.iter().all(|l| l.id != line.id));
        self.lines.push(line);
    }

    /// Pop the most recently appended line.
    pub fn remove_last_line(&mut self) -> Option<LineAnnotation> {
        self.lines.pop()
    }

    /// Remove every token and line.
    pub fn reset(&mut self) {
        self.tokens.clear();
        self.lines.clear();
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    fn token_mut(&mut self, id: TokenId) -> Result<&mut Token, DiagramError> {
        self.tokens
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DiagramError::TokenNotFound(id))
    }

    /// Tokens in insertion order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Committed lines in insertion order.
    pub fn lines(&self) -> &[LineAnnotation] {
        &self.lines
    }

    /// Find the token under a point.
    ///
    /// Later tokens are drawn on top, so the search runs back to front.
    pub fn token_at(&self, point: Point, radius: f64) -> Option<TokenId> {
        self.tokens
            .iter()
            .rev()
            .find(|t| t.hit_test(point, radius))
            .map(|t| t.id)
    }

    /// Number of tokens whose label starts with `prefix`.
    pub fn count_labels_with_prefix(&self, prefix: &str) -> usize {
        self.tokens
            .iter()
            .filter(|t| t.label.starts_with(prefix))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.lines.is_empty()
    }
}

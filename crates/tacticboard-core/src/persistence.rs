//! Save and load of whole diagrams.
//!
//! The record is a JSON object:
//! ```text
//! {
//!   "version": 1,
//!   "tokens": [{ "id", "label", "color": {r,g,b,a}, "position": {x,y} }],
//!   "lines":  [{ "id", "start": {x,y}, "end": {x,y}, "color": {r,g,b,a}, "dashed" }]
//! }
//! ```
//! Loading is all-or-nothing. Undo history is never part of the record.

use crate::codec::{self, DecodeError, EncodeError};
use crate::diagram::{Diagram, LineAnnotation, LineId, Token, TokenId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Current record format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct DiagramRecord {
    version: u32,
    tokens: Vec<TokenRecord>,
    lines: Vec<LineRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenRecord {
    id: TokenId,
    label: String,
    color: Value,
    position: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct LineRecord {
    id: LineId,
    start: Value,
    end: Value,
    color: Value,
    dashed: bool,
}

impl TryFrom<&Token> for TokenRecord {
    type Error = EncodeError;

    fn try_from(token: &Token) -> Result<Self, Self::Error> {
        Ok(Self {
            id: token.id(),
            label: token.label.clone(),
            color: codec::encode_color(token.color)?,
            position: codec::encode_point(token.position)?,
        })
    }
}

impl TryFrom<TokenRecord> for Token {
    type Error = DecodeError;

    fn try_from(record: TokenRecord) -> Result<Self, Self::Error> {
        Ok(Token {
            id: record.id,
            label: record.label,
            color: codec::decode_color(&record.color)?,
            position: codec::decode_point(&record.position)?,
        })
    }
}

impl TryFrom<&LineAnnotation> for LineRecord {
    type Error = EncodeError;

    fn try_from(line: &LineAnnotation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: line.id(),
            start: codec::encode_point(line.start)?,
            end: codec::encode_point(line.end)?,
            color: codec::encode_color(line.color)?,
            dashed: line.dashed,
        })
    }
}

impl TryFrom<LineRecord> for LineAnnotation {
    type Error = DecodeError;

    fn try_from(record: LineRecord) -> Result<Self, Self::Error> {
        Ok(LineAnnotation::reconstruct(
            record.id,
            codec::decode_point(&record.start)?,
            codec::decode_point(&record.end)?,
            codec::decode_color(&record.color)?,
            record.dashed,
        ))
    }
}

/// Serialize a diagram to bytes.
///
/// Fails instead of writing a record that [`load`] would reject, e.g. when a
/// token was moved to a NaN position.
pub fn save(diagram: &Diagram) -> Result<Vec<u8>, EncodeError> {
    let tokens = diagram
        .tokens()
        .iter()
        .map(TokenRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let lines = diagram
        .lines()
        .iter()
        .map(LineRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let record = DiagramRecord {
        version: FORMAT_VERSION,
        tokens,
        lines,
    };
    Ok(serde_json::to_vec(&record)?)
}

/// Deserialize a diagram from bytes.
///
/// Any structural or field-level problem fails the whole load; a partially
/// populated diagram is never returned.
pub fn load(bytes: &[u8]) -> Result<Diagram, DecodeError> {
    let record: DiagramRecord = serde_json::from_slice(bytes)?;
    if record.version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(record.version));
    }

    let tokens = record
        .tokens
        .into_iter()
        .map(Token::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let lines = record
        .lines
        .into_iter()
        .map(LineAnnotation::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    if let Some(dup) = tokens.iter().find(|t| !seen.insert(t.id())) {
        return Err(DecodeError::DuplicateTokenId(dup.id().as_uuid()));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = lines.iter().find(|l| !seen.insert(l.id())) {
        return Err(DecodeError::DuplicateLineId(dup.id().as_uuid()));
    }

    let mut diagram = Diagram::new();
    for token in tokens {
        diagram.insert_token(token);
    }
    for line in lines {
        diagram.append_line(line);
    }
    Ok(diagram)
}

/// Load a diagram, falling back to an empty one on failure.
///
/// The error is handed back so the host can tell the user that a previous
/// save could not be restored.
pub fn load_or_empty(bytes: &[u8]) -> (Diagram, Option<DecodeError>) {
    match load(bytes) {
        Ok(diagram) => (diagram, None),
        Err(e) => {
            log::warn!("Failed to load diagram, starting from an empty board: {}", e);
            (Diagram::new(), Some(e))
        }
    }
}

//! Wire representation for points and colors.
//!
//! Every persisted record on the board is built out of these two primitives.
//! Points encode as `{"x", "y"}` and colors as `{"r", "g", "b", "a"}`, each a
//! plain JSON number. Both directions are strict: a non-finite value is refused
//! on encode, and a missing, non-numeric or non-finite field is refused on
//! decode, never replaced with a default.

use kurbo::Point;
use peniko::Color;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while decoding persisted board data.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing field `{0}`")]
    MissingField(&'static str),
    #[error("Field `{0}` is not a number")]
    InvalidField(&'static str),
    #[error("Field `{0}` is not finite")]
    NonFinite(&'static str),
    #[error("Expected a record, found {0}")]
    NotARecord(&'static str),
    #[error("Unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("Duplicate token id {0}")]
    DuplicateTokenId(uuid::Uuid),
    #[error("Duplicate line id {0}")]
    DuplicateLineId(uuid::Uuid),
}

/// Errors produced while encoding board data for persistence.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Field `{0}` is not finite")]
    NonFinite(&'static str),
    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a point as a wire value.
///
/// Fails when a coordinate is NaN or infinite, since JSON has no number for it.
pub fn encode_point(point: Point) -> Result<Value, EncodeError> {
    let mut map = Map::new();
    map.insert("x".to_string(), number("x", point.x)?);
    map.insert("y".to_string(), number("y", point.y)?);
    Ok(Value::Object(map))
}

/// Decode a point from a wire value.
pub fn decode_point(value: &Value) -> Result<Point, DecodeError> {
    let map = as_record(value)?;
    Ok(Point::new(read_f64(map, "x")?, read_f64(map, "y")?))
}

/// Encode a color as a wire value.
pub fn encode_color(color: Color) -> Result<Value, EncodeError> {
    let [r, g, b, a] = color.components;
    let mut map = Map::new();
    map.insert("r".to_string(), number("r", f64::from(r))?);
    map.insert("g".to_string(), number("g", f64::from(g))?);
    map.insert("b".to_string(), number("b", f64::from(b))?);
    map.insert("a".to_string(), number("a", f64::from(a))?);
    Ok(Value::Object(map))
}

/// Decode a color from a wire value.
pub fn decode_color(value: &Value) -> Result<Color, DecodeError> {
    let map = as_record(value)?;
    Ok(Color::new([
        read_f32(map, "r")?,
        read_f32(map, "g")?,
        read_f32(map, "b")?,
        read_f32(map, "a")?,
    ]))
}

fn number(field: &'static str, v: f64) -> Result<Value, EncodeError> {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .ok_or(EncodeError::NonFinite(field))
}

fn as_record(value: &Value) -> Result<&Map<String, Value>, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(DecodeError::NotARecord("null")),
        Value::Bool(_) => Err(DecodeError::NotARecord("a boolean")),
        Value::Number(_) => Err(DecodeError::NotARecord("a number")),
        Value::String(_) => Err(DecodeError::NotARecord("a string")),
        Value::Array(_) => Err(DecodeError::NotARecord("an array")),
    }
}

fn read_f64(map: &Map<String, Value>, field: &'static str) -> Result<f64, DecodeError> {
    let value = map.get(field).ok_or(DecodeError::MissingField(field))?;
    let v = value.as_f64().ok_or(DecodeError::InvalidField(field))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DecodeError::NonFinite(field))
    }
}

/// Color channels are `f32`; a finite `f64` beyond its range would narrow to infinity.
fn read_f32(map: &Map<String, Value>, field: &'static str) -> Result<f32, DecodeError> {
    let v = read_f64(map, field)? as f32;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DecodeError::NonFinite(field))
    }
}

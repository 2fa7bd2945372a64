//! Width-by-height dimensions shared by maps and spaces
//!
//! Dimensions are written as `<width>x<height>`:
//! - Both parts are decimal integers
//! - Each part is within 1..=10000
//! - Surrounding whitespace is ignored, the separator is a lowercase `x`

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Largest accepted width or height
pub const MAX_SIDE: u32 = 10_000;

/// Validation errors for dimension strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not of the form `<width>x<height>`
    InvalidFormat,
    /// A side is zero or larger than `MAX_SIDE`
    OutOfRange,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidFormat => {
                write!(f, "dimensions must look like <width>x<height>, e.g. 100x200")
            }
            ValidationError::OutOfRange => {
                write!(f, "width and height must be between 1 and {}", MAX_SIDE)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

static DIMENSIONS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,9})x([0-9]{1,9})$").expect("dimensions regex"));

/// Size of a map or space in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Build dimensions, checking the range of both sides
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        if !(1..=MAX_SIDE).contains(&width) || !(1..=MAX_SIDE).contains(&height) {
            return Err(ValidationError::OutOfRange);
        }
        Ok(Self { width, height })
    }

    /// Whether the point lies inside (origin is the top-left cell)
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

impl FromStr for Dimensions {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DIMENSIONS_REGEX
            .captures(s.trim())
            .ok_or(ValidationError::InvalidFormat)?;

        // At most nine digits, so both fit in u32
        let width = caps[1].parse().map_err(|_| ValidationError::InvalidFormat)?;
        let height = caps[2].parse().map_err(|_| ValidationError::InvalidFormat)?;

        Self::new(width, height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Serialize for Dimensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dimensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

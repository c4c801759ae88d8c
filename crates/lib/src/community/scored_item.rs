//! Point-weighted community items.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An item of a community list with its accumulated points.
///
/// Serialized in the `"<points> <name>"` text form, e.g. `"9 Alien"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ScoredItem {
    pub points: u32,
    pub name: String,
}

impl ScoredItem {
    pub fn new(points: u32, name: impl Into<String>) -> Self {
        Self {
            points,
            name: name.into(),
        }
    }

    /// Whether this item is the same entry as `name`, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for ScoredItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.points, self.name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed scored item {0:?}: expected \"<points> <name>\"")]
pub struct ParseScoredItemError(String);

impl FromStr for ScoredItem {
    type Err = ParseScoredItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (points, name) = s
            .split_once(' ')
            .ok_or_else(|| ParseScoredItemError(s.to_string()))?;
        let points = points
            .parse()
            .map_err(|_| ParseScoredItemError(s.to_string()))?;
        Ok(Self::new(points, name))
    }
}

impl From<ScoredItem> for String {
    fn from(item: ScoredItem) -> Self {
        item.to_string()
    }
}

impl TryFrom<String> for ScoredItem {
    type Error = ParseScoredItemError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

//! Sort state of the all-funds table, kept in the location's query parameters.

use std::fmt::Display;
use std::str::FromStr;
use url::form_urlencoded;

pub const KEY_PARAM: &str = "key";
pub const DIRECTION_PARAM: &str = "direction";

/// Top-level sort keys; any other key is a return category description.
pub const FUND_CODE_KEY: &str = "fundCode";
pub const LONG_NAME_KEY: &str = "longName";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Ascending => "ascending",
                Direction::Descending => "descending",
            }
        )
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(Direction::Ascending),
            "descending" => Ok(Direction::Descending),
            _ => Err(anyhow::anyhow!("Invalid sort direction: {}", s)),
        }
    }
}

/// The `(key, direction)` pair. Both absent means API order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: Option<Direction>,
}

impl SortState {
    pub fn new(key: &str, direction: Direction) -> Self {
        Self {
            key: Some(key.to_string()),
            direction: Some(direction),
        }
    }

    /// Derives the state from query parameters. Empty keys and unknown
    /// directions are treated as absent.
    pub fn from_query<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = SortState::default();
        for (name, value) in pairs {
            match name {
                KEY_PARAM if !value.is_empty() => state.key = Some(value.to_string()),
                DIRECTION_PARAM => state.direction = value.parse().ok(),
                _ => {}
            }
        }
        state
    }

    /// The key and direction to sort by, if both are set.
    pub fn active(&self) -> Option<(&str, Direction)> {
        match (&self.key, self.direction) {
            (Some(key), Some(direction)) => Some((key.as_str(), direction)),
            _ => None,
        }
    }

    /// Next state after a click on a column header:
    /// other key -> ascending -> descending -> cleared.
    pub fn click(&self, clicked: &str) -> SortState {
        match (self.key.as_deref(), self.direction) {
            (Some(key), Some(Direction::Ascending)) if key == clicked => {
                SortState::new(clicked, Direction::Descending)
            }
            (Some(key), Some(Direction::Descending)) if key == clicked => SortState::default(),
            _ => SortState::new(clicked, Direction::Ascending),
        }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        match self.active() {
            Some((key, direction)) => vec![
                (KEY_PARAM, key.to_string()),
                (DIRECTION_PARAM, direction.to_string()),
            ],
            None => Vec::new(),
        }
    }

    /// Location of the all-funds view carrying this state.
    pub fn to_location(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            return "/".to_string();
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("/?{encoded}")
    }

    /// Header arrow for `key`, if the table is sorted by it.
    pub fn indicator(&self, key: &str) -> Option<&'static str> {
        match self.active() {
            Some((active, Direction::Ascending)) if active == key => Some("▲"),
            Some((active, Direction::Descending)) if active == key => Some("▼"),
            _ => None,
        }
    }
}

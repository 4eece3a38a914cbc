use std::fmt::Display;

use thiserror::Error;

/// Neighbourhood queries that can fail to find a qualifying key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighbour {
    /// The greatest key less than or equal to the query.
    Floor,
    /// The least key greater than or equal to the query.
    Ceil,
    /// The key immediately after an existing key.
    Next,
    /// The key immediately before an existing key.
    Prev,
}

impl Display for Neighbour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Next => "next",
            Self::Prev => "prev",
        })
    }
}

/// Errors returned by lookups that have no result to return.
///
/// None of these leave the container modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested key is not present.
    #[error("key not found")]
    KeyNotFound,

    /// The container holds no entries.
    #[error("container is empty")]
    Empty,

    /// No key satisfies the neighbourhood query.
    #[error("no {0} key exists")]
    NoNeighbour(Neighbour),
}

impl Error {
    /// All variants describe a missing key or position; this exists so callers
    /// can treat them as one "not found" kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound | Self::Empty | Self::NoNeighbour(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(Error::Empty.to_string(), "container is empty");
        assert_eq!(
            Error::NoNeighbour(Neighbour::Floor).to_string(),
            "no floor key exists"
        );
        assert!(Error::NoNeighbour(Neighbour::Next).is_not_found());
    }
}

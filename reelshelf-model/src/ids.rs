use crate::error::ModelError;
use std::str::FromStr;

/// Strongly typed catalog id for movies.
///
/// The catalog backend hands out integer primary keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MovieID(pub u64);

impl MovieID {
    pub const fn new(id: u64) -> Self {
        MovieID(id)
    }

    pub fn from_string(id: &str) -> Result<Self, ModelError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidId(
                "Movie ID cannot be empty".to_string(),
            ));
        }
        trimmed.parse::<u64>().map(MovieID).map_err(|err| {
            ModelError::InvalidId(format!("'{trimmed}' is not a movie id: {err}"))
        })
    }

    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for MovieID {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovieID::from_string(s)
    }
}

impl From<u64> for MovieID {
    fn from(value: u64) -> Self {
        MovieID(value)
    }
}

impl std::fmt::Display for MovieID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

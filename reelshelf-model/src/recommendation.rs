//! Recommendation payloads as produced by the catalog/assistant backend.

use std::fmt::{self, Display};
use std::str::FromStr;

use url::Url;

use crate::error::ModelError;
use crate::ids::MovieID;

/// Why a recommendation list was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecommendationTrigger {
    /// The assistant chat widget answered a member message.
    #[cfg_attr(feature = "serde", serde(rename = "chatbot"))]
    ChatbotMessage,
    /// A new content rating became available to the member.
    #[cfg_attr(feature = "serde", serde(rename = "unlock"))]
    RatingUnlock,
    /// Titles the member queued on their watchlist.
    #[cfg_attr(feature = "serde", serde(rename = "queued"))]
    WatchlistQueued,
    /// Titles similar to what the member already watched.
    #[cfg_attr(feature = "serde", serde(rename = "watched"))]
    WatchlistSimilar,
    /// Random picks from the catalog.
    #[cfg_attr(feature = "serde", serde(rename = "fresh"))]
    DatabaseRandom,
}

impl RecommendationTrigger {
    pub const ALL: [RecommendationTrigger; 5] = [
        RecommendationTrigger::ChatbotMessage,
        RecommendationTrigger::RatingUnlock,
        RecommendationTrigger::WatchlistQueued,
        RecommendationTrigger::WatchlistSimilar,
        RecommendationTrigger::DatabaseRandom,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RecommendationTrigger::ChatbotMessage => "chatbot",
            RecommendationTrigger::RatingUnlock => "unlock",
            RecommendationTrigger::WatchlistQueued => "queued",
            RecommendationTrigger::WatchlistSimilar => "watched",
            RecommendationTrigger::DatabaseRandom => "fresh",
        }
    }

    /// Whether the backend needs the assistant model to answer this trigger.
    pub const fn uses_assistant(self) -> bool {
        matches!(
            self,
            RecommendationTrigger::ChatbotMessage
                | RecommendationTrigger::WatchlistSimilar
        )
    }
}

impl Display for RecommendationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationTrigger {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecommendationTrigger::ALL
            .into_iter()
            .find(|trigger| trigger.as_str() == s)
            .ok_or_else(|| {
                ModelError::InvalidItem(format!(
                    "unknown recommendation trigger '{s}'"
                ))
            })
    }
}

/// A single recommended title, the item type rendered by the carousel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecommendationItem {
    pub id: MovieID,
    pub title: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "year", alias = "release_year")
    )]
    pub release_year: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genre: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub poster_url: Option<Url>,
    /// Short explanation shown under the title ("From your watchlist queue").
    #[cfg_attr(feature = "serde", serde(default))]
    pub reason: Option<String>,
}

impl RecommendationItem {
    pub fn new(id: impl Into<MovieID>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            release_year: None,
            genre: None,
            poster_url: None,
            reason: None,
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.release_year = Some(year);
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_poster_url(mut self, url: Url) -> Self {
        self.poster_url = Some(url);
        self
    }

    /// Placeholder text for tiles without a poster: the first letters of
    /// the first three title words, uppercased.
    pub fn poster_initials(&self) -> String {
        let initials: String = self
            .title
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(3)
            .collect();
        initials.to_uppercase()
    }

    /// "Genre, Year" caption, skipping whichever half is unknown.
    pub fn caption(&self) -> Option<String> {
        match (&self.genre, self.release_year) {
            (Some(genre), Some(year)) => Some(format!("{genre}, {year}")),
            (Some(genre), None) => Some(genre.clone()),
            (None, Some(year)) => Some(year.to_string()),
            (None, None) => None,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::InvalidItem(format!(
                "recommendation {} has an empty title",
                self.id
            )));
        }
        Ok(())
    }
}

/// Response body of the recommendation endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recommendations {
    /// Assistant reply; empty for triggers that do not involve the assistant.
    #[cfg_attr(feature = "serde", serde(default))]
    pub message: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub recommendations: Vec<RecommendationItem>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    /// Drops items that fail validation and repeated ids, keeping the first
    /// occurrence so the backend's ordering survives.
    pub fn into_valid_items(self) -> Vec<RecommendationItem> {
        let mut seen = std::collections::HashSet::new();
        self.recommendations
            .into_iter()
            .filter(|item| item.validate().is_ok() && seen.insert(item.id))
            .collect()
    }
}

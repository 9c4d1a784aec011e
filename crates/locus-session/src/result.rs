//! Result records streamed to consumers.

use std::ops::Range;

use locus_match::TypeId;
use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchResult {
    /// A map feature.
    Feature {
        /// Feature identifier.
        id: u64,
        /// Display name.
        name: String,
        /// Category of the feature, if known.
        type_id: Option<TypeId>,
        /// Location, if known.
        point: Option<Point>,
        /// Byte ranges of `name` that matched the query.
        highlights: Vec<Range<usize>>,
    },
    /// A query completion.
    Suggestion {
        /// Text shown to the user.
        title: String,
        /// Query to run when the suggestion is picked.
        completion: String,
    },
    /// A downloadable map region.
    Region {
        /// Region identifier.
        country_id: String,
        /// The region name that matched.
        matched_name: String,
    },
    /// A saved bookmark.
    Bookmark {
        /// Bookmark identifier.
        id: u64,
        /// Bookmark title.
        name: String,
    },
}

impl SearchResult {
    /// The text a list view shows for this result.
    pub fn title(&self) -> &str {
        match self {
            Self::Feature { name, .. } | Self::Bookmark { name, .. } => name,
            Self::Suggestion { title, .. } => title,
            Self::Region { matched_name, .. } => matched_name,
        }
    }
}

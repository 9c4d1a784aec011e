//! Search modes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ParseModeError;

/// An independent kind of search. Each mode has at most one active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Full-index search, rendered as a result list.
    Everywhere,
    /// Search restricted to the visible map area.
    Viewport,
    /// Search over downloadable map regions.
    Downloader,
    /// Search over saved bookmarks.
    Bookmarks,
    /// Full-index list search with a reconciling viewport search on the map.
    Combined,
}

impl SearchMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Everywhere,
        Self::Viewport,
        Self::Downloader,
        Self::Bookmarks,
        Self::Combined,
    ];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Everywhere => "everywhere",
            Self::Viewport => "viewport",
            Self::Downloader => "downloader",
            Self::Bookmarks => "bookmarks",
            Self::Combined => "combined",
        }
    }

    /// Whether results of this mode feed the list that the result cache serves.
    pub fn is_list_mode(self) -> bool {
        matches!(self, Self::Everywhere | Self::Combined)
    }

    /// Position in [`Self::ALL`].
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Everywhere => 0,
            Self::Viewport => 1,
            Self::Downloader => 2,
            Self::Bookmarks => 3,
            Self::Combined => 4,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for mode in SearchMode::ALL {
            assert_eq!(mode.as_str().parse::<SearchMode>().unwrap(), mode);
        }
        assert_eq!("Viewport".parse::<SearchMode>().unwrap(), SearchMode::Viewport);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "map".parse::<SearchMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown search mode 'map'");
    }

    #[test]
    fn index_matches_position() {
        for (i, mode) in SearchMode::ALL.into_iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn list_modes() {
        assert!(SearchMode::Everywhere.is_list_mode());
        assert!(SearchMode::Combined.is_list_mode());
        assert!(!SearchMode::Viewport.is_list_mode());
        assert!(!SearchMode::Bookmarks.is_list_mode());
    }
}

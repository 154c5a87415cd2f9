//! Shared domain enumerations.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Sort order of the paginated listing, keyed on post id.
///
/// The UI labels the two tabs "oldest" (ascending) and "newest" (descending).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "oldest",
            SortOrder::Desc => "newest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order `{0}` (expected asc, desc, oldest or newest)")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "oldest" => Ok(SortOrder::Asc),
            "desc" | "newest" => Ok(SortOrder::Desc),
            other => Err(ParseSortOrderError(other.to_string())),
        }
    }
}

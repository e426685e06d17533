//! Paginated directory listing.

use serde::{Deserialize, Serialize};

/// `GET {base}/pokemon?limit={n}&offset={m}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonList {
    /// Total number of resources the API knows about.
    #[serde(default)]
    pub count: u32,
    /// URL of the next page.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Entries on this page.
    #[serde(default)]
    pub results: Vec<ListItem>,
}

/// One listing entry. Consumed immediately to drive per-record fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Resource name.
    pub name: String,
    /// Resource URL; its last path segment is the numeric id.
    pub url: String,
}

impl ListItem {
    /// Numeric id encoded in the URL.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        id_from_url(&self.url)
    }
}

/// Extracts the numeric id from a resource URL such as `.../pokemon/42/`.
///
/// Returns `None` if the last non-empty path segment is not a number.
#[must_use]
pub fn id_from_url(url: &str) -> Option<u32> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .rfind(|segment| !segment.is_empty())
        .and_then(|segment| segment.parse().ok())
}

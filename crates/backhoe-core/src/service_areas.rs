//! Service-area directory: which cities are served in each state.
//!
//! The data is a JSON object of state name to city list. A copy ships inside
//! the binary; deployments can point at their own file instead.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::info;

use crate::error::ServiceAreaError;

const BUNDLED: &str = include_str!("../data/states_cities.json");

/// Number of columns on the directory page.
pub const COLUMNS: usize = 4;

/// One state's entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceArea {
    pub state: String,
    pub slug: String,
    pub cities: Vec<String>,
}

impl ServiceArea {
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }
}

/// States with their cities, ordered by state name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAreaDirectory {
    areas: BTreeMap<String, ServiceArea>,
}

impl ServiceAreaDirectory {
    /// The directory compiled into the binary.
    ///
    /// # Errors
    ///
    /// Only if the bundled data is malformed, which the tests rule out.
    pub fn bundled() -> Result<Self, ServiceAreaError> {
        Self::from_json(BUNDLED)
    }

    /// Parse a `{"State": ["City", ...]}` document.
    ///
    /// Slugs become URL paths and directory names, so every state name must
    /// slugify to a distinct, non-empty run of `[a-z0-9-]`.
    ///
    /// # Errors
    ///
    /// [`ServiceAreaError::Parse`] if the shape is wrong,
    /// [`ServiceAreaError::InvalidSlug`] or [`ServiceAreaError::DuplicateSlug`]
    /// for a state name that cannot be addressed.
    pub fn from_json(json: &str) -> Result<Self, ServiceAreaError> {
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|e| ServiceAreaError::Parse {
                reason: e.to_string(),
            })?;

        let mut seen: HashMap<String, String> = HashMap::new();
        let mut areas = BTreeMap::new();
        for (state, cities) in raw {
            let slug = slugify(&state);
            if !is_valid_slug(&slug) {
                return Err(ServiceAreaError::InvalidSlug { state, slug });
            }
            if let Some(first) = seen.insert(slug.clone(), state.clone()) {
                return Err(ServiceAreaError::DuplicateSlug {
                    first,
                    second: state,
                    slug,
                });
            }
            let area = ServiceArea {
                slug,
                state: state.clone(),
                cities,
            };
            areas.insert(state, area);
        }
        Ok(Self { areas })
    }

    /// Load from a file on disk.
    ///
    /// # Errors
    ///
    /// [`ServiceAreaError::Read`] if the file cannot be read, otherwise as
    /// [`Self::from_json`].
    pub async fn from_file(path: &Path) -> Result<Self, ServiceAreaError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceAreaError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let directory = Self::from_json(&json)?;
        info!(path = %path.display(), states = directory.len(), "loaded service areas");
        Ok(directory)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// All areas, sorted by state name.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceArea> {
        self.areas.values()
    }

    /// Sorted states dealt round-robin into [`COLUMNS`] columns.
    #[must_use]
    pub fn columns(&self) -> [Vec<&ServiceArea>; COLUMNS] {
        let mut columns: [Vec<&ServiceArea>; COLUMNS] = Default::default();
        for (index, area) in self.areas.values().enumerate() {
            columns[index % COLUMNS].push(area);
        }
        columns
    }

    /// Look up a state by its URL slug.
    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&ServiceArea> {
        self.areas.values().find(|a| a.slug == slug)
    }
}

/// Lowercase and replace each run of whitespace with a single `-`.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Non-empty and only ASCII lowercase letters, digits and `-`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

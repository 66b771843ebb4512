//! Reference catalog: the known tiles, their aliases, category suffixes and
//! the list of files known to be unused

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_extension() -> String {
    ".png".to_string()
}

/// A canonical tile with an optional alternate spelling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    /// Canonical name (e.g., "stone")
    pub name: String,
    /// Alternate spelling used by some packs (e.g., "rock")
    #[serde(default)]
    pub alt: Option<String>,
}

impl TileEntry {
    /// Create a tile entry
    pub fn new(name: impl Into<String>, alt: Option<&str>) -> Self {
        Self {
            name: name.into(),
            alt: alt.map(str::to_string),
        }
    }
}

/// An extra alias that maps onto a canonical tile name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Canonical (or primary alternate) name the alias resolves to
    pub name: String,
    /// The alias as it appears in filenames
    pub alias: String,
}

impl AliasEntry {
    /// Create an alias entry
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

/// Immutable reference tables used to resolve filenames
///
/// Table order matters: the first matching tile wins, and category suffixes
/// are tested in order starting from index 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Recognized image extension, including the dot
    #[serde(default = "default_extension")]
    pub image_extension: String,
    /// Canonical tiles, indexed by position
    pub tiles: Vec<TileEntry>,
    /// Secondary alias table
    #[serde(default)]
    pub aliases: Vec<AliasEntry>,
    /// Category suffixes; slot 0 is the empty default category
    pub categories: Vec<String>,
    /// Suffix that is only stripped when the full name is not itself a tile
    #[serde(default)]
    pub normals_suffix: Option<String>,
    /// Root names of files known to be unused
    #[serde(default)]
    pub ignored: Vec<String>,
}

impl Catalog {
    /// Build a catalog from its tables, validating them
    pub fn new(
        tiles: Vec<TileEntry>,
        aliases: Vec<AliasEntry>,
        categories: Vec<String>,
        normals_suffix: Option<String>,
        ignored: Vec<String>,
    ) -> Result<Self> {
        let catalog = Self {
            image_extension: default_extension(),
            tiles,
            aliases,
            categories,
            normals_suffix,
            ignored,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|e| Error::CatalogParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a catalog from a JSON string (useful for testing)
    pub fn from_json_str(content: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the structural rules the resolver relies on
    pub fn validate(&self) -> Result<()> {
        if self.image_extension.is_empty() {
            return Err(Error::InvalidCatalog("image extension is empty".to_string()));
        }
        match self.categories.first() {
            None => {
                return Err(Error::InvalidCatalog("no categories defined".to_string()));
            }
            Some(first) if !first.is_empty() => {
                return Err(Error::InvalidCatalog(format!(
                    "category 0 must be the empty suffix, found '{}'",
                    first
                )));
            }
            Some(_) => {}
        }
        if let Some(pos) = self.categories.iter().skip(1).position(|s| s.is_empty()) {
            return Err(Error::InvalidCatalog(format!(
                "category {} has an empty suffix",
                pos + 1
            )));
        }
        if let Some(normals) = &self.normals_suffix {
            if !self.categories.iter().skip(1).any(|s| s == normals) {
                return Err(Error::InvalidCatalog(format!(
                    "normals suffix '{}' is not a category suffix",
                    normals
                )));
            }
        }
        Ok(())
    }

    /// Number of canonical tiles
    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Number of categories, including the default one
    pub fn total_categories(&self) -> usize {
        self.categories.len()
    }

    /// Canonical name of a tile by index
    pub fn tile_name(&self, index: usize) -> Option<&str> {
        self.tiles.get(index).map(|t| t.name.as_str())
    }

    /// Suffix of a category by index
    pub fn category_suffix(&self, category: usize) -> Option<&str> {
        self.categories.get(category).map(String::as_str)
    }

    /// Find a category index by its suffix (exact match)
    pub fn find_category(&self, suffix: &str) -> Option<usize> {
        self.categories.iter().position(|s| s == suffix)
    }

    /// Find a category index by its suffix, failing on unknown suffixes
    pub fn category_index(&self, suffix: &str) -> Result<usize> {
        self.find_category(suffix)
            .ok_or_else(|| Error::UnknownCategory(suffix.to_string()))
    }

    /// Check the ignore list, ignoring ASCII case
    pub fn is_ignored(&self, root_name: &str) -> bool {
        self.ignored.iter().any(|i| i.eq_ignore_ascii_case(root_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "tiles": [
            { "name": "stone", "alt": "rock" },
            { "name": "dirt" }
        ],
        "aliases": [ { "name": "stone", "alias": "smooth_stone_old" } ],
        "categories": ["", "_n", "_normal"],
        "normals_suffix": "_normal",
        "ignored": ["pack_icon"]
    }"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();

        assert_eq!(catalog.image_extension, ".png");
        assert_eq!(catalog.total_tiles(), 2);
        assert_eq!(catalog.total_categories(), 3);
        assert_eq!(catalog.tiles[0].alt.as_deref(), Some("rock"));
        assert_eq!(catalog.tiles[1].alt, None);
        assert_eq!(catalog.find_category("_normal"), Some(2));
        assert_eq!(catalog.tile_name(1), Some("dirt"));
    }

    #[test]
    fn test_category_index() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.category_index("").unwrap(), 0);
        assert_eq!(catalog.category_index("_n").unwrap(), 1);

        let err = catalog.category_index("_spec").unwrap_err();
        assert!(matches!(&err, Error::UnknownCategory(s) if s == "_spec"));
        assert_eq!(err.to_string(), "unknown category suffix '_spec'");
    }

    #[test]
    fn test_is_ignored_case_insensitive() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert!(catalog.is_ignored("Pack_Icon"));
        assert!(!catalog.is_ignored("pack"));
    }

    #[test]
    fn test_reject_non_empty_first_category() {
        let err = Catalog::new(vec![], vec![], vec!["_n".to_string()], None, vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog(_)));
    }

    #[test]
    fn test_reject_empty_extra_category() {
        let categories = vec![String::new(), String::new()];
        let err = Catalog::new(vec![], vec![], categories, None, vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog(_)));
    }

    #[test]
    fn test_reject_unknown_normals_suffix() {
        let categories = vec![String::new(), "_n".to_string()];
        let err = Catalog::new(vec![], vec![], categories, Some("_normal".to_string()), vec![])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCatalog(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}

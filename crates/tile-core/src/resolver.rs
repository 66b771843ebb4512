//! Name resolver: maps an on-disk filename to a (category, tile) cell
//!
//! Resolution runs in three steps:
//! 1. strip the image extension
//! 2. strip the first matching category suffix
//! 3. look the remaining root name up in the catalog, honoring the
//!    requested [`AlternateLevel`]
//!
//! The resolver never touches a [`crate::FileGrid`]; it only reports where a
//! file would go.

use crate::catalog::Catalog;
use crate::name::{strip_image_extension, strip_suffix_ignore_case};
use serde::{Deserialize, Serialize};

/// How permissively names are matched against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum AlternateLevel {
    /// Canonical names only
    Exact,
    /// Canonical names and each tile's alternate spelling
    #[default]
    Alternates,
    /// Alternates, then the secondary alias table
    Aliases,
}

impl AlternateLevel {
    /// Map a raw level (0, 1, 2 or more) onto a tier
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => AlternateLevel::Exact,
            1 => AlternateLevel::Alternates,
            _ => AlternateLevel::Aliases,
        }
    }

    /// Numeric form of the tier
    pub fn level(self) -> u8 {
        match self {
            AlternateLevel::Exact => 0,
            AlternateLevel::Alternates => 1,
            AlternateLevel::Aliases => 2,
        }
    }
}

/// Outcome of resolving one filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The file maps onto a grid cell
    Found {
        category: usize,
        index: usize,
        flat_index: usize,
        root_name: String,
    },
    /// The file is on the ignore list
    Ignored { root_name: String },
    /// Wrong extension, or the name matches nothing
    NotFound,
}

impl Resolution {
    /// Check for a catalog match
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }
}

/// Resolves filenames against an injected catalog
#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: Catalog,
}

impl Resolver {
    /// Create a resolver that owns its catalog
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// The catalog this resolver reads from
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve a raw filename (e.g., "stone_n.png")
    pub fn resolve(&self, raw_filename: &str, level: AlternateLevel) -> Resolution {
        let Some(working) = strip_image_extension(raw_filename, &self.catalog.image_extension)
        else {
            return Resolution::NotFound;
        };

        let (category, root_name) = self.split_category(working);

        match self.find_tile_index(root_name, level) {
            Some(index) => Resolution::Found {
                category,
                index,
                flat_index: category * self.catalog.total_tiles() + index,
                root_name: root_name.to_string(),
            },
            None if self.catalog.is_ignored(root_name) => Resolution::Ignored {
                root_name: root_name.to_string(),
            },
            None => Resolution::NotFound,
        }
    }

    /// Split a working name (extension already removed) into its category
    /// and root name
    ///
    /// Examples, with categories `["", "_n", "_normal"]`:
    /// - "stone" -> (0, "stone")
    /// - "stone_n" -> (1, "stone")
    /// - "rail_normal" -> (0, "rail_normal") when "rail_normal" is a tile
    pub fn split_category<'n>(&self, working: &'n str) -> (usize, &'n str) {
        // slot 0 is the empty suffix, which matches everything
        for (category, suffix) in self.catalog.categories.iter().enumerate().skip(1) {
            let Some(stripped) = strip_suffix_ignore_case(working, suffix) else {
                continue;
            };
            if self.is_normals_suffix(suffix)
                && self
                    .find_tile_index(working, AlternateLevel::Alternates)
                    .is_some()
            {
                // the suffix is part of the tile's real name
                continue;
            }
            return (category, stripped);
        }
        (0, working)
    }

    /// Find the catalog index for a root name
    ///
    /// At [`AlternateLevel::Aliases`] an alias hit is re-resolved at
    /// [`AlternateLevel::Alternates`], so alias chains are never followed.
    pub fn find_tile_index(&self, name: &str, level: AlternateLevel) -> Option<usize> {
        let with_alternates = level >= AlternateLevel::Alternates;
        let direct = self.catalog.tiles.iter().position(|tile| {
            tile.name.eq_ignore_ascii_case(name)
                || (with_alternates
                    && tile
                        .alt
                        .as_deref()
                        .is_some_and(|alt| alt.eq_ignore_ascii_case(name)))
        });

        if direct.is_some() || level < AlternateLevel::Aliases {
            return direct;
        }

        let alias = self
            .catalog
            .aliases
            .iter()
            .find(|a| a.alias.eq_ignore_ascii_case(name))?;
        self.find_tile_index(&alias.name, AlternateLevel::Alternates)
    }

    fn is_normals_suffix(&self, suffix: &str) -> bool {
        self.catalog.normals_suffix.as_deref() == Some(suffix)
    }
}

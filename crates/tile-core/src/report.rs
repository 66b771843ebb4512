//! Grid reports for packing tools
//!
//! A [`GridReport`] is a snapshot of which tiles have files and where they
//! came from. It can be written as pretty JSON or as a flat CSV table.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::grid::FileGrid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Snapshot of a grid, labelled with catalog names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridReport {
    /// When the report was built
    pub generated_at: DateTime<Utc>,
    /// Total files in the grid
    pub file_count: usize,
    /// Number of tiles in the catalog
    pub total_tiles: usize,
    /// One summary per category, in catalog order
    pub categories: Vec<CategorySummary>,
    /// One entry per occupied cell, in grid order
    pub entries: Vec<ReportEntry>,
}

/// Per-category totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub index: usize,
    pub suffix: String,
    pub found: usize,
    pub missing: usize,
}

/// One occupied cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub category: usize,
    pub suffix: String,
    pub tile: String,
    pub root_name: String,
    pub filename: String,
    pub path: PathBuf,
}

impl GridReport {
    /// Build a report from a grid and the catalog it was filled from
    pub fn build(grid: &FileGrid, catalog: &Catalog) -> Self {
        let suffix = |category: usize| catalog.category_suffix(category).unwrap_or("").to_string();

        let categories = (0..grid.total_categories())
            .map(|index| {
                let found = grid.category_count(index);
                CategorySummary {
                    index,
                    suffix: suffix(index),
                    found,
                    missing: grid.total_tiles() - found,
                }
            })
            .collect();

        let entries = grid
            .records()
            .map(|(category, tile, record)| ReportEntry {
                category,
                suffix: suffix(category),
                tile: catalog.tile_name(tile).unwrap_or("").to_string(),
                root_name: record.root_name.clone(),
                filename: record.full_filename.clone(),
                path: record.path.clone(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            file_count: grid.file_count(),
            total_tiles: grid.total_tiles(),
            categories,
            entries,
        }
    }

    /// Write the report as pretty JSON
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write the occupied cells as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["category", "suffix", "tile", "root_name", "filename", "path"])?;

        for entry in &self.entries {
            let category = entry.category.to_string();
            let path = entry.path.display().to_string();
            csv_writer.write_record([
                category.as_str(),
                entry.suffix.as_str(),
                entry.tile.as_str(),
                entry.root_name.as_str(),
                entry.filename.as_str(),
                path.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write the report to a file; `json` selects JSON over CSV
    pub fn save<P: AsRef<Path>>(&self, path: P, json: bool) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        if json {
            self.write_json(writer)
        } else {
            self.write_csv(writer)
        }
    }
}

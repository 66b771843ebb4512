//! Dense occupancy grid of tile files
//!
//! Cells are addressed by a flat index `category * total_tiles + tile`.
//! Each cell holds at most one [`FileRecord`]; per-category and overall
//! counts are kept in step with the cells on every mutation.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Provenance of the file occupying a grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Name after extension and category suffix removal
    pub root_name: String,
    /// Filename as found on disk
    pub full_filename: String,
    /// Directory the file was found in
    pub path: PathBuf,
}

impl FileRecord {
    /// Create a record, copying the borrowed values
    pub fn new(root_name: &str, full_filename: &str, path: &Path) -> Self {
        Self {
            root_name: root_name.to_string(),
            full_filename: full_filename.to_string(),
            path: path.to_path_buf(),
        }
    }
}

/// Result of [`FileGrid::insert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The cell was empty and now holds the file
    Inserted,
    /// The cell was already occupied; the grid is unchanged
    Duplicate {
        existing_filename: String,
        existing_path: PathBuf,
    },
}

/// Counts from [`FileGrid::merge_from`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Records copied into empty cells
    pub copied: usize,
    /// Records skipped because the cell was already occupied
    pub skipped: usize,
}

/// The full catalog state for one run
#[derive(Debug, Clone)]
pub struct FileGrid {
    cells: Vec<Option<FileRecord>>,
    categories: Vec<usize>,
    file_count: usize,
    total_categories: usize,
    total_tiles: usize,
}

impl FileGrid {
    /// Create an empty grid with fixed dimensions
    pub fn new(total_categories: usize, total_tiles: usize) -> Self {
        Self {
            cells: vec![None; total_categories * total_tiles],
            categories: vec![0; total_categories],
            file_count: 0,
            total_categories,
            total_tiles,
        }
    }

    /// Create an empty grid sized for a catalog
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.total_categories(), catalog.total_tiles())
    }

    /// Number of categories
    pub fn total_categories(&self) -> usize {
        self.total_categories
    }

    /// Number of tiles per category
    pub fn total_tiles(&self) -> usize {
        self.total_tiles
    }

    /// Total live records
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Live records in one category
    pub fn category_count(&self, category: usize) -> usize {
        self.categories.get(category).copied().unwrap_or(0)
    }

    /// Per-category live record counts
    pub fn category_counts(&self) -> &[usize] {
        &self.categories
    }

    /// Flat index of a (category, tile) cell
    pub fn flat_index(&self, category: usize, tile: usize) -> usize {
        self.check_category(category);
        assert!(
            tile < self.total_tiles,
            "tile {} out of range (total {})",
            tile,
            self.total_tiles
        );
        category * self.total_tiles + tile
    }

    /// Record at a flat index, if the cell is occupied
    pub fn get(&self, flat_index: usize) -> Option<&FileRecord> {
        self.cells.get(flat_index).and_then(Option::as_ref)
    }

    /// Record at a (category, tile) cell, if occupied
    pub fn record(&self, category: usize, tile: usize) -> Option<&FileRecord> {
        if category >= self.total_categories || tile >= self.total_tiles {
            return None;
        }
        self.get(category * self.total_tiles + tile)
    }

    /// Check whether a flat index holds a record
    pub fn is_occupied(&self, flat_index: usize) -> bool {
        self.get(flat_index).is_some()
    }

    /// Insert a file, rejecting duplicates
    ///
    /// The strings are copied, so the caller may reuse its buffers.
    pub fn insert(
        &mut self,
        category: usize,
        flat_index: usize,
        root_name: &str,
        full_filename: &str,
        path: &Path,
    ) -> InsertOutcome {
        self.check_cell(category, flat_index);

        if let Some(existing) = &self.cells[flat_index] {
            return InsertOutcome::Duplicate {
                existing_filename: existing.full_filename.clone(),
                existing_path: existing.path.clone(),
            };
        }

        self.cells[flat_index] = Some(FileRecord::new(root_name, full_filename, path));
        self.file_count += 1;
        self.categories[category] += 1;
        InsertOutcome::Inserted
    }

    /// Copy a record from elsewhere into a cell
    ///
    /// Unlike [`FileGrid::insert`] there is no duplicate check: the caller
    /// must only copy into empty cells.
    pub fn copy(&mut self, category: usize, flat_index: usize, source: &FileRecord) {
        self.check_cell(category, flat_index);

        self.cells[flat_index] = Some(source.clone());
        self.file_count += 1;
        self.categories[category] += 1;
    }

    /// Remove the record from an occupied cell
    ///
    /// Deleting an empty cell is a caller bug: it trips a debug assertion
    /// and is otherwise a no-op.
    pub fn delete(&mut self, category: usize, flat_index: usize) {
        self.check_cell(category, flat_index);

        match self.cells[flat_index].take() {
            Some(_) => {
                self.file_count -= 1;
                self.categories[category] -= 1;
            }
            None => debug_assert!(false, "delete of empty grid cell {}", flat_index),
        }
    }

    /// Iterate over occupied cells as (category, tile, record), in grid order
    pub fn records(&self) -> impl Iterator<Item = (usize, usize, &FileRecord)> + '_ {
        let total_tiles = self.total_tiles;
        self.cells.iter().enumerate().filter_map(move |(flat, cell)| {
            cell.as_ref()
                .map(|record| (flat / total_tiles, flat % total_tiles, record))
        })
    }

    /// Tile indices with no file in a category
    pub fn missing(&self, category: usize) -> Vec<usize> {
        self.check_category(category);
        let start = category * self.total_tiles;
        self.cells[start..start + self.total_tiles]
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(tile, _)| tile)
            .collect()
    }

    /// Copy every record of `other` into the matching empty cells of this grid
    ///
    /// Cells already occupied here keep their record and are counted as
    /// skipped.
    pub fn merge_from(&mut self, other: &FileGrid) -> Result<MergeSummary> {
        let expected = (self.total_categories, self.total_tiles);
        let found = (other.total_categories, other.total_tiles);
        if expected != found {
            return Err(Error::GridMismatch { expected, found });
        }

        let mut summary = MergeSummary::default();
        for (category, tile, record) in other.records() {
            let flat_index = category * self.total_tiles + tile;
            if self.is_occupied(flat_index) {
                summary.skipped += 1;
            } else {
                self.copy(category, flat_index, record);
                summary.copied += 1;
            }
        }
        Ok(summary)
    }

    /// Delete every record that came from `path`, returning how many
    pub fn purge_directory(&mut self, path: &Path) -> usize {
        let doomed: Vec<(usize, usize)> = self
            .records()
            .filter(|(_, _, record)| record.path == path)
            .map(|(category, tile, _)| (category, category * self.total_tiles + tile))
            .collect();

        for &(category, flat_index) in &doomed {
            self.delete(category, flat_index);
        }
        doomed.len()
    }

    fn check_category(&self, category: usize) {
        assert!(
            category < self.total_categories,
            "category {} out of range (total {})",
            category,
            self.total_categories
        );
    }

    fn check_cell(&self, category: usize, flat_index: usize) {
        self.check_category(category);
        let start = category * self.total_tiles;
        assert!(
            (start..start + self.total_tiles).contains(&flat_index),
            "flat index {} is outside category {}",
            flat_index,
            category
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_counts_consistent(grid: &FileGrid) {
        assert_eq!(grid.file_count(), grid.category_counts().iter().sum::<usize>());
        for category in 0..grid.total_categories() {
            let live = grid.records().filter(|(c, _, _)| *c == category).count();
            assert_eq!(grid.category_count(category), live);
        }
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = FileGrid::new(3, 4);
        assert_eq!(grid.file_count(), 0);
        assert_eq!(grid.category_counts(), &[0, 0, 0]);
        assert_eq!(grid.records().count(), 0);
        assert_eq!(grid.missing(2), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_insert_updates_counts() {
        let mut grid = FileGrid::new(3, 4);
        let flat = grid.flat_index(1, 2);
        let outcome = grid.insert(1, flat, "stone", "stone_n.png", Path::new("/tiles"));

        assert_eq!(outcome, InsertOutcome::Inserted);
        assert_eq!(flat, 6);
        assert_eq!(grid.file_count(), 1);
        assert_eq!(grid.category_count(1), 1);
        let record = grid.record(1, 2).unwrap();
        assert_eq!(record.full_filename, "stone_n.png");
        assert_eq!(record.path, PathBuf::from("/tiles"));
        assert_counts_consistent(&grid);
    }

    #[test]
    fn test_insert_copies_caller_strings() {
        let mut grid = FileGrid::new(1, 2);
        let mut buffer = String::from("stone.png");
        grid.insert(0, 0, "stone", &buffer, Path::new("a"));
        buffer.clear();
        buffer.push_str("other.png");

        assert_eq!(grid.get(0).unwrap().full_filename, "stone.png");
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut grid = FileGrid::new(2, 3);
        grid.insert(1, 3, "stone", "stone_n.png", Path::new("a"));
        let outcome = grid.insert(1, 3, "rock", "rock_n.png", Path::new("b"));

        assert_eq!(
            outcome,
            InsertOutcome::Duplicate {
                existing_filename: "stone_n.png".to_string(),
                existing_path: PathBuf::from("a"),
            }
        );
        assert_eq!(grid.file_count(), 1);
        assert_eq!(grid.category_count(1), 1);
        assert_eq!(grid.get(3).unwrap().root_name, "stone");
    }

    #[test]
    fn test_insert_then_delete_restores_counts() {
        let mut grid = FileGrid::new(3, 4);
        grid.insert(0, 1, "keep", "keep.png", Path::new("a"));
        let before = (grid.file_count(), grid.category_counts().to_vec());

        let cells = [(0, 3), (1, 4), (1, 7), (2, 8)];
        for &(category, flat) in &cells {
            grid.insert(category, flat, "x", "x.png", Path::new("a"));
            assert_counts_consistent(&grid);
        }
        assert_eq!(grid.file_count(), 5);
        for &(category, flat) in &cells {
            grid.delete(category, flat);
            assert_counts_consistent(&grid);
        }

        assert_eq!((grid.file_count(), grid.category_counts().to_vec()), before);
        assert!(!grid.is_occupied(7));
    }

    #[test]
    fn test_copy_record() {
        let mut grid = FileGrid::new(2, 2);
        let record = FileRecord::new("dirt", "dirt_n.png", Path::new("packs/a"));
        grid.copy(1, 3, &record);

        assert_eq!(grid.get(3), Some(&record));
        assert_eq!(grid.category_count(1), 1);
        assert_counts_consistent(&grid);
    }

    #[test]
    fn test_records_and_missing() {
        let mut grid = FileGrid::new(2, 3);
        grid.insert(0, 2, "c", "c.png", Path::new("a"));
        grid.insert(1, 3, "a", "a_n.png", Path::new("a"));

        let cells: Vec<(usize, usize)> = grid.records().map(|(c, t, _)| (c, t)).collect();
        assert_eq!(cells, vec![(0, 2), (1, 0)]);
        assert_eq!(grid.missing(0), vec![0, 1]);
        assert_eq!(grid.missing(1), vec![1, 2]);
    }

    #[test]
    fn test_merge_from() {
        let mut base = FileGrid::new(2, 2);
        base.insert(0, 0, "a", "a.png", Path::new("first"));

        let mut other = FileGrid::new(2, 2);
        other.insert(0, 0, "a", "a.png", Path::new("second"));
        other.insert(1, 3, "b", "b_n.png", Path::new("second"));

        let summary = base.merge_from(&other).unwrap();
        assert_eq!(summary, MergeSummary { copied: 1, skipped: 1 });
        assert_eq!(base.file_count(), 2);
        assert_eq!(base.get(0).unwrap().path, PathBuf::from("first"));
        assert_eq!(base.get(3).unwrap().path, PathBuf::from("second"));
        assert_counts_consistent(&base);
    }

    #[test]
    fn test_merge_dimension_mismatch() {
        let mut base = FileGrid::new(2, 2);
        let other = FileGrid::new(2, 3);
        let err = base.merge_from(&other).unwrap_err();
        assert!(matches!(err, Error::GridMismatch { expected: (2, 2), found: (2, 3) }));
    }

    #[test]
    fn test_purge_directory() {
        let mut grid = FileGrid::new(2, 3);
        grid.insert(0, 0, "a", "a.png", Path::new("old"));
        grid.insert(1, 4, "b", "b_n.png", Path::new("old"));
        grid.insert(0, 2, "c", "c.png", Path::new("new"));

        assert_eq!(grid.purge_directory(Path::new("old")), 2);
        assert_eq!(grid.file_count(), 1);
        assert!(grid.is_occupied(2));
        assert_counts_consistent(&grid);
    }

    #[test]
    #[should_panic(expected = "outside category")]
    fn test_flat_index_outside_category_panics() {
        let mut grid = FileGrid::new(2, 3);
        grid.insert(0, 4, "a", "a.png", Path::new("a"));
    }

    #[test]
    #[should_panic(expected = "category 5 out of range")]
    fn test_category_out_of_range_panics() {
        let mut grid = FileGrid::new(2, 3);
        grid.insert(5, 0, "a", "a.png", Path::new("a"));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "delete of empty grid cell")]
    fn test_delete_empty_cell_panics_in_debug() {
        let mut grid = FileGrid::new(1, 1);
        grid.delete(0, 0);
    }
}

#![warn(missing_docs)]
//! # cutprint-catalog
//!
//! ## Purpose
//! Holds the static filter and frame catalogs offered by the photo editor.
//!
//! ## Responsibilities
//! - Define [`FilterEffect`] and [`FrameStyle`] with a tagged [`FrameKind`].
//! - Look entries up by id in constant time.
//! - List entries per category in declaration order, which drives tab order.
//! - Accept extra entries from a JSON catalog document after validation.
//!
//! ## Data flow
//! [`StyleCatalog::builtin`] (or [`global`]) -> editor resolves the chosen ids
//! -> composition receives owned [`FilterEffect`]/[`FrameStyle`] clones.
//!
//! ## Ownership and lifetimes
//! The process-wide catalog is built once and never mutated afterwards, so it
//! is shared by reference without locking.
//!
//! ## Error model
//! Duplicate ids, out-of-range intensities and incomplete frame definitions
//! fail with [`CatalogError`] when a catalog is assembled.

mod builtin;
mod filter;
mod frame;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

pub use filter::{ColorOverlay, FilterCategory, FilterEffect, FilterTransform};
pub use frame::{
    FrameCategory, FrameKind, FrameStyle, GradientDirection, PatternKind, TextureKind,
};

/// Filter every new editing session starts with.
pub const DEFAULT_FILTER_ID: &str = "original";

/// Frame every new editing session starts with.
pub const DEFAULT_FRAME_ID: &str = "no_frame";

static GLOBAL: Lazy<StyleCatalog> = Lazy::new(|| {
    let catalog = StyleCatalog::builtin();
    log::debug!(
        "built-in style catalog ready: {} filters, {} frames",
        catalog.filters().len(),
        catalog.frames().len()
    );
    catalog
});

/// Returns the process-wide built-in catalog.
pub fn global() -> &'static StyleCatalog {
    &GLOBAL
}

/// Extra catalog entries loaded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogDocument {
    /// Additional filters.
    #[serde(default)]
    pub filters: Vec<FilterEffect>,
    /// Additional frames.
    #[serde(default)]
    pub frames: Vec<FrameStyle>,
}

/// Indexed, ordered filter and frame tables.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    filters: Vec<FilterEffect>,
    filter_index: HashMap<String, usize>,
    frames: Vec<FrameStyle>,
    frame_index: HashMap<String, usize>,
}

impl StyleCatalog {
    /// Builds a validated catalog.
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateId`] for repeated ids,
    /// [`CatalogError::MissingDefault`] when `original` or `no_frame` is absent,
    /// and per-entry validation errors.
    pub fn new(filters: Vec<FilterEffect>, frames: Vec<FrameStyle>) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            filters: Vec::with_capacity(filters.len()),
            filter_index: HashMap::with_capacity(filters.len()),
            frames: Vec::with_capacity(frames.len()),
            frame_index: HashMap::with_capacity(frames.len()),
        };
        catalog.append(filters, frames)?;

        if !catalog.filter_index.contains_key(DEFAULT_FILTER_ID) {
            return Err(CatalogError::MissingDefault(DEFAULT_FILTER_ID));
        }
        if !catalog.frame_index.contains_key(DEFAULT_FRAME_ID) {
            return Err(CatalogError::MissingDefault(DEFAULT_FRAME_ID));
        }

        Ok(catalog)
    }

    /// Returns the built-in catalog.
    pub fn builtin() -> Self {
        let filters = builtin::filters();
        let frames = builtin::frames();

        let mut filter_index = HashMap::with_capacity(filters.len());
        for (position, entry) in filters.iter().enumerate() {
            filter_index.insert(entry.id.clone(), position);
        }
        let mut frame_index = HashMap::with_capacity(frames.len());
        for (position, entry) in frames.iter().enumerate() {
            frame_index.insert(entry.id.clone(), position);
        }

        Self {
            filters,
            filter_index,
            frames,
            frame_index,
        }
    }

    /// Parses a JSON [`CatalogDocument`] and appends its entries after the
    /// existing ones.
    ///
    /// # Errors
    /// Returns [`CatalogError::Decode`] for malformed JSON and validation errors
    /// for invalid entries. On error the catalog is left unchanged.
    pub fn extend_from_json(&mut self, raw: &str) -> Result<(), CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw).map_err(CatalogError::Decode)?;
        let mut staged = self.clone();
        staged.append(document.filters, document.frames)?;
        log::info!(
            "catalog extended to {} filters, {} frames",
            staged.filters.len(),
            staged.frames.len()
        );
        *self = staged;
        Ok(())
    }

    fn append(&mut self, filters: Vec<FilterEffect>, frames: Vec<FrameStyle>) -> Result<(), CatalogError> {
        for entry in filters {
            entry.transform.validate(&entry.id)?;
            if self.filter_index.contains_key(&entry.id) {
                return Err(CatalogError::DuplicateId(entry.id));
            }
            self.filter_index.insert(entry.id.clone(), self.filters.len());
            self.filters.push(entry);
        }

        for entry in frames {
            entry.validate()?;
            if self.frame_index.contains_key(&entry.id) {
                return Err(CatalogError::DuplicateId(entry.id));
            }
            self.frame_index.insert(entry.id.clone(), self.frames.len());
            self.frames.push(entry);
        }

        Ok(())
    }

    /// All filters in declaration order.
    pub fn filters(&self) -> &[FilterEffect] {
        &self.filters
    }

    /// All frames in declaration order.
    pub fn frames(&self) -> &[FrameStyle] {
        &self.frames
    }

    /// Looks a filter up by id.
    pub fn filter_by_id(&self, id: &str) -> Option<&FilterEffect> {
        self.filter_index.get(id).map(|position| &self.filters[*position])
    }

    /// Looks a frame up by id.
    pub fn frame_by_id(&self, id: &str) -> Option<&FrameStyle> {
        self.frame_index.get(id).map(|position| &self.frames[*position])
    }

    /// Looks a filter up by id, failing with [`CatalogError::UnknownFilter`].
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownFilter`] for unknown ids.
    pub fn require_filter(&self, id: &str) -> Result<&FilterEffect, CatalogError> {
        self.filter_by_id(id)
            .ok_or_else(|| CatalogError::UnknownFilter(id.to_string()))
    }

    /// Looks a frame up by id, failing with [`CatalogError::UnknownFrame`].
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownFrame`] for unknown ids.
    pub fn require_frame(&self, id: &str) -> Result<&FrameStyle, CatalogError> {
        self.frame_by_id(id)
            .ok_or_else(|| CatalogError::UnknownFrame(id.to_string()))
    }

    /// Filters in `category`, in declaration order.
    pub fn filters_by_category(&self, category: FilterCategory) -> Vec<&FilterEffect> {
        self.filters
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Frames in `category`, in declaration order.
    pub fn frames_by_category(&self, category: FrameCategory) -> Vec<&FrameStyle> {
        self.frames
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Distinct filter categories in order of first appearance.
    pub fn filter_categories(&self) -> Vec<FilterCategory> {
        let mut seen = Vec::new();
        for entry in &self.filters {
            if !seen.contains(&entry.category) {
                seen.push(entry.category);
            }
        }
        seen
    }

    /// Distinct frame categories in order of first appearance.
    pub fn frame_categories(&self) -> Vec<FrameCategory> {
        let mut seen = Vec::new();
        for entry in &self.frames {
            if !seen.contains(&entry.category) {
                seen.push(entry.category);
            }
        }
        seen
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Catalog assembly and lookup errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two entries share an id.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),
    /// A required default entry is missing.
    #[error("catalog is missing required entry: {0}")]
    MissingDefault(&'static str),
    /// Numeric field outside its allowed range.
    #[error("{id}: {field} out of range ({value})")]
    OutOfRange {
        /// Entry id.
        id: String,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// Gradient frame with fewer than two colour stops.
    #[error("{0}: gradient frame needs at least two colours")]
    IncompleteGradient(String),
    /// Image frame without a source.
    #[error("{0}: image frame needs a source uri")]
    MissingImageSource(String),
    /// Unknown filter id.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    /// Unknown frame id.
    #[error("unknown frame: {0}")]
    UnknownFrame(String),
    /// Catalog JSON could not be decoded.
    #[error("catalog decode failure: {0}")]
    Decode(#[from] serde_json::Error),
}

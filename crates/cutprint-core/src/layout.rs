//! Frame layout resolution and canvas slot geometry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Photo-strip layout chosen once per capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutType {
    /// Four photos stacked in a single tall column.
    Vertical4,
    /// Four photos in a 2x2 grid.
    Grid4,
    /// Six photos in a two-column, three-row grid.
    Grid6,
}

/// Slot aspect ratio as `width:height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAspect {
    /// Width term of the ratio.
    pub width: u32,
    /// Height term of the ratio.
    pub height: u32,
}

impl SlotAspect {
    /// Returns the ratio as `width / height`.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Returns the slot height for a given slot width, rounded to the nearest
    /// pixel and never below 1.
    pub fn height_for_width(&self, width: u32) -> u32 {
        let height = (width as u64 * self.height as u64 + self.width as u64 / 2) / self.width as u64;
        height.max(1) as u32
    }
}

/// Rows and columns of a cut layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridArrangement {
    /// Number of slot rows.
    pub rows: u32,
    /// Number of slot columns.
    pub cols: u32,
}

impl GridArrangement {
    /// Total slot count.
    pub fn slot_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }
}

impl CutType {
    /// Every supported cut type in UI order.
    pub const ALL: [CutType; 3] = [CutType::Vertical4, CutType::Grid4, CutType::Grid6];

    /// Number of photos the user must select for this layout.
    pub fn required_photo_count(self) -> usize {
        match self {
            CutType::Vertical4 | CutType::Grid4 => 4,
            CutType::Grid6 => 6,
        }
    }

    /// Aspect ratio of one photo slot.
    pub fn slot_aspect(self) -> SlotAspect {
        match self {
            CutType::Vertical4 => SlotAspect { width: 3, height: 4 },
            CutType::Grid4 | CutType::Grid6 => SlotAspect { width: 1, height: 1 },
        }
    }

    /// Row/column arrangement of the slots.
    pub fn grid_arrangement(self) -> GridArrangement {
        match self {
            CutType::Vertical4 => GridArrangement { rows: 4, cols: 1 },
            CutType::Grid4 => GridArrangement { rows: 2, cols: 2 },
            CutType::Grid6 => GridArrangement { rows: 3, cols: 2 },
        }
    }

    /// Stable identifier used in URLs, configs and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            CutType::Vertical4 => "vertical4",
            CutType::Grid4 => "grid4",
            CutType::Grid6 => "grid6",
        }
    }
}

impl fmt::Display for CutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CutType {
    type Err = CoreError;

    /// Parses `vertical4`, `grid4`, `grid6`, with or without a dash before the
    /// count. Anything else is rejected instead of falling back to a layout.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();

        match normalized.as_str() {
            "vertical4" => Ok(CutType::Vertical4),
            "grid4" => Ok(CutType::Grid4),
            "grid6" => Ok(CutType::Grid6),
            _ => Err(CoreError::InvalidCutType(raw.to_string())),
        }
    }
}

/// Pixel rectangle of one slot on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Slot width.
    pub width: u32,
    /// Slot height.
    pub height: u32,
}

/// Concrete canvas geometry for one composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasLayout {
    /// Layout the geometry was computed for.
    pub cut_type: CutType,
    /// Full canvas width including borders.
    pub width: u32,
    /// Full canvas height including borders and label strip.
    pub height: u32,
    /// Height of the framed photo area (canvas minus label strip).
    pub frame_height: u32,
    /// Label strip height; zero when no label is drawn.
    pub label_strip_height: u32,
    /// Slots in row-major order.
    pub slots: Vec<SlotRect>,
}

impl CanvasLayout {
    /// Computes slot rectangles for `cut_type`.
    ///
    /// Gaps between slots and around the outer edge all equal `border`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] for a zero slot width and
    /// [`CoreError::Overflow`] when the canvas does not fit in `u32`.
    pub fn compute(
        cut_type: CutType,
        slot_width: u32,
        border: u32,
        label_strip_height: u32,
    ) -> Result<Self, CoreError> {
        if slot_width == 0 {
            return Err(CoreError::InvalidDimensions {
                width: slot_width,
                height: 0,
            });
        }

        let grid = cut_type.grid_arrangement();
        let slot_height = cut_type.slot_aspect().height_for_width(slot_width);

        let width = span(grid.cols, slot_width, border)?;
        let frame_height = span(grid.rows, slot_height, border)?;
        let height = frame_height
            .checked_add(label_strip_height)
            .ok_or(CoreError::Overflow)?;

        let mut slots = Vec::with_capacity(grid.slot_count());
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                slots.push(SlotRect {
                    x: border + col * (slot_width + border),
                    y: border + row * (slot_height + border),
                    width: slot_width,
                    height: slot_height,
                });
            }
        }

        Ok(Self {
            cut_type,
            width,
            height,
            frame_height,
            label_strip_height,
            slots,
        })
    }
}

fn span(count: u32, cell: u32, border: u32) -> Result<u32, CoreError> {
    let cells = count.checked_mul(cell).ok_or(CoreError::Overflow)?;
    let gaps = (count + 1).checked_mul(border).ok_or(CoreError::Overflow)?;
    cells.checked_add(gaps).ok_or(CoreError::Overflow)
}

//! Grid search and pixel distribution.
//!
//! Everything here is pure: it turns a window count and a work area into a
//! list of cells. Moving windows into those cells is [`super::placement`]'s job.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::sys::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub columns: usize,
}

impl GridShape {
    /// Smallest column count that fits `windows` into `rows` rows.
    pub fn for_rows(windows: usize, rows: usize) -> Self {
        GridShape { rows, columns: windows.div_ceil(rows) }
    }

    pub fn aspect(&self) -> f64 { self.columns as f64 / self.rows as f64 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRequest {
    pub window_count: usize,
    pub work_area: Rect,
    pub offset_x: i32,
    pub offset_y: i32,
    pub min_spacing_y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("nothing to lay out")]
    Empty,

    #[error("only {available}px of vertical space left for the rows")]
    Infeasible { available: i64 },

    #[error("the offsets push the grid outside the screen coordinate range")]
    OutOfRange,
}

/// Height left for the rows themselves once the bottom offset and the gaps
/// between `rows` rows are taken out.
pub fn available_height(height: i32, offset_y: i32, rows: usize, spacing: i32) -> i64 {
    let gaps = rows.saturating_sub(1) as i64;
    height as i64 - offset_y as i64 - gaps * spacing as i64
}

/// One candidate per row count, in increasing row order. `target` is the
/// width over the height those rows would get; it goes negative (or
/// infinite) once the gaps eat the whole height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub shape: GridShape,
    pub target: f64,
}

impl Candidate {
    pub fn score(&self) -> f64 {
        let score = (self.shape.aspect() - self.target).abs();
        if score.is_nan() { f64::INFINITY } else { score }
    }
}

pub fn candidates(request: &GridRequest) -> impl Iterator<Item = Candidate> + '_ {
    let width = request.work_area.width() as f64;
    (1..=request.window_count).map(move |rows| {
        let shape = GridShape::for_rows(request.window_count, rows);
        let height = available_height(
            request.work_area.height(),
            request.offset_y,
            rows,
            request.min_spacing_y,
        );
        Candidate { shape, target: width / height as f64 }
    })
}

/// Picks the grid whose column/row ratio is closest to the ratio of the space
/// it would actually get. Exact ties keep the smaller row count. Whether the
/// winner leaves any room for its rows is checked by [`plan_grid`].
pub fn choose_grid(request: &GridRequest) -> Result<GridShape, LayoutError> {
    let mut best: Option<(GridShape, f64)> = None;
    for candidate in candidates(request) {
        let score = candidate.score();
        trace!(shape = ?candidate.shape, score);
        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((candidate.shape, score));
        }
    }
    best.map(|(shape, _)| shape).ok_or(LayoutError::Empty)
}

/// Splits `total` into `parts` integer lengths that sum to exactly `total`.
/// The remainder goes one pixel each to the leading parts.
pub fn distribute(total: i32, parts: usize) -> Vec<i32> {
    if parts == 0 {
        return Vec::new();
    }
    let total = total as i64;
    let base = total.div_euclid(parts as i64);
    let extra = total.rem_euclid(parts as i64) as usize;
    // every part lies between base and base + 1, which sit inside total's range
    (0..parts).map(|i| (base + (i < extra) as i64) as i32).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPlan {
    pub shape: GridShape,
    pub row_heights: Vec<i32>,
    pub column_widths: Vec<i32>,
    pub spacing: i32,
    /// Client-area cells in placement order, one per window. The last row may
    /// have fewer cells than there are columns.
    pub cells: Vec<Rect>,
}

fn pixels(value: i64) -> Result<i32, LayoutError> {
    i32::try_from(value).map_err(|_| LayoutError::OutOfRange)
}

fn cell(x: i64, y: i64, width: i32, height: i32) -> Result<Rect, LayoutError> {
    Ok(Rect::new(
        pixels(x)?,
        pixels(y)?,
        pixels(x + width as i64)?,
        pixels(y + height as i64)?,
    ))
}

pub fn plan_grid(request: &GridRequest) -> Result<GridPlan, LayoutError> {
    if request.window_count == 0 {
        return Err(LayoutError::Empty);
    }
    let shape = choose_grid(request)?;
    let work = request.work_area;
    let available =
        available_height(work.height(), request.offset_y, shape.rows, request.min_spacing_y);
    if available <= 0 {
        return Err(LayoutError::Infeasible { available });
    }

    let row_heights = distribute(pixels(available)?, shape.rows);
    let column_widths = distribute(work.width(), shape.columns);

    let mut cells = Vec::with_capacity(request.window_count);
    let mut y = work.top as i64;
    'rows: for &height in &row_heights {
        let mut x = work.left as i64 + request.offset_x as i64;
        for &width in &column_widths {
            if cells.len() == request.window_count {
                break 'rows;
            }
            cells.push(cell(x, y, width, height)?);
            x += width as i64;
        }
        y += height as i64 + request.min_spacing_y as i64;
    }

    Ok(GridPlan {
        shape,
        row_heights,
        column_widths,
        spacing: request.min_spacing_y,
        cells,
    })
}

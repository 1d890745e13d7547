//! Vector shapes
//!
//! Shapes validate their geometry on construction, so encoding a frame
//! never fails on a malformed shape.

use heapless::Vec;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::DisplayError;

/// Widest stroke the rasterizer draws
pub const MAX_THICKNESS: u8 = 18;

/// Most points in a polyline or polygon (one count byte, two coordinates each)
pub const MAX_POINTS: usize = 127;

/// Point list of a polyline or polygon
pub type Points = Vec<(i32, i32), MAX_POINTS>;

fn check_thickness(thickness: u8, min: u8) -> Result<u8, DisplayError> {
    if (min..=MAX_THICKNESS).contains(&thickness) {
        Ok(thickness)
    } else {
        Err(DisplayError::ThicknessOutOfRange(thickness))
    }
}

/// Pair a flat `x0, y0, x1, y1, ...` list into points
fn pair_points(coords: &[i32]) -> Result<Points, DisplayError> {
    if coords.len() % 2 != 0 {
        return Err(DisplayError::MalformedGeometry);
    }
    let mut points = Points::new();
    for pair in coords.chunks_exact(2) {
        points
            .push((pair[0], pair[1]))
            .map_err(|_| DisplayError::MalformedGeometry)?;
    }
    Ok(points)
}

fn translate(points: &mut Points, dx: i32, dy: i32) {
    for (x, y) in points.iter_mut() {
        *x = x.saturating_add(dx);
        *y = y.saturating_add(dy);
    }
}

/// Straight stroke between two points
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Line {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub color: u32,
    thickness: u8,
}

impl Line {
    /// Fails with `ThicknessOutOfRange` unless `1 <= thickness <= 18`
    pub fn new(
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: u32,
        thickness: u8,
    ) -> Result<Self, DisplayError> {
        Ok(Self {
            x1,
            y1,
            x2,
            y2,
            color,
            thickness: check_thickness(thickness, 1)?,
        })
    }

    /// Horizontal line `width` pixels long starting at `(x, y)`
    pub fn hline(x: i32, y: i32, width: i32, color: u32, thickness: u8) -> Result<Self, DisplayError> {
        Self::new(x, y, x + width, y, color, thickness)
    }

    /// Vertical line `height` pixels long starting at `(x, y)`
    pub fn vline(x: i32, y: i32, height: i32, color: u32, thickness: u8) -> Result<Self, DisplayError> {
        Self::new(x, y, x, y + height, color, thickness)
    }

    pub fn thickness(&self) -> u8 {
        self.thickness
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x1 = self.x1.saturating_add(dx);
        self.y1 = self.y1.saturating_add(dy);
        self.x2 = self.x2.saturating_add(dx);
        self.y2 = self.y2.saturating_add(dy);
    }
}

/// Filled axis-aligned rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: u32,
}

impl Rectangle {
    /// Rectangle spanning two opposite corners, in either order
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32, color: u32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: x1.abs_diff(x2) as i32,
            height: y1.abs_diff(y2) as i32,
            color,
        }
    }

    /// Rectangle covering the whole screen
    pub fn fill(color: u32) -> Self {
        Self::new(
            0,
            0,
            i32::from(SCREEN_WIDTH) - 1,
            i32::from(SCREEN_HEIGHT) - 1,
            color,
        )
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }
}

/// Open chain of strokes through a list of points
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Polyline {
    points: Points,
    thickness: u8,
    pub color: u32,
}

impl Polyline {
    /// Build from a flat coordinate list `[x0, y0, x1, y1, ...]`
    pub fn new(coords: &[i32], color: u32, thickness: u8) -> Result<Self, DisplayError> {
        Ok(Self {
            points: pair_points(coords)?,
            thickness: check_thickness(thickness, 1)?,
            color,
        })
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn thickness(&self) -> u8 {
        self.thickness
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        translate(&mut self.points, dx, dy);
    }
}

/// Closed, filled outline through a list of points
///
/// A thickness of zero draws the fill without a stroke.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Polygon {
    points: Points,
    thickness: u8,
    pub fill_color: u32,
}

impl Polygon {
    /// Build from a flat coordinate list `[x0, y0, x1, y1, ...]`
    pub fn new(coords: &[i32], fill_color: u32, thickness: u8) -> Result<Self, DisplayError> {
        Ok(Self {
            points: pair_points(coords)?,
            thickness: check_thickness(thickness, 0)?,
            fill_color,
        })
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn thickness(&self) -> u8 {
        self.thickness
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        translate(&mut self.points, dx, dy);
    }
}

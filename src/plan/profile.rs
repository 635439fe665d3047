use crate::error::{GeometryError, Result};
use crate::math::{Line2D, Point2, Vector2, TOLERANCE};

use super::Side;

/// Boundary lines of one centerline segment, offset to either side.
#[derive(Debug, Clone, Copy)]
pub struct SegmentLines {
    pub inner: Line2D,
    pub outer: Line2D,
}

impl SegmentLines {
    #[must_use]
    pub fn side(&self, side: Side) -> &Line2D {
        match side {
            Side::Inner => &self.inner,
            Side::Outer => &self.outer,
        }
    }
}

/// Offset geometry of a wall centerline.
///
/// The inner side is to the right of the direction of travel. Interior
/// vertices offset along the normalized sum of their two segment normals;
/// the end vertices use the normal of their single segment.
#[derive(Debug, Clone)]
pub struct WallProfile {
    inner_normals: Vec<Vector2>,
    inner: Vec<Point2>,
    outer: Vec<Point2>,
    lines: Vec<SegmentLines>,
}

impl WallProfile {
    /// Computes the profile of `points` for a wall of the given `width`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if a segment has zero length, the
    /// centerline doubles back on itself, or an offset segment collapses.
    pub fn new(points: &[Point2], width: f64) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::Degenerate("centerline needs at least 2 points".into()).into());
        }

        let segment_normals = points
            .windows(2)
            .map(|pair| Ok(Line2D::new(&pair[1], &pair[0])?.normal_vector()))
            .collect::<Result<Vec<_>>>()?;

        let last = points.len() - 1;
        let mut inner_normals = Vec::with_capacity(points.len());
        for i in 0..=last {
            let sum = match i {
                0 => segment_normals[0],
                i if i == last => segment_normals[last - 1],
                i => segment_normals[i - 1] + segment_normals[i],
            };
            let len = sum.norm();
            if len < TOLERANCE {
                return Err(GeometryError::Degenerate(format!(
                    "centerline doubles back at ({}, {})",
                    points[i].x, points[i].y
                ))
                .into());
            }
            inner_normals.push(sum / len);
        }

        let half = width * 0.5;
        let inner: Vec<Point2> = points
            .iter()
            .zip(&inner_normals)
            .map(|(p, n)| p + n * half)
            .collect();
        let outer: Vec<Point2> = points
            .iter()
            .zip(&inner_normals)
            .map(|(p, n)| p - n * half)
            .collect();

        let lines = (0..last)
            .map(|i| {
                Ok(SegmentLines {
                    inner: Line2D::new(&inner[i + 1], &inner[i])?,
                    outer: Line2D::new(&outer[i + 1], &outer[i])?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            inner_normals,
            inner,
            outer,
            lines,
        })
    }

    /// Unit normal pointing from the centerline to the given side at vertex `i`.
    #[must_use]
    pub fn normal(&self, side: Side, i: usize) -> Vector2 {
        match side {
            Side::Inner => self.inner_normals[i],
            Side::Outer => -self.inner_normals[i],
        }
    }

    /// Offset points on the given side, one per centerline vertex.
    #[must_use]
    pub fn points(&self, side: Side) -> &[Point2] {
        match side {
            Side::Inner => &self.inner,
            Side::Outer => &self.outer,
        }
    }

    /// Offset lines, one pair per centerline segment.
    #[must_use]
    pub fn segment_lines(&self) -> &[SegmentLines] {
        &self.lines
    }

    #[must_use]
    pub fn first_lines(&self) -> &SegmentLines {
        &self.lines[0]
    }

    #[must_use]
    pub fn last_lines(&self) -> &SegmentLines {
        &self.lines[self.lines.len() - 1]
    }
}

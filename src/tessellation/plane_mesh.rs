use crate::error::Result;
use crate::geometry::UnfoldedCurve;
use crate::math::{Point2, Point3};

use super::{Mesh, Triangulate, Triangulation};

/// Meshes a vertical wall face that follows a plan curve.
///
/// The face is triangulated in the unfolded `(u, h)` frame of its bottom
/// curve, `u` running along the curve and `h` up to `height`, and the
/// result is wrapped back onto the curve. Holes are given in the same frame.
/// Faces of bent curves are triangulated strip by strip so triangles stay
/// flat. Triangles face the right-hand side of the curve direction.
pub struct PlaneMesh<'a> {
    name: &'a str,
    boundary: &'a UnfoldedCurve,
    height: f64,
    holes: &'a [Vec<Point2>],
}

impl<'a> PlaneMesh<'a> {
    /// Creates a new `PlaneMesh` operation.
    #[must_use]
    pub fn new(
        name: &'a str,
        boundary: &'a UnfoldedCurve,
        height: f64,
        holes: &'a [Vec<Point2>],
    ) -> Self {
        Self {
            name,
            boundary,
            height,
            holes,
        }
    }

    /// Executes the meshing.
    ///
    /// # Errors
    ///
    /// Returns an error if a hole does not fit inside the face or the face
    /// cannot be triangulated.
    pub fn execute(&self) -> Result<Mesh> {
        let xs: Vec<f64> = self.boundary.unfolded_points().iter().map(|p| p.x).collect();

        if xs.len() == 2 {
            let flat = Triangulate::new(&self.band(&xs), self.holes).execute()?;
            return Ok(self.wrap(&flat));
        }

        let mut mesh = Mesh::new(self.name);
        for chunk in self.chunks(&xs) {
            let (lo, hi) = (chunk[0], chunk[chunk.len() - 1]);
            let holes: Vec<Vec<Point2>> = self
                .holes
                .iter()
                .filter(|h| {
                    let (h_lo, h_hi) = x_range(h);
                    h_lo >= lo - CHUNK_SLACK && h_hi <= hi + CHUNK_SLACK
                })
                .cloned()
                .collect();
            let flat = Triangulate::new(&self.band(&chunk), &holes).execute()?;
            mesh.merge(&self.wrap(&flat));
        }
        Ok(mesh)
    }

    /// Outline of the face between the given stations: bottom left to right,
    /// then top right to left.
    fn band(&self, xs: &[f64]) -> Vec<Point2> {
        xs.iter()
            .map(|&x| Point2::new(x, 0.0))
            .chain(xs.iter().rev().map(|&x| Point2::new(x, self.height)))
            .collect()
    }

    /// Splits the stations into vertical strips: one per curve segment, and
    /// one per hole whose sides pass through the hole's x-extent. Overlapping
    /// holes share a strip, which then keeps every station inside it.
    fn chunks(&self, xs: &[f64]) -> Vec<Vec<f64>> {
        let mut events: Vec<(f64, Event)> = xs.iter().map(|&x| (x, Event::Station)).collect();
        for hole in self.holes {
            let (lo, hi) = x_range(hole);
            events.push((lo, Event::HoleStart));
            events.push((hi, Event::HoleEnd));
        }
        events.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut chunks: Vec<Vec<f64>> = vec![Vec::new()];
        let mut open = 0usize;
        for (x, event) in events {
            push_station(&mut chunks, x);
            match event {
                Event::Station => {
                    if open == 0 {
                        chunks.push(vec![x]);
                    }
                }
                Event::HoleStart => {
                    open += 1;
                    if open == 1 {
                        chunks.push(vec![x]);
                    }
                }
                Event::HoleEnd => {
                    open = open.saturating_sub(1);
                    if open == 0 {
                        chunks.push(vec![x]);
                    }
                }
            }
        }
        chunks.retain(|c| c.len() >= 2);
        chunks
    }

    fn wrap(&self, flat: &Triangulation) -> Mesh {
        let vertices = flat
            .vertices
            .iter()
            .map(|uv| {
                let p = self.boundary.unfold(&Point2::new(uv.x, 0.0));
                Point3::new(p.x, p.y, uv.y)
            })
            .collect();
        Mesh {
            name: self.name.to_owned(),
            vertices,
            indices: flat.indices.clone(),
        }
    }
}

/// Stations closer than this are treated as one.
const CHUNK_SLACK: f64 = 1e-7;

#[derive(Debug, Clone, Copy)]
enum Event {
    Station,
    HoleStart,
    HoleEnd,
}

fn push_station(chunks: &mut [Vec<f64>], x: f64) {
    if let Some(chunk) = chunks.last_mut() {
        if chunk.last().is_none_or(|&last| x - last > CHUNK_SLACK) {
            chunk.push(x);
        }
    }
}

fn x_range(points: &[Point2]) -> (f64, f64) {
    points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Vector3;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn straight_face_without_holes() {
        let curve = UnfoldedCurve::new(&[Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)]).unwrap();
        let mesh = PlaneMesh::new("inner", &curve, 2.5, &[]).execute().unwrap();
        assert_eq!(mesh.name, "inner");
        assert_eq!(mesh.triangle_count(), 2);
        assert_relative_eq!(mesh.area(), 10.0, epsilon = 1e-9);
        // Heading east, the right-hand side is south.
        for i in 0..mesh.triangle_count() {
            assert_relative_eq!(mesh.triangle_normal(i).unwrap(), -Vector3::y(), epsilon = 1e-9);
        }
    }

    #[test]
    fn straight_face_with_window() {
        let curve = UnfoldedCurve::new(&[Point2::new(0.0, 0.0), Point2::new(0.0, 4.0)]).unwrap();
        let holes = vec![rect(1.0, 1.0, 2.0, 2.0)];
        let mesh = PlaneMesh::new("inner", &curve, 2.5, &holes).execute().unwrap();
        assert_relative_eq!(mesh.area(), 9.0, epsilon = 1e-9);
        for v in &mesh.vertices {
            assert!(v.x.abs() < 1e-9);
        }
    }

    #[test]
    fn bent_face_is_chunked_around_holes() {
        let curve = UnfoldedCurve::new(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(4.0, 1.0),
            Point2::new(6.0, 1.0),
        ])
        .unwrap();
        let length = curve.length();
        let holes = vec![rect(0.5, 0.5, 1.5, 1.5), rect(length - 1.5, 0.0, length - 0.5, 2.0)];
        let face = PlaneMesh::new("outer", &curve, 2.5, &holes);

        let xs: Vec<f64> = curve.unfolded_points().iter().map(|p| p.x).collect();
        let chunks = face.chunks(&xs);
        assert_eq!(chunks.len(), 7);
        assert_relative_eq!(chunks[1][0], 0.5);
        assert_relative_eq!(chunks[1][chunks[1].len() - 1], 1.5);

        let mesh = face.execute().unwrap();
        assert_relative_eq!(mesh.area(), length * 2.5 - 1.0 - 2.0, epsilon = 1e-9);
    }

    #[test]
    fn overlapping_holes_share_a_chunk() {
        let curve = UnfoldedCurve::new(&[
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(6.0, 2.0),
        ])
        .unwrap();
        let holes = vec![rect(1.0, 0.5, 2.5, 1.0), rect(2.0, 1.5, 4.0, 2.0)];
        let face = PlaneMesh::new("inner", &curve, 2.5, &holes);
        let xs: Vec<f64> = curve.unfolded_points().iter().map(|p| p.x).collect();
        let chunks = face.chunks(&xs);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1], vec![1.0, 2.0, 2.5, 3.0, 4.0]);
        assert!(face.execute().is_ok());
    }
}

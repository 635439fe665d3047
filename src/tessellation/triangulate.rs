use std::collections::{HashMap, HashSet};

use spade::handles::FixedVertexHandle;
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation as _,
};

use crate::error::{Result, TessellationError};
use crate::math::polygon_2d::{
    dedup_closed, point_in_polygon, point_on_boundary, point_to_segment_dist, signed_area_2d,
};
use crate::math::{Point2, TOLERANCE};

/// Vertices closer than this are merged before triangulation.
const SNAP: f64 = 1e-7;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Output of [`Triangulate`]: triangles are counter-clockwise.
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    pub vertices: Vec<Point2>,
    pub indices: Vec<[u32; 3]>,
}

/// Triangulates a simple polygon with holes using a constrained Delaunay
/// triangulation.
///
/// Holes may touch the outer contour (a door reaching the floor is a notch in
/// the wall face); coincident edges are merged before they are constrained.
pub struct Triangulate<'a> {
    contour: &'a [Point2],
    holes: &'a [Vec<Point2>],
}

impl<'a> Triangulate<'a> {
    /// Creates a new `Triangulate` operation.
    #[must_use]
    pub fn new(contour: &'a [Point2], holes: &'a [Vec<Point2>]) -> Self {
        Self { contour, holes }
    }

    /// Executes the triangulation.
    ///
    /// # Errors
    ///
    /// Returns `TessellationError::InvalidContour` if a loop has fewer than
    /// three distinct points or no area, a hole leaves the contour, or loops
    /// cross each other. Returns `TessellationError::Failed` if no triangle
    /// ends up inside the contour.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Triangulation> {
        let outer = clean_loop(self.contour, "outer")?;
        let holes = self
            .holes
            .iter()
            .enumerate()
            .map(|(i, h)| clean_loop(h, &hole_name(i)))
            .collect::<Result<Vec<_>>>()?;

        for (i, hole) in holes.iter().enumerate() {
            let outside = hole
                .iter()
                .find(|p| !point_in_polygon(p, &outer) && !point_on_boundary(p, &outer, SNAP));
            if let Some(p) = outside {
                return Err(TessellationError::InvalidContour {
                    contour: hole_name(i),
                    reason: format!("vertex ({}, {}) lies outside the outer contour", p.x, p.y),
                }
                .into());
            }
        }

        let mut cdt = Cdt::new();
        let mut vertices = VertexSet::default();
        let mut loops = Vec::with_capacity(holes.len() + 1);
        loops.push(("outer".to_owned(), vertices.insert_loop(&mut cdt, &outer)?));
        for (i, hole) in holes.iter().enumerate() {
            loops.push((hole_name(i), vertices.insert_loop(&mut cdt, hole)?));
        }

        let mut constrained: HashSet<(usize, usize)> = HashSet::new();
        for (name, indices) in &loops {
            for k in 0..indices.len() {
                let from = indices[k];
                let to = indices[(k + 1) % indices.len()];
                for (a, b) in vertices.split_edge(from, to) {
                    let key = (a.min(b), a.max(b));
                    if !constrained.insert(key) {
                        continue;
                    }
                    let (ha, hb) = (vertices.handles[a], vertices.handles[b]);
                    if !cdt.can_add_constraint(ha, hb) {
                        return Err(TessellationError::InvalidContour {
                            contour: name.clone(),
                            reason: "edges cross another loop or themselves".into(),
                        }
                        .into());
                    }
                    cdt.add_constraint(ha, hb);
                }
            }
        }

        let mut out = Triangulation::default();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();

        for face in cdt.inner_faces() {
            let verts = face.vertices();
            let corners = verts.map(|vh| {
                let p = vh.position();
                Point2::new(p.x, p.y)
            });
            let centroid =
                Point2::from((corners[0].coords + corners[1].coords + corners[2].coords) / 3.0);
            if !point_in_polygon(&centroid, &outer)
                || holes.iter().any(|h| point_in_polygon(&centroid, h))
            {
                continue;
            }

            let mut tri = [0u32; 3];
            for (slot, (vh, corner)) in tri.iter_mut().zip(verts.iter().zip(corners)) {
                let idx = vh.fix().index();
                *slot = *vertex_map.entry(idx).or_insert_with(|| {
                    out.vertices.push(corner);
                    (out.vertices.len() - 1) as u32
                });
            }
            out.indices.push(tri);
        }

        if out.indices.is_empty() {
            return Err(TessellationError::Failed("no triangles inside the contour".into()).into());
        }
        Ok(out)
    }
}

fn hole_name(i: usize) -> String {
    format!("hole {i}")
}

/// Removes repeated points and rejects loops that cannot bound an area.
fn clean_loop(points: &[Point2], name: &str) -> Result<Vec<Point2>> {
    let cleaned = dedup_closed(points, SNAP);
    if cleaned.len() < 3 {
        return Err(TessellationError::InvalidContour {
            contour: name.to_owned(),
            reason: format!("{} distinct points, need at least 3", cleaned.len()),
        }
        .into());
    }
    if signed_area_2d(&cleaned).abs() < TOLERANCE {
        return Err(TessellationError::InvalidContour {
            contour: name.to_owned(),
            reason: "loop encloses no area".into(),
        }
        .into());
    }
    Ok(cleaned)
}

/// Inserted CDT vertices with their positions, merged within [`SNAP`].
#[derive(Default)]
struct VertexSet {
    points: Vec<Point2>,
    handles: Vec<FixedVertexHandle>,
}

impl VertexSet {
    fn insert_loop(&mut self, cdt: &mut Cdt, points: &[Point2]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(points.len());
        for p in points {
            let idx = self.insert(cdt, *p)?;
            if indices.last() != Some(&idx) {
                indices.push(idx);
            }
        }
        Ok(indices)
    }

    fn insert(&mut self, cdt: &mut Cdt, p: Point2) -> Result<usize> {
        if let Some(i) = self.points.iter().position(|q| (q - p).norm() <= SNAP) {
            return Ok(i);
        }
        let handle = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        self.points.push(p);
        self.handles.push(handle);
        Ok(self.points.len() - 1)
    }

    /// Splits the edge `from -> to` at every known vertex lying on it, so
    /// that overlapping edges of different loops become identical pieces.
    fn split_edge(&self, from: usize, to: usize) -> Vec<(usize, usize)> {
        if from == to {
            return Vec::new();
        }
        let a = self.points[from];
        let b = self.points[to];
        let d = b - a;
        let len_sq = d.norm_squared();

        let mut cuts: Vec<(f64, usize)> = self
            .points
            .iter()
            .enumerate()
            .filter(|&(i, p)| i != from && i != to && point_to_segment_dist(p, &a, &b) <= SNAP)
            .map(|(i, p)| ((p - a).dot(&d) / len_sq, i))
            .collect();
        cuts.sort_by(|x, y| x.0.total_cmp(&y.0));

        let mut pieces = Vec::with_capacity(cuts.len() + 1);
        let mut prev = from;
        for (_, i) in cuts {
            pieces.push((prev, i));
            prev = i;
        }
        pieces.push((prev, to));
        pieces
    }
}

use crate::error::Result;
use crate::geometry::UnfoldedCurve;
use crate::math::polygon_2d::right_normal;
use crate::math::{lift, Point2, Point3};
use crate::operations::{OpeningProjector, ProjectedOpening, WallJointResolver, WallNeighbors};
use crate::plan::{OpeningKind, Side, Wall};

use super::{Mesh, PlaneMesh, Triangulate};

/// End cap triangles over `[a0, c0, b0, bh, ch, ah]`, where `c` is the
/// centerline and `a`/`b` the two boundary points.
const CAP_TRIANGLES: [[u32; 3]; 4] = [[0, 5, 4], [0, 4, 1], [1, 4, 3], [1, 3, 2]];

/// Builds the named sub-meshes of one wall.
///
/// Produces `"inner"`, `"outer"`, `"leftside"`, `"rightside"` and `"top"`,
/// followed by the jambs of each opening: `"jamb {i}"` for openings through
/// the wall, `"inner jamb {i}"`/`"outer jamb {i}"` and their
/// `"... jamb back {i}"` walls for niches.
pub struct WallMeshBuilder<'a> {
    wall: &'a Wall,
    neighbors: &'a WallNeighbors,
}

/// One resolved boundary face of the wall.
struct Face {
    curve: UnfoldedCurve,
    openings: Vec<ProjectedOpening>,
}

impl Face {
    fn opening(&self, index: usize) -> Option<&ProjectedOpening> {
        self.openings.iter().find(|o| o.index == index)
    }
}

impl<'a> WallMeshBuilder<'a> {
    /// Creates a new `WallMeshBuilder` operation.
    #[must_use]
    pub fn new(wall: &'a Wall, neighbors: &'a WallNeighbors) -> Self {
        Self { wall, neighbors }
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the joints cannot be resolved, a boundary
    /// collapses, an opening cannot be placed, or a face fails to
    /// triangulate.
    pub fn execute(&self) -> Result<Vec<Mesh>> {
        let joints = WallJointResolver::new(self.wall, self.neighbors).execute()?;
        let inner_points = joints.boundary(self.wall, Side::Inner);
        let outer_points = joints.boundary(self.wall, Side::Outer);
        let inner = self.face(Side::Inner, &inner_points)?;
        let outer = self.face(Side::Outer, &outer_points)?;
        let height = self.wall.height();

        let mut meshes = Vec::with_capacity(5 + self.wall.openings().len() * 2);
        meshes.push(face_mesh("inner", &inner, height)?);
        meshes.push(face_mesh("outer", &outer, height)?.flipped());

        let points = self.wall.points();
        meshes.push(cap(
            "leftside",
            [inner_points[0], points[0], outer_points[0]],
            height,
        ));
        meshes.push(cap(
            "rightside",
            [
                outer_points[outer_points.len() - 1],
                points[points.len() - 1],
                inner_points[inner_points.len() - 1],
            ],
            height,
        ));
        meshes.push(self.top(&inner_points, &outer_points)?);

        for (index, opening) in self.wall.openings().iter().enumerate() {
            match opening.kind() {
                OpeningKind::Through => {
                    if let (Some(back), Some(front)) = (inner.opening(index), outer.opening(index)) {
                        meshes.push(ribbon(
                            format!("jamb {index}"),
                            &back.points_3d,
                            &front.points_3d,
                        ));
                    }
                }
                OpeningKind::Inner => {
                    if let Some(front) = inner.opening(index) {
                        meshes.extend(niche(Side::Inner, &inner.curve, front)?);
                    }
                }
                OpeningKind::Outer => {
                    if let Some(front) = outer.opening(index) {
                        meshes.extend(niche(Side::Outer, &outer.curve, front)?);
                    }
                }
            }
        }
        Ok(meshes)
    }

    fn face(&self, side: Side, points: &[Point2]) -> Result<Face> {
        let curve = UnfoldedCurve::new(points)?;
        let openings = OpeningProjector::new(self.wall, side, &curve).project_all()?;
        Ok(Face { curve, openings })
    }

    /// Plan-space cap between the two boundaries at wall height.
    fn top(&self, inner: &[Point2], outer: &[Point2]) -> Result<Mesh> {
        let mut outline: Vec<Point2> = inner.iter().rev().copied().collect();
        outline.push(self.wall.start());
        outline.extend_from_slice(outer);
        outline.push(self.wall.end());

        let flat = Triangulate::new(&outline, &[]).execute()?;
        let height = self.wall.height();
        Ok(Mesh {
            name: "top".into(),
            vertices: flat.vertices.iter().map(|p| lift(p, height)).collect(),
            indices: flat.indices,
        })
    }
}

fn face_mesh(name: &str, face: &Face, height: f64) -> Result<Mesh> {
    let holes: Vec<Vec<Point2>> = face.openings.iter().map(|o| o.points_2d.clone()).collect();
    PlaneMesh::new(name, &face.curve, height, &holes).execute()
}

fn cap(name: &str, bottom: [Point2; 3], height: f64) -> Mesh {
    let [a, c, b] = bottom;
    Mesh {
        name: name.into(),
        vertices: vec![
            lift(&a, 0.0),
            lift(&c, 0.0),
            lift(&b, 0.0),
            lift(&b, height),
            lift(&c, height),
            lift(&a, height),
        ],
        indices: CAP_TRIANGLES.to_vec(),
    }
}

/// Closed band joining two contours of equal length. With `back` on the
/// inner side of `front`, triangles face into the opening.
#[allow(clippy::cast_possible_truncation)]
fn ribbon(name: String, back: &[Point3], front: &[Point3]) -> Mesh {
    let n = back.len();
    let mut vertices = Vec::with_capacity(n * 2);
    vertices.extend_from_slice(back);
    vertices.extend_from_slice(front);

    let mut indices = Vec::with_capacity(n * 2);
    for j in 0..n {
        let k = (j + 1) % n;
        let (j, k, n) = (j as u32, k as u32, n as u32);
        indices.push([j, k, n + j]);
        indices.push([k, n + k, n + j]);
    }
    Mesh {
        name,
        vertices,
        indices,
    }
}

/// Side ribbon and back wall of a niche cut into the `side` face.
fn niche(side: Side, boundary: &UnfoldedCurve, front: &ProjectedOpening) -> Result<[Mesh; 2]> {
    let recess = |uh: &Point2| -> Point3 {
        let on_face = boundary.unfold(&Point2::new(uh.x, 0.0));
        let outward = right_normal(&boundary.tangent_at(uh.x));
        let inward = match side {
            Side::Inner => -outward,
            Side::Outer => outward,
        };
        lift(&(on_face + inward * front.depth), uh.y)
    };

    let back: Vec<Point3> = front.points_2d.iter().map(&recess).collect();
    let mut jamb = ribbon(
        format!("{} jamb {}", side.name(), front.index),
        &back,
        &front.points_3d,
    );

    let flat = Triangulate::new(&front.points_2d, &[]).execute()?;
    let mut back_wall = Mesh {
        name: format!("{} jamb back {}", side.name(), front.index),
        vertices: flat.vertices.iter().map(&recess).collect(),
        indices: flat.indices,
    };

    match side {
        Side::Inner => jamb.flip_faces(),
        Side::Outer => back_wall.flip_faces(),
    }
    Ok([jamb, back_wall])
}

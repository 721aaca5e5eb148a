//! Indexed triangle meshes.

use rad_core::common::*;
use rad_core::error::{Error, Result};
use rad_core::geometry::{Bounds3f, Frame, Point2f, Point3f, Ray, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::paramset::ParamSet;
use rad_core::sampling::{uniform_sample_triangle, Distribution1D};
use rad_core::shape::{HitRecord, PositionSample, PrimitiveHit, Shape};

/// An indexed triangle mesh with optional per-vertex shading normals and
/// texture coordinates. Each triangle is one primitive; area sampling first
/// picks a triangle from a precomputed area table, then a uniform barycentric
/// point inside it.
pub struct TriangleMesh {
    positions: Vec<Point3f>,
    indices: Vec<[usize; 3]>,
    normals: Option<Vec<Vector3f>>,
    uvs: Option<Vec<Point2f>>,
    area_distribution: Distribution1D,
    total_area: Float,
}

impl TriangleMesh {
    /// Create a new `TriangleMesh`. Optional normals and UVs must cover every
    /// vertex when present.
    ///
    /// * `positions` - Vertex positions.
    /// * `indices`   - Vertex indices, three per triangle.
    /// * `normals`   - Optional per-vertex shading normals.
    /// * `uvs`       - Optional per-vertex texture coordinates.
    pub fn new(
        positions: Vec<Point3f>,
        indices: Vec<[usize; 3]>,
        normals: Option<Vec<Vector3f>>,
        uvs: Option<Vec<Point2f>>,
    ) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::InvalidData("mesh has no triangles".to_string()));
        }
        for tri in &indices {
            for &i in tri {
                if i >= positions.len() {
                    return Err(Error::InvalidData(format!(
                        "vertex index {} out of range for {} vertices",
                        i,
                        positions.len()
                    )));
                }
            }
        }
        if let Some(n) = &normals {
            if n.len() != positions.len() {
                return Err(Error::InvalidData(
                    "normal count does not match vertex count".to_string(),
                ));
            }
        }
        if let Some(t) = &uvs {
            if t.len() != positions.len() {
                return Err(Error::InvalidData(
                    "uv count does not match vertex count".to_string(),
                ));
            }
        }

        let areas: Vec<Float> = indices
            .iter()
            .map(|tri| triangle_area(&positions, tri))
            .collect();
        let total_area: Float = areas.iter().sum();
        if total_area <= 0.0 {
            return Err(Error::InvalidData(
                "mesh has zero surface area".to_string(),
            ));
        }

        Ok(Self {
            positions,
            indices,
            normals,
            uvs,
            area_distribution: Distribution1D::new(areas),
            total_area,
        })
    }

    /// Create a `TriangleMesh` from resolved parameters: `P` (positions, three
    /// floats per vertex), `indices` (three per triangle), and optional `N`
    /// and `uv` arrays.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let p = params.require_floats("P")?;
        if p.len() % 3 != 0 {
            return Err(Error::InvalidData("P length is not a multiple of 3".to_string()));
        }
        let positions: Vec<Point3f> = p
            .chunks_exact(3)
            .map(|c| Point3f::new(c[0], c[1], c[2]))
            .collect();

        let raw_indices = params.require_ints("indices")?;
        if raw_indices.len() % 3 != 0 {
            return Err(Error::InvalidData(
                "indices length is not a multiple of 3".to_string(),
            ));
        }
        let indices: Vec<[usize; 3]> = raw_indices
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
            .collect();

        let normals = match params.find_floats("N") {
            Some(n) => Some(
                n.chunks_exact(3)
                    .map(|c| Vector3f::new(c[0], c[1], c[2]))
                    .collect(),
            ),
            None => None,
        };
        let uvs = match params.find_floats("uv") {
            Some(t) => Some(t.chunks_exact(2).map(|c| Point2f::new(c[0], c[1])).collect()),
            None => None,
        };
        Self::new(positions, indices, normals, uvs)
    }

    fn vertices(&self, index: usize) -> (Point3f, Point3f, Point3f) {
        let [i0, i1, i2] = self.indices[index];
        (self.positions[i0], self.positions[i1], self.positions[i2])
    }

    /// Shading normal at barycentric coordinates, geometric normal when the
    /// mesh carries no vertex normals.
    fn shading_normal(&self, index: usize, b: &Point2f, geometric: &Vector3f) -> Vector3f {
        match &self.normals {
            Some(normals) => {
                let [i0, i1, i2] = self.indices[index];
                let n = normals[i0] * (1.0 - b.x - b.y) + normals[i1] * b.x + normals[i2] * b.y;
                let len = n.length();
                if len > 0.0 {
                    (n / len).face_forward(geometric)
                } else {
                    *geometric
                }
            }
            None => *geometric,
        }
    }

    /// Interpolated texture coordinate; barycentrics double as UV when the
    /// mesh carries none.
    fn texture_uv(&self, index: usize, b: &Point2f) -> Point2f {
        match &self.uvs {
            Some(uvs) => {
                let [i0, i1, i2] = self.indices[index];
                uvs[i0] * (1.0 - b.x - b.y) + uvs[i1] * b.x + uvs[i2] * b.y
            }
            None => *b,
        }
    }
}

impl Shape for TriangleMesh {
    fn primitive_count(&self) -> usize {
        self.indices.len()
    }

    fn primitive_bound(&self, index: usize) -> Bounds3f {
        let (p0, p1, p2) = self.vertices(index);
        Bounds3f::new(p0, p1).union_point(&p2)
    }

    fn intersect_primitive(&self, index: usize, ray: &Ray) -> Option<PrimitiveHit> {
        // Moeller-Trumbore.
        let (p0, p1, p2) = self.vertices(index);
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let pvec = ray.d.cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < 1e-10 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = ray.o - p0;
        let b1 = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }
        let qvec = tvec.cross(&e1);
        let b2 = ray.d.dot(&qvec) * inv_det;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }
        let t = e2.dot(&qvec) * inv_det;
        if t < ray.t_min || t > ray.t_max {
            return None;
        }
        Some(PrimitiveHit {
            t,
            uv: Point2f::new(b1, b2),
            n: e1.cross(&e2).normalize(),
        })
    }

    fn fill_interaction(&self, hit: &HitRecord, ray: &Ray) -> SurfaceInteraction {
        let index = hit.primitive_index;
        let (p0, p1, p2) = self.vertices(index);
        let b = hit.uv;
        let p = p0 + (p1 - p0) * b.x + (p2 - p0) * b.y;
        let ng = (p1 - p0).cross(&(p2 - p0)).normalize();
        let ns = self.shading_normal(index, &b, &ng);

        // Derivatives from the UV parameterization; edge vectors when the
        // mapping is degenerate.
        let uv0 = self.texture_uv(index, &Point2f::new(0.0, 0.0));
        let uv1 = self.texture_uv(index, &Point2f::new(1.0, 0.0));
        let uv2 = self.texture_uv(index, &Point2f::new(0.0, 1.0));
        let duv1 = uv1 - uv0;
        let duv2 = uv2 - uv0;
        let det = duv1.x * duv2.y - duv1.y * duv2.x;
        let (dpdu, dpdv) = if det.abs() > 1e-10 {
            let inv = 1.0 / det;
            (
                ((p1 - p0) * duv2.y - (p2 - p0) * duv1.y) * inv,
                ((p2 - p0) * duv1.x - (p1 - p0) * duv2.x) * inv,
            )
        } else {
            (p1 - p0, p2 - p0)
        };

        let frame = Frame::from_normal_tangent(ns, dpdu);
        SurfaceInteraction {
            p,
            n: ng,
            frame,
            uv: self.texture_uv(index, &b),
            dpdu,
            dpdv,
            wo: frame.to_local(&-ray.d),
            shape_index: hit.shape_index,
            primitive_index: index,
            t: hit.t,
        }
    }

    fn area(&self) -> Float {
        self.total_area
    }

    fn sample_position(&self, u: &Point2f) -> PositionSample {
        let (index, _, u_remapped) = self.area_distribution.sample_discrete(u.x);
        let b = uniform_sample_triangle(&Point2f::new(u_remapped, u.y));
        let (p0, p1, p2) = self.vertices(index);
        let p = p0 + (p1 - p0) * b.x + (p2 - p0) * b.y;
        let ng = (p1 - p0).cross(&(p2 - p0)).normalize();
        PositionSample {
            p,
            n: self.shading_normal(index, &b, &ng),
            uv: self.texture_uv(index, &b),
            pdf: 1.0 / self.total_area,
            delta: false,
        }
    }

    fn pdf_position(&self) -> Float {
        1.0 / self.total_area
    }
}

fn triangle_area(positions: &[Point3f], tri: &[usize; 3]) -> Float {
    let e1 = positions[tri[1]] - positions[tri[0]];
    let e2 = positions[tri[2]] - positions[tri[0]];
    0.5 * e1.cross(&e2).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> TriangleMesh {
        // Unit square in the xy-plane, normal +z.
        TriangleMesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            None,
            Some(vec![
                Point2f::new(0.0, 0.0),
                Point2f::new(1.0, 0.0),
                Point2f::new(1.0, 1.0),
                Point2f::new(0.0, 1.0),
            ]),
        )
        .unwrap()
    }

    #[test]
    fn intersects_and_interpolates_uv() {
        let mesh = quad();
        let ray = Ray::new(
            Point3f::new(0.25, 0.25, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            0.0,
            INFINITY,
        );
        let hit = mesh.intersect_primitive(0, &ray).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
        let si = mesh.fill_interaction(
            &HitRecord {
                shape_index: 0,
                primitive_index: 0,
                uv: hit.uv,
                t: hit.t,
                n: hit.n,
            },
            &ray,
        );
        assert!((si.uv.x - 0.25).abs() < 1e-4);
        assert!((si.uv.y - 0.25).abs() < 1e-4);
        assert!((si.n - Vector3f::new(0.0, 0.0, 1.0)).length() < 1e-4);
        // The viewer direction in the local frame faces the upper hemisphere.
        assert!(si.wo.z > 0.99);
    }

    #[test]
    fn area_table_samples_uniformly_by_area() {
        // One large and one tiny triangle.
        let mesh = TriangleMesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(4.0, 0.0, 0.0),
                Point3f::new(0.0, 4.0, 0.0),
                Point3f::new(10.0, 0.0, 0.0),
                Point3f::new(10.2, 0.0, 0.0),
                Point3f::new(10.0, 0.2, 0.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
            None,
            None,
        )
        .unwrap();

        let mut rng = rad_core::rng::Rng::new(13);
        let draws = 50_000;
        let mut in_large = 0usize;
        for _ in 0..draws {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let ps = mesh.sample_position(&u);
            assert!((ps.pdf - 1.0 / mesh.area()).abs() < 1e-6);
            if ps.p.x < 5.0 {
                in_large += 1;
            }
        }
        let expected = 8.0 / mesh.area();
        let observed = in_large as Float / draws as Float;
        assert!(
            (observed - expected).abs() < 0.01,
            "observed {observed}, expected {expected}"
        );
    }

    #[test]
    fn rejects_inconsistent_input() {
        assert!(TriangleMesh::new(vec![Point3f::default()], vec![[0, 0, 1]], None, None).is_err());
        assert!(TriangleMesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(2.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2]],
            None,
            None,
        )
        .is_err());
    }
}

//! 2-D sampling distributions.

use super::Distribution1D;
use crate::common::*;
use crate::geometry::Point2f;

/// A piecewise-constant 2-D density over the unit square: `nv` row-wise
/// conditional distributions plus one marginal over the row sums. Importance
/// samples textured emission profiles and triangle-then-barycentric picks.
#[derive(Clone, Debug)]
pub struct Distribution2D {
    /// Conditional density p(u | v) per row.
    conditional: Vec<Distribution1D>,

    /// Marginal density p(v) over row integrals.
    marginal: Distribution1D,
}

impl Distribution2D {
    /// Build the distribution from a `nu` x `nv` grid of non-negative values
    /// in row-major order.
    ///
    /// * `values` - Function values, row-major.
    /// * `nu`     - Number of columns.
    /// * `nv`     - Number of rows.
    pub fn new(values: &[Float], nu: usize, nv: usize) -> Self {
        debug_assert_eq!(values.len(), nu * nv);
        let conditional: Vec<Distribution1D> = (0..nv)
            .map(|v| Distribution1D::new(values[v * nu..(v + 1) * nu].to_vec()))
            .collect();
        let marginal = Distribution1D::new(conditional.iter().map(|c| c.func_int).collect());
        Self { conditional, marginal }
    }

    /// Sample a point in the unit square. Returns the point and its density.
    ///
    /// * `u` - Uniform random sample.
    pub fn sample_continuous(&self, u: &Point2f) -> (Point2f, Float) {
        let (d1, pdf1, v) = self.marginal.sample_continuous(u.y);
        let (d0, pdf0, _) = self.conditional[v].sample_continuous(u.x);
        (Point2f::new(d0, d1), pdf0 * pdf1)
    }

    /// Returns the density at a point of the unit square.
    ///
    /// * `p` - The point.
    pub fn pdf(&self, p: &Point2f) -> Float {
        let nu = self.conditional[0].count();
        let nv = self.marginal.count();
        let iu = ((p.x * nu as Float) as usize).min(nu - 1);
        let iv = ((p.y * nv as Float) as usize).min(nv - 1);
        self.conditional[iv].func[iu] / self.marginal.func_int
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    #[test]
    fn pdf_integrates_to_one() {
        let values: Vec<Float> = (0..64).map(|i| 0.25 + (i % 7) as Float).collect();
        let dist = Distribution2D::new(&values, 8, 8);

        // Midpoint quadrature over the unit square.
        let n = 64;
        let mut integral = 0.0;
        for j in 0..n {
            for i in 0..n {
                let p = Point2f::new((i as Float + 0.5) / n as Float, (j as Float + 0.5) / n as Float);
                integral += dist.pdf(&p);
            }
        }
        integral /= (n * n) as Float;
        assert!((integral - 1.0).abs() < 1e-3, "integral = {integral}");
    }

    #[test]
    fn sampling_density_matches_pdf() {
        let values: Vec<Float> = (0..16).map(|i| 1.0 + i as Float).collect();
        let dist = Distribution2D::new(&values, 4, 4);
        let mut rng = Rng::new(5);
        for _ in 0..1000 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let (p, pdf) = dist.sample_continuous(&u);
            assert!((dist.pdf(&p) - pdf).abs() < 1e-3 * pdf.max(1.0));
        }
    }
}

//! 1-D sampling distributions.

use crate::common::*;

/// A piecewise-constant 1-D function's PDF and CDF, supporting O(log n)
/// inverse-transform sampling in both discrete and continuous form.
///
/// The table is immutable once built; rebuilding replaces it wholesale.
#[derive(Clone, Debug)]
pub struct Distribution1D {
    /// The piecewise-constant function values.
    pub func: Vec<Float>,

    /// Monotonic CDF over `func`, length `func.len() + 1`.
    pub cdf: Vec<Float>,

    /// Integral of `func` over [0, 1].
    pub func_int: Float,
}

impl Distribution1D {
    /// Build the distribution from non-negative weights. A zero-sum input is
    /// a caller contract violation; the renderer never constructs one.
    ///
    /// * `f` - Piecewise-constant function values.
    pub fn new(f: Vec<Float>) -> Self {
        let n = f.len();
        debug_assert!(n > 0, "empty distribution");

        let mut cdf = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for i in 1..=n {
            cdf.push(cdf[i - 1] + f[i - 1] / n as Float);
        }

        let func_int = cdf[n];
        debug_assert!(func_int > 0.0, "zero-sum distribution");
        for v in cdf.iter_mut().skip(1) {
            *v /= func_int;
        }

        Self { func: f, cdf, func_int }
    }

    /// Number of function values.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Sample the discrete distribution. Returns the chosen index, its PMF,
    /// and the variate remapped to `[0, 1)` within the chosen segment so it
    /// can be reused as an independent uniform for a further dimension.
    ///
    /// * `u` - Uniform random sample.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float, Float) {
        let offset = find_interval(self.cdf.len(), |i| self.cdf[i] <= u);
        let pdf = self.discrete_pdf(offset);
        let width = self.cdf[offset + 1] - self.cdf[offset];
        let u_remapped = if width > 0.0 {
            ((u - self.cdf[offset]) / width).min(ONE_MINUS_EPSILON)
        } else {
            0.0
        };
        (offset, pdf, u_remapped)
    }

    /// Returns the PMF of a discrete index.
    ///
    /// * `index` - The index.
    pub fn discrete_pdf(&self, index: usize) -> Float {
        debug_assert!(index < self.count());
        self.func[index] / (self.func_int * self.count() as Float)
    }

    /// Sample the piecewise-constant density over `[0, 1]`. Returns the
    /// sampled coordinate, its density, and the bracketing index.
    ///
    /// * `u` - Uniform random sample.
    pub fn sample_continuous(&self, u: Float) -> (Float, Float, usize) {
        let offset = find_interval(self.cdf.len(), |i| self.cdf[i] <= u);

        let mut du = u - self.cdf[offset];
        let width = self.cdf[offset + 1] - self.cdf[offset];
        if width > 0.0 {
            du /= width;
        }
        debug_assert!(!du.is_nan());

        let pdf = self.func[offset] / self.func_int;
        ((offset as Float + du) / self.count() as Float, pdf, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;
    use proptest::prelude::*;

    #[test]
    fn discrete_histogram_matches_pmf() {
        let dist = Distribution1D::new(vec![1.0, 2.0, 3.0, 4.0]);
        let mut rng = Rng::new(42);
        let mut counts = [0usize; 4];
        let draws = 200_000;
        for _ in 0..draws {
            let (i, pdf, u2) = dist.sample_discrete(rng.uniform_float());
            counts[i] += 1;
            assert!((0.0..1.0).contains(&u2));
            assert!(pdf > 0.0);
        }
        for (i, &c) in counts.iter().enumerate() {
            let expected = (i + 1) as Float / 10.0;
            let observed = c as Float / draws as Float;
            assert!(
                (observed - expected).abs() < 0.01,
                "bin {i}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn continuous_sample_inverts_cdf() {
        let dist = Distribution1D::new(vec![0.5, 2.0, 1.5]);
        // The CDF midpoint of the second cell maps back into that cell.
        let (x, pdf, idx) = dist.sample_continuous(0.5);
        assert_eq!(idx, 1);
        assert!((pdf - dist.func[1] / dist.func_int).abs() < 1e-6);
        assert!(x > 1.0 / 3.0 && x < 2.0 / 3.0);
    }

    proptest! {
        #[test]
        fn cdf_is_monotonic_and_normalized(weights in prop::collection::vec(0.01f32..10.0, 1..32)) {
            let dist = Distribution1D::new(weights);
            for w in dist.cdf.windows(2) {
                prop_assert!(w[1] >= w[0]);
            }
            prop_assert!((dist.cdf[dist.count()] - 1.0).abs() < 1e-4);
        }

        #[test]
        fn remapped_variate_stays_in_unit_interval(
            weights in prop::collection::vec(0.01f32..10.0, 1..32),
            u in 0.0f32..1.0,
        ) {
            let dist = Distribution1D::new(weights);
            let (i, pdf, u2) = dist.sample_discrete(u);
            prop_assert!(i < dist.count());
            prop_assert!(pdf > 0.0);
            prop_assert!((0.0..1.0).contains(&u2));
        }
    }
}

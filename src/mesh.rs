//! Meshes for integrals over unbounded domains.
//!
//! An integral over the semi-infinite domain `[0, ∞)` is mapped to one over the finite
//! proxy interval `[a, b]` by the change of variable `r = (x - a) / (b - x)`. This
//! introduces the Jacobian `dr/dx = (b - a) / (b - x)^2` into the integrand:
//!
//! `∫_0^∞ f(r) dr = ∫_a^b f(r(x)) (b - a) / (b - x)^2 dx`.
//!
//! The mesh includes the end point `x = b`, which maps to `r = ∞`. Both `r` and the
//! Jacobian are infinite there, and it falls to the caller to put a finite value in that
//! slot of the sampled integrand, usually the limit of `f(r) (b - a) / (b - x)^2` as
//! `r → ∞`. [`SemiInfiniteMesh::sample`] takes that value as an explicit argument.

use crate::error::{QuadError, Result};

#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// A linearly spaced mesh over a finite proxy interval together with its image `r` in the
/// semi-infinite physical domain and the Jacobian of the map.
///
/// Built by [`semi_infinite_mesh`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct SemiInfiniteMesh {
    x: Vec<f64>,
    r: Vec<f64>,
    jacobian: Vec<f64>,
}

/// Produces `npts` linearly spaced points over `[a, b]`, both ends included, their images
/// `r = (x - a) / (b - x)` and the Jacobian `(b - a) / (b - x)^2` at every point.
///
/// The last `r` and Jacobian values are `+∞`. They are deliberately left that way, see the
/// [module documentation](self).
///
/// # Errors
/// Returns [`QuadError::InvalidArgument`] if `npts < 2`, if `a` or `b` is not finite, if
/// `a >= b`, or if `b - a` overflows.
///
/// # Example
/// ```
/// # use spline_quad::semi_infinite_mesh;
/// let mesh = semi_infinite_mesh(5, 0.0, 1.0).unwrap();
/// assert_eq!(mesh.x(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(mesh.r()[2], 1.0);
/// assert_eq!(mesh.jacobian()[2], 4.0);
/// assert!(mesh.jacobian()[4].is_infinite());
/// ```
pub fn semi_infinite_mesh(npts: usize, a: f64, b: f64) -> Result<SemiInfiniteMesh> {
    if npts < 2 {
        return Err(QuadError::InvalidArgument(format!(
            "a mesh needs at least 2 points, got {npts}"
        )));
    }
    if !a.is_finite() || !b.is_finite() {
        return Err(QuadError::InvalidArgument(format!(
            "the proxy interval [{a}, {b}] must have finite bounds"
        )));
    }
    if a >= b {
        return Err(QuadError::InvalidArgument(format!(
            "the proxy interval [{a}, {b}] must have a < b"
        )));
    }
    if !(b - a).is_finite() {
        return Err(QuadError::InvalidArgument(format!(
            "the width of the proxy interval [{a}, {b}] overflows"
        )));
    }

    let x = linspace(a, b, npts);
    let r = x.iter().map(|&xi| (xi - a) / (b - xi)).collect();
    let jacobian = x.iter().map(|&xi| (b - a) / ((b - xi) * (b - xi))).collect();

    log::debug!("built a {npts} point semi-infinite mesh over [{a}, {b}]");

    Ok(SemiInfiniteMesh { x, r, jacobian })
}

/// `n >= 2` evenly spaced values from `start` to `end`, with both ends hit exactly.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    let mut xs: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
    xs[n - 1] = end;
    xs
}

impl SemiInfiniteMesh {
    /// The points of the proxy interval.
    #[inline]
    #[must_use = "the method returns a value and does not modify `self`"]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// The points of the physical domain, `r = (x - a) / (b - x)`. The last one is `+∞`.
    #[inline]
    #[must_use = "the method returns a value and does not modify `self`"]
    pub fn r(&self) -> &[f64] {
        &self.r
    }

    /// The Jacobian `(b - a) / (b - x)^2` at every point. The last one is `+∞`.
    #[inline]
    #[must_use = "the method returns a value and does not modify `self`"]
    pub fn jacobian(&self) -> &[f64] {
        &self.jacobian
    }

    /// Returns the number of points in the mesh.
    #[inline]
    #[must_use = "the method returns a value and does not modify `self`"]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always `false`, a mesh has at least two points.
    #[inline]
    #[must_use = "the method returns a value and does not modify `self`"]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Splits the mesh into its `(x, r, jacobian)` arrays.
    #[must_use = "the method consumes `self` and returns its parts"]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.x, self.r, self.jacobian)
    }

    /// Samples the transformed integrand `jacobian * f(r)` on the mesh, ready to be passed
    /// to [`integrate`](crate::integrate) together with [`x`](Self::x).
    ///
    /// `f` is called once for every point except the last, where `r = ∞`. That slot gets
    /// `tail` instead, which should be the limit of the transformed integrand, or zero if
    /// the integrand decays faster than `1 / r^2`.
    ///
    /// # Example
    /// Integrate `f(r) = e^(-r)` over `[0, ∞)`.
    /// ```
    /// # use spline_quad::{integrate, semi_infinite_mesh, SplineKind};
    /// # use approx::assert_abs_diff_eq;
    /// let mesh = semi_infinite_mesh(1001, 0.0, 1.0).unwrap();
    /// let ys = mesh.sample(|r| (-r).exp(), 0.0);
    /// let res = integrate(mesh.x(), &ys, SplineKind::Steffen).unwrap();
    /// assert_abs_diff_eq!(res, 1.0, epsilon = 1e-3);
    /// ```
    #[must_use = "the method returns a new sample array and does not modify `self`"]
    pub fn sample<F>(&self, mut f: F, tail: f64) -> Vec<f64>
    where
        F: FnMut(f64) -> f64,
    {
        let last = self.len() - 1;
        let mut ys: Vec<f64> = self.r[..last]
            .iter()
            .zip(self.jacobian[..last].iter())
            .map(|(&r, &jac)| jac * f(r))
            .collect();
        ys.push(tail);
        warn_on_non_finite(&ys[..last]);
        ys
    }

    /// Like [`sample`](Self::sample), but evaluates `f(lower + r)` so the mesh covers the
    /// physical domain `[lower, ∞)`.
    #[must_use = "the method returns a new sample array and does not modify `self`"]
    pub fn sample_from<F>(&self, lower: f64, mut f: F, tail: f64) -> Vec<f64>
    where
        F: FnMut(f64) -> f64,
    {
        self.sample(|r| f(lower + r), tail)
    }

    #[cfg(feature = "parallel")]
    /// Same as [`sample`](Self::sample) but evaluates the integrand in parallel.
    #[must_use = "the method returns a new sample array and does not modify `self`"]
    pub fn par_sample<F>(&self, f: F, tail: f64) -> Vec<f64>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        let last = self.len() - 1;
        let mut ys: Vec<f64> = self.r[..last]
            .par_iter()
            .zip(self.jacobian[..last].par_iter())
            .map(|(&r, &jac)| jac * f(r))
            .collect();
        ys.push(tail);
        warn_on_non_finite(&ys[..last]);
        ys
    }

    #[cfg(feature = "parallel")]
    /// Same as [`sample_from`](Self::sample_from) but evaluates the integrand in parallel.
    #[must_use = "the method returns a new sample array and does not modify `self`"]
    pub fn par_sample_from<F>(&self, lower: f64, f: F, tail: f64) -> Vec<f64>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        self.par_sample(|r| f(lower + r), tail)
    }
}

fn warn_on_non_finite(ys: &[f64]) {
    if let Some(index) = ys.iter().position(|y| !y.is_finite()) {
        log::warn!("the sampled integrand is not finite at mesh index {index}");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn check_mesh_shape_and_endpoints() {
        for npts in [2, 3, 10, 1001] {
            let mesh = semi_infinite_mesh(npts, 0.0, 1.0).unwrap();
            assert_eq!(mesh.len(), npts);
            assert_eq!(mesh.r().len(), npts);
            assert_eq!(mesh.jacobian().len(), npts);
            assert_eq!(mesh.x()[0], 0.0);
            assert_eq!(mesh.x()[npts - 1], 1.0);
            assert_eq!(mesh.r()[0], 0.0);
            assert_eq!(mesh.jacobian()[0], 1.0);
            assert_eq!(mesh.r()[npts - 1], f64::INFINITY);
            assert_eq!(mesh.jacobian()[npts - 1], f64::INFINITY);
            assert!(mesh.jacobian()[..npts - 1].iter().all(|j| j.is_finite()));
        }
    }

    #[test]
    fn check_general_proxy_interval() {
        let (a, b) = (-2.0, 3.0);
        let mesh = semi_infinite_mesh(11, a, b).unwrap();
        assert_eq!(mesh.x()[0], a);
        assert_eq!(mesh.x()[10], b);
        assert_relative_eq!(mesh.x()[5], 0.5);
        assert_relative_eq!(mesh.r()[5], 2.5 / 2.5);
        assert_relative_eq!(mesh.jacobian()[5], 5.0 / 6.25);
        assert!(mesh.r().windows(2).all(|w| w[0] < w[1]));
        assert!(mesh.jacobian()[10].is_infinite());
    }

    #[test]
    fn check_invalid_arguments() {
        for (npts, a, b) in [
            (0, 0.0, 1.0),
            (1, 0.0, 1.0),
            (10, 1.0, 1.0),
            (10, 2.0, 1.0),
            (10, f64::NAN, 1.0),
            (10, 0.0, f64::INFINITY),
            (3, -f64::MAX, f64::MAX),
        ] {
            assert!(matches!(
                semi_infinite_mesh(npts, a, b),
                Err(QuadError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn check_sampling_puts_tail_in_last_slot() {
        let mesh = semi_infinite_mesh(5, 0.0, 1.0).unwrap();
        let mut calls = 0;
        let ys = mesh.sample(
            |r| {
                calls += 1;
                r
            },
            -1.0,
        );
        assert_eq!(calls, 4);
        assert_eq!(ys.len(), 5);
        assert_eq!(ys[4], -1.0);
        // x = 0.5 gives r = 1 and jacobian = 4.
        assert_eq!(ys[2], 4.0);

        let shifted = mesh.sample_from(2.0, |r| r, 0.0);
        assert_eq!(shifted[2], 12.0);
    }

    #[test]
    fn check_into_parts() {
        let mesh = semi_infinite_mesh(3, 0.0, 1.0).unwrap();
        let (x, r, jac) = mesh.clone().into_parts();
        assert_eq!(x, mesh.x());
        assert_eq!(r, mesh.r());
        assert_eq!(jac, mesh.jacobian());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn check_parallel_sampling() {
        let mesh = semi_infinite_mesh(257, 0.0, 1.0).unwrap();
        let f = |r: f64| (-r * r).exp();
        assert_eq!(mesh.sample(f, 0.0), mesh.par_sample(f, 0.0));
        assert_eq!(
            mesh.sample_from(1.5, f, 0.0),
            mesh.par_sample_from(1.5, f, 0.0)
        );
    }
}

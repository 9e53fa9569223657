//! Piecewise cubic interpolants and their closed-form integrals.
//!
//! Every supported kind is stored the same way: on the interval `[x_i, x_{i+1}]` the
//! interpolant is `y_i + b_i t + c_i t^2 + d_i t^3` with `t = x - x_i`. Only the way the
//! coefficients are chosen differs between kinds, see [`steffen`], [`akima`] and [`cspline`].
//!
//! Nothing here validates its input, callers must hand over at least
//! [`SplineKind::min_points`] finite samples with strictly increasing x-values.

use crate::kind::SplineKind;

/// Remembers the interval of the previous lookup so that monotone sweeps over the
/// interpolant avoid repeated binary searches.
#[derive(Debug, Clone, Default)]
pub(crate) struct Accel {
    cache: usize,
    hits: usize,
    misses: usize,
}

impl Accel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the index `i` with `xs[i] <= x < xs[i + 1]`, clamped to the valid intervals.
    pub(crate) fn find(&mut self, xs: &[f64], x: f64) -> usize {
        let last_interval = xs.len() - 2;
        let i = self.cache;
        if x < xs[i] {
            self.misses += 1;
            self.cache = bsearch(&xs[..=i], x);
        } else if i < last_interval && x >= xs[i + 1] {
            self.misses += 1;
            self.cache = i + bsearch(&xs[i..], x);
        } else {
            self.hits += 1;
        }
        self.cache
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits
    }

    pub(crate) fn misses(&self) -> usize {
        self.misses
    }
}

/// Index of the interval of `xs` containing `x`, clamped to `0..=xs.len() - 2`.
fn bsearch(xs: &[f64], x: f64) -> usize {
    xs.partition_point(|&v| v <= x)
        .saturating_sub(1)
        .min(xs.len().saturating_sub(2))
}

#[cfg(test)]
thread_local! {
    static LIVE: core::cell::Cell<isize> = const { core::cell::Cell::new(0) };
    static BUILT: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

/// Number of interpolants currently alive on this thread.
#[cfg(test)]
pub(crate) fn live_interpolants() -> isize {
    LIVE.with(|c| c.get())
}

/// Number of interpolants ever built on this thread.
#[cfg(test)]
pub(crate) fn built_interpolants() -> usize {
    BUILT.with(|c| c.get())
}

/// A piecewise cubic through a set of samples.
#[derive(Debug)]
pub(crate) struct Interpolant<'a> {
    kind: SplineKind,
    xs: &'a [f64],
    ys: &'a [f64],
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl<'a> Interpolant<'a> {
    pub(crate) fn new(kind: SplineKind, xs: &'a [f64], ys: &'a [f64]) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        debug_assert!(xs.len() >= kind.min_points());

        let (b, c, d) = match kind {
            SplineKind::Steffen => steffen(xs, ys),
            SplineKind::Akima => akima(xs, ys),
            SplineKind::Cubic => cspline(xs, ys),
        };

        #[cfg(test)]
        {
            LIVE.with(|c| c.set(c.get() + 1));
            BUILT.with(|c| c.set(c.get() + 1));
        }
        log::debug!("built a {kind} interpolant through {} samples", xs.len());

        Self {
            kind,
            xs,
            ys,
            b,
            c,
            d,
        }
    }

    #[cfg(test)]
    pub(crate) fn eval(&self, x: f64, acc: &mut Accel) -> f64 {
        let i = acc.find(self.xs, x);
        let t = x - self.xs[i];
        self.ys[i] + t * (self.b[i] + t * (self.c[i] + t * self.d[i]))
    }

    /// The integral of the interpolant from `a` to `b`, with `xs[0] <= a <= b <= xs[n - 1]`.
    pub(crate) fn eval_integ(&self, a: f64, b: f64, acc: &mut Accel) -> f64 {
        debug_assert!(a <= b);
        let index_a = acc.find(self.xs, a);
        let index_b = acc.find(self.xs, b);

        let mut result = 0.0;
        for i in index_a..=index_b {
            let x_lo = self.xs[i];
            let x_hi = self.xs[i + 1];
            let t1 = if i == index_a { a - x_lo } else { 0.0 };
            let t2 = if i == index_b { b - x_lo } else { x_hi - x_lo };
            result += self.segment_integral(i, t1, t2);
        }

        log::trace!(
            "{} interpolant integrated over [{a}, {b}] with {} cache hits and {} misses",
            self.kind,
            acc.hits(),
            acc.misses()
        );
        result
    }

    /// Integral of segment `i` between the local coordinates `t1` and `t2`.
    fn segment_integral(&self, i: usize, t1: f64, t2: f64) -> f64 {
        let antiderivative = |t: f64| {
            t * (self.ys[i] + t * (self.b[i] / 2.0 + t * (self.c[i] / 3.0 + t * self.d[i] / 4.0)))
        };
        antiderivative(t2) - antiderivative(t1)
    }
}

#[cfg(test)]
impl Drop for Interpolant<'_> {
    fn drop(&mut self) {
        LIVE.with(|c| c.set(c.get() - 1));
    }
}

type Coefficients = (Vec<f64>, Vec<f64>, Vec<f64>);

/// Monotonicity preserving interpolation after M. Steffen, Astron. Astrophys. 239, 443 (1990).
/// The end slopes are the one-sided secants.
fn steffen(xs: &[f64], ys: &[f64]) -> Coefficients {
    let n = xs.len();
    let secant = |i: usize| (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]);

    let mut slopes = Vec::with_capacity(n);
    slopes.push(secant(0));
    for i in 1..n - 1 {
        let h_prev = xs[i] - xs[i - 1];
        let h = xs[i + 1] - xs[i];
        let s_prev = secant(i - 1);
        let s = secant(i);
        let p = (s_prev * h + s * h_prev) / (h_prev + h);
        // Zero at local extrema, otherwise limited so the segment cannot overshoot.
        let slope = (1.0_f64.copysign(s_prev) + 1.0_f64.copysign(s))
            * s_prev.abs().min(s.abs()).min(0.5 * p.abs());
        slopes.push(slope);
    }
    slopes.push(secant(n - 2));

    hermite_coefficients(xs, ys, &slopes)
}

/// Cubic Hermite coefficients from the slopes at every sample.
fn hermite_coefficients(xs: &[f64], ys: &[f64], slopes: &[f64]) -> Coefficients {
    let intervals = xs.len() - 1;
    let mut b = Vec::with_capacity(intervals);
    let mut c = Vec::with_capacity(intervals);
    let mut d = Vec::with_capacity(intervals);
    for i in 0..intervals {
        let h = xs[i + 1] - xs[i];
        let s = (ys[i + 1] - ys[i]) / h;
        b.push(slopes[i]);
        c.push((3.0 * s - 2.0 * slopes[i] - slopes[i + 1]) / h);
        d.push((slopes[i] + slopes[i + 1] - 2.0 * s) / (h * h));
    }
    (b, c, d)
}

/// Non-periodic Akima interpolation, H. Akima, J. ACM 17, 589 (1970).
///
/// The secants are extended by two on each side by linear extrapolation,
/// `m[-1] = 2 m[0] - m[1]` and so on, so the end intervals use the same formula.
fn akima(xs: &[f64], ys: &[f64]) -> Coefficients {
    let n = xs.len();
    let intervals = n - 1;

    // m[k + 2] holds the secant of interval k.
    let mut m = vec![0.0; intervals + 4];
    for k in 0..intervals {
        m[k + 2] = (ys[k + 1] - ys[k]) / (xs[k + 1] - xs[k]);
    }
    m[1] = 2.0 * m[2] - m[3];
    m[0] = 3.0 * m[2] - 2.0 * m[3];
    m[intervals + 2] = 2.0 * m[intervals + 1] - m[intervals];
    m[intervals + 3] = 3.0 * m[intervals + 1] - 2.0 * m[intervals];

    let mut b = Vec::with_capacity(intervals);
    let mut c = Vec::with_capacity(intervals);
    let mut d = Vec::with_capacity(intervals);
    for i in 0..intervals {
        // m_i is the secant of interval i.
        let (m_m2, m_m1, m_i, m_p1, m_p2) = (m[i], m[i + 1], m[i + 2], m[i + 3], m[i + 4]);
        let ne = (m_p1 - m_i).abs() + (m_m1 - m_m2).abs();
        if ne == 0.0 {
            b.push(m_i);
            c.push(0.0);
            d.push(0.0);
            continue;
        }
        let h = xs[i + 1] - xs[i];
        let ne_next = (m_p2 - m_p1).abs() + (m_i - m_m1).abs();
        let alpha = (m_m1 - m_m2).abs() / ne;
        let slope_next = if ne_next == 0.0 {
            m_i
        } else {
            let alpha_next = (m_i - m_m1).abs() / ne_next;
            (1.0 - alpha_next) * m_i + alpha_next * m_p1
        };
        let slope = (1.0 - alpha) * m_m1 + alpha * m_i;
        b.push(slope);
        c.push((3.0 * m_i - 2.0 * slope - slope_next) / h);
        d.push((slope + slope_next - 2.0 * m_i) / (h * h));
    }
    (b, c, d)
}

/// Natural cubic spline, the second derivative vanishes at both ends.
fn cspline(xs: &[f64], ys: &[f64]) -> Coefficients {
    let n = xs.len();
    let intervals = n - 1;
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let secants: Vec<f64> = (0..intervals).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    // c holds half the second derivative at every sample, c[0] = c[n - 1] = 0.
    // The interior values solve a symmetric, diagonally dominant tridiagonal system.
    let mut c = vec![0.0; n];
    let unknowns = n - 2;
    let mut diag = Vec::with_capacity(unknowns);
    let mut rhs = Vec::with_capacity(unknowns);
    for i in 1..n - 1 {
        diag.push(2.0 * (h[i - 1] + h[i]));
        rhs.push(3.0 * (secants[i] - secants[i - 1]));
    }
    // Thomas algorithm, off-diagonal entry between unknowns k and k + 1 is h[k + 1].
    for k in 1..unknowns {
        let w = h[k] / diag[k - 1];
        diag[k] -= w * h[k];
        rhs[k] -= w * rhs[k - 1];
    }
    for k in (0..unknowns).rev() {
        let upper = if k + 1 < unknowns { h[k + 1] * c[k + 2] } else { 0.0 };
        c[k + 1] = (rhs[k] - upper) / diag[k];
    }

    let mut b = Vec::with_capacity(intervals);
    let mut d = Vec::with_capacity(intervals);
    for i in 0..intervals {
        b.push(secants[i] - h[i] * (2.0 * c[i] + c[i + 1]) / 3.0);
        d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
    }
    c.truncate(intervals);
    (b, c, d)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn grid(n: usize, start: f64, end: f64) -> Vec<f64> {
        (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn check_accel_finds_intervals() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let mut acc = Accel::new();
        assert_eq!(acc.find(&xs, 0.0), 0);
        assert_eq!(acc.find(&xs, 0.5), 0);
        assert_eq!(acc.find(&xs, 2.5), 2);
        assert_eq!(acc.find(&xs, 2.7), 2);
        assert_eq!(acc.find(&xs, 1.0), 1);
        assert_eq!(acc.find(&xs, 4.0), 3);
        assert_eq!(acc.find(&xs, 3.0), 3);
        assert_eq!(acc.hits(), 4);
        assert_eq!(acc.misses(), 3);
    }

    #[test]
    fn check_interpolation_through_samples() {
        let xs = grid(9, 0.0, 2.0);
        let ys: Vec<f64> = xs.iter().map(|x: &f64| x.sin() + 0.3 * x).collect();
        for kind in SplineKind::ALL {
            let interp = Interpolant::new(kind, &xs, &ys);
            let mut acc = Accel::new();
            for (x, y) in xs.iter().zip(&ys) {
                assert_relative_eq!(interp.eval(*x, &mut acc), *y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn check_continuity_at_knots() {
        let xs = [0.0, 0.3, 1.0, 1.1, 2.5, 3.0];
        let ys = [1.0, -2.0, 0.5, 0.7, 4.0, 3.0];
        for kind in SplineKind::ALL {
            let interp = Interpolant::new(kind, &xs, &ys);
            let mut acc = Accel::new();
            for i in 1..xs.len() - 1 {
                // Value of the segment to the left of the knot at the knot itself.
                let t = xs[i] - xs[i - 1];
                let left = ys[i - 1]
                    + t * (interp.b[i - 1] + t * (interp.c[i - 1] + t * interp.d[i - 1]));
                assert_relative_eq!(left, interp.eval(xs[i], &mut acc), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn check_linear_data_is_reproduced() {
        let xs = [0.0, 0.5, 1.5, 2.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x - 1.0).collect();
        for kind in SplineKind::ALL {
            let interp = Interpolant::new(kind, &xs, &ys);
            let mut acc = Accel::new();
            assert_relative_eq!(interp.eval(1.0, &mut acc), 2.0, epsilon = 1e-12);
            assert_relative_eq!(interp.eval(3.0, &mut acc), 8.0, epsilon = 1e-12);
            // 1.5 * x^2 - x from 0 to 4
            assert_relative_eq!(interp.eval_integ(0.0, 4.0, &mut acc), 20.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn check_natural_spline_through_three_points() {
        // Natural spline through (0,0), (1,1), (2,0): c at the middle knot solves
        // 4 c = 3 (-1 - 1), so c = -1.5 and the integral is 1.25.
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 0.0];
        let interp = Interpolant::new(SplineKind::Cubic, &xs, &ys);
        let mut acc = Accel::new();
        assert_relative_eq!(interp.c[1], -1.5, epsilon = 1e-14);
        assert_relative_eq!(interp.eval_integ(0.0, 2.0, &mut acc), 1.25, epsilon = 1e-14);
        assert_relative_eq!(interp.eval(0.5, &mut acc), interp.eval(1.5, &mut acc));
    }

    #[test]
    fn check_steffen_is_monotone() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.0, 0.1, 0.2, 5.0, 5.1, 5.2];
        let interp = Interpolant::new(SplineKind::Steffen, &xs, &ys);
        let mut acc = Accel::new();
        let fine = grid(501, 0.0, 5.0);
        let values: Vec<f64> = fine.iter().map(|&x| interp.eval(x, &mut acc)).collect();
        assert!(values.windows(2).all(|w| w[1] >= w[0] - 1e-12));
        assert!(values.iter().all(|&v| (-1e-12..=5.2 + 1e-12).contains(&v)));
    }

    #[test]
    fn check_partial_integrals_add_up() {
        let xs = grid(21, 0.0, 1.0);
        let ys: Vec<f64> = xs.iter().map(|x| (3.0 * x).cos()).collect();
        for kind in SplineKind::ALL {
            let interp = Interpolant::new(kind, &xs, &ys);
            let mut acc = Accel::new();
            let whole = interp.eval_integ(0.0, 1.0, &mut acc);
            let left = interp.eval_integ(0.0, 0.37, &mut acc);
            let right = interp.eval_integ(0.37, 1.0, &mut acc);
            assert_relative_eq!(whole, left + right, epsilon = 1e-12);
            assert_abs_diff_eq!(whole, 3.0_f64.sin() / 3.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn check_drop_releases_interpolant() {
        let before = live_interpolants();
        {
            let xs = [0.0, 1.0, 2.0];
            let ys = [1.0, 1.0, 1.0];
            let _interp = Interpolant::new(SplineKind::Akima, &xs, &ys);
            assert_eq!(live_interpolants(), before + 1);
        }
        assert_eq!(live_interpolants(), before);
    }
}

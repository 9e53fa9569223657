use crate::error::{QuadError, Result, SampleDefect};
use crate::interp::{Accel, Interpolant};
use crate::kind::SplineKind;
use crate::mesh::semi_infinite_mesh;

/// Integrates the tabulated function given by `xs` and `ys` from `xs[0]` to the last
/// x-value. The samples are joined by a spline of the given `kind`, which is then
/// integrated exactly, piece by piece.
///
/// # Errors
/// Checked in this order, before any interpolant is built:
/// - [`QuadError::DimensionMismatch`] if `xs` and `ys` have different lengths.
/// - [`QuadError::InvalidSamples`] if there are fewer than [`SplineKind::min_points`]
///   samples, if any sample is NaN or infinite, or if `xs` is not strictly increasing.
/// - [`QuadError::InvalidSamples`] if the samples are finite but their integral is not.
///
/// # Example
/// ```
/// # use spline_quad::{integrate, SplineKind};
/// # use approx::assert_relative_eq;
/// let xs: Vec<f64> = (0..=100).map(|i| i as f64 / 100.0).collect();
/// let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
/// for kind in SplineKind::ALL {
///     assert_relative_eq!(integrate(&xs, &ys, kind).unwrap(), 1.0 / 3.0, epsilon = 1e-5);
/// }
/// ```
pub fn integrate(xs: &[f64], ys: &[f64], kind: SplineKind) -> Result<f64> {
    validate(xs, ys, kind)?;

    let m = xs.len();
    let interp = Interpolant::new(kind, xs, ys);
    let mut acc = Accel::new();
    let integral = interp.eval_integ(xs[0], xs[m - 1], &mut acc);
    if !integral.is_finite() {
        return Err(SampleDefect::IntegralOverflow.into());
    }

    log::debug!(
        "{kind} spline integral over [{}, {}] is {integral}",
        xs[0],
        xs[m - 1]
    );
    Ok(integral)
}

/// [`integrate`] with the default [`SplineKind::Steffen`] interpolant.
///
/// # Errors
/// Fails exactly like [`integrate`] with [`SplineKind::Steffen`].
pub fn integrate_default(xs: &[f64], ys: &[f64]) -> Result<f64> {
    integrate(xs, ys, SplineKind::default())
}

/// [`integrate`] with the spline kind given by name: `"steffen"`, `"akima"` or `"cubic"`.
///
/// # Errors
/// Fails with [`QuadError::DimensionMismatch`] first if the lengths differ, then with
/// [`QuadError::UnsupportedKind`] if the name is not recognized. After that it fails
/// like [`integrate`].
///
/// # Example
/// ```
/// # use spline_quad::{integrate_with_name, QuadError};
/// let xs = [0.0, 1.0, 2.0];
/// let ys = [1.0, 1.0, 1.0];
/// assert_eq!(integrate_with_name(&xs, &ys, "akima"), Ok(2.0));
/// assert!(matches!(
///     integrate_with_name(&xs, &ys, "linear"),
///     Err(QuadError::UnsupportedKind(_))
/// ));
/// ```
pub fn integrate_with_name(xs: &[f64], ys: &[f64], name: &str) -> Result<f64> {
    check_dimensions(xs, ys)?;
    let kind: SplineKind = name.parse()?;
    integrate(xs, ys, kind)
}

/// Integrates `f` over `[lower, ∞)` using an `npts` point mesh of the proxy interval
/// `[0, 1]`, see [`SemiInfiniteMesh`](crate::SemiInfiniteMesh).
///
/// `tail` is used as the value of the transformed integrand at the point that maps to
/// infinity. For integrands decaying faster than `1 / r^2` it is zero.
///
/// # Errors
/// [`QuadError::InvalidArgument`] if `npts < 2`, and whatever [`integrate`] reports for
/// the sampled integrand, such as [`QuadError::InvalidSamples`] if `f` is not finite on
/// the mesh or `npts` is below what `kind` needs.
///
/// # Example
/// ```
/// # use spline_quad::{integrate_semi_infinite, SplineKind};
/// # use approx::assert_abs_diff_eq;
/// // ∫_1^∞ e^(-r) dr = 1/e
/// let res = integrate_semi_infinite(|r| (-r).exp(), 1.0, 2001, SplineKind::Akima, 0.0).unwrap();
/// assert_abs_diff_eq!(res, (-1.0_f64).exp(), epsilon = 1e-4);
/// ```
pub fn integrate_semi_infinite<F>(
    f: F,
    lower: f64,
    npts: usize,
    kind: SplineKind,
    tail: f64,
) -> Result<f64>
where
    F: FnMut(f64) -> f64,
{
    let mesh = semi_infinite_mesh(npts, 0.0, 1.0)?;
    let ys = mesh.sample_from(lower, f, tail);
    integrate(mesh.x(), &ys, kind)
}

#[cfg(feature = "parallel")]
/// Same as [`integrate_semi_infinite`] but samples the integrand in parallel.
pub fn par_integrate_semi_infinite<F>(
    f: F,
    lower: f64,
    npts: usize,
    kind: SplineKind,
    tail: f64,
) -> Result<f64>
where
    F: Fn(f64) -> f64 + Sync,
{
    let mesh = semi_infinite_mesh(npts, 0.0, 1.0)?;
    let ys = mesh.par_sample_from(lower, f, tail);
    integrate(mesh.x(), &ys, kind)
}

/// Integrates `f` over the whole real line as the sum of the integrals of `f(r)` and
/// `f(-r)` over `[0, ∞)`. `tails` holds the values used at `+∞` and `-∞`, in that order.
///
/// # Errors
/// [`QuadError::InvalidArgument`] if `npts < 2`. Otherwise it fails like [`integrate`] on
/// either half, for example with [`QuadError::InvalidSamples`] if `f` is not finite on
/// the mesh or `npts` is below what `kind` needs.
///
/// # Example
/// ```
/// # use spline_quad::{integrate_infinite, SplineKind};
/// # use approx::assert_abs_diff_eq;
/// let res = integrate_infinite(|r| (-r * r).exp(), 2001, SplineKind::Cubic, (0.0, 0.0)).unwrap();
/// assert_abs_diff_eq!(res, core::f64::consts::PI.sqrt(), epsilon = 1e-4);
/// ```
pub fn integrate_infinite<F>(
    mut f: F,
    npts: usize,
    kind: SplineKind,
    tails: (f64, f64),
) -> Result<f64>
where
    F: FnMut(f64) -> f64,
{
    let mesh = semi_infinite_mesh(npts, 0.0, 1.0)?;
    let right = mesh.sample(&mut f, tails.0);
    let left = mesh.sample(|r| f(-r), tails.1);
    Ok(integrate(mesh.x(), &right, kind)? + integrate(mesh.x(), &left, kind)?)
}

fn check_dimensions(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(QuadError::DimensionMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    Ok(())
}

fn validate(xs: &[f64], ys: &[f64], kind: SplineKind) -> Result<()> {
    check_dimensions(xs, ys)?;

    let required = kind.min_points();
    if xs.len() < required {
        return Err(SampleDefect::TooFew {
            kind,
            required,
            found: xs.len(),
        }
        .into());
    }

    if let Some(index) = xs
        .iter()
        .zip(ys)
        .position(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(SampleDefect::NonFinite { index }.into());
    }

    if let Some(index) = xs.windows(2).position(|w| w[0] >= w[1]) {
        return Err(SampleDefect::NotStrictlyIncreasing { index: index + 1 }.into());
    }

    Ok(())
}

//! Integration of tabulated functions by fitting a spline through the samples and
//! integrating the spline exactly.
//!
//! Three kinds of spline are available through [`SplineKind`]: the monotonicity preserving
//! Steffen spline (the default), the Akima spline and the natural cubic spline.
//!
//! Splines only cover finite domains. An integral over `[0, ∞)` is first mapped to the
//! finite proxy interval `[a, b]` with the change of variable `r = (x - a) / (b - x)`, and
//! the integrand is multiplied by the Jacobian of that map. [`semi_infinite_mesh`] builds
//! the mesh in `x`, the corresponding `r` and the Jacobian in one go.
//!
//! # Example
//! Integrate `e^(-r)` from 0 to ∞:
//! ```
//! # use spline_quad::{integrate, semi_infinite_mesh, SplineKind};
//! # use approx::assert_abs_diff_eq;
//! let mesh = semi_infinite_mesh(1001, 0.0, 1.0)?;
//! let mut ys: Vec<f64> = mesh
//!     .r()
//!     .iter()
//!     .zip(mesh.jacobian())
//!     .map(|(r, jac)| jac * (-r).exp())
//!     .collect();
//! // The last point maps to r = ∞, where the transformed integrand goes to zero.
//! *ys.last_mut().unwrap() = 0.0;
//!
//! for kind in SplineKind::ALL {
//!     assert_abs_diff_eq!(integrate(mesh.x(), &ys, kind)?, 1.0, epsilon = 1e-3);
//! }
//! # Ok::<(), spline_quad::QuadError>(())
//! ```
//!
//! # Features
//! - `parallel`: enables the `par_*` routines, which evaluate the integrand on the mesh in
//!   parallel with [`rayon`](https://docs.rs/rayon).
//! - `serde_support`: implements `Serialize` and `Deserialize` for [`SplineKind`] and
//!   [`SemiInfiniteMesh`].

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod interp;
mod kind;
mod mesh;
mod quad;

pub use error::{QuadError, Result, SampleDefect};
pub use kind::SplineKind;
pub use mesh::{semi_infinite_mesh, SemiInfiniteMesh};
#[cfg(feature = "parallel")]
pub use quad::par_integrate_semi_infinite;
pub use quad::{
    integrate, integrate_default, integrate_infinite, integrate_semi_infinite,
    integrate_with_name,
};

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn check_kinds_agree_on_smooth_integrands() {
        // ∫_0^∞ r^2 e^(-r) dr = 2
        let mesh = semi_infinite_mesh(2001, 0.0, 1.0).unwrap();
        let ys = mesh.sample(|r| r * r * (-r).exp(), 0.0);
        let results: Vec<f64> = SplineKind::ALL
            .iter()
            .map(|&kind| integrate(mesh.x(), &ys, kind).unwrap())
            .collect();
        for res in &results {
            assert_abs_diff_eq!(*res, 2.0, epsilon = 1e-3);
        }
        assert_abs_diff_eq!(results[0], results[1], epsilon = 1e-3);
        assert_abs_diff_eq!(results[1], results[2], epsilon = 1e-3);
    }

    #[test]
    fn check_other_proxy_interval() {
        // With [a, b] = [0, 2] the map is r = x / (2 - x), still covering [0, ∞).
        let mesh = semi_infinite_mesh(2001, 0.0, 2.0).unwrap();
        let ys = mesh.sample(|r| (-r).exp(), 0.0);
        let res = integrate(mesh.x(), &ys, SplineKind::Steffen).unwrap();
        assert_abs_diff_eq!(res, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn check_finite_domain() {
        let xs: Vec<f64> = (0..=200)
            .map(|i| core::f64::consts::PI * i as f64 / 200.0)
            .collect();
        let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
        for kind in SplineKind::ALL {
            assert_abs_diff_eq!(integrate(&xs, &ys, kind).unwrap(), 2.0, epsilon = 1e-4);
        }
    }
}

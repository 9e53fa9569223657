//! Integrates `exp(-r)` from 0 to ∞ with every spline kind.

use spline_quad::{integrate, semi_infinite_mesh, SplineKind};

fn main() -> Result<(), spline_quad::QuadError> {
    const NPTS: usize = 1001;
    let (low, high) = (0.0, 1.0);

    let mesh = semi_infinite_mesh(NPTS, low, high)?;
    let ys = mesh.sample(|r| (-r).exp(), 0.0);

    println!("Integrating exp(-r) from 0 to ∞.");
    for kind in SplineKind::ALL {
        let res = integrate(mesh.x(), &ys, kind)?;
        println!("Using {kind} splines: {res:.10}");
    }
    Ok(())
}

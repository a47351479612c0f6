//! Classic explicit Runge-Kutta 4 (RK4) fixed-step integrator.

use crate::{Float, ODE, Trajectory};

/// Number of samples a trajectory over `[0, tmax)` with step `dt` holds,
/// `floor(tmax / dt)`. Non-finite or non-positive ratios give zero; ratios beyond
/// `usize::MAX` saturate to `usize::MAX`, which no trajectory can hold.
#[inline]
pub fn sample_count(dt: Float, tmax: Float) -> usize {
    let n = (tmax / dt).floor();
    if n.is_finite() && n > 0.0 { n as usize } else { 0 }
}

/// Classical explicit Runge-Kutta 4 (RK4) fixed-step integrator.
///
/// Integrates `f` from `t = 0` with initial state `y0` and records the state before
/// every step, producing `floor(tmax / dt)` samples. The trailing partial interval
/// shorter than `dt` is never evaluated.
///
/// Preconditions, not checked here: `dt > 0`, `tmax > 0`, `y0` is non-empty and
/// `f` reads and writes exactly `y0.len()` values, and `(y0.len() + 1) * sample_count`
/// fits in one allocation. Use [`crate::integrate()`] for a validating entry point.
///
/// # Panics
/// If the trajectory size overflows `usize`.
pub fn solve<F>(f: &F, y0: &[Float], dt: Float, tmax: Float) -> Trajectory
where
    F: ODE + ?Sized,
{
    debug_assert!(dt > 0.0, "dt must be positive");
    debug_assert!(tmax > 0.0, "tmax must be positive");

    // --- Declarations ---
    let n = y0.len();
    let nsamples = sample_count(dt, tmax);
    let mut out = Trajectory::allocate(n, nsamples);
    let mut y = y0.to_vec();
    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut yt = vec![0.0; n];
    let mut nfev = 0;

    // --- Main integration loop ---
    for k in 0..nsamples {
        let t = k as Float * dt;
        out.record(k, t, &y);

        // Stage computations
        f.ode(t, &y, &mut k1);

        for i in 0..n {
            yt[i] = y[i] + dt * A21 * k1[i];
        }
        f.ode(t + C2 * dt, &yt, &mut k2);

        for i in 0..n {
            yt[i] = y[i] + dt * A32 * k2[i];
        }
        f.ode(t + C3 * dt, &yt, &mut k3);

        for i in 0..n {
            yt[i] = y[i] + dt * A43 * k3[i];
        }
        f.ode(t + C4 * dt, &yt, &mut k4);

        // Update state
        for i in 0..n {
            y[i] += dt * (B1 * k1[i] + B2 * k2[i] + B3 * k3[i] + B4 * k4[i]);
        }

        nfev += 4;
    }

    out.set_nfev(nfev);
    out
}

// Classical RK4 coefficients
const C2: Float = 0.5;
const C3: Float = 0.5;
const C4: Float = 1.0;
const A21: Float = 0.5;
const A32: Float = 0.5;
const A43: Float = 1.0;
const B1: Float = 1.0 / 6.0;
const B2: Float = 1.0 / 3.0;
const B3: Float = 1.0 / 3.0;
const B4: Float = 1.0 / 6.0;

//! Validating entry points in front of the stepping engine.
//!
//! Everything the engine assumes is checked here, once, before the first step:
//! the initial vector, `dt`, `tmax`, the sample budget and the derivative's output
//! dimension.

use bon::Builder;

use crate::{DerivativeFn, Error, Float, ODE, Trajectory, rk4};

#[derive(Builder, Clone, Debug)]
/// Step parameters for [`integrate`] and [`integrate_ode`].
pub struct Options {
    /// Fixed step size. Must be finite and positive.
    pub dt: Float,
    /// Integration horizon; samples cover `[0, tmax)`. Must be finite and positive.
    pub tmax: Float,
    /// Upper bound on `floor(tmax / dt)`. The solve blocks until every sample is
    /// computed, so this is the only way to bound its runtime up front.
    pub max_samples: Option<usize>,
}

/// Integrate a value-returning derivative `fun(t, y) -> dydt` from `t = 0`.
///
/// `fun` is evaluated once at `(0, y0)` before the solve to check that it returns
/// `y0.len()` values. A length change later on is still caught and reported as
/// [`Error::DimensionMismatch`].
pub fn integrate<F, R>(fun: F, y0: &[Float], options: Options) -> Result<Trajectory, Error>
where
    F: Fn(Float, &[Float]) -> R,
    R: AsRef<[Float]>,
{
    let nsamples = validate(y0, &options)?;

    let first = fun(0.0, y0);
    let actual = first.as_ref().len();
    if actual != y0.len() {
        return Err(Error::DimensionMismatch {
            expected: y0.len(),
            actual,
        });
    }

    let f = DerivativeFn::new(fun);
    let sol = run(&f, y0, &options, nsamples);
    f.check()?;
    Ok(sol)
}

/// Integrate an [`ODE`] implementation from `t = 0` after validating the inputs.
pub fn integrate_ode<F>(f: &F, y0: &[Float], options: Options) -> Result<Trajectory, Error>
where
    F: ODE + ?Sized,
{
    let nsamples = validate(y0, &options)?;
    Ok(run(f, y0, &options, nsamples))
}

fn run<F>(f: &F, y0: &[Float], options: &Options, nsamples: usize) -> Trajectory
where
    F: ODE + ?Sized,
{
    log::debug!(
        "rk4 solve: dim={} dt={} tmax={} samples={}",
        y0.len(),
        options.dt,
        options.tmax,
        nsamples
    );
    let sol = rk4::solve(f, y0, options.dt, options.tmax);
    log::debug!("rk4 solve finished: nfev={}", sol.nfev());
    sol
}

/// Check everything the engine takes for granted; returns the sample count.
pub(crate) fn validate(y0: &[Float], options: &Options) -> Result<usize, Error> {
    if y0.is_empty() {
        return Err(Error::bad_initial("initial state must have at least one component"));
    }
    if let Some(i) = y0.iter().position(|v| !v.is_finite()) {
        return Err(Error::bad_initial(format!(
            "component {i} is not finite ({})",
            y0[i]
        )));
    }
    if !(options.dt.is_finite() && options.dt > 0.0) {
        return Err(Error::BadStepSize(options.dt));
    }
    if !(options.tmax.is_finite() && options.tmax > 0.0) {
        return Err(Error::BadHorizon(options.tmax));
    }

    // The engine allocates all rows in one block, which must stay addressable.
    let requested = rk4::sample_count(options.dt, options.tmax);
    let capacity = MAX_BLOCK / (y0.len() + 1);
    let limit = options.max_samples.map_or(capacity, |m| m.min(capacity));
    if requested > limit {
        return Err(Error::TooManySamples { requested, limit });
    }
    Ok(requested)
}

/// Largest number of samples a single trajectory block can hold.
const MAX_BLOCK: usize = isize::MAX as usize / std::mem::size_of::<Float>();

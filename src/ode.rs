//! User-supplied ODE system and the value-returning adapter.

use std::cell::Cell;

use crate::{Error, Float};

/// User-supplied ODE system.
///
/// Implement this trait for your problem to provide the right-hand side
/// function y' = f(t, y). The stepping engine calls `ode` exactly once per RK4
/// stage with the stage time `t` and state `y`, and expects you to fill `dydt`
/// with the derivative values. `y` and `dydt` always have the dimension of the
/// initial state, and neither may be retained past the call.
///
/// # Example
///
/// ```ignore
/// struct Lorenz { sigma: f64, rho: f64, beta: f64 }
/// impl ODE for Lorenz {
///     fn ode(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
///         dydt[0] = self.sigma * (y[1] - y[0]);
///         dydt[1] = y[0] * (self.rho - y[2]) - y[1];
///         dydt[2] = y[0] * y[1] - self.beta * y[2];
///     }
/// }
/// ```
pub trait ODE {
    fn ode(&self, t: Float, y: &[Float], dydt: &mut [Float]);
}

impl<T: ODE + ?Sized> ODE for &T {
    #[inline]
    fn ode(&self, t: Float, y: &[Float], dydt: &mut [Float]) {
        (**self).ode(t, y, dydt)
    }
}

/// Adapts a value-returning function `fun(t, y) -> dydt` to [`ODE`].
///
/// Each call copies exactly `dydt.len()` values out of the returned vector. When
/// the returned length differs, the out slot is filled with NaN and the mismatch
/// is kept so the boundary can report it via [`DerivativeFn::check`] once the
/// solve has returned.
///
/// Returning a fixed-size array (`[f64; N]`) keeps the per-stage path free of
/// allocation.
pub struct DerivativeFn<F> {
    fun: F,
    mismatch: Cell<Option<(usize, usize)>>,
}

impl<F, R> DerivativeFn<F>
where
    F: Fn(Float, &[Float]) -> R,
    R: AsRef<[Float]>,
{
    pub fn new(fun: F) -> Self {
        Self {
            fun,
            mismatch: Cell::new(None),
        }
    }

    /// First dimension mismatch seen by this adapter, if any.
    pub fn check(&self) -> Result<(), Error> {
        match self.mismatch.get() {
            Some((expected, actual)) => Err(Error::DimensionMismatch { expected, actual }),
            None => Ok(()),
        }
    }
}

impl<F, R> ODE for DerivativeFn<F>
where
    F: Fn(Float, &[Float]) -> R,
    R: AsRef<[Float]>,
{
    #[inline]
    fn ode(&self, t: Float, y: &[Float], dydt: &mut [Float]) {
        let result = (self.fun)(t, y);
        let values = result.as_ref();
        if values.len() == dydt.len() {
            dydt.copy_from_slice(values);
        } else {
            if self.mismatch.get().is_none() {
                self.mismatch.set(Some((dydt.len(), values.len())));
            }
            dydt.fill(Float::NAN);
        }
    }
}

//! A fixed-step classical Runge-Kutta 4 (RK4) integrator for systems of ordinary
//! differential equations.
//!
//! Unlike adaptive solvers that hand back a final state, [`solve`] returns the whole
//! discretized trajectory: a time row followed by one row per state component, sampled
//! every `dt` from `t = 0` up to (but excluding) `tmax`.
//!
//! The crate is layered:
//! - [`rk4`]: the stepping engine. Precondition-based, no validation in the hot loop.
//! - [`Trajectory`]: the owned sample buffer handed to the caller.
//! - [`integrate`](mod@integrate): the validating boundary used by friendly callers.
//! - [`capi`]: a C ABI (`rk4_solve` / `rk4_dealloc`) for foreign callers.
//! - `python` (feature `python`): a `rk4lib` extension module.
//!
//! # Example
//!
//! ```rust
//! use rk4_kernel::prelude::*;
//!
//! let opts = Options::builder().dt(1e-3).tmax(1.0).build();
//! let sol = integrate(|_t, y: &[f64]| [-0.1 * y[0]], &[100.0], opts).unwrap();
//! assert_eq!(sol.n_rows(), 2);
//! assert_eq!(sol.len(), 1000);
//! ```

mod error;
mod ode;
mod trajectory;

pub mod capi;
pub mod integrate;
pub mod prelude;
pub mod rk4;

#[cfg(feature = "python")]
mod python;

pub use error::Error;
pub use integrate::{Options, integrate, integrate_ode};
pub use ode::{DerivativeFn, ODE};
pub use rk4::{sample_count, solve};
pub use trajectory::{Rows, Trajectory};

/// Floating point type used throughout the crate. Fixed to `f64` because the C ABI
/// exchanges `double`.
pub type Float = f64;

//! Convenient prelude: import the most commonly used traits, types, and functions.
//!
//! Bring this into scope with:
//!
//! ```rust
//! use rk4_kernel::prelude::*;
//! ```
//!
//! Re-exports included:
//! - Core trait and adapter: `ODE`, `DerivativeFn`.
//! - Buffer: `Trajectory`.
//! - Engine: `solve`, `sample_count`.
//! - Validating API: `integrate`, `integrate_ode`, `Options`, `Error`.

pub use crate::{
    DerivativeFn, Error, Float, ODE, Options, Trajectory, integrate, integrate_ode, sample_count,
    solve,
};

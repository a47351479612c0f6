//! C ABI for foreign callers.
//!
//! ```c
//! typedef void (*rk4_derivative)(double t, const double* y, double* dydt);
//!
//! double** rk4_solve(rk4_derivative f, const double* y0, double dt, double tmax, int d);
//! void     rk4_dealloc(double** ptr, int d);
//! long     rk4_sample_count(double dt, double tmax);
//! uint32_t rk4_abi_version(void);
//! ```
//!
//! `rk4_solve` returns a table of `d + 1` row pointers, each row holding
//! `rk4_sample_count(dt, tmax)` doubles; row 0 is time. The table owns its rows and
//! must be handed back to `rk4_dealloc` exactly once. Reading a row after that, or
//! releasing the same table twice, is undefined behaviour.
//!
//! The table is allocated with one extra trailing slot (index `d + 1`) that the
//! library uses to find the allocation again; callers must not touch it.

use std::os::raw::{c_double, c_int, c_long};

use crate::{Float, ODE, Trajectory, rk4};

/// C ABI version. Bumped on any change to the signatures or table layout.
pub const ABI_VERSION: u32 = 1;

/// Derivative callback as seen from C: writes `d` values into `dydt`.
pub type DerivativeCallback =
    unsafe extern "C" fn(t: c_double, y: *const c_double, dydt: *mut c_double);

/// Adapts a C callback to [`ODE`].
struct CDerivative {
    f: DerivativeCallback,
}

impl ODE for CDerivative {
    #[inline]
    fn ode(&self, t: Float, y: &[Float], dydt: &mut [Float]) {
        // SAFETY: both slices hold exactly `d` values, which is what the callback
        // is required to read and write.
        unsafe { (self.f)(t, y.as_ptr(), dydt.as_mut_ptr()) }
    }
}

/// Backing storage of a table returned by [`rk4_solve`].
struct RowTable {
    /// Row-major samples; the row pointers point into this block.
    _data: Vec<Float>,
    /// `d + 1` row pointers followed by the pointer to this `RowTable`.
    rows: Vec<*mut Float>,
}

/// Hand a trajectory over to a foreign caller as a `double**` row table.
fn into_row_table(traj: Trajectory) -> *mut *mut Float {
    let len = traj.len();
    let nrows = traj.n_rows();
    let mut data = traj.into_data();

    let base = data.as_mut_ptr();
    let mut rows = Vec::with_capacity(nrows + 1);
    rows.extend((0..nrows).map(|i| base.wrapping_add(i * len)));

    let owner = Box::into_raw(Box::new(RowTable { _data: data, rows }));
    // SAFETY: `owner` was just created from a live box. Pushing stays within the
    // reserved capacity, so the table does not move.
    unsafe {
        (*owner).rows.push(owner.cast());
        (*owner).rows.as_mut_ptr()
    }
}

/// Integrate `f` from `t = 0` and return the trajectory as `d + 1` rows.
///
/// # Safety
/// - `f` must read `d` values from `y` and write `d` values to `dydt`.
/// - `y0` must point to `d` readable doubles, `d >= 1`.
/// - `dt > 0` and `tmax > 0`.
/// - The result must be released with [`rk4_dealloc`] exactly once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rk4_solve(
    f: DerivativeCallback,
    y0: *const c_double,
    dt: c_double,
    tmax: c_double,
    d: c_int,
) -> *mut *mut c_double {
    debug_assert!(!y0.is_null() && d >= 1);
    log::trace!("rk4_solve: d={d} dt={dt} tmax={tmax}");

    // SAFETY: caller guarantees `y0` points to `d` doubles.
    let y0 = unsafe { std::slice::from_raw_parts(y0, d as usize) };
    let traj = rk4::solve(&CDerivative { f }, y0, dt, tmax);
    into_row_table(traj)
}

/// Release a table returned by [`rk4_solve`]. A null `ptr` is ignored.
///
/// # Safety
/// `ptr` must come from `rk4_solve` called with the same `d`, and must not have been
/// released before.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rk4_dealloc(ptr: *mut *mut c_double, d: c_int) {
    if ptr.is_null() {
        return;
    }
    log::trace!("rk4_dealloc: d={d}");

    // SAFETY: slot `d + 1` holds the owning `RowTable` written by `into_row_table`.
    unsafe {
        let owner = (*ptr.add(d as usize + 1)).cast::<RowTable>();
        drop(Box::from_raw(owner));
    }
}

/// Number of samples per row `rk4_solve` produces for these parameters.
#[unsafe(no_mangle)]
pub extern "C" fn rk4_sample_count(dt: c_double, tmax: c_double) -> c_long {
    rk4::sample_count(dt, tmax) as c_long
}

#[unsafe(no_mangle)]
pub extern "C" fn rk4_abi_version() -> u32 {
    ABI_VERSION
}

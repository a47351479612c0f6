//! # Example: Lorenz system
//!
//! Integrate the chaotic Lorenz system twice: once through the Rust API and once
//! through the C ABI (`rk4_solve` / `rk4_dealloc`), the way a foreign caller would.
//!
//! Equations:
//! dx/dt = sigma (y - x)
//! dy/dt = x (rho - z) - y
//! dz/dt = x y - beta z
//!
//! Initial conditions: (1, 2, 3)
//!

use std::os::raw::c_double;

use rk4_kernel::capi::{rk4_dealloc, rk4_sample_count, rk4_solve};
use rk4_kernel::prelude::*;

struct Lorenz {
    sigma: f64,
    rho: f64,
    beta: f64,
}

impl ODE for Lorenz {
    fn ode(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.sigma * (y[1] - y[0]);
        dydt[1] = y[0] * (self.rho - y[2]) - y[1];
        dydt[2] = y[0] * y[1] - self.beta * y[2];
    }
}

unsafe extern "C" fn lorenz_c(_t: c_double, y: *const c_double, dydt: *mut c_double) {
    unsafe {
        let (y, dydt) = (
            std::slice::from_raw_parts(y, 3),
            std::slice::from_raw_parts_mut(dydt, 3),
        );
        dydt[0] = 10.0 * (y[1] - y[0]);
        dydt[1] = y[0] * (28.0 - y[2]) - y[1];
        dydt[2] = y[0] * y[1] - (8.0 / 3.0) * y[2];
    }
}

fn main() {
    let lorenz = Lorenz {
        sigma: 10.0,
        rho: 28.0,
        beta: 8.0 / 3.0,
    };
    let y0 = [1.0, 2.0, 3.0];
    let (dt, tmax) = (1e-4, 10.0);

    let sol = solve(&lorenz, &y0, dt, tmax);
    println!("Samples per row: {}", sol.len());
    for k in (0..sol.len()).step_by(10_000) {
        let mut y = [0.0; 3];
        sol.sample(k, &mut y);
        println!("t = {:>6.3}, y = {:?}", sol.time()[k], y);
    }

    // Same trajectory through the C ABI.
    let n = rk4_sample_count(dt, tmax) as usize;
    unsafe {
        let table = rk4_solve(lorenz_c, y0.as_ptr(), dt, tmax, 3);
        let x = std::slice::from_raw_parts(*table.add(1), n);
        println!("C ABI first x samples: {:?}", &x[..5]);
        println!("C ABI agrees with Rust API: {}", x == sol.state(0));
        rk4_dealloc(table, 3);
    }
    sol.release();
}

//! # Example: Exponential Decay
//!
//! Solve the exponential decay equation and compare with the analytic solution.
//!
//! Equations:
//! dy/dt = -0.1 y
//!
//! Initial condition: y(0) = 100.0
//!

use rk4_kernel::prelude::*;

fn main() {
    let options = Options::builder().dt(1e-6).tmax(1.0).build();

    match integrate(|_t, y: &[f64]| [-0.1 * y[0]], &[100.0], options) {
        Ok(sol) => {
            let (Some(&t_last), Some(y_last)) = (sol.time().last(), sol.final_state()) else {
                println!("Empty trajectory");
                return;
            };
            let exact = 100.0 * (-0.1 * t_last).exp();
            println!("Number of samples: {}", sol.len());
            println!("Number of function evaluations: {}", sol.nfev());
            println!("y({t_last:.6}) numerical:  {:.10}", y_last[0]);
            println!("y({t_last:.6}) analytical: {exact:.10}");
            println!("Relative difference: {:e}", (y_last[0] - exact) / exact);
            sol.release();
        }
        Err(e) => eprintln!("Integration failed: {e}"),
    }
}

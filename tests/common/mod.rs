//! Reference systems shared by the integration tests.
#![allow(dead_code)]

use rk4_kernel::prelude::*;

/// dy/dt = -rate * y
pub struct ExponentialDecay {
    pub rate: f64,
}

impl ODE for ExponentialDecay {
    fn ode(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        for (d, yi) in dydt.iter_mut().zip(y) {
            *d = -self.rate * yi;
        }
    }
}

/// The Lorenz system.
pub struct Lorenz {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl Lorenz {
    pub const CLASSIC: Lorenz = Lorenz {
        sigma: 10.0,
        rho: 28.0,
        beta: 8.0 / 3.0,
    };
}

impl ODE for Lorenz {
    fn ode(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.sigma * (y[1] - y[0]);
        dydt[1] = y[0] * (self.rho - y[2]) - y[1];
        dydt[2] = y[0] * y[1] - self.beta * y[2];
    }
}

/// Simple harmonic oscillator: y0'' = -y0.
pub struct SHO;

impl ODE for SHO {
    fn ode(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = y[1];
        dydt[1] = -y[0];
    }
}

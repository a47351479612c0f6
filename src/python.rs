//! `rk4lib` Python extension module.
//!
//! Wraps a Python callable `fun(t, y) -> dydt` into [`ODE`], validates the call
//! arguments the way the friendly wrapper is expected to, and hands the trajectory back
//! as numpy arrays.

use std::cell::RefCell;

use numpy::{PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray1};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;

use crate::{Error, Float, ODE, Options, integrate::validate, rk4};

impl From<Error> for PyErr {
    fn from(err: Error) -> Self {
        match err {
            Error::NotCallable => PyTypeError::new_err("Parameter fun must be a callable."),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// Wrapper that implements `ODE` for a Python derivative function.
///
/// The first exception raised by `fun` (or a malformed return value) is stored and
/// every later stage short-circuits with NaN; [`PythonODE::finish`] re-raises it once
/// the engine returns.
struct PythonODE<'py> {
    fun: Bound<'py, PyAny>,
    py: Python<'py>,
    error: RefCell<Option<PyErr>>,
}

impl<'py> PythonODE<'py> {
    fn new(fun: Bound<'py, PyAny>, py: Python<'py>) -> Self {
        Self {
            fun,
            py,
            error: RefCell::new(None),
        }
    }

    fn call(&self, t: Float, y: &[Float], dydt: &mut [Float]) -> PyResult<()> {
        let y_arr = PyArray1::from_slice(self.py, y);
        let result = self.fun.call1((t, y_arr))?;
        read_derivative(&result, dydt)
    }

    fn finish(self) -> PyResult<()> {
        match self.error.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ODE for PythonODE<'_> {
    fn ode(&self, t: Float, y: &[Float], dydt: &mut [Float]) {
        if self.error.borrow().is_some() {
            dydt.fill(Float::NAN);
            return;
        }
        if let Err(err) = self.call(t, y, dydt) {
            dydt.fill(Float::NAN);
            *self.error.borrow_mut() = Some(err);
        }
    }
}

/// Copy an array_like derivative into `dydt`, checking its length.
fn read_derivative(result: &Bound<'_, PyAny>, dydt: &mut [Float]) -> PyResult<()> {
    // Float64 numpy array (most common)
    if let Ok(arr) = result.extract::<PyReadonlyArray1<Float>>() {
        return copy_checked(arr.as_slice()?, dydt);
    }

    // Any other sequence of numbers
    let values: Vec<Float> = result.extract()?;
    copy_checked(&values, dydt)
}

fn copy_checked(values: &[Float], dydt: &mut [Float]) -> PyResult<()> {
    if values.len() != dydt.len() {
        return Err(Error::DimensionMismatch {
            expected: dydt.len(),
            actual: values.len(),
        }
        .into());
    }
    dydt.copy_from_slice(values);
    Ok(())
}

fn extract_y0(y0: &Bound<'_, PyAny>) -> PyResult<Vec<Float>> {
    if let Ok(arr) = y0.extract::<PyReadonlyArray1<Float>>() {
        return Ok(arr.as_slice()?.to_vec());
    }
    y0.extract::<Vec<Float>>().map_err(|err| {
        let wrapped = PyTypeError::new_err("Parameter y0 must be a list of arguments to f.");
        wrapped.set_cause(y0.py(), Some(err));
        wrapped
    })
}

fn extract_float(value: &Bound<'_, PyAny>, name: &str) -> PyResult<Float> {
    value.extract::<Float>().map_err(|err| {
        let wrapped = PyTypeError::new_err(format!("Parameter {name} must be a float."));
        wrapped.set_cause(value.py(), Some(err));
        wrapped
    })
}

#[pyfunction]
#[pyo3(name = "integrate")]
#[pyo3(signature = (fun, y0, dt, tmax))]
/// Integrate ``dy/dt = fun(t, y)`` from ``t = 0`` with the classical RK4 method.
///
/// Parameters
/// ----------
/// fun : callable
///     Right-hand side ``fun(t, y) -> dydt``, returning array_like of ``len(y0)``.
/// y0 : array_like, shape (n,)
///     Initial state.
/// dt : float
///     Fixed step size, positive.
/// tmax : float
///     Horizon, positive. ``floor(tmax / dt)`` samples are produced.
///
/// Returns
/// -------
/// t : ndarray, shape (n_points,)
///     Sample times ``k * dt``.
/// sol : ndarray, shape (n, n_points)
///     State components at each sample time.
fn integrate_py<'py>(
    py: Python<'py>,
    fun: Bound<'py, PyAny>,
    y0: Bound<'py, PyAny>,
    dt: Bound<'py, PyAny>,
    tmax: Bound<'py, PyAny>,
) -> PyResult<(Bound<'py, PyArray1<Float>>, Bound<'py, PyArray2<Float>>)> {
    if !fun.is_callable() {
        return Err(Error::NotCallable.into());
    }
    let y0 = extract_y0(&y0)?;
    let options = Options::builder()
        .dt(extract_float(&dt, "dt")?)
        .tmax(extract_float(&tmax, "tmax")?)
        .build();
    validate(&y0, &options)?;

    let f = PythonODE::new(fun, py);

    // Check that fun has the appropriate signature and returns len(y0) values
    let mut first = vec![0.0; y0.len()];
    f.call(0.0, &y0, &mut first).map_err(|err| {
        if err.is_instance_of::<PyTypeError>(py) {
            let wrapped =
                PyTypeError::new_err("Parameter fun must be a function fun(t, y0) -> dydt.");
            wrapped.set_cause(py, Some(err));
            wrapped
        } else {
            err
        }
    })?;

    let sol = rk4::solve(&f, &y0, options.dt, options.tmax);
    f.finish()?;

    let (d, n) = (sol.dim(), sol.len());
    let t = PyArray1::from_slice(py, sol.time());
    let states = PyArray1::from_slice(py, &sol.as_slice()[n..]).reshape((d, n))?;
    sol.release();

    Ok((t, states))
}

#[pyfunction]
#[pyo3(name = "sample_count")]
/// Number of samples ``integrate`` produces: ``floor(tmax / dt)``.
fn sample_count_py(dt: Float, tmax: Float) -> usize {
    rk4::sample_count(dt, tmax)
}

#[pymodule]
fn rk4lib(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(integrate_py, m)?)?;
    m.add_function(wrap_pyfunction!(sample_count_py, m)?)?;
    m.add("ABI_VERSION", crate::capi::ABI_VERSION)?;
    m.setattr(
        "__doc__",
        "Fixed-step classical Runge-Kutta 4 integrator returning full trajectories.",
    )?;
    Ok(())
}

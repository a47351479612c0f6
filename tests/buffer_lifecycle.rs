//! Allocation accounting for the trajectory buffer.
//!
//! A counting global allocator tracks live bytes per thread, so each test only sees
//! its own allocations. Releasing twice, or reading a released buffer, is a caller
//! precondition violation and must not be exercised in correct usage; nothing here
//! does so.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::os::raw::c_double;

use rk4_kernel::capi::{rk4_dealloc, rk4_sample_count, rk4_solve};
use rk4_kernel::prelude::*;

mod common;
use common::Lorenz;

struct Counting;

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
    static LARGEST: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = LIVE.try_with(|c| c.set(c.get() + layout.size() as isize));
        let _ = LARGEST.try_with(|c| c.set(c.get().max(layout.size())));
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let _ = LIVE.try_with(|c| c.set(c.get() - layout.size() as isize));
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn live() -> isize {
    LIVE.with(Cell::get)
}

fn reset_largest() {
    LARGEST.with(|c| c.set(0));
}

fn largest() -> usize {
    LARGEST.with(Cell::get)
}

unsafe extern "C" fn lorenz(_t: c_double, y: *const c_double, dydt: *mut c_double) {
    unsafe {
        let y = std::slice::from_raw_parts(y, 3);
        let dydt = std::slice::from_raw_parts_mut(dydt, 3);
        Lorenz::CLASSIC.ode(0.0, y, dydt);
    }
}

#[test]
fn release_returns_every_byte() {
    let before = live();
    let sol = solve(&Lorenz::CLASSIC, &[1.0, 1.0, 1.0], 1e-3, 2.0);
    assert!(live() > before);
    sol.release();
    assert_eq!(live(), before);
}

#[test]
fn drop_returns_every_byte() {
    let before = live();
    {
        let sol = solve(&Lorenz::CLASSIC, &[1.0, 1.0, 1.0], 1e-3, 2.0);
        assert_eq!(sol.len(), 2000);
    }
    assert_eq!(live(), before);
}

#[test]
fn samples_live_in_one_block() {
    reset_largest();
    let sol = solve(&Lorenz::CLASSIC, &[1.0, 1.0, 1.0], 1e-3, 2.0);
    assert_eq!(largest(), 4 * 2000 * std::mem::size_of::<f64>());
    sol.release();
}

#[test]
fn empty_trajectory_is_released_too() {
    let before = live();
    solve(&Lorenz::CLASSIC, &[1.0, 1.0, 1.0], 1.0, 0.5).release();
    assert_eq!(live(), before);
}

#[test]
fn c_abi_dealloc_returns_every_byte() {
    let y0 = [1.0, 1.0, 1.0];
    let before = live();
    unsafe {
        let table = rk4_solve(lorenz, y0.as_ptr(), 1e-3, 2.0, 3);
        assert!(live() > before);

        let n = rk4_sample_count(1e-3, 2.0) as usize;
        for i in 0..4 {
            let row = std::slice::from_raw_parts(*table.add(i), n);
            assert_eq!(row.len(), 2000);
        }
        rk4_dealloc(table, 3);
    }
    assert_eq!(live(), before);
}

#[test]
fn c_abi_matches_rust_engine() {
    let y0 = [1.0, 1.0, 1.0];
    let expected = solve(&Lorenz::CLASSIC, &y0, 1e-3, 1.0);
    let n = expected.len();
    unsafe {
        let table = rk4_solve(lorenz, y0.as_ptr(), 1e-3, 1.0, 3);
        for (i, row) in expected.rows().enumerate() {
            assert_eq!(std::slice::from_raw_parts(*table.add(i), n), row);
        }
        rk4_dealloc(table, 3);
    }
}

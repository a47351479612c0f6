//! Owned trajectory buffer produced by one solve.

use crate::Float;

/// Sampled trajectory: `dim() + 1` rows of `len()` samples each.
///
/// Row 0 holds the sample times `t_k = k * dt`, row `i` (for `i = 1..=dim()`) holds
/// state component `i - 1` at those times. Storage is one contiguous row-major block
/// allocated once by the solve that created it; the shape never changes afterwards.
///
/// The caller owns the buffer outright. Dropping it, or calling
/// [`Trajectory::release`], frees the samples exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    data: Vec<Float>,
    dim: usize,
    len: usize,
    nfev: usize,
}

impl Trajectory {
    /// Reserve `dim + 1` zeroed rows of `len` samples.
    ///
    /// # Panics
    /// If `(dim + 1) * len` overflows `usize`.
    pub(crate) fn allocate(dim: usize, len: usize) -> Self {
        let size = (dim + 1)
            .checked_mul(len)
            .expect("trajectory size overflows usize");
        Self {
            data: vec![0.0; size],
            dim,
            len,
            nfev: 0,
        }
    }

    /// Write column `k`: time `t` into row 0 and `y` into rows `1..=dim`.
    #[inline]
    pub(crate) fn record(&mut self, k: usize, t: Float, y: &[Float]) {
        debug_assert!(k < self.len);
        debug_assert_eq!(y.len(), self.dim);
        self.data[k] = t;
        for (i, &yi) in y.iter().enumerate() {
            self.data[(i + 1) * self.len + k] = yi;
        }
    }

    pub(crate) fn set_nfev(&mut self, nfev: usize) {
        self.nfev = nfev;
    }

    /// Dimension of the state vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of samples per row, `floor(tmax / dt)`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of rows, always `dim() + 1`.
    pub fn n_rows(&self) -> usize {
        self.dim + 1
    }

    /// Number of derivative evaluations spent producing this trajectory.
    pub fn nfev(&self) -> usize {
        self.nfev
    }

    /// Row `i`; row 0 is time.
    ///
    /// # Panics
    /// If `i > dim()`.
    pub fn row(&self, i: usize) -> &[Float] {
        assert!(i <= self.dim, "row {i} out of range for {} rows", self.n_rows());
        &self.data[i * self.len..(i + 1) * self.len]
    }

    /// Sample times, `[0, dt, 2dt, ...]`.
    pub fn time(&self) -> &[Float] {
        self.row(0)
    }

    /// Samples of state component `i` (zero-based).
    pub fn state(&self, i: usize) -> &[Float] {
        assert!(i < self.dim, "state component {i} out of range for dimension {}", self.dim);
        self.row(i + 1)
    }

    /// Iterate over all rows, time first.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            trajectory: self,
            next: 0,
        }
    }

    /// Copy the state at sample `k` into `out`.
    ///
    /// # Panics
    /// If `k >= len()` or `out.len() != dim()`.
    pub fn sample(&self, k: usize, out: &mut [Float]) {
        assert!(k < self.len, "sample {k} out of range for {} samples", self.len);
        assert_eq!(out.len(), self.dim, "sample buffer must hold dim() values");
        for (i, yi) in out.iter_mut().enumerate() {
            *yi = self.data[(i + 1) * self.len + k];
        }
    }

    /// State at the last recorded sample, or `None` for an empty trajectory.
    pub fn final_state(&self) -> Option<Vec<Float>> {
        let k = self.len.checked_sub(1)?;
        let mut y = vec![0.0; self.dim];
        self.sample(k, &mut y);
        Some(y)
    }

    /// The whole row-major block, `(dim() + 1) * len()` values.
    pub fn as_slice(&self) -> &[Float] {
        &self.data
    }

    /// Split into one owned `Vec` per row.
    pub fn into_rows(self) -> Vec<Vec<Float>> {
        self.rows().map(<[Float]>::to_vec).collect()
    }

    pub(crate) fn into_data(self) -> Vec<Float> {
        self.data
    }

    /// Release the samples. Equivalent to dropping the buffer; the handle is consumed
    /// so it can neither be read nor released again.
    pub fn release(self) {
        log::trace!("releasing trajectory of {} x {} samples", self.n_rows(), self.len);
        drop(self);
    }
}

/// Iterator over the rows of a [`Trajectory`].
pub struct Rows<'a> {
    trajectory: &'a Trajectory,
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a [Float];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.trajectory.dim {
            return None;
        }
        let row = self.trajectory.row(self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.trajectory.n_rows() - self.next.min(self.trajectory.n_rows());
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Trajectory {
        let mut traj = Trajectory::allocate(2, 3);
        for k in 0..3 {
            let t = k as Float;
            traj.record(k, t, &[10.0 + t, 20.0 + t]);
        }
        traj
    }

    #[test]
    fn allocate_shapes_rows() {
        let traj = Trajectory::allocate(3, 5);
        assert_eq!(traj.n_rows(), 4);
        assert_eq!(traj.as_slice().len(), 20);
        assert!(traj.rows().all(|r| r.len() == 5));
    }

    #[test]
    fn record_writes_columns() {
        let traj = filled();
        assert_eq!(traj.time(), &[0.0, 1.0, 2.0]);
        assert_eq!(traj.state(0), &[10.0, 11.0, 12.0]);
        assert_eq!(traj.state(1), &[20.0, 21.0, 22.0]);
        assert_eq!(traj.final_state(), Some(vec![12.0, 22.0]));

        let mut y = [0.0; 2];
        traj.sample(1, &mut y);
        assert_eq!(y, [11.0, 21.0]);
    }

    #[test]
    fn rows_iterates_time_first() {
        let traj = filled();
        let rows = traj.rows();
        assert_eq!(rows.len(), 3);
        let firsts: Vec<Float> = traj.rows().map(|r| r[0]).collect();
        assert_eq!(firsts, vec![0.0, 10.0, 20.0]);
        assert_eq!(traj.into_rows()[2], vec![20.0, 21.0, 22.0]);
    }

    #[test]
    fn empty_trajectory_keeps_row_count() {
        let traj = Trajectory::allocate(1, 0);
        assert!(traj.is_empty());
        assert_eq!(traj.rows().count(), 2);
        assert_eq!(traj.final_state(), None);
        traj.release();
    }

    #[test]
    #[should_panic]
    fn row_out_of_range_panics() {
        filled().row(3);
    }

    #[test]
    #[should_panic(expected = "sample buffer must hold dim() values")]
    fn sample_rejects_short_buffer() {
        let mut y = [0.0; 1];
        filled().sample(0, &mut y);
    }

    #[test]
    #[should_panic(expected = "sample buffer must hold dim() values")]
    fn sample_rejects_long_buffer() {
        let mut y = [0.0; 3];
        filled().sample(0, &mut y);
    }

    #[test]
    #[should_panic(expected = "trajectory size overflows usize")]
    fn allocate_rejects_overflowing_size() {
        Trajectory::allocate(1, usize::MAX);
    }
}

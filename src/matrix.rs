use crate::utils::ZeroOut;

use rblas::attribute::Order;
use rblas::Matrix;
use std::ops::SubAssign;
use std::os::raw::c_int;

/// A dense matrix of weights.
///
/// Entry `(row, col)` is the weight from input neuron `row` to output
/// neuron `col`, so a layer with `n` inputs and `m` outputs stores an
/// `n x m` matrix.
#[derive(Clone, Debug)]
pub struct Mat {
    rows: usize,
    cols: usize,
    data: Vec<f64>, // column-major array
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix by evaluating `f(row, col)` for every entry.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for col in 0..cols {
            for row in 0..rows {
                data.push(f(row, col));
            }
        }
        Mat { rows, cols, data }
    }

    /// Rebuilds a matrix from row-major `values`, the layout used by the
    /// persisted model format.
    pub fn from_row_major(rows: usize, cols: usize, values: &[f64]) -> Self {
        assert_eq!(values.len(), rows * cols);
        Mat::from_fn(rows, cols, |row, col| values[row * cols + col])
    }

    /// Copies the matrix out in row-major order.
    pub fn to_row_major(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.rows * self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                values.push(self.data[col * self.rows + row]);
            }
        }
        values
    }

    /// Folds a new gradient into a momentum step:
    /// `self = rate * gradient + momentum * self`, elementwise.
    pub fn blend(&mut self, rate: f64, momentum: f64, gradient: &Mat) {
        for (v, g) in self.data.iter_mut().zip(gradient.data.iter()) {
            *v = rate * g + momentum * *v;
        }
    }
}

impl<'a> SubAssign<&'a Mat> for Mat {
    fn sub_assign(&mut self, other: &Mat) {
        for (l, r) in self.data.iter_mut().zip(other.data.iter()) {
            *l -= *r;
        }
    }
}

impl Matrix<f64> for Mat {
    fn rows(&self) -> c_int {
        self.rows as c_int
    }

    fn cols(&self) -> c_int {
        self.cols as c_int
    }

    fn as_ptr(&self) -> *const f64 {
        self.data.as_ptr()
    }

    fn as_mut_ptr(&mut self) -> *mut f64 {
        self.data.as_mut_ptr()
    }

    fn order(&self) -> Order {
        Order::ColMajor
    }
}

impl ZeroOut for Mat {
    fn zero_out(&mut self) {
        self.data.zero_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_round_trip() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mat = Mat::from_row_major(2, 3, &values);
        assert_eq!(mat.to_row_major(), values);
    }

    #[test]
    fn blend_scales_and_decays() {
        let mut velocity = Mat::from_row_major(1, 2, &[1.0, -2.0]);
        let gradient = Mat::from_row_major(1, 2, &[4.0, 8.0]);
        velocity.blend(0.5, 0.25, &gradient);
        assert_eq!(velocity.to_row_major(), vec![2.25, 3.5]);
    }

    #[test]
    fn sub_assign_is_elementwise() {
        let mut weights = Mat::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        weights -= &Mat::from_row_major(2, 2, &[0.5, 1.0, 1.5, 2.0]);
        assert_eq!(weights.to_row_major(), vec![0.5, 1.0, 1.5, 2.0]);
    }
}

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign};

use super::{Value, ValueType, Vector};

/// A dense, row-major matrix whose shape is only known at runtime.
///
/// Arithmetic panics when the operands' shapes disagree.
#[derive(Clone, PartialEq)]
pub struct Matrix {
    values: Vec<Value>,
    rows: usize,
    columns: usize,
}

impl Matrix {
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self {
            values: vec![Value::ZERO; rows * columns],
            rows,
            columns,
        }
    }

    pub fn ones(rows: usize, columns: usize) -> Self {
        let mut matrix = Self::zeros(rows, columns);
        matrix.values_mut().for_each(|x| *x = Value::ONE);
        matrix
    }

    pub fn from_vec(values: Vec<Value>, rows: usize, columns: usize) -> Self {
        assert_eq!(values.len(), rows * columns, "matrix shape mismatch");
        Self {
            values,
            rows,
            columns,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.columns]
    }

    pub fn row(&self, row: usize) -> &[Value] {
        &self.values[row * self.columns..(row + 1) * self.columns]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [Value] {
        &mut self.values[row * self.columns..(row + 1) * self.columns]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Value]> {
        self.values.chunks(self.columns.max(1))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut [Value]> {
        self.values.chunks_mut(self.columns.max(1))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.values.iter_mut()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// `self · rhs`
    pub fn matmul(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.columns, rhs.rows, "matrix shape mismatch");

        let mut result = Matrix::zeros(self.rows, rhs.columns);
        for row in 0..self.rows {
            let output = result.row_mut(row);
            for (inner, &a) in self.row(row).iter().enumerate() {
                output
                    .iter_mut()
                    .zip(rhs.row(inner))
                    .for_each(|(o, &b)| *o += a * b);
            }
        }
        result
    }

    /// `self · rhsᵗ`, computed as row-by-row dot products.
    pub fn matmul_transposed(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.columns, rhs.columns, "matrix shape mismatch");

        let mut result = Matrix::zeros(self.rows, rhs.rows);
        for row in 0..self.rows {
            let a = self.row(row);
            for column in 0..rhs.rows {
                result[(row, column)] = a.iter().zip(rhs.row(column)).map(|(a, b)| a * b).sum();
            }
        }
        result
    }

    /// `selfᵗ · rhs`, accumulated as a sum of outer products of paired rows.
    pub fn transposed_matmul(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.rows, rhs.rows, "matrix shape mismatch");

        let mut result = Matrix::zeros(self.columns, rhs.columns);
        for (a_row, b_row) in self.iter().zip(rhs.iter()) {
            for (column, &a) in a_row.iter().enumerate() {
                result
                    .row_mut(column)
                    .iter_mut()
                    .zip(b_row)
                    .for_each(|(o, &b)| *o += a * b);
            }
        }
        result
    }

    /// Sums the rows together, giving one value per column.
    pub fn sum_rows(&self) -> Vector {
        self.iter().fold(Vector::zeros(self.columns), |mut sum, row| {
            sum.iter_mut().zip(row).for_each(|(s, &x)| *s += x);
            sum
        })
    }

    /// Builds a new matrix out of the given rows, in order. Rows may repeat.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut values = Vec::with_capacity(indices.len() * self.columns);
        for &index in indices {
            values.extend_from_slice(self.row(index));
        }
        Matrix::from_vec(values, indices.len(), self.columns)
    }

    /// The column of the largest value in each row. Ties go to the first column.
    pub fn argmax_rows(&self) -> Vec<usize> {
        (0..self.rows)
            .map(|row| {
                self.row(row)
                    .iter()
                    .enumerate()
                    .fold((0, Value::NEG_INFINITY), |best, (column, &x)| {
                        if x > best.1 {
                            (column, x)
                        } else {
                            best
                        }
                    })
                    .0
            })
            .collect()
    }

    /// The squared Frobenius norm.
    pub fn squared_norm(&self) -> Value {
        self.values().map(|x| x * x).sum()
    }
}

macro_rules! value_op_impl {
    ($op:ident, $op_method:ident, $op_assign:ident, $op_assign_method:ident) => {
        impl $op<Value> for Matrix {
            type Output = Matrix;

            fn $op_method(mut self, rhs: Value) -> Self::Output {
                self.$op_assign_method(rhs);
                self
            }
        }

        impl $op<Value> for &Matrix {
            type Output = Matrix;

            fn $op_method(self, rhs: Value) -> Self::Output {
                self.clone().$op_method(rhs)
            }
        }

        impl $op_assign<Value> for Matrix {
            fn $op_assign_method(&mut self, rhs: Value) {
                for x in self.values_mut() {
                    x.$op_assign_method(rhs)
                }
            }
        }
    };
}

value_op_impl!(Add, add, AddAssign, add_assign);
value_op_impl!(Mul, mul, MulAssign, mul_assign);
value_op_impl!(Div, div, DivAssign, div_assign);

// Vectors broadcast across every row.
macro_rules! vector_op_impl {
    ($op:ident, $op_method:ident, $op_assign:ident, $op_assign_method:ident) => {
        impl $op<&Vector> for Matrix {
            type Output = Matrix;

            fn $op_method(mut self, rhs: &Vector) -> Self::Output {
                self.$op_assign_method(rhs);
                self
            }
        }

        impl $op<&Vector> for &Matrix {
            type Output = Matrix;

            fn $op_method(self, rhs: &Vector) -> Self::Output {
                self.clone().$op_method(rhs)
            }
        }

        impl $op_assign<&Vector> for Matrix {
            fn $op_assign_method(&mut self, rhs: &Vector) {
                assert_eq!(self.columns, rhs.len(), "matrix shape mismatch");
                for row in self.iter_mut() {
                    for (x, b) in row.iter_mut().zip(rhs) {
                        x.$op_assign_method(b)
                    }
                }
            }
        }
    };
}

vector_op_impl!(Add, add, AddAssign, add_assign);

macro_rules! matrix_op_impl {
    ($op:ident, $op_method:ident, $op_assign:ident, $op_assign_method:ident) => {
        impl $op<Matrix> for Matrix {
            type Output = Matrix;

            fn $op_method(mut self, rhs: Matrix) -> Self::Output {
                self.$op_assign_method(&rhs);
                self
            }
        }

        impl $op<&Matrix> for Matrix {
            type Output = Matrix;

            fn $op_method(mut self, rhs: &Matrix) -> Self::Output {
                self.$op_assign_method(rhs);
                self
            }
        }

        impl $op<&Matrix> for &Matrix {
            type Output = Matrix;

            fn $op_method(self, rhs: &Matrix) -> Self::Output {
                self.clone().$op_method(rhs)
            }
        }

        impl $op_assign<Matrix> for Matrix {
            fn $op_assign_method(&mut self, rhs: Matrix) {
                self.$op_assign_method(&rhs)
            }
        }

        impl $op_assign<&Matrix> for Matrix {
            fn $op_assign_method(&mut self, rhs: &Matrix) {
                assert_eq!(self.shape(), rhs.shape(), "matrix shape mismatch");
                for (x, b) in self.values_mut().zip(rhs.values()) {
                    x.$op_assign_method(b)
                }
            }
        }
    };
}

matrix_op_impl!(Add, add, AddAssign, add_assign);

impl Index<(usize, usize)> for Matrix {
    type Output = Value;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        assert!(column < self.columns, "column out of bounds");
        &self.values[row * self.columns + column]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut Self::Output {
        assert!(column < self.columns, "column out of bounds");
        &mut self.values[row * self.columns + column]
    }
}

impl<const R: usize, const C: usize> From<[[Value; C]; R]> for Matrix {
    fn from(values: [[Value; C]; R]) -> Self {
        Self::from_vec(values.iter().flatten().copied().collect(), R, C)
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows == 0 {
            return write!(f, "[]");
        }
        for (r, row) in self.iter().enumerate() {
            write!(f, "{}", if r == 0 { "[" } else { " " })?;
            for (c, x) in row.iter().enumerate() {
                fmt::Debug::fmt(x, f)?;
                if c + 1 < self.columns {
                    write!(f, " ")?;
                }
            }
            write!(f, "{}", if r + 1 < self.rows { "\n" } else { "]" })?;
        }
        Ok(())
    }
}

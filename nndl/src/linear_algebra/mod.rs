pub use self::matrix::Matrix;
pub use self::vector::Vector;

mod matrix;
mod vector;

pub type Value = f64;

pub trait ValueType {
    const ZERO: Self;
    const ONE: Self;
}

impl ValueType for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
}

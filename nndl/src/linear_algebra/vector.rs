use std::fmt;
use std::ops::{Deref, DerefMut};

use super::{Value, ValueType};

/// A dense vector, used for biases and their gradients.
#[derive(Clone, Default, PartialEq)]
pub struct Vector(Vec<Value>);

impl Vector {
    pub fn zeros(len: usize) -> Self {
        Self(vec![Value::ZERO; len])
    }
}

impl Deref for Vector {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Vector {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Value>> for Vector {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[Value; N]> for Vector {
    fn from(values: [Value; N]) -> Self {
        Self(values.to_vec())
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.iter().enumerate() {
            fmt::Debug::fmt(x, f)?;
            if i + 1 < self.len() {
                write!(f, " ")?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_access() {
        let mut v: Vector = [1.0, 2.0, 3.0].into();
        v[1..].iter_mut().for_each(|x| *x *= 2.0);

        assert_eq!(v, Vector::from(vec![1.0, 4.0, 6.0]));
        assert_eq!((&v).into_iter().sum::<Value>(), 11.0);
        assert_eq!(Vector::zeros(2).len(), 2);
        assert_eq!(format!("{:?}", v), "[1.0 4.0 6.0]");
    }
}

use std::error::Error;
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModelError {
    /// The shapes of the inputs, labels or parameters disagree.
    ShapeMismatch(&'static str),
    /// A label lies outside `[0, classes)`.
    InvalidLabel {
        index: usize,
        label: usize,
        classes: usize,
    },
    /// A training or model setting can't be used.
    InvalidConfig(&'static str),
    /// There are no examples to work with.
    EmptyBatch,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch(message) => write!(f, "shape mismatch: {message}"),
            Self::InvalidLabel {
                index,
                label,
                classes,
            } => write!(
                f,
                "invalid label {label} for example {index}, expected a label below {classes}"
            ),
            Self::InvalidConfig(message) => write!(f, "invalid configuration: {message}"),
            Self::EmptyBatch => write!(f, "no examples were given"),
        }
    }
}

impl Error for ModelError {}

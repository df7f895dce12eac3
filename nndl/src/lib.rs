pub use self::batch::{accuracy, Sampling};
pub use self::error::ModelError;
pub use self::grad_check::{relative_error, GradientCheck};
pub use self::gradient_descent::{GradientDescent, SimpleGradientDescent};
pub use self::softmax::{SoftmaxClassifier, SoftmaxTrainConfig};
pub use self::two_layer::{
    Gradients, NetTrainConfig, Parameter, Parameters, TrainingHistory, TwoLayerNet, DEFAULT_STD,
};

pub mod batch;
pub mod grad_check;
pub mod linear_algebra;
pub mod loss;

mod activation;
mod error;
mod gradient_descent;
mod layer;
mod softmax;
mod two_layer;

use clap::{Args as ArgsTrait, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Trains a softmax classifier on a synthetic dataset.
    Softmax(SoftmaxConfig),
    /// Trains a two-layer ReLU network on a synthetic dataset.
    Net(NetConfig),
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct DataConfig {
    /// The number of training examples to generate.
    #[arg(long, default_value_t = 500)]
    pub samples: usize,

    /// The number of features of each example.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub features: u32,

    /// The number of classes. Each class is a Gaussian blob around its own center.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub classes: u32,

    /// The standard deviation of each blob around its center.
    #[arg(long, default_value_t = 1.0)]
    pub spread: f64,

    /// Seed for every random choice made during the run. Omit for a random seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct RunConfig {
    /// A JSON file with training options. Missing fields keep their defaults.
    #[arg(short, long, verbatim_doc_comment)]
    pub config: Option<String>,

    /// Run this many sparse gradient checks before training.
    #[arg(long, default_value_t = 0)]
    pub grad_check: usize,

    /// A file to write the training history to, in JSON format.
    #[arg(long, verbatim_doc_comment)]
    pub history: Option<String>,
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct SoftmaxConfig {
    #[command(flatten)]
    pub data: DataConfig,

    #[command(flatten)]
    pub run: RunConfig,
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct NetConfig {
    #[command(flatten)]
    pub data: DataConfig,

    #[command(flatten)]
    pub run: RunConfig,

    /// The number of validation examples to generate.
    #[arg(long, default_value_t = 100)]
    pub val_samples: usize,

    /// The number of hidden units.
    #[arg(long, default_value_t = 50)]
    pub hidden: usize,

    /// The standard deviation of the initial weights.
    #[arg(long, default_value_t = nndl::DEFAULT_STD)]
    pub std: f64,
}

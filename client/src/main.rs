use std::env;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;

use self::args::{Args, Command};
use self::train::{run_net, run_softmax};

mod args;
mod dataset;
mod train;

fn main() -> ExitCode {
    let args = Args::parse();

    set_default_logging();

    let event_format = format().with_target(false).without_time();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .event_format(event_format)
        .init();

    let result = match args.command {
        Command::Softmax(config) => run_softmax(config),
        Command::Net(config) => run_net(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn set_default_logging() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
}

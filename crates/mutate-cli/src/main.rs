//! The `forge-mutate` command.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod args;
mod handler;
mod report;

fn main() -> Result<()> {
    handler::install();
    subscriber();
    yansi::whenever(yansi::Condition::TTY_AND_COLOR);

    args::MutateArgs::parse().run()
}

/// Logs to stderr, filtered by `RUST_LOG`.
fn subscriber() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

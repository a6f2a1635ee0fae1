pub mod binning;
pub mod clean;
pub mod cli;
pub mod config;
pub mod data;
pub mod dataset;
pub mod edges;
pub mod encode;
pub mod error;
pub mod io_utils;
pub mod job;
pub mod labels;
pub mod pipeline;
pub mod prep;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    binning::{BinOptions, BinSpec, bin},
    dataset::{Column, ColumnData, ColumnType, Dataset},
    edges::{BinScale, compute_bin_edges, dedup_edges},
    encode::{ExpandOptions, cast_categorical, full_expand, one_hot_expand},
    error::PrepError,
    labels::generate_labels,
    pipeline::bin_expand,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("frame_prep", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Bin(args) => prep::execute_bin(&args),
        Commands::BinExpand(args) => prep::execute_bin_expand(&args),
        Commands::Expand(args) => prep::execute_expand(&args),
        Commands::Edges(args) => prep::execute_edges(&args),
        Commands::Clean(args) => prep::execute_clean(&args),
        Commands::Preview(args) => prep::execute_preview(&args),
        Commands::Run(args) => job::execute(&args),
    }
}

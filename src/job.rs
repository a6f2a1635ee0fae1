//! Execution of configured preparation jobs.

use anyhow::{Context, Result};
use log::info;

use crate::{
    binning::{BinOptions, bin},
    clean::fill_clean,
    cli::{RunArgs, parse_delimiter},
    config::{EnvironmentConfig, JobConfig, Step},
    dataset::Dataset,
    encode::{ExpandOptions, cast_categorical, full_expand, one_hot_expand},
    io_utils,
    labels::resolve_labels,
    pipeline::{bin_expand, bin_field_name},
};

pub fn execute(args: &RunArgs) -> Result<()> {
    let config = EnvironmentConfig::load(&args.config)?;
    let job = config.job(&args.job)?;
    info!(
        "Running job '{}' ({} step(s)) from {:?}",
        args.job,
        job.steps.len(),
        args.config
    );
    run_job(job).with_context(|| format!("Running job '{}'", args.job))
}

/// Loads the job input, applies every step in order, and writes the result.
pub fn run_job(job: &JobConfig) -> Result<()> {
    let delimiter = job
        .delimiter
        .as_deref()
        .map(parse_delimiter)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let output_delimiter = job
        .output_delimiter
        .as_deref()
        .map(parse_delimiter)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let delimiter = io_utils::resolve_input_delimiter(&job.input, delimiter);
    let encoding = io_utils::resolve_encoding(job.input_encoding.as_deref())?;

    let mut dataset = io_utils::read_dataset(&job.input, delimiter, encoding)?;
    apply_steps(&mut dataset, &job.steps)?;

    let output_delimiter =
        io_utils::resolve_output_delimiter(job.output.as_deref(), output_delimiter, delimiter);
    io_utils::write_dataset(
        &dataset,
        job.output.as_deref(),
        output_delimiter,
        job.include_header,
    )?;
    info!(
        "Job wrote {} row(s) across {} column(s)",
        dataset.row_count(),
        dataset.column_count()
    );
    Ok(())
}

pub fn apply_steps(dataset: &mut Dataset, steps: &[Step]) -> Result<()> {
    for (idx, step) in steps.iter().enumerate() {
        apply_step(dataset, step)
            .with_context(|| format!("Step {} ({})", idx + 1, step.name()))?;
    }
    Ok(())
}

fn apply_step(dataset: &mut Dataset, step: &Step) -> Result<()> {
    match step {
        Step::Bin {
            source,
            output,
            labels,
            label_count,
            edges,
            scale,
            drop_source,
        } => {
            let labels = resolve_labels(labels, *label_count)?;
            let output = output.clone().unwrap_or_else(|| bin_field_name(source));
            let options = BinOptions {
                edges: edges.clone(),
                scale: *scale,
                drop_source: *drop_source,
            };
            bin(dataset, source, &output, &labels, &options)?;
        }
        Step::BinExpand {
            source,
            labels,
            label_count,
            edges,
            scale,
            drop_source,
        } => {
            let labels = resolve_labels(labels, *label_count)?;
            let options = BinOptions {
                edges: edges.clone(),
                scale: *scale,
                drop_source: *drop_source,
            };
            bin_expand(dataset, source, &labels, &options)?;
        }
        Step::Expand {
            field,
            replace,
            sort_labels,
            order,
        } => {
            let options = ExpandOptions {
                replace: *replace,
                sort_labels: *sort_labels,
                order: order.clone(),
            };
            one_hot_expand(dataset, field, &options)?;
        }
        Step::FullExpand {
            fields,
            replace,
            sort_labels,
            order,
        } => {
            let options = ExpandOptions {
                replace: *replace,
                sort_labels: *sort_labels,
                order: order.clone(),
            };
            *dataset = full_expand(dataset, fields, &options)?;
        }
        Step::Cast { field } => cast_categorical(dataset, field)?,
        Step::Clean { fields, fill } => {
            *dataset = fill_clean(dataset, fields, fill.as_ref())?;
        }
    }
    Ok(())
}

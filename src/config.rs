//! JSON environment configuration.
//!
//! The environment document carries an `ioconfig` section (connection
//! settings for external collaborators, not interpreted here) and a
//! `jobconfig` section mapping job names to preparation jobs:
//!
//! ```json
//! {
//!   "jobconfig": {
//!     "churn": {
//!       "input": "customers.csv",
//!       "output": "customers_prepared.csv",
//!       "steps": [
//!         { "op": "bin_expand", "source": "age", "label_count": 4, "scale": "auto" },
//!         { "op": "expand", "field": "region", "sort_labels": true }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::{collections::BTreeMap, fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{data::Value, edges::BinScale};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ioconfig: Option<serde_json::Value>,
    #[serde(default)]
    pub jobconfig: BTreeMap<String, JobConfig>,
}

impl EnvironmentConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("Config file is not located at {path:?}");
        }
        let raw =
            fs::read_to_string(path).with_context(|| format!("Reading config file {path:?}"))?;
        Self::from_json(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn job(&self, name: &str) -> Result<&JobConfig> {
        self.jobconfig.get(name).ok_or_else(|| {
            anyhow!(
                "Job '{name}' not found in jobconfig (available: {})",
                self.jobconfig.keys().join(", ")
            )
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub input: PathBuf,
    /// Output path; stdout when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub output_delimiter: Option<String>,
    #[serde(default)]
    pub input_encoding: Option<String>,
    #[serde(default = "default_true")]
    pub include_header: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_true() -> bool {
    true
}

/// One preparation operation applied to the working dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Bin {
        source: String,
        #[serde(default)]
        output: Option<String>,
        #[serde(default)]
        labels: Vec<String>,
        #[serde(default)]
        label_count: Option<usize>,
        #[serde(default)]
        edges: Option<Vec<f64>>,
        #[serde(default)]
        scale: BinScale,
        #[serde(default)]
        drop_source: bool,
    },
    BinExpand {
        source: String,
        #[serde(default)]
        labels: Vec<String>,
        #[serde(default)]
        label_count: Option<usize>,
        #[serde(default)]
        edges: Option<Vec<f64>>,
        #[serde(default)]
        scale: BinScale,
        #[serde(default = "default_true")]
        drop_source: bool,
    },
    Expand {
        field: String,
        #[serde(default = "default_true")]
        replace: bool,
        #[serde(default)]
        sort_labels: bool,
        #[serde(default)]
        order: Option<Vec<String>>,
    },
    FullExpand {
        fields: Vec<String>,
        #[serde(default = "default_true")]
        replace: bool,
        #[serde(default)]
        sort_labels: bool,
        #[serde(default)]
        order: Option<Vec<String>>,
    },
    Cast {
        field: String,
    },
    Clean {
        fields: Vec<String>,
        #[serde(default)]
        fill: Option<Value>,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Bin { .. } => "bin",
            Step::BinExpand { .. } => "bin_expand",
            Step::Expand { .. } => "expand",
            Step::FullExpand { .. } => "full_expand",
            Step::Cast { .. } => "cast",
            Step::Clean { .. } => "clean",
        }
    }
}

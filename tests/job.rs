mod common;

use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::json;

use common::{TestWorkspace, column, frame_prep, parse_csv};

const CUSTOMERS: &str = "\
name\tage\tregion
ann\t20\tnorth
bob\t40\t
cy\t60\tsouth
";

fn write_config(workspace: &TestWorkspace, input: &str, output: &str) -> std::path::PathBuf {
    let config = json!({
        "ioconfig": { "s3": { "username": "svc", "password": "ignored" } },
        "jobconfig": {
            "churn": {
                "input": workspace.path().join(input),
                "output": workspace.path().join(output),
                "delimiter": "tab",
                "output_delimiter": ",",
                "steps": [
                    { "op": "clean", "fields": ["region"], "fill": "unknown" },
                    { "op": "bin_expand", "source": "age", "labels": ["young", "old"] },
                    { "op": "expand", "field": "region", "sort_labels": true }
                ]
            }
        }
    });
    workspace.write("env.json", &config.to_string())
}

#[test]
fn run_applies_configured_steps_in_order() {
    let workspace = TestWorkspace::new();
    workspace.write("customers.tsv", CUSTOMERS);
    let config = write_config(&workspace, "customers.tsv", "prepared.csv");

    frame_prep()
        .args(["run", "-c", config.to_str().unwrap(), "-j", "churn"])
        .assert()
        .success();

    let (headers, rows) = parse_csv(&workspace.read("prepared.csv"));
    assert_eq!(
        headers,
        vec![
            "name",
            "age_bin_young",
            "age_bin_old",
            "region_NORTH",
            "region_SOUTH",
            "region_UNKNOWN",
        ]
    );
    assert_eq!(column(&headers, &rows, "age_bin_young"), vec!["1", "0", "0"]);
    assert_eq!(column(&headers, &rows, "age_bin_old"), vec!["0", "1", "1"]);
    assert_eq!(column(&headers, &rows, "region_UNKNOWN"), vec!["0", "1", "0"]);
}

#[test]
fn run_reports_unknown_job() {
    let workspace = TestWorkspace::new();
    workspace.write("customers.tsv", CUSTOMERS);
    let config = write_config(&workspace, "customers.tsv", "prepared.csv");

    frame_prep()
        .args(["run", "-c", config.to_str().unwrap(), "-j", "retention"])
        .assert()
        .failure()
        .stderr(contains("Job 'retention' not found").and(contains("available: churn")));
}

#[test]
fn run_reports_missing_config() {
    let workspace = TestWorkspace::new();
    let missing = workspace.path().join("absent.json");
    frame_prep()
        .args(["run", "-c", missing.to_str().unwrap(), "-j", "churn"])
        .assert()
        .failure()
        .stderr(contains("Config file is not located at"));
}

#[test]
fn run_names_the_failing_step() {
    let workspace = TestWorkspace::new();
    workspace.write("customers.tsv", CUSTOMERS);
    let config = json!({
        "jobconfig": {
            "broken": {
                "input": workspace.path().join("customers.tsv"),
                "steps": [
                    { "op": "cast", "field": "region" },
                    { "op": "bin", "source": "region", "label_count": 2 }
                ]
            }
        }
    });
    let config = workspace.write("env.json", &config.to_string());

    frame_prep()
        .args(["run", "-c", config.to_str().unwrap(), "-j", "broken"])
        .assert()
        .failure()
        .stderr(contains("Step 2 (bin)").and(contains("categorical")));
}

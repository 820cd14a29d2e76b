//! `panchanga compare` — reconcile two clean datasets.

use std::path::Path;

use panchanga_core::YearlyDataset;
use panchanga_recon::{reconcile, Category};

use crate::exit_codes;
use crate::report;
use crate::CliError;

pub(crate) fn cmd_compare(
    original: &Path,
    computed: &Path,
    threshold: f64,
    json: bool,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let original_ds = load_dataset(original)?;
    let computed_ds = load_dataset(computed)?;

    let result = reconcile(&original_ds, &computed_ds).map_err(|e| CliError {
        code: exit_codes::EXIT_COMPARE_PARSE,
        message: e.to_string(),
        hint: None,
    })?;

    let rendered = if json {
        serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::io(format!("cannot serialize result: {}", e)))?
    } else {
        report::render(&result, threshold)
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| {
                CliError::io(format!("cannot write {}: {}", path.display(), e))
            })?;
            eprintln!("report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    let exceeded = Category::ALL
        .iter()
        .any(|c| result.series(*c).over(threshold).next().is_some());
    if exceeded || result.has_diagnostics() {
        // The report already says what differed; only the exit code changes.
        return Err(CliError {
            code: exit_codes::EXIT_COMPARE_DIFFS,
            message: String::new(),
            hint: None,
        });
    }
    Ok(())
}

fn load_dataset(path: &Path) -> Result<YearlyDataset, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::usage(format!("cannot read {}: {}", path.display(), e)))?;
    YearlyDataset::from_json_str(&text).map_err(|e| CliError {
        code: exit_codes::EXIT_COMPARE_PARSE,
        message: format!("cannot parse {}: {}", path.display(), e),
        hint: None,
    })
}

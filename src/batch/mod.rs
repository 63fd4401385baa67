//! Batch effect correction through an external statistics process
//!
//! The correction itself (e.g. ComBat) runs out of process. This module only
//! owns the contract: which input files are accepted, where the output is
//! expected to land and how failure to run is reported.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::{Result, XpressError};

/// Accepted extensions of the tab-delimited input
const TAB_DELIMITED_EXTENSIONS: [&str; 2] = [".txt", ".tsv"];

/// Suffix of the corrected output file
const BATCHED_SUFFIX: &str = "_batched.tsv";

/// How to invoke the external batch correction script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Interpreter used to run the script
    pub interpreter: String,
    /// Script receiving `<input> <batch design> <output>`
    pub script: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            interpreter: "Rscript".to_string(),
            script: PathBuf::from("batch_normalize.r"),
        }
    }
}

impl BatchConfig {
    /// Load a config from a JSON file; missing keys take default values
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}

/// Output path for a batch-corrected input: `<input without extension>_batched.tsv`
pub fn batched_output_path<P: AsRef<Path>>(input: P) -> Result<PathBuf> {
    let input = input.as_ref();
    let unsupported = || XpressError::UnsupportedFormat {
        path: input.display().to_string(),
    };

    let name = input.to_str().ok_or_else(unsupported)?;
    let stem = TAB_DELIMITED_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .ok_or_else(unsupported)?;

    Ok(PathBuf::from(format!("{}{}", stem, BATCHED_SUFFIX)))
}

/// Run the external batch correction and return the expected output path
///
/// Blocks until the process exits. Failure to start the process or a
/// non-zero exit status is reported as `ExternalProcessFailed`; the output
/// file itself is not read or validated.
pub fn batch_normalize<P, Q>(input: P, batch_design: Q, config: &BatchConfig) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let batch_design = batch_design.as_ref();
    let output = batched_output_path(input)?;

    let command_line = format!(
        "{} {} {} {} {}",
        config.interpreter,
        config.script.display(),
        input.display(),
        batch_design.display(),
        output.display()
    );
    log::info!("Running batch correction: {}", command_line);

    let status = Command::new(&config.interpreter)
        .arg(&config.script)
        .arg(input)
        .arg(batch_design)
        .arg(&output)
        .status()
        .map_err(|e| XpressError::ExternalProcessFailed {
            command: command_line.clone(),
            status: e.to_string(),
        })?;

    if !status.success() {
        return Err(XpressError::ExternalProcessFailed {
            command: command_line,
            status: status.to_string(),
        });
    }

    Ok(output)
}

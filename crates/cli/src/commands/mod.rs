mod check;
mod decode;
mod names;

pub(crate) use check::cmd_check;
pub(crate) use decode::cmd_decode;
pub(crate) use names::cmd_names;

use std::path::{Path, PathBuf};
use std::process;

use mml_interchange::ModelDocument;

use crate::{report_error, OutputFormat};

/// Read and parse a JSON file.
pub(crate) fn read_json(path: &Path) -> Result<serde_json::Value, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: invalid JSON: {}", path.display(), e))
}

/// Load every file as a model document, exiting on the first failure.
pub(crate) fn load_models(
    files: &[PathBuf],
    output: OutputFormat,
    quiet: bool,
) -> Vec<ModelDocument> {
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let parsed = read_json(path).and_then(|value| {
            mml_interchange::from_interchange(&value)
                .map_err(|e| format!("{}: {}", path.display(), e))
        });
        match parsed {
            Ok(doc) => documents.push(doc),
            Err(msg) => {
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        }
    }
    log::info!("loaded {} model document(s)", documents.len());
    documents
}

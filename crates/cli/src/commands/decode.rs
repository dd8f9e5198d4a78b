use std::path::PathBuf;

use mml_render::RenderOptions;

use super::load_models;
use crate::OutputFormat;

pub(crate) fn cmd_decode(
    files: &[PathBuf],
    options: &RenderOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let documents = load_models(files, output, quiet);
    let texts = mml_render::decode(&documents, options);

    match output {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = files
                .iter()
                .zip(&texts)
                .map(|(file, text)| {
                    serde_json::json!({ "file": file.display().to_string(), "text": text })
                })
                .collect();
            let pretty = serde_json::to_string_pretty(&entries)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            let joined = texts.join("\n");
            print!("{}", joined);
        }
    }
}

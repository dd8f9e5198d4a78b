use std::path::PathBuf;

use mml_render::NameIndex;

use super::load_models;
use crate::OutputFormat;

pub(crate) fn cmd_names(files: &[PathBuf], output: OutputFormat, quiet: bool) {
    let documents = load_models(files, output, quiet);
    let index = NameIndex::build(&documents);

    match output {
        OutputFormat::Json => {
            // Keys keep the index's registration order.
            let map: serde_json::Map<String, serde_json::Value> = index
                .entries()
                .map(|(id, name)| (id.to_string(), serde_json::Value::from(name)))
                .collect();
            let pretty = serde_json::to_string_pretty(&map)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            for (id, name) in index.entries() {
                println!("{}\t{}", id, name);
            }
            if !quiet {
                eprintln!("{} name(s)", index.len());
            }
        }
    }
}

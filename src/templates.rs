use std::{fs, path::Path};

use anyhow::{Context, Result};

const PLACEHOLDER: &str = "{{bbox}}";

/// Every directory entry whose file name contains `ql`, in directory order.
pub fn list(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let name = entry?.file_name();
        let name = name.to_string_lossy();
        if name.contains("ql") {
            names.push(name.into_owned());
        }
    }

    Ok(names)
}

pub fn read(dir: &Path, name: &str) -> std::io::Result<String> {
    fs::read_to_string(dir.join(name))
}

/// Replaces every `{{bbox}}` in the template. A template without the
/// placeholder passes through unchanged.
pub fn substitute(template: &str, bbox: &str) -> String {
    template.replace(PLACEHOLDER, bbox)
}

/// Output file name for a template: first `ql` becomes `geojson`. This is a
/// plain substring swap, not extension-aware, and the files downstream are
/// named by it, so it stays that way.
pub fn output_name(template_name: &str) -> String {
    template_name.replacen("ql", "geojson", 1)
}

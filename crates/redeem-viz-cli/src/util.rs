use anyhow::Result;
use std::path::Path;

/// Check that `path` exists and carries one of `extensions` (case-insensitive).
pub fn validate_input_file<P: AsRef<Path>>(path: P, extensions: &[&str]) -> Result<()> {
    let path = path.as_ref();

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some(e) if extensions.contains(&e) => {}
        _ => anyhow::bail!(
            "File must have a {} extension: {}",
            extensions
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(" or "),
            path.display()
        ),
    }

    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    Ok(())
}

pub fn validate_tsv_or_csv_file<P: AsRef<Path>>(path: P) -> Result<()> {
    validate_input_file(path, &["tsv", "csv"])
}

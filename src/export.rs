use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

/// Write `text` verbatim as UTF-8, creating parent directories as needed.
pub fn write_draft(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to create {}: {e}", parent.display()),
            ))
        })?;
    }

    std::fs::write(path, text.as_bytes())?;
    info!(path = %path.display(), bytes = text.len(), "draft written");
    Ok(())
}

/// Read draft text from a file, or from stdin when `input` is `-`.
pub fn read_text(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(input)
        .map_err(|e| Error::Input(format!("failed to read {input}: {e}")))
}

use std::fs;
use std::path::Path;

use ablate_core::errors::{AblateError, ErrorInfo};

fn io_error(code: &str, path: &Path, err: std::io::Error) -> AblateError {
    AblateError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Reads a UTF-8 study artefact.
pub fn read_text(path: &Path) -> Result<String, AblateError> {
    fs::read_to_string(path).map_err(|err| io_error("artifact-read", path, err))
}

/// Writes a study artefact, creating parent directories as needed.
pub fn write_text(path: &Path, contents: &str) -> Result<(), AblateError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| io_error("artifact-mkdir", parent, err))?;
    }
    fs::write(path, contents).map_err(|err| io_error("artifact-write", path, err))
}

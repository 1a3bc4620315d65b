// ## 📂 File: `src/pipeline/io.rs`
// ## Normalized whole-file I/O for the coordinator

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::constants::OUTPUT_SUFFIX;
use crate::crypto::Operation;
use crate::types::StreamError;

/// Canonical input abstraction
#[derive(Debug, Clone)]
pub enum InputSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
#[derive(Debug, Clone)]
pub enum OutputSink {
    /// Write to this path.
    File(PathBuf),
    /// Derive the path from the input file name (`.out` rules).
    Derived,
    /// Return the bytes in the report.
    Memory,
}

impl InputSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            InputSource::File(p) => Some(p),
            InputSource::Memory(_) => None,
        }
    }
}

/// Load the whole input. Files that cannot be opened or read are
/// `FileUnreadable`.
pub fn read_input(src: InputSource) -> Result<Vec<u8>, StreamError> {
    match src {
        InputSource::Memory(bytes) => Ok(bytes),
        InputSource::File(path) => {
            let bytes = fs::read(&path).map_err(|source| StreamError::FileUnreadable {
                path: path.clone(),
                source,
            })?;
            debug!("[IO] read {} bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
    }
}

/// Output file name for `input`:
/// - encrypt appends `.out`
/// - decrypt strips a trailing `.out`, else reuses the input name
///
/// Works on the raw `OsStr`, so names that are not valid UTF-8 keep their bytes.
pub fn output_path_for(input: &Path, operation: Operation) -> PathBuf {
    match operation {
        Operation::Encrypt => {
            let mut name = input.as_os_str().to_owned();
            name.push(OUTPUT_SUFFIX);
            PathBuf::from(name)
        }
        // A file named just ".out" has no extension, so it is reused as is.
        Operation::Decrypt => match input.extension() {
            Some(ext) if ext == OUTPUT_SUFFIX.trim_start_matches('.') => input.with_extension(""),
            _ => input.to_path_buf(),
        },
    }
}

/// Resolve where the output goes, if anywhere.
pub fn resolve_output(
    sink: &OutputSink,
    input: &InputSource,
    operation: Operation,
) -> Result<Option<PathBuf>, StreamError> {
    match sink {
        OutputSink::File(p) => Ok(Some(p.clone())),
        OutputSink::Memory => Ok(None),
        OutputSink::Derived => input
            .path()
            .map(|p| Some(output_path_for(p, operation)))
            .ok_or_else(|| {
                StreamError::Validation("derived output name needs a file input".into())
            }),
    }
}

/// Write `data` to `path` so that either the complete file exists or
/// nothing new does: bytes go to a uniquely named temp file in the same
/// directory, which is renamed into place or deleted on drop.
pub fn write_output(path: &Path, data: &[u8]) -> Result<(), StreamError> {
    let unwritable = |source| StreamError::FileUnwritable {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(unwritable)?;
    tmp.write_all(data).map_err(unwritable)?;
    tmp.as_file().sync_all().map_err(unwritable)?;
    tmp.persist(path).map_err(|e| unwritable(e.error))?;

    debug!("[IO] wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

use std::path::{Path, PathBuf};

use onnxport_common::error::ConvertError;
use tokio::fs;
use tracing::debug;

/// Lists the regular files directly inside `dir`, sorted by name.
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| ConvertError::io("failed to read directory", dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ConvertError::io("failed to read directory", dir, e))?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| ConvertError::io("failed to stat", &path, e))?;
        if file_type.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Copies `files` into `dest`, creating it first. Existing files are overwritten.
pub async fn copy_into(files: &[PathBuf], dest: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    fs::create_dir_all(dest)
        .await
        .map_err(|e| ConvertError::io("failed to create directory", dest, e))?;

    let mut written = Vec::with_capacity(files.len());
    for src in files {
        let name = src.file_name().ok_or_else(|| {
            ConvertError::io(
                "cannot copy",
                src,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
        let target = dest.join(name);
        fs::copy(src, &target)
            .await
            .map_err(|e| ConvertError::io("failed to copy", src, e))?;
        debug!("copied {} -> {}", src.display(), target.display());
        written.push(target);
    }
    Ok(written)
}

use std::env;
use std::fs;
use std::path::{self, Path, PathBuf};

use super::error::Error;

/// Shape of a requested destination, determined by a single stat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// No destination given.
    CurrentDir,
    /// An existing regular file; its parent directory is used.
    File(PathBuf),
    /// Nothing exists at the path; it is created as a directory.
    Missing(PathBuf),
    /// An existing directory, used as is.
    Directory(PathBuf),
    /// Something else: device, socket, FIFO, dangling symlink, symlink loop.
    Special(PathBuf),
}

impl Destination {
    pub fn classify(destination: Option<&Path>) -> Self {
        let Some(path) = destination else {
            return Destination::CurrentDir;
        };
        let path = path.to_path_buf();

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Destination::File(path),
            Ok(meta) if meta.is_dir() => Destination::Directory(path),
            Ok(_) => Destination::Special(path),
            // A link that exists but cannot be followed.
            Err(_) if fs::symlink_metadata(&path).is_ok() => Destination::Special(path),
            Err(_) => Destination::Missing(path),
        }
    }

    /// Turns the classification into the directory inputs are written to.
    ///
    /// `Missing` creates exactly one directory and never its parents.
    pub fn resolve(self) -> Result<PathBuf, Error> {
        match self {
            Destination::CurrentDir => env::current_dir().map_err(|e| {
                Error::invalid_destination(".", format!("current directory unavailable: {}", e))
            }),
            Destination::File(file) => {
                let absolute = path::absolute(&file)
                    .map_err(|e| Error::invalid_destination(&file, e.to_string()))?;
                absolute.parent().map(Path::to_path_buf).ok_or_else(|| {
                    Error::invalid_destination(&file, "file has no parent directory")
                })
            }
            Destination::Missing(dir) => match fs::create_dir(&dir) {
                Ok(()) => {
                    tracing::debug!(path = %dir.display(), "created destination directory");
                    Ok(dir)
                }
                Err(source) => Err(Error::DirectoryCreationFailed { path: dir, source }),
            },
            Destination::Directory(dir) => Ok(dir),
            Destination::Special(path) => Err(Error::invalid_destination(
                path,
                "not a regular file or directory",
            )),
        }
    }
}

/// Resolves an optional destination argument to an output directory.
///
/// 1. absent: the current working directory
/// 2. an existing regular file: that file's directory
/// 3. a non-existent path: created (non-recursively) and used
/// 4. an existing directory: used directly
/// 5. anything else: [`Error::InvalidDestination`]
pub fn resolve_destination(destination: Option<&Path>) -> Result<PathBuf, Error> {
    let classified = Destination::classify(destination);
    tracing::debug!(?classified, "classified destination");
    classified.resolve()
}

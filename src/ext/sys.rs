use std::{
    io,
    fs::{self, File},
    path::{Path, PathBuf},
};
use crate::{
    Error,
    err::add_path,
    ext,
};

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    true
}

/// Returns true if `path` is a regular file that is either executable or can be opened for reading
/// (in which case it is treated as a script).
fn is_exe_or_script(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => is_executable(&meta) || File::open(path).is_ok(),
        _ => false,
    }
}

/// Locates an executable, configured under `entry`.
///
/// The value is accepted, if it names an existing executable or readable file, and is made absolute,
/// as tools are launched from other working directories.
/// Otherwise, if it has no directory component, it is searched in `PATH`.
/// Failure is logged and returned as `Error::NoExec`.
pub fn resolve_exe(entry: &str, value: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let value = value.as_ref();
    if is_exe_or_script(value) {
        return absolute(value);
    }
    let has_dir = value.parent().map(|parent| !parent.as_os_str().is_empty()).unwrap_or(false);
    if !has_dir && !value.as_os_str().is_empty() {
        if let Ok(found) = which::which(value) {
            return Ok(found);
        }
    }
    log::error!("{} path = {} not locatable in PATH or in the directory specified in the configuration file",
        entry, ext::fmt::path(value));
    Err(Error::NoExec(entry.to_owned(), value.to_owned()))
}

/// Create directory, if it does not exist yet.
pub fn mkdir(path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(add_path!(path))
    } else {
        Ok(())
    }
}

/// Returns absolute path, without requiring the file to exist, and without resolving symbolic links.
pub fn absolute(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        Ok(path.to_owned())
    } else {
        let cwd = std::env::current_dir().map_err(add_path!(!))?;
        Ok(if path == Path::new(".") { cwd } else { cwd.join(path) })
    }
}

/// RAII set of temporary files, that are removed (if present) when the guard is dropped.
pub struct TempFiles {
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn get(&self, i: usize) -> &Path {
        &self.paths[i]
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        for path in self.paths.iter() {
            match fs::remove_file(path) {
                Err(e) => {
                    // NotFound means that the file was never created.
                    if e.kind() != io::ErrorKind::NotFound {
                        log::error!("Could not remove temporary file {}: {}", ext::fmt::path(path), e);
                    }
                }
                Ok(()) => log::trace!("Removed temporary file {}", ext::fmt::path(path)),
            }
        }
    }
}

use std::{
    io,
    fmt::Write,
    path::PathBuf,
    process::ExitStatus,
};
use colored::Colorize;
use crate::ext;

/// Exit code: a subprocess could not be launched or returned non-zero status.
pub const SUBPROCESS_FAILED_EXIT: i32 = 10;
/// Exit code: a required executable could not be located.
pub const CANNOT_FIND_EXECUTABLE: i32 = 20;
/// Exit code: configuration file cannot be found or used.
pub const CANNOT_FIND_CONFIG: i32 = 30;

/// General enum, representing possible errors.
#[derive(Debug)]
pub enum Error {
    Io(io::Error, Vec<PathBuf>),
    /// Error, produced by an argument parser.
    Lexopt(lexopt::Error),
    /// Configuration file does not exist or cannot be read.
    NoConfig(PathBuf),
    /// Configuration file syntax error: `(filename, line number, description)`.
    ConfigParse(PathBuf, usize, String),
    /// Required configuration option is absent or null: `(section, option)`.
    MissingConfig(String, String),
    /// Executable not found: `(configuration entry, configured value)`.
    NoExec(String, PathBuf),
    /// Subprocess could not be started: `(tool, command, error)`.
    Launch(&'static str, String, io::Error),
    /// Subprocess finished with non-zero status: `(tool, command, status)`.
    Subprocess(&'static str, String, ExitStatus),
    InvalidInput(String),
    InvalidData(String),
    RuntimeError(String),
}

impl From<lexopt::Error> for Error {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

impl Error {
    /// Format error message.
    pub fn display(&self) -> String {
        let mut s = String::new();
        match self {
            Self::Io(e, files) => {
                write!(s, "{} in relation to ", "Input/Output error".red()).unwrap();
                if files.is_empty() {
                    write!(s, "unnamed streams").unwrap();
                } else {
                    write!(s, "{}", files.iter().map(|f| ext::fmt::path(f).cyan().to_string())
                        .collect::<Vec<_>>().join(", ")).unwrap();
                }
                write!(s, ": {}", e.kind()).unwrap();
                if let Some(e2) = e.get_ref() {
                    write!(s, ", {}", e2).unwrap();
                }
            }
            Self::Lexopt(e) => write!(s, "{} to parse command-line arguments: {}", "Failed".red(), e).unwrap(),
            Self::NoConfig(path) => write!(s, "{} {}", "Cannot read configuration file".red(),
                ext::fmt::path(path).cyan()).unwrap(),
            Self::ConfigParse(path, line, e) => write!(s, "{} in {}, line {}: {}", "Configuration error".red(),
                ext::fmt::path(path).cyan(), line, e).unwrap(),
            Self::MissingConfig(section, option) => write!(s, "{}: option {} in section [{}]",
                "Missing configuration".red(), option.cyan(), section).unwrap(),
            Self::NoExec(entry, path) => write!(s, "{} at {} (configuration entry {})",
                "Could not find executable".red(), ext::fmt::path(path).cyan(), entry).unwrap(),
            Self::Launch(tool, cmd, e) => write!(s, "{} {} failed to run {}: {}",
                "Subprocess error:".red(), tool, cmd, e).unwrap(),
            Self::Subprocess(tool, cmd, status) => write!(s, "{} {} finished with {} ({})",
                "Subprocess error:".red(), tool, status, cmd).unwrap(),
            Self::InvalidInput(e) => write!(s, "{}: {}", "Invalid input".red(), e).unwrap(),
            Self::InvalidData(e) => write!(s, "{}: {}", "Invalid data".red(), e).unwrap(),
            Self::RuntimeError(e) => write!(s, "{}: {}", "Runtime error".red(), e).unwrap(),
        };
        s
    }

    /// Process exit code, corresponding to this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Launch(..) | Self::Subprocess(..) => SUBPROCESS_FAILED_EXIT,
            Self::NoExec(..) => CANNOT_FIND_EXECUTABLE,
            Self::NoConfig(_) | Self::ConfigParse(..) | Self::MissingConfig(..) => CANNOT_FIND_CONFIG,
            _ => 1,
        }
    }
}

macro_rules! validate_param {
    ($cond:expr, $($arg:expr),+) => {{
        if !($cond) {
            (
                Err($crate::Error::InvalidInput(format!($($arg),+)))
            ?)
        }
    }};
}
pub(crate) use validate_param;

macro_rules! add_path {
    (!) => {
        |e| $crate::Error::Io(e, Vec::new())
    };
    ($path:expr) => {
        |e| $crate::Error::Io(e, vec![std::convert::AsRef::<std::path::Path>::as_ref(&$path).to_owned()])
    };
    ($($path:expr),+) => {
        |e| {
            let mut v = Vec::new();
            $(
                v.push(std::convert::AsRef::<std::path::Path>::as_ref(&$path).to_owned());
            )*
            $crate::Error::Io(e, v)
        }
    };
}
pub(crate) use add_path;

macro_rules! error {
    ($var:ident, $($arg:expr),+ $(,)?) => {
        $crate::Error::$var(format!($($arg),+))
    }
}
pub(crate) use error;

/// Wrapper around the standard result.
pub type Result<T> = std::result::Result<T, Error>;

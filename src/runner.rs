//! Running external tools.

use std::{
    fmt,
    fs::File,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};
use crate::{
    Error,
    err::add_path,
    ext,
};

/// Single invocation of an external tool.
#[derive(Clone, Debug)]
pub struct Cmd {
    /// Tool name, used in log messages.
    tool: &'static str,
    program: PathBuf,
    args: Vec<OsString>,
    /// Working directory of the child process.
    dir: Option<PathBuf>,
    /// If set, standard output is written to this file instead of the log.
    stdout: Option<PathBuf>,
}

impl Cmd {
    pub fn new(tool: &'static str, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            dir: None,
            stdout: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where I: IntoIterator<Item = S>,
          S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|arg| arg.as_ref().to_owned()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn stdout_to(mut self, filename: impl Into<PathBuf>) -> Self {
        self.stdout = Some(filename.into());
        self
    }

    pub fn tool(&self) -> &'static str {
        self.tool
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn get_stdout(&self) -> Option<&Path> {
        self.stdout.as_deref()
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&ext::fmt::command(self.program.as_os_str(), self.args.iter().map(OsString::as_os_str)))
    }
}

/// Something that can execute commands. Any failure stops the workflow.
pub trait Runner {
    fn run(&mut self, cmd: &Cmd) -> Result<(), Error>;
}

/// Runs commands as child processes, one at a time.
#[derive(Default, Debug, Clone)]
pub struct SysRunner {
    /// Additional environment variables for every child process.
    env: Vec<(String, String)>,
}

impl SysRunner {
    pub fn new(env: Vec<(String, String)>) -> Self {
        for (key, value) in env.iter() {
            log::debug!("Exporting {}={} to external tools", key, value);
        }
        Self { env }
    }
}

/// Logs all lines from the captured stream.
fn log_lines(tool: &str, stream_name: &str, bytes: &[u8], level: log::Level) {
    for line in String::from_utf8_lossy(bytes).lines() {
        log::log!(level, "{} {}: {}", tool, stream_name, line);
    }
}

impl Runner for SysRunner {
    fn run(&mut self, cmd: &Cmd) -> Result<(), Error> {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args)
            .envs(self.env.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &cmd.dir {
            command.current_dir(dir);
        }
        if let Some(filename) = &cmd.stdout {
            let f = File::create(filename).map_err(add_path!(filename))?;
            command.stdout(Stdio::from(f));
        } else {
            command.stdout(Stdio::piped());
        }
        log::debug!("Running {}: {}", cmd.tool, cmd);
        if let Some(dir) = &cmd.dir {
            log::trace!("    in {}", ext::fmt::path(dir));
        }

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                log::error!("{} failed to run {}", cmd.tool, cmd);
                return Err(Error::Launch(cmd.tool, cmd.to_string(), e));
            }
        };
        if !output.status.success() {
            log_lines(cmd.tool, "STDERR", &output.stderr, log::Level::Error);
            log::error!("{} failed ({}): {}", cmd.tool, output.status, cmd);
            return Err(Error::Subprocess(cmd.tool, cmd.to_string(), output.status));
        }
        log_lines(cmd.tool, "STDOUT", &output.stdout, log::Level::Info);
        log_lines(cmd.tool, "STDERR", &output.stderr, log::Level::Info);
        log::info!("Finished tool {}", cmd.tool);
        Ok(())
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn success_with_stdout_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let cmd = Cmd::new("echo", "sh")
            .args(["-c", "echo \"$GREETING\" $1; pwd >&2", "sh", "world"])
            .current_dir(dir.path())
            .stdout_to(&out);
        SysRunner::new(vec![("GREETING".to_owned(), "hello".to_owned())]).run(&cmd).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "hello world\n");
    }

    #[test]
    fn nonzero_exit() {
        let cmd = Cmd::new("failing", "sh").args(["-c", "echo oops >&2; exit 1"]);
        match SysRunner::default().run(&cmd) {
            Err(e @ Error::Subprocess(..)) => assert_eq!(e.exit_code(), crate::err::SUBPROCESS_FAILED_EXIT),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = Cmd::new("missing", dir.path().join("no-such-tool"));
        match SysRunner::default().run(&cmd) {
            Err(e @ Error::Launch(..)) => assert_eq!(e.exit_code(), crate::err::SUBPROCESS_FAILED_EXIT),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn display() {
        let cmd = Cmd::new("vcf_subset", "vcf-subset").args(["-f", "-c", "s1,s2"]).arg("in put.vcf");
        assert_eq!(cmd.to_string(), "vcf-subset -f -c s1,s2 'in put.vcf'");
    }
}

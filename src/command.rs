//! External tool invocation.
//!
//! Every media operation boils down to one blocking `ffmpeg` or `ffprobe`
//! run. [`Cmd`] collects the argument list, executes the tool to completion
//! and maps the failure modes into [`Error`].

use std::ffi::{OsStr, OsString};
use std::process::{Command, Output, Stdio};

use crate::{Error, Result};

pub(crate) const FFMPEG: &str = "ffmpeg";
pub(crate) const FFPROBE: &str = "ffprobe";

/// A single external tool invocation.
#[derive(Debug, Clone)]
pub(crate) struct Cmd {
    program: &'static str,
    args: Vec<OsString>,
}

impl Cmd {
    pub(crate) fn new(program: &'static str) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    /// An ffmpeg invocation. Seeds `-y` so existing outputs are overwritten
    /// instead of prompting, and `-loglevel error` so stderr carries only
    /// diagnostics.
    pub(crate) fn ffmpeg() -> Self {
        Self::new(FFMPEG).args(["-y", "-loglevel", "error"])
    }

    /// An ffprobe invocation.
    pub(crate) fn ffprobe() -> Self {
        Self::new(FFPROBE)
    }

    /// Append a single argument.
    pub(crate) fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append multiple arguments.
    pub(crate) fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run to completion, discarding stdout.
    pub(crate) fn run(self) -> Result<()> {
        self.output().map(|_| ())
    }

    /// Run to completion and return stdout decoded as UTF-8 text.
    pub(crate) fn run_captured(self) -> Result<String> {
        let program = self.program;
        let output = self.output()?;
        String::from_utf8(output.stdout)
            .map_err(|e| Error::parse_error(program, format!("invalid UTF-8: {e}")))
    }

    fn output(&self) -> Result<Output> {
        tracing::debug!("running {} {:?}", self.program, self.args);

        let output = Command::new(self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(self.program)
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed(self.program, stderr.trim().to_string()));
        }

        Ok(output)
    }
}

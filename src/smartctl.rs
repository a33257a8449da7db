use crate::{SmartmonError, SmartmonResult};
use std::borrow::Cow;
use std::process::Command;

/// Gateway to the smartctl binary.
///
/// Arguments go in, captured stdout comes out. Parsers only ever see the
/// returned text, which keeps the fragile text grammars testable without a
/// real drive.
pub trait SmartctlRunner {
    /// Run smartctl with `args`.
    ///
    /// With `tolerate_failure` the exit status is ignored and whatever was
    /// printed is returned; otherwise a non-zero exit is an error.
    fn run(&self, args: &[&str], tolerate_failure: bool) -> SmartmonResult<String>;
}

impl<R: SmartctlRunner + ?Sized> SmartctlRunner for &R {
    fn run(&self, args: &[&str], tolerate_failure: bool) -> SmartmonResult<String> {
        (**self).run(args, tolerate_failure)
    }
}

/// Runs the real smartctl binary
#[derive(Debug, Clone)]
pub struct SystemSmartctl {
    binary: String,
}

impl SystemSmartctl {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for SystemSmartctl {
    fn default() -> Self {
        Self::new("smartctl")
    }
}

impl SmartctlRunner for SystemSmartctl {
    fn run(&self, args: &[&str], tolerate_failure: bool) -> SmartmonResult<String> {
        tracing::debug!(binary = %self.binary, args = ?args, "Running smartctl");

        let output = Command::new(&self.binary).args(args).output()?;

        if !output.status.success() {
            if !tolerate_failure {
                return Err(SmartmonError::CommandFailed {
                    command: args.join(" "),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            tracing::debug!(args = ?args, status = %output.status, "Tolerating smartctl failure");
        }

        // Drive firmware strings are not always valid UTF-8
        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Cow::Owned(_) = stdout {
            tracing::debug!(args = ?args, "Replaced invalid UTF-8 in smartctl output");
        }

        Ok(stdout.into_owned())
    }
}

/// Version reported by `smartctl -V`, e.g. `7.2` from `smartctl 7.2 2020-12-30 r5155 ...`
pub fn smartctl_version<R: SmartctlRunner + ?Sized>(runner: &R) -> SmartmonResult<String> {
    let output = runner.run(&["-V"], false)?;
    parse_version(&output)
}

pub(crate) fn parse_version(output: &str) -> SmartmonResult<String> {
    output
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .ok_or_else(|| SmartmonError::InvalidOutput("smartctl -V printed no version".to_string()))
}

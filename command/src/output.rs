//! Output capability handed to commands.
//!
//! The command layer is the only place that writes; the parser returns data
//! and errors. [`StdOutput`] goes to the process streams, [`BufferOutput`]
//! keeps everything in memory.

use std::io::{self, Write};

use tracing::warn;

/// Two text sinks: normal output and diagnostics.
///
/// Each call returns once the text is written and flushed.
pub trait Output {
    fn write_out(&mut self, text: &str) -> io::Result<()>;
    fn write_err(&mut self, text: &str) -> io::Result<()>;
}

/// Writes to the process's stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdOutput;

impl Output for StdOutput {
    fn write_out(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }

    fn write_err(&mut self, text: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(text.as_bytes())?;
        stderr.flush()
    }
}

/// Collects both streams in memory.
///
/// # Examples
///
/// ```
/// use flagset_command::{BufferOutput, Output};
///
/// let mut out = BufferOutput::default();
/// out.write_out("hello\n").unwrap();
/// out.write_err("oops\n").unwrap();
/// assert_eq!(out.stdout, "hello\n");
/// assert_eq!(out.stderr, "oops\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferOutput {
    pub stdout: String,
    pub stderr: String,
}

impl Output for BufferOutput {
    fn write_out(&mut self, text: &str) -> io::Result<()> {
        self.stdout.push_str(text);
        Ok(())
    }

    fn write_err(&mut self, text: &str) -> io::Result<()> {
        self.stderr.push_str(text);
        Ok(())
    }
}

/// Writes to normal output; a failed write does not change the exit status.
pub(crate) fn emit_out(out: &mut dyn Output, text: &str) {
    if let Err(err) = out.write_out(text) {
        warn!(error = %err, "Failed to write output");
    }
}

/// Writes to diagnostic output; a failed write does not change the exit status.
pub(crate) fn emit_err(out: &mut dyn Output, text: &str) {
    if let Err(err) = out.write_err(text) {
        warn!(error = %err, "Failed to write error output");
    }
}

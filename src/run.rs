//! Building and running commands from options.

use std::path::PathBuf;

use tracing::debug;

use crate::{
	config::ProcessConfig,
	context::Context,
	error::{BuildError, Error},
	option::apply,
	options::{add_stderr, add_stdout, CommandOption},
	process::Command,
	stream::SharedBuffer,
};

/// Build a command for `program`, bound to `context`, by applying `options` in order.
///
/// If an option fails, no command is returned and nothing is spawned.
pub fn build<I>(
	context: Context,
	program: impl Into<PathBuf>,
	options: I,
) -> Result<Command, BuildError>
where
	I: IntoIterator<Item = CommandOption>,
{
	let config = ProcessConfig::new(program);
	let config = apply(config, options).map_err(|cause| {
		debug!(index = cause.index, %cause, "cannot build command");
		BuildError::from(cause)
	})?;

	Ok(Command::new(config, context))
}

/// Build a command and start it, without waiting for it to finish.
///
/// Must be called within a Tokio runtime.
pub fn start<I>(
	context: Context,
	program: impl Into<PathBuf>,
	options: I,
) -> Result<Command, Error>
where
	I: IntoIterator<Item = CommandOption>,
{
	let mut command = build(context, program, options)?;
	command.start()?;
	Ok(command)
}

/// Build a command, start it, and wait for it to finish.
///
/// The command is returned even if it exited unsuccessfully: check
/// [`Command::status()`] or [`Command::success()`].
pub async fn run<I>(
	context: Context,
	program: impl Into<PathBuf>,
	options: I,
) -> Result<Command, Error>
where
	I: IntoIterator<Item = CommandOption>,
{
	let mut command = build(context, program, options)?;
	command.run().await?;
	Ok(command)
}

/// Output captured by [`capture_output`].
#[derive(Debug)]
pub struct Captured {
	/// Everything the process wrote to its standard output.
	pub stdout: Vec<u8>,

	/// Everything the process wrote to its standard error.
	pub stderr: Vec<u8>,

	/// The command, or why it could not be built, started, or waited on.
	pub outcome: Result<Command, Error>,
}

impl Captured {
	/// Standard output, lossily decoded as UTF-8.
	#[must_use]
	pub fn stdout_lossy(&self) -> String {
		String::from_utf8_lossy(&self.stdout).into_owned()
	}

	/// Standard error, lossily decoded as UTF-8.
	#[must_use]
	pub fn stderr_lossy(&self) -> String {
		String::from_utf8_lossy(&self.stderr).into_owned()
	}
}

/// Run a command, capturing its output.
///
/// Capture is added after the given options, so output also goes to any configured sinks. The
/// captured bytes are returned even if the command failed, and then hold whatever was written
/// before the failure.
pub async fn capture_output<I>(
	context: Context,
	program: impl Into<PathBuf>,
	options: I,
) -> Captured
where
	I: IntoIterator<Item = CommandOption>,
{
	let stdout = SharedBuffer::new();
	let stderr = SharedBuffer::new();

	let options = options
		.into_iter()
		.chain([add_stdout(stdout.clone()), add_stderr(stderr.clone())]);
	let outcome = run(context, program, options).await;

	Captured {
		stdout: stdout.take(),
		stderr: stderr.take(),
		outcome,
	}
}

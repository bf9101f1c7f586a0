//! Error types.

use std::{io, path::PathBuf, time::Duration};

use miette::Diagnostic;
use thiserror::Error;
use tokio::task::JoinError;

use crate::context::Cancellation;

/// Type-erased error returned by options.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why an environment variable key was rejected.
#[derive(Clone, Debug, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvKeyError {
	/// The key is the empty string.
	#[error("environment variable key cannot be empty")]
	#[diagnostic(code(execopts::env::key_empty))]
	Empty,

	/// The key contains an `=`, which would be read as the separator.
	#[error("environment variable key cannot contain '=' character")]
	#[diagnostic(code(execopts::env::key_equals))]
	ContainsEquals,

	/// The key contains a NUL byte.
	#[error("environment variable key cannot contain null bytes")]
	#[diagnostic(code(execopts::env::key_nul))]
	ContainsNul,

	/// The key starts with something other than a letter or an underscore.
	#[error("environment variable key must start with letter or underscore, got: {0:?}")]
	#[diagnostic(code(execopts::env::key_leading))]
	InvalidLeadingCharacter(char),

	/// The key contains something other than letters, digits, and underscores.
	#[error("environment variable key can only contain letters, digits, and underscores, found invalid character {character:?} at position {position}")]
	#[diagnostic(code(execopts::env::key_character))]
	InvalidCharacter {
		/// The first offending character.
		character: char,

		/// Its zero-based character index in the key.
		position: usize,
	},
}

/// Why an environment variable value was rejected.
#[derive(Clone, Debug, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvValueError {
	/// The value contains a NUL byte.
	#[error("environment variable value cannot contain null bytes")]
	#[diagnostic(code(execopts::env::value_nul))]
	ContainsNul,
}

/// Error returned by [`add_env`](crate::options::add_env).
#[derive(Clone, Debug, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvError {
	/// The key is invalid.
	#[error("invalid environment variable key: {0}")]
	#[diagnostic(code(execopts::env::invalid_key))]
	Key(#[from] EnvKeyError),

	/// The value is invalid.
	#[error("invalid environment variable value: {0}")]
	#[diagnostic(code(execopts::env::invalid_value))]
	Value(#[from] EnvValueError),
}

/// An option failed to apply.
#[derive(Debug, Diagnostic, Error)]
#[error("failed to apply option {index}: {source}")]
#[diagnostic(code(execopts::option::apply))]
pub struct ApplyError {
	/// Zero-based position of the failing option in the sequence.
	pub index: usize,

	/// The error the option returned.
	#[source]
	pub source: BoxError,
}

/// A command could not be built because one of its options failed.
///
/// This is the only error [`build`](crate::build) returns, and no process is ever spawned when it
/// occurs.
#[derive(Debug, Diagnostic, Error)]
#[error("error building command: {cause}")]
#[diagnostic(code(execopts::build))]
pub struct BuildError {
	/// The option failure.
	#[source]
	pub cause: ApplyError,
}

impl BuildError {
	/// Position of the option that failed.
	#[must_use]
	pub const fn index(&self) -> usize {
		self.cause.index
	}

	/// Attempt to view the option's own error as a concrete type.
	#[must_use]
	pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
		self.cause.source.downcast_ref()
	}
}

impl From<ApplyError> for BuildError {
	fn from(cause: ApplyError) -> Self {
		Self { cause }
	}
}

/// Errors from building, spawning, or waiting on a command.
///
/// A process which runs and exits unsuccessfully is not an error: check
/// [`Command::status()`](crate::Command::status) instead.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Error {
	/// An option failed; no process was spawned.
	#[error(transparent)]
	#[diagnostic(transparent)]
	Build(#[from] BuildError),

	/// The OS could not spawn the process.
	#[error("cannot spawn {}: {err}", program.display())]
	#[diagnostic(code(execopts::spawn))]
	Spawn {
		/// The program that was being spawned.
		program: PathBuf,

		/// The underlying error.
		#[source]
		err: io::Error,
	},

	/// The context was cancelled or its deadline passed; the process was killed if it was running.
	#[error("command stopped: {0}")]
	#[diagnostic(code(execopts::cancelled))]
	Cancelled(Cancellation),

	/// The OS could not wait on the process.
	#[error("cannot wait on process: {0}")]
	#[diagnostic(code(execopts::wait))]
	Wait(#[source] io::Error),

	/// Generic I/O error, with some context.
	#[error("io({about}): {err}")]
	#[diagnostic(code(execopts::io_error))]
	Io {
		/// What it was about.
		about: &'static str,

		/// The I/O error which occurred.
		#[source]
		err: io::Error,
	},

	/// Output copying did not finish within the wait delay after the process exited.
	#[error("output not drained {0:?} after process exit")]
	#[diagnostic(code(execopts::wait_delay))]
	WaitDelay(Duration),

	/// An internal task panicked or was aborted.
	#[error("internal task join: {0}")]
	#[diagnostic(code(execopts::task_join))]
	TaskJoin(#[source] JoinError),

	/// The command was already started.
	#[error("command already started")]
	#[diagnostic(code(execopts::already_started))]
	AlreadyStarted,

	/// The command was waited on before being started.
	#[error("command not started")]
	#[diagnostic(code(execopts::not_started))]
	NotStarted,

	/// The command was already waited on.
	#[error("command already waited on")]
	#[diagnostic(code(execopts::already_waited))]
	AlreadyWaited,

	/// A configured feature is not available on this platform.
	#[error("unsupported on this platform: {0}")]
	#[diagnostic(code(execopts::unsupported))]
	Unsupported(&'static str),
}

/// A sink of a [`FanOut`](crate::stream::FanOut) failed.
///
/// This is carried inside the [`io::Error`] returned by the fan-out, with the same kind as the
/// sink's own error.
#[derive(Debug, Diagnostic, Error)]
#[error("fan-out sink {index} failed: {source}")]
#[diagnostic(code(execopts::stream::sink))]
pub struct SinkError {
	/// Registration index of the failing sink.
	pub index: usize,

	/// The sink's error.
	#[source]
	pub source: io::Error,
}

//! Configuration of a process before it is spawned.
//!
//! A [`ProcessConfig`] is created by [`build`](crate::build) and modified in place by
//! [options](crate::options). Its fields are public so that custom options, made with
//! [`Opt::new`](crate::option::Opt::new), can do anything the built-in ones can.

use std::{fmt, fs::File, path::PathBuf, time::Duration};

use crate::stream::{BoxedReader, BoxedWriter};

/// Everything needed to spawn a process.
pub struct ProcessConfig {
	/// The program to spawn: a path, or a name looked up in `PATH`.
	pub program: PathBuf,

	/// The argument list, including the conventional program name at index 0.
	///
	/// On Unix, the first element is passed as `argv[0]`; if the list is empty, the program is.
	/// Elsewhere the first element is skipped and the program name is always used.
	pub args: Vec<String>,

	/// The environment, as `KEY=VALUE` entries.
	///
	/// When `None`, the process inherits the environment of the current process. Otherwise, it
	/// gets exactly these variables: entries are split at the first `=`, entries without one are
	/// skipped, and later entries override earlier ones with the same key.
	pub env: Option<Vec<String>>,

	/// The working directory; the current directory when `None`.
	pub dir: Option<PathBuf>,

	/// Standard input; the null device when `None`.
	pub stdin: Option<BoxedReader>,

	/// Standard output; the null device when `None`.
	pub stdout: Option<BoxedWriter>,

	/// Standard error; the null device when `None`.
	pub stderr: Option<BoxedWriter>,

	/// Open files passed to the process after the standard streams.
	///
	/// Entry `i` is descriptor `3 + i` in the process. Unix only.
	pub extra_files: Vec<File>,

	/// Process group and session attributes.
	pub attributes: Option<ProcessAttributes>,

	/// How long to wait for output to be copied after the process exits.
	///
	/// When the process exits while a descendant still holds its output open, copying can go on
	/// indefinitely. With a delay set, copying is abandoned once it runs out.
	pub wait_delay: Option<Duration>,
}

impl ProcessConfig {
	/// A configuration running `program` with no arguments.
	pub fn new(program: impl Into<PathBuf>) -> Self {
		let program = program.into();
		Self {
			args: vec![program.to_string_lossy().into_owned()],
			program,
			env: None,
			dir: None,
			stdin: None,
			stdout: None,
			stderr: None,
			extra_files: Vec::new(),
			attributes: None,
			wait_delay: None,
		}
	}
}

impl fmt::Debug for ProcessConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProcessConfig")
			.field("program", &self.program)
			.field("args", &self.args)
			.field("env", &self.env)
			.field("dir", &self.dir)
			.field("stdin", &self.stdin.is_some())
			.field("stdout", &self.stdout.is_some())
			.field("stderr", &self.stderr.is_some())
			.field("extra_files", &self.extra_files)
			.field("attributes", &self.attributes)
			.field("wait_delay", &self.wait_delay)
			.finish()
	}
}

impl fmt::Display for ProcessConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.program.display())?;
		for arg in self.args.iter().skip(1) {
			write!(f, " {arg}")?;
		}

		Ok(())
	}
}

/// Process group and session attributes.
///
/// These only have an effect on Unix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProcessAttributes {
	/// Start the process in a new session (`setsid`), which also makes it a group leader.
	pub new_session: bool,

	/// Move the process to this process group (`setpgid`); `0` makes a new group led by it.
	///
	/// Ignored when `new_session` is set.
	pub process_group: Option<i32>,
}

impl ProcessAttributes {
	/// Attributes for a process in a new session.
	#[must_use]
	pub const fn new_session() -> Self {
		Self {
			new_session: true,
			process_group: None,
		}
	}

	/// Attributes for a process leading a new process group.
	#[must_use]
	pub const fn new_group() -> Self {
		Self {
			new_session: false,
			process_group: Some(0),
		}
	}
}

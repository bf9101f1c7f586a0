//! Options for configuring a process.
//!
//! Each function here returns an [`Opt`](crate::option::Opt) which modifies a
//! [`ProcessConfig`](crate::config::ProcessConfig) when applied. Options come in two flavours:
//!
//! - `set_*` options replace what is configured; applying one twice is the same as applying it
//!   once.
//! - `add_*` options combine with what is configured: arguments, variables, and files are
//!   appended, input sources are [chained](crate::stream::Chain) after the current one, and output
//!   sinks are [fanned out](crate::stream::FanOut) to alongside the current one.
//!
//! Only [`add_env`] validates its input; all others always succeed.

#[doc(inline)]
pub use self::{
	args::{add_args, set_args},
	environment::{add_env, set_env},
	process::{add_extra_files, set_dir, set_extra_files, set_process_attributes, set_wait_delay},
	streams::{
		add_stderr, add_stderrs, add_stdin, add_stdins, add_stdout, add_stdouts, set_stderr,
		set_stdin, set_stdout,
	},
};

use crate::{config::ProcessConfig, option::Opt};

mod args;
mod environment;
mod process;
mod streams;

/// An option for a [`ProcessConfig`].
pub type CommandOption = Opt<ProcessConfig>;

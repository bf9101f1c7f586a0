//! Build, start, and run processes from composable options.
//!
//! A command is described by a program name and a sequence of [options](options), each of which
//! modifies the [configuration](config::ProcessConfig) of the process before it is spawned:
//! arguments, environment, working directory, standard streams, extra file descriptors, process
//! group attributes, and how long to wait for output after exit.
//!
//! Options are applied in order. The first one to fail stops the build, and the error says which
//! option it was and why; no process is spawned in that case.
//!
//! # Usage
//!
//! The four entry points differ in how far they go:
//!
//! - [`build`] applies the options and returns a [`Command`] ready to be started;
//! - [`start`] also spawns the process, without waiting for it;
//! - [`run`] also waits for it to finish;
//! - [`capture_output`] runs it and returns what it wrote to stdout and stderr.
//!
//! All of them take a [`Context`](context::Context), which can be cancelled or given a deadline:
//! once it is done, the process is killed.
//!
//! ```no_run
//! # #[tokio::main(flavor = "current_thread")] async fn main() -> Result<(), execopts::Error> {
//! use execopts::{capture_output, context::Context, options::*};
//!
//! let captured = capture_output(
//! 	Context::background(),
//! 	"tr",
//! 	[
//! 		add_args(["[:upper:]", "[:lower:]"]),
//! 		add_env("KEY", "value"),
//! 		add_stdin(&b"Hello, "[..]),
//! 		add_stdin(&b"World"[..]),
//! 	],
//! )
//! .await;
//!
//! let command = captured.outcome?;
//! assert!(command.success());
//! assert_eq!(captured.stdout, b"hello, world");
//! # Ok(()) }
//! ```
//!
//! # Custom options
//!
//! Options are plain closures over the configuration, so anything not covered by the
//! [provided options](options) can be written directly:
//!
//! ```
//! # use execopts::{build, context::Context, options::CommandOption};
//! let no_args = CommandOption::try_new(|config| {
//! 	if config.args.len() > 1 {
//! 		Err("this command takes no arguments")
//! 	} else {
//! 		Ok(())
//! 	}
//! });
//!
//! let err = build(Context::background(), "date", [execopts::options::add_args(["-u"]), no_args])
//! 	.unwrap_err();
//! assert_eq!(err.index(), 1);
//! ```

#![warn(clippy::unwrap_used, missing_docs, rustdoc::unescaped_backticks)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(rust_2018_idioms)]

#[doc(inline)]
pub use crate::{
	error::{BuildError, Error},
	process::Command,
	run::{build, capture_output, run, start, Captured},
};

pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod option;
pub mod options;
pub mod stream;

mod process;
mod run;

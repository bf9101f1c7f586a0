//! Process handles.

use std::{fmt, process::ExitStatus, time::Instant};

use tokio::{sync::oneshot, task::JoinHandle};
use tracing::debug;

use crate::{config::ProcessConfig, context::Context, error::Error};

use self::supervise::{drain, feed, supervise, Outcome, Pumps};

mod spawn;
mod supervise;

/// A configured command, and the process running it once started.
///
/// Obtained from [`build`](crate::build), [`start`](crate::start), or [`run`](crate::run).
pub struct Command {
	config: ProcessConfig,
	context: Context,
	state: State,
}

enum State {
	Configured,
	Running {
		pid: Option<u32>,
		started: Instant,
		kill: Option<oneshot::Sender<()>>,
		supervisor: JoinHandle<Outcome>,
	},
	Finished {
		status: Option<ExitStatus>,
	},
}

impl Command {
	pub(crate) const fn new(config: ProcessConfig, context: Context) -> Self {
		Self {
			config,
			context,
			state: State::Configured,
		}
	}

	/// The configuration of this command.
	///
	/// Once the command is started, its standard streams have moved to the tasks copying them,
	/// and show as unset here.
	#[must_use]
	pub const fn config(&self) -> &ProcessConfig {
		&self.config
	}

	/// The context governing this command.
	#[must_use]
	pub const fn context(&self) -> &Context {
		&self.context
	}

	/// Whether the process was started.
	#[must_use]
	pub const fn is_started(&self) -> bool {
		!matches!(self.state, State::Configured)
	}

	/// The OS identifier of the process, while it is running.
	#[must_use]
	pub const fn id(&self) -> Option<u32> {
		match self.state {
			State::Running { pid, .. } => pid,
			_ => None,
		}
	}

	/// The exit status, once the process has been waited on.
	#[must_use]
	pub const fn status(&self) -> Option<ExitStatus> {
		match self.state {
			State::Finished { status } => status,
			_ => None,
		}
	}

	/// Whether the process was waited on and exited successfully.
	#[must_use]
	pub fn success(&self) -> bool {
		self.status().is_some_and(|status| status.success())
	}

	/// Spawn the process, without waiting for it.
	///
	/// Configured standard streams are connected to the process through background tasks, so
	/// this must be called within a Tokio runtime.
	pub fn start(&mut self) -> Result<(), Error> {
		if self.is_started() {
			return Err(Error::AlreadyStarted);
		}

		if let Some(reason) = self.context.err() {
			return Err(Error::Cancelled(reason));
		}

		let mut child = self.config.spawn()?;

		let pid = child.id();
		debug!(?pid, command=%self.config, "process spawned");

		let mut pumps = Pumps::default();
		if let (Some(pipe), Some(source)) = (child.stdin.take(), self.config.stdin.take()) {
			pumps.stdin = Some(tokio::spawn(feed(source, pipe)));
		}
		if let (Some(pipe), Some(sink)) = (child.stdout.take(), self.config.stdout.take()) {
			pumps.outputs.push(tokio::spawn(drain(pipe, sink)));
		}
		if let (Some(pipe), Some(sink)) = (child.stderr.take(), self.config.stderr.take()) {
			pumps.outputs.push(tokio::spawn(drain(pipe, sink)));
		}

		let (kill, killed) = oneshot::channel();
		let supervisor = tokio::spawn(supervise(
			child,
			pumps,
			self.context.clone(),
			self.config.wait_delay,
			killed,
		));

		self.state = State::Running {
			pid,
			started: Instant::now(),
			kill: Some(kill),
			supervisor,
		};
		Ok(())
	}

	/// Kill the process, if it is running.
	///
	/// This only sends the signal: use [`wait()`](Self::wait) to reap the process.
	pub fn kill(&mut self) {
		if let State::Running { kill, .. } = &mut self.state {
			if let Some(kill) = kill.take() {
				// if the supervisor is gone, the process is too
				let _ = kill.send(());
			}
		}
	}

	/// Wait for the process to exit and for its output to be copied.
	///
	/// An unsuccessful exit is not an error; the status is returned and kept for
	/// [`status()`](Self::status).
	///
	/// Dropping the returned future before it completes leaves the command running: it can still
	/// be killed and waited on again.
	pub async fn wait(&mut self) -> Result<ExitStatus, Error> {
		let (supervisor, started) = match &mut self.state {
			State::Running {
				supervisor,
				started,
				..
			} => (supervisor, *started),
			State::Configured => return Err(Error::NotStarted),
			State::Finished { .. } => return Err(Error::AlreadyWaited),
		};

		let joined = supervisor.await;
		let Outcome { status, error } = match joined {
			Ok(outcome) => outcome,
			Err(err) => {
				self.state = State::Finished { status: None };
				return Err(Error::TaskJoin(err));
			}
		};
		self.state = State::Finished { status };
		debug!(?status, elapsed=?started.elapsed(), "process finished");

		match (error, status) {
			(Some(err), _) => Err(err),
			(None, Some(status)) => Ok(status),
			(None, None) => Err(Error::NotStarted),
		}
	}

	/// Start the process and wait for it.
	pub async fn run(&mut self) -> Result<ExitStatus, Error> {
		self.start()?;
		self.wait().await
	}
}

impl fmt::Debug for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Command")
			.field("config", &self.config)
			.field("context", &self.context)
			.field("pid", &self.id())
			.field("status", &self.status())
			.finish_non_exhaustive()
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.config)
	}
}

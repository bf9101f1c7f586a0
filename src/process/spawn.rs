use std::process::Stdio;

use tokio::process::{Child, Command as TokioCommand};
use tracing::{trace, warn};

use crate::{config::ProcessConfig, error::Error};

impl ProcessConfig {
	/// Obtain a [`tokio::process::Command`] for this configuration.
	///
	/// Standard streams which are configured are piped, the others are connected to the null
	/// device. Connecting the pipes to the configured streams is up to the caller.
	pub fn to_spawnable(&self) -> Result<TokioCommand, Error> {
		trace!(config=?self, "constructing command");

		let mut cmd = TokioCommand::new(&self.program);
		if let Some((argv0, args)) = self.args.split_first() {
			#[cfg(unix)]
			cmd.arg0(argv0);
			#[cfg(not(unix))]
			let _ = argv0;
			cmd.args(args);
		}

		if let Some(env) = &self.env {
			cmd.env_clear();
			for entry in env {
				match entry.split_once('=') {
					Some((key, value)) => {
						cmd.env(key, value);
					}
					None => warn!(?entry, "skipping environment entry without '='"),
				}
			}
		}

		if let Some(dir) = &self.dir {
			cmd.current_dir(dir);
		}

		cmd.stdin(piped_if(self.stdin.is_some()));
		cmd.stdout(piped_if(self.stdout.is_some()));
		cmd.stderr(piped_if(self.stderr.is_some()));

		#[cfg(unix)]
		unix::pre_exec(&mut cmd, self);

		#[cfg(not(unix))]
		{
			if !self.extra_files.is_empty() {
				return Err(Error::Unsupported("passing extra files"));
			}
			if self.attributes.is_some() {
				warn!("process attributes are only supported on unix, ignoring");
			}
		}

		Ok(cmd)
	}

	/// Spawn a process for this configuration.
	///
	/// On Unix, the descriptors extra files will be moved to are kept occupied in this process
	/// during the spawn, so that nothing the child needs while starting up, like the pipe which
	/// reports a failed exec, is allocated there. Another thread closing a descriptor in that
	/// range at the same moment can still defeat this.
	pub(crate) fn spawn(&self) -> Result<Child, Error> {
		let mut cmd = self.to_spawnable()?;

		#[cfg(unix)]
		let _reserved =
			unix::reserve_descriptors(self.extra_files.len()).map_err(|err| Error::Io {
				about: "reserving descriptors for extra files",
				err,
			})?;

		cmd.spawn().map_err(|err| Error::Spawn {
			program: self.program.clone(),
			err,
		})
	}
}

fn piped_if(configured: bool) -> Stdio {
	if configured {
		Stdio::piped()
	} else {
		Stdio::null()
	}
}

#[cfg(unix)]
mod unix {
	use std::{
		fs::File,
		io,
		os::fd::{AsRawFd, RawFd},
	};

	use nix::{
		errno::Errno,
		libc,
		sys::signal::{sigprocmask, SigSet, SigmaskHow, Signal},
		unistd::{setpgid, setsid, Pid},
	};
	use tokio::process::Command as TokioCommand;
	use tracing::trace;

	use crate::config::ProcessConfig;

	/// Occupy every free descriptor below `3 + count`, until the returned files are dropped.
	///
	/// Descriptors are allocated lowest first, so once these are held, the next ones opened are
	/// all above the range extra files are installed into.
	pub fn reserve_descriptors(count: usize) -> io::Result<Vec<File>> {
		let mut reserved = Vec::new();
		if count == 0 {
			return Ok(reserved);
		}

		let limit = 3 + count;
		loop {
			let placeholder = File::open("/dev/null")?;
			if usize::try_from(placeholder.as_raw_fd()).map_or(true, |fd| fd >= limit) {
				break;
			}
			reserved.push(placeholder);
		}

		trace!(count = reserved.len(), limit, "reserved descriptors for extra files");
		Ok(reserved)
	}

	/// Install the hook which runs in the child between fork and exec.
	///
	/// Only async-signal-safe calls are allowed in there: anything that allocates is prepared
	/// beforehand.
	pub fn pre_exec(cmd: &mut TokioCommand, config: &ProcessConfig) {
		let attributes = config.attributes;
		let files: Vec<RawFd> = config.extra_files.iter().map(AsRawFd::as_raw_fd).collect();
		let mut scratch = files.clone();

		// SAFETY: the closure only makes raw syscalls and writes into preallocated memory
		unsafe {
			cmd.pre_exec(move || {
				reset_sigmask()?;

				if let Some(attributes) = attributes {
					if attributes.new_session {
						setsid()?;
					} else if let Some(group) = attributes.process_group {
						setpgid(Pid::from_raw(0), Pid::from_raw(group))?;
					}
				}

				remap_descriptors(&files, &mut scratch)?;
				Ok(())
			});
		}
	}

	/// Resets the sigmask of the process before it execs.
	///
	/// Required from Rust 1.66: <https://github.com/rust-lang/rust/pull/101077>
	fn reset_sigmask() -> nix::Result<()> {
		let mut newset = SigSet::all();
		newset.remove(Signal::SIGHUP); // leave SIGHUP alone so nohup works
		sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&newset), None)
	}

	/// Make `files[i]` available as descriptor `3 + i`.
	///
	/// Descriptors are first moved above the target range so that installing one cannot clobber
	/// another which is yet to be installed.
	fn remap_descriptors(files: &[RawFd], scratch: &mut [RawFd]) -> nix::Result<()> {
		if files.is_empty() {
			return Ok(());
		}

		let first = libc::STDERR_FILENO + 1;
		let above = first + RawFd::try_from(files.len()).map_err(|_| Errno::EMFILE)?;

		for (moved, &fd) in scratch.iter_mut().zip(files) {
			// SAFETY: plain syscall on a descriptor we own
			*moved = Errno::result(unsafe { libc::fcntl(fd, libc::F_DUPFD_CLOEXEC, above) })?;
		}

		for (target, &moved) in (first..).zip(scratch.iter()) {
			// dup2 clears close-on-exec on the target
			// SAFETY: plain syscall on descriptors we own
			Errno::result(unsafe { libc::dup2(moved, target) })?;
		}

		Ok(())
	}
}

use std::{io, process::ExitStatus, time::Duration};

use futures::future::join_all;
use tokio::{
	io::{AsyncRead, AsyncWrite, AsyncWriteExt},
	process::Child,
	sync::oneshot,
	task::JoinHandle,
	time::timeout,
};
use tracing::{debug, trace, warn};

use crate::{
	context::Context,
	error::Error,
	stream::{BoxedReader, BoxedWriter},
};

/// The tasks copying between configured streams and the child's pipes.
#[derive(Debug, Default)]
pub struct Pumps {
	pub stdin: Option<JoinHandle<io::Result<()>>>,
	pub outputs: Vec<JoinHandle<io::Result<()>>>,
}

/// What the supervisor reports: the exit status, and the first error if something went wrong.
#[derive(Debug)]
pub struct Outcome {
	pub status: Option<ExitStatus>,
	pub error: Option<Error>,
}

enum Stop {
	Exited(io::Result<ExitStatus>),
	Cancelled(crate::context::Cancellation),
	Killed,
}

/// Feed `source` into the child's standard input, then close it.
pub async fn feed<W>(mut source: BoxedReader, mut pipe: W) -> io::Result<()>
where
	W: AsyncWrite + Unpin,
{
	let result = match tokio::io::copy(&mut source, &mut pipe).await {
		Ok(bytes) => {
			trace!(bytes, "stdin fed");
			pipe.shutdown().await
		}
		Err(err) => Err(err),
	};

	match result {
		// the child closed its end, it doesn't want more input
		Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
		other => other,
	}
}

/// Copy one of the child's output pipes into `sink`.
///
/// The sink is flushed but not shut down: it may be shared with other processes, or be the
/// current process's own output.
pub async fn drain<R>(mut pipe: R, mut sink: BoxedWriter) -> io::Result<()>
where
	R: AsyncRead + Unpin,
{
	let bytes = tokio::io::copy(&mut pipe, &mut sink).await?;
	trace!(bytes, "output drained");
	sink.flush().await
}

/// Wait for the child to exit, kill it if the context is done or if asked to, then wait for the
/// output pumps to finish.
pub async fn supervise(
	mut child: Child,
	pumps: Pumps,
	context: Context,
	wait_delay: Option<Duration>,
	mut kill: oneshot::Receiver<()>,
) -> Outcome {
	let stop = tokio::select! {
		waited = child.wait() => Stop::Exited(waited),
		reason = context.done() => Stop::Cancelled(reason),
		Ok(()) = &mut kill => Stop::Killed,
	};

	let mut cancelled = None;
	let waited = match stop {
		Stop::Exited(waited) => waited,
		Stop::Cancelled(reason) => {
			debug!(pid=?child.id(), %reason, "context done, killing process");
			cancelled = Some(reason);
			kill_and_wait(&mut child).await
		}
		Stop::Killed => {
			debug!(pid=?child.id(), "killing process");
			kill_and_wait(&mut child).await
		}
	};
	trace!(?waited, "process ended");

	let mut pumped = Ok(());
	if let Some(stdin) = pumps.stdin {
		if stdin.is_finished() {
			pumped = joined(stdin.await, "copying to stdin");
		} else {
			trace!("abandoning stdin after process exit");
			stdin.abort();
		}
	}

	let drained = finish(pumps.outputs, wait_delay).await;

	let status = match waited {
		Ok(status) => status,
		Err(err) => {
			return Outcome {
				status: None,
				error: Some(Error::Wait(err)),
			}
		}
	};

	let error = cancelled
		.map(Error::Cancelled)
		.or_else(|| pumped.err())
		.or_else(|| drained.err());

	Outcome {
		status: Some(status),
		error,
	}
}

async fn kill_and_wait(child: &mut Child) -> io::Result<ExitStatus> {
	if let Err(err) = child.start_kill() {
		// most likely already exited, which wait() will tell
		warn!(%err, "cannot kill process");
	}

	child.wait().await
}

/// Wait for output pumps, for at most `wait_delay` if set.
async fn finish(
	outputs: Vec<JoinHandle<io::Result<()>>>,
	wait_delay: Option<Duration>,
) -> Result<(), Error> {
	let aborts: Vec<_> = outputs.iter().map(JoinHandle::abort_handle).collect();
	let joining = join_all(outputs);

	let results = match wait_delay {
		None => joining.await,
		Some(delay) => {
			if let Ok(results) = timeout(delay, joining).await {
				results
			} else {
				warn!(?delay, "output still open after wait delay, abandoning it");
				for abort in aborts {
					abort.abort();
				}
				return Err(Error::WaitDelay(delay));
			}
		}
	};

	results
		.into_iter()
		.map(|result| joined(result, "copying process output"))
		.collect()
}

fn joined(
	result: Result<io::Result<()>, tokio::task::JoinError>,
	about: &'static str,
) -> Result<(), Error> {
	match result {
		Ok(Ok(())) => Ok(()),
		Ok(Err(err)) => {
			debug!(%err, about, "stream copy failed");
			Err(Error::Io { about, err })
		}
		Err(err) => Err(Error::TaskJoin(err)),
	}
}

use tokio::io::{AsyncRead, AsyncWrite};

use crate::stream::{BoxedReader, BoxedWriter, Chain, FanOut};

use super::CommandOption;

/// Replace standard input.
pub fn set_stdin(stdin: impl AsyncRead + Send + Unpin + 'static) -> CommandOption {
	let stdin: BoxedReader = Box::new(stdin);
	CommandOption::new(move |config| {
		config.stdin = Some(stdin);
		Ok(())
	})
}

/// Read standard input from `stdin` after whatever is already configured.
pub fn add_stdin(stdin: impl AsyncRead + Send + Unpin + 'static) -> CommandOption {
	add_stdins([Box::new(stdin) as BoxedReader])
}

/// Read standard input from each of `stdins`, in order, after whatever is already configured.
pub fn add_stdins(stdins: impl IntoIterator<Item = BoxedReader>) -> CommandOption {
	let stdins: Vec<BoxedReader> = stdins.into_iter().collect();
	CommandOption::new(move |config| {
		let sources = config.stdin.take().into_iter().chain(stdins);
		set_stdin(Chain::new(sources)).apply(config)
	})
}

/// Replace standard output.
pub fn set_stdout(stdout: impl AsyncWrite + Send + Unpin + 'static) -> CommandOption {
	let stdout: BoxedWriter = Box::new(stdout);
	CommandOption::new(move |config| {
		config.stdout = Some(stdout);
		Ok(())
	})
}

/// Also write standard output to `stdout`.
pub fn add_stdout(stdout: impl AsyncWrite + Send + Unpin + 'static) -> CommandOption {
	add_stdouts([Box::new(stdout) as BoxedWriter])
}

/// Also write standard output to each of `stdouts`.
///
/// Sinks receive output in order: whatever was already configured first.
pub fn add_stdouts(stdouts: impl IntoIterator<Item = BoxedWriter>) -> CommandOption {
	let stdouts: Vec<BoxedWriter> = stdouts.into_iter().collect();
	CommandOption::new(move |config| {
		let sinks = config.stdout.take().into_iter().chain(stdouts);
		set_stdout(FanOut::new(sinks)).apply(config)
	})
}

/// Replace standard error.
pub fn set_stderr(stderr: impl AsyncWrite + Send + Unpin + 'static) -> CommandOption {
	let stderr: BoxedWriter = Box::new(stderr);
	CommandOption::new(move |config| {
		config.stderr = Some(stderr);
		Ok(())
	})
}

/// Also write standard error to `stderr`.
pub fn add_stderr(stderr: impl AsyncWrite + Send + Unpin + 'static) -> CommandOption {
	add_stderrs([Box::new(stderr) as BoxedWriter])
}

/// Also write standard error to each of `stderrs`.
///
/// Sinks receive output in order: whatever was already configured first.
pub fn add_stderrs(stderrs: impl IntoIterator<Item = BoxedWriter>) -> CommandOption {
	let stderrs: Vec<BoxedWriter> = stderrs.into_iter().collect();
	CommandOption::new(move |config| {
		let sinks = config.stderr.take().into_iter().chain(stderrs);
		set_stderr(FanOut::new(sinks)).apply(config)
	})
}

use std::{
	fmt,
	io,
	pin::Pin,
	task::{ready, Context, Poll},
};

use tokio::io::AsyncWrite;

use super::BoxedWriter;
use crate::error::SinkError;

/// Copies every write to all its sinks, in order.
///
/// A write is accepted into an internal buffer, which is then delivered in full to the first
/// sink, then the second, and so on. No new bytes are accepted until the buffer has reached every
/// sink, so all sinks see the same bytes in the same order.
///
/// If a sink fails, delivery of the current chunk stops there: the sinks after it do not receive
/// it, the chunk is discarded, and the error is returned with a [`SinkError`] inside, naming the
/// sink. Without any sinks, writes are discarded.
pub struct FanOut {
	sinks: Vec<BoxedWriter>,
	pending: Vec<u8>,
	sink: usize,
	offset: usize,
	closed: usize,
}

impl FanOut {
	/// Fan out to sinks in the given order.
	pub fn new(sinks: impl IntoIterator<Item = BoxedWriter>) -> Self {
		Self {
			sinks: sinks.into_iter().collect(),
			pending: Vec::new(),
			sink: 0,
			offset: 0,
			closed: 0,
		}
	}

	/// How many sinks writes go to.
	#[must_use]
	pub fn len(&self) -> usize {
		self.sinks.len()
	}

	/// Whether there are no sinks.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.sinks.is_empty()
	}

	fn reset(&mut self) {
		self.pending.clear();
		self.sink = 0;
		self.offset = 0;
	}

	fn fail(&mut self, index: usize, source: io::Error) -> io::Error {
		self.reset();
		io::Error::new(source.kind(), SinkError { index, source })
	}

	fn poll_deliver(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
		while !self.pending.is_empty() && self.sink < self.sinks.len() {
			let index = self.sink;
			let written = match ready!(
				Pin::new(&mut self.sinks[index]).poll_write(cx, &self.pending[self.offset..])
			) {
				Ok(0) => return Poll::Ready(Err(self.fail(index, io::ErrorKind::WriteZero.into()))),
				Ok(n) => n,
				Err(err) => return Poll::Ready(Err(self.fail(index, err))),
			};

			self.offset += written;
			if self.offset >= self.pending.len() {
				self.sink += 1;
				self.offset = 0;
			}
		}

		self.reset();
		Poll::Ready(Ok(()))
	}
}

impl fmt::Debug for FanOut {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FanOut")
			.field("sinks", &self.sinks.len())
			.field("pending", &self.pending.len())
			.finish()
	}
}

impl AsyncWrite for FanOut {
	fn poll_write(
		self: Pin<&mut Self>,
		cx: &mut Context<'_>,
		buf: &[u8],
	) -> Poll<io::Result<usize>> {
		let this = self.get_mut();
		ready!(this.poll_deliver(cx))?;

		if buf.is_empty() || this.sinks.is_empty() {
			return Poll::Ready(Ok(buf.len()));
		}

		this.pending.extend_from_slice(buf);
		match this.poll_deliver(cx) {
			Poll::Ready(Err(err)) => Poll::Ready(Err(err)),
			// accepted: the rest is delivered on the next write, flush, or shutdown
			Poll::Ready(Ok(())) | Poll::Pending => Poll::Ready(Ok(buf.len())),
		}
	}

	fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
		let this = self.get_mut();
		ready!(this.poll_deliver(cx))?;

		for (index, sink) in this.sinks.iter_mut().enumerate() {
			if let Err(source) = ready!(Pin::new(sink).poll_flush(cx)) {
				return Poll::Ready(Err(io::Error::new(
					source.kind(),
					SinkError { index, source },
				)));
			}
		}

		Poll::Ready(Ok(()))
	}

	fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
		let this = self.get_mut();
		ready!(this.poll_deliver(cx))?;

		while this.closed < this.sinks.len() {
			let index = this.closed;
			if let Err(source) = ready!(Pin::new(&mut this.sinks[index]).poll_shutdown(cx)) {
				return Poll::Ready(Err(io::Error::new(
					source.kind(),
					SinkError { index, source },
				)));
			}
			this.closed += 1;
		}

		Poll::Ready(Ok(()))
	}
}

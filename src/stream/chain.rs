use std::{
	collections::VecDeque,
	fmt,
	io,
	pin::Pin,
	task::{ready, Context, Poll},
};

use tokio::io::{AsyncRead, ReadBuf};

use super::BoxedReader;

/// Reads each source to the end, in order, then ends.
pub struct Chain {
	sources: VecDeque<BoxedReader>,
}

impl Chain {
	/// Chain sources in the given order.
	pub fn new(sources: impl IntoIterator<Item = BoxedReader>) -> Self {
		Self {
			sources: sources.into_iter().collect(),
		}
	}

	/// How many sources have not been read to the end yet.
	#[must_use]
	pub fn remaining(&self) -> usize {
		self.sources.len()
	}
}

impl fmt::Debug for Chain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Chain")
			.field("remaining", &self.sources.len())
			.finish()
	}
}

impl AsyncRead for Chain {
	fn poll_read(
		self: Pin<&mut Self>,
		cx: &mut Context<'_>,
		buf: &mut ReadBuf<'_>,
	) -> Poll<io::Result<()>> {
		let this = self.get_mut();
		if buf.remaining() == 0 {
			return Poll::Ready(Ok(()));
		}

		while let Some(source) = this.sources.front_mut() {
			let before = buf.filled().len();
			ready!(Pin::new(source).poll_read(cx, buf))?;
			if buf.filled().len() > before {
				return Poll::Ready(Ok(()));
			}

			// nothing read into a non-full buffer: this source is done
			this.sources.pop_front();
		}

		Poll::Ready(Ok(()))
	}
}

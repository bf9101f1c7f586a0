use std::{
	io,
	pin::Pin,
	sync::{Arc, Mutex, MutexGuard, PoisonError},
	task::{Context, Poll},
};

use tokio::io::AsyncWrite;

/// An in-memory sink which can be read from while another clone is written to.
///
/// Used to capture process output; clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
	/// An empty buffer.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
		// a panicking writer leaves plain bytes behind, still fine to read
		self.0.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Copy the bytes written so far.
	#[must_use]
	pub fn contents(&self) -> Vec<u8> {
		self.lock().clone()
	}

	/// Take the bytes written so far, leaving the buffer empty.
	#[must_use]
	pub fn take(&self) -> Vec<u8> {
		std::mem::take(&mut *self.lock())
	}

	/// How many bytes are in the buffer.
	#[must_use]
	pub fn len(&self) -> usize {
		self.lock().len()
	}

	/// Whether the buffer is empty.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}
}

impl AsyncWrite for SharedBuffer {
	fn poll_write(
		self: Pin<&mut Self>,
		_cx: &mut Context<'_>,
		buf: &[u8],
	) -> Poll<io::Result<usize>> {
		self.lock().extend_from_slice(buf);
		Poll::Ready(Ok(buf.len()))
	}

	fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
		Poll::Ready(Ok(()))
	}

	fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
		Poll::Ready(Ok(()))
	}
}

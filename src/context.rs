//! Cancellation and deadlines for commands.
//!
//! A [`Context`] governs the lifetime of the processes started with it: once it is cancelled or
//! its deadline passes, running processes are killed and waiting on them fails with
//! [`Error::Cancelled`](crate::Error::Cancelled).
//!
//! Contexts are cheap to clone and are derived from one another: a context derived with
//! [`Context::with_cancel`] or [`Context::with_timeout`] is done as soon as its parent is.

use std::{fmt, future::pending, time::Duration};

use futures::future::select_all;
use tokio::{
	sync::watch,
	time::{sleep_until, Instant},
};

/// Why a context is done.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cancellation {
	/// A [`CancelHandle`] was triggered.
	Cancelled,

	/// The deadline passed.
	DeadlineExceeded,
}

impl fmt::Display for Cancellation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Cancelled => write!(f, "context cancelled"),
			Self::DeadlineExceeded => write!(f, "context deadline exceeded"),
		}
	}
}

/// Execution context for commands.
#[derive(Clone, Debug, Default)]
pub struct Context {
	cancels: Vec<watch::Receiver<bool>>,
	deadline: Option<Instant>,
}

/// Cancels the context it was created with, and all contexts derived from it.
///
/// Dropping the handle does _not_ cancel.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
	/// Cancel the context.
	pub fn cancel(&self) {
		self.0.send_replace(true);
	}
}

impl Context {
	/// A context which is never done.
	#[must_use]
	pub fn background() -> Self {
		Self::default()
	}

	/// Derive a context which can be cancelled with the returned handle.
	#[must_use]
	pub fn with_cancel(&self) -> (Self, CancelHandle) {
		let (sender, receiver) = watch::channel(false);
		let mut child = self.clone();
		child.cancels.push(receiver);
		(child, CancelHandle(sender))
	}

	/// Derive a context which is done after `timeout`, or earlier if this one is.
	#[must_use]
	pub fn with_timeout(&self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Derive a context which is done at `deadline`, or earlier if this one is.
	#[must_use]
	pub fn with_deadline(&self, deadline: Instant) -> Self {
		let mut child = self.clone();
		child.deadline = Some(self.deadline.map_or(deadline, |own| own.min(deadline)));
		child
	}

	/// The deadline of this context, if any.
	#[must_use]
	pub const fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Whether the context is done, and why.
	#[must_use]
	pub fn err(&self) -> Option<Cancellation> {
		if self.cancels.iter().any(|cancel| *cancel.borrow()) {
			Some(Cancellation::Cancelled)
		} else if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
			Some(Cancellation::DeadlineExceeded)
		} else {
			None
		}
	}

	/// Resolves when the context is done.
	///
	/// Never resolves for a [`background`](Self::background) context.
	pub async fn done(&self) -> Cancellation {
		if let Some(reason) = self.err() {
			return reason;
		}

		let cancelled = async {
			if self.cancels.is_empty() {
				return pending().await;
			}

			select_all(self.cancels.iter().cloned().map(|mut cancel| {
				Box::pin(async move {
					let dropped = cancel.wait_for(|cancelled| *cancelled).await.is_err();
					if dropped {
						// a dropped handle can never cancel
						pending::<()>().await;
					}
				})
			}))
			.await;
		};

		let expired = async {
			match self.deadline {
				Some(deadline) => sleep_until(deadline).await,
				None => pending().await,
			}
		};

		tokio::select! {
			() = cancelled => Cancellation::Cancelled,
			() = expired => Cancellation::DeadlineExceeded,
		}
	}
}

#[cfg(test)]
mod test {
	use std::time::Duration;

	use super::*;

	#[test]
	fn background_is_never_done() {
		assert_eq!(Context::background().err(), None);
		assert_eq!(Context::background().deadline(), None);
	}

	#[tokio::test]
	async fn cancel_reaches_derived_contexts() {
		let (parent, cancel) = Context::background().with_cancel();
		let (child, _child_cancel) = parent.with_cancel();
		let grandchild = child.with_timeout(Duration::from_secs(60));

		cancel.cancel();

		assert_eq!(parent.err(), Some(Cancellation::Cancelled));
		assert_eq!(child.err(), Some(Cancellation::Cancelled));
		assert_eq!(grandchild.done().await, Cancellation::Cancelled);
	}

	#[tokio::test]
	async fn child_cancel_does_not_reach_parent() {
		let (parent, _cancel) = Context::background().with_cancel();
		let (child, child_cancel) = parent.with_cancel();

		child_cancel.cancel();

		assert_eq!(child.err(), Some(Cancellation::Cancelled));
		assert_eq!(parent.err(), None);
	}

	#[tokio::test]
	async fn deadline_expires() {
		let ctx = Context::background().with_timeout(Duration::from_millis(10));
		assert_eq!(ctx.done().await, Cancellation::DeadlineExceeded);
		assert_eq!(ctx.err(), Some(Cancellation::DeadlineExceeded));
	}

	#[tokio::test]
	async fn earliest_deadline_wins() {
		let near = Context::background().with_timeout(Duration::from_secs(1));
		let far = near.with_timeout(Duration::from_secs(3600));
		assert_eq!(far.deadline(), near.deadline());
	}

	#[tokio::test]
	async fn dropped_handle_does_not_cancel() {
		let (ctx, cancel) = Context::background().with_cancel();
		drop(cancel);

		let timed = ctx.with_timeout(Duration::from_millis(10));
		assert_eq!(timed.done().await, Cancellation::DeadlineExceeded);
	}
}

//! Functional options and their application.
//!
//! An [`Opt<T>`] is a single fallible modification of some `T`. A sequence of them is applied in
//! order with [`apply`], which stops at the first failure and reports its position.
//!
//! ```
//! # use execopts::option::{apply, Opt};
//! let double = || Opt::new(|n: &mut u32| { *n *= 2; Ok(()) });
//! let at_most = |max: u32| Opt::try_new(move |n: &mut u32| {
//! 	if *n > max { Err(format!("{n} is over {max}")) } else { Ok(()) }
//! });
//!
//! assert_eq!(apply(3, [double(), at_most(10), double()]).unwrap(), 12);
//!
//! let err = apply(3, [double(), double(), at_most(10), double()]).unwrap_err();
//! assert_eq!(err.index, 2);
//! assert_eq!(err.to_string(), "failed to apply option 2: 12 is over 10");
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::error::{ApplyError, BoxError};

type Modifier<T> = Box<dyn FnOnce(&mut T) -> Result<(), BoxError> + Send>;

/// A single fallible modification of a `T`.
///
/// Options are consumed when applied: they may carry owned resources (readers, writers, files)
/// which move into the target.
#[must_use = "options do nothing unless applied"]
pub struct Opt<T>(Modifier<T>);

impl<T> Opt<T> {
	/// Make an option from a closure.
	pub fn new<F>(f: F) -> Self
	where
		F: FnOnce(&mut T) -> Result<(), BoxError> + Send + 'static,
	{
		Self(Box::new(f))
	}

	/// Make an option from a closure returning any error type.
	pub fn try_new<F, E>(f: F) -> Self
	where
		F: FnOnce(&mut T) -> Result<(), E> + Send + 'static,
		E: Into<BoxError>,
	{
		Self::new(move |target| f(target).map_err(Into::into))
	}

	/// Apply this option alone.
	pub fn apply(self, target: &mut T) -> Result<(), BoxError> {
		(self.0)(target)
	}
}

impl<T> fmt::Debug for Opt<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Opt").finish_non_exhaustive()
	}
}

/// Apply options to `target` in order.
///
/// On the first failing option, the remaining options are dropped without being applied, and the
/// failure is returned with its zero-based index.
pub fn apply<T, I>(mut target: T, options: I) -> Result<T, ApplyError>
where
	I: IntoIterator<Item = Opt<T>>,
{
	for (index, option) in options.into_iter().enumerate() {
		trace!(index, "applying option");
		if let Err(source) = option.apply(&mut target) {
			debug!(index, %source, "option failed");
			return Err(ApplyError { index, source });
		}
	}

	Ok(target)
}

#[cfg(test)]
mod test;

use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc,
};

use super::*;

fn push(value: &'static str) -> Opt<Vec<&'static str>> {
	Opt::new(move |list: &mut Vec<&'static str>| {
		list.push(value);
		Ok(())
	})
}

fn fail(message: &'static str) -> Opt<Vec<&'static str>> {
	Opt::new(move |_| Err(message.into()))
}

#[test]
fn empty_sequence_is_identity() {
	let list = apply(vec!["a"], std::iter::empty()).unwrap();
	assert_eq!(list, vec!["a"]);
}

#[test]
fn applies_in_order() {
	let list = apply(Vec::new(), [push("a"), push("b"), push("c")]).unwrap();
	assert_eq!(list, vec!["a", "b", "c"]);
}

#[test]
fn each_option_sees_prior_changes() {
	let seen = Opt::try_new(|list: &mut Vec<&'static str>| {
		if *list == ["a"] {
			Ok(())
		} else {
			Err(format!("saw {list:?}"))
		}
	});

	assert!(apply(Vec::new(), [push("a"), seen]).is_ok());
}

#[test]
fn reports_first_failure_index() {
	let err = apply(Vec::new(), [push("a"), fail("first"), fail("second")]).unwrap_err();
	assert_eq!(err.index, 1);
	assert_eq!(err.source.to_string(), "first");
	assert_eq!(err.to_string(), "failed to apply option 1: first");
}

#[test]
fn stops_at_first_failure() {
	let applied = Arc::new(AtomicUsize::new(0));
	let counting = |applied: &Arc<AtomicUsize>| {
		let applied = applied.clone();
		Opt::new(move |_: &mut Vec<&'static str>| {
			applied.fetch_add(1, Ordering::SeqCst);
			Ok(())
		})
	};

	let options = vec![
		counting(&applied),
		counting(&applied),
		fail("stop"),
		counting(&applied),
		counting(&applied),
	];

	let err = apply(Vec::new(), options).unwrap_err();
	assert_eq!(err.index, 2);
	assert_eq!(applied.load(Ordering::SeqCst), 2);
}

#[test]
fn failure_at_zero() {
	let err = apply(Vec::new(), [fail("nope")]).unwrap_err();
	assert_eq!(err.index, 0);
}

#[test]
fn single_option_applies_directly() {
	let mut list = Vec::new();
	push("x").apply(&mut list).unwrap();
	assert_eq!(list, vec!["x"]);
}

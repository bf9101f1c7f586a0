use std::time::Duration;

use execopts::context::Context;

/// Show library logs in test output, filtered with `RUST_LOG`.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

/// A context which gives up on hung tests.
pub fn context() -> Context {
	init_tracing();
	Context::background().with_timeout(Duration::from_secs(30))
}

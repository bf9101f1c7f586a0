use execopts::{
	build, capture_output,
	error::{EnvError, EnvKeyError, EnvValueError},
	options::*,
	Error,
};

mod helpers;
use helpers::context;

#[test]
fn options_are_applied_in_order() {
	let command = build(
		context(),
		"printf",
		[
			add_args(["%s-%s"]),
			add_env("A", "1"),
			add_args(["x", "y"]),
			add_env("B", "2"),
			set_dir("/"),
		],
	)
	.unwrap();

	let config = command.config();
	assert_eq!(config.args, ["printf", "%s-%s", "x", "y"]);
	assert_eq!(
		config.env.as_deref(),
		Some(&["A=1".to_string(), "B=2".to_string()][..])
	);
	assert_eq!(config.dir.as_deref(), Some(std::path::Path::new("/")));
	assert!(!command.is_started());
	assert_eq!(command.to_string(), "printf %s-%s x y");
}

#[test]
fn first_failing_option_is_reported() {
	let err = build(
		context(),
		"echo",
		[
			CommandOption::try_new(|_| Err("nope")),
			add_args(["never"]),
		],
	)
	.unwrap_err();

	assert_eq!(err.index(), 0);
	assert_eq!(
		err.to_string(),
		"error building command: failed to apply option 0: nope"
	);
}

#[test]
fn later_failure_index() {
	let err = build(
		context(),
		"env",
		[
			add_env("GOOD", "value"),
			add_args(["-i"]),
			add_env("1BAD", "value"),
			add_env("", "never"),
		],
	)
	.unwrap_err();

	assert_eq!(err.index(), 2);
	assert_eq!(
		err.downcast_ref::<EnvError>(),
		Some(&EnvError::Key(EnvKeyError::InvalidLeadingCharacter('1')))
	);
}

async fn env_failure(key: &str, value: &str) -> (EnvError, String) {
	let captured = capture_output(context(), "echo", [add_env(key, value)]).await;
	assert!(captured.stdout.is_empty());
	assert!(captured.stderr.is_empty());

	match captured.outcome {
		Err(Error::Build(err)) => {
			assert_eq!(err.index(), 0);
			let env = err
				.downcast_ref::<EnvError>()
				.expect("option error should be an EnvError")
				.clone();
			(env, err.to_string())
		}
		other => panic!("expected a build error, got {other:?}"),
	}
}

#[tokio::test]
async fn empty_key() {
	let (err, message) = env_failure("", "value").await;
	assert_eq!(err, EnvError::Key(EnvKeyError::Empty));
	assert_eq!(
		message,
		"error building command: failed to apply option 0: invalid environment variable key: environment variable key cannot be empty"
	);
}

#[tokio::test]
async fn key_with_equals() {
	let (err, message) = env_failure("A=B", "value").await;
	assert_eq!(err, EnvError::Key(EnvKeyError::ContainsEquals));
	assert!(message.ends_with("environment variable key cannot contain '=' character"));
}

#[tokio::test]
async fn key_with_nul() {
	let (err, _) = env_failure("A\0B", "value").await;
	assert_eq!(err, EnvError::Key(EnvKeyError::ContainsNul));
}

#[tokio::test]
async fn key_with_leading_digit() {
	let (err, message) = env_failure("9LIVES", "value").await;
	assert_eq!(err, EnvError::Key(EnvKeyError::InvalidLeadingCharacter('9')));
	assert!(message
		.ends_with("environment variable key must start with letter or underscore, got: '9'"));
}

#[tokio::test]
async fn key_with_dash() {
	let (err, message) = env_failure("MY-VAR", "value").await;
	assert_eq!(
		err,
		EnvError::Key(EnvKeyError::InvalidCharacter {
			character: '-',
			position: 2,
		})
	);
	assert!(message.ends_with("found invalid character '-' at position 2"));
}

#[tokio::test]
async fn value_with_nul() {
	let (err, message) = env_failure("KEY", "a\0b").await;
	assert_eq!(err, EnvError::Value(EnvValueError::ContainsNul));
	assert!(message.ends_with(
		"invalid environment variable value: environment variable value cannot contain null bytes"
	));
}

#[tokio::test]
async fn failure_after_stream_options_spawns_nothing() {
	let sink = execopts::stream::SharedBuffer::new();
	let captured = capture_output(
		context(),
		"echo",
		[
			add_args(["should not run"]),
			add_stdout(sink.clone()),
			add_env("_OK", ""),
			add_env("NOT OK", ""),
		],
	)
	.await;

	let err = match captured.outcome {
		Err(Error::Build(err)) => err,
		other => panic!("expected a build error, got {other:?}"),
	};
	assert_eq!(err.index(), 3);
	assert!(sink.is_empty());
	assert!(captured.stdout.is_empty());
}

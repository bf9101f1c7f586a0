use crate::{
	env::{validate_key, validate_value},
	error::EnvError,
};

use super::CommandOption;

/// Replace the environment with these `KEY=VALUE` entries.
///
/// Entries are not validated.
pub fn set_env<I, S>(env: I) -> CommandOption
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let env: Vec<String> = env.into_iter().map(Into::into).collect();
	CommandOption::new(move |config| {
		config.env = Some(env);
		Ok(())
	})
}

/// Add a variable to the environment.
///
/// The key and value are validated with [`validate_key`] and [`validate_value`], and the option
/// fails with an [`EnvError`] if either is invalid. Existing entries for the same key are kept,
/// and the new entry overrides them.
///
/// If the environment was not set, this starts from an empty one: the process will _not_ inherit
/// the current environment. Use [`set_env`] with [`std::env::vars`] first to extend it instead.
pub fn add_env(key: impl Into<String>, value: impl Into<String>) -> CommandOption {
	let key = key.into();
	let value = value.into();
	CommandOption::new(move |config| {
		validate_key(&key).map_err(EnvError::from)?;
		validate_value(&value).map_err(EnvError::from)?;

		let mut env = config.env.take().unwrap_or_default();
		env.push(format!("{key}={value}"));
		set_env(env).apply(config)
	})
}

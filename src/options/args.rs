use super::CommandOption;

/// Replace the argument list, including the program name at index 0.
pub fn set_args<I, S>(args: I) -> CommandOption
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let args: Vec<String> = args.into_iter().map(Into::into).collect();
	CommandOption::new(move |config| {
		config.args = args;
		Ok(())
	})
}

/// Append to the argument list.
pub fn add_args<I, S>(args: I) -> CommandOption
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let args: Vec<String> = args.into_iter().map(Into::into).collect();
	CommandOption::new(move |config| {
		let mut all = std::mem::take(&mut config.args);
		all.extend(args);
		set_args(all).apply(config)
	})
}

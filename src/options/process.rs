use std::{fs::File, path::PathBuf, time::Duration};

use crate::config::ProcessAttributes;

use super::CommandOption;

/// Set the working directory.
///
/// The directory is not checked: if it does not exist, spawning fails.
pub fn set_dir(dir: impl Into<PathBuf>) -> CommandOption {
	let dir = dir.into();
	CommandOption::new(move |config| {
		config.dir = Some(dir);
		Ok(())
	})
}

/// Replace the files passed to the process beyond the standard streams.
///
/// The first file is descriptor 3 in the process, the second 4, and so on.
pub fn set_extra_files(files: impl IntoIterator<Item = File>) -> CommandOption {
	let files: Vec<File> = files.into_iter().collect();
	CommandOption::new(move |config| {
		config.extra_files = files;
		Ok(())
	})
}

/// Pass more files to the process, after those already configured.
pub fn add_extra_files(files: impl IntoIterator<Item = File>) -> CommandOption {
	let files: Vec<File> = files.into_iter().collect();
	CommandOption::new(move |config| {
		let mut all = std::mem::take(&mut config.extra_files);
		all.extend(files);
		set_extra_files(all).apply(config)
	})
}

/// Set process group and session attributes.
pub fn set_process_attributes(attributes: ProcessAttributes) -> CommandOption {
	CommandOption::new(move |config| {
		config.attributes = Some(attributes);
		Ok(())
	})
}

/// Set how long to wait for output copying to finish after the process exits.
pub fn set_wait_delay(delay: Duration) -> CommandOption {
	CommandOption::new(move |config| {
		config.wait_delay = Some(delay);
		Ok(())
	})
}

//! Environment variable validation.
//!
//! Keys are checked against the POSIX portable naming rules, extended to Unicode letters: a key
//! must be non-empty, must start with a letter or an underscore, and may only contain letters,
//! ASCII digits, and underscores. Values may contain anything except a NUL byte.
//!
//! Letters are alphabetic characters which are not also numeric, so letter numbers like `Ⅻ`
//! are rejected, as are digits other than `0` to `9`.

use crate::error::{EnvKeyError, EnvValueError};

/// Check that `key` is usable as an environment variable name.
///
/// Rules are checked in order and the first violation is returned:
///
/// 1. the key is empty;
/// 2. the key contains `=`;
/// 3. the key contains a NUL byte;
/// 4. the first character is not a letter or `_`;
/// 5. a later character is not a letter, an ASCII digit, or `_`.
///
/// ```
/// # use execopts::env::validate_key;
/// # use execopts::error::EnvKeyError;
/// assert!(validate_key("_PATH2").is_ok());
/// assert_eq!(
/// 	validate_key("KEY-BAD"),
/// 	Err(EnvKeyError::InvalidCharacter { character: '-', position: 3 })
/// );
/// ```
pub fn validate_key(key: &str) -> Result<(), EnvKeyError> {
	if key.is_empty() {
		return Err(EnvKeyError::Empty);
	}

	if key.contains('=') {
		return Err(EnvKeyError::ContainsEquals);
	}

	if key.contains('\0') {
		return Err(EnvKeyError::ContainsNul);
	}

	let mut chars = key.chars();
	if let Some(first) = chars.next() {
		if !is_letter(first) && first != '_' {
			return Err(EnvKeyError::InvalidLeadingCharacter(first));
		}
	}

	if let Some((position, character)) = chars
		.enumerate()
		.find(|&(_, c)| !is_letter(c) && !c.is_ascii_digit() && c != '_')
	{
		return Err(EnvKeyError::InvalidCharacter {
			character,
			position: position + 1,
		});
	}

	Ok(())
}

fn is_letter(c: char) -> bool {
	c.is_alphabetic() && !c.is_numeric()
}

/// Check that `value` is usable as an environment variable value.
pub fn validate_value(value: &str) -> Result<(), EnvValueError> {
	if value.contains('\0') {
		Err(EnvValueError::ContainsNul)
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn accepts_posix_names() {
		for key in ["PATH", "_", "_TEST", "TEST123", "MyVar_123", "a"] {
			assert_eq!(validate_key(key), Ok(()), "{key}");
		}
	}

	#[test]
	fn accepts_unicode_letters() {
		assert_eq!(validate_key("ÉTÉ_2"), Ok(()));
	}

	#[test]
	fn empty_key() {
		assert_eq!(validate_key(""), Err(EnvKeyError::Empty));
	}

	#[test]
	fn equals_wins_over_leading_character() {
		assert_eq!(validate_key("=KEY"), Err(EnvKeyError::ContainsEquals));
		assert_eq!(validate_key("KEY=BAD"), Err(EnvKeyError::ContainsEquals));
	}

	#[test]
	fn nul_wins_over_leading_character() {
		assert_eq!(validate_key("\0KEY"), Err(EnvKeyError::ContainsNul));
		assert_eq!(validate_key("KEY\0"), Err(EnvKeyError::ContainsNul));
	}

	#[test]
	fn leading_digit() {
		assert_eq!(
			validate_key("9KEY"),
			Err(EnvKeyError::InvalidLeadingCharacter('9'))
		);
	}

	#[test]
	fn first_bad_character_is_reported() {
		assert_eq!(
			validate_key("KEY-BAD.ONE"),
			Err(EnvKeyError::InvalidCharacter {
				character: '-',
				position: 3
			})
		);
	}

	#[test]
	fn position_counts_characters() {
		assert_eq!(
			validate_key("ÀB C"),
			Err(EnvKeyError::InvalidCharacter {
				character: ' ',
				position: 2
			})
		);
	}

	#[test]
	fn superscript_is_not_a_digit() {
		assert_eq!(
			validate_key("A²"),
			Err(EnvKeyError::InvalidCharacter {
				character: '²',
				position: 1
			})
		);
	}

	#[test]
	fn letter_numbers_are_not_letters() {
		assert_eq!(
			validate_key("Ⅻ"),
			Err(EnvKeyError::InvalidLeadingCharacter('Ⅻ'))
		);
		assert_eq!(
			validate_key("_Ⅻ"),
			Err(EnvKeyError::InvalidCharacter {
				character: 'Ⅻ',
				position: 1
			})
		);
	}

	#[test]
	fn only_ascii_digits() {
		assert_eq!(validate_key("KEY_0123456789"), Ok(()));
		assert_eq!(
			validate_key("KEY٣"),
			Err(EnvKeyError::InvalidCharacter {
				character: '٣',
				position: 3
			})
		);
	}

	#[test]
	fn values() {
		assert_eq!(validate_value(""), Ok(()));
		assert_eq!(validate_value("with spaces = and equals"), Ok(()));
		assert_eq!(validate_value("value\0"), Err(EnvValueError::ContainsNul));
	}
}

//! Utility functions

use rand::RngExt;

use crate::prelude::*;

pub const ID_LENGTH: usize = 24;
pub const SAFE: [char; 62] = [
	'0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
	'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
	'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
	'V', 'W', 'X', 'Y', 'Z',
];

fn random_string(len: usize) -> String {
	let mut rng = rand::rng();
	let mut result = String::with_capacity(len);

	for _ in 0..len {
		result.push(SAFE[rng.random_range(0..SAFE.len())]);
	}
	result
}

pub fn random_id() -> String {
	random_string(ID_LENGTH)
}

/// Generates a random login credential
pub fn random_password(len: usize) -> FwResult<String> {
	if len < 8 {
		return Err(Error::ValidationError("credential length must be at least 8".into()));
	}
	Ok(random_string(len))
}

/// Minimal shape check for email addresses
pub fn validate_email(email: &str) -> FwResult<()> {
	let valid = match email.split_once('@') {
		Some((local, domain)) => {
			!local.is_empty()
				&& domain.contains('.')
				&& !domain.starts_with('.')
				&& !domain.ends_with('.')
				&& !email.chars().any(char::is_whitespace)
		}
		None => false,
	};
	if valid { Ok(()) } else { Err(Error::ValidationError(format!("invalid email: {}", email))) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_random_id_alphabet() {
		let id = random_id();
		assert_eq!(id.len(), ID_LENGTH);
		assert!(id.chars().all(|c| SAFE.contains(&c)));
		assert_ne!(id, random_id());
	}

	#[test]
	fn test_random_password_length() {
		assert_eq!(random_password(16).unwrap().len(), 16);
		assert!(random_password(4).is_err());
	}

	#[test]
	fn test_validate_email() {
		assert!(validate_email("fleet@example.com").is_ok());
		assert!(validate_email("fleet@example").is_err());
		assert!(validate_email("@example.com").is_err());
		assert!(validate_email("fleet example@example.com").is_err());
		assert!(validate_email("no-at-sign").is_err());
	}
}

// vim: ts=4

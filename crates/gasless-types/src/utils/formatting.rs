//! String formatting utilities.
//!
//! Hex prefix management for addresses and hashes, token amount display and
//! truncation of long identifiers in log lines.

/// Truncates a hex string for log output, keeping the first 10 characters
/// (`0x` plus four bytes).
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 10 {
		id.to_string()
	} else {
		format!("{}..", &id[..10])
	}
}

/// Adds "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Formats a raw on-chain token amount with decimal places for display.
///
/// # Arguments
///
/// * `amount` - The raw token amount in smallest units, as a decimal string
/// * `decimals` - The number of decimal places for the token
///
/// # Returns
///
/// A string like "1.5" or "1000", without trailing fractional zeros.
pub fn format_token_amount(amount: &str, decimals: u8) -> String {
	if decimals == 0 {
		return amount.to_string();
	}

	let decimal_places = decimals as usize;

	let (integer_part, decimal_part) = if amount.len() <= decimal_places {
		// Less than one whole token
		let decimal_str = format!("{:0>width$}", amount, width = decimal_places);
		("0".to_string(), decimal_str)
	} else {
		let split_pos = amount.len() - decimal_places;
		(
			amount[..split_pos].to_string(),
			amount[split_pos..].to_string(),
		)
	};

	let decimal_trimmed = decimal_part.trim_end_matches('0');

	if decimal_trimmed.is_empty() {
		integer_part
	} else {
		format!("{}.{}", integer_part, decimal_trimmed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("0xdeadbeef"), "0xdeadbeef");
		assert_eq!(
			truncate_id("0xdeadbeef00000000000000000000000000000000000000000000000000000000"),
			"0xdeadbeef.."
		);
	}

	#[test]
	fn test_with_0x_prefix() {
		let hash = "dead000000000000000000000000000000000000000000000000000000000000";
		assert_eq!(with_0x_prefix(hash), format!("0x{}", hash));
		assert_eq!(with_0x_prefix(&format!("0x{}", hash)), format!("0x{}", hash));
		assert_eq!(with_0x_prefix(&format!("0X{}", hash)), format!("0X{}", hash));
	}

	#[test]
	fn test_format_usdc_balances() {
		assert_eq!(format_token_amount("1500000", 6), "1.5");
		assert_eq!(format_token_amount("1000000", 6), "1");
		assert_eq!(format_token_amount("1", 6), "0.000001");
		assert_eq!(format_token_amount("0", 6), "0");
		assert_eq!(format_token_amount("250000000", 6), "250");
	}

	#[test]
	fn test_format_other_precisions() {
		assert_eq!(format_token_amount("1500000000000000000", 18), "1.5");
		assert_eq!(format_token_amount("1000", 0), "1000");
	}
}

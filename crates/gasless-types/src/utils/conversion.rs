//! Exact conversion between decimal token amounts and smallest units.
//!
//! User-entered amounts such as `"1.5"` are scaled by the token's decimal
//! precision with integer arithmetic only. An amount that would need rounding
//! below the token's minimum unit is rejected instead of truncated.

use super::formatting::format_token_amount;
use alloy_primitives::U256;
use thiserror::Error;

/// Errors produced when converting a decimal amount to smallest units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
	#[error("Amount is empty")]
	Empty,
	#[error("Amount '{0}' is not a non-negative decimal number")]
	InvalidFormat(String),
	#[error("Amount '{amount}' has more than {decimals} decimal places")]
	TooPrecise { amount: String, decimals: u8 },
	#[error("Amount '{0}' does not fit in 256 bits")]
	Overflow(String),
}

fn parse_digits(digits: &str, original: &str) -> Result<U256, AmountError> {
	if digits.is_empty() {
		return Ok(U256::ZERO);
	}
	U256::from_str_radix(digits, 10).map_err(|_| AmountError::Overflow(original.to_string()))
}

/// Splits a trimmed decimal amount into its integer and fraction digits.
fn split_decimal(amount: &str) -> Result<(&str, &str), AmountError> {
	if amount.is_empty() {
		return Err(AmountError::Empty);
	}

	let (int_part, frac_part) = amount.split_once('.').unwrap_or((amount, ""));
	let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
	if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
	{
		return Err(AmountError::InvalidFormat(amount.to_string()));
	}
	Ok((int_part, frac_part))
}

/// Checks that `amount` is a non-negative decimal number without scaling it.
///
/// Precision and range depend on the token's decimals and are left to
/// `parse_units`.
pub fn check_decimal(amount: &str) -> Result<(), AmountError> {
	split_decimal(amount.trim()).map(|_| ())
}

/// Converts a decimal amount string to the token's smallest integer unit.
///
/// Accepts `"1"`, `"1.5"`, `".5"` and `"5."`. Trailing zeros past the
/// precision are allowed since they do not change the value.
///
/// # Errors
///
/// Returns an error if the string is empty, contains anything other than
/// ASCII digits and a single `.`, needs more than `decimals` fractional digits,
/// or overflows 256 bits.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
	let amount = amount.trim();
	let (int_part, frac_part) = split_decimal(amount)?;

	let frac_significant = frac_part.trim_end_matches('0');
	if frac_significant.len() > decimals as usize {
		return Err(AmountError::TooPrecise {
			amount: amount.to_string(),
			decimals,
		});
	}

	let overflow = || AmountError::Overflow(amount.to_string());
	let ten = U256::from(10u8);
	let scale = ten
		.checked_pow(U256::from(decimals))
		.ok_or_else(overflow)?;
	let frac_scale = ten
		.checked_pow(U256::from(decimals as usize - frac_significant.len()))
		.ok_or_else(overflow)?;

	let int_value = parse_digits(int_part, amount)?;
	let frac_value = parse_digits(frac_significant, amount)?;

	int_value
		.checked_mul(scale)
		.and_then(|v| frac_value.checked_mul(frac_scale).and_then(|f| v.checked_add(f)))
		.ok_or_else(overflow)
}

/// Formats an amount in smallest units as a canonical decimal string.
///
/// The output has no trailing fractional zeros, so `parse_units` followed by
/// `format_units` reproduces any canonical input exactly.
pub fn format_units(value: U256, decimals: u8) -> String {
	format_token_amount(&value.to_string(), decimals)
}

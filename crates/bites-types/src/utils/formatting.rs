//! String formatting utilities.
//!
//! Provides functions for rendering prices as currency text and for
//! shortening identifiers in log output.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places shown for every price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Utility function to truncate an identifier for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((end, _)) => format!("{}..", &id[..end]),
		None => id.to_string(),
	}
}

/// Formats an amount as currency with exactly two decimal places.
///
/// Midpoints round away from zero, so "2.345" becomes "2.35".
///
/// # Arguments
///
/// * `amount` - The amount to render
/// * `symbol` - Currency symbol placed before the digits (may be empty)
///
/// # Returns
///
/// A string like "$10.00" or "-$0.50"
pub fn format_price(amount: Decimal, symbol: &str) -> String {
	let mut rounded = amount
		.round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
	rounded.rescale(PRICE_DECIMAL_PLACES);

	if rounded.is_sign_negative() && !rounded.is_zero() {
		format!("-{}{}", symbol, rounded.abs())
	} else {
		format!("{}{}", symbol, rounded.abs())
	}
}

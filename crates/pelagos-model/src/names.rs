//! Static name tables shared by every configuration axis.
//!
//! Each axis carries an immutable `(value, display name, keyword)` table.
//! Parsing accepts either spelling, ignoring case and surrounding
//! whitespace.

use pelagos_core::ModelError;

/// One row of an axis name table.
pub type NameEntry<T> = (T, &'static str, &'static str);

/// Look up `input` in `table`, matching the display name or the keyword.
///
/// # Errors
///
/// Returns [`ModelError::UnknownValue`] naming `axis` if nothing matches.
pub fn parse_named<T: Copy>(
    axis: &'static str,
    input: &str,
    table: &[NameEntry<T>],
) -> Result<T, ModelError> {
    let needle = input.trim();
    table
        .iter()
        .find(|(_, name, keyword)| {
            name.eq_ignore_ascii_case(needle) || keyword.eq_ignore_ascii_case(needle)
        })
        .map(|(value, _, _)| *value)
        .ok_or_else(|| ModelError::UnknownValue {
            axis,
            value: input.to_string(),
        })
}

//! Format constants and defaults for record descriptors
//!
//! This module contains the default characters, terminators, and locale
//! conventions used when a descriptor does not configure them explicitly.

// =============================================================================
// Padding and Quoting Defaults
// =============================================================================

/// Default fill character for fixed-length records
pub const DEFAULT_PADDING_CHAR: char = ' ';

/// Fill character for implied-decimal numeric fields (always zero-filled)
pub const IMPLIED_DECIMAL_PADDING_CHAR: char = '0';

/// Default quote character for delimited records when quoting is enabled
pub const DEFAULT_QUOTE_CHAR: char = '"';

/// Default column separator for delimited records
pub const DEFAULT_DELIMITER: char = ',';

// =============================================================================
// Line Terminators
// =============================================================================

/// Windows-convention record terminator
pub const WINDOWS_TERMINATOR: &str = "\r\n";

/// Unix-convention record terminator
pub const UNIX_TERMINATOR: &str = "\n";

/// Classic Mac record terminator
pub const MAC_TERMINATOR: &str = "\r";

// =============================================================================
// Locale and Date Conventions
// =============================================================================

/// Default locale for numeric formatting
pub const DEFAULT_LOCALE: &str = "en";

/// Default chrono pattern for date-typed fields
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";

/// Language codes whose decimal convention uses a comma separator
const COMMA_SEPARATOR_LANGUAGES: &[&str] = &[
    "cs", "da", "de", "es", "fi", "fr", "it", "nl", "no", "pl", "pt", "ru", "sv", "tr",
];

/// Resolve the literal decimal separator for a locale tag
///
/// Only the language part of the tag is considered, so "de" and "de_AT"
/// resolve identically. Unknown locales fall back to the point convention.
pub fn decimal_separator_for_locale(locale: &str) -> char {
    let language = locale
        .split(['_', '-'])
        .next()
        .unwrap_or(locale)
        .to_ascii_lowercase();

    if COMMA_SEPARATOR_LANGUAGES.contains(&language.as_str()) {
        ','
    } else {
        '.'
    }
}

/// Strip at most one trailing line terminator from a record line
pub fn strip_terminator(raw: &str) -> &str {
    if let Some(stripped) = raw.strip_suffix(WINDOWS_TERMINATOR) {
        stripped
    } else if let Some(stripped) = raw.strip_suffix(UNIX_TERMINATOR) {
        stripped
    } else if let Some(stripped) = raw.strip_suffix(MAC_TERMINATOR) {
        stripped
    } else {
        raw
    }
}

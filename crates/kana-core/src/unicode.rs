//! Character classes used as key sets.

use std::collections::BTreeSet;

/// Printable ASCII (U+0020..=U+007E), space included.
pub fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Every printable ASCII character in code point order.
pub fn printable_ascii() -> impl Iterator<Item = char> {
    ' '..='~'
}

/// Printable ASCII as a key set, the usual `inputtable_keys` for a
/// physical keyboard.
pub fn printable_ascii_keys() -> BTreeSet<char> {
    printable_ascii().collect()
}

//! Sequence-prefix parsing for migration directory names.
//!
//! A migration directory is named `NNN_name`: exactly three ASCII digits, an
//! underscore, then the descriptive remainder. Discovery and renumbering both
//! go through [`parse_prefix`] so the two can never disagree about which
//! directories are migrations.

/// Largest index representable by the three-digit prefix.
pub const MAX_INDEX: u32 = 999;

const PREFIX_DIGITS: usize = 3;

/// The parsed prefix of a migration directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencePrefix<'a> {
    /// Numeric sequence index (`007_x` -> 7)
    pub index: u32,
    /// Everything after the `NNN_` prefix
    pub rest: &'a str,
}

impl SequencePrefix<'_> {
    /// Render the directory name this prefix would have at `index`.
    pub fn with_index(&self, index: u32) -> String {
        format_dir_name(index, self.rest)
    }
}

/// Parse the `NNN_` prefix of a directory name.
///
/// Returns `None` for anything that is not exactly three digits followed by
/// an underscore; such entries are not migrations.
pub fn parse_prefix(dir_name: &str) -> Option<SequencePrefix<'_>> {
    let bytes = dir_name.as_bytes();
    if bytes.len() <= PREFIX_DIGITS || bytes[PREFIX_DIGITS] != b'_' {
        return None;
    }

    let digits = &bytes[..PREFIX_DIGITS];
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let index = digits
        .iter()
        .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));

    Some(SequencePrefix {
        index,
        rest: &dir_name[PREFIX_DIGITS + 1..],
    })
}

/// Build a zero-padded directory name: `format_dir_name(3, "seed") == "003_seed"`.
pub fn format_dir_name(index: u32, name: &str) -> String {
    format!("{index:03}_{name}")
}

#[cfg(test)]
#[path = "prefix_test.rs"]
mod tests;

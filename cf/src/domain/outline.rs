//! Outline parsing
//!
//! Turns a free-form markdown-ish list back into section titles.

/// Strip a leading list marker (`-`, `*`, or `N.`) and the whitespace after it
///
/// Returns `None` when the line does not start with a marker.
fn strip_list_marker(line: &str) -> Option<&str> {
    let rest = if let Some(rest) = line.strip_prefix(['-', '*']) {
        rest
    } else {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        line[digits..].strip_prefix('.')?
    };
    Some(rest.trim())
}

/// Parse an outline block into ordered section titles
///
/// Only lines starting with `-`, `*`, or a number followed by `.` are kept;
/// everything else (headings, prose, blank lines) is dropped. Never fails.
///
/// This is one-way: the titles carry no markers, so parsing
/// `parse_outline(text).join("\n")` again yields nothing.
pub fn parse_outline(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(strip_list_marker)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

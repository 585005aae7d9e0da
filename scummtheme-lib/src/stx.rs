//! Normalization of `.stx` style sources into quoted definition lines.
//!
//! The pipeline runs over the raw bytes of the whole file:
//! join -> strip comments -> tabs to spaces -> collapse double spaces
//! -> quote substitution -> split -> drop blank -> wrap in quotes.
//! Every step is a pure function so each can be checked on its own.
//! Sources are not required to be UTF-8; bytes outside ASCII pass through.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Non-greedy `/* ... */`, allowed to span lines. Unicode mode is off so `.`
/// matches any byte.
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s-u)/\*.*?\*/").expect("block comment pattern is valid")
});

/// ASCII whitespace, vertical tab included.
fn is_blank(b: &u8) -> bool {
    b.is_ascii_whitespace() || *b == 0x0b
}

/// Trims every source line and re-joins them as `"<line> \n"`.
///
/// Trailing `\r`, `\n`, `\t` and spaces are removed, then leading whitespace.
/// A final line without a newline is treated like any other.
pub fn join_lines(text: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(text.len() + text.len() / 8);
    for line in text.split_inclusive(|b| *b == b'\n') {
        let end = line
            .iter()
            .rposition(|b| !matches!(b, b'\r' | b'\n' | b'\t' | b' '))
            .map_or(0, |i| i + 1);
        let line = &line[..end];
        let start = line.iter().position(|b| !is_blank(b)).unwrap_or(line.len());
        output.extend_from_slice(&line[start..]);
        output.extend_from_slice(b" \n");
    }
    output
}

/// Removes every block comment, delimiters included.
pub fn strip_block_comments(blob: &[u8]) -> Vec<u8> {
    BLOCK_COMMENT.replace_all(blob, &b""[..]).into_owned()
}

pub fn tabs_to_spaces(blob: &[u8]) -> Vec<u8> {
    blob.iter()
        .map(|&b| if b == b'\t' { b' ' } else { b })
        .collect()
}

/// Replaces each `"  "` with `" "` in one left-to-right pass.
///
/// Runs are not reduced to a single space: four spaces become two.
pub fn collapse_double_spaces(blob: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(blob.len());
    let mut i = 0;
    while i < blob.len() {
        output.push(blob[i]);
        if blob[i] == b' ' && blob.get(i + 1) == Some(&b' ') {
            i += 2;
        } else {
            i += 1;
        }
    }
    output
}

pub fn substitute_quotes(blob: &[u8]) -> Vec<u8> {
    blob.iter()
        .map(|&b| if b == b'"' { b'\'' } else { b })
        .collect()
}

/// Lines of `blob` that contain something other than ASCII whitespace.
pub fn retained_lines(blob: &[u8]) -> impl Iterator<Item = &[u8]> {
    blob.split(|b| *b == b'\n' || *b == b'\r')
        .filter(|line| !line.iter().all(is_blank))
}

pub fn quote_line(line: &[u8]) -> Vec<u8> {
    let mut quoted = Vec::with_capacity(line.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(line);
    quoted.push(b'"');
    quoted
}

/// Runs the full pipeline over one style source and returns the quoted lines.
pub fn normalize(text: &[u8]) -> Vec<Vec<u8>> {
    let blob = join_lines(text);
    let blob = strip_block_comments(&blob);
    let blob = tabs_to_spaces(&blob);
    let blob = collapse_double_spaces(&blob);
    let blob = substitute_quotes(&blob);

    retained_lines(&blob).map(quote_line).collect()
}

use std::borrow::Cow;

/// Normalize `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Find the first control character that does not belong in typed text.
/// Whitespace controls (tab, line breaks, form feed, NEL) are allowed.
/// Returns the byte offset and the character.
pub fn first_control_char(text: &str) -> Option<(usize, char)> {
    text.char_indices()
        .find(|(_, c)| c.is_control() && !c.is_whitespace())
}

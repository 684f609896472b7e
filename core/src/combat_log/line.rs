use memchr::memchr_iter;

// [Thu Jan 01 00:00:01 2024] You begin casting Spirit of Oak.
// [Mon Feb 12 21:04:57 2001] A bat hits YOU for 5 points of damage.

/// Strip the bracketed timestamp from a raw log line and return the message.
///
/// The bracket contents are not validated. The first `]` that is followed by
/// whitespace closes the timestamp; the remainder is trimmed. Returns `None`
/// for anything that is not a log line, which callers skip.
pub fn normalize_line(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }

    for close in memchr_iter(b']', &bytes[1..]).map(|p| p + 1) {
        let rest = &line[close + 1..];
        if rest.starts_with(char::is_whitespace) {
            return Some(rest.trim());
        }
    }

    None
}

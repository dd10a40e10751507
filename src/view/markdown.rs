/// Escape characters that break Markdown link syntax: `[`, `]`, `(`, `)`.
pub(super) fn escape_md_link(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '[' | ']' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub(super) fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `s` to at most `max_chars` characters, appending `…` when shortened.
/// Prefers the last word boundary so words are not split.
pub(super) fn truncate_chars(s: &str, max_chars: usize) -> String {
    let Some((cut, _)) = s.char_indices().nth(max_chars) else {
        return s.to_string();
    };
    let head = &s[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => &head[..space],
        _ => head,
    };
    format!("{}…", head.trim_end())
}

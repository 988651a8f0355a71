//! Deterministic snippet trimming

const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_chars` characters, preferring sentence
/// boundaries
///
/// Text already within the budget is returned trimmed and unchanged, with no
/// ellipsis, under both policies. The result never exceeds `max_chars` plus
/// the ellipsis marker.
pub fn concise(text: &str, max_chars: usize, cleanup: bool) -> String {
    if cleanup {
        concise_cleanup(text, max_chars)
    } else {
        concise_plain(text, max_chars)
    }
}

/// Plain policy: truncate at the last period before the budget, or hard at
/// the budget if none, and append an ellipsis.
fn concise_plain(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= max_chars {
        return trimmed.to_string();
    }

    let end = chars[..max_chars]
        .iter()
        .rposition(|&c| c == '.')
        .unwrap_or(max_chars);

    let cut: String = chars[..end].iter().collect();
    format!("{}{}", cut.trim(), ELLIPSIS)
}

/// Cleanup policy: skip leading non-alphanumeric characters to a natural
/// start, cut at the last sentence end inside the window, and append an
/// ellipsis only when text was actually dropped from the tail.
fn concise_cleanup(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= max_chars {
        return trimmed.to_string();
    }

    let start = chars
        .iter()
        .position(|c| c.is_alphanumeric())
        .unwrap_or(0);
    let window_end = (start + max_chars).min(chars.len());

    // Last sentence terminator followed by whitespace, both inside the window.
    let mut end = window_end;
    for i in (start..window_end.saturating_sub(1)).rev() {
        if matches!(chars[i], '.' | '!' | '?') && chars[i + 1].is_whitespace() {
            end = i + 1;
            break;
        }
    }

    let cut: String = chars[start..end].iter().collect();
    let cut = cut.trim();
    if end < chars.len() {
        format!("{}{}", cut, ELLIPSIS)
    } else {
        cut.to_string()
    }
}

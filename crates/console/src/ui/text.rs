const TAB_WIDTH: usize = 4;

pub(super) fn wrap_text_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        if raw.is_empty() {
            lines.push(String::new());
            continue;
        }
        let chars: Vec<char> = raw.chars().collect();
        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Makes arbitrary webhook text safe to draw: ANSI sequences dropped,
/// tabs expanded, other control characters blanked.
pub(super) fn sanitize_text_for_tui(text: &str) -> String {
    let stripped = strip_ansi_sequences(text);
    let mut out = String::with_capacity(stripped.len());
    let mut col = 0usize;
    for ch in stripped.chars() {
        match ch {
            '\n' | '\r' => {
                out.push('\n');
                col = 0;
            }
            '\t' => {
                let spaces = TAB_WIDTH - col % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(spaces));
                col += spaces;
            }
            _ if ch.is_control() => {
                out.push(' ');
                col += 1;
            }
            _ => {
                out.push(ch);
                col += 1;
            }
        }
    }
    out
}

fn strip_ansi_sequences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                for seq in chars.by_ref() {
                    if ('@'..='~').contains(&seq) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(seq) = chars.next() {
                    if seq == '\u{7}' {
                        break;
                    }
                    if seq == '\u{1b}' {
                        if chars.peek() == Some(&'\\') {
                            chars.next();
                        }
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

pub(super) fn display_width(text: &str) -> usize {
    text.chars().count()
}

pub(super) fn pad_right(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    while display_width(&out) < width {
        out.push(' ');
    }
    out
}

pub(super) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    let count = text.chars().count();
    if count <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let mut out: String = text.chars().take(max_len - 3).collect();
    out.push_str("...");
    out
}

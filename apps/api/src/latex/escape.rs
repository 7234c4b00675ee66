//! Text escaping for LaTeX body text.
//!
//! Every free-text value from a resume passes through [`escape_latex`] exactly once
//! before it reaches the emitted source. Re-escaping escaped output double-escapes;
//! callers must not do it.

/// Maps each LaTeX metacharacter to a form that typesets as the literal character.
///
/// Reserved set: `\ $ % & _ # { } ~ ^`. ASCII control characters other than
/// whitespace are dropped. Character pairs that T1 fonts merge into a ligature
/// (`--`, doubled backquotes or apostrophes, `<<`, `>>`, `,,`, and `!` or `?` before
/// a backquote) get an empty group between them so the literal characters are typeset.
/// Everything else is copied unchanged. Single pass, O(n).
pub fn escape_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c.is_ascii_control() && !c.is_ascii_whitespace() {
            continue;
        }
        if prev.is_some_and(|p| forms_ligature(p, c)) {
            out.push_str("{}");
        }
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '$' | '%' | '&' | '_' | '#' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        prev = Some(c);
    }
    out
}

fn forms_ligature(prev: char, next: char) -> bool {
    matches!(
        (prev, next),
        ('-', '-')
            | ('`', '`')
            | ('\'', '\'')
            | ('<', '<')
            | ('>', '>')
            | (',', ',')
            | ('!' | '?', '`')
    )
}

/// Collapses every whitespace run (spaces, tabs, newlines) to one space and trims both ends.
pub fn sanitize_single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps paragraph breaks (one or more blank lines) and single-line sanitizes each paragraph.
/// Paragraphs are rejoined with a single blank line; empty paragraphs disappear.
pub fn sanitize_paragraphs(s: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in s.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(sanitize_single_line(&current));
                current.clear();
            }
        } else {
            current.push_str(line);
            current.push(' ');
        }
    }
    if !current.is_empty() {
        paragraphs.push(sanitize_single_line(&current));
    }

    paragraphs.join("\n\n")
}

/// `sanitize_single_line` followed by `escape_latex`: the form used for titles,
/// headers, bullets and any other value that must stay on one markup line.
pub fn escape_line(s: &str) -> String {
    escape_latex(&sanitize_single_line(s))
}

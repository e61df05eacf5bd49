//! Selectable folder extraction
//!
//! A folder listing arrives as raw response lines, one per mailbox,
//! followed by the completion line:
//!
//! ```text
//! (\Noselect) "." "INBOX.Trash"
//! () "." "INBOX"
//! LIST Completed
//! ```
//!
//! The first token holds the mailbox attributes and the last token is
//! the mailbox name. Mailboxes flagged `\Noselect` are containers only
//! and cannot be opened.

/// Attribute marking a mailbox the server will refuse to SELECT.
const NOSELECT: &str = "noselect";

/// Extract the names of selectable folders from a raw listing.
///
/// The final line is the completion marker and is never treated as a
/// folder. Order follows the listing.
///
/// # Examples
///
/// ```
/// use imap_bench::extract_selectable;
///
/// let listing = [
///     r#"(\Noselect) "." "INBOX.Trash""#,
///     r#"() "." "INBOX""#,
///     "LIST Completed",
/// ];
/// assert_eq!(extract_selectable(&listing), vec!["INBOX"]);
/// ```
#[must_use]
pub fn extract_selectable<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let Some((_completion, folders)) = lines.split_last() else {
        return Vec::new();
    };

    folders
        .iter()
        .filter_map(|line| {
            let mut tokens = tokenize(line.as_ref());
            let attributes = tokens.first()?;
            if attributes.to_lowercase().contains(NOSELECT) {
                return None;
            }
            tokens.pop()
        })
        .collect()
}

/// Quote a folder name for use as a command argument.
#[must_use]
pub fn quote(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Split a listing line into tokens.
///
/// Whitespace separates tokens. A double-quoted string is one token
/// with its quotes removed and `\` escapes resolved. A parenthesized
/// list is one token, parentheses included.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '"' => {
                in_token = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                current.push(escaped);
                            }
                        }
                        other => current.push(other),
                    }
                }
            }
            '(' => {
                in_token = true;
                current.push(c);
                let mut depth = 1_usize;
                for p in chars.by_ref() {
                    current.push(p);
                    match p {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
            }
            other => {
                in_token = true;
                current.push(other);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    tokens
}

//! Indented text to (name, parent) pairs
//!
//! Each non-blank line names a node; its parent is the nearest preceding
//! line with a smaller indentation. For example
//!
//! ```text
//! food
//!     meat
//!         raw meat
//!     sweets
//! books
//! ```
//!
//! gives `food` and `books` as roots, `meat` and `sweets` under `food`, and
//! `raw meat` under `meat`. Output order matches input order, so every
//! parent is emitted before its children.

use crate::error::{BookkeeperError, BookkeeperResult};

/// A node name and the name of its parent, if any
pub type TreeEntry = (String, Option<String>);

/// Parse indented lines into (name, parent) pairs
///
/// Blank and whitespace-only lines are skipped. Indentation is the number of
/// leading whitespace characters; tabs and spaces count the same. A dedent
/// must return to a level used by an enclosing line, otherwise this fails
/// with [`BookkeeperError::Indentation`] carrying the 1-based line number.
pub fn parse_tree<I, S>(lines: I) -> BookkeeperResult<Vec<TreeEntry>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // `None` sorts below every real indent, so the first line always opens
    // a frame whose parent is absent.
    let mut frames: Vec<(Option<String>, Option<usize>)> = Vec::new();
    let mut last_name: Option<String> = None;
    let mut last_indent: Option<usize> = None;
    let mut entries = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let name = line.trim();
        if name.is_empty() {
            continue;
        }

        let indent = Some(indent_width(line));
        if indent > last_indent {
            frames.push((last_name.take(), last_indent));
        } else if indent < last_indent {
            while indent < last_indent {
                match frames.pop() {
                    Some((_, outer)) => last_indent = outer,
                    None => break,
                }
            }
            if indent != last_indent {
                return Err(BookkeeperError::Indentation { line: index + 1 });
            }
        }

        let parent = frames.last().and_then(|(parent, _)| parent.clone());
        entries.push((name.to_string(), parent));
        last_name = Some(name.to_string());
        last_indent = indent;
    }

    tracing::debug!(nodes = entries.len(), "parsed tree text");
    Ok(entries)
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

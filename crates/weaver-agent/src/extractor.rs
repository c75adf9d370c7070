//! Code block extractor - parses filename-tagged fenced blocks
//!
//! The de facto wire format between the collaborator's free text and the
//! materializer: a block opens with a fence, a language tag, and a
//! `#`-prefixed filename marker on the same line or the line directly
//! after, and closes at the next fence line. Everything in between is
//! the complete content of one file: a fence line reading "```python",
//! a "# todo/models.py" marker, the file body, and a closing "```" line.
//!
//! An unterminated block (open without a matching close before the text
//! ends) is dropped entirely, content included. A closed block with no
//! interior lines yields no entry.

const FENCE: &str = "```";

/// One extracted file, in order of first occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Declared relative path
    pub path: String,
    /// Block content, newline-joined
    pub content: String,
}

/// Extract all filename-tagged fenced blocks from free text
///
/// Returns blocks in order of first occurrence of each path. A path
/// declared twice keeps its original position but takes the later
/// content (last wins, matching the wholesale-replace write pipeline).
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    let mut blocks: Vec<CodeBlock> = Vec::new();
    let mut current_path: Option<String> = None;
    let mut current_lines: Vec<&str> = Vec::new();
    // Set after a fence line carrying a language tag but no marker; the
    // next line may then name the file.
    let mut pending_tag = false;

    for line in text.lines() {
        if let Some(path) = parse_tagged_fence(line) {
            // A fence with a same-line marker always starts a new block,
            // discarding any unterminated accumulation before it.
            current_path = Some(path);
            pending_tag = false;
            current_lines.clear();
        } else if let Some(rest) = line.trim_end().strip_prefix(FENCE) {
            if let Some(path) = current_path.take() {
                if !current_lines.is_empty() {
                    insert_last_wins(&mut blocks, path, current_lines.join("\n"));
                }
                current_lines.clear();
            }
            // A bare fence outside any open block is ignored.
            pending_tag = !rest.trim().is_empty();
        } else if pending_tag {
            pending_tag = false;
            if let Some(path) = parse_marker_line(line) {
                current_path = Some(path);
                current_lines.clear();
            }
            // An untagged block's first content line is not a marker;
            // the whole block is ignored.
        } else if current_path.is_some() {
            current_lines.push(line);
        }
    }

    // An open block at end of text is dropped.
    blocks
}

/// Parse a fence-open line carrying a language tag and a `#` path marker
///
/// Returns the declared path, or None if the line does not open a tagged
/// block (no fence, no language tag, or no marker).
fn parse_tagged_fence(line: &str) -> Option<String> {
    let rest = line.strip_prefix(FENCE)?;
    // A bare or marker-less fence is a close or noise, not an open.
    if rest.trim().is_empty() {
        return None;
    }
    let (_, marker) = line.split_once('#')?;
    let path = marker.trim();
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

/// Parse a standalone `# path` marker line directly under a tagged fence
///
/// Requires a whitespace-free path so ordinary comments and shebangs at
/// the start of an unnamed block are not taken for filenames.
fn parse_marker_line(line: &str) -> Option<String> {
    let marker = line.trim().strip_prefix('#')?;
    let path = marker.trim();
    if path.is_empty() || path.contains(char::is_whitespace) {
        return None;
    }
    Some(path.to_string())
}

fn insert_last_wins(blocks: &mut Vec<CodeBlock>, path: String, content: String) {
    if let Some(existing) = blocks.iter_mut().find(|b| b.path == path) {
        existing.content = content;
    } else {
        blocks.push(CodeBlock { path, content });
    }
}

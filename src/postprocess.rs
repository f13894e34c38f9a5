//! Markdown post-processing
//!
//! Normalizes the raw render output into its final shape:
//!
//! - line endings are LF only
//! - runs of blank lines collapse to a single blank line
//! - trailing whitespace is trimmed, except a two-space hard break that is
//!   followed by another line of text
//! - fenced code blocks pass through untouched
//! - no leading blank lines and exactly one trailing newline (empty output
//!   stays empty)
//!
//! With [`Options::split_lines`] set, paragraph lines longer than
//! [`Options::line_width`] are wrapped at spaces. Breaks are never placed
//! inside inline code, link or image syntax, or emphasis, and never in front
//! of a word that would start a new block (`#`, `-`, `1.`, `>` ...).
//!
//! Normalization is idempotent: running it on its own output changes nothing.

use std::sync::OnceLock;

use regex::Regex;

use crate::options::Options;

/// Normalize raw Markdown according to `options`
///
/// # Examples
///
/// ```rust
/// use html2md_converter::options::Options;
/// use html2md_converter::postprocess::normalize;
///
/// let markdown = normalize("\n\n# Title  \r\n\r\n\r\n\r\nBody\n\n\n", &Options::default());
/// assert_eq!(markdown, "# Title\n\nBody\n");
/// ```
pub fn normalize(raw: &str, options: &Options) -> String {
    PostProcessor::new(options).normalize(raw)
}

/// Markdown post-processor
#[derive(Debug, Clone, Copy)]
pub struct PostProcessor {
    /// Wrap width, `None` when wrapping is disabled
    wrap_width: Option<usize>,
}

/// An open code fence
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    length: usize,
}

impl Fence {
    /// Fence opened by `line`, if any
    fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let length = trimmed.chars().take_while(|c| *c == marker).count();
        // A backtick fence's info string cannot contain backticks; such a
        // line is an inline code span instead.
        let info = &trimmed[length * marker.len_utf8()..];
        if length < 3 || (marker == '`' && info.contains('`')) {
            return None;
        }
        Some(Self { marker, length })
    }

    fn is_closed_by(self, line: &str) -> bool {
        let trimmed = line.trim();
        let length = trimmed.chars().take_while(|c| *c == self.marker).count();
        length >= self.length && trimmed.chars().all(|c| c == self.marker)
    }
}

impl PostProcessor {
    pub fn new(options: &Options) -> Self {
        Self {
            wrap_width: options.split_lines.then_some(options.line_width),
        }
    }

    /// Normalize one document of raw Markdown
    pub fn normalize(&self, raw: &str) -> String {
        let text = raw.replace("\r\n", "\n").replace('\r', "\n");
        let lines: Vec<&str> = text.split('\n').collect();
        let mut output: Vec<String> = Vec::with_capacity(lines.len());
        let mut fence: Option<Fence> = None;

        for (index, line) in lines.iter().enumerate() {
            if let Some(open) = fence {
                output.push((*line).to_string());
                if open.is_closed_by(line) {
                    fence = None;
                }
                continue;
            }

            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                if output.last().is_some_and(|last| !last.trim().is_empty()) {
                    output.push(String::new());
                }
                continue;
            }

            if let Some(open) = Fence::open(line) {
                fence = Some(open);
                output.push(trimmed.to_string());
                continue;
            }

            let next = lines.get(index + 1).copied();
            let next_is_text = next.is_some_and(|next| !next.trim().is_empty());
            let mut kept = trimmed.to_string();
            if next_is_text && line.ends_with("  ") {
                kept.push_str("  ");
            }

            match self.wrap_width {
                Some(width) if is_paragraph_line(&kept, next) => {
                    output.extend(wrap_line(&kept, width));
                }
                _ => output.push(kept),
            }
        }

        while output.last().is_some_and(|last| last.trim().is_empty()) {
            output.pop();
        }
        if output.is_empty() {
            return String::new();
        }

        let mut markdown = output.join("\n");
        markdown.push('\n');
        markdown
    }
}

/// Matches text that starts a Markdown block construct
fn block_start_regex() -> Option<&'static Regex> {
    static BLOCK_START_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    BLOCK_START_REGEX
        .get_or_init(|| {
            Regex::new(
                r"^(?:#{1,6}(?:\s|$)|[-+*](?:\s|$)|>|\||\d{1,9}[.)](?:\s|$)|[=-]+\s*$|`{3}|~{3}|<!--)",
            )
            .ok()
        })
        .as_ref()
}

/// Whether `text` would open a block if it began a line.
///
/// Without a usable pattern everything counts as a block start, which turns
/// wrapping off rather than risk changing the document structure.
fn starts_block(text: &str) -> bool {
    block_start_regex().is_none_or(|regex| regex.is_match(text))
}

fn is_setext_underline(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && (trimmed.chars().all(|c| c == '=') || trimmed.chars().all(|c| c == '-'))
}

/// Plain paragraph text: not indented, not a heading, list item, table,
/// quote or fence, and not the text line of a Setext heading.
fn is_paragraph_line(line: &str, next: Option<&str>) -> bool {
    !line.starts_with([' ', '\t'])
        && !starts_block(line)
        && !next.is_some_and(is_setext_underline)
}

/// Wrap one paragraph line at `width` characters
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let (body, suffix) = match line.strip_suffix("  ") {
        Some(body) => (body, "  "),
        None => (line, ""),
    };
    if body.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    for point in break_points(body) {
        tokens.push((start, &body[start..point]));
        start = point + 1;
    }
    tokens.push((start, &body[start..]));

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for (offset, token) in tokens {
        if token.is_empty() {
            continue;
        }
        let token_width = token.chars().count();
        if current.is_empty() {
            current.push_str(token);
            current_width = token_width;
            continue;
        }

        // Neither the finished line nor the next one may read as a block opener
        let fits = current_width + 1 + token_width <= width;
        if fits
            || starts_block(&body[offset..])
            || starts_block(token)
            || starts_block(&current)
        {
            current.push(' ');
            current.push_str(token);
            current_width += 1 + token_width;
        } else {
            pieces.push(std::mem::take(&mut current));
            current.push_str(token);
            current_width = token_width;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    if let Some(last) = pieces.last_mut() {
        last.push_str(suffix);
    }
    pieces
}

/// Byte offsets of spaces where a line may be broken: outside code spans,
/// link and image syntax, and emphasis.
fn break_points(line: &str) -> Vec<usize> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let run_length = |from: usize, ch: char| {
        chars[from..]
            .iter()
            .take_while(|(_, c)| *c == ch)
            .count()
    };

    let mut points = Vec::new();
    let mut code_fence: Option<usize> = None;
    let mut brackets = 0usize;
    let mut parens = 0usize;
    let mut strong = false;
    let mut emphasis = false;
    let mut underline = false;
    let mut strike = false;

    let mut i = 0;
    while i < chars.len() {
        let (offset, c) = chars[i];

        if let Some(fence) = code_fence {
            if c == '`' {
                let run = run_length(i, '`');
                if run == fence {
                    code_fence = None;
                }
                i += run;
            } else {
                i += 1;
            }
            continue;
        }

        match c {
            '\\' => {
                i += 2;
                continue;
            }
            '`' => {
                let run = run_length(i, '`');
                code_fence = Some(run);
                i += run;
                continue;
            }
            '[' => brackets += 1,
            ']' => {
                brackets = brackets.saturating_sub(1);
                if chars.get(i + 1).is_some_and(|(_, next)| *next == '(') {
                    parens += 1;
                    i += 2;
                    continue;
                }
            }
            '(' if parens > 0 => parens += 1,
            ')' if parens > 0 => parens -= 1,
            '*' if parens == 0 => {
                let run = run_length(i, '*');
                if run >= 2 {
                    strong = !strong;
                }
                if run % 2 == 1 {
                    emphasis = !emphasis;
                }
                i += run;
                continue;
            }
            '_' if parens == 0 => {
                let run = run_length(i, '_');
                if run % 2 == 1 {
                    underline = !underline;
                }
                i += run;
                continue;
            }
            '~' if parens == 0 => {
                let run = run_length(i, '~');
                if run >= 2 {
                    strike = !strike;
                }
                i += run;
                continue;
            }
            ' ' if brackets == 0 && parens == 0 && !(strong || emphasis || underline || strike) => {
                points.push(offset);
            }
            _ => {}
        }
        i += 1;
    }
    points
}

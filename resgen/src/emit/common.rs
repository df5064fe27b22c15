//! Pieces shared by every backend: generated-file headers, quoting,
//! comment blocks and a small line-oriented source builder.

use std::{fmt::Display, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Tool identity written into generated headers.
pub const TOOL_NAME: &str = concat!("resgen ", env!("CARGO_PKG_VERSION"));

/// Width of filled comment text, not counting the comment prefix.
pub const COMMENT_WIDTH: usize = 70;

/// How much provenance generated files carry in their comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentStyle {
    /// Full source path, a timestamp and a "do not check in" banner.
    #[default]
    Normal,
    /// Output that is stable across runs and machines, suitable for
    /// checking in to source control.
    ScmSafe,
}

impl FromStr for CommentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(CommentStyle::Normal),
            "scm-safe" => Ok(CommentStyle::ScmSafe),
            other => Err(format!("Invalid comment style '{}'", other)),
        }
    }
}

impl Display for CommentStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentStyle::Normal => write!(f, "normal"),
            CommentStyle::ScmSafe => write!(f, "scm-safe"),
        }
    }
}

/// Provenance information printed at the top of generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderContext {
    pub style: CommentStyle,
    /// Source file as shown in comments.
    pub source_display: String,
    /// Generation time; always `None` under [`CommentStyle::ScmSafe`].
    pub timestamp: Option<String>,
}

impl HeaderContext {
    pub fn new(source: &Path, style: CommentStyle, timestamp: impl Into<String>) -> Self {
        Self {
            style,
            source_display: source_for_comment(source, style),
            timestamp: match style {
                CommentStyle::Normal => Some(timestamp.into()),
                CommentStyle::ScmSafe => None,
            },
        }
    }
}

/// Forward-slashed source path; under the scm-safe style everything up to
/// the last directory is replaced by `...`.
pub fn source_for_comment(source: &Path, style: CommentStyle) -> String {
    let file = source.to_string_lossy().replace('\\', "/");
    match (style, file.rfind('/')) {
        (CommentStyle::ScmSafe, Some(slash)) if slash > 0 => format!("...{}", &file[slash..]),
        _ => file,
    }
}

/// Builds source text line by line with four-space indentation.
#[derive(Debug, Default, Clone)]
pub struct SourceBuilder {
    content: String,
    indent_level: usize,
}

impl SourceBuilder {
    const INDENT: &'static str = "    ";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        if line.is_empty() {
            self.content.push('\n');
            return;
        }
        for _ in 0..self.indent_level {
            self.content.push_str(Self::INDENT);
        }
        self.content.push_str(line);
        self.content.push('\n');
    }

    pub fn blank(&mut self) {
        self.content.push('\n');
    }

    /// Appends text verbatim, without indentation.
    pub fn push_raw(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn build(self) -> String {
        self.content
    }
}

/// The two-line (or one-line, scm-safe) banner at the top of generated code.
pub fn do_not_modify_banner(out: &mut SourceBuilder, style: CommentStyle) {
    match style {
        CommentStyle::ScmSafe => {
            out.push_line("// This class is generated. Do NOT modify it manually.");
        }
        CommentStyle::Normal => {
            out.push_line("// This class is generated. Do NOT modify it, or");
            out.push_line("// add it to source control.");
        }
    }
    out.blank();
}

/// Javadoc-style block naming the tool, the source and the time.
pub fn generated_by_block(out: &mut SourceBuilder, header: &HeaderContext) {
    out.push_line("/**");
    out.push_line(" * This class was generated");
    out.push_line(&format!(" * by {}", TOOL_NAME));
    out.push_line(&format!(" * from {}", header.source_display));
    if let Some(timestamp) = &header.timestamp {
        out.push_line(&format!(" * on {}.", timestamp));
    }
    out.push_line(" * It contains a list of messages, and methods to");
    out.push_line(" * retrieve and format those messages.");
    out.push_line(" */");
    out.blank();
}

/// Double-quoted Java string literal.
pub fn quote_for_java(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    quoted.push_str(&escape_c_like(value));
    quoted.push('"');
    quoted
}

/// Double-quoted C++ string literal.
pub fn quote_for_cpp(value: &str) -> String {
    quote_for_java(value)
}

fn escape_c_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("\n\r", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Value side of a `.properties` line.
pub fn quote_for_properties(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace("\n\r", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

pub fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Left-justifies `text` into lines of at most `width` characters.
///
/// Existing line breaks are kept. Lines are broken at the last space before
/// the limit, or at the first space after it when a word is longer than
/// the limit. Spaces and line breaks at a break point are dropped. With
/// `width == None` only existing line breaks are honored.
pub fn fill_text(text: &str, width: Option<usize>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut i = 0;
    while i < text.len() {
        let end = text[i..]
            .find(['\r', '\n'])
            .map(|p| i + p)
            .unwrap_or(text.len());
        let line = &text[i..end];

        let mut cut = line.len();
        if let Some(width) = width.filter(|w| *w > 0) {
            if let Some((limit, _)) = line.char_indices().nth(width) {
                cut = if line[limit..].starts_with(' ') {
                    limit
                } else {
                    line[..limit]
                        .rfind(' ')
                        .or_else(|| line[limit..].find(' ').map(|p| limit + p))
                        .unwrap_or(line.len())
                };
            }
        }

        lines.push(line[..cut].to_string());
        i += cut;
        while text[i..].starts_with([' ', '\r', '\n']) {
            i += 1;
        }
    }
    lines
}

/// Documentation block preceding each generated resource member.
pub fn comment_block(out: &mut SourceBuilder, name: &str, text: &str, comment: Option<&str>) {
    out.push_line("/**");
    if let Some(comment) = comment {
        for line in fill_text(comment, Some(COMMENT_WIDTH)) {
            out.push_line(&format!(" * {}", line));
        }
        out.push_line(" *");
    }
    let summary = format!(
        "<code>{}</code> is '<code>{}</code>'",
        name,
        xml_escape(text)
    );
    for line in fill_text(&summary, None) {
        out.push_line(&format!(" * {}", line));
    }
    out.push_line(" */");
}

/// Joins the non-empty parts with `", "`.
pub fn add_lists(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

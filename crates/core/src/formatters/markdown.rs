use super::html::html_escape;
use crate::extract::TextSegment;

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with title and source
    pub include_frontmatter: bool,
}

/// Convert a title and its segments to Markdown.
///
/// The article is laid out as an `<h1>` plus one `<p>` per segment and handed
/// to `htmd`, so Markdown-significant characters in the text are escaped.
pub fn convert_to_markdown(
    title: &str, segments: &[TextSegment], source: Option<&str>, config: &MarkdownConfig,
) -> String {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(title, source, segments));
        output.push('\n');
    }

    let mut body = String::new();
    if !title.trim().is_empty() {
        body.push_str(&format!("<h1>{}</h1>", html_escape(title)));
    }
    for segment in segments {
        body.push_str(&format!("<p>{}</p>", html_escape(segment.as_str())));
    }

    output.push_str(&htmd::convert(&body).unwrap_or_default());
    output
}

fn generate_frontmatter(title: &str, source: Option<&str>, segments: &[TextSegment]) -> String {
    let mut frontmatter = String::from("+++");
    frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(title)));

    if let Some(url) = source {
        frontmatter.push_str(&format!("\nsource = {}", toml_escape_string(url)));
    }

    frontmatter.push_str(&format!("\nsegments = {}", segments.len()));
    frontmatter.push_str("\n+++\n");
    frontmatter
}

/// Escape a string for TOML format
fn toml_escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

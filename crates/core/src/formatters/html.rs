//! E-ink article rendering.
//!
//! Produces one self-contained HTML document: narrow serif column, justified
//! paragraphs, a rule under the title. One `<p>` per segment.

use crate::extract::TextSegment;

/// Style knobs for the rendered document.
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Maximum content width in CSS pixels
    pub max_width_px: u32,
    /// CSS font-family stack
    pub font_family: String,
    /// Body line height
    pub line_height: f32,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self { max_width_px: 600, font_family: "Georgia, serif".to_string(), line_height: 1.6 }
    }
}

/// Render a title and ordered segments into a complete HTML document.
///
/// Title and segment text are escaped, so the output is well-formed no matter
/// what the source page contained.
///
/// # Example
///
/// ```rust
/// use inkdrop_core::{ExtractConfig, HtmlConfig, extract_segments, render_html};
///
/// let segments = extract_segments("<p>A sentence that is long enough.</p>", &ExtractConfig::default());
/// let html = render_html("Thread", &segments, &HtmlConfig::default());
/// assert!(html.contains("<h1>Thread</h1>"));
/// assert!(html.contains("<p>A sentence that is long enough.</p>"));
/// ```
pub fn render_html(title: &str, segments: &[TextSegment], config: &HtmlConfig) -> String {
    let title = html_escape(title);
    let paragraphs = segments
        .iter()
        .map(|segment| format!("<p>{}</p>", html_escape(segment.as_str())))
        .collect::<Vec<_>>()
        .join("\n    ");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: {font};
            line-height: {line_height};
            max-width: {max_width}px;
            margin: 0 auto;
            padding: 20px;
        }}
        h1 {{
            font-size: 1.5em;
            margin-bottom: 1em;
            border-bottom: 1px solid #ccc;
            padding-bottom: 0.5em;
        }}
        p {{
            margin-bottom: 1em;
            text-align: justify;
        }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    {paragraphs}
</body>
</html>"#,
        font = config.font_family,
        line_height = config.line_height,
        max_width = config.max_width_px,
    )
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

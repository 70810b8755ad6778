use crate::parse::Document;

/// Block-level elements whose text becomes one paragraph of output
const BLOCK_SELECTOR: &str = "body h1, body h2, body h3, body p, body li, body blockquote, body pre";

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,
}

/// Convert a rendered article document to plain text.
///
/// Each block's text is trimmed and blocks are joined with a blank line, so
/// the heading comes first followed by one paragraph per segment. Markup in
/// `<head>` (title, style) never reaches the output.
pub fn convert_to_text(html: &str, config: &TextConfig) -> String {
    let doc = match Document::parse(html) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %e, "could not parse article for plain text");
            return String::new();
        }
    };
    let blocks = match doc.select(BLOCK_SELECTOR) {
        Ok(blocks) => blocks,
        Err(e) => {
            tracing::warn!(error = %e, "could not read article blocks for plain text");
            return String::new();
        }
    };

    let paragraphs: Vec<String> = blocks
        .iter()
        .map(|block| block.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .map(|text| if config.line_width > 0 { wrap_paragraph(&text, config.line_width) } else { text })
        .collect();

    paragraphs.join("\n\n")
}

/// Wrap one paragraph to the given width, counting characters.
fn wrap_paragraph(text: &str, width: usize) -> String {
    let mut lines = Vec::new();
    let mut current_line: Vec<&str> = Vec::new();
    let mut current_length = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(current_line.join(" "));
            current_line = vec![word];
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    lines.join("\n")
}

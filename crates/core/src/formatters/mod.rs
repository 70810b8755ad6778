pub mod html;
#[cfg(feature = "markdown")]
pub mod markdown;
pub mod text;

pub use html::{HtmlConfig, render_html};
#[cfg(feature = "markdown")]
pub use markdown::{MarkdownConfig, convert_to_markdown};
pub use text::{TextConfig, convert_to_text};

pub mod article;
pub mod classify;
pub mod config;
pub mod delivery;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod ledger;
pub mod parse;
pub mod pipeline;
pub mod preprocess;
pub mod readability;
pub mod source;
pub mod title;

pub use article::{CleanArticle, OutputFormat};
pub use classify::{TextClassifier, Verdict, is_ui_noise};
pub use config::Settings;
pub use delivery::{Delivery, DeliveryReceipt, OutboxDelivery, sanitize_filename};
pub use error::{InkDropError, Result};
pub use extract::{ExtractConfig, TextSegment, collapse_whitespace, extract_segments};
#[cfg(feature = "fetch")]
pub use fetch::BrowserlessFetcher;
pub use fetch::{CredentialCache, FetchConfig, FetchConfigBuilder, PageFetcher, RawPage, SessionCredentials};
pub use fetch::{detect_auth_wall, fetch_file, fetch_stdin};
#[cfg(feature = "markdown")]
pub use formatters::{MarkdownConfig, convert_to_markdown};
pub use formatters::{HtmlConfig, TextConfig, convert_to_text, render_html};
pub use ledger::{Reservation, SentLedger};
pub use parse::Document;
pub use pipeline::{NoFetch, Pipeline};
pub use preprocess::{strip_boilerplate, strip_non_content};
pub use readability::{ReadabilityPass, ReadableFragment, SmoothieReadability};
pub use source::{check_source_url, find_thread_url, is_target_platform, is_thread_url, normalize_url};
pub use title::{choose_title, normalize_title};

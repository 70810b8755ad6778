use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Ink Drop".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Turn threads into clean e-ink articles\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print a labelled value under the current step
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print a summary of the cleaned article
pub fn print_article_details(article: &inkdrop_core::CleanArticle) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Article".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    print_detail("Title", &article.title);
    print_detail("Segments", &article.segments.len().to_string());
    print_detail("Words", &article.word_count.to_string());
    eprintln!(
        "  {} {}\n",
        "Reading time:".dimmed(),
        format!("{:.1} min", article.reading_time).bright_white()
    );
}

/// Print the steps to refresh expired session cookies
pub fn print_refresh_instructions() {
    eprintln!("{}", "Your session cookies have expired. To fix this:".bright_yellow());
    eprintln!("  1. Log into x.com in your browser");
    eprintln!("  2. Open DevTools, then Application, Cookies, x.com");
    eprintln!("  3. Copy the values of 'auth_token' and 'ct0'");
    eprintln!("  4. Update TWITTER_AUTH_TOKEN and TWITTER_CT0 in your .env");
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

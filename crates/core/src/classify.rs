//! Declarative text classification.
//!
//! Noise filtering and title cleanup are both expressed as tables of
//! `pattern -> action` pairs. A table is made of stages; within a stage the
//! first matching rule wins, and stages are applied one after another. New
//! patterns are added by editing a table, never the control flow.
//!
//! # Example
//!
//! ```rust
//! use inkdrop_core::classify::{TextClassifier, Verdict, ui_noise};
//!
//! assert_eq!(ui_noise().classify("Show more"), Verdict::Noise);
//! assert_eq!(ui_noise().classify("A real sentence from the thread."), Verdict::Pass);
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// What happens to text matched by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The whole text is interface chrome.
    Reject,
    /// Delete the matched span and keep the rest.
    Strip,
    /// Replace the whole text with the given capture group.
    Capture(usize),
}

/// One row of a rule table.
pub type Rule = (&'static str, Action);

/// Outcome of classifying a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No rule matched.
    Pass,
    /// A [`Action::Reject`] rule matched.
    Noise,
    /// The text was rewritten.
    Rewrite(String),
}

/// The single capability shared by every classifier.
pub trait TextClassifier {
    fn classify(&self, text: &str) -> Verdict;

    /// Apply the classifier and return the resulting text.
    ///
    /// `None` means the text was rejected as noise.
    fn rewrite(&self, text: &str) -> Option<String> {
        match self.classify(text) {
            Verdict::Pass => Some(text.to_string()),
            Verdict::Noise => None,
            Verdict::Rewrite(rewritten) => Some(rewritten),
        }
    }
}

/// Single-word platform actions, engagement counters, short dates and fixed
/// UI phrases. Every pattern must match the full (trimmed) text.
pub const UI_NOISE_RULES: &[&[Rule]] = &[&[
    (r"(?i)^follow$", Action::Reject),
    (r"(?i)^repost$", Action::Reject),
    (r"(?i)^like$", Action::Reject),
    (r"(?i)^share$", Action::Reject),
    (r"(?i)^reply$", Action::Reject),
    (r"(?i)^home$", Action::Reject),
    (r"(?i)^explore$", Action::Reject),
    (r"(?i)^notifications$", Action::Reject),
    (r"(?i)^messages$", Action::Reject),
    (r"(?i)^bookmarks$", Action::Reject),
    (r"(?i)^profile$", Action::Reject),
    (r"(?i)^more$", Action::Reject),
    (r"(?i)^post$", Action::Reject),
    (r"^\d+$", Action::Reject),
    (r"(?i)^\d+[KMB]?$", Action::Reject),
    (r"(?i)^[A-Z][a-z]+ \d+$", Action::Reject),
    (r"(?i)^show more$", Action::Reject),
    (r"(?i)^show this thread$", Action::Reject),
]];

/// Title chrome, in application order. The last stage extracts a quoted
/// post body and only falls back to stripping the author prefix when there
/// is no quoted body.
pub const TITLE_RULES: &[&[Rule]] = &[
    &[(r"\s*[/|]\s*X$", Action::Strip)],
    &[(r"^\(\d+\)\s*", Action::Strip)],
    &[(r#"^.+? on X: "(.+)"$"#, Action::Capture(1)), (r"^.+? on X: ", Action::Strip)],
];

/// A compiled rule table.
#[derive(Debug, Default)]
pub struct RuleSet {
    stages: Vec<Vec<(Regex, Action)>>,
}

impl RuleSet {
    /// Compile a table, failing on the first invalid pattern.
    pub fn try_from_table(table: &[&[Rule]]) -> Result<Self, regex::Error> {
        let stages = table
            .iter()
            .map(|stage| {
                stage
                    .iter()
                    .map(|(pattern, action)| Regex::new(pattern).map(|re| (re, *action)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stages })
    }

    /// Compile a table, logging and skipping invalid patterns.
    pub fn from_table(table: &[&[Rule]]) -> Self {
        let stages = table
            .iter()
            .map(|stage| {
                stage
                    .iter()
                    .filter_map(|(pattern, action)| match Regex::new(pattern) {
                        Ok(re) => Some((re, *action)),
                        Err(e) => {
                            tracing::error!(pattern, error = %e, "skipping invalid classifier pattern");
                            None
                        }
                    })
                    .collect()
            })
            .collect();
        Self { stages }
    }

    /// Number of compiled rules across all stages.
    pub fn len(&self) -> usize {
        self.stages.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn apply(re: &Regex, action: Action, text: &str) -> Option<Verdict> {
    match action {
        Action::Reject => re.is_match(text).then_some(Verdict::Noise),
        Action::Strip => re
            .find(text)
            .map(|m| Verdict::Rewrite(format!("{}{}", &text[..m.start()], &text[m.end()..]))),
        Action::Capture(group) => re
            .captures(text)
            .and_then(|caps| caps.get(group))
            .map(|m| Verdict::Rewrite(m.as_str().to_string())),
    }
}

impl TextClassifier for RuleSet {
    fn classify(&self, text: &str) -> Verdict {
        let mut current: Option<String> = None;

        for stage in &self.stages {
            let input = current.as_deref().unwrap_or(text);
            let hit = stage.iter().find_map(|(re, action)| apply(re, *action, input));
            match hit {
                Some(Verdict::Noise) => return Verdict::Noise,
                Some(Verdict::Rewrite(rewritten)) => current = Some(rewritten),
                Some(Verdict::Pass) | None => {}
            }
        }

        match current {
            Some(rewritten) => Verdict::Rewrite(rewritten),
            None => Verdict::Pass,
        }
    }
}

static UI_NOISE: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::from_table(UI_NOISE_RULES));
static TITLE_CHROME: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::from_table(TITLE_RULES));

/// The shared UI-noise classifier.
pub fn ui_noise() -> &'static RuleSet {
    &UI_NOISE
}

/// The shared title-chrome classifier.
pub fn title_chrome() -> &'static RuleSet {
    &TITLE_CHROME
}

/// Whether `text` is interface chrome rather than authored content.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub fn is_ui_noise(text: &str) -> bool {
    ui_noise().classify(text.trim()) == Verdict::Noise
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_rule_tables_compile() {
        let noise = RuleSet::try_from_table(UI_NOISE_RULES).unwrap();
        assert_eq!(noise.len(), UI_NOISE_RULES.iter().map(|s| s.len()).sum::<usize>());
        let title = RuleSet::try_from_table(TITLE_RULES).unwrap();
        assert_eq!(title.len(), 4);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let table: &[&[Rule]] = &[&[("(unclosed", Action::Reject), ("^ok$", Action::Reject)]];
        assert!(RuleSet::try_from_table(table).is_err());
        let lenient = RuleSet::from_table(table);
        assert_eq!(lenient.len(), 1);
        assert_eq!(lenient.classify("ok"), Verdict::Noise);
    }

    #[rstest]
    #[case("Follow")]
    #[case("FOLLOW")]
    #[case("repost")]
    #[case("Like")]
    #[case("Share")]
    #[case("Reply")]
    #[case("Home")]
    #[case("Explore")]
    #[case("Notifications")]
    #[case("Messages")]
    #[case("Bookmarks")]
    #[case("Profile")]
    #[case("More")]
    #[case("Post")]
    #[case("1234")]
    #[case("5K")]
    #[case("5k")]
    #[case("10M")]
    #[case("3B")]
    #[case("Jan 15")]
    #[case("jan 15")]
    #[case("Show more")]
    #[case("SHOW MORE")]
    #[case("Show this thread")]
    #[case("  Follow  ")]
    fn test_ui_noise_rejected(#[case] text: &str) {
        assert!(is_ui_noise(text), "{text:?} should be noise");
    }

    #[rstest]
    #[case("Following the money is the first step.")]
    #[case("5K people")]
    #[case("1.5K")]
    #[case("Show more of your work")]
    #[case("Jan 15 2024")]
    #[case("")]
    fn test_content_passes(#[case] text: &str) {
        assert!(!is_ui_noise(text), "{text:?} should not be noise");
    }

    #[test]
    fn test_strip_and_capture() {
        let table: &[&[Rule]] = &[&[(r"^(\w+) says", Action::Capture(1))], &[(r"!+$", Action::Strip)]];
        let rules = RuleSet::from_table(table);
        assert_eq!(rules.classify("alice says hi!!"), Verdict::Rewrite("alice".to_string()));
        assert_eq!(rules.classify("hello!!"), Verdict::Rewrite("hello".to_string()));
        assert_eq!(rules.classify("hello"), Verdict::Pass);
        assert_eq!(rules.rewrite("hello"), Some("hello".to_string()));
    }

    #[test]
    fn test_first_match_within_stage() {
        let rules = title_chrome();
        assert_eq!(
            rules.classify(r#"Jane on X: "quoted""#),
            Verdict::Rewrite("quoted".to_string())
        );
        assert_eq!(rules.classify("Jane on X: unquoted"), Verdict::Rewrite("unquoted".to_string()));
    }
}

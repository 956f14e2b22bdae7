use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const ANALYSIS_LABEL: &str = "Análisis";
pub const RECOMMENDATIONS_LABEL: &str = "Recomendaciones";

static ANALYSIS_PARSER: Lazy<SectionParser> = Lazy::new(|| {
    SectionParser::new(ANALYSIS_LABEL)
        .with_rule(HeadingRule::BoldOrdinal)
        .with_rule(HeadingRule::HashHeading)
});

static RECOMMENDATIONS_PARSER: Lazy<SectionParser> = Lazy::new(|| {
    SectionParser::new(RECOMMENDATIONS_LABEL)
        .with_rule(HeadingRule::BoldOrdinal)
        .with_rule(HeadingRule::HashHeading)
        .with_rule(HeadingRule::LeadingWord("MAZO".to_string()))
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: Vec<String>,
}

/// Line-level heading heuristics. Matching is done on the raw line, so an
/// indented marker never opens a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingRule {
    /// `**1.` style bold ordinal.
    BoldOrdinal,
    /// One to three `#` followed by whitespace.
    HashHeading,
    /// A fixed leading word, ASCII case-insensitive.
    LeadingWord(String),
}

impl HeadingRule {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            HeadingRule::BoldOrdinal => {
                let Some(rest) = line.strip_prefix("**") else {
                    return false;
                };
                let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                digits > 0 && rest[digits..].starts_with('.')
            }
            HeadingRule::HashHeading => strip_hash_marker(line).is_some(),
            HeadingRule::LeadingWord(word) => line
                .get(..word.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(word)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SectionParser {
    rules: Vec<HeadingRule>,
    label: String,
}

impl SectionParser {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            label: label.into(),
        }
    }

    pub fn with_rule(mut self, rule: HeadingRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Parser for the coaching analysis text.
    pub fn analysis() -> &'static SectionParser {
        &ANALYSIS_PARSER
    }

    /// Parser for deck recommendations; also opens a section on lines
    /// starting with `MAZO`.
    pub fn recommendations() -> &'static SectionParser {
        &RECOMMENDATIONS_PARSER
    }

    pub fn is_heading(&self, line: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(line))
    }

    pub fn parse(&self, text: &str) -> Vec<Section> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut sections = Vec::new();
        // Content before the first heading is filed under the label.
        let mut current = Section {
            title: self.label.clone(),
            content: Vec::new(),
        };

        for line in text.split('\n') {
            if self.is_heading(line) {
                let next = Section {
                    title: heading_title(line),
                    content: Vec::new(),
                };
                let done = std::mem::replace(&mut current, next);
                if !done.content.is_empty() {
                    sections.push(done);
                }
            } else if !line.trim().is_empty() {
                current.content.push(line.to_string());
            }
        }

        if !current.content.is_empty() {
            sections.push(current);
        }

        if sections.is_empty() {
            tracing::debug!(label = %self.label, "no sections found, using fallback");
            return vec![Section {
                title: self.label.clone(),
                content: text.split('\n').map(str::to_string).collect(),
            }];
        }
        sections
    }
}

pub fn parse_analysis(text: &str) -> Vec<Section> {
    SectionParser::analysis().parse(text)
}

pub fn parse_recommendations(text: &str) -> Vec<Section> {
    SectionParser::recommendations().parse(text)
}

fn strip_hash_marker(line: &str) -> Option<&str> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    let first = rest.chars().next()?;
    if first.is_whitespace() {
        Some(&rest[first.len_utf8()..])
    } else {
        None
    }
}

// Only a standalone `N.` counts, so "2.6 de elixir" keeps its number. A
// title that is nothing but the ordinal keeps it too.
fn strip_ordinal(text: &str) -> &str {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || !text[digits..].starts_with('.') {
        return text;
    }
    let rest = &text[digits + 1..];
    match rest.chars().next() {
        Some(c) if c.is_whitespace() && !rest.trim().is_empty() => rest,
        _ => text,
    }
}

fn heading_title(line: &str) -> String {
    let unbolded = line.replace("**", "");
    let without_hash = strip_hash_marker(&unbolded).unwrap_or(&unbolded);
    strip_ordinal(without_hash.trim_start()).trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionIcon {
    Stats,
    Deck,
    Patterns,
    Tips,
    Matchups,
    Generic,
}

const ICON_KEYWORDS: &[(&[&str], SectionIcon)] = &[
    (&["rendimiento", "resumen"], SectionIcon::Stats),
    (&["mazo", "deck"], SectionIcon::Deck),
    (&["patrón", "error"], SectionIcon::Patterns),
    (&["recomend", "consejo"], SectionIcon::Tips),
    (&["matchup", "dificultad"], SectionIcon::Matchups),
];

impl SectionIcon {
    pub fn for_title(title: &str) -> Self {
        let lower = title.to_lowercase();
        ICON_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, icon)| *icon)
            .unwrap_or(SectionIcon::Generic)
    }

    pub fn glyph(self) -> &'static str {
        match self {
            SectionIcon::Stats => "📊",
            SectionIcon::Deck => "🎴",
            SectionIcon::Patterns => "🔍",
            SectionIcon::Tips => "💡",
            SectionIcon::Matchups => "⚔️",
            SectionIcon::Generic => "✨",
        }
    }
}

//! Section parser for the key-sectioned template dialect.
//!
//! A template file is a sequence of sections, each opened by a level-1
//! heading naming a field:
//!
//! ```text
//! # Subject
//! Password reset request
//!
//! # Labels
//! * changepassword
//! ```
//!
//! The parse is total. Unknown headings, stray text before the first heading
//! and non-bullet lines under `# Labels` are dropped without error.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::contract::ParsedTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Subject,
    FromEmail,
    FromName,
    Html,
    Text,
    Labels,
    Unknown,
}

impl Section {
    fn from_heading(heading: &str) -> Self {
        let key = heading
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        match key.as_str() {
            "subject" => Section::Subject,
            "from email" => Section::FromEmail,
            "from name" => Section::FromName,
            "html" => Section::Html,
            "text" => Section::Text,
            "labels" => Section::Labels,
            _ => Section::Unknown,
        }
    }
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[ \t]+(\S.*?)[ \t]*$").expect("static heading pattern"))
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[*+-][ \t]+(.*?)\s*$").expect("static bullet pattern"))
}

/// Parse raw template text into its fields.
pub fn parse_template(raw: &str) -> ParsedTemplate {
    let mut parsed = ParsedTemplate::default();
    let mut current: Option<Section> = None;
    let mut body: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if let Some(caps) = heading_re().captures(line) {
            if let Some(section) = current.take() {
                apply_section(&mut parsed, section, &body);
            }
            body.clear();
            current = Some(Section::from_heading(&caps[1]));
        } else if current.is_some() {
            body.push(line);
        }
    }
    if let Some(section) = current {
        apply_section(&mut parsed, section, &body);
    }

    debug!(
        subject = %parsed.subject,
        labels = parsed.labels.len(),
        "Parsed template sections"
    );
    parsed
}

fn apply_section(parsed: &mut ParsedTemplate, section: Section, body: &[&str]) {
    let text = body.join("\n").trim().to_string();
    match section {
        Section::Subject => parsed.subject = text,
        Section::FromEmail => parsed.from_email = text,
        Section::FromName => parsed.from_name = text,
        Section::Html => parsed.html = text,
        Section::Text => parsed.text = text,
        Section::Labels => parsed.labels = parse_labels(body),
        Section::Unknown => {}
    }
}

fn parse_labels(body: &[&str]) -> Vec<String> {
    body.iter()
        .filter_map(|line| bullet_re().captures(line))
        .map(|caps| caps[1].to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

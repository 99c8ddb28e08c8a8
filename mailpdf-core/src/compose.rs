//! HTML composer: lays out parsed templates for print.
//!
//! Each entry becomes one fixed block (name, path, sender, labels, subject,
//! HTML body, text body). Entries carrying a label, such as a branch name,
//! get a banner above their block. Blocks are separated by a page-break
//! marker, so `K` entries always produce exactly `K - 1` markers.
//!
//! Template bodies are inserted as-is. They come from the internal template
//! repository and are already HTML.

use crate::contract::ParsedTemplate;

/// Marker placed between consecutive entries.
pub const PAGE_BREAK: &str = r#"<p style="page-break-before: always">"#;

/// One document to lay out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEntry {
    pub name: String,
    pub path: String,
    pub template: ParsedTemplate,
    pub label: Option<String>,
}

impl RenderEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>, template: ParsedTemplate) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            template,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Ordered entries combined into a single HTML payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    entries: Vec<RenderEntry>,
}

impl RenderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: RenderEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RenderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn compose(&self) -> String {
        self.entries
            .iter()
            .map(entry_html)
            .collect::<Vec<_>>()
            .join(PAGE_BREAK)
    }
}

impl FromIterator<RenderEntry> for RenderRequest {
    fn from_iter<I: IntoIterator<Item = RenderEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn entry_html(entry: &RenderEntry) -> String {
    let mut html = String::new();
    if let Some(label) = &entry.label {
        html.push_str(&banner(label));
    }
    html.push_str(&template_block(entry));
    html
}

/// Heading shown above a labelled entry.
pub fn banner(label: &str) -> String {
    format!("<h1>Branch: {label}</h1><br />")
}

/// The fixed visual block for one template.
pub fn template_block(entry: &RenderEntry) -> String {
    let t = &entry.template;
    let labels: String = t.labels.iter().map(|l| format!("<li>{l}</li>")).collect();

    format!(
        "\n<h1>Template: {name}</h1><br />\n\
         <h1>Path: {path}</h1><br />\n\
         \n\
         <h2>From Email: {from_email}</h2><br />\n\
         <h2>From Name: {from_name}</h2><br />\n\
         <h2>Labels:</h2>\n\
         <ul>\n\
         {labels}\n\
         </ul><br />\n\
         <h2>Subject: {subject}</h2><br />\n\
         <h2>HTML:</h2><br />\n\
         {html}\n\
         <h2>Text:</h2><br />\n\
         {text}\n",
        name = entry.name,
        path = entry.path,
        from_email = t.from_email,
        from_name = t.from_name,
        labels = labels,
        subject = t.subject,
        html = t.html,
        text = t.text,
    )
}

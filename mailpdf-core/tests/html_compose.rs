mod common;

use mailpdf_core::compose::{banner, template_block, RenderEntry, RenderRequest, PAGE_BREAK};
use mailpdf_core::contract::ParsedTemplate;
use mailpdf_core::parser::parse_template;

fn sample(subject: &str) -> ParsedTemplate {
    ParsedTemplate {
        subject: subject.to_string(),
        ..ParsedTemplate::default()
    }
}

#[test]
fn page_breaks_separate_entries() {
    for count in 0usize..5 {
        let request: RenderRequest = (0..count)
            .map(|i| RenderEntry::new(format!("t{i}"), format!("t{i}.md"), sample("s")))
            .collect();

        let html = request.compose();

        assert_eq!(html.matches(PAGE_BREAK).count(), count.saturating_sub(1));
    }
}

#[test]
fn empty_request_composes_to_empty_document() {
    let request = RenderRequest::new();
    assert!(request.is_empty());
    assert_eq!(request.compose(), "");
}

#[test]
fn block_contains_every_field_in_order() {
    let entry = RenderEntry::new(
        "test-template",
        "test/template.md",
        parse_template(common::TEMPLATE),
    );

    let block = template_block(&entry);

    let expected = [
        "<h1>Template: test-template</h1><br />",
        "<h1>Path: test/template.md</h1><br />",
        "<h2>From Email: support@example.com</h2><br />",
        "<h2>From Name: Example Support</h2><br />",
        "<h2>Labels:</h2>",
        "<li>changepassword</li>",
        "</ul><br />",
        "<h2>Subject: Password reset request</h2><br />",
        "<h2>HTML:</h2><br />",
        "<p>*|FNAME|*,</p>",
        "<h2>Text:</h2><br />",
    ];
    let mut cursor = 0;
    for needle in expected {
        let found = block[cursor..]
            .find(needle)
            .unwrap_or_else(|| panic!("{needle:?} missing or out of order"));
        cursor += found + needle.len();
    }
}

#[test]
fn empty_template_still_renders_its_frame() {
    let entry = RenderEntry::new("blank", "blank.md", ParsedTemplate::default());

    let block = template_block(&entry);

    assert!(block.contains("<h2>Subject: </h2><br />"));
    assert!(block.contains("<ul>\n\n</ul><br />"));
}

#[test]
fn labelled_entries_get_a_banner_before_their_block() {
    let request: RenderRequest = ["master", "develop"]
        .into_iter()
        .map(|branch| {
            RenderEntry::new("welcome", "welcome.md", sample(branch)).with_label(branch)
        })
        .collect();

    let html = request.compose();

    let master = html.find(&banner("master")).expect("master banner");
    let develop = html.find(&banner("develop")).expect("develop banner");
    let first_block = html.find("<h2>Subject: master</h2>").unwrap();
    let second_block = html.find("<h2>Subject: develop</h2>").unwrap();
    let page_break = html.find(PAGE_BREAK).unwrap();

    assert!(master < first_block);
    assert!(first_block < page_break);
    assert!(page_break < develop);
    assert!(develop < second_block);
    assert_eq!(banner("master"), "<h1>Branch: master</h1><br />");
}

#[test]
fn unlabelled_entries_have_no_banner() {
    let request: RenderRequest =
        std::iter::once(RenderEntry::new("welcome", "welcome.md", sample("hi"))).collect();

    assert!(!request.compose().contains("Branch:"));
}

#[test]
fn bodies_are_inserted_verbatim() {
    let template = ParsedTemplate {
        html: "<b>bold & <i>raw</i></b>".to_string(),
        text: "plain <text>".to_string(),
        ..ParsedTemplate::default()
    };
    let block = template_block(&RenderEntry::new("raw", "raw.md", template));

    assert!(block.contains("<h2>HTML:</h2><br />\n<b>bold & <i>raw</i></b>\n"));
    assert!(block.contains("<h2>Text:</h2><br />\nplain <text>\n"));
}

mod common;

use mailpdf_core::contract::ParsedTemplate;
use mailpdf_core::parser::parse_template;

#[test]
fn parses_every_section_of_a_template() {
    let parsed = parse_template(common::TEMPLATE);

    assert_eq!(parsed.subject, "Password reset request");
    assert_eq!(parsed.from_email, "support@example.com");
    assert_eq!(parsed.from_name, "Example Support");
    assert_eq!(parsed.labels, vec!["changepassword".to_string()]);
    assert_eq!(parsed.text, "");
    assert!(parsed.html.starts_with("<div mc:edit=\"header\">"));
    assert!(parsed.html.contains("<p>*|FNAME|*,</p>"));
    assert!(parsed.html.ends_with("</div>"));
}

#[test]
fn parsing_is_idempotent() {
    let first = parse_template(common::TEMPLATE);
    let second = parse_template(common::TEMPLATE);
    assert_eq!(first, second);
}

#[test]
fn empty_input_yields_empty_template() {
    let parsed = parse_template("");
    assert_eq!(parsed, ParsedTemplate::default());
    assert!(parsed.labels.is_empty());
}

#[test]
fn missing_sections_stay_empty() {
    let parsed = parse_template("# Subject\nHello\n");
    assert_eq!(parsed.subject, "Hello");
    assert_eq!(parsed.from_email, "");
    assert_eq!(parsed.from_name, "");
    assert_eq!(parsed.html, "");
    assert_eq!(parsed.text, "");
    assert!(parsed.labels.is_empty());
}

#[test]
fn text_without_headings_is_ignored() {
    let parsed = parse_template("just some words\n## not a level one heading\n#nospace");
    assert_eq!(parsed, ParsedTemplate::default());
}

#[test]
fn unknown_sections_are_dropped() {
    let raw = "# Notes\nremember to update\n# Subject\nWelcome\n";
    let parsed = parse_template(raw);
    assert_eq!(parsed.subject, "Welcome");
    assert!(!parsed.html.contains("remember"));
}

#[test]
fn headings_match_regardless_of_case_and_spacing() {
    let raw = "#   from   email  \nops@example.com\n# FROM NAME\nOps\n";
    let parsed = parse_template(raw);
    assert_eq!(parsed.from_email, "ops@example.com");
    assert_eq!(parsed.from_name, "Ops");
}

#[test]
fn labels_collect_every_bullet_style() {
    let raw = "# Labels\n* one\n- two\n+ three\nnot a bullet\n*   \n  * four  \n";
    let parsed = parse_template(raw);
    assert_eq!(parsed.labels, vec!["one", "two", "three", "four"]);
}

#[test]
fn subheadings_stay_inside_the_section_body() {
    let raw = "# Html\n<h1>Hi</h1>\n## Details\n<p>body</p>\n# Text\nplain\n";
    let parsed = parse_template(raw);
    assert_eq!(parsed.html, "<h1>Hi</h1>\n## Details\n<p>body</p>");
    assert_eq!(parsed.text, "plain");
}

#[test]
fn repeated_section_keeps_the_last_occurrence() {
    let parsed = parse_template("# Subject\nfirst\n# Subject\nsecond\n");
    assert_eq!(parsed.subject, "second");
}

#[test]
fn crlf_line_endings_are_handled() {
    let parsed = parse_template("# Subject\r\nWindows\r\n# Labels\r\n* crlf\r\n");
    assert_eq!(parsed.subject, "Windows");
    assert_eq!(parsed.labels, vec!["crlf"]);
}

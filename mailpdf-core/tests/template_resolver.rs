use mailpdf_core::contract::{MockVersionSource, TemplateDescriptor};
use mailpdf_core::error::SourceError;
use mailpdf_core::resolver::{derive_template_name, name_from_identifier, TemplateResolver};

fn listing(files: &'static [&'static str]) -> MockVersionSource {
    let mut source = MockVersionSource::new();
    source
        .expect_list_all_files()
        .returning(move || Ok(files.iter().map(|f| f.to_string()).collect()));
    source
}

#[test]
fn derives_names_from_paths() {
    assert_eq!(derive_template_name("test/template.md"), "test-template");
    assert_eq!(derive_template_name("welcome.md"), "welcome");
    assert_eq!(derive_template_name("a/b/c.md"), "a-b-c");
    assert_eq!(derive_template_name("noext"), "noext");
    assert_eq!(derive_template_name(".hidden"), ".hidden");
}

#[test]
fn identifiers_without_separator_are_names() {
    assert_eq!(name_from_identifier("test-template"), "test-template");
    assert_eq!(name_from_identifier("test/template.md"), "test-template");
}

#[tokio::test]
async fn resolves_name_to_first_matching_path() {
    let source = listing(&["README.md", "test/template.md", "test-template.md"]);
    let resolver = TemplateResolver::new(&source);

    let path = resolver.path_from_name("test-template").await.unwrap();

    assert_eq!(path.as_deref(), Some("test/template.md"));
}

#[tokio::test]
async fn unknown_name_resolves_to_nothing() {
    let source = listing(&["test/template.md"]);
    let resolver = TemplateResolver::new(&source);

    assert_eq!(resolver.path_from_name("missing").await.unwrap(), None);
    assert_eq!(resolver.resolve("missing").await.unwrap(), None);
}

#[tokio::test]
async fn paths_are_returned_without_listing() {
    let mut source = MockVersionSource::new();
    source.expect_list_all_files().never();
    let resolver = TemplateResolver::new(&source);

    let descriptor = resolver.resolve("test/template.md").await.unwrap();

    assert_eq!(
        descriptor,
        Some(TemplateDescriptor {
            logical_name: "test-template".to_string(),
            source_path: "test/template.md".to_string(),
        })
    );
}

#[tokio::test]
async fn blank_identifier_never_resolves() {
    let mut source = MockVersionSource::new();
    source.expect_list_all_files().never();
    let resolver = TemplateResolver::new(&source);

    assert_eq!(resolver.resolve("").await.unwrap(), None);
    assert_eq!(resolver.resolve("   ").await.unwrap(), None);
}

#[tokio::test]
async fn name_and_path_round_trip() {
    let files: &'static [&'static str] = &["emails/welcome.md", "test/template.md", "reset.md"];
    let source = listing(files);
    let resolver = TemplateResolver::new(&source);

    for path in files {
        let name = derive_template_name(path);
        let resolved = resolver.path_from_name(&name).await.unwrap();
        assert_eq!(resolved.as_deref(), Some(*path), "round trip of {name}");
    }
}

#[tokio::test]
async fn listing_failure_propagates() {
    let mut source = MockVersionSource::new();
    source
        .expect_list_all_files()
        .returning(|| Err(SourceError::Other("listing unavailable".to_string())));
    let resolver = TemplateResolver::new(&source);

    let err = resolver.resolve("welcome").await.unwrap_err();
    assert!(matches!(err, SourceError::Other(_)));
}

#[tokio::test]
async fn web_link_uses_resolved_path() {
    let mut source = listing(&["test/template.md"]);
    source
        .expect_get_file_web_link()
        .withf(|path: &str| path == "test/template.md")
        .times(1)
        .returning(|path| Ok(format!("https://github.com/acme/templates/blob/master/{path}")));
    let resolver = TemplateResolver::new(&source);

    let link = resolver.web_link("test-template").await.unwrap();

    assert_eq!(
        link.as_deref(),
        Some("https://github.com/acme/templates/blob/master/test/template.md")
    );
}

#[tokio::test]
async fn web_link_of_unknown_template_is_none() {
    let mut source = listing(&["test/template.md"]);
    source.expect_get_file_web_link().never();
    let resolver = TemplateResolver::new(&source);

    assert_eq!(resolver.web_link("missing").await.unwrap(), None);
}

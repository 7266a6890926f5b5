//! Library API integration tests
use restyler_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

#[test]
fn test_classify_fixtures() {
    assert_eq!(classify(&read_fixture("target.md")), ContentType::Markdown);
    assert_eq!(classify(&read_fixture("target.txt")), ContentType::PlainText);
    assert_eq!(classify(""), ContentType::Empty);
}

#[test]
fn test_extract_source_profile() {
    let profile = extract_styles(&read_fixture("source.html"));

    assert_eq!(profile.css_rules.len(), 2);
    assert!(profile.css_rules[0].contains("font-family: Georgia"));
    assert!(profile.css_rules[1].contains(".codehilite"));

    assert_eq!(
        profile.inline_styles["p"],
        vec!["line-height:1.7;margin:0 0 1em", "line-height:1.7;margin:0 0 1em", "font-style:italic"]
    );
    assert_eq!(profile.inline_styles["h1"], vec!["font-size:2.4em;letter-spacing:-1px"]);

    for class in ["journal", "site-header", "entry", "wide"] {
        assert!(profile.class_names.contains(class), "missing class {}", class);
    }
    assert_eq!(profile.element_ids.len(), 2);
    assert!(profile.element_ids.contains("masthead"));
    assert!(profile.element_ids.contains("content"));
}

#[test]
fn test_transform_markdown_fixture() {
    let result = transform(&read_fixture("source.html"), &read_fixture("target.md")).expect("should transform");

    assert_eq!(result.content_type, ContentType::Markdown);
    assert_eq!(result.processed_markdown, result.original_content);

    let html = &result.transformed_html;
    assert!(html.starts_with("<head><style>"));
    assert!(html.contains("h1, h2 { color: #b58900; }"));
    assert!(html.contains(r#"<h1 id="trip-report" style="font-size:2.4em;letter-spacing:-1px">Trip Report</h1>"#));
    assert!(html.contains(r#"<h2 id="gear" style="border-bottom:1px solid #ccc">Gear</h2>"#));
    assert!(html.contains(r#"<ul style="padding-left:1.2em">"#));
    assert!(html.contains(r#"<p style="line-height:1.7;margin:0 0 1em">The weather held"#));
    assert!(html.contains(r#"<div class="codehilite">"#));
    assert!(html.contains(r#"<code class="language-rust"><span class="source rust">"#));
    assert!(html.contains(r#"<a href="https://example.com/map">the map</a>"#));
}

#[test]
fn test_transform_plain_text_fixture() {
    let target = read_fixture("target.txt");
    let result = transform(&read_fixture("source.html"), &target).expect("should transform");

    assert_eq!(result.content_type, ContentType::PlainText);
    assert_eq!(result.original_content, target);
    assert!(result.processed_markdown.starts_with("## Trip Report\n"));
    assert!(result.processed_markdown.contains("\n## Gear\n- tent\n- stove"));
    assert_eq!(result.processed_markdown.lines().count(), target.lines().count());

    let html = &result.transformed_html;
    assert!(html.contains(r#"<h2 id="trip-report" style="border-bottom:1px solid #ccc">Trip Report</h2>"#));
    assert!(html.contains("<li>tent</li>"));
}

#[test]
fn test_transform_is_repeatable() {
    let source = read_fixture("source.html");
    let target = read_fixture("target.md");
    assert_eq!(transform(&source, &target).unwrap(), transform(&source, &target).unwrap());
}

#[test]
fn test_transform_rejects_empty_input() {
    let source = read_fixture("source.html");
    assert!(matches!(transform("", "text"), Err(RestylerError::Validation(_))));
    assert!(matches!(transform(&source, "  \n "), Err(RestylerError::Validation(_))));
}

#[test]
fn test_malformed_source() {
    let html = read_fixture("malformed.html");
    let profile = extract_styles(&html);

    assert_eq!(profile.css_rules, vec!["p { color: teal }"]);
    assert_eq!(profile.inline_styles["p"], vec!["margin:2px", "margin:2px"]);
    assert_eq!(profile.inline_styles["td"], vec!["border:1px"]);
    assert!(profile.class_names.contains("card"));

    let result = transform(&html, "plain words").expect("malformed source still transforms");
    assert!(result.transformed_html.contains(r#"<p style="margin:2px">plain words</p>"#));
}

#[test]
fn test_document_round_trip() {
    let doc = Document::parse(&read_fixture("source.html"));
    let reparsed = Document::parse(&doc.to_html());
    assert_eq!(doc.to_html(), reparsed.to_html());
}

#[test]
fn test_apply_to_parsed_document() {
    let profile = extract_styles(&read_fixture("source.html"));
    let target = Document::parse("<p>first</p><blockquote><p>nested</p></blockquote>");
    let styled = apply_styles(target, &profile);

    let paragraphs: Vec<Element> = styled.elements().filter(|el| el.name() == "p").collect();
    assert_eq!(paragraphs.len(), 2);
    for p in paragraphs {
        assert_eq!(p.attr("style"), Some("line-height:1.7;margin:0 0 1em"));
    }
    assert!(styled.head().is_some());
}

#[test]
fn test_restyler_builder() {
    let config = RestylerConfig::builder().markdown_threshold(0.99).build();
    let restyler = Restyler::with_config(config);
    let result = restyler.transform(&read_fixture("source.html"), "# Only a heading\nand text").unwrap();
    assert_eq!(result.content_type, ContentType::PlainText);
}

#[test]
fn test_process_source_api() {
    let processed = process_source(&read_fixture("target.txt")).unwrap();
    assert_eq!(processed.content_type, ContentType::PlainText);
    assert!(processed.processed_content.contains("- tent"));

    let json = serde_json::to_value(&processed).unwrap();
    assert_eq!(json["content_type"], "plain_text");
}

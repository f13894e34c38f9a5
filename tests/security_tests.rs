//! Hostile input tests
//!
//! Checks the exact Markdown produced for documents carrying script content,
//! event handlers, unsafe URLs, embedded content and escaped markup, and that
//! adversarial nesting fails closed.

use html2md_converter::{ErrorKind, Node, Options, adapt, convert};

/// Convert with default options, asserting success
fn to_markdown(html: &str) -> String {
    let outcome = convert(html, &Options::default());
    assert!(outcome.ok(), "conversion failed: {:?}", outcome.error);
    outcome.markdown
}

fn attribute_names(node: &Node, names: &mut Vec<String>) {
    if let Node::Element(element) = node {
        names.extend(element.attributes.keys().cloned());
    }
    for child in node.children() {
        attribute_names(child, names);
    }
}

#[test]
fn test_script_between_blocks_dropped() {
    let html = "<p>Before</p><script>alert('xss')</script><p>After</p>";
    assert_eq!(to_markdown(html), "Before\n\nAfter\n");
}

#[test]
fn test_inline_script_keeps_surrounding_spacing() {
    let html = "<p>Text <script>malicious()</script> more text</p>";
    assert_eq!(to_markdown(html), "Text more text\n");
}

#[test]
fn test_non_content_elements_dropped() {
    let html = "<html><head><style>p { color: red }</style></head><body>\
        <noscript>Enable scripts</noscript>\
        <template><p>Hidden</p></template>\
        <p>Content</p>\
        <svg><text>Vector</text></svg>\
        </body></html>";
    assert_eq!(to_markdown(html), "Content\n");
}

#[test]
fn test_embedded_content_dropped_with_fallback() {
    let html = "<p>Before</p>\
        <iframe src=\"https://evil.com/frame\"></iframe>\
        <object data=\"movie.swf\"><p>Fallback</p></object>\
        <embed src=\"movie.swf\">\
        <p>After</p>";
    assert_eq!(to_markdown(html), "Before\n\nAfter\n");
}

#[test]
fn test_event_handlers_removed_from_tree() {
    let html = r#"<p onclick="alert(1)">Click <b onmouseover="x()">me</b></p><a href="/x" ONLOAD="y()">x</a>"#;
    let root = adapt(html).expect("adapt failed");

    let mut names = Vec::new();
    attribute_names(&root, &mut names);
    names.sort();
    assert_eq!(names, vec!["href".to_string()]);
}

#[test]
fn test_elements_with_handlers_still_render() {
    let html = r#"<p onclick="alert(1)">Click <b onmouseover="x()">me</b></p>"#;
    assert_eq!(to_markdown(html), "Click **me**\n");
}

#[test]
fn test_unsafe_link_schemes_render_text_only() {
    let hrefs = [
        "javascript:alert('xss')",
        "JaVaScRiPt:alert('xss')",
        "  javascript:alert(1)",
        "java\tscript:alert(1)",
        "vbscript:msgbox('xss')",
        "data:text/html,<script>alert('xss')</script>",
        "file:///etc/passwd",
        "about:blank",
    ];
    for href in hrefs {
        let html = format!("<p><a href=\"{href}\">Click</a> here</p>");
        assert_eq!(to_markdown(&html), "Click here\n", "href {href:?}");
    }
}

#[test]
fn test_unsafe_image_sources_dropped() {
    let html = r#"<p>a<img src="javascript:alert(1)" alt="Image">b<img src="data:image/svg+xml,<svg onload='alert(1)'>" alt="SVG">c</p>"#;
    assert_eq!(to_markdown(html), "abc\n");
}

#[test]
fn test_safe_urls_preserved() {
    let html = r##"<p><a href="https://example.com">S</a> <a href="/rel">R</a> <a href="#top">T</a> <a href="mailto:me@example.com">M</a></p>"##;
    assert_eq!(
        to_markdown(html),
        "[S](https://example.com) [R](/rel) [T](#top) [M](mailto:me@example.com)\n"
    );
    assert_eq!(
        to_markdown(r#"<img src="../img/a.png" alt="A">"#),
        "![A](../img/a.png)\n"
    );
}

#[test]
fn test_escaped_markup_stays_text() {
    assert_eq!(
        to_markdown("<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"),
        "\\<script>alert(1)\\</script>\n"
    );
    assert_eq!(
        to_markdown("<p>&lt;img src=x onerror=alert(1)&gt;</p>"),
        "\\<img src=x onerror=alert(1)>\n"
    );
    assert_eq!(
        to_markdown(r#"<p><a href="/x">&lt;b&gt;</a></p>"#),
        "[\\<b>](/x)\n"
    );
}

#[test]
fn test_table_cells_sanitized() {
    let html = r#"<table><tr><th onclick="alert('xss')">Header</th></tr><tr><td><a href="javascript:alert('xss')">Link</a></td></tr></table>"#;
    assert_eq!(to_markdown(html), "| Header |\n| ------ |\n| Link   |\n");
}

#[test]
fn test_mixed_attack_document() {
    let html = r#"<script>alert(1)</script><p onclick="alert(2)">Click</p><a href="javascript:alert(3)">Link</a><img src="javascript:alert(4)" alt="Image"><iframe src="javascript:alert(5)"></iframe><p>Safe content</p>"#;
    assert_eq!(to_markdown(html), "Click\n\nLink\n\nSafe content\n");
}

#[test]
fn test_nesting_within_limit_converts() {
    let html = format!(
        "{}<p>Deep content</p>{}",
        "<div>".repeat(100),
        "</div>".repeat(100)
    );
    assert_eq!(to_markdown(&html), "Deep content\n");
}

#[test]
fn test_nesting_limit_fails_closed() {
    let html = format!("{}<p>Deep content</p>", "<div>".repeat(200));
    let options = Options {
        max_depth: 50,
        ..Default::default()
    };

    let outcome = convert(&html, &options);
    assert!(!outcome.ok());
    assert_eq!(outcome.error_kind(), Some(ErrorKind::DepthExceeded));
    assert_eq!(outcome.markdown, "");
}

#[test]
fn test_pathological_nesting_does_not_overflow() {
    let html = "<span>".repeat(20_000);
    let outcome = convert(&html, &Options::default());
    assert_eq!(outcome.error_kind(), Some(ErrorKind::DepthExceeded));
    assert_eq!(outcome.markdown, "");
}

#[test]
fn test_url_sanitization_disabled() {
    let options = Options {
        sanitize_urls: false,
        ..Default::default()
    };
    let outcome = convert(r#"<a href="about:blank">Blank</a>"#, &options);
    assert!(outcome.ok());
    assert_eq!(outcome.markdown, "[Blank](about:blank)\n");
}

//! Basic conversion demo for the HTML to Markdown converter

use html2md_converter::{Converter, HeadingStyle, Options, convert};

fn main() {
    println!("=== HTML to Markdown Converter - Basic Demos ===\n");

    // Demo 1: Headings, paragraphs and inline formatting
    demo_1();

    // Demo 2: Nested lists
    demo_2();

    // Demo 3: Tables and code
    demo_3();

    // Demo 4: Script and unsafe URL removal (security)
    demo_4();

    // Demo 5: Setext headings and line wrapping
    demo_5();

    // Demo 6: Error status
    demo_6();
}

fn show(title: &str, html: &str, options: Options) {
    println!("{title}");
    println!("Input HTML:");
    println!("{html}\n");

    let mut converter = Converter::new(html, options);
    let markdown = converter.convert();

    println!("Output Markdown (ok = {}):", converter.ok());
    println!("{markdown}");
    println!("---\n");
}

fn demo_1() {
    show(
        "Demo 1: Headings, paragraphs and inline formatting",
        "<h1>Welcome</h1><p>This is a <strong>test</strong> document with <em>emphasis</em> and <code>code</code>.</p>",
        Options::default(),
    );
}

fn demo_2() {
    show(
        "Demo 2: Nested lists",
        "<ol><li>First<ul><li>Nested item</li><li>Another</li></ul></li><li>Second</li></ol>",
        Options::default(),
    );
}

fn demo_3() {
    show(
        "Demo 3: Tables and code",
        r#"<table><tr><th>Name</th><th align="right">Count</th></tr><tr><td>apples</td><td>12</td></tr></table>
<pre><code class="language-rust">fn main() {
    println!("hello");
}</code></pre>"#,
        Options::default(),
    );
}

fn demo_4() {
    show(
        "Demo 4: Script and unsafe URL removal (security)",
        r#"<h1>Title</h1><script>alert('xss')</script><p><a href="javascript:alert(1)">Safe text</a></p>"#,
        Options::default(),
    );
    println!("Note: Script tags and javascript: links are removed for security\n");
}

fn demo_5() {
    let options = Options {
        heading_style: HeadingStyle::Setext,
        line_width: 40,
        ..Default::default()
    };
    show(
        "Demo 5: Setext headings and line wrapping",
        "<h2>Wrapping</h2><p>Long paragraphs are wrapped at the configured width, but never inside <a href=\"https://example.com\">a link</a> or <code>inline code spans</code>.</p>",
        options,
    );
}

fn demo_6() {
    println!("Demo 6: Error status");
    let options = Options {
        max_depth: 16,
        ..Default::default()
    };
    let outcome = convert(&"<div>".repeat(64), &options);
    println!("ok = {}, error = {:?}", outcome.ok(), outcome.error);
    println!("---\n");
}

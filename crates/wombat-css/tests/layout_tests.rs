//! Integration tests for the cell-grid layout engine.

use wombat_css::{
    extract_style_content, layout_document, parse_stylesheet_str, resolve_styles, ua_stylesheet,
    BoxType, LayoutBox, StyleMap, Stylesheet,
};
use wombat_dom::DomTree;
use wombat_html::parse_document;

/// Full pipeline: parse, style (UA + document styles), lay out.
fn layout(html: &str, width: i32) -> LayoutBox {
    let tree = parse_document(html);
    let author = parse_stylesheet_str(&extract_style_content(&tree));
    let styles = resolve_styles(&tree, &[ua_stylesheet(), author]);
    layout_document(&tree, &styles, width)
}

/// Layout without any stylesheet at all (everything defaults to inline).
fn layout_unstyled(html: &str, width: i32) -> (DomTree, StyleMap, LayoutBox) {
    let tree = parse_document(html);
    let sheets: Vec<Stylesheet> = Vec::new();
    let styles = resolve_styles(&tree, &sheets);
    let root = layout_document(&tree, &styles, width);
    (tree, styles, root)
}

fn find_box<'a>(b: &'a LayoutBox, tag: &str) -> Option<&'a LayoutBox> {
    if b.tag.as_deref() == Some(tag) {
        return Some(b);
    }
    b.children.iter().find_map(|c| find_box(c, tag))
}

fn collect_text_boxes<'a>(b: &'a LayoutBox, out: &mut Vec<&'a LayoutBox>) {
    if b.box_type == BoxType::Text {
        out.push(b);
    }
    for child in &b.children {
        collect_text_boxes(child, out);
    }
}

fn assert_positive_dimensions(b: &LayoutBox) {
    assert!(
        b.dimensions.content.width >= 0,
        "negative width on {:?} box",
        b.box_type
    );
    assert!(
        b.dimensions.content.height >= 0,
        "negative height on {:?} box",
        b.box_type
    );
    for child in &b.children {
        assert_positive_dimensions(child);
    }
}

#[test]
fn test_plain_text_single_box() {
    // Spec scenario: <html><body><p>Hello</p></body></html> at width 20
    // with no stylesheets gives one text box "Hello" at (0,0), 5×1.
    let (_, _, root) = layout_unstyled("<html><body><p>Hello</p></body></html>", 20);
    let mut texts = Vec::new();
    collect_text_boxes(&root, &mut texts);
    assert_eq!(texts.len(), 1);
    let hello = texts[0];
    assert_eq!(hello.text.as_deref(), Some("Hello"));
    assert_eq!(hello.dimensions.content.x, 0);
    assert_eq!(hello.dimensions.content.y, 0);
    assert_eq!(hello.dimensions.content.width, 5);
    assert_eq!(hello.dimensions.content.height, 1);
    assert!(root.dimensions.content.height >= 1);
}

#[test]
fn test_empty_document_zero_dimensions() {
    let (_, _, root) = layout_unstyled("", 80);
    assert_eq!(root.dimensions.content.height, 0);
    assert!(root.children.is_empty());
}

#[test]
fn test_line_breaking_greedy() {
    let (_, _, root) = layout_unstyled("<body>aa bb cc dd</body>", 5);
    let mut texts = Vec::new();
    collect_text_boxes(&root, &mut texts);
    // "aa bb" fits on line 0; "cc dd" on line 1.
    assert_eq!(texts.len(), 4);
    assert_eq!(texts[0].line, 0);
    assert_eq!(texts[1].line, 0);
    assert_eq!(texts[2].line, 1);
    assert_eq!(texts[3].line, 1);
    // Words separated by a single cell on the same line.
    assert_eq!(texts[0].dimensions.content.x, 0);
    assert_eq!(texts[1].dimensions.content.x, 3);
    assert_eq!(texts[2].dimensions.content.y, texts[0].dimensions.content.y + 1);
}

#[test]
fn test_zero_width_one_word_per_line() {
    // Degenerate width must not loop; each word lands on its own line.
    let (_, _, root) = layout_unstyled("<body>a b c</body>", 0);
    let mut texts = Vec::new();
    collect_text_boxes(&root, &mut texts);
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0].line, 0);
    assert_eq!(texts[1].line, 1);
    assert_eq!(texts[2].line, 2);
    assert_positive_dimensions(&root);
}

#[test]
fn test_block_stacking_and_containment() {
    let root = layout(
        "<body><div>one</div><div>two two</div><div>three</div></body>",
        40,
    );
    let body = find_box(&root, "body").unwrap();
    let mut last_bottom = body.dimensions.content.y;
    for child in &body.children {
        let rect = child.dimensions.content;
        // Stacked vertically in order...
        assert!(rect.y >= last_bottom);
        last_bottom = rect.bottom();
        // ...and horizontally contained in the parent content box.
        assert!(rect.x >= body.dimensions.content.x);
        assert!(rect.right() <= body.dimensions.content.right());
    }
    assert_positive_dimensions(&root);
}

#[test]
fn test_paragraph_margins_stack() {
    let root = layout("<body><p>a</p><p>b</p></body>", 20);
    let body = find_box(&root, "body").unwrap();
    // Two paragraphs with 1-row margins: heights sum to content height.
    let total: i32 = body
        .children
        .iter()
        .map(|c| c.dimensions.margin_box().height)
        .sum();
    assert_eq!(body.dimensions.content.height, total);
}

#[test]
fn test_explicit_width_and_centering() {
    let root = layout(
        r#"<body><div style="width: 80px; margin: 0 auto">x</div></body>"#,
        40,
    );
    let div = find_box(&root, "div").unwrap();
    // 80px = 10 columns; auto margins split the remaining 30.
    assert_eq!(div.dimensions.content.width, 10);
    assert_eq!(div.dimensions.margin.left, 15);
    assert_eq!(div.dimensions.margin.right, 15);
    assert_eq!(div.dimensions.content.x, 15);
}

#[test]
fn test_box_sizing_border_box() {
    let root = layout(
        r#"<body><div style="width: 160px; padding: 0 16px; box-sizing: border-box">x</div></body>"#,
        80,
    );
    let div = find_box(&root, "div").unwrap();
    // 160px = 20 columns total; 16px padding = 2 columns per side.
    assert_eq!(div.dimensions.content.width, 16);
    assert_eq!(div.dimensions.padding_box().width, 20);
}

#[test]
fn test_min_max_width_clamp() {
    let root = layout(
        r#"<body><div style="width: 400px; max-width: 80px">x</div>
               <div style="min-width: 160px">y</div></body>"#,
        100,
    );
    let body = find_box(&root, "body").unwrap();
    assert_eq!(body.children[0].dimensions.content.width, 10);
    assert!(body.children[1].dimensions.content.width >= 20);
}

#[test]
fn test_text_align() {
    let root = layout(
        r#"<body><p style="text-align: center; margin: 0">abcd</p></body>"#,
        20,
    );
    let mut texts = Vec::new();
    collect_text_boxes(&root, &mut texts);
    // (20 - 4) / 2 = 8.
    assert_eq!(texts[0].dimensions.content.x, 8);

    let root = layout(
        r#"<body><p style="text-align: right; margin: 0">abcd</p></body>"#,
        20,
    );
    let mut texts = Vec::new();
    collect_text_boxes(&root, &mut texts);
    assert_eq!(texts[0].dimensions.content.x, 16);
}

#[test]
fn test_anonymous_box_wraps_inline_run() {
    let root = layout("<body>before<div>block</div>after</body>", 40);
    let body = find_box(&root, "body").unwrap();
    // body has mixed children: anonymous, div, anonymous.
    assert_eq!(body.children.len(), 3);
    assert_eq!(body.children[0].box_type, BoxType::Anonymous);
    assert!(body.children[0].node.is_none());
    assert_eq!(body.children[1].tag.as_deref(), Some("div"));
    assert_eq!(body.children[2].box_type, BoxType::Anonymous);
}

#[test]
fn test_display_none_generates_no_box() {
    let root = layout(
        r#"<body><div style="display: none">hidden</div><p>shown</p></body>"#,
        40,
    );
    assert!(find_box(&root, "div").is_none());
    assert!(find_box(&root, "p").is_some());
}

#[test]
fn test_flex_grow_distribution() {
    // Spec scenario: width-30 container, gap 0, grow factors 1 and 2 →
    // post-layout widths (10, 20), residue to the second child.
    let root = layout(
        r#"<body style="margin:0;padding:0"><div style="display: flex; gap: 0">
            <div style="flex-grow: 1">a</div>
            <div style="flex-grow: 2">b</div>
        </div></body>"#,
        30,
    );
    let container = find_box(&root, "body").unwrap().children[0].clone();
    assert_eq!(container.dimensions.content.width, 30);
    assert_eq!(container.children.len(), 2);
    assert_eq!(container.children[0].dimensions.content.width, 10);
    assert_eq!(container.children[1].dimensions.content.width, 20);

    // Conservation: grown sizes fill the container exactly.
    let total: i32 = container
        .children
        .iter()
        .map(|c| c.dimensions.margin_box().width)
        .sum();
    assert_eq!(total, 30);
}

#[test]
fn test_flex_justify_content_center() {
    let root = layout(
        r#"<body style="margin:0"><div style="display: flex; justify-content: center">
            <div style="width: 40px">a</div>
        </div></body>"#,
        20,
    );
    let container = &find_box(&root, "body").unwrap().children[0];
    let item = &container.children[0];
    // Item is 5 columns wide in a 20-column container → starts at 7.
    assert_eq!(item.dimensions.content.width, 5);
    assert_eq!(item.dimensions.content.x, 7);
}

#[test]
fn test_flex_wrap() {
    let root = layout(
        r#"<body style="margin:0"><div style="display: flex; flex-wrap: wrap; gap: 0">
            <div style="width: 48px">a</div>
            <div style="width: 48px">b</div>
            <div style="width: 48px">c</div>
        </div></body>"#,
        12,
    );
    let container = &find_box(&root, "body").unwrap().children[0];
    // 6-column items in a 12-column container: two per line.
    let ys: Vec<i32> = container
        .children
        .iter()
        .map(|c| c.dimensions.content.y)
        .collect();
    assert_eq!(ys[0], ys[1]);
    assert!(ys[2] > ys[1]);
    // Container height is the sum of line heights.
    assert_eq!(container.dimensions.content.height, 2);
}

#[test]
fn test_flex_column_stacks() {
    let root = layout(
        r#"<body style="margin:0"><div style="display: flex; flex-direction: column; gap: 16px">
            <div>a</div><div>b</div>
        </div></body>"#,
        20,
    );
    let container = &find_box(&root, "body").unwrap().children[0];
    let ys: Vec<i32> = container
        .children
        .iter()
        .map(|c| c.dimensions.content.y)
        .collect();
    // 16px gap = one row between the two items.
    assert_eq!(ys[1] - ys[0], 2);
    assert_eq!(container.dimensions.content.height, 3);
}

#[test]
fn test_flex_row_reverse() {
    let root = layout(
        r#"<body style="margin:0"><div style="display: flex; flex-direction: row-reverse">
            <div>first</div><div>second</div>
        </div></body>"#,
        40,
    );
    let container = &find_box(&root, "body").unwrap().children[0];
    // Reversed order: "second" is laid out before "first".
    let first = find_box(container, "div");
    assert!(first.is_some());
    let mut texts = Vec::new();
    collect_text_boxes(container, &mut texts);
    assert_eq!(texts[0].text.as_deref(), Some("second"));
}

#[test]
fn test_form_control_intrinsic_sizes() {
    let root = layout(
        r#"<body><form>
            <input type="checkbox">
            <input type="text" size="10">
            <input type="text">
            <button>OK</button>
            <select><option>x</option></select>
            <textarea cols="20" rows="3"></textarea>
        </form></body>"#,
        120,
    );
    let form = find_box(&root, "form").unwrap();
    let mut atoms: Vec<&LayoutBox> = Vec::new();
    fn collect_atoms<'a>(b: &'a LayoutBox, out: &mut Vec<&'a LayoutBox>) {
        if b.box_type == BoxType::InlineBlock {
            out.push(b);
        }
        for c in &b.children {
            collect_atoms(c, out);
        }
    }
    collect_atoms(form, &mut atoms);

    let dims: Vec<(i32, i32)> = atoms
        .iter()
        .map(|b| (b.dimensions.content.width, b.dimensions.content.height))
        .collect();
    assert_eq!(dims[0], (1, 1)); // checkbox
    assert_eq!(dims[1], (12, 3)); // size=10 text input
    assert_eq!(dims[2], (22, 3)); // default size=20
    assert_eq!(dims[3], (8, 3)); // button: max(2+4, 8)
    assert_eq!(dims[4], (15, 3)); // select
    assert_eq!(dims[5], (22, 5)); // textarea cols+2 × rows+2
}

#[test]
fn test_image_intrinsic_size_from_attributes() {
    let root = layout(r#"<body><img src="x.png" width="80" height="64"></body>"#, 120);
    let img = find_box(&root, "img").unwrap();
    // 80px/8 = 10 columns, 64px/16 = 4 rows.
    assert_eq!(img.dimensions.content.width, 10);
    assert_eq!(img.dimensions.content.height, 4);
}

#[test]
fn test_list_markers() {
    let root = layout("<body><ol><li>a</li><li>b</li></ol><ul><li>c</li></ul></body>", 40);
    let ol = find_box(&root, "ol").unwrap();
    assert_eq!(ol.children[0].list_marker.as_deref(), Some("1."));
    assert_eq!(ol.children[1].list_marker.as_deref(), Some("2."));
    let ul = find_box(&root, "ul").unwrap();
    assert_eq!(ul.children[0].list_marker.as_deref(), Some("•"));
}

#[test]
fn test_pre_preserves_newlines() {
    let root = layout("<body><pre>line one\nline   two</pre></body>", 80);
    let pre = find_box(&root, "pre").unwrap();
    assert_eq!(pre.dimensions.content.height, 2);
    let mut texts = Vec::new();
    collect_text_boxes(pre, &mut texts);
    assert_eq!(texts[0].text.as_deref(), Some("line one"));
    assert_eq!(texts[1].text.as_deref(), Some("line   two"));
    assert_eq!(texts[1].line, 1);
}

#[test]
fn test_repeated_layout_is_deterministic() {
    let html = r#"<body><div style="display:flex"><div style="flex-grow:1">a</div>
        <div>b c d e f g h i j k</div></div><p>tail</p></body>"#;
    let first = layout(html, 33);
    let second = layout(html, 33);
    fn shapes(b: &LayoutBox, out: &mut Vec<(i32, i32, i32, i32)>) {
        let r = b.dimensions.content;
        out.push((r.x, r.y, r.width, r.height));
        for c in &b.children {
            shapes(c, out);
        }
    }
    let (mut a, mut b) = (Vec::new(), Vec::new());
    shapes(&first, &mut a);
    shapes(&second, &mut b);
    assert_eq!(a, b);
}

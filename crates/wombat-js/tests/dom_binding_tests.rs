//! Integration tests for the DOM bindings: script mutations must be
//! reflected in the underlying tree.

use wombat_js::{DocumentState, JsRuntime};

fn runtime_for(html: &str) -> (JsRuntime, wombat_js::DocHandle) {
    let tree = wombat_html::parse_document(html);
    let doc = DocumentState::new(tree, "https://example.com/page");
    let mut runtime = JsRuntime::new();
    runtime.bind_document(&doc);
    (runtime, doc)
}

#[test]
fn test_get_element_by_id_and_properties() {
    let (mut rt, _doc) = runtime_for(
        r#"<html><head><title>T</title></head>
           <body><p id="x" class="a b">hello</p></body></html>"#,
    );
    assert_eq!(
        rt.execute("document.getElementById('x').tagName")
            .unwrap()
            .to_js_string(),
        "P"
    );
    assert_eq!(
        rt.execute("document.getElementById('x').textContent")
            .unwrap()
            .to_js_string(),
        "hello"
    );
    assert_eq!(
        rt.execute("document.getElementById('x').className")
            .unwrap()
            .to_js_string(),
        "a b"
    );
    assert_eq!(
        rt.execute("document.getElementById('nope')")
            .unwrap()
            .to_js_string(),
        "null"
    );
}

#[test]
fn test_document_shape() {
    let (mut rt, _doc) = runtime_for("<html><head><title>My Title</title></head><body></body></html>");
    assert_eq!(
        rt.execute("document.title").unwrap().to_js_string(),
        "My Title"
    );
    assert_eq!(
        rt.execute("document.body.tagName").unwrap().to_js_string(),
        "BODY"
    );
    assert_eq!(
        rt.execute("document.documentElement.tagName")
            .unwrap()
            .to_js_string(),
        "HTML"
    );
    assert_eq!(
        rt.execute("document.URL").unwrap().to_js_string(),
        "https://example.com/page"
    );
    assert_eq!(
        rt.execute("window.document.body.nodeType").unwrap().to_number(),
        1.0
    );
    assert_eq!(
        rt.execute("window.location.href").unwrap().to_js_string(),
        "https://example.com/page"
    );
}

#[test]
fn test_set_attribute_reflects_into_tree() {
    let (mut rt, doc) = runtime_for(r#"<body><a id="l" href="/old">x</a></body>"#);
    let _ = rt
        .execute("document.getElementById('l').setAttribute('href', '/new')")
        .unwrap();
    let tree = doc.tree.borrow();
    let a = tree
        .iter_all()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "a"))
        .unwrap();
    assert_eq!(tree.as_element(a).unwrap().attr("href"), Some("/new"));
    assert!(doc.mutations.get() > 0);
}

#[test]
fn test_text_content_setter() {
    let (mut rt, doc) = runtime_for(r#"<body><p id="x"><em>old</em></p></body>"#);
    let _ = rt
        .execute("document.getElementById('x').textContent = 'new text'")
        .unwrap();
    let tree = doc.tree.borrow();
    let p = tree
        .iter_all()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "p"))
        .unwrap();
    assert_eq!(tree.text_content(p), "new text");
    assert_eq!(tree.children(p).len(), 1);
}

#[test]
fn test_inner_html_round_trip() {
    let (mut rt, doc) = runtime_for(r#"<body><div id="box"><b>bold</b></div></body>"#);
    assert_eq!(
        rt.execute("document.getElementById('box').innerHTML")
            .unwrap()
            .to_js_string(),
        "<b>bold</b>"
    );
    let _ = rt
        .execute("document.getElementById('box').innerHTML = '<i>it</i> plain'")
        .unwrap();
    assert_eq!(
        rt.execute("document.getElementById('box').innerHTML")
            .unwrap()
            .to_js_string(),
        "<i>it</i> plain"
    );
    let tree = doc.tree.borrow();
    let div = tree
        .iter_all()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "div"))
        .unwrap();
    assert_eq!(tree.text_content(div), "it plain");
}

#[test]
fn test_create_and_append() {
    let (mut rt, doc) = runtime_for("<body></body>");
    let _ = rt
        .execute(
            "var p = document.createElement('p');
             p.textContent = 'made by script';
             document.body.appendChild(p);",
        )
        .unwrap();
    let tree = doc.tree.borrow();
    let body = tree.body().unwrap();
    assert_eq!(tree.children(body).len(), 1);
    assert_eq!(tree.text_content(body), "made by script");
}

#[test]
fn test_remove_child() {
    let (mut rt, doc) = runtime_for(r#"<body><p id="gone">x</p><p>stays</p></body>"#);
    let _ = rt
        .execute("var p = document.getElementById('gone'); p.parentNode.removeChild(p);")
        .unwrap();
    let tree = doc.tree.borrow();
    assert_eq!(tree.text_content(tree.body().unwrap()), "stays");
}

#[test]
fn test_class_list() {
    let (mut rt, _doc) = runtime_for(r#"<body><div id="d" class="one"></div></body>"#);
    assert_eq!(
        rt.execute("document.getElementById('d').classList.contains('one')")
            .unwrap()
            .to_js_string(),
        "true"
    );
    let _ = rt
        .execute("document.getElementById('d').classList.add('two')")
        .unwrap();
    let _ = rt
        .execute("document.getElementById('d').classList.remove('one')")
        .unwrap();
    assert_eq!(
        rt.execute("document.getElementById('d').className")
            .unwrap()
            .to_js_string(),
        "two"
    );
    assert_eq!(
        rt.execute("document.getElementById('d').classList.toggle('three')")
            .unwrap()
            .to_js_string(),
        "true"
    );
}

#[test]
fn test_style_property_access() {
    let (mut rt, doc) = runtime_for(r#"<body><div id="d" style="color: red"></div></body>"#);
    assert_eq!(
        rt.execute("document.getElementById('d').style.color")
            .unwrap()
            .to_js_string(),
        "red"
    );
    let _ = rt
        .execute("document.getElementById('d').style.backgroundColor = 'blue'")
        .unwrap();
    let tree = doc.tree.borrow();
    let div = tree
        .iter_all()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "div"))
        .unwrap();
    let style = tree.as_element(div).unwrap().attr("style").unwrap();
    assert!(style.contains("background-color: blue"));
    assert!(style.contains("color: red"));
}

#[test]
fn test_query_selector() {
    let (mut rt, _doc) = runtime_for(
        r#"<body>
            <div class="outer"><p>one</p><p class="pick">two</p></div>
            <p class="pick">three</p>
        </body>"#,
    );
    assert_eq!(
        rt.execute("document.querySelector('.outer p.pick').textContent")
            .unwrap()
            .to_js_string(),
        "two"
    );
    assert_eq!(
        rt.execute("document.querySelectorAll('p.pick').length")
            .unwrap()
            .to_number(),
        2.0
    );
    assert_eq!(
        rt.execute("document.querySelector('p').matches('div > p')")
            .unwrap()
            .to_js_string(),
        "true"
    );
    assert_eq!(
        rt.execute("document.querySelector('p').closest('.outer').tagName")
            .unwrap()
            .to_js_string(),
        "DIV"
    );
}

#[test]
fn test_tree_navigation() {
    let (mut rt, _doc) = runtime_for("<body><i>a</i><b>b</b></body>");
    assert_eq!(
        rt.execute("document.body.children.length").unwrap().to_number(),
        2.0
    );
    assert_eq!(
        rt.execute("document.body.firstChild.tagName")
            .unwrap()
            .to_js_string(),
        "I"
    );
    assert_eq!(
        rt.execute("document.body.firstChild.nextSibling.tagName")
            .unwrap()
            .to_js_string(),
        "B"
    );
    assert_eq!(
        rt.execute("document.body.lastChild.previousSibling.tagName")
            .unwrap()
            .to_js_string(),
        "I"
    );
    assert_eq!(
        rt.execute("document.body.firstChild.parentElement.tagName")
            .unwrap()
            .to_js_string(),
        "BODY"
    );
}

#[test]
fn test_events_and_focus() {
    let (mut rt, doc) = runtime_for(r#"<body><button id="go">Go</button></body>"#);
    let _ = rt
        .execute(
            "var count = 0;
             var btn = document.getElementById('go');
             function onClick() { count++; }
             btn.addEventListener('click', onClick);
             btn.click();
             btn.click();",
        )
        .unwrap();
    assert_eq!(rt.execute("count").unwrap().to_number(), 2.0);

    // removeEventListener by function identity.
    let _ = rt
        .execute("btn.removeEventListener('click', onClick); btn.click();")
        .unwrap();
    assert_eq!(rt.execute("count").unwrap().to_number(), 2.0);

    // focus()/blur() drive the shared focus cell.
    let _ = rt.execute("btn.focus()").unwrap();
    assert!(doc.focused.get().is_some());
    let _ = rt.execute("btn.blur()").unwrap();
    assert!(doc.focused.get().is_none());
}

#[test]
fn test_event_listener_receives_event_object() {
    let (mut rt, _doc) = runtime_for(r##"<body><a id="l" href="#">x</a></body>"##);
    let _ = rt
        .execute(
            "var seen = '';
             var link = document.getElementById('l');
             link.addEventListener('click', function(e) { seen = e.type + ':' + e.target.tagName; });
             link.click();",
        )
        .unwrap();
    assert_eq!(rt.execute("seen").unwrap().to_js_string(), "click:A");
}

#[test]
fn test_mutation_counter_drives_relayout_decision() {
    let (mut rt, doc) = runtime_for(r#"<body><p id="x">a</p></body>"#);
    let before = doc.mutations.get();
    // Pure reads do not bump the counter.
    let _ = rt.execute("document.getElementById('x').textContent").unwrap();
    assert_eq!(doc.mutations.get(), before);
    // Writes do.
    let _ = rt.execute("document.getElementById('x').textContent = 'b'").unwrap();
    assert!(doc.mutations.get() > before);
}

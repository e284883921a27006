//! DOM bindings: `document`, `window`, and live element wrappers.
//!
//! Every wrapped node is a host-backed object; property access routes
//! through [`host_get`]/[`host_set`] so reads always see the current DOM
//! and writes mutate it directly. The browser re-resolves styles and
//! layout after script execution by checking the mutation counter.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wombat_css::{parse_selector, CssToken, CssTokenizer, Selector};
use wombat_dom::{DomTree, NodeId, NodeType};
use wombat_html::{import_children, parse_fragment, serialize_children, serialize_node};

use crate::error::JsError;
use crate::interpreter::Interpreter;
use crate::scope;
use crate::value::{HostData, JsFunction, JsObject, Value};

/// Shared state of the bound document.
pub struct DocumentState {
    /// The live DOM tree.
    pub tree: RefCell<DomTree>,
    /// Registered event listeners per `(node, event type)`.
    pub listeners: RefCell<HashMap<(NodeId, String), Vec<Value>>>,
    /// The currently focused node, if any.
    pub focused: Cell<Option<NodeId>>,
    /// The document's URL.
    pub url: String,
    /// Bumped on every mutation; the browser compares before/after script
    /// execution to decide whether to re-style and re-layout.
    pub mutations: Cell<u64>,
}

/// Shared handle to the document state.
pub type DocHandle = Rc<DocumentState>;

impl DocumentState {
    /// Wrap a DOM tree for binding.
    #[must_use]
    pub fn new(tree: DomTree, url: &str) -> DocHandle {
        Rc::new(Self {
            tree: RefCell::new(tree),
            listeners: RefCell::new(HashMap::new()),
            focused: Cell::new(None),
            url: url.to_string(),
            mutations: Cell::new(0),
        })
    }

    fn touch(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }
}

/// Install `document` and `window` into the interpreter's global scope
/// and bind the interpreter to this document.
pub fn install_document(interp: &mut Interpreter, doc: &DocHandle) {
    interp.dom = Some(doc.clone());

    let document = Value::Object(Rc::new(RefCell::new(JsObject::hosted(HostData::Document))));

    let location = Value::object();
    if let Value::Object(loc) = &location {
        loc.borrow_mut().set("href", Value::string(doc.url.clone()));
    }

    let window = Rc::new(RefCell::new(JsObject::new()));
    window.borrow_mut().set("document", document.clone());
    window.borrow_mut().set("location", location.clone());
    window.borrow_mut().set(
        "addEventListener",
        JsFunction::native("addEventListener", |_, _, _| Ok(Value::Undefined)),
    );
    let window = Value::Object(window);
    if let Value::Object(w) = &window {
        // window.window === window
        w.borrow_mut().set("window", window.clone());
    }

    let _ = scope::declare_var(&interp.global, "document", document);
    let _ = scope::declare_var(&interp.global, "window", window);
}

fn doc_of(interp: &Interpreter) -> Result<DocHandle, JsError> {
    interp
        .dom
        .clone()
        .ok_or_else(|| JsError::type_error("no document is bound"))
}

/// Wrap a DOM node as a live JS object.
#[must_use]
pub fn wrap_node(id: NodeId) -> Value {
    Value::Object(Rc::new(RefCell::new(JsObject::hosted(HostData::Node(id)))))
}

fn wrap_optional(id: Option<NodeId>) -> Value {
    id.map_or(Value::Null, wrap_node)
}

/// The node id behind a wrapper value.
fn node_of(value: &Value) -> Result<NodeId, JsError> {
    if let Value::Object(object) = value {
        if let Some(HostData::Node(id)) = object.borrow().host {
            return Ok(id);
        }
    }
    Err(JsError::type_error("expected a DOM node"))
}

// ----------------------------------------------------------------------
// Property reads
// ----------------------------------------------------------------------

/// Host-backed property read. `Ok(None)` falls back to the wrapper's own
/// (expando) properties.
pub fn host_get(
    interp: &mut Interpreter,
    host: HostData,
    key: &str,
) -> Result<Option<Value>, JsError> {
    let doc = doc_of(interp)?;
    match host {
        HostData::Node(id) => node_get(&doc, id, key),
        HostData::Document => document_get(&doc, key),
        HostData::ClassList(id) => Ok(class_list_get(&doc, id, key)),
        HostData::Style(id) => Ok(Some(Value::string(get_style_property(&doc, id, key)))),
    }
}

#[allow(clippy::too_many_lines)]
fn node_get(doc: &DocHandle, id: NodeId, key: &str) -> Result<Option<Value>, JsError> {
    let tree = doc.tree.borrow();
    let value = match key {
        "tagName" | "nodeName" => match tree.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(e)) => Value::string(e.tag_name.to_ascii_uppercase()),
            Some(NodeType::Text(_)) => Value::string("#text"),
            Some(NodeType::Comment(_)) => Value::string("#comment"),
            _ => Value::Undefined,
        },
        "nodeType" => match tree.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(_)) => Value::Number(1.0),
            Some(NodeType::Text(_)) => Value::Number(3.0),
            Some(NodeType::Comment(_)) => Value::Number(8.0),
            Some(NodeType::Document) => Value::Number(9.0),
            Some(NodeType::DocumentType(_)) => Value::Number(10.0),
            None => Value::Undefined,
        },
        "id" => Value::string(
            tree.as_element(id)
                .and_then(|e| e.attr("id"))
                .unwrap_or_default(),
        ),
        "className" => Value::string(
            tree.as_element(id)
                .and_then(|e| e.attr("class"))
                .unwrap_or_default(),
        ),
        "classList" => Value::Object(Rc::new(RefCell::new(JsObject::hosted(
            HostData::ClassList(id),
        )))),
        "style" => Value::Object(Rc::new(RefCell::new(JsObject::hosted(HostData::Style(id))))),
        "textContent" => Value::string(tree.text_content(id)),
        "innerHTML" => Value::string(serialize_children(&tree, id)),
        "outerHTML" => Value::string(serialize_node(&tree, id)),
        "children" => {
            let wrappers: Vec<Value> = tree
                .children(id)
                .iter()
                .filter(|&&c| tree.as_element(c).is_some())
                .map(|&c| wrap_node(c))
                .collect();
            Value::Array(Rc::new(RefCell::new(wrappers)))
        }
        "childNodes" => {
            let wrappers: Vec<Value> = tree.children(id).iter().map(|&c| wrap_node(c)).collect();
            Value::Array(Rc::new(RefCell::new(wrappers)))
        }
        "firstChild" => wrap_optional(tree.first_child(id)),
        "lastChild" => wrap_optional(tree.last_child(id)),
        "parentNode" => wrap_optional(tree.parent(id)),
        "parentElement" => wrap_optional(
            tree.parent(id)
                .filter(|&p| tree.as_element(p).is_some()),
        ),
        "nextSibling" => wrap_optional(tree.next_sibling(id)),
        "previousSibling" => wrap_optional(tree.prev_sibling(id)),
        "value" | "href" | "src" | "name" | "type" | "placeholder" | "title" | "alt" => {
            match tree.as_element(id).and_then(|e| e.attr(key)) {
                Some(v) => Value::string(v),
                None => return Ok(None),
            }
        }

        "getAttribute" => JsFunction::native("getAttribute", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let name = args.first().map_or_else(String::new, Value::to_js_string);
            let tree = doc.tree.borrow();
            Ok(tree
                .as_element(id)
                .and_then(|e| e.attr(&name))
                .map_or(Value::Null, Value::string))
        }),
        "setAttribute" => JsFunction::native("setAttribute", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let name = args.first().map_or_else(String::new, Value::to_js_string);
            let value = args.get(1).map_or_else(String::new, Value::to_js_string);
            if let Some(element) = doc.tree.borrow_mut().as_element_mut(id) {
                element.set_attr(&name, &value);
            }
            doc.touch();
            Ok(Value::Undefined)
        }),
        "removeAttribute" => JsFunction::native("removeAttribute", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let name = args.first().map_or_else(String::new, Value::to_js_string);
            if let Some(element) = doc.tree.borrow_mut().as_element_mut(id) {
                element.remove_attr(&name);
            }
            doc.touch();
            Ok(Value::Undefined)
        }),
        "hasAttribute" => JsFunction::native("hasAttribute", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let name = args.first().map_or_else(String::new, Value::to_js_string);
            let has = doc
                .tree
                .borrow()
                .as_element(id)
                .is_some_and(|e| e.has_attr(&name));
            Ok(Value::Boolean(has))
        }),

        "querySelector" => JsFunction::native("querySelector", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let selectors = parse_selector_list(&args.first().map_or_else(String::new, Value::to_js_string));
            let found = query_first(&doc.tree.borrow(), id, &selectors);
            Ok(wrap_optional(found))
        }),
        "querySelectorAll" => JsFunction::native("querySelectorAll", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let selectors = parse_selector_list(&args.first().map_or_else(String::new, Value::to_js_string));
            let tree = doc.tree.borrow();
            let all: Vec<Value> = query_all(&tree, id, &selectors)
                .into_iter()
                .map(wrap_node)
                .collect();
            Ok(Value::Array(Rc::new(RefCell::new(all))))
        }),
        "matches" => JsFunction::native("matches", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let selectors = parse_selector_list(&args.first().map_or_else(String::new, Value::to_js_string));
            let tree = doc.tree.borrow();
            Ok(Value::Boolean(
                selectors.iter().any(|s| s.matches(&tree, id)),
            ))
        }),
        "closest" => JsFunction::native("closest", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let selectors = parse_selector_list(&args.first().map_or_else(String::new, Value::to_js_string));
            let tree = doc.tree.borrow();
            let mut current = Some(id);
            while let Some(node) = current {
                if tree.as_element(node).is_some()
                    && selectors.iter().any(|s| s.matches(&tree, node))
                {
                    return Ok(wrap_node(node));
                }
                current = tree.parent(node);
            }
            Ok(Value::Null)
        }),

        "appendChild" => JsFunction::native("appendChild", |interp, this, args| {
            let doc = doc_of(interp)?;
            let parent = node_of(this)?;
            let child_value = args.first().cloned().unwrap_or(Value::Undefined);
            let child = node_of(&child_value)?;
            doc.tree.borrow_mut().append_child(parent, child);
            doc.touch();
            Ok(child_value)
        }),
        "removeChild" => JsFunction::native("removeChild", |interp, this, args| {
            let doc = doc_of(interp)?;
            let parent = node_of(this)?;
            let child_value = args.first().cloned().unwrap_or(Value::Undefined);
            let child = node_of(&child_value)?;
            if doc.tree.borrow().parent(child) != Some(parent) {
                return Err(JsError::type_error(
                    "node to be removed is not a child of this node",
                ));
            }
            doc.tree.borrow_mut().detach(child);
            doc.touch();
            Ok(child_value)
        }),
        "insertBefore" => JsFunction::native("insertBefore", |interp, this, args| {
            let doc = doc_of(interp)?;
            let parent = node_of(this)?;
            let child_value = args.first().cloned().unwrap_or(Value::Undefined);
            let child = node_of(&child_value)?;
            match args.get(1) {
                Some(Value::Null | Value::Undefined) | None => {
                    doc.tree.borrow_mut().append_child(parent, child);
                }
                Some(reference) => {
                    let reference = node_of(reference)?;
                    doc.tree.borrow_mut().insert_before(parent, child, reference);
                }
            }
            doc.touch();
            Ok(child_value)
        }),
        "remove" => JsFunction::native("remove", |interp, this, _| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            doc.tree.borrow_mut().detach(id);
            doc.touch();
            Ok(Value::Undefined)
        }),

        "focus" => JsFunction::native("focus", |interp, this, _| {
            let doc = doc_of(interp)?;
            doc.focused.set(Some(node_of(this)?));
            Ok(Value::Undefined)
        }),
        "blur" => JsFunction::native("blur", |interp, this, _| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            if doc.focused.get() == Some(id) {
                doc.focused.set(None);
            }
            Ok(Value::Undefined)
        }),
        "click" => JsFunction::native("click", |interp, this, _| {
            let id = node_of(this)?;
            dispatch_event(interp, id, "click")?;
            Ok(Value::Undefined)
        }),
        "addEventListener" => JsFunction::native("addEventListener", |interp, this, args| {
            let doc = doc_of(interp)?;
            let id = node_of(this)?;
            let event = args.first().map_or_else(String::new, Value::to_js_string);
            let listener = args.get(1).cloned().unwrap_or(Value::Undefined);
            if matches!(listener, Value::Function(_)) {
                doc.listeners
                    .borrow_mut()
                    .entry((id, event))
                    .or_default()
                    .push(listener);
            }
            Ok(Value::Undefined)
        }),
        "removeEventListener" => {
            JsFunction::native("removeEventListener", |interp, this, args| {
                let doc = doc_of(interp)?;
                let id = node_of(this)?;
                let event = args.first().map_or_else(String::new, Value::to_js_string);
                let listener = args.get(1).cloned().unwrap_or(Value::Undefined);
                if let Some(registered) = doc.listeners.borrow_mut().get_mut(&(id, event)) {
                    registered.retain(|l| !crate::value::strict_equals(l, &listener));
                }
                Ok(Value::Undefined)
            })
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn document_get(doc: &DocHandle, key: &str) -> Result<Option<Value>, JsError> {
    let tree = doc.tree.borrow();
    let value = match key {
        "nodeType" => Value::Number(9.0),
        "nodeName" => Value::string("#document"),
        "body" => wrap_optional(tree.body()),
        "head" => wrap_optional(tree.head()),
        "documentElement" => wrap_optional(tree.document_element()),
        "title" => Value::string(tree.title().unwrap_or_default()),
        "URL" => Value::string(doc.url.clone()),
        "location" => {
            let location = Value::object();
            if let Value::Object(loc) = &location {
                loc.borrow_mut().set("href", Value::string(doc.url.clone()));
            }
            location
        }
        "getElementById" => JsFunction::native("getElementById", |interp, _, args| {
            let doc = doc_of(interp)?;
            let wanted = args.first().map_or_else(String::new, Value::to_js_string);
            let tree = doc.tree.borrow();
            let found = tree.iter_all().find(|&id| {
                tree.as_element(id)
                    .is_some_and(|e| e.id() == Some(wanted.as_str()))
            });
            Ok(wrap_optional(found))
        }),
        "getElementsByTagName" => {
            JsFunction::native("getElementsByTagName", |interp, _, args| {
                let doc = doc_of(interp)?;
                let wanted = args
                    .first()
                    .map_or_else(String::new, Value::to_js_string)
                    .to_ascii_lowercase();
                let tree = doc.tree.borrow();
                let found: Vec<Value> = tree
                    .iter_all()
                    .filter(|&id| {
                        tree.as_element(id)
                            .is_some_and(|e| wanted == "*" || e.tag_name == wanted)
                    })
                    .map(wrap_node)
                    .collect();
                Ok(Value::Array(Rc::new(RefCell::new(found))))
            })
        }
        "getElementsByClassName" => {
            JsFunction::native("getElementsByClassName", |interp, _, args| {
                let doc = doc_of(interp)?;
                let wanted = args.first().map_or_else(String::new, Value::to_js_string);
                let tree = doc.tree.borrow();
                let found: Vec<Value> = tree
                    .iter_all()
                    .filter(|&id| tree.as_element(id).is_some_and(|e| e.has_class(&wanted)))
                    .map(wrap_node)
                    .collect();
                Ok(Value::Array(Rc::new(RefCell::new(found))))
            })
        }
        "querySelector" => JsFunction::native("querySelector", |interp, _, args| {
            let doc = doc_of(interp)?;
            let selectors = parse_selector_list(&args.first().map_or_else(String::new, Value::to_js_string));
            let tree = doc.tree.borrow();
            Ok(wrap_optional(query_first(&tree, tree.root(), &selectors)))
        }),
        "querySelectorAll" => JsFunction::native("querySelectorAll", |interp, _, args| {
            let doc = doc_of(interp)?;
            let selectors = parse_selector_list(&args.first().map_or_else(String::new, Value::to_js_string));
            let tree = doc.tree.borrow();
            let all: Vec<Value> = query_all(&tree, tree.root(), &selectors)
                .into_iter()
                .map(wrap_node)
                .collect();
            Ok(Value::Array(Rc::new(RefCell::new(all))))
        }),
        "createElement" => JsFunction::native("createElement", |interp, _, args| {
            let doc = doc_of(interp)?;
            let tag = args.first().map_or_else(String::new, Value::to_js_string);
            let id = doc.tree.borrow_mut().create_element(&tag);
            Ok(wrap_node(id))
        }),
        "createTextNode" => JsFunction::native("createTextNode", |interp, _, args| {
            let doc = doc_of(interp)?;
            let text = args.first().map_or_else(String::new, Value::to_js_string);
            let id = doc.tree.borrow_mut().create_text(&text);
            Ok(wrap_node(id))
        }),
        "addEventListener" => {
            JsFunction::native("addEventListener", |_, _, _| Ok(Value::Undefined))
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn class_list_get(doc: &DocHandle, id: NodeId, key: &str) -> Option<Value> {
    Some(match key {
        "length" => {
            let tree = doc.tree.borrow();
            Value::Number(tree.as_element(id).map_or(0, |e| e.classes().len()) as f64)
        }
        "value" => {
            let tree = doc.tree.borrow();
            Value::string(
                tree.as_element(id)
                    .and_then(|e| e.attr("class"))
                    .unwrap_or_default(),
            )
        }
        "add" => class_list_native(id, "add"),
        "remove" => class_list_native(id, "remove"),
        "toggle" => class_list_native(id, "toggle"),
        "contains" => class_list_native(id, "contains"),
        _ => return None,
    })
}

/// The classList mutators share one native that captures the operation.
fn class_list_native(id: NodeId, op: &'static str) -> Value {
    JsFunction::native(op, move |interp, _, args| {
        let doc = doc_of(interp)?;
        let class = args.first().map_or_else(String::new, Value::to_js_string);
        let mut tree = doc.tree.borrow_mut();
        let Some(element) = tree.as_element_mut(id) else {
            return Ok(Value::Undefined);
        };
        let mut classes: Vec<String> =
            element.classes().iter().map(ToString::to_string).collect();
        let present = classes.contains(&class);
        let result = match op {
            "contains" => return Ok(Value::Boolean(present)),
            "add" => {
                if !present {
                    classes.push(class);
                }
                Value::Undefined
            }
            "remove" => {
                classes.retain(|c| c != &class);
                Value::Undefined
            }
            // toggle returns whether the class is present afterwards.
            _ => {
                if present {
                    classes.retain(|c| c != &class);
                    Value::Boolean(false)
                } else {
                    classes.push(class);
                    Value::Boolean(true)
                }
            }
        };
        element.set_attr("class", &classes.join(" "));
        drop(tree);
        doc.touch();
        Ok(result)
    })
}

// ----------------------------------------------------------------------
// Property writes
// ----------------------------------------------------------------------

/// Host-backed property write. Returns `false` to store the value as a
/// plain (expando) property instead.
pub fn host_set(
    interp: &mut Interpreter,
    host: HostData,
    key: &str,
    value: &Value,
) -> Result<bool, JsError> {
    let doc = doc_of(interp)?;
    match host {
        HostData::Node(id) => node_set(&doc, id, key, value),
        HostData::Document => {
            if key == "title" {
                set_document_title(&doc, &value.to_js_string());
                doc.touch();
                return Ok(true);
            }
            Ok(false)
        }
        HostData::ClassList(_) => Ok(false),
        HostData::Style(id) => {
            set_style_property(&doc, id, key, &value.to_js_string());
            doc.touch();
            Ok(true)
        }
    }
}

fn node_set(doc: &DocHandle, id: NodeId, key: &str, value: &Value) -> Result<bool, JsError> {
    match key {
        "textContent" => {
            doc.tree.borrow_mut().set_text_content(id, &value.to_js_string());
        }
        "innerHTML" => {
            let fragment = parse_fragment(&value.to_js_string());
            let mut tree = doc.tree.borrow_mut();
            tree.remove_children(id);
            if let Some(body) = fragment.body() {
                import_children(&mut tree, id, &fragment, body);
            }
        }
        "id" => {
            if let Some(element) = doc.tree.borrow_mut().as_element_mut(id) {
                element.set_attr("id", &value.to_js_string());
            }
        }
        "className" => {
            if let Some(element) = doc.tree.borrow_mut().as_element_mut(id) {
                element.set_attr("class", &value.to_js_string());
            }
        }
        "value" | "href" | "src" | "name" | "type" | "placeholder" | "title" | "alt" => {
            if let Some(element) = doc.tree.borrow_mut().as_element_mut(id) {
                element.set_attr(key, &value.to_js_string());
            }
        }
        _ => return Ok(false),
    }
    doc.touch();
    Ok(true)
}

fn set_document_title(doc: &DocHandle, title: &str) {
    let mut tree = doc.tree.borrow_mut();
    let existing = tree
        .iter_all()
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "title"));
    match existing {
        Some(id) => tree.set_text_content(id, title),
        None => {
            if let Some(head) = tree.head() {
                let title_id = tree.create_element("title");
                tree.append_child(head, title_id);
                tree.set_text_content(title_id, title);
            }
        }
    }
}

// ----------------------------------------------------------------------
// Events
// ----------------------------------------------------------------------

/// Dispatch an event to a node's listeners (no capture/bubble phases).
pub fn dispatch_event(interp: &mut Interpreter, id: NodeId, event_type: &str) -> Result<(), JsError> {
    let doc = doc_of(interp)?;
    let listeners = doc
        .listeners
        .borrow()
        .get(&(id, event_type.to_string()))
        .cloned()
        .unwrap_or_default();
    if listeners.is_empty() {
        return Ok(());
    }
    let target = wrap_node(id);
    let event = Value::object();
    if let Value::Object(e) = &event {
        let mut e = e.borrow_mut();
        e.set("type", Value::string(event_type));
        e.set("target", target.clone());
    }
    for listener in listeners {
        let _ = interp.call_function(&listener, &target, &[event.clone()])?;
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Selector plumbing
// ----------------------------------------------------------------------

/// Parse a comma-separated selector list; invalid pieces are dropped.
fn parse_selector_list(text: &str) -> Vec<Selector> {
    let mut tokenizer = CssTokenizer::new(text);
    tokenizer.run();
    let tokens: Vec<CssToken> = tokenizer
        .into_tokens()
        .into_iter()
        .filter(|t| !t.is_eof())
        .collect();
    tokens
        .split(|t| matches!(t, CssToken::Comma))
        .filter_map(parse_selector)
        .collect()
}

fn query_first(tree: &DomTree, from: NodeId, selectors: &[Selector]) -> Option<NodeId> {
    tree.descendants(from).find(|&id| {
        tree.as_element(id).is_some() && selectors.iter().any(|s| s.matches(tree, id))
    })
}

fn query_all(tree: &DomTree, from: NodeId, selectors: &[Selector]) -> Vec<NodeId> {
    tree.descendants(from)
        .filter(|&id| {
            tree.as_element(id).is_some() && selectors.iter().any(|s| s.matches(tree, id))
        })
        .collect()
}

// ----------------------------------------------------------------------
// Inline style plumbing
// ----------------------------------------------------------------------

/// `backgroundColor` → `background-color`.
fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn style_pairs(attr: &str) -> Vec<(String, String)> {
    attr.split(';')
        .filter_map(|piece| {
            let (name, value) = piece.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            Some((name, value.trim().to_string()))
        })
        .collect()
}

fn get_style_property(doc: &DocHandle, id: NodeId, camel_name: &str) -> String {
    let property = camel_to_kebab(camel_name);
    let tree = doc.tree.borrow();
    let Some(attr) = tree.as_element(id).and_then(|e| e.attr("style")) else {
        return String::new();
    };
    style_pairs(attr)
        .into_iter()
        .rev()
        .find(|(name, _)| *name == property)
        .map(|(_, value)| value)
        .unwrap_or_default()
}

fn set_style_property(doc: &DocHandle, id: NodeId, camel_name: &str, value: &str) {
    let property = camel_to_kebab(camel_name);
    let mut tree = doc.tree.borrow_mut();
    let Some(element) = tree.as_element_mut(id) else {
        return;
    };
    let mut pairs = style_pairs(element.attr("style").unwrap_or_default());
    pairs.retain(|(name, _)| *name != property);
    if !value.is_empty() {
        pairs.push((property, value.to_string()));
    }
    let serialized = pairs
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("; ");
    element.set_attr("style", &serialized);
}

//! Form submission URLs.
//!
//! [HTML Standard § 4.10.21 Form submission](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#form-submission-2)
//!
//! Only the GET algorithm is implemented: successful controls serialize
//! to a URL-encoded query string appended to the resolved action. POST
//! bodies are out of scope; a POST form navigates to its bare action URL.

use wombat_common::url::{percent_encode_component, resolve};
use wombat_dom::{DomTree, NodeId};

/// Build the navigation URL for submitting a form.
///
/// Collects the form's successful controls in document order: named
/// inputs (checkboxes and radios only when checked), the selected option
/// of each named select, and named textareas.
#[must_use]
pub fn form_submit_url(tree: &DomTree, form: NodeId, base_url: &str) -> String {
    let action = tree
        .as_element(form)
        .and_then(|e| e.attr("action"))
        .unwrap_or("");
    let action = if action.is_empty() {
        base_url.to_string()
    } else {
        resolve(action, base_url)
    };

    let method = tree
        .as_element(form)
        .and_then(|e| e.attr("method"))
        .unwrap_or("get")
        .to_ascii_lowercase();
    if method == "post" {
        // POST bodies are out of scope; navigate to the action as-is.
        return action;
    }

    let pairs = collect_controls(tree, form);
    if pairs.is_empty() {
        return action;
    }
    let query: Vec<String> = pairs
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                percent_encode_component(name),
                percent_encode_component(value)
            )
        })
        .collect();
    // Replace any existing query on the action.
    let base = action.split_once('?').map_or(action.as_str(), |(b, _)| b);
    format!("{base}?{}", query.join("&"))
}

/// "A successful control must have a name."
fn collect_controls(tree: &DomTree, form: NodeId) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for id in tree.descendants(form) {
        let Some(element) = tree.as_element(id) else {
            continue;
        };
        let Some(name) = element.attr("name") else {
            continue;
        };
        match element.tag_name.as_str() {
            "input" => {
                let input_type = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                match input_type.as_str() {
                    // Buttons only submit when activated; a one-shot URL
                    // build treats them as unsuccessful.
                    "submit" | "button" | "reset" | "file" => {}
                    "checkbox" | "radio" => {
                        if element.has_attr("checked") {
                            let value = element.attr("value").unwrap_or("on");
                            pairs.push((name.to_string(), value.to_string()));
                        }
                    }
                    _ => {
                        let value = element.attr("value").unwrap_or("");
                        pairs.push((name.to_string(), value.to_string()));
                    }
                }
            }
            "select" => {
                let options: Vec<NodeId> = tree
                    .descendants(id)
                    .filter(|&o| tree.as_element(o).is_some_and(|e| e.tag_name == "option"))
                    .collect();
                let chosen = options
                    .iter()
                    .find(|&&o| tree.as_element(o).is_some_and(|e| e.has_attr("selected")))
                    .or_else(|| options.first());
                if let Some(&option) = chosen {
                    let value = tree
                        .as_element(option)
                        .and_then(|e| e.attr("value"))
                        .map_or_else(
                            || tree.text_content(option).trim().to_string(),
                            ToString::to_string,
                        );
                    pairs.push((name.to_string(), value));
                }
            }
            "textarea" => {
                pairs.push((name.to_string(), tree.text_content(id)));
            }
            _ => {}
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::form_submit_url;
    use wombat_html::parse_document;

    fn form_url(html: &str) -> String {
        let tree = parse_document(html);
        let form = tree
            .iter_all()
            .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == "form"))
            .expect("form in test document");
        form_submit_url(&tree, form, "https://example.com/dir/page.html")
    }

    #[test]
    fn test_get_query_serialization() {
        let url = form_url(
            r#"<form action="/search">
                <input name="q" value="terminal browsers">
                <input type="checkbox" name="strict" checked>
                <input type="checkbox" name="loose">
                <input type="submit" value="Go">
            </form>"#,
        );
        assert_eq!(
            url,
            "https://example.com/search?q=terminal+browsers&strict=on"
        );
    }

    #[test]
    fn test_select_and_textarea() {
        let url = form_url(
            r#"<form action="go">
                <select name="c"><option value="a">A</option>
                <option value="b" selected>B</option></select>
                <textarea name="note">hi</textarea>
            </form>"#,
        );
        assert_eq!(url, "https://example.com/dir/go?c=b&note=hi");
    }

    #[test]
    fn test_post_navigates_to_bare_action() {
        let url = form_url(
            r#"<form action="/submit" method="post"><input name="x" value="1"></form>"#,
        );
        assert_eq!(url, "https://example.com/submit");
    }

    #[test]
    fn test_empty_action_uses_base() {
        let url = form_url("<form><input name='a' value='1'></form>");
        assert_eq!(url, "https://example.com/dir/page.html?a=1");
    }
}

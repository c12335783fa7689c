//! Presentation normalization: inline styles for the IDE's dark theme and
//! flattening of `pre` / `code` / `abbr` into markup doc popups render.

use super::dom;
use markup5ever_rcdom::Handle;

/// Style applied to elements carrying `class`, or to their `descendant`
/// tags when one is given.
struct StyleRule {
    class: &'static str,
    descendant: Option<&'static str>,
    style: &'static str,
}

const STYLE_RULES: &[StyleRule] = &[
    StyleRule { class: "methodname", descendant: None, style: "color:#CC7832" },
    StyleRule { class: "function", descendant: Some("strong"), style: "color:#CC7832" },
    StyleRule { class: "type", descendant: None, style: "color:#EAB766" },
    StyleRule { class: "parameter", descendant: None, style: "color:#3A95FF" },
    StyleRule { class: "note", descendant: None, style: "border:1px gray solid" },
    StyleRule { class: "phpcode", descendant: None, style: "border-color:gray;background:#1E1F22;" },
    StyleRule { class: "screen", descendant: None, style: "border-color:gray;background:#1E1F22;" },
];

/// Class that marks a container of highlighted code samples.
const CODE_SAMPLE_CLASS: &str = "phpcode";

const BLOCK_STYLE: &str = "border:1px gray solid;";
const CODE_SAMPLE_STYLE: &str = "border:1px gray solid;white-space:pre-wrap";

/// Run every presentation pass over the subtree below `root`.
pub fn normalize(root: &Handle) {
    apply_styles(root);
    flatten_pre(root);
    flatten_code(root);
    flatten_abbr(root);
}

fn apply_styles(root: &Handle) {
    for rule in STYLE_RULES {
        for element in dom::descendants(root) {
            if !dom::has_class(&element, rule.class) {
                continue;
            }
            match rule.descendant {
                Some(tag) => {
                    for inner in dom::elements_by_tag(&element, tag) {
                        dom::set_attr(&inner, "style", rule.style);
                    }
                }
                None => dom::set_attr(&element, "style", rule.style),
            }
        }
    }
}

/// `<pre>` → bordered `<blockquote>` whose text keeps its layout through
/// explicit `<br>` and `&nbsp;`.
fn flatten_pre(root: &Handle) {
    for pre in dom::elements_by_tag(root, "pre") {
        let quote = dom::create_element("blockquote", vec![("style", BLOCK_STYLE)]);
        let text = dom::text_content(&pre);
        if !text.is_empty() {
            let markup = dom::escape_text(&text)
                .replace('\n', "<br>")
                .replace(' ', "&nbsp;");
            for node in dom::parse_fragment_nodes(&markup) {
                dom::append_child(&quote, node);
            }
        }
        dom::replace(&pre, &quote);
    }
}

/// `<code>` → `<blockquote>` inside code-sample containers, `<span>` elsewhere.
/// Attributes and children move over to the replacement.
fn flatten_code(root: &Handle) {
    for code in dom::elements_by_tag(root, "code") {
        let Some(parent) = dom::parent(&code) else {
            continue;
        };
        let replacement = if dom::has_class(&parent, CODE_SAMPLE_CLASS) {
            dom::create_element("blockquote", vec![("style", CODE_SAMPLE_STYLE)])
        } else {
            dom::create_element("span", vec![])
        };
        dom::copy_attrs(&code, &replacement);
        dom::move_children(&code, &replacement);
        dom::replace(&code, &replacement);
    }
}

/// `<abbr>` → `<span>` with the same text; the title is dropped.
fn flatten_abbr(root: &Handle) {
    for abbr in dom::elements_by_tag(root, "abbr") {
        let span = dom::create_element("span", vec![]);
        let text = dom::text_content(&abbr);
        if !text.is_empty() {
            for node in dom::parse_fragment_nodes(&dom::escape_text(&text)) {
                dom::append_child(&span, node);
            }
        }
        dom::replace(&abbr, &span);
    }
}

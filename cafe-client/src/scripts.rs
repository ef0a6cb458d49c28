//! JavaScript snippets evaluated in the page.
//!
//! Every snippet is a self-invoking expression that returns a JSON value by
//! value and never `null`, so results always deserialize.

use raffle_core::{FieldRule, FieldSource};
use serde_json::json;

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Expression evaluating to the document queries run against.
pub fn document_root(frame: Option<&str>) -> String {
    match frame {
        None => "document".to_string(),
        Some(selector) => format!(
            "(() => {{ const frame = document.querySelector({}); \
             return frame ? frame.contentDocument : null; }})()",
            quote(selector)
        ),
    }
}

pub fn presence(frame: Option<&str>, selector: &str) -> String {
    format!(
        "(() => {{ const root = {}; return !!(root && root.querySelector({})); }})()",
        document_root(frame),
        quote(selector)
    )
}

pub fn extract_all(frame: Option<&str>, container: &str, fields: &[FieldRule]) -> String {
    let rules: Vec<serde_json::Value> = fields
        .iter()
        .map(|rule| match &rule.source {
            FieldSource::Text => json!({ "selector": rule.selector, "attribute": null }),
            FieldSource::Attribute(name) => {
                json!({ "selector": rule.selector, "attribute": name })
            }
        })
        .collect();

    format!(
        r#"(() => {{
    const root = {root};
    if (!root) return [];
    const rules = {rules};
    return Array.from(root.querySelectorAll({container})).map(box => rules.map(rule => {{
        const el = box.querySelector(rule.selector);
        if (!el) return null;
        const value = rule.attribute === null ? el.textContent : el.getAttribute(rule.attribute);
        return value === undefined ? null : value;
    }}));
}})()"#,
        root = document_root(frame),
        rules = serde_json::Value::Array(rules),
        container = quote(container),
    )
}

/// Walks `offset` element siblings forward from `anchor` and describes the
/// element reached.
pub fn locate_control(frame: Option<&str>, anchor: &str, offset: usize) -> String {
    format!(
        r#"(() => {{
    const root = {root};
    let el = root ? root.querySelector({anchor}) : null;
    for (let i = 0; i < {offset} && el; i++) el = el.nextElementSibling;
    if (!el) return {{ found: false, tag: "", label: "" }};
    return {{ found: true, tag: el.tagName, label: (el.textContent || "").trim() }};
}})()"#,
        root = document_root(frame),
        anchor = quote(anchor),
        offset = offset,
    )
}

pub fn click_control(frame: Option<&str>, anchor: &str, offset: usize) -> String {
    format!(
        r#"(() => {{
    const root = {root};
    let el = root ? root.querySelector({anchor}) : null;
    for (let i = 0; i < {offset} && el; i++) el = el.nextElementSibling;
    if (!el) return false;
    el.click();
    return true;
}})()"#,
        root = document_root(frame),
        anchor = quote(anchor),
        offset = offset,
    )
}

pub fn stat_counters(frame: Option<&str>, counters: &str, value: &str) -> String {
    format!(
        r#"(() => {{
    const root = {root};
    if (!root) return [];
    return Array.from(root.querySelectorAll({counters})).map(span => {{
        const num = span.querySelector({value});
        return {{ label: span.textContent || "", value: num ? num.textContent : null }};
    }});
}})()"#,
        root = document_root(frame),
        counters = quote(counters),
        value = quote(value),
    )
}

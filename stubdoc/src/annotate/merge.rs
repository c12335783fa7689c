//! Merging a fragment into the comment run that precedes a declaration.

use crate::config::AnnotateConfig;
use regex::Regex;
use std::sync::LazyLock;

/// `/**` alone on its line.
static RE_DOC_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*/\*\*[ \t]*\n").unwrap());

/// `/** text */` on a single line.
static RE_DOC_ONE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*)/\*\*[ \t]*(.*?)[ \t]*\*/[ \t]*\n").unwrap());

/// Escape what the doc-comment context would otherwise interpret.
pub fn normalize_fragment(fragment: &str) -> String {
    fragment.replace('\u{a0}', "&nbsp;").replace('$', "&#36;")
}

/// Combine `fragment` with the `existing` comment run.
///
/// An existing docblock gets the fragment spliced in right after its
/// opening line, keeping every original line in order. A one-line docblock
/// is expanded so its text follows the fragment. Otherwise a fresh docblock
/// indented by `indent` is emitted ahead of whatever was there.
pub fn merge_comment(existing: &str, fragment: &str, indent: &str, config: &AnnotateConfig) -> String {
    let existing = existing
        .replace('\r', "")
        .replace(&config.manual_from, &config.manual_to);
    let fragment = normalize_fragment(fragment);

    if let Some(open) = RE_DOC_OPEN.find(&existing) {
        let open_indent: String = open
            .as_str()
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        let mut merged = String::with_capacity(existing.len() + fragment.len() + 16);
        merged.push_str(&existing[..open.end()]);
        merged.push_str(&comment_lines(&fragment, &open_indent));
        merged.push_str(&existing[open.end()..]);
        return merged;
    }

    if let Some(caps) = RE_DOC_ONE_LINE.captures(&existing) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        let open_indent = &caps[1];
        let mut block = format!("{open_indent}/**\n");
        block.push_str(&comment_lines(&fragment, open_indent));
        block.push_str(&comment_lines(&caps[2], open_indent));
        block.push_str(&format!("{open_indent} */\n"));

        let mut merged = String::with_capacity(existing.len() + block.len());
        merged.push_str(&existing[..whole.start]);
        merged.push_str(&block);
        merged.push_str(&existing[whole.end..]);
        return merged;
    }

    let mut merged = format!("{indent}/**\n");
    merged.push_str(&comment_lines(&fragment, indent));
    merged.push_str(&format!("{indent} */\n"));
    merged.push_str(&existing);
    merged
}

fn comment_lines(fragment: &str, indent: &str) -> String {
    fragment
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("{indent} * {line}\n"))
        .collect()
}

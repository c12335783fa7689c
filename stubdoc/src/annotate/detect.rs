//! Declaration detection for single stub lines.
//!
//! Priority is fixed: class, function, constant, reserved variable. The
//! first kind that matches wins, so a line never yields two declarations.

use regex::Regex;
use std::sync::LazyLock;

/// Markers that make a line part of a comment run.
const COMMENT_PREFIXES: &[&str] = &["/*", "*", "*/", "#"];

/// Stub generators tag names colliding with reserved words with this prefix.
const UNRESERVE_PREFIX: &str = "PS_UNRESERVE_PREFIX_";

static RE_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^define\(['"]([^'"]*)['"]"#).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Class(String),
    /// `class` is set for methods of the enclosing class.
    Function { name: String, class: Option<String> },
    Constant(String),
    Variable(String),
}

impl Declaration {
    /// Fragment key. Underscores become hyphens except for constants, whose
    /// fragment files keep the original spelling.
    pub fn key(&self) -> String {
        match self {
            Declaration::Class(name) => hyphenate(&format!("class.{name}")),
            Declaration::Function { name, class: Some(class) } => hyphenate(&format!("{class}.{name}")),
            Declaration::Function { name, class: None } => hyphenate(&format!("function.{name}")),
            Declaration::Constant(name) => format!("constant.{name}"),
            Declaration::Variable(name) => hyphenate(&format!("reserved.variables.{name}")),
        }
    }
}

fn hyphenate(key: &str) -> String {
    key.replace('_', "-")
}

/// The line with every whitespace character removed.
pub fn collapse(line: &str) -> String {
    line.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn is_comment(collapsed: &str) -> bool {
    COMMENT_PREFIXES
        .iter()
        .any(|prefix| collapsed.starts_with(prefix))
}

/// Detect the declaration on `line`, if any. `enclosing_class` is the most
/// recent class name seen in the file (empty before the first class).
pub fn detect(line: &str, enclosing_class: &str) -> Option<Declaration> {
    if let Some(name) = keyword_operand(line, "class") {
        return Some(Declaration::Class(name));
    }

    if let Some(name) = keyword_operand(line, "function") {
        let name = name
            .strip_prefix(UNRESERVE_PREFIX)
            .map(str::to_string)
            .unwrap_or(name);
        // Global functions are emitted without indentation.
        let indented = line.starts_with(|c: char| c == ' ' || c == '\t');
        let class = (indented && !enclosing_class.is_empty()).then(|| enclosing_class.to_string());
        return Some(Declaration::Function { name, class });
    }

    let collapsed = collapse(line);

    if let Some(caps) = RE_DEFINE.captures(&collapsed) {
        let name = &caps[1];
        if !name.is_empty() {
            return Some(Declaration::Constant(name.to_string()));
        }
    }

    if let Some(rest) = collapsed.strip_prefix('$') {
        let stripped: String = rest.chars().filter(|c| *c != '$' && *c != '_').collect();
        let name = stripped.split('=').next().unwrap_or_default();
        if !name.is_empty() {
            return Some(Declaration::Variable(name.to_string()));
        }
    }

    None
}

/// The token following the first `keyword` token, cut at `(`.
fn keyword_operand(line: &str, keyword: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let position = tokens.iter().position(|token| *token == keyword)?;
    let operand = tokens.get(position + 1)?.trim();
    let name = match operand.find('(') {
        Some(pos) => &operand[..pos],
        None => operand,
    };
    (!name.is_empty()).then(|| name.to_string())
}

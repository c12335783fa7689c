//! Annotation extractor: manual HTML pages → single-line comment fragments.
//!
//! One fragment file per declaration key is written into the fragment
//! directory; the annotator later looks fragments up by the same key.

pub mod dom;
mod links;
mod style;

use crate::config::ExtractConfig;
use crate::error::{Error, Result};
use crate::walk;
use markup5ever_rcdom::Handle;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Page prefixes transformed regardless of the discovered class names.
const CATEGORY_PREFIXES: &[&str] = &["function", "class", "reserved"];

/// Id prefix of constant entries on `*.constants.html` listing pages.
const CONSTANT_ID_PREFIX: &str = "constant.";

/// Class of the node holding a constant's short description.
const DESCRIPTION_CLASS: &str = "simpara";

/// Textual fixes applied to every serialized fragment, in order.
const FRAGMENT_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("/*", "//"),
    ("*/", ""),
    ("#0000BB", "#9876AA"),
    ("\r", ""),
    ("\n", ""),
];

/// Counts for one extraction run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub pages: usize,
    pub constants: usize,
    /// Pages skipped for a recoverable reason (missing target element).
    pub skipped: usize,
}

/// Transform every page of `raw_dir` and write fragments into `fragment_dir`.
pub fn extract_all(raw_dir: &Path, fragment_dir: &Path, config: &ExtractConfig) -> Result<ExtractReport> {
    walk::ensure_dir(fragment_dir)?;

    let files: Vec<String> = walk::list_files(raw_dir, false)?
        .into_iter()
        .filter_map(|path| path.to_str().map(str::to_string))
        .filter(|name| name.ends_with(".html"))
        .collect();
    let classes = discover_classes(&files);
    debug!(count = classes.len(), "discovered classes");

    let mut report = ExtractReport::default();
    for name in &files {
        let tokens: Vec<&str> = name.split('.').collect();
        let is_page = CATEGORY_PREFIXES.contains(&tokens[0]) || classes.contains(tokens[0]);
        let is_listing = tokens.len() >= 2 && tokens[tokens.len() - 2] == "constants";
        if !is_page && !is_listing {
            continue;
        }

        let source = raw_dir.join(name);
        let html = load_html(&source)?;

        if is_page {
            let key = name.trim_end_matches(".html");
            match transform_page(&html, key, &source, config) {
                Ok(fragment) => {
                    walk::write_file(&fragment_dir.join(name), &fragment)?;
                    debug!(file = %name, "extracted page");
                    report.pages += 1;
                }
                Err(e) if e.is_recoverable() => {
                    warn!("skipping {}: {}", name, e);
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if is_listing {
            for (key, fragment) in extract_constants(&html, config) {
                walk::write_file(&fragment_dir.join(format!("{key}.html")), &fragment)?;
                debug!(file = %name, key = %key, "extracted constant");
                report.constants += 1;
            }
        }
    }

    info!(
        pages = report.pages,
        constants = report.constants,
        skipped = report.skipped,
        "extraction finished"
    );
    Ok(report)
}

/// Class names from `class.<name>.html` files.
fn discover_classes(files: &[String]) -> HashSet<String> {
    files
        .iter()
        .filter_map(|name| name.strip_prefix("class.")?.strip_suffix(".html"))
        .map(str::to_string)
        .collect()
}

fn load_html(path: &Path) -> Result<String> {
    let bytes = walk::read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| Error::MalformedMarkup {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Reduce a full manual page to the fragment for `key`.
///
/// The page must contain an element whose id is `key`; only that subtree
/// survives. `source` is used for error messages only.
pub fn transform_page(html: &str, key: &str, source: &Path, config: &ExtractConfig) -> Result<String> {
    let document = dom::parse(html);
    let element = dom::find_by_id(&document.document, key).ok_or_else(|| Error::MissingTarget {
        id: key.to_string(),
        path: source.to_path_buf(),
    })?;

    links::rewrite_links(&element, &config.site_url, &config.source_extension);
    style::normalize(&element);

    let html = dom::outer_html(&element).map_err(|e| Error::MalformedMarkup {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(clean_fragment(&html))
}

/// Pull `(key, fragment)` pairs out of a constants listing page.
///
/// Entries without a name, with a class-constant or namespaced name, or
/// without a short description are skipped without affecting the others.
pub fn extract_constants(html: &str, config: &ExtractConfig) -> Vec<(String, String)> {
    let document = dom::parse(html);
    let mut fragments = Vec::new();

    for entry in dom::descendants(&document.document) {
        let is_constant = dom::attr(&entry, "id")
            .map(|id| id.starts_with(CONSTANT_ID_PREFIX))
            .unwrap_or(false);
        if !is_constant {
            continue;
        }

        let Some(name_node) = constant_name_node(&entry) else {
            continue;
        };
        let name = dom::text_content(&name_node).trim().to_string();
        if name.is_empty() || name.contains("::") || name.contains('\\') || name.contains('/') {
            continue;
        }

        let Some(description) = description_node(&entry) else {
            continue;
        };
        if dom::text_content(&description).trim().is_empty() {
            continue;
        }

        links::rewrite_links(&description, &config.site_url, &config.source_extension);
        match dom::outer_html(&description) {
            Ok(serialized) => {
                fragments.push((format!("constant.{name}"), clean_fragment(serialized.trim())));
            }
            Err(e) => warn!("skipping constant {}: {}", name, e),
        }
    }

    fragments
}

/// First `<strong><code>NAME</code></strong>` below the entry.
fn constant_name_node(entry: &Handle) -> Option<Handle> {
    dom::elements_by_tag(entry, "code").into_iter().find(|code| {
        dom::parent(code)
            .map(|parent| dom::tag_name(&parent) == Some("strong"))
            .unwrap_or(false)
    })
}

/// The short description in the element following the entry.
fn description_node(entry: &Handle) -> Option<Handle> {
    let sibling = dom::next_element_sibling(entry)?;
    if dom::has_class(&sibling, DESCRIPTION_CLASS) {
        return Some(sibling);
    }
    dom::descendants(&sibling)
        .into_iter()
        .find(|node| dom::is_element(node) && dom::has_class(node, DESCRIPTION_CLASS))
}

/// Make a serialized fragment safe to embed in a doc comment, on one line.
pub fn clean_fragment(html: &str) -> String {
    FRAGMENT_SUBSTITUTIONS
        .iter()
        .fold(html.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const STRLEN_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>strlen</title></head>
<body>
<div id="layout">
 <div id="function.strlen" class="refentry">
  <p class="refpurpose"><span class="refname">strlen</span> - Get string length</p>
  <p class="para">See also <a href="function.strpos.html">strpos</a>.</p>
 </div>
</div>
</body></html>
"#;

    const CONSTANTS_PAGE: &str = r#"<html><body>
<dl>
 <dt id="constant.e-error"><strong><code>E_ERROR</code></strong> (<span class="type">int</span>)</dt>
 <dd><p class="simpara">Fatal run-time errors. See <a href="errorfunc.configuration.html">ini</a>.</p></dd>
 <dt id="constant.e-warning"><strong><code>E_WARNING</code></strong></dt>
 <dd><p class="para">No short description here.</p></dd>
 <dt id="constant.pdo-attr"><strong><code>PDO::ATTR_CASE</code></strong></dt>
 <dd><p class="simpara">Class constant.</p></dd>
 <dt id="constant.no-name"><span>nothing</span></dt>
 <dd><p class="simpara">Orphan.</p></dd>
 <dt id="constant.e-notice"><strong><code>E_NOTICE</code></strong></dt>
 <dd><p class="simpara">Run-time notices.</p></dd>
</dl>
</body></html>
"#;

    fn page(key: &str) -> Result<String> {
        transform_page(STRLEN_PAGE, key, &PathBuf::from("function.strlen.html"), &ExtractConfig::default())
    }

    #[test]
    fn page_reduces_to_target_element() {
        let fragment = page("function.strlen").unwrap();
        assert!(fragment.starts_with(r#"<div id="function.strlen" class="refentry">"#));
        assert!(fragment.contains("Get string length"));
        assert!(fragment.contains(r#"<a href="https://php.net/manual/zh/function.strpos.php">strpos</a>"#));
        assert!(!fragment.contains("layout"));
        assert!(!fragment.contains('\n'));
    }

    #[test]
    fn page_without_target_is_missing_target() {
        let err = page("function.strpos").unwrap_err();
        assert!(matches!(err, Error::MissingTarget { ref id, .. } if id == "function.strpos"));
    }

    #[test]
    fn fragment_cleanup() {
        assert_eq!(clean_fragment("a /* b */ c\r\nd"), "a // b  cd");
        assert_eq!(clean_fragment(r#"<span style="color: #0000BB">x</span>"#), r#"<span style="color: #9876AA">x</span>"#);
    }

    #[test]
    fn constants_listing_yields_described_constants() {
        let fragments = extract_constants(CONSTANTS_PAGE, &ExtractConfig::default());
        let keys: Vec<&str> = fragments.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["constant.E_ERROR", "constant.E_NOTICE"]);

        let error = &fragments[0].1;
        assert!(error.starts_with(r#"<p class="simpara">Fatal run-time errors."#));
        assert!(error.contains(r#"href="https://php.net/manual/zh/errorfunc.configuration.php""#));
    }

    fn write(dir: &Path, name: &str, contents: &str) {
        walk::write_file(&dir.join(name), contents).unwrap();
    }

    #[test]
    fn driver_selects_pages_and_listings() {
        let raw = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(raw.path(), "function.strlen.html", STRLEN_PAGE);
        write(raw.path(), "class.arrayobject.html", r#"<div id="class.arrayobject">AO</div>"#);
        write(raw.path(), "arrayobject.count.html", r#"<div id="arrayobject.count">count</div>"#);
        write(raw.path(), "errorfunc.constants.html", CONSTANTS_PAGE);
        write(raw.path(), "intro.html", r#"<div id="intro">ignored</div>"#);
        write(raw.path(), "function.broken.html", "<div>no id</div>");

        let report = extract_all(raw.path(), out.path(), &ExtractConfig::default()).unwrap();
        assert_eq!(report, ExtractReport { pages: 3, constants: 2, skipped: 1 });

        let names: Vec<String> = walk::list_files(out.path(), false)
            .unwrap()
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "arrayobject.count.html",
                "class.arrayobject.html",
                "constant.E_ERROR.html",
                "constant.E_NOTICE.html",
                "function.strlen.html",
            ]
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let raw = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(raw.path(), "function.strlen.html", STRLEN_PAGE);
        write(raw.path(), "errorfunc.constants.html", CONSTANTS_PAGE);

        extract_all(raw.path(), first.path(), &ExtractConfig::default()).unwrap();
        extract_all(raw.path(), second.path(), &ExtractConfig::default()).unwrap();

        for file in walk::list_files(first.path(), false).unwrap() {
            let a = std::fs::read(first.path().join(&file)).unwrap();
            let b = std::fs::read(second.path().join(&file)).unwrap();
            assert_eq!(a, b, "{} differs", file.display());
        }
    }

    #[test]
    fn non_utf8_page_is_malformed() {
        let raw = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        std::fs::write(raw.path().join("function.bad.html"), [0xff, 0xfe, 0x00]).unwrap();

        let err = extract_all(raw.path(), out.path(), &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedMarkup { .. }));
    }
}

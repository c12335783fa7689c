//! Declaration annotator: a line-by-line state machine over one stub file.
//!
//! Comment lines accumulate until the next code line. If that line declares
//! something with a fragment, the fragment is merged into the accumulated
//! comment; either way the comment run is emitted before the line itself.

pub mod detect;
pub mod merge;
pub mod store;

use crate::config::AnnotateConfig;
use crate::error::Result;
use crate::walk;
use detect::Declaration;
use std::path::Path;
use store::{DirStore, FragmentStore};
use tracing::{debug, info};

/// Counts for one annotation run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AnnotateReport {
    pub files: usize,
    /// Declarations that received a fragment.
    pub annotated: usize,
}

/// Result of annotating one file.
#[derive(Debug)]
pub struct AnnotatedFile {
    pub content: String,
    pub annotated: usize,
}

// -- Scanner state ------------------------------------------------------------

#[derive(Default)]
struct ScanState {
    /// Comment lines since the last emitted line, terminators included.
    comment: String,
    /// Most recent class declared in the file.
    class: String,
    output: String,
    annotated: usize,
}

/// Annotate every stub file below `stubs_dir` into `output_dir`.
pub fn annotate_all(
    fragment_dir: &Path,
    stubs_dir: &Path,
    output_dir: &Path,
    config: &AnnotateConfig,
) -> Result<AnnotateReport> {
    let store = DirStore::new(fragment_dir);
    let mut report = AnnotateReport::default();

    for relative in walk::list_files(stubs_dir, true)? {
        if !is_stub_file(&relative, &config.source_extension) {
            continue;
        }
        let source = walk::read_text(&stubs_dir.join(&relative))?;
        let annotated = annotate_source(&source, &store, config)?;
        walk::write_file(&output_dir.join(&relative), &annotated.content)?;

        debug!(file = %relative.display(), annotated = annotated.annotated, "annotated stub");
        report.files += 1;
        report.annotated += annotated.annotated;
    }

    info!(files = report.files, annotated = report.annotated, "annotation finished");
    Ok(report)
}

/// Stub files carry the source extension and live in a subdirectory of the
/// corpus root; files directly in the root (stub maps, meta files) are skipped.
fn is_stub_file(relative: &Path, extension: &str) -> bool {
    let has_extension = relative
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e == extension)
        .unwrap_or(false);
    let in_subdirectory = match relative.parent().and_then(|p| p.to_str()) {
        Some(dir) => !dir.is_empty() && dir != "/" && dir != "\\",
        None => false,
    };
    has_extension && in_subdirectory
}

/// Annotate a single stub source.
pub fn annotate_source(
    source: &str,
    store: &dyn FragmentStore,
    config: &AnnotateConfig,
) -> Result<AnnotatedFile> {
    let mut state = ScanState::default();

    for line in source.split_inclusive('\n') {
        process_line(&mut state, line, store, config)?;
    }

    // A comment run at the end of the file has no declaration to attach to.
    let trailing = std::mem::take(&mut state.comment);
    state.output.push_str(&trailing);

    Ok(AnnotatedFile {
        content: state.output,
        annotated: state.annotated,
    })
}

// -- Line processing ----------------------------------------------------------

fn process_line(
    s: &mut ScanState,
    line: &str,
    store: &dyn FragmentStore,
    config: &AnnotateConfig,
) -> Result<()> {
    // 1. Comment lines only accumulate
    if detect::is_comment(&detect::collapse(line)) {
        s.comment.push_str(line);
        return Ok(());
    }

    // 2. Declaration, merged with the fragment when one exists
    if let Some(declaration) = detect::detect(line, &s.class) {
        if let Declaration::Class(name) = &declaration {
            s.class = name.clone();
        }
        let comment = std::mem::take(&mut s.comment);
        match store.fragment(&declaration.key())? {
            Some(fragment) => {
                let indent = leading_whitespace(line);
                let merged = merge::merge_comment(&comment, &fragment, indent, config);
                // Merged lines take the declaration's terminator.
                if line.ends_with("\r\n") {
                    s.output.push_str(&merged.replace('\n', "\r\n"));
                } else {
                    s.output.push_str(&merged);
                }
                s.annotated += 1;
            }
            None => s.output.push_str(&comment),
        }
    }

    // 3. Flush whatever comment is left, then the line itself
    let leftover = std::mem::take(&mut s.comment);
    s.output.push_str(&leftover);
    s.output.push_str(line);
    Ok(())
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn store(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn annotate(source: &str, entries: &[(&str, &str)]) -> String {
        annotate_source(source, &store(entries), &AnnotateConfig::default())
            .unwrap()
            .content
    }

    #[test]
    fn free_function_gets_fresh_block() {
        let out = annotate(
            "<?php\nfunction strlen($str) {}\n",
            &[("function.strlen", "<p>Get string length</p>")],
        );
        assert_eq!(
            out,
            "<?php\n/**\n * <p>Get string length</p>\n */\nfunction strlen($str) {}\n"
        );
    }

    #[test]
    fn missing_fragment_passes_comment_through() {
        let source = "<?php\n/**\n * @param string $str\n */\nfunction strlen($str) {}\n";
        assert_eq!(annotate(source, &[]), source);
    }

    #[test]
    fn file_without_declarations_is_unchanged() {
        let source = "<?php\n// nothing here\n\n{\n}\n# trailing\n";
        assert_eq!(annotate(source, &[("function.x", "x")]), source);
    }

    #[test]
    fn method_splices_into_existing_docblock() {
        let source = "<?php\nclass ArrayObject\n{\n    /**\n     * @return array\n     */\n    public function getArrayCopy() {}\n}\n";
        let out = annotate(
            source,
            &[
                ("class.ArrayObject", "AO"),
                ("ArrayObject.getArrayCopy", "Copy"),
            ],
        );
        assert_eq!(
            out,
            "<?php\n/**\n * AO\n */\nclass ArrayObject\n{\n    /**\n     * Copy\n     * @return array\n     */\n    public function getArrayCopy() {}\n}\n"
        );
    }

    #[test]
    fn comment_run_before_plain_line_is_flushed() {
        let source = "# header\n\nfunction a() {}\n";
        let out = annotate(source, &[("function.a", "A")]);
        assert_eq!(out, "# header\n\n/**\n * A\n */\nfunction a() {}\n");
    }

    #[test]
    fn crlf_file_keeps_crlf_terminators() {
        let source = "<?php\r\n/**\r\n * @since 8\r\n */\r\nfunction a() {}\r\nfunction b() {}\r\n";
        let out = annotate(source, &[("function.a", "A"), ("function.b", "B")]);
        assert_eq!(
            out,
            "<?php\r\n/**\r\n * A\r\n * @since 8\r\n */\r\nfunction a() {}\r\n/**\r\n * B\r\n */\r\nfunction b() {}\r\n"
        );
        assert_eq!(out.matches('\n').count(), out.matches("\r\n").count());
    }

    #[test]
    fn constants_and_variables() {
        let source = "define('E_ERROR', 1);\n$_GET = [];\n";
        let out = annotate(
            source,
            &[
                ("constant.E_ERROR", "Fatal"),
                ("reserved.variables.GET", "Query $vars"),
            ],
        );
        assert_eq!(
            out,
            "/**\n * Fatal\n */\ndefine('E_ERROR', 1);\n/**\n * Query &#36;vars\n */\n$_GET = [];\n"
        );
    }

    #[test]
    fn class_context_survives_until_next_class() {
        let source = "class A {\n    function f() {}\n}\nclass B {\n    function f() {}\n}\nfunction f() {}\n";
        let out = annotate(
            source,
            &[("A.f", "A-f"), ("B.f", "B-f"), ("function.f", "free-f")],
        );
        let a = out.find("A-f").unwrap();
        let b = out.find("B-f").unwrap();
        let free = out.find("free-f").unwrap();
        assert!(a < b && b < free);
        assert!(out.contains("    /**\n     * B-f\n     */\n    function f() {}\n"));
    }

    #[test]
    fn counts_annotated_declarations() {
        let file = annotate_source(
            "function a() {}\nfunction b() {}\n",
            &store(&[("function.a", "A")]),
            &AnnotateConfig::default(),
        )
        .unwrap();
        assert_eq!(file.annotated, 1);
    }

    #[test]
    fn stub_file_filter() {
        assert!(is_stub_file(Path::new("standard/basic.php"), "php"));
        assert!(!is_stub_file(Path::new("PhpStormStubsMap.php"), "php"));
        assert!(!is_stub_file(Path::new("standard/README.md"), "php"));
    }

    #[test]
    fn driver_mirrors_directory_layout() {
        let fragments = TempDir::new().unwrap();
        let stubs = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        walk::write_file(&fragments.path().join("function.strlen.html"), "Length").unwrap();
        walk::write_file(
            &stubs.path().join("standard/standard_1.php"),
            "<?php\nfunction strlen($s) {}\n",
        )
        .unwrap();
        walk::write_file(&stubs.path().join("PhpStormStubsMap.php"), "<?php\n").unwrap();

        let report = annotate_all(
            fragments.path(),
            stubs.path(),
            output.path(),
            &AnnotateConfig::default(),
        )
        .unwrap();
        assert_eq!(report, AnnotateReport { files: 1, annotated: 1 });

        let out = std::fs::read_to_string(output.path().join("standard/standard_1.php")).unwrap();
        assert_eq!(out, "<?php\n/**\n * Length\n */\nfunction strlen($s) {}\n");
        assert!(!output.path().join("PhpStormStubsMap.php").exists());
    }
}

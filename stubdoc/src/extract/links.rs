//! Link rewriting for extracted fragments.

use super::dom;
use markup5ever_rcdom::Handle;

/// Separator between a class and its static member (`Foo::bar`).
const STATIC_MEMBER_SEPARATOR: &str = "::";

/// Rewrite every `<a>` below `root`.
///
/// External links are left alone. Static-member references (`Foo::bar`)
/// become a `{@link text}` marker; everything else is pointed at the
/// online manual.
pub fn rewrite_links(root: &Handle, site_url: &str, extension: &str) {
    for link in dom::elements_by_tag(root, "a") {
        let Some(href) = dom::attr(&link, "href") else {
            continue;
        };
        if is_external(&href) {
            continue;
        }

        let text = dom::text_content(&link);
        if text.contains(STATIC_MEMBER_SEPARATOR) {
            let marker = dom::create_text(&format!("{{@link {text}}}"));
            dom::replace(&link, &marker);
        } else {
            dom::set_attr(&link, "href", &localize_href(&href, site_url, extension));
        }
    }
}

fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// `function.strpos.html#x` → `<site>function.strpos.php#x`
fn localize_href(href: &str, site_url: &str, extension: &str) -> String {
    let (path, anchor) = match href.split_once('#') {
        Some((path, anchor)) => (path, Some(anchor)),
        None => (href, None),
    };
    let path = match path.strip_suffix(".html") {
        Some(stem) => format!("{stem}.{extension}"),
        None => path.to_string(),
    };
    match anchor {
        Some(anchor) => format!("{site_url}{path}#{anchor}"),
        None => format!("{site_url}{path}"),
    }
}

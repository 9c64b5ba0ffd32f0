//! Template guard for `<script type="text/html">` blocks.
//!
//! Client-side template engines (knockout and friends) keep markup inside
//! script blocks. An HTML parser treats script content as raw text, so the
//! classes inside those templates would never be seen. The guard prefixes
//! the tag names of such blocks before parsing, turning them into a custom
//! element, and strips the prefix again after serialization:
//!
//! ```text
//! <script type="text/html">..</script>
//!     --escape-->  <declass-template-guard-script type="text/html">..</declass-template-guard-script>
//!     --rewrite--> (inner elements are now visible)
//!     --restore--> <script type="text/html">..</script>
//! ```
//!
//! The original tag name stays in place behind the prefix, so `<SCRIPT>`
//! comes back as `<SCRIPT>`. Executable scripts are skipped whole: a
//! `<script` inside their body is JavaScript text, not a tag.
//!
//! Both directions are plain text transforms. The restore pass is a literal
//! substitution, which is only sound because the prefix is a verbose,
//! namespaced custom element name no document uses.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Inserted in front of the tag name. Ends in a hyphen so the result parses
/// as a custom element.
pub const PREFIX: &str = "declass-template-guard-";

/// Placeholder element name for a lowercase `script` tag.
pub const PLACEHOLDER: &str = "declass-template-guard-script";

const ORIGINAL: &str = "script";

static SCRIPT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script\b([^>]*)>").unwrap());

static TEMPLATE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:^|\s)type\s*=\s*["']?\s*text/html\s*["']?(?:[\s/>]|$)"#).unwrap());

static SCRIPT_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</script\b").unwrap());

/// Prefix the tag names of every template script block.
///
/// Returns the input unchanged (borrowed) when no block qualifies.
pub fn escape(html: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut cursor = 0;
    let mut changed = false;

    while let Some(open) = SCRIPT_OPEN.captures_at(html, cursor) {
        let (Some(tag), Some(attrs)) = (open.get(0), open.get(1)) else {
            break;
        };
        let close = SCRIPT_CLOSE.find_at(html, tag.end());

        if !TEMPLATE_TYPE.is_match(attrs.as_str()) {
            // Raw text up to the closing tag; an unterminated script runs to the end.
            let end = close.map_or(html.len(), |close| close.end());
            out.push_str(&html[cursor..end]);
            cursor = end;
            continue;
        }

        changed = true;
        out.push_str(&html[cursor..=tag.start()]);
        out.push_str(PREFIX);
        out.push_str(&html[tag.start() + 1..tag.end()]);
        cursor = tag.end();

        // An unterminated block keeps its renamed opening tag only.
        if let Some(close) = close {
            out.push_str(&html[cursor..close.start() + 2]);
            out.push_str(PREFIX);
            out.push_str(&html[close.start() + 2..close.end()]);
            cursor = close.end();
        }
    }

    if !changed {
        return Cow::Borrowed(html);
    }
    out.push_str(&html[cursor..]);
    Cow::Owned(out)
}

/// Strip the prefix from every guarded tag name.
pub fn restore(html: &str) -> String {
    html.replace(&format!("</{PREFIX}"), "</")
        .replace(&format!("<{PREFIX}"), "<")
}

/// Display name for a tag seen during rewriting.
pub fn display_tag(tag: &str) -> &str {
    if tag.eq_ignore_ascii_case(PLACEHOLDER) {
        ORIGINAL
    } else {
        tag
    }
}

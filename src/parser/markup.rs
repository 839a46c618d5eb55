use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:strong|b)(?:\s[^>]*)?>(.*?)</(?:strong|b)\s*>").unwrap());
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h[1-6](?:\s[^>]*)?>(.*?)</h[1-6]\s*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Texts the rendered markup shows in bold or as a heading.
#[derive(Debug, Default, Clone)]
pub struct MarkupHints {
    emphasized: HashSet<String>,
}

impl MarkupHints {
    pub fn from_markup(markup: Option<&str>) -> Self {
        let Some(html) = markup else {
            return Self::default();
        };

        let emphasized: HashSet<String> = BOLD_RE
            .captures_iter(html)
            .chain(HEADING_RE.captures_iter(html))
            .map(|caps| clean_span(&caps[1]))
            .filter(|t| !t.is_empty())
            .collect();

        Self { emphasized }
    }

    pub fn is_emphasized(&self, line: &str) -> bool {
        !self.emphasized.is_empty() && self.emphasized.contains(&collapse_ws(line))
    }

    pub fn len(&self) -> usize {
        self.emphasized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emphasized.is_empty()
    }
}

fn clean_span(inner: &str) -> String {
    let stripped = TAG_RE.replace_all(inner, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    collapse_ws(&decoded)
}

pub(crate) fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

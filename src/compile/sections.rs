use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static EXTENDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@extends\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static INLINE_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@section\(['"]([^'")]+)['"]\s*,\s*['"]([^'")]+)['"]\)"#).unwrap()
});

static BLOCK_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)@section\(['"]([^'")]+)['"]\)(.*?)@endsection"#).unwrap()
});

static YIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@yield\(['"](.+?)['"]\)"#).unwrap());

/// Section name to content, built fresh for every compile.
pub type SectionTable = HashMap<String, String>;

/// Finds the parent layout a template extends and strips the marker.
///
/// The first `@extends` wins; every `@extends` marker is removed from the body.
pub fn check_extends(content: &str) -> (Option<String>, String) {
    let extends = EXTENDS_RE
        .captures(content)
        .map(|caps| caps[1].to_string());
    match extends {
        Some(name) => (Some(name), EXTENDS_RE.replace_all(content, "").into_owned()),
        None => (None, content.to_string()),
    }
}

/// Removes inline and block sections from the body and records their content.
///
/// Inline sections (`@section('title', 'Home')`) are taken first, then block
/// sections, whose content is trimmed. A later definition of the same name wins.
pub fn extract_sections(content: &str) -> (SectionTable, String) {
    let mut sections = SectionTable::new();

    let content = INLINE_SECTION_RE.replace_all(content, |caps: &Captures| {
        sections.insert(caps[1].to_string(), caps[2].to_string());
        String::new()
    });

    let content = BLOCK_SECTION_RE.replace_all(&content, |caps: &Captures| {
        sections.insert(caps[1].to_string(), caps[2].trim().to_string());
        String::new()
    });

    let content = content.into_owned();
    (sections, content)
}

/// Replaces each `@yield('name')` with its section; unknown names become empty.
pub fn inject_sections(layout: &str, sections: &SectionTable) -> String {
    YIELD_RE
        .replace_all(layout, |caps: &Captures| {
            sections.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

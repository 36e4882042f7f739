use crate::directive::{DirectiveRegistry, TemplateDirective};
use anyhow::{Context, Result};
use quick_xml::de;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct Directives {
    #[serde(rename = "directive", default)]
    items: Vec<DirectiveItem>,
}

#[derive(Debug, Deserialize)]
struct DirectiveItem {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "$text", default)]
    body: Option<String>,
}

/// Builds a registry from in-memory definition documents.
///
/// A document that fails to parse contributes nothing; the rest still load.
pub fn load(documents: &[&str]) -> DirectiveRegistry {
    let mut registry = DirectiveRegistry::new();
    for document in documents {
        if let Err(e) = process_directive_data(document, "memory", &mut registry) {
            warn!("Skipping directive definitions: {:#}", e);
        }
    }
    registry
}

/// Recursively reads every `*.xml` file under `dir_path`, in file name order.
///
/// A missing directory yields an empty registry, and malformed files are skipped
/// with a warning. Neither is an error.
pub fn load_from_path(dir_path: &Path) -> DirectiveRegistry {
    let mut registry = DirectiveRegistry::new();
    if !dir_path.is_dir() {
        debug!("Directives directory not found: {}", dir_path.display());
        return registry;
    }

    for entry in WalkDir::new(dir_path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "xml") {
            if let Err(e) = process_directive_file(path, &mut registry) {
                warn!("Skipping directive definitions: {:#}", e);
            }
        }
    }
    debug!(
        "Loaded {} custom directives from {}",
        registry.len(),
        dir_path.display()
    );
    registry
}

fn process_directive_file(path: &Path, registry: &mut DirectiveRegistry) -> Result<()> {
    let xml_content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    process_directive_data(&xml_content, &path.display().to_string(), registry)
}

fn process_directive_data(
    xml_content: &str,
    source: &str,
    registry: &mut DirectiveRegistry,
) -> Result<()> {
    let directives: Directives =
        de::from_str(xml_content).with_context(|| format!("XML parse failed: {}", source))?;

    // Parse the whole document before registering anything from it.
    for item in directives.items {
        let name = item.name.trim();
        let body = item.body.as_deref().unwrap_or("").trim();
        if let Err(e) = registry.register(name, TemplateDirective::new(body)) {
            warn!("{} in {}", e, source);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_definitions() {
        let xml = r#"
            <directives>
                <directive name="datetime"><![CDATA[<?php echo date($1); ?>]]></directive>
                <directive name="hello">Hello, world</directive>
            </directives>
        "#;
        let registry = load(&[xml]);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("datetime").unwrap().call(&["'Y'".to_string()]),
            "<?php echo date('Y'); ?>"
        );
        assert_eq!(registry.get("hello").unwrap().call(&[]), "Hello, world");
    }

    #[test]
    fn test_reserved_names_are_skipped() {
        let xml = r#"<directives>
            <directive name="if">nope</directive>
            <directive name="ok">yes</directive>
        </directives>"#;
        let registry = load(&[xml]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("if").is_none());
    }

    #[test]
    fn test_malformed_document_is_tolerated() {
        let registry = load(&["<directives><directive name=", "not xml at all <<<"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let registry = load_from_path(Path::new("/no/such/directives/dir"));
        assert!(registry.is_empty());
    }
}

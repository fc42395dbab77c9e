//! Serialization of resource listings and API declarations to YAML or JSON.
//!
//! Declarations can be rendered to strings or written out as a documentation
//! directory: one listing file plus one file per declaration key.

use crate::registry::DeclarationRegistry;
use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name stem used for the resource listing when written to a directory
pub const LISTING_FILE_STEM: &str = "apidocs";

/// Serializes a document to YAML.
///
/// # Example
///
/// ```
/// use swagger_decl::declaration::ApiDeclaration;
/// use swagger_decl::serializer::serialize_yaml;
///
/// let yaml = serialize_yaml(&ApiDeclaration::default()).unwrap();
/// assert!(yaml.contains("resourcePath"));
/// ```
pub fn serialize_yaml<T: Serialize + ?Sized>(doc: &T) -> Result<String> {
    debug!("Serializing document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize document to YAML")
}

/// Serializes a document to pretty-printed JSON.
pub fn serialize_json<T: Serialize + ?Sized>(doc: &T) -> Result<String> {
    debug!("Serializing document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// File name for the declaration registered under `key`.
///
/// `/books/shelves` becomes `books_shelves.<extension>`; the empty key becomes `root`.
pub fn declaration_file_name(key: &str, extension: &str) -> String {
    let stem = key.trim_matches('/').replace('/', "_");
    let stem = if stem.is_empty() { "root".to_string() } else { stem };
    format!("{}.{}", stem, extension)
}

/// Output format of written documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Json => "json",
        }
    }

    pub fn render<T: Serialize + ?Sized>(&self, doc: &T) -> Result<String> {
        match self {
            DocumentFormat::Yaml => serialize_yaml(doc),
            DocumentFormat::Json => serialize_json(doc),
        }
    }
}

/// Writes the listing and every declaration of `registry` into `dir`.
///
/// Returns the written paths, listing first.
pub fn write_registry(
    registry: &DeclarationRegistry,
    dir: &Path,
    format: DocumentFormat,
) -> Result<Vec<PathBuf>> {
    let extension = format.extension();
    let mut written = Vec::with_capacity(registry.len() + 1);

    let listing_path = dir.join(format!("{}.{}", LISTING_FILE_STEM, extension));
    write_to_file(&format.render(&registry.listing())?, &listing_path)?;
    written.push(listing_path);

    for (key, declaration) in registry.iter() {
        let path = dir.join(declaration_file_name(key, extension));
        let content = format
            .render(declaration)
            .with_context(|| format!("Failed to render declaration {}", key))?;
        write_to_file(&content, &path)?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::descriptor::{RouteDescriptor, ServiceDescriptor};
    use crate::declaration::ApiDeclaration;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn registry() -> DeclarationRegistry {
        let services = vec![
            ServiceDescriptor::new("/books").route(RouteDescriptor::get("/books")),
            ServiceDescriptor::new("/books/shelves").route(RouteDescriptor::get("/books/shelves")),
        ];
        DeclarationRegistry::build(&Config::new("http://localhost:8080"), &services)
    }

    #[test]
    fn test_declaration_file_name() {
        assert_eq!(declaration_file_name("/books", "json"), "books.json");
        assert_eq!(declaration_file_name("/books/shelves", "yaml"), "books_shelves.yaml");
        assert_eq!(declaration_file_name("", "json"), "root.json");
        assert_eq!(declaration_file_name("/", "json"), "root.json");
    }

    #[test]
    fn test_serialize_json_pretty_format() {
        let json = serialize_json(&ApiDeclaration::default()).unwrap();

        assert!(json.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["resourcePath"], "");
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir").join("nested").join("test.yaml");

        write_to_file("test content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_write_registry_json() {
        let temp_dir = TempDir::new().unwrap();

        let written = write_registry(&registry(), temp_dir.path(), DocumentFormat::Json).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["apidocs.json", "books.json", "books_shelves.json"]);

        let listing: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(listing["apis"][0]["path"], "/books");
        assert_eq!(listing["apis"][1]["path"], "/books/shelves");

        let books: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(books["resourcePath"], "/books");
        assert_eq!(books["apis"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_write_registry_yaml() {
        let temp_dir = TempDir::new().unwrap();

        let written = write_registry(&registry(), temp_dir.path(), DocumentFormat::Yaml).unwrap();

        let content = fs::read_to_string(&written[2]).unwrap();
        let declaration: ApiDeclaration = serde_yaml::from_str(&content).unwrap();
        assert_eq!(declaration.resource_path, "/books/shelves");
    }
}

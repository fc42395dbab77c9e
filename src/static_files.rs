use crate::service::DocResponse;
use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Serves documentation UI assets below the UI mount path
pub trait StaticHandler: Send + Sync {
    /// Serve `relative_path` (the request path with the mount path removed)
    fn serve(&self, relative_path: &str) -> Option<DocResponse>;

    /// Name used when logging the mount
    fn name(&self) -> String {
        "custom handler".to_string()
    }
}

/// Serves files from a folder on disk
#[derive(Debug, Clone)]
pub struct DirectoryHandler {
    base_dir: PathBuf,
}

impl DirectoryHandler {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base_dir: base.into() }
    }

    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if pb.is_dir() {
            pb.push("index.html");
        }
        Some(pb)
    }

    fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "html" => "text/html",
            "css" => "text/css",
            "js" => "application/javascript",
            "json" => "application/json",
            "png" => "image/png",
            "svg" => "image/svg+xml",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }
}

impl StaticHandler for DirectoryHandler {
    fn serve(&self, relative_path: &str) -> Option<DocResponse> {
        let path = self.map_path(relative_path)?;
        match fs::read(&path) {
            Ok(bytes) => Some(DocResponse::new(200, Self::content_type(&path), bytes)),
            Err(e) => {
                debug!("Cannot serve {}: {}", path.display(), e);
                None
            }
        }
    }

    fn name(&self) -> String {
        format!("folder {}", self.base_dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ui_folder() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib").join("swagger.js"), "var x;").unwrap();
        dir
    }

    #[test]
    fn test_serves_file_with_content_type() {
        let dir = ui_folder();
        let handler = DirectoryHandler::new(dir.path());

        let response = handler.serve("lib/swagger.js").unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("Content-Type"), Some("application/javascript"));
        assert_eq!(response.body, b"var x;");
    }

    #[test]
    fn test_directory_serves_index() {
        let dir = ui_folder();
        let handler = DirectoryHandler::new(dir.path());

        let response = handler.serve("").unwrap();
        assert_eq!(response.header("Content-Type"), Some("text/html"));
    }

    #[test]
    fn test_rejects_parent_components() {
        let dir = ui_folder();
        let handler = DirectoryHandler::new(dir.path().join("lib"));

        assert!(handler.serve("../index.html").is_none());
        assert!(handler.serve("missing.css").is_none());
    }
}

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects the Rust source files that hold model definitions.
///
/// Each root may be a single `.rs` file or a directory walked recursively.
/// `target` and hidden directories are skipped.
///
/// # Example
///
/// ```no_run
/// use swagger_decl::scanner::ModelSourceScanner;
/// use std::path::PathBuf;
///
/// let scan = ModelSourceScanner::new(vec![PathBuf::from("./src/models")]).scan();
/// println!("Found {} model sources", scan.sources.len());
/// ```
pub struct ModelSourceScanner {
    roots: Vec<PathBuf>,
}

/// Result of a model source scan
#[derive(Debug, Default)]
pub struct SourceScan {
    /// Discovered `.rs` files, sorted per root
    pub sources: Vec<PathBuf>,
    /// Problems that did not stop the scan
    pub warnings: Vec<String>,
}

impl ModelSourceScanner {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn scan(&self) -> SourceScan {
        let mut scan = SourceScan::default();
        for root in &self.roots {
            if root.is_file() {
                if is_rust_source(root) {
                    scan.sources.push(root.clone());
                } else {
                    scan.warnings.push(format!("Not a Rust source file: {}", root.display()));
                }
                continue;
            }
            if !root.is_dir() {
                warn!("Model path does not exist: {}", root.display());
                scan.warnings.push(format!("Model path does not exist: {}", root.display()));
                continue;
            }
            self.scan_dir(root, &mut scan);
        }
        debug!("Found {} model sources", scan.sources.len());
        scan
    }

    fn scan_dir(&self, root: &Path, scan: &mut SourceScan) {
        let mut found = Vec::new();
        let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
            if e.path() == root {
                return true;
            }
            let file_name = e.file_name().to_string_lossy();
            !file_name.starts_with('.') && file_name != "target"
        });

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_rust_source(entry.path()) => {
                    debug!("Found model source: {}", entry.path().display());
                    found.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    let message = format!("Cannot access {}: {}", root.display(), e);
                    warn!("{}", message);
                    scan.warnings.push(message);
                }
            }
        }

        found.sort();
        scan.sources.extend(found);
    }
}

fn is_rust_source(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("rs")
}

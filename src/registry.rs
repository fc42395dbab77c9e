use crate::config::Config;
use crate::declaration::{ApiDeclaration, ApiRef, ResourceListing, SWAGGER_VERSION};
use crate::declaration_builder::DeclarationBuilder;
use crate::descriptor::ServiceDescriptor;
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use std::panic::{self, AssertUnwindSafe};

/// Number of path segments a declaration key can be reconstructed from
pub const MAX_PATH_SEGMENTS: usize = 7;

/// Declarations of every documented service, keyed by declaration path.
///
/// Built once from all services and never mutated afterwards, so it can be
/// shared between readers behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct DeclarationRegistry {
    declarations: IndexMap<String, ApiDeclaration>,
}

impl DeclarationRegistry {
    /// Build the declarations of every service except the documentation
    /// service itself (the one rooted at `config.api_path`).
    ///
    /// A service whose description panics is logged and left out; the others
    /// are still registered.
    pub fn build(config: &Config, services: &[ServiceDescriptor]) -> Self {
        info!("Building API declarations for {} services", services.len());
        let mut declarations = IndexMap::new();

        for service in services {
            if service.root_path == config.api_path {
                debug!("Skipping documentation service at {}", service.root_path);
                continue;
            }

            let built = panic::catch_unwind(AssertUnwindSafe(|| {
                DeclarationBuilder::new(config, service).api_declarations()
            }));
            let pairs = match built {
                Ok(pairs) => pairs,
                Err(_) => {
                    error!(
                        "Failed to describe service {:?}; it is left out of the documentation",
                        service.root_path
                    );
                    continue;
                }
            };

            for (key, declaration) in pairs {
                if declarations.contains_key(&key) {
                    warn!("Declaration {} registered twice; keeping the last one", key);
                }
                declarations.insert(key, declaration);
            }
        }

        info!("Registered {} API declarations", declarations.len());
        Self { declarations }
    }

    /// Declaration registered under `key`
    pub fn get(&self, key: &str) -> Option<&ApiDeclaration> {
        self.declarations.get(key)
    }

    /// Declaration for a key rebuilt from individually captured path segments
    pub fn lookup_segments<S: AsRef<str>>(&self, segments: &[S]) -> Option<&ApiDeclaration> {
        self.get(&compose_root_path(segments))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.declarations.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiDeclaration)> {
        self.declarations.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Listing with one entry per declaration, in registration order
    pub fn listing(&self) -> ResourceListing {
        let apis = self
            .declarations
            .iter()
            .map(|(key, declaration)| ApiRef {
                path: key.clone(),
                // Description of the first api, which may still be empty
                description: declaration
                    .apis
                    .first()
                    .map(|api| api.description.clone())
                    .unwrap_or_default(),
            })
            .collect();
        ResourceListing {
            swagger_version: SWAGGER_VERSION.to_string(),
            apis,
        }
    }
}

/// Join up to [`MAX_PATH_SEGMENTS`] segments into a declaration key,
/// stopping at the first empty one.
pub fn compose_root_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::from("/");
    let present = segments
        .iter()
        .take(MAX_PATH_SEGMENTS)
        .map(|segment| segment.as_ref())
        .take_while(|segment| !segment.is_empty());
    for (i, segment) in present.enumerate() {
        if i > 0 {
            path.push('/');
        }
        path.push_str(segment);
    }
    path
}

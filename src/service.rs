//! The documentation endpoint, independent of any HTTP server.
//!
//! [`SwaggerService`] answers GET requests below the configured `api_path`:
//! the root returns the [`ResourceListing`], and `<api_path>/a/b/...` (up to
//! seven segments) returns the declaration registered under `/a/b/...`. An
//! HTTP layer only has to forward the request path and `Origin` header and
//! write back the [`DocResponse`].

use crate::config::Config;
use crate::declaration::{ApiDeclaration, ResourceListing};
use crate::descriptor::ServiceDescriptor;
use crate::registry::{DeclarationRegistry, MAX_PATH_SEGMENTS};
use crate::static_files::{DirectoryHandler, StaticHandler};
use log::{debug, error, info};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const MIME_JSON: &str = "application/json";

/// Response to a documentation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl DocResponse {
    pub fn new(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![(HEADER_CONTENT_TYPE.to_string(), content_type.to_string())],
            body,
        }
    }

    /// Pretty-printed JSON response
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec_pretty(value) {
            Ok(body) => Self::new(status, MIME_JSON, body),
            Err(e) => {
                error!("Failed to serialize documentation response: {}", e);
                Self::new(500, MIME_JSON, b"{}".to_vec())
            }
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// First value of a header, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn add_header_if_absent(&mut self, name: &str, value: &str) {
        if self.header(name).is_none() {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }
}

/// Where the documentation UI is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMount {
    Directory { mount_path: String, folder: PathBuf },
    Custom { mount_path: String },
    Disabled,
}

/// Serves the listing and declarations of a built registry
pub struct SwaggerService {
    config: Config,
    registry: Arc<DeclarationRegistry>,
    ui: Option<(String, Box<dyn StaticHandler>)>,
    ui_mount: UiMount,
}

impl SwaggerService {
    /// Serve an already built registry, with the UI taken from the configured folder
    pub fn new(config: Config, registry: Arc<DeclarationRegistry>) -> Self {
        Self::with_ui_handler(config, registry, None)
    }

    /// Serve an already built registry.
    ///
    /// A `ui_handler` serves the UI instead of the configured folder; it is
    /// only used when a swagger path is configured.
    pub fn with_ui_handler(
        config: Config,
        registry: Arc<DeclarationRegistry>,
        ui_handler: Option<Box<dyn StaticHandler>>,
    ) -> Self {
        info!("Listing is available at {}", config.listing_url());
        let (ui, ui_mount) = mount_ui(&config, ui_handler);
        Self {
            config,
            registry,
            ui,
            ui_mount,
        }
    }

    /// Build the registry from `services` and serve it
    pub fn install(config: Config, services: &[ServiceDescriptor]) -> Self {
        Self::install_with_ui_handler(config, services, None)
    }

    /// Build the registry from `services` and serve it, with the UI served by `ui_handler`
    pub fn install_with_ui_handler(
        config: Config,
        services: &[ServiceDescriptor],
        ui_handler: Option<Box<dyn StaticHandler>>,
    ) -> Self {
        let registry = Arc::new(DeclarationRegistry::build(&config, services));
        Self::with_ui_handler(config, registry, ui_handler)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<DeclarationRegistry> {
        &self.registry
    }

    pub fn ui_mount(&self) -> &UiMount {
        &self.ui_mount
    }

    pub fn listing(&self) -> ResourceListing {
        self.registry.listing()
    }

    /// Declaration for path segments captured below the api path
    pub fn declaration<S: AsRef<str>>(&self, segments: &[S]) -> Option<&ApiDeclaration> {
        self.registry.lookup_segments(segments)
    }

    /// Answer a GET request for `request_path`.
    ///
    /// `origin` is the request's `Origin` header; it is echoed back as
    /// `Access-Control-Allow-Origin` unless CORS is disabled.
    pub fn handle_get(&self, request_path: &str, origin: Option<&str>) -> DocResponse {
        let path = request_path.split('?').next().unwrap_or_default();
        debug!("GET {}", path);

        if let Some(rest) = strip_mount(path, &self.config.api_path) {
            let mut response = self.serve_docs(rest);
            if !self.config.disable_cors {
                if let Some(origin) = origin.filter(|o| !o.is_empty()) {
                    response.add_header_if_absent(HEADER_ACCESS_CONTROL_ALLOW_ORIGIN, origin);
                }
            }
            return response;
        }

        if let Some((mount_path, handler)) = &self.ui {
            let bare_mount = mount_path.trim_end_matches('/');
            if let Some(rest) = strip_mount(path, bare_mount) {
                return handler.serve(rest).unwrap_or_else(DocResponse::not_found);
            }
        }

        DocResponse::not_found()
    }

    fn serve_docs(&self, rest: &str) -> DocResponse {
        let rest = rest.trim_start_matches('/');
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        if rest.is_empty() {
            return DocResponse::json(200, &self.listing());
        }

        let segments: Vec<&str> = rest.split('/').collect();
        if segments.len() > MAX_PATH_SEGMENTS {
            debug!("Too many path segments: {}", rest);
            return DocResponse::not_found();
        }

        match self.registry.lookup_segments(&segments) {
            Some(declaration) => DocResponse::json(200, declaration),
            None => {
                debug!("No declaration for /{}", rest);
                DocResponse::json(404, &ApiDeclaration::default())
            }
        }
    }
}

type MountedUi = (Option<(String, Box<dyn StaticHandler>)>, UiMount);

fn mount_ui(config: &Config, custom_handler: Option<Box<dyn StaticHandler>>) -> MountedUi {
    let Some(mount_path) = config.normalized_swagger_path() else {
        info!("Swagger path is empty; no UI is served");
        return (None, UiMount::Disabled);
    };

    if let Some(handler) = custom_handler {
        info!("{}{} is mapped to {}", config.web_services_url, mount_path, handler.name());
        let mount = UiMount::Custom {
            mount_path: mount_path.clone(),
        };
        return (Some((mount_path, handler)), mount);
    }

    match config.swagger_file_path.clone() {
        Some(folder) => {
            let handler: Box<dyn StaticHandler> = Box::new(DirectoryHandler::new(folder.clone()));
            info!("{}{} is mapped to {}", config.web_services_url, mount_path, handler.name());
            let mount = UiMount::Directory {
                mount_path: mount_path.clone(),
                folder,
            };
            (Some((mount_path, handler)), mount)
        }
        None => {
            info!("Swagger folder is empty; no UI is served");
            (None, UiMount::Disabled)
        }
    }
}

/// Part of `path` after `mount`, if `path` is `mount` or lies below it
fn strip_mount<'p>(path: &'p str, mount: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(mount)?;
    if rest.is_empty() || rest.starts_with('/') || mount.ends_with('/') {
        Some(rest)
    } else {
        None
    }
}

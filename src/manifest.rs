//! Service manifests - services described in YAML or JSON.
//!
//! A manifest lists the services to document together with an optional
//! [`Config`]. Read and write samples are Rust type expressions that are
//! resolved through a [`TypeResolver`]. A service that cannot be converted
//! (unknown method, malformed type expression) is reported and skipped
//! without affecting the other services.

use crate::config::Config;
use crate::descriptor::{
    HttpMethod, ParameterDescriptor, ParameterKind, RouteDescriptor, ServiceDescriptor,
};
use crate::error::{Error, Result};
use crate::type_resolver::TypeResolver;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level manifest document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub config: Option<Config>,
    #[serde(default)]
    pub services: Vec<ServiceManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceManifest {
    #[serde(default)]
    pub root_path: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub parameters: Vec<ParameterManifest>,
    #[serde(default)]
    pub routes: Vec<RouteManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteManifest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub produces: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterManifest>,
    /// Type expression of the request body
    #[serde(default)]
    pub reads: Option<String>,
    /// Type expression of the response body
    #[serde(default)]
    pub writes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// path, query, body, header or form
    pub kind: String,
    #[serde(alias = "type")]
    pub data_type: String,
    #[serde(default)]
    pub required: bool,
}

/// Services converted from a manifest
#[derive(Debug, Default)]
pub struct LoadedServices {
    pub services: Vec<ServiceDescriptor>,
    /// One message per skipped service
    pub warnings: Vec<String>,
}

impl Manifest {
    /// Load a manifest from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> Result<Manifest> {
        debug!("Loading manifest: {}", path.display());
        let content = fs::read_to_string(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed = match extension {
            "json" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            other => {
                return Err(Error::InvalidManifest {
                    context: path.display().to_string(),
                    message: format!("unsupported manifest extension {:?}", other),
                })
            }
        };
        parsed.map_err(|e| Error::InvalidManifest {
            context: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml(content: &str) -> Result<Manifest> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Manifest> {
        Ok(serde_json::from_str(content)?)
    }

    /// Convert every service, skipping those that fail
    pub fn into_services(self, resolver: &TypeResolver) -> LoadedServices {
        let mut loaded = LoadedServices::default();
        for service in self.services {
            let root_path = service.root_path.clone();
            match service.into_descriptor(resolver) {
                Ok(descriptor) => loaded.services.push(descriptor),
                Err(e) => {
                    warn!("Skipping service {:?}: {}", root_path, e);
                    loaded.warnings.push(format!("Skipped service {:?}: {}", root_path, e));
                }
            }
        }
        loaded
    }
}

impl ServiceManifest {
    pub fn into_descriptor(self, resolver: &TypeResolver) -> Result<ServiceDescriptor> {
        let mut descriptor = ServiceDescriptor::new(self.root_path).doc(self.doc);
        descriptor.parameters = self
            .parameters
            .into_iter()
            .map(ParameterManifest::into_descriptor)
            .collect();
        for route in self.routes {
            descriptor.routes.push(route.into_descriptor(resolver)?);
        }
        Ok(descriptor)
    }
}

impl RouteManifest {
    pub fn into_descriptor(self, resolver: &TypeResolver) -> Result<RouteDescriptor> {
        let method = HttpMethod::parse(&self.method)?;
        let mut route = RouteDescriptor::new(method, self.path)
            .doc(self.doc)
            .operation(self.operation)
            .consumes(self.consumes)
            .produces(self.produces);
        route.parameters = self
            .parameters
            .into_iter()
            .map(ParameterManifest::into_descriptor)
            .collect();

        if let Some(expression) = self.reads.as_deref() {
            route = route.reads_shape(resolver.resolve(expression)?);
        }
        if let Some(expression) = self.writes.as_deref() {
            route = route.writes_shape(resolver.resolve(expression)?);
        }
        Ok(route)
    }
}

impl ParameterManifest {
    pub fn into_descriptor(self) -> ParameterDescriptor {
        let kind = ParameterKind::from_tag(&self.kind);
        if kind == ParameterKind::Unrecognized {
            warn!("Parameter {} has unrecognized kind {:?}", self.name, self.kind);
        }
        ParameterDescriptor::new(self.name, kind, self.data_type)
            .description(self.description)
            .required(self.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::TypeShape;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
config:
  web_services_url: http://localhost:8080
services:
  - root_path: /books
    doc: Manage books
    parameters:
      - { name: tenant, kind: header, data_type: string, required: true }
    routes:
      - method: get
        path: /books/{id}
        operation: findBook
        parameters:
          - { name: id, kind: path, type: string, required: true }
        writes: Option<Book>
      - method: POST
        path: /books
        reads: Book
  - root_path: /broken
    routes:
      - method: FETCH
        path: /broken
  - root_path: /typos
    routes:
      - method: GET
        path: /typos
        writes: "Vec<"
"#;

    fn resolver() -> TypeResolver {
        TypeResolver::from_source("book.rs", "pub struct Book { pub title: String }").unwrap()
    }

    #[test]
    fn test_yaml_manifest_to_services() {
        let manifest = Manifest::from_yaml(MANIFEST).unwrap();
        assert_eq!(
            manifest.config.as_ref().map(|c| c.web_services_url.as_str()),
            Some("http://localhost:8080")
        );

        let loaded = manifest.into_services(&resolver());

        assert_eq!(loaded.services.len(), 1);
        assert_eq!(loaded.warnings.len(), 2);
        assert!(loaded.warnings[0].contains("/broken"));
        assert!(loaded.warnings[1].contains("/typos"));

        let service = &loaded.services[0];
        assert_eq!(service.root_path, "/books");
        assert_eq!(service.parameters[0].kind, ParameterKind::Header);
        assert!(service.parameters[0].required);

        let find = &service.routes[0];
        assert_eq!(find.method, HttpMethod::Get);
        assert_eq!(find.parameters[0].data_type, "string");
        assert!(matches!(find.write_sample, Some(TypeShape::Optional(_))));
        assert!(service.routes[1].read_sample.is_some());
        assert!(service.routes[1].write_sample.is_none());
    }

    #[test]
    fn test_json_manifest() {
        let json = r#"{"services": [
            {"root_path": "/ping", "routes": [{"method": "GET", "path": "/ping"}]}
        ]}"#;
        let loaded = Manifest::from_json(json).unwrap().into_services(&resolver());

        assert_eq!(loaded.services.len(), 1);
        assert_eq!(loaded.services[0].routes[0].path, "/ping");
    }

    #[test]
    fn test_unrecognized_parameter_kind_is_lenient() {
        let parameter = ParameterManifest {
            name: "session".to_string(),
            kind: "cookie".to_string(),
            data_type: "string".to_string(),
            ..ParameterManifest::default()
        };
        assert_eq!(parameter.into_descriptor().kind, ParameterKind::Unrecognized);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("services.toml");
        fs::write(&path, "").unwrap();

        assert!(matches!(
            Manifest::load(&path),
            Err(Error::InvalidManifest { .. })
        ));
    }

    #[test]
    fn test_load_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("services.yaml");
        fs::write(&path, MANIFEST).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.services.len(), 3);
    }
}

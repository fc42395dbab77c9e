//! Descriptors of the services whose API declarations are built.
//!
//! These are handed over by the routing layer: a [`ServiceDescriptor`] owns its
//! root parameters and an ordered list of [`RouteDescriptor`]s. Read and write
//! samples are captured as [`TypeShape`]s, either from a [`Describe`] type or
//! from a resolved type expression.
//!
//! # Example
//!
//! ```
//! use swagger_decl::descriptor::{ParameterDescriptor, RouteDescriptor, ServiceDescriptor};
//!
//! let service = ServiceDescriptor::new("/books")
//!     .doc("Manage books")
//!     .param(ParameterDescriptor::header("tenant", "string").required(true))
//!     .route(
//!         RouteDescriptor::get("/books/{id}")
//!             .doc("Find a book")
//!             .operation("findBook")
//!             .param(ParameterDescriptor::path("id", "string").required(true))
//!             .writes::<Vec<String>>(),
//!     );
//! assert_eq!(service.routes.len(), 1);
//! ```

use crate::error::{Error, Result};
use crate::shape::{Describe, TypeShape};
use std::fmt;

/// HTTP methods a route can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Parse a method name, ignoring case
    pub fn parse(name: &str) -> Result<HttpMethod> {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "OPTIONS" => Ok(HttpMethod::Options),
            "HEAD" => Ok(HttpMethod::Head),
            _ => Err(Error::UnknownMethod(name.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter value is taken from in a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Path,
    Query,
    Body,
    Header,
    Form,
    /// A kind the declaration format has no tag for
    Unrecognized,
}

impl ParameterKind {
    /// Tag used for `paramType`; unrecognized kinds map to an empty tag
    pub fn tag(&self) -> &'static str {
        match self {
            ParameterKind::Path => "path",
            ParameterKind::Query => "query",
            ParameterKind::Body => "body",
            ParameterKind::Header => "header",
            ParameterKind::Form => "form",
            ParameterKind::Unrecognized => "",
        }
    }

    /// Inverse of [`ParameterKind::tag`], lenient about unknown tags
    pub fn from_tag(tag: &str) -> ParameterKind {
        match tag.to_ascii_lowercase().as_str() {
            "path" => ParameterKind::Path,
            "query" => ParameterKind::Query,
            "body" => ParameterKind::Body,
            "header" => ParameterKind::Header,
            "form" => ParameterKind::Form,
            _ => ParameterKind::Unrecognized,
        }
    }
}

/// Documentation of one request parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub description: String,
    pub kind: ParameterKind,
    /// Declared data type name (e.g., "string", "i64", "Book")
    pub data_type: String,
    pub required: bool,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, kind: ParameterKind, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            data_type: data_type.into(),
            required: false,
        }
    }

    pub fn path(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Path, data_type)
    }

    pub fn query(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Query, data_type)
    }

    pub fn body(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Body, data_type)
    }

    pub fn header(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Header, data_type)
    }

    pub fn form(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Form, data_type)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// One method + path combination exposed by a service
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub method: HttpMethod,
    /// Path pattern, possibly with `{name}` placeholders
    pub path: String,
    pub doc: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    /// Operation identifier, used as the nickname
    pub operation: String,
    pub parameters: Vec<ParameterDescriptor>,
    /// Shape of the request body
    pub read_sample: Option<TypeShape>,
    /// Shape of the response body
    pub write_sample: Option<TypeShape>,
}

impl RouteDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            doc: String::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            operation: String::new(),
            parameters: Vec::new(),
            read_sample: None,
            write_sample: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    pub fn consumes<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = media_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn produces<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces = media_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Use `T` as the request body shape
    pub fn reads<T: Describe + ?Sized>(self) -> Self {
        self.reads_shape(T::shape())
    }

    pub fn reads_shape(mut self, shape: TypeShape) -> Self {
        self.read_sample = Some(shape);
        self
    }

    /// Use `T` as the response body shape
    pub fn writes<T: Describe + ?Sized>(self) -> Self {
        self.writes_shape(T::shape())
    }

    pub fn writes_shape(mut self, shape: TypeShape) -> Self {
        self.write_sample = Some(shape);
        self
    }
}

/// A collection of routes sharing a root path and root parameters
#[derive(Debug, Clone, Default)]
pub struct ServiceDescriptor {
    /// Root path; empty or "/" means the routes decide
    pub root_path: String,
    pub documentation: String,
    pub routes: Vec<RouteDescriptor>,
    /// Parameters shared by every route of the service
    pub parameters: Vec<ParameterDescriptor>,
}

impl ServiceDescriptor {
    pub fn new(root_path: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            ..Self::default()
        }
    }

    pub fn doc(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn route(mut self, route: RouteDescriptor) -> Self {
        self.routes.push(route);
        self
    }

    /// Whether the service has a fixed root path of its own
    pub fn has_fixed_root(&self) -> bool {
        !self.root_path.is_empty() && self.root_path != "/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_method() {
        assert_eq!(HttpMethod::parse("get").unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("DELETE").unwrap(), HttpMethod::Delete);
        assert!(matches!(
            HttpMethod::parse("BREW"),
            Err(Error::UnknownMethod(name)) if name == "BREW"
        ));
    }

    #[test]
    fn test_parameter_kind_tags() {
        for kind in [
            ParameterKind::Path,
            ParameterKind::Query,
            ParameterKind::Body,
            ParameterKind::Header,
            ParameterKind::Form,
        ] {
            assert_eq!(ParameterKind::from_tag(kind.tag()), kind);
        }
        assert_eq!(ParameterKind::from_tag("cookie"), ParameterKind::Unrecognized);
        assert_eq!(ParameterKind::Unrecognized.tag(), "");
    }

    #[test]
    fn test_fixed_root() {
        assert!(ServiceDescriptor::new("/books").has_fixed_root());
        assert!(!ServiceDescriptor::new("/").has_fixed_root());
        assert!(!ServiceDescriptor::new("").has_fixed_root());
    }

    #[test]
    fn test_route_builder_keeps_parameter_order() {
        let route = RouteDescriptor::post("/books")
            .consumes(["application/json"])
            .param(ParameterDescriptor::body("book", "Book"))
            .param(ParameterDescriptor::query("dry_run", "bool"))
            .reads::<String>();

        let names: Vec<_> = route.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["book", "dry_run"]);
        assert_eq!(route.consumes, vec!["application/json".to_string()]);
        assert!(route.read_sample.is_some());
        assert!(route.write_sample.is_none());
    }
}

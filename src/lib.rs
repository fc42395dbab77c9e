//! Swagger Declaration Generator - Swagger 1.2 documentation for described web services.
//!
//! Services are handed over as [`descriptor::ServiceDescriptor`]s whose request
//! and response bodies carry a [`shape::TypeShape`]. From those the library builds
//! one API declaration per service root (or per static path prefix for services
//! without a root), registers them under their declaration paths, and serves the
//! resource listing and declarations as JSON.
//!
//! # Architecture
//!
//! 1. [`shape`] - Structural description of sample types ([`shape::Describe`])
//! 2. [`model_builder`] - Turns shapes into named models, cycle safe
//! 3. [`declaration_builder`] - Builds the declarations of one service
//! 4. [`registry`] - Declarations of all services, immutable after build
//! 5. [`service`] - Answers documentation requests and mounts the UI
//! 6. [`manifest`], [`scanner`], [`type_resolver`] - Services described in YAML or JSON,
//!    with sample types resolved from Rust model sources
//! 7. [`serializer`] - Writes the documents as YAML or JSON
//!
//! # Example Usage
//!
//! ```
//! use swagger_decl::config::Config;
//! use swagger_decl::descriptor::{ParameterDescriptor, RouteDescriptor, ServiceDescriptor};
//! use swagger_decl::service::SwaggerService;
//! use swagger_decl::shape::{Describe, TypeShape};
//!
//! struct Book;
//!
//! impl Describe for Book {
//!     fn shape() -> TypeShape {
//!         TypeShape::record_named::<Book>("Book")
//!             .field::<String>("title")
//!             .field::<Option<u32>>("year")
//!             .build()
//!     }
//! }
//!
//! let books = ServiceDescriptor::new("/books").route(
//!     RouteDescriptor::get("/books/{id}")
//!         .param(ParameterDescriptor::path("id", "string").required(true))
//!         .writes::<Book>(),
//! );
//!
//! let service = SwaggerService::install(Config::new("http://localhost:8080"), &[books]);
//! let response = service.handle_get("/apidocs.json/books", None);
//! assert_eq!(response.status, 200);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod declaration;
pub mod declaration_builder;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod model_builder;
pub mod registry;
pub mod scanner;
pub mod serializer;
pub mod service;
pub mod shape;
pub mod static_files;
pub mod type_resolver;

//! Type shapes for types defined in Rust source files.
//!
//! The command-line tool has no access to the documented program's types at
//! runtime. Instead the model structs are read from source with `syn`, and the
//! `reads` / `writes` type expressions of a manifest (`Book`, `Vec<Book>`,
//! `Option<Vec<Book>>`) are resolved against them.

use crate::error::{Error, Result};
use crate::shape::{PrimitiveType, RecordBuilder, TypeShape};
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Type information extracted from a `syn::Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// The base type name (e.g., "String", "User", "i32")
    pub name: String,
    /// Generic type arguments (e.g., for `Vec<String>`, contains TypeInfo for String)
    pub generic_args: Vec<TypeInfo>,
    /// Whether this type is wrapped in `Option<T>`
    pub is_option: bool,
    /// Whether this type is a sequence (`Vec<T>`, `[T]`, `[T; N]`)
    pub is_vec: bool,
}

impl TypeInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            generic_args: Vec::new(),
            is_option: false,
            is_vec: false,
        }
    }

    pub fn option(inner: TypeInfo) -> Self {
        Self {
            name: inner.name.clone(),
            generic_args: vec![inner],
            is_option: true,
            is_vec: false,
        }
    }

    pub fn vec(inner: TypeInfo) -> Self {
        Self {
            name: inner.name.clone(),
            generic_args: vec![inner],
            is_option: false,
            is_vec: true,
        }
    }
}

/// A type definition found in source
#[derive(Debug, Clone)]
enum Definition {
    Struct {
        model_name: String,
        identity: String,
        /// Names of the struct's type parameters, in declaration order
        generics: Vec<String>,
        fields: Vec<FieldDef>,
    },
    /// Unit-like enums are documented as strings
    Enum,
}

#[derive(Debug, Clone)]
struct FieldDef {
    name: String,
    type_info: TypeInfo,
}

/// Type resolver - turns type expressions into shapes using source definitions.
///
/// Cloning is cheap; record field shapes of resolved types keep a handle to
/// the definitions and materialize lazily.
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    definitions: Arc<HashMap<String, Definition>>,
}

impl TypeResolver {
    /// Parse every file, skipping the ones that fail.
    ///
    /// Returns the resolver together with a warning per skipped file.
    pub fn from_files(paths: &[PathBuf]) -> (Self, Vec<String>) {
        debug!("Initializing TypeResolver with {} files", paths.len());
        let mut definitions = HashMap::new();
        let mut warnings = Vec::new();

        for path in paths {
            let parsed = fs::read_to_string(path)
                .map_err(Error::from)
                .and_then(|content| parse_source(path, &content));
            match parsed {
                Ok(file) => collect_definitions(path, &file, &mut definitions),
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    warnings.push(format!("Skipped {}: {}", path.display(), e));
                }
            }
        }

        debug!("Collected {} type definitions", definitions.len());
        (
            Self {
                definitions: Arc::new(definitions),
            },
            warnings,
        )
    }

    /// Resolver over a single in-memory source
    pub fn from_source(path: impl AsRef<Path>, content: &str) -> Result<Self> {
        let path = path.as_ref();
        let file = parse_source(path, content)?;
        let mut definitions = HashMap::new();
        collect_definitions(path, &file, &mut definitions);
        Ok(Self {
            definitions: Arc::new(definitions),
        })
    }

    /// Whether a struct or enum with this name was found
    pub fn is_defined(&self, type_name: &str) -> bool {
        self.definitions.contains_key(type_name)
    }

    /// Resolve a type expression such as `Option<Vec<Book>>`
    pub fn resolve(&self, expression: &str) -> Result<TypeShape> {
        let info = parse_type_expression(expression)?;
        Ok(self.shape_of(&info))
    }

    /// Shape of extracted type information
    pub fn shape_of(&self, info: &TypeInfo) -> TypeShape {
        if info.is_vec || info.is_option {
            let inner = info
                .generic_args
                .first()
                .map(|arg| self.shape_of(arg))
                .unwrap_or_else(|| TypeShape::Primitive(PrimitiveType::Opaque(info.name.clone())));
            return if info.is_vec {
                TypeShape::Sequence(Box::new(inner))
            } else {
                TypeShape::Optional(Box::new(inner))
            };
        }

        if let Some(primitive) = PrimitiveType::parse(&info.name) {
            return TypeShape::Primitive(primitive);
        }

        match self.definitions.get(&info.name) {
            Some(Definition::Struct {
                model_name,
                identity,
                generics,
                fields,
            }) => {
                let bindings: HashMap<&str, &TypeInfo> = generics
                    .iter()
                    .map(String::as_str)
                    .zip(info.generic_args.iter())
                    .collect();
                let (model_name, identity) = if info.generic_args.is_empty() {
                    (model_name.clone(), identity.clone())
                } else {
                    let args = info
                        .generic_args
                        .iter()
                        .map(type_text)
                        .collect::<Vec<_>>()
                        .join(", ");
                    (
                        format!("{}<{}>", model_name, args),
                        format!("{}<{}>", identity, args),
                    )
                };

                let mut record = RecordBuilder::new(model_name, identity);
                for field in fields {
                    let resolver = self.clone();
                    let field_type = substitute(&field.type_info, &bindings);
                    record = record.field_with(&field.name, move || resolver.shape_of(&field_type));
                }
                record.build()
            }
            Some(Definition::Enum) => TypeShape::Primitive(PrimitiveType::String),
            None => {
                debug!("Unknown type {}, documented by name", info.name);
                TypeShape::Primitive(PrimitiveType::Opaque(info.name.clone()))
            }
        }
    }
}

/// Replace type parameters bound to arguments of the enclosing type
fn substitute(info: &TypeInfo, bindings: &HashMap<&str, &TypeInfo>) -> TypeInfo {
    if !info.is_option && !info.is_vec && info.generic_args.is_empty() {
        if let Some(bound) = bindings.get(info.name.as_str()) {
            return (*bound).clone();
        }
    }
    let generic_args: Vec<TypeInfo> = info
        .generic_args
        .iter()
        .map(|arg| substitute(arg, bindings))
        .collect();
    // Option and Vec carry the name of their element
    let name = match generic_args.first() {
        Some(inner) if info.is_option || info.is_vec => inner.name.clone(),
        _ => info.name.clone(),
    };
    TypeInfo {
        name,
        generic_args,
        is_option: info.is_option,
        is_vec: info.is_vec,
    }
}

/// Type written the way a short Rust type name reads, e.g. `Vec<Book>`
fn type_text(info: &TypeInfo) -> String {
    let wrapper = if info.is_option {
        Some("Option")
    } else if info.is_vec {
        Some("Vec")
    } else {
        None
    };
    let base = wrapper.unwrap_or(info.name.as_str());
    if info.generic_args.is_empty() {
        base.to_string()
    } else {
        let args: Vec<String> = info.generic_args.iter().map(type_text).collect();
        format!("{}<{}>", base, args.join(", "))
    }
}

fn parse_source(path: &Path, content: &str) -> Result<syn::File> {
    syn::parse_file(content).map_err(|e| Error::ParseError {
        file: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse a Rust type expression into type information
pub fn parse_type_expression(expression: &str) -> Result<TypeInfo> {
    let ty: syn::Type = syn::parse_str(expression).map_err(|e| Error::InvalidTypeExpression {
        expression: expression.to_string(),
        message: e.to_string(),
    })?;
    Ok(extract_type_info(&ty))
}

fn collect_definitions(
    path: &Path,
    file: &syn::File,
    definitions: &mut HashMap<String, Definition>,
) {
    let mut items: VecDeque<&syn::Item> = file.items.iter().collect();
    // Inline modules are searched as well
    while let Some(item) = items.pop_front() {
        let (name, definition) = match item {
            syn::Item::Struct(item_struct) => {
                let name = item_struct.ident.to_string();
                let model_name = serde_attributes(&item_struct.attrs)
                    .rename
                    .unwrap_or_else(|| name.clone());
                let definition = Definition::Struct {
                    model_name,
                    identity: format!("{}::{}", path.display(), name),
                    generics: item_struct
                        .generics
                        .type_params()
                        .map(|param| param.ident.to_string())
                        .collect(),
                    fields: struct_fields(item_struct),
                };
                (name, definition)
            }
            syn::Item::Enum(item_enum) => (item_enum.ident.to_string(), Definition::Enum),
            syn::Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    items.extend(nested.iter());
                }
                continue;
            }
            _ => continue,
        };

        if definitions.contains_key(&name) {
            warn!("Type {} defined more than once; keeping the first definition", name);
            continue;
        }
        debug!("Found type {} in {}", name, path.display());
        definitions.insert(name, definition);
    }
}

fn struct_fields(item_struct: &syn::ItemStruct) -> Vec<FieldDef> {
    let mut fields = Vec::new();
    if let syn::Fields::Named(named_fields) = &item_struct.fields {
        for field in &named_fields.named {
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            let attrs = serde_attributes(&field.attrs);
            if attrs.skip {
                continue;
            }
            fields.push(FieldDef {
                name: attrs.rename.unwrap_or_else(|| ident.to_string()),
                type_info: extract_type_info(&field.ty),
            });
        }
    }
    fields
}

/// Serde attributes that change the documented shape
#[derive(Debug, Default)]
struct SerdeAttributes {
    rename: Option<String>,
    skip: bool,
}

fn serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
    let mut serde_attrs = SerdeAttributes::default();
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                serde_attrs.rename = Some(value.value());
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                serde_attrs.skip = true;
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
        if let Err(e) = parsed {
            debug!("Ignoring unsupported serde attribute: {}", e);
        }
    }
    serde_attrs
}

fn extract_type_info(ty: &syn::Type) -> TypeInfo {
    match ty {
        syn::Type::Path(type_path) => extract_type_info_from_path(&type_path.path),
        syn::Type::Reference(reference) => extract_type_info(&reference.elem),
        syn::Type::Paren(paren) => extract_type_info(&paren.elem),
        syn::Type::Slice(slice) => TypeInfo::vec(extract_type_info(&slice.elem)),
        syn::Type::Array(array) => TypeInfo::vec(extract_type_info(&array.elem)),
        _ => TypeInfo::new("Unknown".to_string()),
    }
}

fn extract_type_info_from_path(path: &syn::Path) -> TypeInfo {
    let Some(segment) = path.segments.last() else {
        return TypeInfo::new("Unknown".to_string());
    };
    let type_name = segment.ident.to_string();

    let mut generic_args = Vec::new();
    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            if let syn::GenericArgument::Type(inner_ty) = arg {
                generic_args.push(extract_type_info(inner_ty));
            }
        }
    }

    match (type_name.as_str(), generic_args.len()) {
        ("Option", 1) => TypeInfo::option(generic_args.remove(0)),
        ("Vec" | "VecDeque" | "HashSet" | "BTreeSet", 1) => TypeInfo::vec(generic_args.remove(0)),
        // Smart pointers document their target
        ("Box" | "Rc" | "Arc", 1) => generic_args.remove(0),
        _ => TypeInfo {
            name: type_name,
            generic_args,
            is_option: false,
            is_vec: false,
        },
    }
}

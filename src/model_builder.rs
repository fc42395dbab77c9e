use crate::shape::{PrimitiveType, RecordShape, TypeShape};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Models of a declaration, keyed by model name in registration order
pub type Models = IndexMap<String, Model>;

/// A named object schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Model name, same as its key in [`Models`]
    pub id: String,
    /// Names of the properties that are not optional
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Properties in field declaration order
    #[serde(default)]
    pub properties: IndexMap<String, ModelProperty>,
    /// Identity of the type this model was registered from
    #[serde(skip)]
    pub(crate) origin: String,
}

/// Type of a model property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelProperty {
    /// Primitive type name, or "array"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Format for primitive types (e.g., "int32", "double")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Name of the referenced model
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Element type for array properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ModelProperty>>,
}

/// Outcome of resolving a read or write sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSample {
    /// Model (or primitive) name of the element type
    pub model_name: String,
    /// Whether the sample is a collection of that element type
    pub is_collection: bool,
}

impl ResolvedSample {
    /// The operation response type this sample corresponds to
    pub fn response_type(&self) -> String {
        if self.is_collection {
            format!("array[{}]", self.model_name)
        } else {
            self.model_name.clone()
        }
    }
}

/// Model builder - registers the models reachable from a type shape
pub struct ModelBuilder<'a> {
    models: &'a mut Models,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(models: &'a mut Models) -> Self {
        Self { models }
    }

    /// Find the element type of a sample and whether it is a collection.
    ///
    /// A sequence resolves to its element. An optional sequence collapses to
    /// the same result. A bare optional is unwrapped once.
    pub fn resolve(shape: &TypeShape) -> ResolvedSample {
        let (element, is_collection) = match shape {
            TypeShape::Sequence(element) => (element.as_ref(), true),
            TypeShape::Optional(inner) => match inner.as_ref() {
                TypeShape::Sequence(element) => (element.as_ref(), true),
                other => (other, false),
            },
            other => (other, false),
        };
        ResolvedSample {
            model_name: Self::key_from(element),
            is_collection,
        }
    }

    /// Derive the model name of a shape
    pub fn key_from(shape: &TypeShape) -> String {
        shape.to_string()
    }

    /// Register the models for a shape and every record reachable from it
    pub fn add_model(&mut self, shape: &TypeShape) {
        match shape {
            TypeShape::Primitive(_) => {}
            TypeShape::Sequence(inner) | TypeShape::Optional(inner) => self.add_model(inner),
            TypeShape::Record(record) => self.add_record(record),
        }
    }

    fn add_record(&mut self, record: &RecordShape) {
        if let Some(existing) = self.models.get(&record.name) {
            if existing.origin != record.identity {
                warn!(
                    "Model {} already registered from {}, ignoring {}",
                    record.name, existing.origin, record.identity
                );
            } else {
                debug!("Model {} already registered", record.name);
            }
            return;
        }

        debug!("Registering model: {}", record.name);

        // Placeholder first so that cycles back to this record stop here
        self.models.insert(
            record.name.clone(),
            Model {
                id: record.name.clone(),
                required: Vec::new(),
                properties: IndexMap::new(),
                origin: record.identity.clone(),
            },
        );

        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for field in &record.fields {
            let field_shape = field.shape();
            if !matches!(field_shape, TypeShape::Optional(_)) {
                required.push(field.name.clone());
            }
            let property = self.property_of(&field_shape);
            properties.insert(field.name.clone(), property);
        }

        if let Some(model) = self.models.get_mut(&record.name) {
            model.properties = properties;
            model.required = required;
        }
    }

    /// Convert a field shape into a property, registering any record it names
    fn property_of(&mut self, shape: &TypeShape) -> ModelProperty {
        match shape {
            TypeShape::Primitive(primitive) => primitive_property(primitive),
            TypeShape::Optional(inner) => self.property_of(inner),
            TypeShape::Sequence(inner) => ModelProperty {
                property_type: Some("array".to_string()),
                items: Some(Box::new(self.property_of(inner))),
                ..ModelProperty::default()
            },
            TypeShape::Record(record) => {
                self.add_record(record);
                ModelProperty {
                    reference: Some(record.name.clone()),
                    ..ModelProperty::default()
                }
            }
        }
    }
}

fn primitive_property(primitive: &PrimitiveType) -> ModelProperty {
    ModelProperty {
        property_type: Some(primitive.swagger_type().to_string()),
        format: primitive.swagger_format().map(str::to_string),
        ..ModelProperty::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{Describe, RecordBuilder};
    use pretty_assertions::assert_eq;

    struct Author;
    struct Book;
    struct Library;
    struct Employee;
    struct Department;

    impl Describe for Author {
        fn shape() -> TypeShape {
            TypeShape::record::<Self>()
                .field::<String>("name")
                .field::<Option<String>>("email")
                .build()
        }
    }

    impl Describe for Book {
        fn shape() -> TypeShape {
            TypeShape::record::<Self>()
                .field::<String>("title")
                .field::<u32>("pages")
                .field::<Author>("author")
                .field::<Option<Box<Book>>>("sequel")
                .build()
        }
    }

    impl Describe for Library {
        fn shape() -> TypeShape {
            TypeShape::record::<Self>()
                .field::<Vec<Book>>("books")
                .field::<Author>("curator")
                .build()
        }
    }

    impl Describe for Employee {
        fn shape() -> TypeShape {
            TypeShape::record::<Self>()
                .field::<String>("name")
                .field::<Department>("department")
                .build()
        }
    }

    impl Describe for Department {
        fn shape() -> TypeShape {
            TypeShape::record::<Self>()
                .field::<Vec<Employee>>("staff")
                .build()
        }
    }

    fn register(shape: &TypeShape) -> Models {
        let mut models = Models::new();
        ModelBuilder::new(&mut models).add_model(shape);
        models
    }

    #[test]
    fn test_resolve_sequence() {
        let resolved = ModelBuilder::resolve(&TypeShape::of::<Vec<Book>>());
        assert_eq!(resolved.model_name, "Book");
        assert!(resolved.is_collection);
        assert_eq!(resolved.response_type(), "array[Book]");
    }

    #[test]
    fn test_resolve_optional_sequence_collapses() {
        let direct = ModelBuilder::resolve(&TypeShape::of::<Vec<Book>>());
        let optional = ModelBuilder::resolve(&TypeShape::of::<Option<Vec<Book>>>());
        assert_eq!(direct, optional);
    }

    #[test]
    fn test_resolve_optional_record() {
        let resolved = ModelBuilder::resolve(&TypeShape::of::<Option<Book>>());
        assert_eq!(resolved.model_name, "Book");
        assert!(!resolved.is_collection);
        assert_eq!(resolved.response_type(), "Book");
    }

    #[test]
    fn test_resolve_primitive() {
        let resolved = ModelBuilder::resolve(&TypeShape::of::<Vec<i64>>());
        assert_eq!(resolved.response_type(), "array[integer]");
    }

    #[test]
    fn test_primitive_registers_nothing() {
        let models = register(&TypeShape::of::<Vec<String>>());
        assert!(models.is_empty());
    }

    #[test]
    fn test_record_properties() {
        let models = register(&TypeShape::of::<Author>());
        let author = &models["Author"];

        assert_eq!(author.id, "Author");
        assert_eq!(author.required, vec!["name".to_string()]);
        assert_eq!(
            author.properties.keys().collect::<Vec<_>>(),
            vec!["name", "email"]
        );
        assert_eq!(
            author.properties["email"].property_type.as_deref(),
            Some("string")
        );
    }

    #[test]
    fn test_nested_records_registered_transitively() {
        let models = register(&TypeShape::of::<Library>());

        assert_eq!(models.len(), 3);
        assert_eq!(
            models.keys().collect::<Vec<_>>(),
            vec!["Library", "Book", "Author"]
        );

        let books = &models["Library"].properties["books"];
        assert_eq!(books.property_type.as_deref(), Some("array"));
        assert_eq!(
            books.items.as_ref().and_then(|i| i.reference.as_deref()),
            Some("Book")
        );
        let pages = &models["Book"].properties["pages"];
        assert_eq!(pages.format.as_deref(), Some("int32"));
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut models = Models::new();
        let mut builder = ModelBuilder::new(&mut models);
        builder.add_model(&TypeShape::of::<Book>());
        builder.add_model(&TypeShape::of::<Vec<Book>>());

        assert_eq!(models.len(), 2);
    }

    #[test]
    fn test_self_reference_terminates() {
        let models = register(&TypeShape::of::<Book>());

        assert_eq!(models.len(), 2);
        let sequel = &models["Book"].properties["sequel"];
        assert_eq!(sequel.reference.as_deref(), Some("Book"));
        assert!(!models["Book"].required.contains(&"sequel".to_string()));
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let models = register(&TypeShape::of::<Employee>());

        assert_eq!(models.len(), 2);
        assert!(models.contains_key("Employee"));
        assert!(models.contains_key("Department"));
        let staff = &models["Department"].properties["staff"];
        assert_eq!(
            staff.items.as_ref().and_then(|i| i.reference.as_deref()),
            Some("Employee")
        );
    }

    #[test]
    fn test_name_collision_keeps_first() {
        let first = RecordBuilder::new("Item", "a::Item")
            .field::<String>("label")
            .build();
        let second = RecordBuilder::new("Item", "b::Item")
            .field::<u64>("count")
            .build();

        let mut models = Models::new();
        let mut builder = ModelBuilder::new(&mut models);
        builder.add_model(&first);
        builder.add_model(&second);

        assert_eq!(models.len(), 1);
        assert!(models["Item"].properties.contains_key("label"));
        assert!(!models["Item"].properties.contains_key("count"));
    }

    #[test]
    fn test_model_json_shape() {
        let models = register(&TypeShape::of::<Library>());
        let json = serde_json::to_value(&models["Library"]).unwrap();

        assert_eq!(json["id"], "Library");
        assert_eq!(json["properties"]["books"]["type"], "array");
        assert_eq!(json["properties"]["books"]["items"]["$ref"], "Book");
        assert_eq!(json["properties"]["curator"]["$ref"], "Author");
        assert!(json.get("origin").is_none());
    }
}

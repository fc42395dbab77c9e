use crate::config::Config;
use crate::declaration::{
    translate_parameter, Api, ApiDeclaration, Operation, Parameter, SWAGGER_VERSION,
};
use crate::descriptor::{RouteDescriptor, ServiceDescriptor};
use crate::model_builder::{ModelBuilder, Models};
use crate::shape::TypeShape;
use indexmap::{IndexMap, IndexSet};
use log::debug;

/// Response type of an operation without a write sample
pub const VOID_TYPE: &str = "void";

/// Builds the API declarations of one service
pub struct DeclarationBuilder<'a> {
    config: &'a Config,
    service: &'a ServiceDescriptor,
}

impl<'a> DeclarationBuilder<'a> {
    pub fn new(config: &'a Config, service: &'a ServiceDescriptor) -> Self {
        debug!("Initializing DeclarationBuilder for {:?}", service.root_path);
        Self { config, service }
    }

    /// Compute every (declaration key, declaration) pair of the service.
    ///
    /// A service with a fixed root yields one declaration under that root. A
    /// rootless service yields one declaration per distinct static prefix of
    /// its routes, in route order.
    pub fn api_declarations(&self) -> Vec<(String, ApiDeclaration)> {
        if self.service.has_fixed_root() {
            let key = self.service.root_path.clone();
            let declaration = self.compose_declaration(&key);
            return vec![(key, declaration)];
        }

        let keys: IndexSet<String> = self.service.routes.iter().map(static_path).collect();
        keys.into_iter()
            .map(|key| {
                debug!("Composing declaration for static prefix {}", key);
                let declaration = self.compose_declaration(&key);
                (key, declaration)
            })
            .collect()
    }

    /// Compose the declaration of every route whose path lies under `path_prefix`
    pub fn compose_declaration(&self, path_prefix: &str) -> ApiDeclaration {
        let mut declaration = ApiDeclaration {
            swagger_version: SWAGGER_VERSION.to_string(),
            base_path: self.config.web_services_url.clone(),
            resource_path: self.service.root_path.clone(),
            apis: Vec::new(),
            models: Models::new(),
        };

        let root_params: Vec<Parameter> = self
            .service
            .parameters
            .iter()
            .map(translate_parameter)
            .collect();

        // Group by exact path, keeping first-seen order
        let mut path_to_routes: IndexMap<&str, Vec<&RouteDescriptor>> = IndexMap::new();
        for route in &self.service.routes {
            if matches_prefix(&route.path, path_prefix) {
                path_to_routes.entry(route.path.as_str()).or_default().push(route);
            }
        }

        for (path, routes) in path_to_routes {
            let mut api = Api {
                path: path.to_string(),
                description: self.service.documentation.clone(),
                operations: Vec::with_capacity(routes.len()),
            };
            for route in routes {
                let operation = assemble_operation(route, &root_params, &mut declaration.models);
                api.operations.push(operation);
            }
            declaration.apis.push(api);
        }

        debug!(
            "Composed declaration for {}: {} apis, {} models",
            path_prefix,
            declaration.apis.len(),
            declaration.models.len()
        );
        declaration
    }
}

/// Build the operation of one route.
///
/// Root parameters come first in service order, then the route's own
/// parameters in route order.
pub fn assemble_operation(
    route: &RouteDescriptor,
    root_params: &[Parameter],
    models: &mut Models,
) -> Operation {
    debug!("Assembling operation: {} {}", route.method, route.path);

    let mut parameters = Vec::with_capacity(root_params.len() + route.parameters.len());
    parameters.extend_from_slice(root_params);
    parameters.extend(route.parameters.iter().map(translate_parameter));

    let mut operation = Operation {
        method: route.method.as_str().to_string(),
        summary: route.doc.clone(),
        response_type: VOID_TYPE.to_string(),
        nickname: route.operation.clone(),
        consumes: route.consumes.clone(),
        produces: route.produces.clone(),
        parameters,
    };

    if let Some(sample) = &route.read_sample {
        add_model_from_sample(&mut operation, false, sample, models);
    }
    if let Some(sample) = &route.write_sample {
        add_model_from_sample(&mut operation, true, sample, models);
    }
    operation
}

/// Register the models of a sample; a response sample also sets the operation type
fn add_model_from_sample(
    operation: &mut Operation,
    is_response: bool,
    sample: &TypeShape,
    models: &mut Models,
) {
    let resolved = ModelBuilder::resolve(sample);
    if is_response {
        operation.response_type = resolved.response_type();
    }
    ModelBuilder::new(models).add_model(sample);
}

/// The part of a route path before its first placeholder, without trailing slash.
///
/// A path without placeholders, or whose placeholder starts at position 0 or 1,
/// is returned as is so the result is never empty.
pub fn static_path(route: &RouteDescriptor) -> String {
    static_prefix(&route.path).to_string()
}

fn static_prefix(path: &str) -> &str {
    match path.find('{') {
        Some(bracket) if bracket > 1 => {
            let prefix = &path[..bracket];
            prefix.strip_suffix('/').unwrap_or(prefix)
        }
        _ => path,
    }
}

/// Whether `path` lies under `prefix`, matching whole segments only
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() || path == prefix {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => prefix.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

use crate::config::Config;
use crate::manifest::Manifest;
use crate::registry::DeclarationRegistry;
use crate::scanner::ModelSourceScanner;
use crate::serializer::{write_registry, DocumentFormat};
use crate::type_resolver::TypeResolver;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Swagger Declaration Generator - Build Swagger 1.2 listings and API declarations from a manifest
#[derive(Parser, Debug)]
#[command(name = "swagger-decl")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the service manifest (.yaml, .yml or .json)
    #[arg(value_name = "MANIFEST")]
    pub manifest_path: PathBuf,

    /// Rust source files or directories holding the model types
    #[arg(short = 'm', long = "models", value_name = "PATH")]
    pub model_paths: Vec<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output directory for the listing and all declarations (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the declaration registered under this key instead of the listing
    #[arg(short = 'r', long = "resource", value_name = "KEY")]
    pub resource: Option<String>,

    /// Override the externally visible URL of the services
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the path the documentation is served under
    #[arg(long = "api-path", value_name = "PATH")]
    pub api_path: Option<String>,

    /// Do not add CORS headers to documentation responses
    #[arg(long = "disable-cors")]
    pub disable_cors: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => DocumentFormat::Yaml,
            OutputFormat::Json => DocumentFormat::Json,
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.manifest_path.is_file() {
        anyhow::bail!("Manifest does not exist: {}", args.manifest_path.display());
    }

    if let Some(ref output) = args.output_dir {
        if output.is_file() {
            anyhow::bail!("Output path is not a directory: {}", output.display());
        }
        if args.resource.is_some() {
            anyhow::bail!("--resource cannot be combined with --output");
        }
    }

    info!("Manifest: {}", args.manifest_path.display());
    info!("Output format: {:?}", args.output_format);
    match args.output_dir {
        Some(ref output) => info!("Output directory: {}", output.display()),
        None => info!("Output: stdout"),
    }
    for path in &args.model_paths {
        info!("Model path: {}", path.display());
    }

    Ok(args)
}

/// Apply command line overrides on top of the manifest configuration
pub fn effective_config(manifest_config: Option<Config>, args: &CliArgs) -> Config {
    let mut config = manifest_config.unwrap_or_default();
    if let Some(ref base_url) = args.base_url {
        config.web_services_url = base_url.clone();
    }
    if let Some(ref api_path) = args.api_path {
        config.api_path = api_path.clone();
    }
    if args.disable_cors {
        config.disable_cors = true;
    }
    config
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting API declaration generation...");

    // Step 1: Load the manifest
    let manifest = Manifest::load(&args.manifest_path)
        .with_context(|| format!("Failed to load manifest {}", args.manifest_path.display()))?;
    let config = effective_config(manifest.config.clone(), &args);
    info!("Base path: {}", config.web_services_url);

    // Step 2: Collect and parse model sources
    let scan = ModelSourceScanner::new(args.model_paths.clone()).scan();
    for warning in &scan.warnings {
        warn!("{}", warning);
    }
    info!("Found {} model sources", scan.sources.len());

    let (resolver, parse_warnings) = TypeResolver::from_files(&scan.sources);
    for warning in &parse_warnings {
        warn!("{}", warning);
    }

    // Step 3: Convert manifest services
    let loaded = manifest.into_services(&resolver);
    if loaded.services.is_empty() {
        warn!("No services to document");
    }

    // Step 4: Build declarations
    let registry = DeclarationRegistry::build(&config, &loaded.services);
    let format = DocumentFormat::from(args.output_format);

    // Step 5: Output
    if let Some(ref dir) = args.output_dir {
        info!("Writing documentation to: {}", dir.display());
        let written = write_registry(&registry, dir, format)?;
        info!("Wrote {} files to {}", written.len(), dir.display());
    } else if let Some(ref key) = args.resource {
        let declaration = registry
            .get(key)
            .with_context(|| format!("No API declaration registered under {}", key))?;
        println!("{}", format.render(declaration)?);
    } else {
        println!("{}", format.render(&registry.listing())?);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Model sources: {}", scan.sources.len());
    info!("  - Services documented: {}", loaded.services.len());
    info!("  - Services skipped: {}", loaded.warnings.len());
    info!("  - Declarations: {}", registry.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_args() {
        let args = CliArgs::try_parse_from(["swagger-decl", "services.yaml"]).unwrap();

        assert_eq!(args.manifest_path, PathBuf::from("services.yaml"));
        assert!(matches!(args.output_format, OutputFormat::Json));
        assert!(args.model_paths.is_empty());
        assert!(!args.disable_cors);
    }

    #[test]
    fn test_parse_repeated_model_paths() {
        let args = CliArgs::try_parse_from([
            "swagger-decl",
            "services.yaml",
            "-m",
            "src/models",
            "--models",
            "src/dto.rs",
            "-f",
            "yaml",
        ])
        .unwrap();

        assert_eq!(
            args.model_paths,
            vec![PathBuf::from("src/models"), PathBuf::from("src/dto.rs")]
        );
        assert!(matches!(args.output_format, OutputFormat::Yaml));
    }

    #[test]
    fn test_validation_rejects_missing_manifest() {
        let args = CliArgs::try_parse_from(["swagger-decl", "/definitely/not/here.yaml"]).unwrap();
        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_validation_rejects_resource_with_output() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = temp_dir.path().join("services.yaml");
        fs::write(&manifest, "services: []").unwrap();

        let args = CliArgs::try_parse_from([
            "swagger-decl",
            manifest.to_str().unwrap(),
            "-o",
            temp_dir.path().join("docs").to_str().unwrap(),
            "-r",
            "/books",
        ])
        .unwrap();
        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_effective_config_overrides() {
        let args = CliArgs::try_parse_from([
            "swagger-decl",
            "services.yaml",
            "--base-url",
            "https://api.example.com",
            "--disable-cors",
        ])
        .unwrap();

        let manifest_config = Config::new("http://localhost").with_api_path("/docs.json");
        let config = effective_config(Some(manifest_config), &args);

        assert_eq!(config.web_services_url, "https://api.example.com");
        assert_eq!(config.api_path, "/docs.json");
        assert!(config.disable_cors);
    }
}

use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default path the documentation endpoint is served under
pub const DEFAULT_API_PATH: &str = "/apidocs.json";

/// Settings of the documentation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Externally visible URL of the documented services, used as `basePath`
    pub web_services_url: String,
    /// Path the listing and declarations are served under
    pub api_path: String,
    /// Do not add `Access-Control-Allow-Origin` to responses
    pub disable_cors: bool,
    /// Path the documentation UI is mounted on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swagger_path: Option<String>,
    /// Folder holding the UI assets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swagger_file_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_services_url: String::new(),
            api_path: DEFAULT_API_PATH.to_string(),
            disable_cors: false,
            swagger_path: None,
            swagger_file_path: None,
        }
    }
}

impl Config {
    pub fn new(web_services_url: impl Into<String>) -> Self {
        Self {
            web_services_url: web_services_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    pub fn with_swagger_ui(
        mut self,
        swagger_path: impl Into<String>,
        folder: impl Into<PathBuf>,
    ) -> Self {
        self.swagger_path = Some(swagger_path.into());
        self.swagger_file_path = Some(folder.into());
        self
    }

    /// Full URL of the listing document
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.web_services_url, self.api_path)
    }

    /// The UI mount path, corrected to end with a slash
    pub fn normalized_swagger_path(&self) -> Option<String> {
        let path = self.swagger_path.as_deref().filter(|p| !p.is_empty())?;
        if path.ends_with('/') {
            Some(path.to_string())
        } else {
            info!("Using corrected swagger path {}/ ; it must end with a slash", path);
            Some(format!("{}/", path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_path, "/apidocs.json");
        assert!(!config.disable_cors);
        assert!(config.normalized_swagger_path().is_none());
    }

    #[test]
    fn test_swagger_path_gets_trailing_slash() {
        let config = Config::new("http://localhost:8080").with_swagger_ui("/apidocs", "/srv/ui");
        assert_eq!(config.normalized_swagger_path().as_deref(), Some("/apidocs/"));

        let config = Config::new("").with_swagger_ui("/ui/", "/srv/ui");
        assert_eq!(config.normalized_swagger_path().as_deref(), Some("/ui/"));
    }

    #[test]
    fn test_listing_url() {
        let config = Config::new("http://localhost:8080").with_api_path("/docs");
        assert_eq!(config.listing_url(), "http://localhost:8080/docs");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("web_services_url: http://api\n").unwrap();
        assert_eq!(config.web_services_url, "http://api");
        assert_eq!(config.api_path, DEFAULT_API_PATH);
    }
}

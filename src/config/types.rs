use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub relations: RelationConfig,
}

/// File discovery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// File extensions parsed as manifests (without the dot)
    pub supported_extensions: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            supported_extensions: vec!["yaml".to_string(), "yml".to_string()],
        }
    }
}

impl AnalysisConfig {
    /// Whether `extension` names a manifest file (case-sensitive).
    pub fn is_supported(&self, extension: &str) -> bool {
        self.supported_extensions.iter().any(|e| e == extension)
    }
}

/// Relation inference configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationConfig {
    /// Property key fragments marking connection settings (matched case-insensitively)
    pub keywords: Vec<String>,
    /// Component type name of container runtimes that host new components
    pub container_runtime_type: String,
    /// Relation type used for inferred connections
    pub connects_to: String,
    /// Relation type used for hosting
    pub hosted_on: String,
}

impl Default for RelationConfig {
    fn default() -> Self {
        Self {
            keywords: ["connect", "host", "server", "url", "uri"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            container_runtime_type: "container_runtime".to_string(),
            connects_to: "ConnectsTo".to_string(),
            hosted_on: "HostedOn".to_string(),
        }
    }
}

impl RelationConfig {
    /// Whether a property key names a connection setting.
    pub fn is_connection_key(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| key.contains(&keyword.to_lowercase()))
    }
}

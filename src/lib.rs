//! # kube-tadm
//!
//! Derives a technology-agnostic deployment model (TADM) from Kubernetes
//! manifests.
//!
//! ## Features
//!
//! - **Manifest parsing**: Service, Deployment and StatefulSet documents are
//!   read with an indentation-sensitive parser that records, per line, whether
//!   the line was understood
//! - **Model transformation**: every Deployment becomes a component with its
//!   ports, environment, images and Service-exposed ports
//! - **Relation inference**: `ConnectsTo` relations from connection settings,
//!   `HostedOn` relations to a known container runtime
//!
//! ## Example
//!
//! ```rust
//! use kube_tadm::analyzer::{parse_manifest, transform};
//! use kube_tadm::config::RelationConfig;
//! use kube_tadm::model::TechnologyAgnosticDeploymentModel;
//! use uuid::Uuid;
//!
//! # fn main() -> kube_tadm::Result<()> {
//! let manifest = "kind: Deployment
//! metadata:
//!   name: order
//! spec:
//!   template:
//!     spec:
//!       containers:
//!       - name: order
//!         image: order:v1
//! ";
//! let parsed = parse_manifest(manifest)?;
//! let mut model = TechnologyAgnosticDeploymentModel::new(Uuid::new_v4());
//! transform(&mut model, &parsed.deployments, &parsed.services, &RelationConfig::default());
//! assert_eq!(model.components[0].artifacts[0].name, "order:v1");
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;

// Re-export commonly used types and functions
pub use analyzer::{AnalysisRequest, AnalysisService, CancellationFlag, parse_manifest};
pub use error::{AnalysisError, Result};
use cli::Commands;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run_command(command: Commands, config: config::Config) -> Result<()> {
    match command {
        Commands::Analyze {
            store,
            process,
            task,
            locations,
        } => handlers::handle_analyze(store, process, task, locations, config).map(|_| ()),
        Commands::Trace { file, json } => {
            let output = handlers::handle_trace(file, json)?;
            println!("{}", output);
            Ok(())
        }
    }
}

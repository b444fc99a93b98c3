use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "kube-tadm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Derive technology-agnostic deployment models from Kubernetes manifests")]
#[command(long_about = "Parses Kubernetes Service, Deployment and StatefulSet manifests, records how much of every file was understood, and turns the result into components, properties, artifacts and relations of a technology-agnostic deployment model.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one analysis task against a directory of model documents
    Analyze {
        /// Directory holding `<process>.tsdm.json` and `<process>.tadm.json`
        #[arg(long, value_name = "DIR")]
        store: PathBuf,

        /// Transformation process whose models are updated
        #[arg(long, value_name = "UUID")]
        process: Uuid,

        /// Task identifier used in reports (random when omitted)
        #[arg(long, value_name = "UUID")]
        task: Option<Uuid>,

        /// Manifest locations (file: URLs or paths, files or directories)
        #[arg(value_name = "LOCATION", required = true)]
        locations: Vec<String>,
    },

    /// Print the recognition trace of one manifest file
    Trace {
        /// Manifest file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the trace as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

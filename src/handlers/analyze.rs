use crate::analyzer::{AnalysisRequest, AnalysisService, CancellationFlag, TaskReport};
use crate::config::Config;
use crate::handlers::{FileModelStore, LogResponseSender};
use colored::Colorize;
use std::path::PathBuf;
use uuid::Uuid;

/// Run one analysis task against a file-backed model store.
pub fn handle_analyze(
    store: PathBuf,
    process: Uuid,
    task: Option<Uuid>,
    locations: Vec<String>,
    config: Config,
) -> crate::Result<TaskReport> {
    let request = AnalysisRequest {
        task_id: task.unwrap_or_else(Uuid::new_v4),
        transformation_process_id: process,
        locations,
    };
    let service = AnalysisService::new(FileModelStore::new(&store), LogResponseSender, config);

    let report = service.start_analysis(&request, &CancellationFlag::new())?;
    print_report(&report);
    Ok(report)
}

fn print_report(report: &TaskReport) {
    println!(
        "{} Task {} finished",
        "✅".green(),
        report.task_id.to_string().bold()
    );
    println!(
        "├── Files analyzed: {} ({} deployments, {} services)",
        report.files_analyzed, report.deployments, report.services
    );
    println!(
        "├── Coverage: {}/{} lines ({:.1}%)",
        report.coverage.weighted_lines,
        report.coverage.total_lines,
        report.coverage.percent()
    );
    println!(
        "├── Components added: {} ({} types)",
        report.transform.components_added, report.transform.component_types_added
    );
    println!("└── Relations added: {}", report.transform.relations_added);
}

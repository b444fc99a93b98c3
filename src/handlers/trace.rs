use crate::analyzer::manifest::{
    Coverage, KubernetesDeployment, KubernetesService, ManifestDocument, parse_manifest,
};
use crate::error::AnalysisError;
use crate::model::Line;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceOutput<'a> {
    file: String,
    coverage: Coverage,
    documents: &'a [ManifestDocument],
    deployments: &'a [KubernetesDeployment],
    services: &'a [KubernetesService],
    lines: &'a [Line],
}

/// Parse one manifest and render its recognition trace.
pub fn handle_trace(file: PathBuf, json: bool) -> crate::Result<String> {
    let content = std::fs::read_to_string(&file).map_err(|source| AnalysisError::FileRead {
        path: file.clone(),
        source,
    })?;
    let parsed = parse_manifest(&content)?;
    let coverage = parsed.trace.coverage();

    if json {
        let output = TraceOutput {
            file: file.display().to_string(),
            coverage,
            documents: &parsed.documents,
            deployments: &parsed.deployments,
            services: &parsed.services,
            lines: parsed.trace.lines(),
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    let mut out = vec![file.display().to_string().bold().to_string()];
    for (number, text) in (1u32..).zip(content.lines()) {
        let marker = match parsed.trace.lines().iter().find(|l| l.number == number) {
            Some(line) if line.weight > 0 => "1".green().to_string(),
            Some(_) => "0".yellow().to_string(),
            None => "-".dimmed().to_string(),
        };
        out.push(format!("{:>4} {} {}", number, marker, text));
    }

    out.push(String::new());
    for document in &parsed.documents {
        let range = document.line_numbers();
        out.push(format!(
            "├── {} (lines {}-{})",
            document.kind,
            range.start,
            range.end.saturating_sub(1)
        ));
    }
    for deployment in &parsed.deployments {
        out.push(format!(
            "├── Deployment {}: {} containers",
            deployment.name.cyan(),
            deployment.containers.len()
        ));
    }
    for service in &parsed.services {
        out.push(format!(
            "├── Service {}: {} ports",
            service.name.cyan(),
            service.ports.len()
        ));
    }
    out.push(format!(
        "└── Coverage: {}/{} lines ({:.1}%)",
        coverage.weighted_lines,
        coverage.total_lines,
        coverage.percent()
    ));
    Ok(out.join("\n") + "\n")
}

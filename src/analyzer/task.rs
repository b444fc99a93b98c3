//! Orchestration of one analysis task.
//!
//! An [`AnalysisService`] holds only shared, read-only collaborators. Each
//! call to [`AnalysisService::start_analysis`] builds its own
//! [`AnalysisTask`] context, so tasks can run concurrently on separate
//! threads. A task either commits all of its results to the model store or
//! nothing.

use super::location::{ResolvedLocation, normalize_location, resolve_location};
use super::manifest::{Coverage, KubernetesDeployment, KubernetesService, parse_manifest_file};
use super::transform::{TransformReport, transform};
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use crate::handlers::{ModelStore, TaskResponseSender};
use crate::model::{
    DeploymentModelContent, Line, TechnologyAgnosticDeploymentModel,
    TechnologySpecificDeploymentModel, push_unique,
};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Request to analyze manifest locations for one transformation process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub task_id: Uuid,
    pub transformation_process_id: Uuid,
    pub locations: Vec<String>,
}

/// Shared flag to stop a running task between files.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(AnalysisError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Summary of a successful task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskReport {
    pub task_id: Uuid,
    pub files_analyzed: usize,
    pub deployments: usize,
    pub services: usize,
    pub coverage: Coverage,
    pub transform: TransformReport,
}

/// State of one running task.
///
/// Nothing here is visible to other tasks; the documents are private copies
/// until [`AnalysisService`] commits them.
#[derive(Debug)]
pub struct AnalysisTask<'r> {
    request: &'r AnalysisRequest,
    /// Request locations as sent, then their normalized forms
    lookup: Vec<String>,
    technology_specific: TechnologySpecificDeploymentModel,
    technology_agnostic: TechnologyAgnosticDeploymentModel,
    deployments: Vec<KubernetesDeployment>,
    services: Vec<KubernetesService>,
    contents: Vec<DeploymentModelContent>,
    removed_locations: Vec<String>,
    files_analyzed: usize,
}

impl<'r> AnalysisTask<'r> {
    /// Start a task over private copies of the process' model documents.
    ///
    /// The model is looked up by the locations exactly as the request names
    /// them; a location recorded without its trailing `.` matches as well.
    pub fn new(
        request: &'r AnalysisRequest,
        technology_specific: TechnologySpecificDeploymentModel,
        technology_agnostic: TechnologyAgnosticDeploymentModel,
    ) -> Result<Self> {
        let mut lookup = request.locations.clone();
        for location in &request.locations {
            let normalized = normalize_location(location);
            if !lookup.contains(&normalized) {
                lookup.push(normalized);
            }
        }
        if technology_specific.find_by_location(&lookup).is_none() {
            return Err(AnalysisError::ModelNotFound(
                "No technology-specific deployment model found!".to_string(),
            ));
        }

        Ok(Self {
            request,
            lookup,
            technology_specific,
            technology_agnostic,
            deployments: Vec::new(),
            services: Vec::new(),
            contents: Vec::new(),
            removed_locations: Vec::new(),
            files_analyzed: 0,
        })
    }

    /// Parse every file a resolved location stands for.
    ///
    /// `requested` is the location as the request named it. A directory's
    /// own content entry is removed under that name and under its resolved
    /// form.
    pub fn analyze_location(
        &mut self,
        requested: &str,
        resolved: &ResolvedLocation,
        cancel: &CancellationFlag,
    ) -> Result<()> {
        if resolved.is_directory {
            for location in [requested, resolved.location.as_str()] {
                if !self.removed_locations.iter().any(|l| l == location) {
                    self.removed_locations.push(location.to_string());
                }
            }
        }

        for file in &resolved.files {
            cancel.check()?;
            log::info!("Analyzing {}", file.location);

            let parsed = parse_manifest_file(&file.path)?;
            self.files_analyzed += 1;
            for deployment in parsed.deployments {
                push_unique(&mut self.deployments, deployment);
            }
            for service in parsed.services {
                push_unique(&mut self.services, service);
            }
            if !parsed.trace.is_empty() {
                self.contents.push(DeploymentModelContent {
                    location: file.location.clone(),
                    lines: parsed.trace.into_lines(),
                });
            }
        }
        Ok(())
    }

    /// Transform everything parsed so far and apply the results to the
    /// task's copies of the model documents.
    pub fn finish(&mut self, config: &Config) -> Result<TaskReport> {
        let transform_report = transform(
            &mut self.technology_agnostic,
            &self.deployments,
            &self.services,
            &config.relations,
        );

        let lines: Vec<Line> = self
            .contents
            .iter()
            .flat_map(|c| c.lines.iter().copied())
            .collect();
        let coverage = Coverage::of(&lines);

        let target = self
            .technology_specific
            .find_by_location_mut(&self.lookup)
            .ok_or_else(|| {
                AnalysisError::ModelNotFound("No technology-specific deployment model found!".to_string())
            })?;
        for location in &self.removed_locations {
            target.remove_content(location);
        }
        for content in self.contents.drain(..) {
            target.add_content(content);
        }

        Ok(TaskReport {
            task_id: self.request.task_id,
            files_analyzed: self.files_analyzed,
            deployments: self.deployments.len(),
            services: self.services.len(),
            coverage,
            transform: transform_report,
        })
    }

    pub fn technology_specific(&self) -> &TechnologySpecificDeploymentModel {
        &self.technology_specific
    }

    pub fn technology_agnostic(&self) -> &TechnologyAgnosticDeploymentModel {
        &self.technology_agnostic
    }
}

/// Runs analysis tasks against a model store and reports their outcome.
#[derive(Debug)]
pub struct AnalysisService<S, R> {
    store: S,
    sender: R,
    config: Config,
}

impl<S: ModelStore, R: TaskResponseSender> AnalysisService<S, R> {
    pub fn new(store: S, sender: R, config: Config) -> Self {
        Self {
            store,
            sender,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sender(&self) -> &R {
        &self.sender
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one task to completion and report success or failure.
    ///
    /// The error is returned as well as sent, so callers can set exit codes.
    pub fn start_analysis(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationFlag,
    ) -> Result<TaskReport> {
        log::info!(
            "Starting task {} for process {} ({} locations)",
            request.task_id,
            request.transformation_process_id,
            request.locations.len()
        );

        match self.run(request, cancel) {
            Ok(report) => {
                log::info!(
                    "Task {}: {} files, {}/{} lines weighted",
                    request.task_id,
                    report.files_analyzed,
                    report.coverage.weighted_lines,
                    report.coverage.total_lines
                );
                self.sender.send_success(request.task_id);
                Ok(report)
            }
            Err(e) => {
                self.sender.send_failure(request.task_id, &e.to_string());
                Err(e)
            }
        }
    }

    fn run(&self, request: &AnalysisRequest, cancel: &CancellationFlag) -> Result<TaskReport> {
        let process_id = request.transformation_process_id;
        let previous = self.store.technology_specific_model(process_id)?;
        let mut task = AnalysisTask::new(
            request,
            previous.clone(),
            self.store.technology_agnostic_model(process_id)?,
        )?;

        for location in &request.locations {
            cancel.check()?;
            let resolved = resolve_location(&normalize_location(location), &self.config.analysis)?;
            task.analyze_location(location, &resolved, cancel)?;
        }
        cancel.check()?;

        let report = task.finish(&self.config)?;
        self.commit(&task, &previous)?;
        Ok(report)
    }

    /// Write both documents, or neither.
    ///
    /// The TSDM goes first; when the TADM write fails the previously loaded
    /// TSDM is written back.
    fn commit(
        &self,
        task: &AnalysisTask<'_>,
        previous: &TechnologySpecificDeploymentModel,
    ) -> Result<()> {
        self.store
            .update_technology_specific_model(task.technology_specific())?;
        if let Err(e) = self
            .store
            .update_technology_agnostic_model(task.technology_agnostic())
        {
            if let Err(restore) = self.store.update_technology_specific_model(previous) {
                log::error!(
                    "Failed to restore the technology-specific model of process {}: {}",
                    previous.transformation_process_id,
                    restore
                );
            }
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::location::file_location;
    use crate::handlers::{FileModelStore, RecordingResponseSender, TaskResponse};
    use std::fs;
    use tempfile::TempDir;

    const ORDER: &str = "apiVersion: apps/v1
kind: Deployment
metadata:
  name: order
  labels:
    app: order
spec:
  template:
    spec:
      containers:
      - name: order
        image: order:v1
";

    struct Fixture {
        dir: TempDir,
        process: Uuid,
        location: String,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("order.yaml");
        fs::write(&manifest, ORDER).unwrap();
        let location = file_location(&manifest);

        let process = Uuid::new_v4();
        let mut tsdm = TechnologySpecificDeploymentModel::new(process, "kubernetes");
        tsdm.content.push(DeploymentModelContent {
            location: location.clone(),
            lines: Vec::new(),
        });
        FileModelStore::new(dir.path())
            .update_technology_specific_model(&tsdm)
            .unwrap();

        Fixture {
            dir,
            process,
            location,
        }
    }

    fn request(fixture: &Fixture, location: &str) -> AnalysisRequest {
        AnalysisRequest {
            task_id: Uuid::new_v4(),
            transformation_process_id: fixture.process,
            locations: vec![location.to_string()],
        }
    }

    #[test]
    fn test_successful_task_commits_models() {
        let fixture = fixture();
        let service = AnalysisService::new(
            FileModelStore::new(fixture.dir.path()),
            RecordingResponseSender::new(),
            Config::default(),
        );
        let request = request(&fixture, &fixture.location);

        let report = service
            .start_analysis(&request, &CancellationFlag::new())
            .unwrap();
        assert_eq!(report.files_analyzed, 1);
        assert_eq!(report.transform.components_added, 1);
        assert_eq!(report.coverage.total_lines, 11);

        let tadm = service.store().technology_agnostic_model(fixture.process).unwrap();
        assert!(tadm.component("order").is_some());
        let tsdm = service.store().technology_specific_model(fixture.process).unwrap();
        assert_eq!(tsdm.content[0].lines.len(), 11);
        assert_eq!(
            service.sender().responses(),
            vec![TaskResponse::Success {
                task_id: request.task_id
            }]
        );
    }

    #[test]
    fn test_cancelled_task_commits_nothing() {
        let fixture = fixture();
        let service = AnalysisService::new(
            FileModelStore::new(fixture.dir.path()),
            RecordingResponseSender::new(),
            Config::default(),
        );
        let cancel = CancellationFlag::new();
        cancel.cancel();

        let result = service.start_analysis(&request(&fixture, &fixture.location), &cancel);
        assert!(matches!(result, Err(AnalysisError::Cancelled)));
        assert!(!service.store().technology_agnostic_path(fixture.process).exists());
        assert!(matches!(
            service.sender().responses()[0],
            TaskResponse::Failure { .. }
        ));
    }

    #[test]
    fn test_unknown_location_fails_task() {
        let fixture = fixture();
        let service = AnalysisService::new(
            FileModelStore::new(fixture.dir.path()),
            RecordingResponseSender::new(),
            Config::default(),
        );
        let other = file_location(&fixture.dir.path().join("other.yaml"));
        let request = request(&fixture, &other);

        let result = service.start_analysis(&request, &CancellationFlag::new());
        let Err(AnalysisError::ModelNotFound(message)) = result else {
            panic!("expected a missing model error");
        };
        assert_eq!(message, "No technology-specific deployment model found!");
        assert_eq!(
            service.sender().responses(),
            vec![TaskResponse::Failure {
                task_id: request.task_id,
                message,
            }]
        );
    }

    #[test]
    fn test_trailing_dot_is_ignored() {
        let fixture = fixture();
        let service = AnalysisService::new(
            FileModelStore::new(fixture.dir.path()),
            RecordingResponseSender::new(),
            Config::default(),
        );
        let dotted = format!("{}.", fixture.location);

        let report = service
            .start_analysis(&request(&fixture, &dotted), &CancellationFlag::new())
            .unwrap();
        assert_eq!(report.files_analyzed, 1);
    }

    #[test]
    fn test_directory_recorded_with_trailing_dot() {
        let dir = TempDir::new().unwrap();
        let k8s = dir.path().join("k8s");
        fs::create_dir(&k8s).unwrap();
        fs::write(k8s.join("order.yaml"), ORDER).unwrap();
        let dotted = format!("{}/.", file_location(&k8s));

        let process = Uuid::new_v4();
        let mut tsdm = TechnologySpecificDeploymentModel::new(process, "kubernetes");
        tsdm.content.push(DeploymentModelContent {
            location: dotted.clone(),
            lines: Vec::new(),
        });
        let store = FileModelStore::new(dir.path());
        store.update_technology_specific_model(&tsdm).unwrap();

        let service = AnalysisService::new(store, RecordingResponseSender::new(), Config::default());
        let request = AnalysisRequest {
            task_id: Uuid::new_v4(),
            transformation_process_id: process,
            locations: vec![dotted],
        };
        let report = service
            .start_analysis(&request, &CancellationFlag::new())
            .unwrap();
        assert_eq!(report.files_analyzed, 1);

        let tsdm = service.store().technology_specific_model(process).unwrap();
        let locations: Vec<&str> = tsdm.content.iter().map(|c| c.location.as_str()).collect();
        assert_eq!(locations, vec![file_location(&k8s.join("order.yaml"))]);
        assert_eq!(tsdm.content[0].lines.len(), 11);
    }

    /// Store whose technology-agnostic writes always fail.
    struct ReadOnlyAgnosticStore(FileModelStore);

    impl ModelStore for ReadOnlyAgnosticStore {
        fn technology_specific_model(
            &self,
            process_id: Uuid,
        ) -> Result<TechnologySpecificDeploymentModel> {
            self.0.technology_specific_model(process_id)
        }

        fn technology_agnostic_model(
            &self,
            process_id: Uuid,
        ) -> Result<TechnologyAgnosticDeploymentModel> {
            self.0.technology_agnostic_model(process_id)
        }

        fn update_technology_specific_model(
            &self,
            model: &TechnologySpecificDeploymentModel,
        ) -> Result<()> {
            self.0.update_technology_specific_model(model)
        }

        fn update_technology_agnostic_model(
            &self,
            _model: &TechnologyAgnosticDeploymentModel,
        ) -> Result<()> {
            Err(AnalysisError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_failed_agnostic_write_restores_specific_model() {
        let fixture = fixture();
        let service = AnalysisService::new(
            ReadOnlyAgnosticStore(FileModelStore::new(fixture.dir.path())),
            RecordingResponseSender::new(),
            Config::default(),
        );
        let request = request(&fixture, &fixture.location);

        let result = service.start_analysis(&request, &CancellationFlag::new());
        assert!(matches!(result, Err(AnalysisError::Io(_))));

        let tsdm = FileModelStore::new(fixture.dir.path())
            .technology_specific_model(fixture.process)
            .unwrap();
        assert_eq!(tsdm.content.len(), 1);
        assert!(tsdm.content[0].lines.is_empty());
        assert!(matches!(
            service.sender().responses()[0],
            TaskResponse::Failure { .. }
        ));
    }
}

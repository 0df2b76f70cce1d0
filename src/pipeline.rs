use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::{ApiError, RoundScore, ScoreSource, StatsClient};
use crate::collector::{self, CollectOptions, Collection};
use crate::config::ScoreflowConfig;
use crate::error::PipelineError;
use crate::flow::{Edge, EntityId, Transformer};
use crate::report::{self, ReportContext};
use crate::ui::FetchProgress;

/// Drives a full run: collect, transform, render, write.
pub struct Pipeline {
    config: ScoreflowConfig,
}

/// Structured summary produced at the end of a report build.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub title: String,
    /// Roster size the run attempted, after dedup and the limit.
    pub entities: usize,
    pub skipped: Vec<EntityId>,
    pub records: usize,
    pub transitions: usize,
    pub edges: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub output: PathBuf,
}

/// In-memory source backing the `demo` subcommand: three entities with four
/// scored rounds each, shaped like real API data.
pub struct SampleSource;

impl ScoreSource for SampleSource {
    async fn roster(&self) -> Result<Vec<EntityId>, ApiError> {
        Ok(vec![1, 2, 3])
    }

    async fn history(&self, id: EntityId) -> Result<Vec<RoundScore>, ApiError> {
        let rows: &[(u32, i32)] = match id {
            1 => &[(1, 5), (2, 3), (3, 8), (4, 3)],
            2 => &[(1, 5), (2, 3), (3, 2), (4, 3)],
            3 => &[(1, 0), (2, 0), (3, 8), (4, 12)],
            _ => &[],
        };
        Ok(rows
            .iter()
            .map(|&(round, total_points)| RoundScore {
                round,
                total_points,
            })
            .collect())
    }
}

impl Pipeline {
    pub fn new(config: ScoreflowConfig) -> Self {
        Self { config }
    }

    fn client(&self) -> StatsClient {
        StatsClient::with_base_url(
            self.config.source.base_url.clone(),
            Duration::from_secs(self.config.source.timeout_secs),
        )
        .with_paths(
            self.config.source.roster_path.clone(),
            self.config.source.history_path.clone(),
        )
    }

    fn transformer(&self) -> Transformer {
        Transformer::new(self.config.report.period_label.as_str())
    }

    async fn collect(&self, progress: Option<&FetchProgress>) -> Result<Collection, PipelineError> {
        let opts = CollectOptions::from(&self.config.source);
        let client = self.client();
        if opts.max_in_flight > 1 {
            collector::collect_bounded(&client, &opts, progress).await
        } else {
            collector::collect(&client, &opts, progress).await
        }
    }

    /// Fetch and aggregate without rendering: the raw three-column table.
    pub async fn edge_table(
        &self,
        progress: Option<&FetchProgress>,
    ) -> Result<Vec<Edge>, PipelineError> {
        let collection = self.collect(progress).await?;
        Ok(self.transformer().edges(&collection.records))
    }

    /// Full build against the configured API: write the HTML report and
    /// return the run summary.
    pub async fn build(
        &self,
        output: Option<&Path>,
        progress: Option<&FetchProgress>,
    ) -> Result<RunSummary, PipelineError> {
        let started_at = Utc::now();
        // COLLECT: roster plus one history per entity
        let collection = self.collect(progress).await?;
        let (_, summary) = self.finish(&collection, output, started_at)?;
        Ok(summary)
    }

    /// Full build against the embedded sample data, no network involved.
    pub async fn demo(
        &self,
        output: Option<&Path>,
    ) -> Result<(Vec<Edge>, RunSummary), PipelineError> {
        let started_at = Utc::now();
        let opts = CollectOptions {
            limit: None,
            skip_failed: false,
            max_in_flight: 1,
        };
        let collection = collector::collect(&SampleSource, &opts, None).await?;
        self.finish(&collection, output, started_at)
    }

    fn finish(
        &self,
        collection: &Collection,
        output: Option<&Path>,
        started_at: DateTime<Utc>,
    ) -> Result<(Vec<Edge>, RunSummary), PipelineError> {
        // TRANSFORM: adjacent pairs, then weighted aggregation
        let transitions = Transformer::transitions(&collection.records);
        let edges = self.transformer().aggregate(&transitions);

        // RENDER: write the document only after everything else succeeded
        let run_id = Uuid::new_v4().to_string();
        let generated_at = Utc::now();
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.report.output.clone());
        let html = report::render_html(&ReportContext {
            title: &self.config.report.title,
            author: &self.config.report.author,
            date: generated_at.date_naive(),
            intro: self.config.report.intro.as_deref(),
            source_name: &self.config.source.base_url,
            entities: collection.roster_len,
            records: collection.records.len(),
            skipped: collection.skipped.len(),
            edges: &edges,
            style: &self.config.report.diagram,
            run_id: &run_id,
            generated_at,
        });
        std::fs::write(&path, html)?;

        let completed_at = Utc::now();
        let duration_ms = (completed_at - started_at).num_milliseconds();
        let summary = RunSummary {
            run_id,
            title: self.config.report.title.clone(),
            entities: collection.roster_len,
            skipped: collection.skipped.clone(),
            records: collection.records.len(),
            transitions: transitions.len(),
            edges: edges.len(),
            started_at,
            completed_at,
            duration_ms,
            output: path,
        };
        Ok((edges, summary))
    }
}

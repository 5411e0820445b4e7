//! Result aggregation
//!
//! Lists the text-like artifacts under a completed run's output location,
//! inlines small ones and points at large ones. A failure on one object is
//! recorded against that object and never stops the others.

use helix_core::domain::artifact::{ArtifactBody, ArtifactSummary, S3Location};
use helix_core::domain::run::RunRecord;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::ObjectStore;
use crate::error::{ClientError, Result};

/// Objects smaller than this are fetched and inlined
pub const INLINE_SIZE_LIMIT: u64 = 10 * 1024;

/// Suffixes of artifacts worth reporting
pub const TEXT_EXTENSIONS: [&str; 3] = [".json", ".txt", ".csv"];

/// Suffix of the artifact summarized in the report
pub const RESULTS_SUFFIX: &str = "results.csv";

pub const RESULTS_PREVIEW_CHARS: usize = 1000;

/// Collects run outputs from the object store
#[derive(Clone)]
pub struct ResultAggregator {
    store: Arc<dyn ObjectStore>,
}

impl ResultAggregator {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Renders the outputs of a completed run
    pub async fn collect(&self, record: &RunRecord) -> String {
        let completed_at = record
            .stop_time
            .map(|time| time.to_rfc3339())
            .unwrap_or_else(|| "Unknown".to_string());
        let mut text = format!("Completed at: {}\n\n", completed_at);

        let Some(uri) = record.output_uri.as_deref().filter(|uri| !uri.is_empty()) else {
            text.push_str("No output URI provided.");
            return text;
        };

        let Some(location) = S3Location::parse(uri) else {
            return format!(
                "Error retrieving results: {}",
                ClientError::InvalidLocation(uri.to_string())
            );
        };

        match self.collect_artifacts(&location).await {
            Ok(artifacts) if artifacts.is_empty() => text.push_str("No output files found."),
            Ok(artifacts) => text.push_str(&render_artifacts(&artifacts)),
            Err(e) => {
                warn!("Failed to list outputs under {}: {}", location, e);
                text.push_str(&format!("Error listing S3 objects: {}", e));
            }
        }

        text
    }

    /// Lists and fetches the text-like artifacts under a location
    ///
    /// Only the listing itself can fail; fetch and decode problems end up in
    /// the affected artifact's body.
    pub async fn collect_artifacts(&self, location: &S3Location) -> Result<Vec<ArtifactSummary>> {
        let entries = self
            .store
            .list_objects(&location.bucket, &location.prefix)
            .await?;

        let mut artifacts = Vec::new();
        for entry in entries.into_iter().filter(|entry| is_text_artifact(&entry.key)) {
            let body = if entry.size_bytes < INLINE_SIZE_LIMIT {
                match self.fetch_text(&location.bucket, &entry.key).await {
                    Ok(content) => ArtifactBody::Inline(content),
                    Err(e) => {
                        warn!("Failed to fetch {}: {}", entry.key, e);
                        ArtifactBody::Error(e.to_string())
                    }
                }
            } else {
                ArtifactBody::Reference(location.object_uri(&entry.key))
            };

            artifacts.push(ArtifactSummary {
                key: entry.key,
                size_bytes: entry.size_bytes,
                body,
            });
        }

        Ok(artifacts)
    }

    async fn fetch_text(&self, bucket: &str, key: &str) -> Result<String> {
        debug!("Fetching s3://{}/{}", bucket, key);
        let bytes = self.store.get_object(bucket, key).await?;
        String::from_utf8(bytes)
            .map_err(|e| ClientError::Storage(format!("{} is not valid UTF-8: {}", key, e)))
    }
}

fn is_text_artifact(key: &str) -> bool {
    TEXT_EXTENSIONS.iter().any(|ext| key.ends_with(ext))
}

fn render_artifacts(artifacts: &[ArtifactSummary]) -> String {
    let mut text = String::from("Output files:\n");

    for artifact in artifacts {
        text.push_str(&format!("- {} ({} bytes)\n", artifact.key, artifact.size_bytes));
        match &artifact.body {
            ArtifactBody::Inline(content) if artifact.key.ends_with(RESULTS_SUFFIX) => {
                let preview: String = content.chars().take(RESULTS_PREVIEW_CHARS).collect();
                text.push_str(&format!("Results summary:\n{}...\n\n", preview));
            }
            ArtifactBody::Inline(_) => {}
            ArtifactBody::Reference(uri) => {
                text.push_str(&format!("  location: {}\n", uri));
            }
            ArtifactBody::Error(message) => {
                text.push_str(&format!("  error: {}\n", message));
            }
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStore;
    use chrono::{TimeZone, Utc};
    use helix_core::domain::run::RunStatus;

    fn completed(output_uri: Option<&str>) -> RunRecord {
        RunRecord {
            stop_time: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap()),
            output_uri: output_uri.map(str::to_string),
            ..RunRecord::new("1234567", RunStatus::Completed)
        }
    }

    fn sample_store() -> FakeStore {
        FakeStore::new()
            .with_sized_object("results", "outputs/run-1/a.csv", 500, "id,score\n1,0.5\n")
            .with_sized_object("results", "outputs/run-1/b.json", 20_000, "{}")
            .with_sized_object(
                "results",
                "outputs/run-1/results.csv",
                800,
                "variant,fitness\nMKV,0.91\n",
            )
    }

    #[tokio::test]
    async fn test_small_files_inline_and_large_files_referenced() {
        let store = Arc::new(sample_store());
        let aggregator = ResultAggregator::new(store.clone());
        let location = S3Location::parse("s3://results/outputs/run-1/").unwrap();

        let artifacts = aggregator.collect_artifacts(&location).await.unwrap();

        assert_eq!(artifacts.len(), 3);
        assert_eq!(artifacts[0].inline_content(), Some("id,score\n1,0.5\n"));
        assert_eq!(
            artifacts[1].body,
            ArtifactBody::Reference("s3://results/outputs/run-1/b.json".to_string())
        );
        assert_eq!(
            artifacts[2].inline_content(),
            Some("variant,fitness\nMKV,0.91\n")
        );

        let fetched = store.fetched.lock().unwrap().clone();
        assert_eq!(
            fetched,
            vec![
                "outputs/run-1/a.csv".to_string(),
                "outputs/run-1/results.csv".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_report_lists_files_and_summarizes_results() {
        let aggregator = ResultAggregator::new(Arc::new(sample_store()));

        let text = aggregator
            .collect(&completed(Some("s3://results/outputs/run-1/")))
            .await;

        assert!(text.starts_with("Completed at: 2025-03-01T12:30:00+00:00\n\n"));
        assert!(text.contains("- outputs/run-1/a.csv (500 bytes)"));
        assert!(text.contains("- outputs/run-1/b.json (20000 bytes)"));
        assert!(text.contains("  location: s3://results/outputs/run-1/b.json"));
        assert!(text.contains("- outputs/run-1/results.csv (800 bytes)"));
        assert!(text.contains("Results summary:\nvariant,fitness\nMKV,0.91\n..."));
        assert!(!text.contains("id,score"));
    }

    #[tokio::test]
    async fn test_results_preview_is_truncated() {
        let long = "x".repeat(RESULTS_PREVIEW_CHARS + 500);
        let store = FakeStore::new().with_object("results", "outputs/run-1/de_results.csv", &long);
        let aggregator = ResultAggregator::new(Arc::new(store));

        let text = aggregator
            .collect(&completed(Some("s3://results/outputs/run-1/")))
            .await;

        assert!(text.contains(&format!("{}...", "x".repeat(RESULTS_PREVIEW_CHARS))));
        assert!(!text.contains(&"x".repeat(RESULTS_PREVIEW_CHARS + 1)));
    }

    #[tokio::test]
    async fn test_non_text_files_are_skipped() {
        let store = FakeStore::new()
            .with_object("results", "outputs/run-1/model.pt", "binary")
            .with_object("results", "outputs/run-1/log.txt", "done");
        let aggregator = ResultAggregator::new(Arc::new(store));
        let location = S3Location::parse("s3://results/outputs/run-1/").unwrap();

        let artifacts = aggregator.collect_artifacts(&location).await.unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].key, "outputs/run-1/log.txt");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_isolated() {
        let store = sample_store()
            .with_raw_object("results", "outputs/run-1/notes.txt", vec![0xff, 0xfe])
            .failing_on("outputs/run-1/a.csv");
        let aggregator = ResultAggregator::new(Arc::new(store));

        let text = aggregator
            .collect(&completed(Some("s3://results/outputs/run-1/")))
            .await;

        assert!(text.contains("- outputs/run-1/a.csv (500 bytes)\n  error: NoSuchKey"));
        assert!(text.contains("- outputs/run-1/notes.txt (2 bytes)\n  error:"));
        assert!(text.contains("not valid UTF-8"));
        assert!(text.contains("Results summary:"));
    }

    #[tokio::test]
    async fn test_no_output_uri() {
        let store = Arc::new(sample_store());
        let aggregator = ResultAggregator::new(store.clone());

        let text = aggregator.collect(&completed(None)).await;

        assert!(text.ends_with("No output URI provided."));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_matching_files() {
        let aggregator = ResultAggregator::new(Arc::new(sample_store()));

        let text = aggregator
            .collect(&completed(Some("s3://results/outputs/other-run/")))
            .await;

        assert!(text.ends_with("No output files found."));
    }

    #[tokio::test]
    async fn test_listing_failure_is_reported() {
        let aggregator = ResultAggregator::new(Arc::new(sample_store().failing_listing()));

        let text = aggregator
            .collect(&completed(Some("s3://results/outputs/run-1/")))
            .await;

        assert!(text.contains("Error listing S3 objects: AccessDenied"));
    }

    #[tokio::test]
    async fn test_unparsable_output_uri() {
        let aggregator = ResultAggregator::new(Arc::new(FakeStore::new()));

        let text = aggregator
            .collect(&completed(Some("https://example.com/out")))
            .await;

        assert!(text.starts_with("Error retrieving results: Invalid output location"));
    }

    #[tokio::test]
    async fn test_missing_stop_time_prints_unknown() {
        let aggregator = ResultAggregator::new(Arc::new(FakeStore::new()));
        let record = RunRecord::new("1234567", RunStatus::Completed);

        let text = aggregator.collect(&record).await;

        assert_eq!(text, "Completed at: Unknown\n\nNo output URI provided.");
    }
}

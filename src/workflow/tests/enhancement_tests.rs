//! Tests for the three-tier enrichment controller.

use std::sync::Arc;
use std::time::Duration;

use super::{ScriptedClient, inbox_note};
use crate::config::WorkflowConfig;
use crate::workflow::{
    adapters::memory::InMemoryBugReportSink,
    domain::{BugReportKind, EnhancementSource, Severity},
    ports::{EnrichmentError, NoteEnhancer},
    services::EnhancementFallbackController,
};
use eyre::{OptionExt, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestController =
    EnhancementFallbackController<ScriptedClient, ScriptedClient, InMemoryBugReportSink, DefaultClock>;

const NOTE: &str = "Inbox/spaced-repetition.md";

#[fixture]
fn reports() -> InMemoryBugReportSink {
    InMemoryBugReportSink::new()
}

fn controller(
    primary: &Arc<ScriptedClient>,
    secondary: &Arc<ScriptedClient>,
    reports: &InMemoryBugReportSink,
) -> TestController {
    EnhancementFallbackController::new(
        Arc::clone(primary),
        Arc::clone(secondary),
        Arc::new(reports.clone()),
        Arc::new(DefaultClock),
        &WorkflowConfig::default(),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn primary_success_uses_no_fallback(reports: InMemoryBugReportSink) -> eyre::Result<()> {
    let primary = ScriptedClient::answering(&["Memory", "Learning Science"], " Reviews space out. ");
    let secondary = ScriptedClient::answering(&["unused"], "unused");

    let result = controller(&primary, &secondary, &reports)
        .enhance(&inbox_note(NOTE), false)
        .await;

    ensure!(result.success);
    ensure!(result.source == Some(EnhancementSource::Primary) && !result.fallback);
    ensure!(result.tags == ["memory", "learning-science"]);
    ensure!(result.summary == "Reviews space out.");
    ensure!(secondary.calls() == 0);
    ensure!(reports.reports()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transient_primary_failure_falls_back_to_secondary(
    reports: InMemoryBugReportSink,
) -> eyre::Result<()> {
    let primary = ScriptedClient::failing(EnrichmentError::Transient("connection refused".into()));
    let secondary = ScriptedClient::answering(&["memory"], "From the API.");

    let result = controller(&primary, &secondary, &reports)
        .enhance(&inbox_note(NOTE), false)
        .await;

    ensure!(result.success && result.fallback);
    ensure!(result.source == Some(EnhancementSource::Secondary));
    ensure!(result.failures.len() == 1);
    ensure!(primary.calls() == 1 && secondary.calls() == 1);
    ensure!(reports.reports()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exhausted_tiers_degrade_and_file_a_report(
    reports: InMemoryBugReportSink,
) -> eyre::Result<()> {
    let primary = ScriptedClient::failing(EnrichmentError::Transient("connection refused".into()));
    let secondary = ScriptedClient::failing(EnrichmentError::Transient("rate limited".into()));

    let result = controller(&primary, &secondary, &reports)
        .enhance(&inbox_note(NOTE), false)
        .await;

    ensure!(!result.success);
    ensure!(result.source == Some(EnhancementSource::Degraded));
    ensure!(result.tags.is_empty() && result.summary.is_empty());
    ensure!(result.bug_report.is_some());

    let filed = reports.reports_of(BugReportKind::AiFailure)?;
    let report = filed.first().ok_or_eyre("AI failure report missing")?;
    ensure!(filed.len() == 1);
    ensure!(report.severity == Severity::High);
    ensure!(report.note.as_str() == NOTE);
    ensure!(report.failures.len() == 2, "both tier causes should be captured");
    ensure!(!report.actions.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_primary_skips_secondary(reports: InMemoryBugReportSink) -> eyre::Result<()> {
    let primary = ScriptedClient::failing(EnrichmentError::Rejected("prompt too long".into()));
    let secondary = ScriptedClient::answering(&["memory"], "unused");

    let result = controller(&primary, &secondary, &reports)
        .enhance(&inbox_note(NOTE), false)
        .await;

    ensure!(result.source == Some(EnhancementSource::Degraded));
    ensure!(secondary.calls() == 0);
    ensure!(reports.reports()?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn primary_timeout_counts_as_transient(reports: InMemoryBugReportSink) -> eyre::Result<()> {
    let primary = ScriptedClient::stalled(Duration::from_secs(5));
    let secondary = ScriptedClient::answering(&["memory"], "After timeout.");

    let result = controller(&primary, &secondary, &reports)
        .with_primary_timeout(Duration::from_millis(20))
        .enhance(&inbox_note(NOTE), false)
        .await;

    ensure!(result.source == Some(EnhancementSource::Secondary));
    ensure!(result.failures.first().is_some_and(|failure| failure.transient));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dry_run_makes_no_calls(reports: InMemoryBugReportSink) -> eyre::Result<()> {
    let primary = ScriptedClient::answering(&["memory"], "unused");
    let secondary = ScriptedClient::answering(&["memory"], "unused");

    let result = controller(&primary, &secondary, &reports)
        .enhance(&inbox_note(NOTE), true)
        .await;

    ensure!(result.dry_run && result.is_skipped());
    ensure!(result.skip_reason() == Some("dry_run"));
    ensure!(primary.calls() == 0 && secondary.calls() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tags_are_capped_to_the_configured_maximum(
    reports: InMemoryBugReportSink,
) -> eyre::Result<()> {
    let primary = ScriptedClient::answering(&["a", "b", "c", "d", "e"], "");
    let secondary = ScriptedClient::answering(&[], "");
    let config = WorkflowConfig {
        max_tags: 2,
        ..WorkflowConfig::default()
    };
    let capped = EnhancementFallbackController::new(
        primary,
        secondary,
        Arc::new(reports),
        Arc::new(DefaultClock),
        &config,
    );

    let result = capped.enhance(&inbox_note(NOTE), false).await;

    ensure!(result.tags == ["a", "b"]);
    Ok(())
}

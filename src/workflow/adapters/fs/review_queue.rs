//! Review-queue sink writing rendered Markdown reports into the vault.

use crate::note::adapters::fs::run_blocking;
use crate::workflow::{
    domain::BugReport,
    ports::{BugReportError, BugReportResult, BugReportSink},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use minijinja::Environment;
use std::sync::Arc;

const REPORT_TEMPLATE: &str = r"# {{ report.kind }} report

- **Severity:** {{ report.severity }}
- **Note:** `{{ report.note }}`
- **Created:** {{ report.created_at }}

## Failures
{% for failure in report.failures %}
### {{ failure.source }}

```
{{ failure.message }}
```
{% else %}
No failure detail was captured.
{% endfor %}
## Actions
{% for action in report.actions %}
- [ ] {{ action }}
{%- endfor %}
";

/// Files reports as Markdown documents in the vault's review queue.
#[derive(Debug, Clone)]
pub struct ReviewQueueSink {
    root: Arc<Dir>,
    directory: Utf8PathBuf,
}

impl ReviewQueueSink {
    /// Creates a sink writing beneath `directory` of `root`.
    #[must_use]
    pub fn new(root: Arc<Dir>, directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root,
            directory: directory.into(),
        }
    }
}

fn unique_location(root: &Dir, directory: &Utf8Path, stem: &str) -> Utf8PathBuf {
    let base = directory.join(format!("{stem}.md"));
    if !root.exists(&base) {
        return base;
    }
    (1_usize..)
        .map(|suffix| directory.join(format!("{stem}-{suffix}.md")))
        .find(|candidate| !root.exists(candidate))
        .unwrap_or(base)
}

fn write_report(
    root: &Dir,
    directory: &Utf8Path,
    stem: &str,
    rendered: &str,
) -> BugReportResult<Utf8PathBuf> {
    root.create_dir_all(directory).map_err(BugReportError::io)?;
    let location = unique_location(root, directory, stem);
    root.write(&location, rendered).map_err(BugReportError::io)?;
    Ok(location)
}

fn render_report(report: &BugReport) -> BugReportResult<String> {
    let environment = Environment::new();
    environment
        .render_str(REPORT_TEMPLATE, minijinja::context! { report => report })
        .map_err(|err| BugReportError::Render(err.to_string()))
}

#[async_trait]
impl BugReportSink for ReviewQueueSink {
    async fn file(&self, report: &BugReport) -> BugReportResult<Utf8PathBuf> {
        let rendered = render_report(report)?;
        let root = Arc::clone(&self.root);
        let directory = self.directory.clone();
        let stem = report.file_stem();
        let location = run_blocking(
            move || write_report(&root, &directory, &stem, &rendered),
            BugReportError::io,
        )
        .await?;

        tracing::warn!(
            report = %location,
            kind = %report.kind,
            severity = %report.severity,
            note = %report.note,
            "filed bug report for review"
        );
        Ok(location)
    }
}

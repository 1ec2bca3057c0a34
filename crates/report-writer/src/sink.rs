use crate::error::WriterError;
use analytics::ReportMetrics;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Destination of finished reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn write(&self, report: &ReportMetrics) -> Result<(), WriterError>;
}

/// Name of the file collecting the reports of `date`, e.g. `report_01-05-24.json`.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("report_{}.json", date.format("%d-%m-%y"))
}

/// Appends each report as a pretty-printed JSON document to a file per local date.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
}

impl JsonFileSink {
    /// Creates the sink, creating `directory` if it does not exist yet.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, WriterError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.directory.join(report_file_name(date))
    }

    /// Appends `report` to the file of `date`.
    pub async fn write_for_date(
        &self,
        report: &ReportMetrics,
        date: NaiveDate,
    ) -> Result<PathBuf, WriterError> {
        let path = self.path_for(date);

        // The whole document goes out in a single write so concurrent readers
        // never see half a report.
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        report.serialize(&mut serializer)?;
        buffer.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&buffer).await?;
        file.flush().await?;

        Ok(path)
    }
}

#[async_trait]
impl ReportSink for JsonFileSink {
    async fn write(&self, report: &ReportMetrics) -> Result<(), WriterError> {
        let path = self.write_for_date(report, Local::now().date_naive()).await?;
        tracing::info!(path = %path.display(), metrics = report.len(), "Report written.");
        Ok(())
    }
}

/// Reads back every report appended to `path`, in write order.
pub async fn read_reports(path: &Path) -> Result<Vec<ReportMetrics>, WriterError> {
    let text = tokio::fs::read_to_string(path).await?;
    let reports = serde_json::Deserializer::from_str(&text)
        .into_iter::<ReportMetrics>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(reports)
}

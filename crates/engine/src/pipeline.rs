use crate::error::EngineError;
use crate::util::engine_settings;
use analytics::{AggregationEngine, ReportMetrics};
use api_client::{CoinMarketCapClient, MarketDataSource};
use configuration::Config;
use report_writer::{JsonFileSink, ReportSink};
use std::sync::Arc;

/// What a single report cycle ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The report was computed and handed to the sink.
    Written(ReportMetrics),
    /// No snapshot was available; nothing was written for this cycle.
    Skipped { reason: &'static str },
}

/// One fetch, aggregate and persist chain.
#[derive(Clone)]
pub struct ReportPipeline {
    source: Arc<dyn MarketDataSource>,
    engine: Arc<AggregationEngine>,
    sink: Arc<dyn ReportSink>,
}

impl ReportPipeline {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        engine: Arc<AggregationEngine>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            source,
            engine,
            sink,
        }
    }

    /// Wires the live CoinMarketCap client and the dated JSON file sink from `config`.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let source = CoinMarketCapClient::new(&config.api)?;
        let sink = JsonFileSink::new(&config.report.output_dir)?;
        let engine = AggregationEngine::new(engine_settings(config));

        Ok(Self::new(Arc::new(source), Arc::new(engine), Arc::new(sink)))
    }

    pub fn engine(&self) -> &AggregationEngine {
        &self.engine
    }

    /// Runs one cycle.
    ///
    /// A failed fetch is logged and reported as `Skipped`, and the sink is not
    /// touched. Only a failure to persist the report is an error.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, EngineError> {
        let assets = match self.source.fetch_snapshot().await {
            Ok(assets) => assets,
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Market snapshot unavailable; skipping this cycle.");
                return Ok(CycleOutcome::Skipped { reason: e.kind() });
            }
        };

        let report = self.engine.build_report(&assets);
        let unavailable = report.unavailable();
        if !unavailable.is_empty() {
            tracing::warn!(?unavailable, "Report written with unavailable metrics.");
        }

        self.sink.write(&report).await?;
        Ok(CycleOutcome::Written(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::EngineSettings;
    use api_client::error::ApiError;
    use async_trait::async_trait;
    use core_types::{AssetRecord, Quote};
    use report_writer::WriterError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedSource(Vec<AssetRecord>);

    #[async_trait]
    impl MarketDataSource for FixedSource {
        async fn fetch_snapshot(&self) -> Result<Vec<AssetRecord>, ApiError> {
            Ok(self.0.clone())
        }
    }

    struct TimeoutSource;

    #[async_trait]
    impl MarketDataSource for TimeoutSource {
        async fn fetch_snapshot(&self) -> Result<Vec<AssetRecord>, ApiError> {
            Err(ApiError::Timeout("operation timed out".to_string()))
        }
    }

    #[derive(Default)]
    struct MemorySink(Mutex<Vec<ReportMetrics>>);

    #[async_trait]
    impl ReportSink for MemorySink {
        async fn write(&self, report: &ReportMetrics) -> Result<(), WriterError> {
            self.0.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl ReportSink for FailingSink {
        async fn write(&self, _report: &ReportMetrics) -> Result<(), WriterError> {
            Err(WriterError::Io(std::io::Error::other("disk full")))
        }
    }

    fn bitcoin() -> AssetRecord {
        AssetRecord {
            name: "Bitcoin".to_string(),
            symbol: "BTC".to_string(),
            quote: HashMap::from([(
                "USD".to_string(),
                Quote {
                    price: Some(64_000.0),
                    volume_24h: Some(3e10),
                    percent_change_1h: Some(0.1),
                    percent_change_24h: Some(1.0),
                    percent_change_7d: Some(-2.0),
                    market_cap: Some(1.2e12),
                },
            )]),
            circulating_supply: Some(19_500_000.0),
            date_added: Some("2013-04-28T00:00:00.000Z".to_string()),
        }
    }

    fn engine() -> Arc<AggregationEngine> {
        Arc::new(AggregationEngine::new(EngineSettings::default()))
    }

    #[tokio::test]
    async fn successful_cycle_writes_one_report() {
        let sink = Arc::new(MemorySink::default());
        let pipeline = ReportPipeline::new(
            Arc::new(FixedSource(vec![bitcoin()])),
            engine(),
            sink.clone(),
        );

        let outcome = pipeline.run_cycle().await.unwrap();
        let written = sink.0.lock().unwrap().clone();
        assert_eq!(written.len(), 1);
        assert_eq!(outcome, CycleOutcome::Written(written[0].clone()));
    }

    #[tokio::test]
    async fn fetch_failure_skips_without_writing() {
        let sink = Arc::new(MemorySink::default());
        let pipeline = ReportPipeline::new(Arc::new(TimeoutSource), engine(), sink.clone());

        let outcome = pipeline.run_cycle().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Skipped { reason: "timeout" });
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sink_failure_is_an_error() {
        let pipeline = ReportPipeline::new(
            Arc::new(FixedSource(vec![bitcoin()])),
            engine(),
            Arc::new(FailingSink),
        );

        assert!(matches!(pipeline.run_cycle().await, Err(EngineError::Sink(_))));
    }

    #[tokio::test]
    async fn from_config_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.report.output_dir = dir.path().join("report");

        let pipeline = ReportPipeline::from_config(&config).unwrap();
        assert!(config.report.output_dir.is_dir());
        assert_eq!(pipeline.engine().settings().basket_depth, 20);
    }
}

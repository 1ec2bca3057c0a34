use analytics::EngineSettings;
use configuration::Config;

/// Extracts the aggregation parameters from the application configuration.
pub fn engine_settings(config: &Config) -> EngineSettings {
    EngineSettings {
        converter: config.converter().to_string(),
        ranking_depth: config.report.ranking_crypto,
        basket_depth: config.report.num_crypto,
        volume_threshold: config.report.max_threshold_volume,
    }
}

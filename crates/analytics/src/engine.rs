use crate::error::AnalyticsError;
use crate::report::{MetricValue, ReportMetrics};
use core_types::{AssetRecord, Direction, PercentWindow};
use std::cmp::Ordering;

/// Depth of the second, fixed-size basket in every report.
pub const FIXED_BASKET_DEPTH: usize = 30;

/// The immutable parameters an `AggregationEngine` is built with.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Currency code whose `Quote` is read from every asset.
    pub converter: String,
    /// Length of the best/worst percent-change lists (R).
    pub ranking_depth: usize,
    /// Default basket size when a caller asks for depth 0 (M).
    pub basket_depth: usize,
    /// Exclusive 24h-volume floor of the threshold basket (T).
    pub volume_threshold: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            converter: "USD".to_string(),
            ranking_depth: 10,
            basket_depth: 20,
            volume_threshold: 76_000_000.0,
        }
    }
}

/// A stateless calculator deriving report metrics from one market snapshot.
///
/// Several operations work on "the first N assets". They rely on the
/// precondition that the snapshot arrives ranked by market capitalization, as
/// the CoinMarketCap listing endpoint delivers it; the engine never re-sorts
/// before taking a prefix.
#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    settings: EngineSettings,
}

impl AggregationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The main entry point: computes every report metric for `assets`.
    ///
    /// Metrics are independent. A metric whose calculation fails is logged and
    /// reported as [`MetricValue::Unavailable`]; the others are still computed.
    pub fn build_report(&self, assets: &[AssetRecord]) -> ReportMetrics {
        let mut report = ReportMetrics::new();
        let depth = self.settings.ranking_depth;

        record(
            &mut report,
            "max_volume_24h".to_string(),
            self.max_volume(assets)
                .map(|(name, volume)| format!("{} {}$", name, volume)),
        );
        record(
            &mut report,
            format!("top_{}_percentage_change_24h", depth),
            self.percent_change_ranking(assets, PercentWindow::OneDay, depth, Direction::Best),
        );
        record(
            &mut report,
            format!("last_{}_percentage_change_24h", depth),
            self.percent_change_ranking(assets, PercentWindow::OneDay, depth, Direction::Worst),
        );
        record(
            &mut report,
            format!("top_{}_percentage_change_7d", depth),
            self.percent_change_ranking(assets, PercentWindow::SevenDays, depth, Direction::Best),
        );
        record(
            &mut report,
            format!("price_first_{}", self.settings.basket_depth),
            self.basket_cost(assets, 0),
        );
        record(
            &mut report,
            format!("price_first_{}", FIXED_BASKET_DEPTH),
            self.basket_cost(assets, FIXED_BASKET_DEPTH),
        );
        record(
            &mut report,
            format!(
                "price_volume_greater_than_{}_24h",
                self.settings.volume_threshold
            ),
            self.threshold_basket_cost(assets, self.settings.volume_threshold),
        );
        record(
            &mut report,
            "earn_percent".to_string(),
            self.investment_return(assets, 0),
        );
        record(
            &mut report,
            "circulating_supply_ranking".to_string(),
            self.supply_ranking(assets, true),
        );
        record(
            &mut report,
            "market_cap_ranking".to_string(),
            self.cap_ranking(assets, true),
        );
        record(
            &mut report,
            "date_added_ranking".to_string(),
            self.date_ranking(assets, true),
        );

        tracing::debug!(
            assets = assets.len(),
            metrics = report.len(),
            unavailable = report.unavailable().len(),
            "Report built."
        );
        report
    }

    /// Returns the name and 24h volume of the most traded asset.
    ///
    /// On equal volumes the asset appearing first wins.
    pub fn max_volume(&self, assets: &[AssetRecord]) -> Result<(String, f64), AnalyticsError> {
        let (first, rest) = assets
            .split_first()
            .ok_or(AnalyticsError::EmptyInput("max_volume_24h"))?;

        let mut leader = first;
        let mut max_volume = first.volume_24h(self.converter())?;
        for asset in rest {
            let volume = asset.volume_24h(self.converter())?;
            if numeric_cmp(&volume, &max_volume) == Ordering::Greater {
                leader = asset;
                max_volume = volume;
            }
        }

        Ok((leader.name.clone(), max_volume))
    }

    /// Ranks assets by their percent change over `window` and keeps the first `top_n`.
    ///
    /// `Best` puts the largest gain first, `Worst` the largest loss. Assets with
    /// equal changes keep their snapshot order.
    pub fn percent_change_ranking(
        &self,
        assets: &[AssetRecord],
        window: PercentWindow,
        top_n: usize,
        direction: Direction,
    ) -> Result<Vec<String>, AnalyticsError> {
        let entries = assets
            .iter()
            .map(|asset| -> Result<(f64, String), AnalyticsError> {
                let change = asset.percent_change(self.converter(), window)?;
                Ok((change, format!("{}: {}", asset.label(), change)))
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;

        let mut ranked = sort_entries(entries, numeric_cmp, direction == Direction::Worst);
        ranked.truncate(top_n);
        Ok(ranked)
    }

    /// Cost of one unit of each of the first `n` assets; `n == 0` uses the basket depth.
    pub fn basket_cost(&self, assets: &[AssetRecord], n: usize) -> Result<f64, AnalyticsError> {
        let depth = self.depth_or_default(n);
        let mut total = 0.0;
        for asset in assets.iter().take(depth) {
            total += asset.price(self.converter())?;
        }
        Ok(total)
    }

    /// Cost of one unit of every asset whose 24h volume is strictly above `threshold`.
    pub fn threshold_basket_cost(
        &self,
        assets: &[AssetRecord],
        threshold: f64,
    ) -> Result<f64, AnalyticsError> {
        let mut total = 0.0;
        for asset in assets {
            if asset.volume_24h(self.converter())? > threshold {
                total += asset.price(self.converter())?;
            }
        }
        Ok(total)
    }

    /// Percentage gain or loss of having bought one unit of each of the first
    /// `n` assets 24 hours ago; `n == 0` uses the basket depth.
    ///
    /// The purchase price is reconstructed as `price / (1 + change_24h / 100)`,
    /// the price that grows into today's by `change_24h` percent. This departs
    /// from the older `price * (1 - change_24h / 100)` approximation, which
    /// does not reproduce the documented -0.965% result for a basket of
    /// (100, +10%), (50, -20%), (200, 0%).
    pub fn investment_return(
        &self,
        assets: &[AssetRecord],
        n: usize,
    ) -> Result<f64, AnalyticsError> {
        let depth = self.depth_or_default(n);
        let mut total_price = 0.0;
        let mut total_purchase = 0.0;

        for asset in assets.iter().take(depth) {
            let price = asset.price(self.converter())?;
            let change = asset.percent_change(self.converter(), PercentWindow::OneDay)?;
            let growth = 1.0 + change / 100.0;
            if growth == 0.0 {
                return Err(AnalyticsError::DivisionByZero("earn_percent"));
            }
            total_price += price;
            total_purchase += price / growth;
        }

        if total_purchase == 0.0 {
            return Err(AnalyticsError::DivisionByZero("earn_percent"));
        }

        Ok((total_price - total_purchase) / total_purchase * 100.0)
    }

    /// Every asset ordered by circulating supply.
    pub fn supply_ranking(
        &self,
        assets: &[AssetRecord],
        ascending: bool,
    ) -> Result<Vec<String>, AnalyticsError> {
        let entries = assets
            .iter()
            .map(|asset| -> Result<(f64, String), AnalyticsError> {
                let supply = asset.circulating_supply()?;
                Ok((supply, format!("{}: {}", asset.label(), supply)))
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;
        Ok(sort_entries(entries, numeric_cmp, ascending))
    }

    /// Every asset ordered by market capitalization.
    pub fn cap_ranking(
        &self,
        assets: &[AssetRecord],
        ascending: bool,
    ) -> Result<Vec<String>, AnalyticsError> {
        let entries = assets
            .iter()
            .map(|asset| -> Result<(f64, String), AnalyticsError> {
                let cap = asset.market_cap(self.converter())?;
                Ok((cap, format!("{}: {}", asset.label(), cap)))
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;
        Ok(sort_entries(entries, numeric_cmp, ascending))
    }

    /// Every asset ordered by the date it was listed.
    pub fn date_ranking(
        &self,
        assets: &[AssetRecord],
        ascending: bool,
    ) -> Result<Vec<String>, AnalyticsError> {
        let entries = assets
            .iter()
            .map(|asset| -> Result<(String, String), AnalyticsError> {
                let date = asset.date_added()?;
                Ok((date.to_string(), format!("{}: {}", asset.label(), date)))
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;
        Ok(sort_entries(entries, String::cmp, ascending))
    }

    fn converter(&self) -> &str {
        &self.settings.converter
    }

    fn depth_or_default(&self, n: usize) -> usize {
        if n == 0 { self.settings.basket_depth } else { n }
    }
}

/// Total order on figures in which `-0.0` and `0.0` compare equal.
fn numeric_cmp(a: &f64, b: &f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Stable sort of `(key, line)` pairs, returning the lines.
///
/// Descending order reverses the comparator rather than the output, so equal
/// keys keep their original relative order in both directions.
fn sort_entries<K>(
    mut entries: Vec<(K, String)>,
    cmp: impl Fn(&K, &K) -> Ordering,
    ascending: bool,
) -> Vec<String> {
    entries.sort_by(|a, b| {
        let ordering = cmp(&a.0, &b.0);
        if ascending { ordering } else { ordering.reverse() }
    });
    entries.into_iter().map(|(_, line)| line).collect()
}

fn record<T: Into<MetricValue>>(
    report: &mut ReportMetrics,
    key: String,
    result: Result<T, AnalyticsError>,
) {
    match result {
        Ok(value) => report.insert(key, value),
        Err(e) => {
            tracing::warn!(metric = %key, error = %e, "Metric unavailable; continuing with the rest of the report.");
            report.insert(key, MetricValue::Unavailable);
        }
    }
}

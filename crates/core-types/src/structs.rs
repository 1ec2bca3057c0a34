use crate::enums::PercentWindow;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Market figures for one asset, expressed in a single converter currency.
///
/// Every figure is optional because the upstream listing reports `null` for
/// assets it has no data for; the accessors on [`AssetRecord`] turn an absent
/// figure into a [`CoreError::MissingField`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub percent_change_1h: Option<f64>,
    #[serde(default)]
    pub percent_change_24h: Option<f64>,
    #[serde(default)]
    pub percent_change_7d: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl Quote {
    pub fn percent_change(&self, window: PercentWindow) -> Option<f64> {
        match window {
            PercentWindow::OneHour => self.percent_change_1h,
            PercentWindow::OneDay => self.percent_change_24h,
            PercentWindow::SevenDays => self.percent_change_7d,
        }
    }
}

/// One cryptocurrency as delivered by the market data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
    pub symbol: String,
    /// Quotes keyed by currency code (e.g. "USD").
    #[serde(default)]
    pub quote: HashMap<String, Quote>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    /// ISO-8601 timestamp; lexicographic order equals chronological order.
    #[serde(default)]
    pub date_added: Option<String>,
}

impl AssetRecord {
    /// Returns the quote for `converter`, or a `MissingQuote` error naming this asset.
    pub fn quote_in(&self, converter: &str) -> Result<&Quote, CoreError> {
        self.quote.get(converter).ok_or_else(|| CoreError::MissingQuote {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            converter: converter.to_string(),
        })
    }

    pub fn price(&self, converter: &str) -> Result<f64, CoreError> {
        let quote = self.quote_in(converter)?;
        self.require(quote.price, "price")
    }

    pub fn volume_24h(&self, converter: &str) -> Result<f64, CoreError> {
        let quote = self.quote_in(converter)?;
        self.require(quote.volume_24h, "volume_24h")
    }

    pub fn market_cap(&self, converter: &str) -> Result<f64, CoreError> {
        let quote = self.quote_in(converter)?;
        self.require(quote.market_cap, "market_cap")
    }

    pub fn percent_change(
        &self,
        converter: &str,
        window: PercentWindow,
    ) -> Result<f64, CoreError> {
        let quote = self.quote_in(converter)?;
        self.require(quote.percent_change(window), window.field_name())
    }

    pub fn circulating_supply(&self) -> Result<f64, CoreError> {
        self.require(self.circulating_supply, "circulating_supply")
    }

    pub fn date_added(&self) -> Result<&str, CoreError> {
        self.date_added
            .as_deref()
            .ok_or_else(|| self.missing("date_added"))
    }

    /// The "{name} {symbol}" prefix shared by every ranking entry.
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.symbol)
    }

    fn require(&self, value: Option<f64>, field: &'static str) -> Result<f64, CoreError> {
        value.ok_or_else(|| self.missing(field))
    }

    fn missing(&self, field: &'static str) -> CoreError {
        CoreError::MissingField {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            field,
        }
    }
}

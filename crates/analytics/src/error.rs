use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to calculate '{0}': the asset list is empty")]
    EmptyInput(&'static str),

    #[error("Asset '{name}' ({symbol}) is missing '{field}'")]
    MissingField {
        name: String,
        symbol: String,
        field: String,
    },

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionByZero(&'static str),
}

impl From<CoreError> for AnalyticsError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MissingQuote {
                name,
                symbol,
                converter,
            } => AnalyticsError::MissingField {
                name,
                symbol,
                field: format!("quote.{}", converter),
            },
            CoreError::MissingField {
                name,
                symbol,
                field,
            } => AnalyticsError::MissingField {
                name,
                symbol,
                field: field.to_string(),
            },
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Asset '{name}' ({symbol}) has no quote for converter '{converter}'")]
    MissingQuote {
        name: String,
        symbol: String,
        converter: String,
    },

    #[error("Asset '{name}' ({symbol}) is missing field '{field}'")]
    MissingField {
        name: String,
        symbol: String,
        field: &'static str,
    },
}

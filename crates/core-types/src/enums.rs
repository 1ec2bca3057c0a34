/// The time horizon of a percent-change figure reported by the market data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PercentWindow {
    OneHour,
    OneDay,
    SevenDays,
}

impl PercentWindow {
    /// Name of the `Quote` field carrying this window, used in error messages.
    pub fn field_name(&self) -> &'static str {
        match self {
            PercentWindow::OneHour => "percent_change_1h",
            PercentWindow::OneDay => "percent_change_24h",
            PercentWindow::SevenDays => "percent_change_7d",
        }
    }
}

/// Which end of a percent-change ranking to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Largest gain first.
    Best,
    /// Largest loss first.
    Worst,
}

//! Fund report for ETFs, plus a simple screen on fees, size and rating.

use super::format;
use crate::domain::{QuoteRecord, Symbol};
use std::fmt;

/// Screen thresholds for [`EtfVerdict::assess`]. The expense ratio is a
/// fraction: 0.002 is 0.2% a year.
pub const MAX_EXPENSE_RATIO: f64 = 0.002;
pub const MIN_TOTAL_ASSETS: f64 = 1_000_000_000.0;
pub const MIN_OVERALL_RATING: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EtfReport {
    pub symbol: Symbol,
    pub name: String,
    pub fund_family: Option<String>,
    pub category: Option<String>,
    pub exchange: Option<String>,

    pub price: Option<f64>,
    pub week52_high: Option<f64>,
    pub week52_low: Option<f64>,
    /// Trailing one-year yield as a fraction.
    pub one_year_return: Option<f64>,

    /// Annual expense ratio as a fraction (0.0018 is 0.18%).
    pub expense_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub dividend_rate: Option<f64>,

    pub beta: Option<f64>,
    pub risk_rating: Option<f64>,
    pub overall_rating: Option<f64>,

    pub total_assets: Option<f64>,
    pub volume: Option<f64>,
    pub average_volume: Option<f64>,
}

impl EtfReport {
    pub fn from_record(record: &QuoteRecord) -> Self {
        let s = |keys: &[&str]| record.first_str(keys).map(str::to_string);
        Self {
            symbol: record.symbol.clone(),
            name: record
                .first_str(&["longName", "shortName"])
                .unwrap_or(record.symbol.as_str())
                .to_string(),
            fund_family: s(&["fundFamily", "family"]),
            category: s(&["category", "categoryName"]),
            exchange: s(&["exchange", "exchangeName", "fullExchangeName"]),

            price: record.first_f64(&["currentPrice", "regularMarketPrice", "navPrice"]),
            week52_high: record.f64("fiftyTwoWeekHigh"),
            week52_low: record.f64("fiftyTwoWeekLow"),
            one_year_return: record.f64("yield"),

            expense_ratio: expense_ratio(record),
            dividend_yield: record.first_f64(&["dividendYield", "trailingAnnualDividendYield"]),
            dividend_rate: record.first_f64(&["dividendRate", "trailingAnnualDividendRate"]),

            beta: record.first_f64(&["beta", "beta3Year"]),
            risk_rating: record.f64("morningStarRiskRating"),
            overall_rating: record.f64("morningStarOverallRating"),

            total_assets: record.first_f64(&["totalAssets", "netAssets"]),
            volume: record.first_f64(&["volume", "regularMarketVolume"]),
            average_volume: record.first_f64(&["averageVolume", "averageDailyVolume3Month"]),
        }
    }

    pub fn verdict(&self) -> EtfVerdict {
        EtfVerdict::assess(self)
    }
}

/// Yahoo reports `netExpenseRatio` and `expenseRatio` in percent but
/// `annualReportExpenseRatio` as a fraction; normalise to a fraction.
fn expense_ratio(record: &QuoteRecord) -> Option<f64> {
    record
        .first_f64(&["netExpenseRatio", "expenseRatio"])
        .map(|pct| pct / 100.0)
        .or_else(|| record.f64("annualReportExpenseRatio"))
}

/// Outcome of the fee / size / rating screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtfVerdict {
    /// Low fees, large fund, highly rated.
    Strong,
    /// At least one criterion failed or is unknown.
    Investigate,
}

impl EtfVerdict {
    pub fn assess(report: &EtfReport) -> Self {
        let cheap = report.expense_ratio.is_some_and(|r| r < MAX_EXPENSE_RATIO);
        let large = report.total_assets.is_some_and(|a| a > MIN_TOTAL_ASSETS);
        let rated = report
            .overall_rating
            .is_some_and(|r| r >= MIN_OVERALL_RATING);
        if cheap && large && rated {
            EtfVerdict::Strong
        } else {
            EtfVerdict::Investigate
        }
    }
}

impl fmt::Display for EtfVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtfVerdict::Strong => f.write_str(
                "This ETF looks strong based on low fees, high AUM, and performance.",
            ),
            EtfVerdict::Investigate => {
                f.write_str("This ETF may not meet best-in-class criteria. Investigate further.")
            }
        }
    }
}

fn line(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "{:<32}{value}", format!("{label}:"))
}

impl fmt::Display for EtfReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== {} ({}) ==========", self.name, self.symbol)?;
        line(f, "Fund Family", format::text(self.fund_family.as_deref()))?;
        line(f, "Category", format::text(self.category.as_deref()))?;
        line(f, "Exchange", format::text(self.exchange.as_deref()))?;

        writeln!(f, "\nPrice & Performance:")?;
        line(f, "Current Price", &format::price(self.price))?;
        line(f, "52-Week High", &format::price(self.week52_high))?;
        line(f, "52-Week Low", &format::price(self.week52_low))?;
        line(f, "1y Return", &format::percent(self.one_year_return))?;

        writeln!(f, "\nFees & Yield:")?;
        line(f, "Expense Ratio", &format::percent(self.expense_ratio))?;
        line(f, "Dividend Yield", &format::percent(self.dividend_yield))?;
        line(f, "Annual Dividend", &format::price(self.dividend_rate))?;

        writeln!(f, "\nRisk & Volatility:")?;
        line(f, "Beta", &format::ratio(self.beta))?;
        line(f, "Morningstar Risk Rating", &format::decimal(self.risk_rating, 0))?;
        line(f, "Morningstar Overall Rating", &format::decimal(self.overall_rating, 0))?;

        writeln!(f, "\nFund Size & Liquidity:")?;
        line(f, "AUM (Assets Under Management)", &format::money(self.total_assets))?;
        line(f, "Volume", &format::count(self.volume))?;
        line(f, "Average Volume", &format::count(self.average_volume))?;

        writeln!(f, "\n{}", self.verdict())
    }
}

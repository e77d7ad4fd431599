//! Company report: the fixed projection of a quote record printed by `info`
//! and written as one spreadsheet row by `export`.

use super::format;
use crate::domain::{QuoteRecord, Symbol};
use chrono::NaiveDate;
use std::fmt;

/// Characters of the business summary shown on the console.
pub const SUMMARY_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct StockReport {
    pub symbol: Symbol,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub summary: Option<String>,

    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub forward_pe: Option<f64>,

    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margin: Option<f64>,

    pub revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub net_income: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,

    pub dividend_yield: Option<f64>,
    pub dividend_rate: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub ex_dividend_date: Option<NaiveDate>,

    pub total_debt: Option<f64>,
    pub current_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,

    pub recommendation: Option<String>,
    pub target_mean: Option<f64>,
    pub target_high: Option<f64>,
    pub target_low: Option<f64>,

    pub current_price: Option<f64>,
    pub week52_high: Option<f64>,
    pub week52_low: Option<f64>,
    pub last_trade: Option<NaiveDate>,
}

impl StockReport {
    pub fn from_record(record: &QuoteRecord) -> Self {
        let s = |k: &str| record.str(k).map(str::to_string);
        Self {
            symbol: record.symbol.clone(),
            name: record
                .first_str(&["longName", "shortName"])
                .unwrap_or(record.symbol.as_str())
                .to_string(),
            sector: s("sector"),
            industry: s("industry"),
            website: s("website"),
            exchange: record
                .first_str(&["exchange", "exchangeName", "fullExchangeName"])
                .map(str::to_string),
            currency: record
                .first_str(&["financialCurrency", "currency"])
                .map(str::to_string),
            summary: s("longBusinessSummary"),

            market_cap: record.f64("marketCap"),
            trailing_pe: record.f64("trailingPE"),
            peg_ratio: record.first_f64(&["pegRatio", "trailingPegRatio"]),
            price_to_book: record.f64("priceToBook"),
            forward_pe: record.f64("forwardPE"),

            return_on_equity: record.f64("returnOnEquity"),
            return_on_assets: record.f64("returnOnAssets"),
            profit_margin: record.f64("profitMargins"),

            revenue: record.f64("totalRevenue"),
            gross_profit: record.f64("grossProfits"),
            net_income: record.f64("netIncomeToCommon"),
            revenue_growth: record.first_f64(&["revenueQuarterlyGrowth", "revenueGrowth"]),
            earnings_growth: record.f64("earningsQuarterlyGrowth"),

            dividend_yield: record.first_f64(&["dividendYield", "trailingAnnualDividendYield"]),
            dividend_rate: record.first_f64(&["dividendRate", "trailingAnnualDividendRate"]),
            payout_ratio: record.f64("payoutRatio"),
            ex_dividend_date: record.date("exDividendDate"),

            total_debt: record.f64("totalDebt"),
            current_ratio: record.f64("currentRatio"),
            debt_to_equity: record.f64("debtToEquity"),

            recommendation: record
                .str("recommendationKey")
                .map(|r| r.to_ascii_uppercase()),
            target_mean: record.f64("targetMeanPrice"),
            target_high: record.f64("targetHighPrice"),
            target_low: record.f64("targetLowPrice"),

            current_price: record.first_f64(&["currentPrice", "regularMarketPrice"]),
            week52_high: record.f64("fiftyTwoWeekHigh"),
            week52_low: record.f64("fiftyTwoWeekLow"),
            last_trade: record.date("regularMarketTime"),
        }
    }
}

fn line(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "{:<28}{value}", format!("{label}:"))
}

impl fmt::Display for StockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== {} ({}) ==========", self.name, self.symbol)?;

        writeln!(f, "\nCompany Info:")?;
        line(f, "Sector", format::text(self.sector.as_deref()))?;
        line(f, "Industry", format::text(self.industry.as_deref()))?;
        line(f, "Website", format::text(self.website.as_deref()))?;
        line(f, "Exchange", format::text(self.exchange.as_deref()))?;
        line(f, "Currency", format::text(self.currency.as_deref()))?;
        let summary = self
            .summary
            .as_deref()
            .map(|s| format::truncate(s, SUMMARY_CHARS))
            .unwrap_or_else(|| "No description available".into());
        line(f, "Description", &summary)?;

        writeln!(f, "\nMarket & Valuation:")?;
        line(f, "Market Cap", &format::money(self.market_cap))?;
        line(f, "PE Ratio (TTM)", &format::ratio(self.trailing_pe))?;
        line(f, "PEG Ratio (5 yr expected)", &format::ratio(self.peg_ratio))?;
        line(f, "Price to Book", &format::ratio(self.price_to_book))?;
        line(f, "Forward PE", &format::ratio(self.forward_pe))?;

        writeln!(f, "\nProfitability:")?;
        line(f, "Return on Equity (ROE)", &format::percent(self.return_on_equity))?;
        line(f, "Return on Assets (ROA)", &format::percent(self.return_on_assets))?;
        line(f, "Profit Margin", &format::percent(self.profit_margin))?;

        writeln!(f, "\nFinancial Performance:")?;
        line(f, "Revenue (TTM)", &format::money(self.revenue))?;
        line(f, "Gross Profit", &format::money(self.gross_profit))?;
        line(f, "Net Income", &format::money(self.net_income))?;
        line(f, "Quarterly Revenue Growth", &format::percent(self.revenue_growth))?;
        line(f, "Quarterly Earnings Growth", &format::percent(self.earnings_growth))?;

        writeln!(f, "\nDividends:")?;
        line(f, "Dividend Yield", &format::percent(self.dividend_yield))?;
        line(f, "Dividend Rate", &format::price(self.dividend_rate))?;
        line(f, "Payout Ratio", &format::percent(self.payout_ratio))?;
        line(f, "Ex-Dividend Date", &format::date(self.ex_dividend_date))?;

        writeln!(f, "\nBalance Sheet:")?;
        line(f, "Total Debt", &format::money(self.total_debt))?;
        line(f, "Current Ratio", &format::ratio(self.current_ratio))?;
        line(f, "Debt to Equity", &format::ratio(self.debt_to_equity))?;

        writeln!(f, "\nAnalyst Recommendation:")?;
        line(f, "Recommendation", format::text(self.recommendation.as_deref()))?;
        line(f, "Target Mean Price", &format::price(self.target_mean))?;
        line(f, "Target High Price", &format::price(self.target_high))?;
        line(f, "Target Low Price", &format::price(self.target_low))?;

        writeln!(f, "\nPrice Data:")?;
        line(f, "Current Price", &format::price(self.current_price))?;
        line(f, "52-Week High", &format::price(self.week52_high))?;
        line(f, "52-Week Low", &format::price(self.week52_low))?;
        line(f, "Last Trade", &format::date(self.last_trade))
    }
}

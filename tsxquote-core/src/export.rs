//! Spreadsheet export.
//!
//! Writes a sheet with a header row and one row per symbol, symbol in the
//! first column. The file extension picks the format: `.xlsx` writes an Excel
//! workbook with a single sheet, anything else writes CSV. Numbers are written
//! unformatted so spreadsheet tools can sort and compute on them.

use crate::data::DataError;
use crate::domain::Symbol;
use crate::report::StockReport;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the single sheet in an `.xlsx` export.
pub const SHEET_NAME: &str = "TSX Symbols";

/// Header of the full export, in column order.
pub const EXPORT_COLUMNS: &[&str] = &[
    "Symbol",
    "Name",
    "Sector",
    "Industry",
    "Exchange",
    "Currency",
    "Price",
    "Market Cap",
    "PE Ratio (TTM)",
    "Forward PE",
    "PEG Ratio",
    "Price to Book",
    "Dividend Yield",
    "Payout Ratio",
    "Profit Margin",
    "Return on Equity",
    "Revenue (TTM)",
    "Net Income",
    "Total Debt",
    "Debt to Equity",
    "Recommendation",
    "Target Mean Price",
    "52-Week High",
    "52-Week Low",
    "Error",
];

/// What goes into each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Symbol plus the derived report fields; one provider call per symbol.
    #[default]
    Full,
    /// Just the symbol column; no provider calls.
    SymbolsOnly,
}

impl ExportMode {
    pub fn header(self) -> &'static [&'static str] {
        match self {
            ExportMode::Full => EXPORT_COLUMNS,
            ExportMode::SymbolsOnly => &EXPORT_COLUMNS[..1],
        }
    }
}

/// File format, chosen from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Xlsx,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => SheetFormat::Xlsx,
            _ => SheetFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub path: PathBuf,
    pub mode: ExportMode,
    /// Keep an existing file and pick `stem_N.ext` instead.
    pub no_clobber: bool,
}

impl ExportOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: ExportMode::Full,
            no_clobber: false,
        }
    }
}

/// Summary of an export run.
#[derive(Debug)]
pub struct ExportSummary {
    /// File actually written.
    pub path: PathBuf,
    /// Data rows written (excluding the header).
    pub rows: usize,
    pub failed: Vec<(Symbol, DataError)>,
}

impl ExportSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The path to write to: `path` itself, or with `no_clobber` the first of
/// `stem_1.ext`, `stem_2.ext`, ... that does not exist yet.
pub fn resolve_output_path(path: &Path, no_clobber: bool) -> PathBuf {
    if !no_clobber || !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    (1u32..)
        .map(|n| {
            let name = match &ext {
                Some(ext) => format!("{stem}_{n}.{ext}"),
                None => format!("{stem}_{n}"),
            };
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(v: &Option<String>) -> Self {
        v.clone().map_or(Cell::Empty, Cell::Text)
    }

    fn number(v: Option<f64>) -> Self {
        v.map_or(Cell::Empty, Cell::Number)
    }

    fn to_csv(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

enum Sink {
    Csv(csv::Writer<File>),
    /// Rows accumulate in memory; the workbook is saved on finish.
    Xlsx(Box<Worksheet>),
}

/// Row-at-a-time sheet writer.
pub struct SheetWriter {
    sink: Sink,
    mode: ExportMode,
    path: PathBuf,
    rows: usize,
}

fn file_error(path: &Path, err: std::io::Error) -> DataError {
    DataError::Export(format!("{}: {err}", path.display()))
}

impl SheetWriter {
    /// Create (or truncate) the file and write the header row.
    ///
    /// CSV files are created immediately; `.xlsx` files are written by
    /// [`SheetWriter::finish`].
    pub fn create(path: &Path, mode: ExportMode) -> Result<Self, DataError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| file_error(parent, e))?;
        }
        let header: Vec<Cell> = mode
            .header()
            .iter()
            .map(|h| Cell::Text((*h).to_string()))
            .collect();

        let sink = match SheetFormat::from_path(path) {
            SheetFormat::Csv => Sink::Csv(csv::Writer::from_path(path)?),
            SheetFormat::Xlsx => {
                let mut sheet = Worksheet::new();
                sheet.set_name(SHEET_NAME)?;
                Sink::Xlsx(Box::new(sheet))
            }
        };
        let mut writer = Self {
            sink,
            mode,
            path: path.to_path_buf(),
            rows: 0,
        };
        writer.write_cells(0, &header)?;
        debug!("writing {}", path.display());
        Ok(writer)
    }

    /// Write one row. Report fields are left empty when `report` is `None`;
    /// `error` fills the last column of a full export.
    pub fn write_row(
        &mut self,
        symbol: &Symbol,
        report: Option<&StockReport>,
        error: Option<&DataError>,
    ) -> Result<(), DataError> {
        let cells = match self.mode {
            ExportMode::SymbolsOnly => vec![Cell::Text(symbol.to_string())],
            ExportMode::Full => {
                let mut cells = match report {
                    Some(r) => report_cells(r),
                    None => {
                        let mut empty = vec![Cell::Empty; EXPORT_COLUMNS.len() - 1];
                        empty[0] = Cell::Text(symbol.to_string());
                        empty
                    }
                };
                cells.push(error.map_or(Cell::Empty, |e| Cell::Text(e.to_string())));
                cells
            }
        };
        self.write_cells(self.rows + 1, &cells)?;
        self.rows += 1;
        Ok(())
    }

    fn write_cells(&mut self, row: usize, cells: &[Cell]) -> Result<(), DataError> {
        match &mut self.sink {
            Sink::Csv(writer) => writer.write_record(cells.iter().map(Cell::to_csv))?,
            Sink::Xlsx(sheet) => {
                let row = u32::try_from(row)
                    .map_err(|_| DataError::Export(format!("row {row} exceeds the sheet")))?;
                for (col, cell) in cells.iter().enumerate() {
                    let col = u16::try_from(col)
                        .map_err(|_| DataError::Export(format!("column {col} exceeds the sheet")))?;
                    match cell {
                        Cell::Text(s) => {
                            sheet.write_string(row, col, s.as_str())?;
                        }
                        Cell::Number(n) => {
                            sheet.write_number(row, col, *n)?;
                        }
                        Cell::Empty => {}
                    }
                }
            }
        }
        Ok(())
    }

    /// Flush and return the path and number of data rows written.
    pub fn finish(self) -> Result<(PathBuf, usize), DataError> {
        match self.sink {
            Sink::Csv(mut writer) => writer.flush().map_err(|e| file_error(&self.path, e))?,
            Sink::Xlsx(sheet) => {
                let mut workbook = Workbook::new();
                workbook.push_worksheet(*sheet);
                workbook.save(&self.path)?;
            }
        }
        Ok((self.path, self.rows))
    }
}

/// Every column of [`EXPORT_COLUMNS`] except the trailing `Error`.
fn report_cells(r: &StockReport) -> Vec<Cell> {
    vec![
        Cell::Text(r.symbol.to_string()),
        Cell::Text(r.name.clone()),
        Cell::text(&r.sector),
        Cell::text(&r.industry),
        Cell::text(&r.exchange),
        Cell::text(&r.currency),
        Cell::number(r.current_price),
        Cell::number(r.market_cap),
        Cell::number(r.trailing_pe),
        Cell::number(r.forward_pe),
        Cell::number(r.peg_ratio),
        Cell::number(r.price_to_book),
        Cell::number(r.dividend_yield),
        Cell::number(r.payout_ratio),
        Cell::number(r.profit_margin),
        Cell::number(r.return_on_equity),
        Cell::number(r.revenue),
        Cell::number(r.net_income),
        Cell::number(r.total_debt),
        Cell::number(r.debt_to_equity),
        Cell::text(&r.recommendation),
        Cell::number(r.target_mean),
        Cell::number(r.week52_high),
        Cell::number(r.week52_low),
    ]
}

use crate::domain::pricing::parse_cost_price;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// One structurally valid CSV row, before any field is interpreted.
/// Columns absent from the file are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data line (the header is line 0)
    pub line: u64,
    pub item_code: String,
    pub description: String,
    pub unit: String,
    pub cost_price: String,
    pub price_unit: String,
    pub price_group: String,
    pub issuance_date: String,
}

/// A price list line item with every field parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    /// 1-based data line the record came from
    pub line: u64,
    pub item_code: String,
    pub description: String,
    pub unit: String,
    pub cost_price: Decimal,
    /// Marker stripped from the cost column, e.g. "€"
    pub source_currency: Option<String>,
    pub price_unit: u32,
    pub price_group: i32,
    pub issuance_date: Option<NaiveDate>,
}

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];

impl InputRecord {
    pub fn try_from_raw(raw: &RawRow) -> Result<Self> {
        let (cost_price, source_currency) =
            parse_cost_price(&raw.cost_price).map_err(|reason| EtlError::InvalidCostPrice {
                item_code: raw.item_code.clone(),
                line: raw.line,
                value: raw.cost_price.clone(),
                reason,
            })?;

        let price_unit = parse_int_field::<u32>(raw, "PriceUnit", &raw.price_unit)?;
        let price_group = parse_int_field::<i32>(raw, "PriceGroup", &raw.price_group)?;

        let issuance_date = parse_date(&raw.issuance_date);
        if issuance_date.is_none() && !raw.issuance_date.is_empty() {
            tracing::debug!(
                "Ignoring unparseable issuance date '{}' for item {}",
                raw.issuance_date,
                raw.item_code
            );
        }

        Ok(Self {
            line: raw.line,
            item_code: raw.item_code.clone(),
            description: raw.description.clone(),
            unit: raw.unit.clone(),
            cost_price,
            source_currency,
            price_unit,
            price_group,
            issuance_date,
        })
    }
}

// 空欄位視為 0，跟缺少欄位一樣
fn parse_int_field<T>(raw: &RawRow, field: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr + Default,
{
    if value.is_empty() {
        return Ok(T::default());
    }
    value.parse::<T>().map_err(|_| EtlError::InvalidField {
        item_code: raw.item_code.clone(),
        line: raw.line,
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    // CSV exports often carry a time component, only the date part matters
    let date_part = value.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// An amount in a named currency, displayed as "96.98 DKK".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the consolidated price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Varenummer")]
    pub item_code: String,
    #[serde(rename = "Navn")]
    pub name: String,
    #[serde(rename = "KostIDkk")]
    pub cost: Money,
    #[serde(rename = "BeregnetSalgsPrisIDkk")]
    pub sale_price: Money,
}

pub const OUTPUT_HEADERS: [&str; 4] = ["Varenummer", "Navn", "KostIDkk", "BeregnetSalgsPrisIDkk"];

/// Things the operator should know about after a run. None of them stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunIssue {
    MissingSource {
        source: String,
    },
    UnreadableSource {
        source: String,
        reason: String,
    },
    RecordSkipped {
        source: String,
        line: u64,
        reason: String,
    },
    SourceAborted {
        source: String,
        line: u64,
        reason: String,
    },
    DefaultMarkupApplied {
        source: String,
        item_code: String,
        price_group: i32,
    },
}

impl fmt::Display for RunIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunIssue::MissingSource { source } => write!(f, "{}: file not found, skipped", source),
            RunIssue::UnreadableSource { source, reason } => {
                write!(f, "{}: could not be parsed ({}), skipped", source, reason)
            }
            RunIssue::RecordSkipped {
                source,
                line,
                reason,
            } => write!(f, "{} line {}: record skipped ({})", source, line, reason),
            RunIssue::SourceAborted {
                source,
                line,
                reason,
            } => write!(f, "{} line {}: file discarded ({})", source, line, reason),
            RunIssue::DefaultMarkupApplied {
                source,
                item_code,
                price_group,
            } => write!(
                f,
                "{}: price group {} for item {} is invalid, default markup used",
                source, price_group, item_code
            ),
        }
    }
}

/// Rows read from one input file.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: String,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub batches: Vec<SourceBatch>,
    pub issues: Vec<RunIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<OutputRecord>,
    pub issues: Vec<RunIssue>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub records_written: usize,
    pub issues: Vec<RunIssue>,
}

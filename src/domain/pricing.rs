//! Markup, currency conversion and rounding of a single price list line.

use crate::domain::model::{InputRecord, Money, OutputRecord, RawRow};
use crate::utils::error::EtlError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Price group that maps to the first markup tier.
pub const GROUP_OFFSET: i32 = 21;

/// Markup per tier in percent, starting at `GROUP_OFFSET`.
const STANDARD_MARKUP_PERCENT: [i64; 5] = [30, 50, 40, 40, 50];

const DEFAULT_MARKUP_PERCENT: i64 = 30;

/// EUR -> DKK, expressed per 100 source units.
pub const DEFAULT_EXCHANGE_RATE: i64 = 746;

pub const DEFAULT_CURRENCY: &str = "DKK";

/// Rounds a currency amount to 2 decimals, ties to even (banker's rounding).
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Parses a cost column such as "12.50 €" into the amount and the trailing
/// currency marker. A lone comma is a decimal separator. When both ',' and '.'
/// appear, the one that comes last is the decimal separator and the other one
/// groups thousands ("1,234.50" and "1.234,50" are both 1234.50).
pub fn parse_cost_price(value: &str) -> Result<(Decimal, Option<String>), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("cost price is empty".to_string());
    }

    let number_end = trimmed
        .rfind(|c: char| c.is_ascii_digit())
        .map(|idx| idx + 1)
        .ok_or_else(|| "no digits in cost price".to_string())?;
    let (number, marker) = trimmed.split_at(number_end);
    let marker = marker.trim();

    let number = number.trim();
    let normalized = match (number.rfind(','), number.rfind('.')) {
        (Some(comma), Some(dot)) if dot > comma => number.replace(',', ""),
        (Some(_), Some(_)) => number.replace('.', "").replace(',', "."),
        (Some(_), None) => number.replace(',', "."),
        _ => number.to_string(),
    };

    let amount = Decimal::from_str(&normalized).map_err(|e| e.to_string())?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err("cost price cannot be negative".to_string());
    }

    let marker = (!marker.is_empty()).then(|| marker.to_string());
    Ok((amount, marker))
}

/// Target currency units per 100 source units, e.g. 746 DKK for 100 EUR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    pub fn per_hundred(rate: Decimal) -> Self {
        Self(rate)
    }

    pub fn per_hundred_value(self) -> Decimal {
        self.0
    }

    /// Converts `amount` into the target currency. `None` when it overflows.
    pub fn apply(self, amount: Decimal) -> Option<Decimal> {
        amount
            .checked_mul(self.0)?
            .checked_div(Decimal::ONE_HUNDRED)
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self(Decimal::new(DEFAULT_EXCHANGE_RATE, 0))
    }
}

/// Which markup a price group resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupLookup {
    Table(Decimal),
    Fallback(Decimal),
}

impl MarkupLookup {
    pub fn fraction(self) -> Decimal {
        match self {
            MarkupLookup::Table(m) | MarkupLookup::Fallback(m) => m,
        }
    }
}

/// Immutable price group -> markup fraction mapping with a default for unknown groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupTable {
    markups: BTreeMap<i32, Decimal>,
    default_markup: Decimal,
}

impl MarkupTable {
    pub fn new(markups: BTreeMap<i32, Decimal>, default_markup: Decimal) -> Self {
        Self {
            markups,
            default_markup,
        }
    }

    pub fn standard() -> Self {
        let markups = STANDARD_MARKUP_PERCENT
            .iter()
            .enumerate()
            .map(|(idx, percent)| (GROUP_OFFSET + idx as i32, Decimal::new(*percent, 2)))
            .collect();
        Self::new(markups, Decimal::new(DEFAULT_MARKUP_PERCENT, 2))
    }

    pub fn lookup(&self, price_group: i32) -> MarkupLookup {
        match self.markups.get(&price_group) {
            Some(markup) => MarkupLookup::Table(*markup),
            None => MarkupLookup::Fallback(self.default_markup),
        }
    }

    pub fn default_markup(&self) -> Decimal {
        self.default_markup
    }

    pub fn groups(&self) -> impl Iterator<Item = (i32, Decimal)> + '_ {
        self.markups.iter().map(|(group, markup)| (*group, *markup))
    }
}

impl Default for MarkupTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Result of pricing one row.
#[derive(Debug)]
pub enum TransformOutcome {
    Priced(OutputRecord),
    DefaultMarkup {
        record: OutputRecord,
        price_group: i32,
    },
    ParseFailure(EtlError),
}

#[derive(Debug, Clone)]
pub struct PriceTransformer {
    markups: MarkupTable,
    exchange_rate: ExchangeRate,
    currency: String,
}

impl PriceTransformer {
    pub fn new(
        markups: MarkupTable,
        exchange_rate: ExchangeRate,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            markups,
            exchange_rate,
            currency: currency.into(),
        }
    }

    pub fn exchange_rate(&self) -> ExchangeRate {
        self.exchange_rate
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Marks up `base_price` and converts it to the target currency, rounded.
    /// `None` when the result does not fit in a `Decimal`.
    pub fn convert(&self, base_price: Decimal, markup: Decimal) -> Option<Decimal> {
        let marked_up = base_price.checked_mul(Decimal::ONE.checked_add(markup)?)?;
        self.exchange_rate.apply(marked_up).map(round_currency)
    }

    pub fn transform(&self, item: &InputRecord) -> TransformOutcome {
        let lookup = self.markups.lookup(item.price_group);
        let prices = self.convert(item.cost_price, lookup.fraction()).and_then(|cost| {
            let sale_price = cost.checked_mul(Decimal::from(item.price_unit))?;
            Some((cost, round_currency(sale_price)))
        });
        let Some((cost, sale_price)) = prices else {
            return TransformOutcome::ParseFailure(EtlError::PriceOverflow {
                item_code: item.item_code.clone(),
                line: item.line,
            });
        };

        let record = OutputRecord {
            item_code: item.item_code.clone(),
            name: item.description.clone(),
            cost: Money::new(cost, self.currency.as_str()),
            sale_price: Money::new(sale_price, self.currency.as_str()),
        };

        match lookup {
            MarkupLookup::Table(_) => TransformOutcome::Priced(record),
            MarkupLookup::Fallback(_) => TransformOutcome::DefaultMarkup {
                record,
                price_group: item.price_group,
            },
        }
    }

    pub fn transform_row(&self, row: &RawRow) -> TransformOutcome {
        match InputRecord::try_from_raw(row) {
            Ok(item) => self.transform(&item),
            Err(e) => TransformOutcome::ParseFailure(e),
        }
    }
}

impl Default for PriceTransformer {
    fn default() -> Self {
        Self::new(MarkupTable::standard(), ExchangeRate::default(), DEFAULT_CURRENCY)
    }
}

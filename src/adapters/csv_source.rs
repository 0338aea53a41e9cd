use crate::domain::model::RawRow;
use crate::utils::error::Result;
use csv::{ReaderBuilder, StringRecord, Trim};

pub const DELIMITER: u8 = b';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    ItemCode,
    Description,
    Unit,
    CostPrice,
    PriceUnit,
    PriceGroup,
    IssuanceDate,
}

// 標頭先去掉空白再轉小寫比對
const HEADER_ALIASES: [(Column, &[&str]); 7] = [
    (Column::ItemCode, &["item", "itemcode", "varenummer"]),
    (
        Column::Description,
        &["articledescription", "description", "navn"],
    ),
    (Column::Unit, &["unit", "enhed"]),
    (Column::CostPrice, &["kostpriseur", "costprice", "kostpris"]),
    (Column::PriceUnit, &["priceunit", "prisenhed"]),
    (Column::PriceGroup, &["pricegroup", "prisgruppe"]),
    (
        Column::IssuanceDate,
        &["dateofissuance", "issuancedate", "dato"],
    ),
];

pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn column_for(header: &str) -> Option<Column> {
    let normalized = normalize_header(header);
    HEADER_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&normalized.as_str()))
        .map(|(column, _)| *column)
}

/// Column positions resolved from the header row. Unknown headers are ignored,
/// a column that appears twice keeps its first position.
#[derive(Debug, Default)]
struct ColumnIndex {
    positions: Vec<(Column, usize)>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut positions: Vec<(Column, usize)> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            match column_for(header) {
                Some(column) if !positions.iter().any(|(c, _)| *c == column) => {
                    positions.push((column, idx));
                }
                Some(_) => tracing::debug!("Duplicate column '{}' ignored", header),
                None => tracing::debug!("Unknown column '{}' ignored", header),
            }
        }
        Self { positions }
    }

    fn get<'r>(&self, record: &'r StringRecord, column: Column) -> &'r str {
        self.positions
            .iter()
            .find(|(c, _)| *c == column)
            .and_then(|(_, idx)| record.get(*idx))
            .unwrap_or("")
    }

    fn missing(&self) -> Vec<Column> {
        HEADER_ALIASES
            .iter()
            .map(|(column, _)| *column)
            .filter(|column| !self.positions.iter().any(|(c, _)| c == column))
            .collect()
    }
}

/// Reads a `;`-delimited price list. Rows may be shorter or longer than the
/// header; missing values come back as empty strings.
pub fn read_rows(data: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let index = ColumnIndex::from_headers(rdr.headers()?);
    let missing = index.missing();
    if !missing.is_empty() {
        tracing::debug!("Columns not present, using defaults: {:?}", missing);
    }

    let mut rows = Vec::new();
    for (n, result) in rdr.records().enumerate() {
        let record = result?;
        rows.push(RawRow {
            line: n as u64 + 1,
            item_code: index.get(&record, Column::ItemCode).to_string(),
            description: index.get(&record, Column::Description).to_string(),
            unit: index.get(&record, Column::Unit).to_string(),
            cost_price: index.get(&record, Column::CostPrice).to_string(),
            price_unit: index.get(&record, Column::PriceUnit).to_string(),
            price_group: index.get(&record, Column::PriceGroup).to_string(),
            issuance_date: index.get(&record, Column::IssuanceDate).to_string(),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    #[test]
    fn test_read_rows_with_spaced_headers() {
        let data = "Item;Article Description;Unit;Kostpris EUR;Price Unit;Price Group;Date Of Issuance\n\
                    A1;Chair black;STK;10.00 €;2;21;2024-12-05\n\
                    A2;Table;STK;100 €;1;99;2024-12-05\n";

        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[0].item_code, "A1");
        assert_eq!(rows[0].description, "Chair black");
        assert_eq!(rows[0].cost_price, "10.00 €");
        assert_eq!(rows[0].price_unit, "2");
        assert_eq!(rows[0].price_group, "21");
        assert_eq!(rows[1].line, 2);
        assert_eq!(rows[1].price_group, "99");
    }

    #[test]
    fn test_reordered_and_unknown_columns() {
        let data = "PRICEGROUP;Extra;kostpriseur;ITEM\n23;x;5 €;C3\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_code, "C3");
        assert_eq!(rows[0].cost_price, "5 €");
        assert_eq!(rows[0].price_group, "23");
        assert_eq!(rows[0].description, "");
        assert_eq!(rows[0].price_unit, "");
    }

    #[test]
    fn test_short_rows_default_to_empty() {
        let data = "Item;ArticleDescription;KostprisEUR;PriceUnit;PriceGroup\nA1;Lamp\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Lamp");
        assert_eq!(rows[0].cost_price, "");
        assert_eq!(rows[0].price_group, "");
    }

    #[test]
    fn test_header_only_file() {
        let rows = read_rows(b"Item;KostprisEUR\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let data = b"Item;KostprisEUR\nA1;\xff\xfe\n";
        let err = read_rows(data).unwrap_err();
        assert!(matches!(err, EtlError::CsvError(_)));
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}Kostpris EUR"), "kostpriseur");
        assert_eq!(normalize_header(" Price\tGroup "), "pricegroup");
    }
}

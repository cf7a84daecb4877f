// retail-etl-core/src/infrastructure/dataset.rs

use std::fs::File;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::order::{OrderRecord, REQUIRED_COLUMNS, SourceRow, normalize_header};
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Clone, Copy)]
pub struct DatasetOptions {
    pub delimiter: u8,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Reads the orders file into memory.
///
/// The header is normalized and checked first: missing columns abort before any
/// row is read. Any row that does not deserialize is fatal as well.
#[instrument(skip(options))]
pub fn load_dataset(
    path: &Path,
    options: DatasetOptions,
) -> Result<Vec<SourceRow>, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::DatasetNotFound(
            path.display().to_string(),
        ));
    }
    let file = File::open(path)?;
    let rows = read_orders(file, options)?;
    info!(rows = rows.len(), path = %path.display(), "Dataset loaded");
    Ok(rows)
}

pub fn read_orders<R: std::io::Read>(
    reader: R,
    options: DatasetOptions,
) -> Result<Vec<SourceRow>, InfrastructureError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = reader.headers()?.iter().map(normalize_header).collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(InfrastructureError::MissingColumns(missing));
    }
    let mut rows = Vec::new();
    let mut raw = csv::StringRecord::new();
    while reader.read_record(&mut raw)? {
        // Line where the record starts; quoted fields may span several lines.
        let line = raw.position().map_or(0, csv::Position::line);
        let record = raw
            .deserialize::<OrderRecord>(Some(&headers))
            .map_err(|source| InfrastructureError::MalformedRow { line, source })?;
        rows.push(SourceRow { line, record });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use std::io::Write;

    const HEADER: &str = "order_id,order_date,ship_mode,segment,country,city,state,postal_code,region,category,sub_category,product_id,cost_price,list_price,quantity,discount_percent,discount,sale_price,profit";

    #[test]
    fn test_read_orders() -> Result<()> {
        let data = format!(
            "{HEADER}\n1,2023-03-01,Second Class,Consumer,United States,Henderson,Kentucky,42420,South,Furniture,Bookcases,FUR-BO-10001798,240,260,2,2,5.2,254.8,14.8\n2,2023-08-15,Standard Class,Corporate,United States,Burlington,Vermont,,East,Technology,Phones,TEC-PH-10002033,10,12,1,,,12,2\n"
        );
        let rows = read_orders(data.as_bytes(), DatasetOptions::default())?;
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.record.order_id, 1);
        assert_eq!(first.record.postal_code, Some(42420));
        assert_eq!(first.record.order_date, "2023-03-01");
        assert_eq!(first.record.discount, Some(5.2));

        let second = &rows[1];
        assert_eq!(second.line, 3);
        assert_eq!(second.record.postal_code, None);
        assert_eq!(second.record.discount_percent, None);
        Ok(())
    }

    #[test]
    fn test_headers_are_normalized() -> Result<()> {
        let data = "Order Id,Order Date,Ship Mode,Segment,Country,City,State,Postal Code,Region,Category,Sub Category,Product Id,Cost Price,List Price,Quantity,Discount Percent,Discount,Sale Price,Profit\n7,2023-01-02,First Class,Consumer,United States,Austin,Texas,73301,Central,Furniture,Chairs,FUR-CH-1,1,2,1,0,0,2,1\n";
        let rows = read_orders(data.as_bytes(), DatasetOptions::default())?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.ship_mode, "First Class");
        Ok(())
    }

    #[test]
    fn test_line_numbers_follow_multiline_fields() -> Result<()> {
        let data = format!(
            "{HEADER}\n1,2023-03-01,Second Class,Consumer,United States,\"Hender\nson\",Kentucky,42420,South,Furniture,Bookcases,FUR-BO-1,240,260,2,2,5.2,254.8,14.8\n2,2023-03-02,Second Class,Consumer,United States,Henderson,Kentucky,42420,South,Furniture,Bookcases,FUR-BO-2,240,260,2,2,5.2,254.8,14.8\n"
        );
        let rows = read_orders(data.as_bytes(), DatasetOptions::default())?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].record.city, "Hender\nson");
        assert_eq!(rows[1].line, 4);
        Ok(())
    }

    #[test]
    fn test_missing_columns_are_fatal() -> Result<()> {
        let data = "order_id,product_id\n1,A\n";
        match read_orders(data.as_bytes(), DatasetOptions::default()) {
            Err(InfrastructureError::MissingColumns(cols)) => {
                assert!(cols.contains(&"order_date".to_string()));
                assert!(cols.contains(&"profit".to_string()));
                assert!(!cols.contains(&"order_id".to_string()));
                Ok(())
            }
            other => bail!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_number_is_fatal() -> Result<()> {
        let data = format!(
            "{HEADER}\n1,2023-03-01,Second Class,Consumer,United States,Henderson,Kentucky,42420,South,Furniture,Bookcases,FUR-BO-1,abc,260,2,2,5.2,254.8,14.8\n"
        );
        match read_orders(data.as_bytes(), DatasetOptions::default()) {
            Err(InfrastructureError::MalformedRow { line, .. }) => {
                assert_eq!(line, 2);
                Ok(())
            }
            other => bail!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let result = load_dataset(Path::new("/nonexistent/orders.csv"), DatasetOptions::default());
        assert!(matches!(result, Err(InfrastructureError::DatasetNotFound(_))));
    }

    #[test]
    fn test_load_dataset_with_semicolons() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("orders.csv");
        let mut file = File::create(&path)?;
        writeln!(file, "{}", HEADER.replace(',', ";"))?;
        writeln!(
            file,
            "1;2023-03-01;Second Class;Consumer;United States;Henderson;Kentucky;42420;South;Furniture;Bookcases;FUR-BO-1;240;260;2;2;5.2;254.8;14.8"
        )?;
        drop(file);

        let rows = load_dataset(&path, DatasetOptions { delimiter: b';' })?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }
}

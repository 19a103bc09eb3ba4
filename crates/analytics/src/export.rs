use crate::error::AnalyticsError;
use crate::report::{ResultRow, WrittenFile};
use std::path::Path;

/// ASCII group separator. Customer and product names routinely contain commas.
pub const FIELD_DELIMITER: u8 = 0x1D;

/// Creates `dir` (and its parents) unless it already exists.
pub fn prepare_output_dir(dir: &Path) -> Result<(), AnalyticsError> {
    if dir.is_dir() {
        tracing::debug!("Output directory already exists: {}", dir.display());
        return Ok(());
    }

    std::fs::create_dir_all(dir).map_err(|source| AnalyticsError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::debug!("Created output directory: {}", dir.display());

    Ok(())
}

/// Writes `rows` to `dir/T::FILE_NAME`, header first, replacing any previous file.
pub fn write_table<T: ResultRow>(dir: &Path, rows: &[T]) -> Result<WrittenFile, AnalyticsError> {
    let path = dir.join(T::FILE_NAME);
    let write_failed = |source| AnalyticsError::WriteFailed {
        path: path.clone(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .from_path(&path)
        .map_err(write_failed)?;

    writer.write_record(T::HEADERS).map_err(write_failed)?;
    for row in rows {
        writer.serialize(row).map_err(write_failed)?;
    }
    writer.flush().map_err(|source| AnalyticsError::Flush {
        path: path.clone(),
        source,
    })?;

    tracing::debug!("Wrote {} rows to {}", rows.len(), path.display());

    Ok(WrittenFile {
        file_name: T::FILE_NAME,
        path,
        rows: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ForecastAccuracyRow, SalesTrendRow};

    #[test]
    fn writes_header_and_group_separated_fields() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![SalesTrendRow {
            fiscal_week: 1,
            sales_amount: 15,
            sales_quantity: 3,
        }];

        let written = write_table(dir.path(), &rows).unwrap();
        let contents = std::fs::read_to_string(&written.path).unwrap();

        assert_eq!(written.rows, 1);
        assert_eq!(
            contents,
            "fiscal_week\u{1d}sales_amount\u{1d}sales_quantity\n1\u{1d}15\u{1d}3\n"
        );
    }

    #[test]
    fn empty_table_still_gets_a_header() {
        let dir = tempfile::tempdir().unwrap();

        let written = write_table::<SalesTrendRow>(dir.path(), &[]).unwrap();
        let contents = std::fs::read_to_string(&written.path).unwrap();

        assert_eq!(contents, "fiscal_week\u{1d}sales_amount\u{1d}sales_quantity\n");
    }

    #[test]
    fn undefined_values_are_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![ForecastAccuracyRow {
            fiscal_week: 7,
            customer_name: "Acme".to_string(),
            forecast_accuracy_4_weeks: None,
            forecast_accuracy_1_week: Some(90.0),
        }];

        let written = write_table(dir.path(), &rows).unwrap();
        let contents = std::fs::read_to_string(&written.path).unwrap();
        let data_line = contents.lines().nth(1).unwrap();

        assert_eq!(data_line, "7\u{1d}Acme\u{1d}\u{1d}90.0");
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        prepare_output_dir(&nested).unwrap();
        prepare_output_dir(&nested).unwrap();

        assert!(nested.is_dir());
    }
}

use anyhow::{Context, Result};
use std::path::Path;

/// An in-memory CSV table: one header row plus data rows, all cells kept as
/// the verbatim strings found in the file. Column set is fixed at load time.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    /// Read a CSV file into a `Table`, preserving header names, row order and
    /// cell values exactly as written.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening `{}`", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("reading header row of `{}`", path.display()))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("parsing CSV record in `{}`", path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table { headers, rows })
    }

    /// Write the table back out as CSV, headers first.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating `{}`", path.display()))?;

        writer
            .write_record(&self.headers)
            .context("writing header row")?;
        for row in &self.rows {
            writer.write_record(row).context("writing CSV record")?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing `{}`", path.display()))?;

        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a cell by row index and column name. Returns `None` when the
    /// column does not exist or the record is too short to carry it, which is
    /// distinct from `Some("")` for a present-but-empty cell.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| h == column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

// ----- Tests -----
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_preserves_headers_rows_and_order() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("in.csv");
        fs::write(
            &path,
            "TOWN,STREET ADDRESS,NOTES\nBarre,12 Main St,\nCalais,,town hall\n",
        )
        .unwrap();

        let table = Table::load(&path).unwrap();
        assert_eq!(table.headers(), &["TOWN", "STREET ADDRESS", "NOTES"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "TOWN"), Some("Barre"));
        assert_eq!(table.cell(0, "STREET ADDRESS"), Some("12 Main St"));
        assert_eq!(table.cell(1, "STREET ADDRESS"), Some(""));
        assert_eq!(table.cell(1, "NOTES"), Some("town hall"));
    }

    #[test]
    fn test_cell_absent_vs_empty() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ragged.csv");
        // second record is shorter than the header row
        fs::write(&path, "TOWN,STREET ADDRESS\nBarre,12 Main St\nCalais\n").unwrap();

        let table = Table::load(&path).unwrap();
        assert_eq!(table.cell(1, "TOWN"), Some("Calais"));
        assert_eq!(table.cell(1, "STREET ADDRESS"), None);
        assert_eq!(table.cell(0, "NO SUCH COLUMN"), None);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let tmp = tempdir().unwrap();
        assert!(Table::load(tmp.path().join("nope.csv")).is_err());
    }

    #[test]
    fn test_round_trip() {
        let tmp = tempdir().unwrap();
        let in_path = tmp.path().join("in.csv");
        let out_path = tmp.path().join("out.csv");
        fs::write(&in_path, "A,B\n1,x\n2,y y\n").unwrap();

        let table = Table::load(&in_path).unwrap();
        table.write(&out_path).unwrap();

        let again = Table::load(&out_path).unwrap();
        assert_eq!(again.headers(), table.headers());
        assert_eq!(again.rows(), table.rows());
    }
}

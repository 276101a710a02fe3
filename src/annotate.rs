use crate::geocode::rate_limit::RateLimited;
use crate::geocode::{Coordinates, Geocode};
use crate::table::Table;

/// Column holding the free-text address to geocode.
pub const ADDRESS_COLUMN: &str = "STREET ADDRESS";
/// Column used to name the row in progress output.
pub const TOWN_COLUMN: &str = "TOWN";
/// Suffix appended to every query; the dataset is Vermont-only and the
/// qualifier sharpens matches considerably.
pub const REGION: &str = "Vermont";

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const STATUS_COLUMN: &str = "geocode_status";

/// Terminal classification of one row's geocoding attempt. Exactly one per
/// row; a batch never carries a row out of the loop unclassified.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeStatus {
    Success(Coordinates),
    NotFound,
    NoAddress,
    Error(String),
}

impl GeocodeStatus {
    /// Value recorded in the `geocode_status` column.
    pub fn label(&self) -> String {
        match self {
            GeocodeStatus::Success(_) => "success".to_string(),
            GeocodeStatus::NotFound => "not_found".to_string(),
            GeocodeStatus::NoAddress => "no_address".to_string(),
            GeocodeStatus::Error(msg) => format!("error: {msg}"),
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeocodeStatus::Success(coords) => Some(*coords),
            _ => None,
        }
    }
}

/// Drive every row of `input` through the rate-limited geocoder, in order,
/// and build the annotated output table: the input columns verbatim plus
/// `latitude`, `longitude` and `geocode_status`.
///
/// Blank or missing addresses never reach the geocoder. Lookup failures are
/// folded into the row's status so one bad address cannot abort the batch.
/// One progress line per row goes to stdout.
pub async fn annotate<G: Geocode>(input: &Table, geocoder: &mut RateLimited<G>) -> Table {
    let total = input.len();
    let width = input.headers().len();

    let mut headers = input.headers().to_vec();
    headers.push(LATITUDE_COLUMN.to_string());
    headers.push(LONGITUDE_COLUMN.to_string());
    headers.push(STATUS_COLUMN.to_string());

    let mut rows = Vec::with_capacity(total);
    for (idx, row) in input.rows().iter().enumerate() {
        let town = input.cell(idx, TOWN_COLUMN).unwrap_or("");
        let address = input.cell(idx, ADDRESS_COLUMN).unwrap_or("");

        let status = if address.trim().is_empty() {
            GeocodeStatus::NoAddress
        } else {
            let query = format!("{address}, {REGION}");
            match geocoder.lookup(&query).await {
                Ok(Some(coords)) => GeocodeStatus::Success(coords),
                Ok(None) => GeocodeStatus::NotFound,
                Err(err) => GeocodeStatus::Error(format!("{err:#}")),
            }
        };

        print_progress(idx + 1, total, town, &status);

        let (lat, lon) = match status.coordinates() {
            Some(coords) => (coords.latitude.to_string(), coords.longitude.to_string()),
            None => (String::new(), String::new()),
        };

        let mut out = row.clone();
        // ragged records are padded so the appended cells stay in column
        if out.len() < width {
            out.resize(width, String::new());
        }
        out.push(lat);
        out.push(lon);
        out.push(status.label());
        rows.push(out);
    }

    Table::new(headers, rows)
}

fn print_progress(seq: usize, total: usize, town: &str, status: &GeocodeStatus) {
    match status {
        GeocodeStatus::Success(coords) => println!(
            "  {seq}/{total}: {town} - Success ({:.4}, {:.4})",
            coords.latitude, coords.longitude
        ),
        GeocodeStatus::NotFound => println!("  {seq}/{total}: {town} - Not found"),
        GeocodeStatus::NoAddress => println!("  {seq}/{total}: {town} - No address"),
        GeocodeStatus::Error(msg) => println!("  {seq}/{total}: {town} - Error: {msg}"),
    }
}

/// Aggregate tally over the `geocode_status` column of an annotated table.
/// Error rows are not counted directly; they fall out as the remainder so
/// every `error: ...` variant lands in one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub success: usize,
    pub not_found: usize,
    pub no_address: usize,
}

impl Summary {
    pub fn from_table(table: &Table) -> Self {
        let mut summary = Summary {
            total: table.len(),
            success: 0,
            not_found: 0,
            no_address: 0,
        };
        for idx in 0..table.len() {
            match table.cell(idx, STATUS_COLUMN) {
                Some("success") => summary.success += 1,
                Some("not_found") => summary.not_found += 1,
                Some("no_address") => summary.no_address += 1,
                _ => {}
            }
        }
        summary
    }

    pub fn errors(&self) -> usize {
        self.total - self.success - self.not_found - self.no_address
    }

    pub fn print(&self) {
        let rule = "=".repeat(60);
        println!("\n{rule}");
        println!("GEOCODING SUMMARY");
        println!("{rule}");
        println!("Total addresses: {}", self.total);
        println!("Successfully geocoded: {}", self.success);
        println!("Not found: {}", self.not_found);
        println!("No address provided: {}", self.no_address);
        println!("Errors: {}", self.errors());
        println!("{rule}");
    }
}

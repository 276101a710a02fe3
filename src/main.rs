use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vtgeocode::{
    annotate::{self, Summary},
    geocode::{rate_limit::RateLimited, Nominatim},
    table::Table,
};

const INPUT_FILE: &str = "Data/clean-tabula-2025_vermont_election_polling_places.csv";
const OUTPUT_FILE: &str = "Data/geocoded_polling_places.csv";

/// One request per second keeps us inside the Nominatim usage policy.
const MIN_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) load the polling-place table ─────────────────────────────
    println!("Reading {INPUT_FILE}...");
    let input = Table::load(INPUT_FILE).with_context(|| format!("loading `{INPUT_FILE}`"))?;
    info!(rows = input.len(), "loaded input table");

    // ─── 3) build the rate-limited geocoder ──────────────────────────
    println!("Initializing geocoder...");
    let mut geocoder = RateLimited::new(Nominatim::new()?, MIN_DELAY);

    // ─── 4) geocode every row, in order ──────────────────────────────
    println!("Geocoding {} addresses...", input.len());
    let output = annotate::annotate(&input, &mut geocoder).await;

    // ─── 5) write the annotated table ────────────────────────────────
    println!("\nSaving results to {OUTPUT_FILE}...");
    output
        .write(OUTPUT_FILE)
        .with_context(|| format!("writing `{OUTPUT_FILE}`"))?;
    info!(rows = output.len(), "wrote annotated table");

    // ─── 6) summary ──────────────────────────────────────────────────
    Summary::from_table(&output).print();

    Ok(())
}

//! CSV loaders for fuel deliveries, outdoor temperatures, and heat-pump ratings.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::FuelConfig;
use crate::curve::{Breakpoint, Catalog, HeatPumpCurve};
use crate::error::{Error, Result};
use crate::fuel::FuelKind;
use crate::sim::types::{FuelPurchase, validate_purchases};
use crate::weather::{TemperatureSample, forward_fill_hourly};

/// Deliveries read from a file, with the free-text header that preceded them.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryHistory {
    /// `#` header lines with the marker stripped, joined by newlines.
    pub header: String,
    /// Fuel named on a `Heat source:` header line.
    pub fuel: Option<FuelKind>,
    pub purchases: Vec<FuelPurchase>,
}

#[derive(Debug, Deserialize)]
struct DeliveryRow {
    date: NaiveDate,
    volume: f64,
    cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TemperatureRow {
    timestamp: String,
    temp_f: f64,
}

#[derive(Debug, Deserialize)]
struct RatingRow {
    manufacturer: String,
    model: String,
    temp_f: f64,
    capacity_min: f64,
    capacity_max: f64,
    cop_min: f64,
    cop_max: f64,
}

/// Loads a delivery history from `path`.
///
/// # Errors
///
/// See [`parse_deliveries`]; file access failures return `Error::Io`.
pub fn load_deliveries(path: &Path, baseline: &FuelConfig) -> Result<DeliveryHistory> {
    let text = fs::read_to_string(path)?;
    let history = parse_deliveries(&text, baseline)?;
    info!(
        path = %path.display(),
        deliveries = history.purchases.len(),
        fuel = ?history.fuel,
        "loaded fuel deliveries"
    );
    Ok(history)
}

/// Parses `date,volume,cost` rows preceded by optional `#` header lines.
///
/// A missing or zero cost is imputed from the last known unit price, which
/// starts at the baseline fuel's standard price. A row with zero volume and
/// zero cost ends the list and is kept as the trailing probe record.
///
/// # Errors
///
/// Returns `Error::Data` for unparseable rows, negative values, or dates
/// that go backwards.
pub fn parse_deliveries(text: &str, baseline: &FuelConfig) -> Result<DeliveryHistory> {
    let header = text
        .lines()
        .take_while(|l| l.trim_start().starts_with('#'))
        .map(|l| l.trim_start().trim_start_matches('#').trim())
        .collect::<Vec<_>>()
        .join("\n");
    let fuel = FuelKind::infer_from_header(&header);
    let mut last_price = baseline.profile(fuel).price;

    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut purchases = Vec::new();
    for (line, row) in rdr.deserialize::<DeliveryRow>().enumerate() {
        let row = row.map_err(|e| Error::data(format!("deliveries row {}: {e}", line + 1)))?;
        let cost = row.cost.unwrap_or(0.0);
        if row.volume > 0.0 && cost > 0.0 {
            last_price = cost / row.volume;
        }
        let cost = if row.volume > 0.0 && cost == 0.0 {
            debug!(date = %row.date, price = last_price, "imputing delivery cost");
            last_price * row.volume
        } else {
            cost
        };
        purchases.push(FuelPurchase::new(row.date, row.volume, cost));
        if row.volume == 0.0 && cost == 0.0 {
            break;
        }
    }

    validate_purchases(&purchases)?;
    Ok(DeliveryHistory {
        header,
        fuel,
        purchases,
    })
}

/// Loads outdoor temperatures from `path` and resamples them hourly.
///
/// # Errors
///
/// See [`read_temperatures`]; file access failures return `Error::Csv`.
pub fn load_temperatures(path: &Path) -> Result<Vec<TemperatureSample>> {
    let rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let samples = collect_temperatures(rdr)?;
    info!(path = %path.display(), hours = samples.len(), "loaded temperature record");
    Ok(samples)
}

/// Reads `timestamp,temp_f` rows (`YYYY-MM-DD HH:MM`) of any cadence and
/// forward-fills them onto an hourly grid.
///
/// # Errors
///
/// Returns `Error::Data` for unparseable rows or an empty/unordered record.
pub fn read_temperatures(reader: impl Read) -> Result<Vec<TemperatureSample>> {
    let rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    collect_temperatures(rdr)
}

fn collect_temperatures<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<TemperatureSample>> {
    let mut readings = Vec::new();
    for (line, row) in rdr.deserialize::<TemperatureRow>().enumerate() {
        let row = row.map_err(|e| Error::data(format!("temperature row {}: {e}", line + 1)))?;
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| {
            Error::data(format!(
                "temperature row {}: unrecognised timestamp \"{}\"",
                line + 1,
                row.timestamp
            ))
        })?;
        readings.push(TemperatureSample::new(timestamp, row.temp_f));
    }
    forward_fill_hourly(&readings)
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Loads a heat-pump catalog from `path`.
///
/// # Errors
///
/// See [`read_catalog`]; file access failures return `Error::Csv`.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let catalog = collect_catalog(rdr)?;
    info!(path = %path.display(), models = catalog.len(), "loaded heat-pump catalog");
    Ok(catalog)
}

/// Reads long-format rating rows, one per breakpoint, grouped by
/// consecutive `(manufacturer, model)`.
///
/// # Errors
///
/// Returns `Error::Data` for unparseable rows or a model listed twice, and
/// `Error::Config` for a curve with invalid breakpoints.
pub fn read_catalog(reader: impl Read) -> Result<Catalog> {
    let rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    collect_catalog(rdr)
}

fn collect_catalog<R: Read>(mut rdr: csv::Reader<R>) -> Result<Catalog> {
    let mut groups: Vec<(String, String, Vec<Breakpoint>)> = Vec::new();
    for (line, row) in rdr.deserialize::<RatingRow>().enumerate() {
        let row = row.map_err(|e| Error::data(format!("catalog row {}: {e}", line + 1)))?;
        let point = Breakpoint::new(row.temp_f, row.capacity_min, row.capacity_max, row.cop_min, row.cop_max);
        let continues = groups
            .last()
            .is_some_and(|(manufacturer, model, _)| *manufacturer == row.manufacturer && *model == row.model);
        if continues {
            if let Some((_, _, points)) = groups.last_mut() {
                points.push(point);
            }
            continue;
        }
        if groups.iter().any(|(_, model, _)| model.eq_ignore_ascii_case(&row.model)) {
            return Err(Error::data(format!(
                "catalog row {}: model \"{}\" listed twice",
                line + 1,
                row.model
            )));
        }
        groups.push((row.manufacturer, row.model, vec![point]));
    }

    let curves = groups
        .into_iter()
        .map(|(manufacturer, model, points)| HeatPumpCurve::new(manufacturer, model, points))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Catalog::new(curves))
}

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::model::{Listing, ListingDataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Load failures with enough context to point at the offending input.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("CSV row {row}: {source}")]
    BadRow {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listing dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with the source schema columns (recommended)
/// * `.json` – records-oriented array, the default `df.to_json(orient='records')`
pub fn load_file(path: &Path) -> Result<ListingDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column order of the source schema.  Export preserves it byte-for-byte,
/// which is why `Listing`'s field declaration order must match.
pub const CSV_COLUMNS: [&str; 9] = [
    "model",
    "year",
    "price",
    "mileage",
    "fuelType",
    "transmission",
    "mpg",
    "engineSize",
    "tax",
];

/// Parse a CSV file into a [`ListingDataset`].
///
/// Header names are trimmed of surrounding whitespace before matching, so
/// `" fuelType"` in the source file still binds to [`Listing::fuel_type`].
/// A missing required column or an unparseable value is fatal.
pub fn load_csv(path: &Path) -> Result<ListingDataset> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .context("opening CSV")?;

    read_listings(reader).map(ListingDataset::from_listings)
}

/// Deserialize all rows from an already-configured CSV reader.
fn read_listings<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Listing>> {
    let mut listings = Vec::new();
    for (row_no, result) in reader.deserialize::<Listing>().enumerate() {
        let listing = result.map_err(|source| LoadError::BadRow { row: row_no, source })?;
        listings.push(listing);
    }
    Ok(listings)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "model": "X3", "year": 2018, "price": 20000.0, "mileage": 30000.0,
///     "fuelType": "Diesel", "transmission": "Automatic",
///     "mpg": 52.3, "engineSize": 2.0, "tax": 145.0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ListingDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let listings: Vec<Listing> = serde_json::from_str(&text).context("parsing JSON records")?;
    Ok(ListingDataset::from_listings(listings))
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Serialize the given view of the dataset as CSV, header included, in the
/// source column order.  Re-loading the output through [`load_csv`] yields
/// the same records row for row.
pub fn write_csv<W: Write>(dataset: &ListingDataset, indices: &[usize], writer: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    for &idx in indices {
        w.serialize(&dataset.listings[idx])
            .with_context(|| format!("serializing row {idx}"))?;
    }
    w.flush().context("flushing CSV output")?;
    Ok(())
}

/// File-backed wrapper around [`write_csv`] used by the Export button.
pub fn export_filtered(dataset: &ListingDataset, indices: &[usize], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, indices, file)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
model,year,price,mileage,fuelType,transmission,mpg,engineSize,tax
X3,2018,20000,30000,Diesel,Automatic,52.3,2.0,145
X5,2020,40000,12000,Petrol,Semi-Auto,31.0,3.0,150
1 Series,2016,11500,48000,Petrol,Manual,54.3,1.5,125
";

    fn dataset_from_str(csv_text: &str) -> ListingDataset {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(csv_text.as_bytes());
        ListingDataset::from_listings(read_listings(reader).unwrap())
    }

    #[test]
    fn loads_typed_rows() {
        let ds = dataset_from_str(SAMPLE);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.listings[0].model, "X3");
        assert_eq!(ds.listings[0].year, 2018);
        assert_eq!(ds.listings[1].fuel_type, "Petrol");
        assert_eq!(ds.listings[2].engine_size, 1.5);
        assert_eq!(ds.year_bounds, Some((2016, 2020)));
        assert_eq!(ds.models.len(), 3);
        assert_eq!(ds.fuel_types.len(), 2);
    }

    #[test]
    fn trims_header_whitespace() {
        let padded = SAMPLE.replacen("fuelType", " fuelType ", 1);
        let ds = dataset_from_str(&padded);
        assert_eq!(ds.listings[0].fuel_type, "Diesel");
    }

    #[test]
    fn missing_column_is_fatal() {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader("model,year\nX3,2018\n".as_bytes());
        assert!(read_listings(reader).is_err());
    }

    #[test]
    fn unparseable_value_reports_row() {
        let bad = SAMPLE.replace("40000,12000", "forty-thousand,12000");
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(bad.as_bytes());
        let err = read_listings(reader).unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().unwrap();
        assert!(matches!(load_err, LoadError::BadRow { row: 1, .. }));
    }

    #[test]
    fn export_round_trips() {
        let ds = dataset_from_str(SAMPLE);
        let view: Vec<usize> = vec![0, 2];

        let mut buf = Vec::new();
        write_csv(&ds, &view, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, CSV_COLUMNS.join(","));

        let reloaded = dataset_from_str(&text);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.listings[0], ds.listings[0]);
        assert_eq!(reloaded.listings[1], ds.listings[2]);
    }

    #[test]
    fn unsupported_extension_rejected() {
        let err = load_file(Path::new("listings.parquet")).unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }
}

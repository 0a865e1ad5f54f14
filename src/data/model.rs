use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single used-car listing (one row of the source CSV).
///
/// Field names follow Rust conventions; the serde renames map to the
/// camelCase headers of the source file (`fuelType`, `engineSize`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: f64,
    #[serde(rename = "fuelType")]
    pub fuel_type: String,
    pub transmission: String,
    pub mpg: f64,
    #[serde(rename = "engineSize")]
    pub engine_size: f64,
    pub tax: f64,
}

/// Numeric fields a scalar summary or headline metric can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Price,
    Mileage,
    Mpg,
    EngineSize,
    Tax,
}

impl NumericField {
    pub fn get(&self, listing: &Listing) -> f64 {
        match self {
            NumericField::Price => listing.price,
            NumericField::Mileage => listing.mileage,
            NumericField::Mpg => listing.mpg,
            NumericField::EngineSize => listing.engine_size,
            NumericField::Tax => listing.tax,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NumericField::Price => "Price ($)",
            NumericField::Mileage => "Mileage (mi)",
            NumericField::Mpg => "MPG",
            NumericField::EngineSize => "Engine Size (L)",
            NumericField::Tax => "Tax ($)",
        }
    }
}

// ---------------------------------------------------------------------------
// ListingDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed categorical domains.
///
/// Treated as immutable after load: filters and aggregates work on index
/// vectors into `listings`, never on copies.
#[derive(Debug, Clone)]
pub struct ListingDataset {
    /// All listings (rows), in source-file order.
    pub listings: Vec<Listing>,
    /// Sorted unique `model` values.
    pub models: BTreeSet<String>,
    /// Sorted unique `fuel_type` values.
    pub fuel_types: BTreeSet<String>,
    /// Sorted unique `transmission` values.
    pub transmissions: BTreeSet<String>,
    /// Observed inclusive year bounds; `None` when the table is empty.
    pub year_bounds: Option<(i32, i32)>,
}

impl ListingDataset {
    /// Build the categorical domains from the loaded rows.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut models = BTreeSet::new();
        let mut fuel_types = BTreeSet::new();
        let mut transmissions = BTreeSet::new();
        let mut year_bounds: Option<(i32, i32)> = None;

        for l in &listings {
            models.insert(l.model.clone());
            fuel_types.insert(l.fuel_type.clone());
            transmissions.insert(l.transmission.clone());
            year_bounds = Some(match year_bounds {
                Some((lo, hi)) => (lo.min(l.year), hi.max(l.year)),
                None => (l.year, l.year),
            });
        }

        ListingDataset {
            listings,
            models,
            fuel_types,
            transmissions,
            year_bounds,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

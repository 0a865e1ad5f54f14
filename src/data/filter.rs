use std::collections::BTreeSet;

use super::model::ListingDataset;

// ---------------------------------------------------------------------------
// Filter criteria: the three sidebar predicates
// ---------------------------------------------------------------------------

/// User-selected filter state: model membership, inclusive year range,
/// fuel-type membership.  A row passes when it satisfies all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Selected `model` values.  Empty set means nothing selected → empty view.
    pub models: BTreeSet<String>,
    /// Inclusive `(min_year, max_year)` bounds.
    pub year_range: (i32, i32),
    /// Selected `fuel_type` values.  Empty set means nothing selected → empty view.
    pub fuel_types: BTreeSet<String>,
}

impl FilterCriteria {
    /// Criteria selecting the full observed domain of each field, so the
    /// filtered view equals the whole dataset.
    pub fn all_of(dataset: &ListingDataset) -> Self {
        FilterCriteria {
            models: dataset.models.clone(),
            year_range: dataset.year_bounds.unwrap_or((0, 0)),
            fuel_types: dataset.fuel_types.clone(),
        }
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            models: BTreeSet::new(),
            year_range: (0, 0),
            fuel_types: BTreeSet::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter pipeline
// ---------------------------------------------------------------------------

/// Return indices of listings that pass all three predicates, preserving
/// the original row order.
///
/// Deselecting every value of a multi-select yields an empty view; there is
/// no implicit select-all fallback once the user has cleared a selection.
pub fn filtered_indices(dataset: &ListingDataset, criteria: &FilterCriteria) -> Vec<usize> {
    let (min_year, max_year) = criteria.year_range;
    dataset
        .listings
        .iter()
        .enumerate()
        .filter(|(_, l)| {
            criteria.models.contains(&l.model)
                && l.year >= min_year
                && l.year <= max_year
                && criteria.fuel_types.contains(&l.fuel_type)
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Listing, ListingDataset};

    fn listing(model: &str, year: i32, price: f64, fuel: &str) -> Listing {
        Listing {
            model: model.to_string(),
            year,
            price,
            mileage: 10_000.0,
            fuel_type: fuel.to_string(),
            transmission: "Automatic".to_string(),
            mpg: 45.0,
            engine_size: 2.0,
            tax: 145.0,
        }
    }

    fn two_row_dataset() -> ListingDataset {
        ListingDataset::from_listings(vec![
            listing("X3", 2018, 20_000.0, "Diesel"),
            listing("X5", 2020, 40_000.0, "Petrol"),
        ])
    }

    #[test]
    fn default_criteria_are_identity() {
        let ds = two_row_dataset();
        let criteria = FilterCriteria::all_of(&ds);
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1]);
    }

    #[test]
    fn conjunction_of_all_three_predicates() {
        let ds = two_row_dataset();
        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.models = ["X3".to_string()].into();
        criteria.year_range = (2018, 2018);
        criteria.fuel_types = ["Diesel".to_string()].into();

        let view = filtered_indices(&ds, &criteria);
        assert_eq!(view, vec![0]);
        assert_eq!(ds.listings[view[0]].price, 20_000.0);
    }

    #[test]
    fn every_row_in_view_satisfies_criteria() {
        let ds = ListingDataset::from_listings(vec![
            listing("X3", 2016, 15_000.0, "Diesel"),
            listing("X3", 2019, 22_000.0, "Petrol"),
            listing("X5", 2019, 41_000.0, "Diesel"),
            listing("X1", 2021, 28_000.0, "Hybrid"),
        ]);
        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.models = ["X3".to_string(), "X5".to_string()].into();
        criteria.year_range = (2017, 2020);

        let view = filtered_indices(&ds, &criteria);
        assert!(view.len() < ds.len());
        for &i in &view {
            let l = &ds.listings[i];
            assert!(criteria.models.contains(&l.model));
            assert!(l.year >= 2017 && l.year <= 2020);
            assert!(criteria.fuel_types.contains(&l.fuel_type));
        }
        // Stable: original order preserved.
        assert!(view.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        let ds = two_row_dataset();

        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.models.clear();
        assert!(filtered_indices(&ds, &criteria).is_empty());

        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.fuel_types.clear();
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn empty_dataset_yields_empty_view() {
        let ds = ListingDataset::from_listings(Vec::new());
        let criteria = FilterCriteria::all_of(&ds);
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }
}

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::ListingDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset handle is owned here and passed explicitly into the filter
/// and stats functions, so the whole pipeline stays testable without a UI.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<ListingDataset>,

    /// Current sidebar filter selections.
    pub criteria: FilterCriteria,

    /// Indices of listings passing the current filters (cached).
    pub visible: Vec<usize>,

    /// Stable colour per model, for the box plot and bar charts.
    pub model_colors: ColorMap,

    /// Stable colour per fuel type, for the scatter plots and grouped bars.
    pub fuel_colors: ColorMap,

    /// Stable colour per transmission, for the pie chart.
    pub transmission_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria::default(),
            visible: Vec::new(),
            model_colors: ColorMap::default(),
            fuel_colors: ColorMap::default(),
            transmission_colors: ColorMap::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, initialise filters and colours.
    ///
    /// Default criteria select the full observed domain of each field, so
    /// the initial view is the whole table.
    pub fn set_dataset(&mut self, dataset: ListingDataset) {
        self.criteria = FilterCriteria::all_of(&dataset);
        self.visible = (0..dataset.len()).collect();

        self.model_colors = ColorMap::new(&dataset.models);
        self.fuel_colors = ColorMap::new(&dataset.fuel_types);
        self.transmission_colors = ColorMap::new(&dataset.transmissions);

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute `visible` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible = filtered_indices(ds, &self.criteria);
        }
    }

    /// Toggle a single model in the model filter.
    pub fn toggle_model(&mut self, model: &str) {
        if !self.criteria.models.remove(model) {
            self.criteria.models.insert(model.to_string());
        }
        self.refilter();
    }

    /// Toggle a single fuel type in the fuel filter.
    pub fn toggle_fuel(&mut self, fuel: &str) {
        if !self.criteria.fuel_types.remove(fuel) {
            self.criteria.fuel_types.insert(fuel.to_string());
        }
        self.refilter();
    }

    /// Set the inclusive year range, keeping min ≤ max.
    pub fn set_year_range(&mut self, min_year: i32, max_year: i32) {
        self.criteria.year_range = (min_year.min(max_year), min_year.max(max_year));
        self.refilter();
    }

    /// Select every observed model.
    pub fn select_all_models(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.models = ds.models.clone();
            self.refilter();
        }
    }

    /// Deselect every model (empty view by policy).
    pub fn select_no_models(&mut self) {
        self.criteria.models.clear();
        self.refilter();
    }

    /// Select every observed fuel type.
    pub fn select_all_fuels(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.fuel_types = ds.fuel_types.clone();
            self.refilter();
        }
    }

    /// Deselect every fuel type (empty view by policy).
    pub fn select_no_fuels(&mut self) {
        self.criteria.fuel_types.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Listing;

    fn dataset() -> ListingDataset {
        let rows = vec![
            Listing {
                model: "X3".to_string(),
                year: 2018,
                price: 20_000.0,
                mileage: 30_000.0,
                fuel_type: "Diesel".to_string(),
                transmission: "Automatic".to_string(),
                mpg: 52.0,
                engine_size: 2.0,
                tax: 145.0,
            },
            Listing {
                model: "X5".to_string(),
                year: 2020,
                price: 40_000.0,
                mileage: 12_000.0,
                fuel_type: "Petrol".to_string(),
                transmission: "Semi-Auto".to_string(),
                mpg: 31.0,
                engine_size: 3.0,
                tax: 150.0,
            },
        ];
        ListingDataset::from_listings(rows)
    }

    #[test]
    fn set_dataset_starts_with_identity_view() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.visible, vec![0, 1]);
        assert_eq!(state.criteria.year_range, (2018, 2020));
    }

    #[test]
    fn deselecting_everything_empties_the_view() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.select_no_models();
        assert!(state.visible.is_empty());
        state.select_all_models();
        assert_eq!(state.visible.len(), 2);
    }

    #[test]
    fn toggling_narrows_and_restores() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.toggle_fuel("Petrol");
        assert_eq!(state.visible, vec![0]);
        state.toggle_fuel("Petrol");
        assert_eq!(state.visible, vec![0, 1]);
    }

    #[test]
    fn year_range_is_normalised() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_year_range(2020, 2018);
        assert_eq!(state.criteria.year_range, (2018, 2020));
    }
}

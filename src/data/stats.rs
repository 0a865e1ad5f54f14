use std::collections::BTreeMap;

use super::model::{ListingDataset, NumericField};

// ---------------------------------------------------------------------------
// Scalar summaries
// ---------------------------------------------------------------------------

/// Per-field summary statistics over a view.
///
/// Every statistic except `count` is `None` on an empty view; `std_dev`
/// additionally needs at least 2 values (sample formula, n − 1 divisor).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalarSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Collect one numeric field over the view, skipping NaN cells.
pub fn field_values(dataset: &ListingDataset, indices: &[usize], field: NumericField) -> Vec<f64> {
    indices
        .iter()
        .map(|&i| field.get(&dataset.listings[i]))
        .filter(|v| !v.is_nan())
        .collect()
}

/// Compute count / mean / median / sample std dev / min / max.
pub fn summarize(values: &[f64]) -> ScalarSummary {
    let n = values.len();
    if n == 0 {
        return ScalarSummary::default();
    }

    let sum: f64 = values.iter().sum();
    let mean = sum / n as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    let std_dev = if n >= 2 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((ss / (n - 1) as f64).sqrt())
    } else {
        None
    };

    ScalarSummary {
        count: n,
        mean: Some(mean),
        median: Some(median),
        std_dev,
        min: Some(sorted[0]),
        max: Some(sorted[n - 1]),
    }
}

/// Mean of one numeric field over the view; `None` on an empty view.
pub fn mean_of(dataset: &ListingDataset, indices: &[usize], field: NumericField) -> Option<f64> {
    let values = field_values(dataset, indices, field);
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Five-number summary driving a single box-plot element.
#[derive(Debug, Clone, PartialEq)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Quartiles by linear interpolation between closest ranks.
pub fn five_number(values: &[f64]) -> Option<FiveNumber> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let quantile = |q: f64| -> f64 {
        let pos = q * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    };

    Some(FiveNumber {
        min: sorted[0],
        q1: quantile(0.25),
        median: quantile(0.5),
        q3: quantile(0.75),
        max: sorted[sorted.len() - 1],
    })
}

// ---------------------------------------------------------------------------
// Group-by aggregates
// ---------------------------------------------------------------------------

fn group_means<K: Ord>(
    indices: &[usize],
    key: impl Fn(usize) -> K,
    value: impl Fn(usize) -> f64,
) -> Vec<(K, f64)> {
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for &i in indices {
        let v = value(i);
        if v.is_nan() {
            continue;
        }
        let entry = acc.entry(key(i)).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Mean `price` per `model`, sorted descending by mean.
pub fn mean_price_by_model(dataset: &ListingDataset, indices: &[usize]) -> Vec<(String, f64)> {
    let mut rows = group_means(
        indices,
        |i| dataset.listings[i].model.clone(),
        |i| dataset.listings[i].price,
    );
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows
}

/// Mean `price` per `year`, sorted ascending by year.
pub fn mean_price_by_year(dataset: &ListingDataset, indices: &[usize]) -> Vec<(i32, f64)> {
    // BTreeMap iteration already yields ascending years.
    group_means(
        indices,
        |i| dataset.listings[i].year,
        |i| dataset.listings[i].price,
    )
}

/// Mean `mpg` per `fuel_type`, sorted descending by mean.
pub fn mean_mpg_by_fuel(dataset: &ListingDataset, indices: &[usize]) -> Vec<(String, f64)> {
    let mut rows = group_means(
        indices,
        |i| dataset.listings[i].fuel_type.clone(),
        |i| dataset.listings[i].mpg,
    );
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows
}

/// Listing count per `(fuel_type, transmission)` pair.
pub fn counts_by_fuel_transmission(
    dataset: &ListingDataset,
    indices: &[usize],
) -> Vec<((String, String), usize)> {
    let mut acc: BTreeMap<(String, String), usize> = BTreeMap::new();
    for &i in indices {
        let l = &dataset.listings[i];
        *acc.entry((l.fuel_type.clone(), l.transmission.clone()))
            .or_default() += 1;
    }
    acc.into_iter().collect()
}

/// Listing count per `transmission` (pie chart input).
pub fn transmission_counts(dataset: &ListingDataset, indices: &[usize]) -> Vec<(String, usize)> {
    let mut acc: BTreeMap<String, usize> = BTreeMap::new();
    for &i in indices {
        *acc.entry(dataset.listings[i].transmission.clone())
            .or_default() += 1;
    }
    acc.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// One histogram bin: inclusive lower edge, exclusive upper edge (the last
/// bin includes its upper edge), and the number of values inside.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Fixed-width binning over the observed value range.  Empty input or a
/// degenerate range (all values equal) yields a single all-encompassing bin
/// or nothing at all.
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || n_bins == 0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range <= 0.0 {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = range / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(n_bins - 1);
        counts[bin] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterCriteria};
    use crate::data::model::Listing;

    fn listing(model: &str, year: i32, price: f64, fuel: &str, trans: &str, mpg: f64) -> Listing {
        Listing {
            model: model.to_string(),
            year,
            price,
            mileage: 25_000.0,
            fuel_type: fuel.to_string(),
            transmission: trans.to_string(),
            mpg,
            engine_size: 2.0,
            tax: 145.0,
        }
    }

    fn sample_dataset() -> ListingDataset {
        ListingDataset::from_listings(vec![
            listing("X3", 2018, 20_000.0, "Diesel", "Automatic", 52.0),
            listing("X3", 2019, 24_000.0, "Diesel", "Manual", 50.0),
            listing("X5", 2020, 40_000.0, "Petrol", "Automatic", 30.0),
            listing("X1", 2018, 18_000.0, "Petrol", "Manual", 44.0),
        ])
    }

    fn identity(ds: &ListingDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn summarize_basic() {
        let s = summarize(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, Some(2.5));
        assert_eq!(s.median, Some(2.5));
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(4.0));
        // Sample variance of 1..4 is 5/3.
        let sd = s.std_dev.unwrap();
        assert!((sd - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn summarize_empty_is_all_none() {
        let s = summarize(&[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, None);
        assert_eq!(s.median, None);
        assert_eq!(s.std_dev, None);
        assert_eq!(s.min, None);
        assert_eq!(s.max, None);
    }

    #[test]
    fn std_dev_undefined_for_single_value() {
        let s = summarize(&[20_000.0]);
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, Some(20_000.0));
        assert_eq!(s.std_dev, None);
    }

    #[test]
    fn concrete_two_row_scenario() {
        let ds = ListingDataset::from_listings(vec![
            listing("X3", 2018, 20_000.0, "Diesel", "Automatic", 52.0),
            listing("X5", 2020, 40_000.0, "Petrol", "Automatic", 30.0),
        ]);
        let mut criteria = FilterCriteria::all_of(&ds);
        criteria.models = ["X3".to_string()].into();
        criteria.year_range = (2018, 2018);
        criteria.fuel_types = ["Diesel".to_string()].into();

        let view = filtered_indices(&ds, &criteria);
        assert_eq!(view.len(), 1);

        let prices = field_values(&ds, &view, NumericField::Price);
        let s = summarize(&prices);
        assert_eq!(s.mean, Some(20_000.0));
        assert_eq!(s.std_dev, None);
    }

    #[test]
    fn group_means_have_required_sort_orders() {
        let ds = sample_dataset();
        let view = identity(&ds);

        let by_model = mean_price_by_model(&ds, &view);
        assert_eq!(by_model[0].0, "X5");
        assert!(by_model.windows(2).all(|w| w[0].1 >= w[1].1));
        // X3 mean is (20k + 24k) / 2.
        let x3 = by_model.iter().find(|(m, _)| m == "X3").unwrap();
        assert_eq!(x3.1, 22_000.0);

        let by_year = mean_price_by_year(&ds, &view);
        assert!(by_year.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(by_year[0], (2018, 19_000.0));

        let by_fuel = mean_mpg_by_fuel(&ds, &view);
        assert_eq!(by_fuel[0].0, "Diesel");
        assert!(by_fuel.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn weighted_group_means_equal_overall_mean() {
        let ds = sample_dataset();
        let view = identity(&ds);

        let overall = mean_of(&ds, &view, NumericField::Price).unwrap();

        let mut group_counts: BTreeMap<String, usize> = BTreeMap::new();
        for &i in &view {
            *group_counts.entry(ds.listings[i].model.clone()).or_default() += 1;
        }

        let weighted: f64 = mean_price_by_model(&ds, &view)
            .iter()
            .map(|(model, mean)| mean * group_counts[model] as f64)
            .sum::<f64>()
            / view.len() as f64;

        assert!((weighted - overall).abs() < 1e-9);
    }

    #[test]
    fn pair_counts() {
        let ds = sample_dataset();
        let view = identity(&ds);

        let pairs = counts_by_fuel_transmission(&ds, &view);
        assert_eq!(pairs.len(), 4);
        assert!(pairs
            .iter()
            .any(|((f, t), n)| f == "Diesel" && t == "Manual" && *n == 1));
        let total: usize = pairs.iter().map(|(_, n)| n).sum();
        assert_eq!(total, view.len());

        let trans = transmission_counts(&ds, &view);
        assert_eq!(trans, vec![("Automatic".to_string(), 2), ("Manual".to_string(), 2)]);
    }

    #[test]
    fn grouping_empty_view_is_empty() {
        let ds = sample_dataset();
        let view: Vec<usize> = Vec::new();
        assert!(mean_price_by_model(&ds, &view).is_empty());
        assert!(mean_price_by_year(&ds, &view).is_empty());
        assert!(mean_mpg_by_fuel(&ds, &view).is_empty());
        assert!(counts_by_fuel_transmission(&ds, &view).is_empty());
        assert_eq!(mean_of(&ds, &view, NumericField::Mpg), None);
        assert_eq!(five_number(&[]), None);
    }

    #[test]
    fn histogram_bins_cover_all_values() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 9.5, 10.0];
        let bins = histogram(&values, 3);
        assert_eq!(bins.len(), 3);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[2].upper, 10.0);
        // Max value lands in the last bin, not one past the end.
        assert!(bins[2].count >= 1);
    }

    #[test]
    fn histogram_degenerate_range() {
        let bins = histogram(&[7.0, 7.0, 7.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert!(histogram(&[], 10).is_empty());
    }

    #[test]
    fn five_number_quartiles() {
        let f = five_number(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(f.min, 1.0);
        assert_eq!(f.q1, 2.0);
        assert_eq!(f.median, 3.0);
        assert_eq!(f.q3, 4.0);
        assert_eq!(f.max, 5.0);
    }
}

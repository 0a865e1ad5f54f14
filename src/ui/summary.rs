use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::loader;
use crate::data::model::{ListingDataset, NumericField};
use crate::data::stats::{self, ScalarSummary};
use crate::state::AppState;

/// How many filtered rows the preview table shows.
const PREVIEW_ROWS: usize = 50;

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// The five key metrics across the top of the dashboard.
pub fn metrics_strip(ui: &mut Ui, dataset: &ListingDataset, visible: &[usize]) {
    ui.columns(5, |cols| {
        metric(&mut cols[0], "Total Vehicles", group_thousands(visible.len() as f64, 0));
        metric(
            &mut cols[1],
            "Avg Price",
            fmt_mean(dataset, visible, NumericField::Price, 0, "$", ""),
        );
        metric(
            &mut cols[2],
            "Avg Mileage",
            fmt_mean(dataset, visible, NumericField::Mileage, 0, "", " mi"),
        );
        metric(
            &mut cols[3],
            "Avg MPG",
            fmt_mean(dataset, visible, NumericField::Mpg, 1, "", ""),
        );
        metric(
            &mut cols[4],
            "Avg Engine Size",
            fmt_mean(dataset, visible, NumericField::EngineSize, 2, "", "L"),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical_centered(|ui| {
        ui.label(label);
        ui.label(RichText::new(value).heading().strong());
    });
}

fn fmt_mean(
    dataset: &ListingDataset,
    visible: &[usize],
    field: NumericField,
    decimals: usize,
    prefix: &str,
    suffix: &str,
) -> String {
    match stats::mean_of(dataset, visible, field) {
        Some(mean) => format!("{prefix}{}{suffix}", group_thousands(mean, decimals)),
        None => "—".to_string(),
    }
}

/// `1234567.891` with 1 decimal → `"1,234,567.9"`.
fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

// ---------------------------------------------------------------------------
// Summary statistics table
// ---------------------------------------------------------------------------

/// Count / mean / median / std dev / min / max over price, mileage, and MPG.
pub fn summary_table(ui: &mut Ui, dataset: &ListingDataset, visible: &[usize]) {
    let summaries: Vec<(NumericField, ScalarSummary)> =
        [NumericField::Price, NumericField::Mileage, NumericField::Mpg]
            .into_iter()
            .map(|field| {
                let values = stats::field_values(dataset, visible, field);
                (field, stats::summarize(&values))
            })
            .collect();

    let stat_rows: [(&str, fn(&ScalarSummary) -> Option<f64>); 5] = [
        ("Mean", |s| s.mean),
        ("Median", |s| s.median),
        ("Std Dev", |s| s.std_dev),
        ("Min", |s| s.min),
        ("Max", |s| s.max),
    ];

    TableBuilder::new(ui)
        .id_salt("summary_stats")
        .striped(true)
        .column(Column::auto().at_least(80.0))
        .columns(Column::remainder(), summaries.len())
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("Metric");
            });
            for (field, _) in &summaries {
                header.col(|ui| {
                    ui.strong(field.label());
                });
            }
        })
        .body(|mut body| {
            body.row(20.0, |mut row| {
                row.col(|ui| {
                    ui.label("Count");
                });
                for (_, summary) in &summaries {
                    row.col(|ui| {
                        ui.label(group_thousands(summary.count as f64, 0));
                    });
                }
            });
            for (name, extract) in stat_rows {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(name);
                    });
                    for (field, summary) in &summaries {
                        let decimals = match field {
                            NumericField::Mileage => 0,
                            _ => 2,
                        };
                        row.col(|ui| {
                            let text = match extract(summary) {
                                Some(v) => group_thousands(v, decimals),
                                None => "—".to_string(),
                            };
                            ui.label(text);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Filtered-row preview
// ---------------------------------------------------------------------------

/// First 50 rows of the filtered view, in source column order.
pub fn preview_table(ui: &mut Ui, dataset: &ListingDataset, visible: &[usize]) {
    let shown = &visible[..visible.len().min(PREVIEW_ROWS)];

    TableBuilder::new(ui)
        .id_salt("row_preview")
        .striped(true)
        .columns(Column::auto().at_least(60.0), loader::CSV_COLUMNS.len())
        .header(22.0, |mut header| {
            for name in loader::CSV_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown.len(), |mut row| {
                let l = &dataset.listings[shown[row.index()]];
                let cells = [
                    l.model.clone(),
                    l.year.to_string(),
                    format!("{:.0}", l.price),
                    format!("{:.0}", l.mileage),
                    l.fuel_type.clone(),
                    l.transmission.clone(),
                    format!("{:.1}", l.mpg),
                    format!("{:.1}", l.engine_size),
                    format!("{:.0}", l.tax),
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });

    if visible.len() > PREVIEW_ROWS {
        ui.label(format!(
            "Showing first {PREVIEW_ROWS} of {} filtered rows",
            visible.len()
        ));
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Save-dialog wrapper around the CSV export of the current filtered view.
pub fn export_button(ui: &mut Ui, state: &mut AppState) {
    if !ui.button("Download filtered data as CSV").clicked() {
        return;
    }
    let Some(dataset) = &state.dataset else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name("bmw_data.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match loader::export_filtered(dataset, &state.visible, &path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", state.visible.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Export error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::group_thousands;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1_000.0, 0), "1,000");
        assert_eq!(group_thousands(1_234_567.891, 1), "1,234,567.9");
        assert_eq!(group_thousands(-20_000.0, 2), "-20,000.00");
    }
}

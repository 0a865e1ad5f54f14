use std::f32::consts::TAU;

use eframe::egui::{self, Color32, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use crate::data::model::{ListingDataset, NumericField};
use crate::data::stats;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Chart grid
// ---------------------------------------------------------------------------

/// Render the full dashboard chart grid for the current filtered view.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let visible = &state.visible;

    ui.columns(2, |cols| {
        cols[0].heading("Price Distribution by Model");
        price_box_plot(&mut cols[0], state, dataset, visible);
        cols[1].heading("Transmission Type Distribution");
        transmission_pie(&mut cols[1], state, dataset, visible);
    });

    ui.add_space(12.0);
    ui.columns(2, |cols| {
        cols[0].heading("Price vs Mileage");
        scatter(
            &mut cols[0],
            "scatter_price_mileage",
            state,
            dataset,
            visible,
            NumericField::Mileage,
            NumericField::Price,
        );
        cols[1].heading("Engine Size vs MPG");
        scatter(
            &mut cols[1],
            "scatter_engine_mpg",
            state,
            dataset,
            visible,
            NumericField::EngineSize,
            NumericField::Mpg,
        );
    });

    ui.add_space(12.0);
    ui.heading("Average Price Trend Over Years");
    price_trend(ui, dataset, visible);

    ui.add_space(12.0);
    ui.columns(2, |cols| {
        cols[0].heading("Average Price by Model");
        price_by_model_bars(&mut cols[0], state, dataset, visible);
        cols[1].heading("Vehicle Count by Fuel Type & Transmission");
        fuel_transmission_bars(&mut cols[1], state, dataset, visible);
    });

    ui.add_space(12.0);
    ui.columns(3, |cols| {
        cols[0].heading("Tax Distribution");
        histogram_chart(&mut cols[0], "tax_hist", dataset, visible, NumericField::Tax, 30);
        cols[1].heading("Average MPG by Fuel Type");
        mpg_by_fuel_bars(&mut cols[1], state, dataset, visible);
        cols[2].heading("Engine Size Distribution");
        histogram_chart(
            &mut cols[2],
            "engine_hist",
            dataset,
            visible,
            NumericField::EngineSize,
            25,
        );
    });
}

// ---------------------------------------------------------------------------
// Box plot: price per model
// ---------------------------------------------------------------------------

fn price_box_plot(ui: &mut Ui, state: &AppState, dataset: &ListingDataset, visible: &[usize]) {
    let models: Vec<String> = dataset.models.iter().cloned().collect();

    let mut box_plots = Vec::new();
    for (pos, model) in models.iter().enumerate() {
        let prices: Vec<f64> = visible
            .iter()
            .map(|&i| &dataset.listings[i])
            .filter(|l| &l.model == model)
            .map(|l| l.price)
            .collect();

        let Some(f) = stats::five_number(&prices) else {
            continue;
        };
        let color = state.model_colors.color_for(model);
        let elem = BoxElem::new(
            pos as f64,
            BoxSpread::new(f.min, f.q1, f.median, f.q3, f.max),
        )
        .fill(color.gamma_multiply(0.4))
        .stroke(Stroke::new(1.5, color));

        box_plots.push(BoxPlot::new(vec![elem]).name(model));
    }

    let labels = models.clone();
    Plot::new("price_box_plot")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("Price ($)")
        .x_axis_formatter(move |mark, _range| {
            index_label(&labels, mark.value)
        })
        .show(ui, |plot_ui| {
            for bp in box_plots {
                plot_ui.box_plot(bp);
            }
        });
}

/// Label integer positions with the category at that index, nothing else.
fn index_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Pie chart: transmission share
// ---------------------------------------------------------------------------

fn transmission_pie(ui: &mut Ui, state: &AppState, dataset: &ListingDataset, visible: &[usize]) {
    let counts = stats::transmission_counts(dataset, visible);
    let total: usize = counts.iter().map(|(_, n)| n).sum();

    if total == 0 {
        ui.allocate_ui(Vec2::new(ui.available_width(), CHART_HEIGHT), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label("No data");
            });
        });
        return;
    }

    ui.horizontal(|ui| {
        let size = CHART_HEIGHT.min(ui.available_width() * 0.7);
        let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
        let center = response.rect.center();
        let radius = size * 0.45;

        let mut start_angle = -TAU / 4.0;
        for (transmission, count) in &counts {
            let fraction = *count as f32 / total as f32;
            let sweep = fraction * TAU;
            let color = state.transmission_colors.color_for(transmission);

            // Triangle-fan wedge approximated with ~1 vertex per 3 degrees.
            let steps = ((sweep / 0.05).ceil() as usize).max(2);
            let mut points = vec![center];
            for s in 0..=steps {
                let angle = start_angle + sweep * (s as f32 / steps as f32);
                points.push(center + radius * Vec2::angled(angle));
            }
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));

            if fraction > 0.04 {
                let mid = start_angle + sweep / 2.0;
                painter.text(
                    center + radius * 0.6 * Vec2::angled(mid),
                    egui::Align2::CENTER_CENTER,
                    format!("{:.1}%", fraction * 100.0),
                    egui::FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
            start_angle += sweep;
        }

        // Legend.
        ui.vertical(|ui| {
            for (transmission, count) in &counts {
                let color = state.transmission_colors.color_for(transmission);
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter().rect_filled(rect, 2, color);
                    ui.label(format!("{transmission} ({count})"));
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Scatter plots, colored by fuel type
// ---------------------------------------------------------------------------

fn scatter(
    ui: &mut Ui,
    id: &str,
    state: &AppState,
    dataset: &ListingDataset,
    visible: &[usize],
    x_field: NumericField,
    y_field: NumericField,
) {
    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(x_field.label())
        .y_axis_label(y_field.label())
        .show(ui, |plot_ui| {
            for fuel in &dataset.fuel_types {
                let points: PlotPoints = visible
                    .iter()
                    .map(|&i| &dataset.listings[i])
                    .filter(|l| &l.fuel_type == fuel)
                    .map(|l| [x_field.get(l), y_field.get(l)])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(fuel)
                        .color(state.fuel_colors.color_for(fuel))
                        .radius(2.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Line chart: average price per year
// ---------------------------------------------------------------------------

fn price_trend(ui: &mut Ui, dataset: &ListingDataset, visible: &[usize]) {
    let yearly = stats::mean_price_by_year(dataset, visible);
    let points: PlotPoints = yearly
        .iter()
        .map(|&(year, mean)| [year as f64, mean])
        .collect();
    let markers: PlotPoints = yearly
        .iter()
        .map(|&(year, mean)| [year as f64, mean])
        .collect();

    Plot::new("price_trend")
        .height(CHART_HEIGHT * 0.85)
        .x_axis_label("Year")
        .y_axis_label("Average Price ($)")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(Color32::from_rgb(31, 119, 180)).width(3.0));
            plot_ui.points(
                Points::new(markers)
                    .color(Color32::from_rgb(31, 119, 180))
                    .radius(4.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

fn price_by_model_bars(ui: &mut Ui, state: &AppState, dataset: &ListingDataset, visible: &[usize]) {
    let means = stats::mean_price_by_model(dataset, visible);
    let labels: Vec<String> = means.iter().map(|(m, _)| m.clone()).collect();

    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(pos, (model, mean))| {
            Bar::new(pos as f64, *mean)
                .width(0.7)
                .fill(state.model_colors.color_for(model))
        })
        .collect();

    Plot::new("price_by_model")
        .height(CHART_HEIGHT)
        .x_axis_label("Average Price ($)")
        .y_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

fn fuel_transmission_bars(ui: &mut Ui, state: &AppState, dataset: &ListingDataset, visible: &[usize]) {
    let counts = stats::counts_by_fuel_transmission(dataset, visible);
    let fuels: Vec<String> = dataset.fuel_types.iter().cloned().collect();
    let transmissions: Vec<String> = dataset.transmissions.iter().cloned().collect();

    let n_series = transmissions.len().max(1);
    let group_width = 0.8;
    let bar_width = group_width / n_series as f64;

    let mut charts = Vec::new();
    for (t_idx, transmission) in transmissions.iter().enumerate() {
        let bars: Vec<Bar> = fuels
            .iter()
            .enumerate()
            .filter_map(|(f_idx, fuel)| {
                let count = counts
                    .iter()
                    .find(|((f, t), _)| f == fuel && t == transmission)
                    .map(|(_, n)| *n)?;
                let offset = (t_idx as f64 - (n_series as f64 - 1.0) / 2.0) * bar_width;
                Some(Bar::new(f_idx as f64 + offset, count as f64).width(bar_width * 0.9))
            })
            .collect();

        charts.push(
            BarChart::new(bars)
                .name(transmission)
                .color(state.transmission_colors.color_for(transmission)),
        );
    }

    let labels = fuels.clone();
    Plot::new("fuel_transmission")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("Count")
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn mpg_by_fuel_bars(ui: &mut Ui, state: &AppState, dataset: &ListingDataset, visible: &[usize]) {
    let means = stats::mean_mpg_by_fuel(dataset, visible);
    let labels: Vec<String> = means.iter().map(|(f, _)| f.clone()).collect();

    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(pos, (fuel, mean))| {
            Bar::new(pos as f64, *mean)
                .width(0.7)
                .fill(state.fuel_colors.color_for(fuel))
        })
        .collect();

    Plot::new("mpg_by_fuel")
        .height(CHART_HEIGHT)
        .y_axis_label("Average MPG")
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

fn histogram_chart(
    ui: &mut Ui,
    id: &str,
    dataset: &ListingDataset,
    visible: &[usize],
    field: NumericField,
    n_bins: usize,
) {
    let values = stats::field_values(dataset, visible, field);
    let bins = stats::histogram(&values, n_bins);

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            let center = (bin.lower + bin.upper) / 2.0;
            Bar::new(center, bin.count as f64)
                .width((bin.upper - bin.lower) * 0.95)
                .fill(Color32::from_rgb(31, 119, 180))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(field.label())
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

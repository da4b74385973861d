use std::collections::BTreeMap;

use eframe::egui::{Color32, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::label_color;
use crate::state::{AnalyticsView, AppState};
use crate::ui::panels::open_analytics_dialog;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Analytics (central panel)
// ---------------------------------------------------------------------------

pub fn analytics_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard Analytics");
    if ui.button("Upload CSV to analyze…").clicked() {
        open_analytics_dialog(state);
    }

    if let Some(err) = &state.analytics_error {
        ui.colored_label(Color32::RED, err);
        if state.analytics_missing_columns {
            ui.colored_label(
                Color32::RED,
                "CSV must have 'Prediction' and 'Confidence (%)' columns",
            );
        }
    }

    let Some(view) = &state.analytics else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a scored table to view analytics  (File → Open scored table…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.weak(view.source.display().to_string());

            ui.add_space(8.0);
            ui.strong("Malignant vs Benign Count");
            count_chart(ui, view);

            ui.add_space(8.0);
            ui.strong("Confidence Distribution");
            confidence_chart(ui, view);

            ui.add_space(8.0);
            ui.strong("Radius Mean vs Radius Worst");
            radius_scatter(ui, view);
        });
}

fn count_chart(ui: &mut Ui, view: &AnalyticsView) {
    let bars: Vec<Bar> = view
        .counts
        .iter()
        .enumerate()
        .map(|(i, vc)| {
            Bar::new(i as f64, vc.count as f64)
                .name(&vc.label)
                .fill(label_color(&vc.label))
                .width(0.6)
        })
        .collect();

    Plot::new("count_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Patients")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Prediction"));
        });
}

fn confidence_chart(ui: &mut Ui, view: &AnalyticsView) {
    let Some(hist) = &view.histogram else {
        ui.label("No confidence values to plot.");
        return;
    };
    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .centers()
        .zip(&hist.counts)
        .map(|(center, &count)| Bar::new(center, count as f64).width(width))
        .collect();

    Plot::new("confidence_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Confidence (%)")
        .y_axis_label("Number of Patients")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Patients")
                    .color(Color32::from_rgb(70, 110, 220)),
            );
            if !view.density.is_empty() {
                let curve: PlotPoints = view.density.iter().copied().collect();
                plot_ui.line(Line::new(curve).name("KDE").color(Color32::BLUE).width(2.0));
            }
        });
}

fn radius_scatter(ui: &mut Ui, view: &AnalyticsView) {
    let Some(points) = &view.scatter else {
        ui.label("Table has no radius_mean / radius_worst columns.");
        return;
    };

    // One series per label so each gets a legend entry and colour.
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        series
            .entry(p.label.as_str())
            .or_default()
            .push([p.radius_mean, p.radius_worst]);
    }

    Plot::new("radius_scatter")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Radius Mean")
        .y_axis_label("Radius Worst")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (label, coords) in series {
                let name = if label.is_empty() { "<none>" } else { label };
                let color = label_color(label).gamma_multiply(0.7);
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .name(name)
                        .color(color)
                        .radius(3.5),
                );
            }
        });
}

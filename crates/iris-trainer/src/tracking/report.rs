//! HTML run report: metrics table, confusion matrix and a feature
//! importance chart.
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot};

use crate::tracking::tracker::{FeatureImportance, RunRecord};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// Bar chart of feature importances, highest first.
pub fn plot_feature_importances(importances: &[FeatureImportance], title: &str) -> Plot {
    let mut sorted: Vec<&FeatureImportance> = importances.iter().collect();
    sorted.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let names: Vec<String> = sorted.iter().map(|f| f.feature.clone()).collect();
    let values: Vec<f64> = sorted.iter().map(|f| f.importance).collect();

    let layout = Layout::new()
        .title(title)
        .x_axis(Axis::new().title("Feature"))
        .y_axis(Axis::new().title("Importance"));

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(names, values).name("importance"));
    plot.set_layout(layout);
    plot
}

fn confusion_table(run: &RunRecord) -> Markup {
    let classes = &run.metrics.classes;
    html! {
        table.confusion {
            thead {
                tr {
                    th { "truth \\ predicted" }
                    @for class in classes { th { (class) } }
                }
            }
            tbody {
                @for (i, row) in run.metrics.confusion_matrix.iter().enumerate() {
                    tr {
                        th { (classes.get(i).map(String::as_str).unwrap_or("?")) }
                        @for count in row { td { (count) } }
                    }
                }
            }
        }
    }
}

/// Render a standalone HTML page for one run.
pub fn render_run_report(run: &RunRecord) -> String {
    let importance_plot = if run.feature_importances.is_empty() {
        None
    } else {
        let plot = plot_feature_importances(&run.feature_importances, "Feature importance");
        Some(plot.to_inline_html(Some("feature-importance")))
    };

    let page = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Run " (run.run_id) }
                script src=(PLOTLY_CDN) {}
                style { "table { border-collapse: collapse; } td, th { border: 1px solid #ccc; padding: 4px 8px; }" }
            }
            body {
                h1 { (run.model_name) " (" (run.model_kind) ")" }
                p {
                    "Run " code { (run.run_id) } " fitted on " (run.n_train_rows)
                    " rows in " (format!("{:.3}", run.fit_seconds)) "s, evaluated on "
                    (run.n_test_rows) " held-out rows."
                }
                h2 { "Metrics" }
                table {
                    @for (name, value) in run.metrics.scalars() {
                        tr { th { (name) } td { (format!("{:.4}", value)) } }
                    }
                }
                h2 { "Confusion matrix" }
                (confusion_table(run))
                h2 { "Parameters" }
                table {
                    @for (key, value) in &run.params {
                        tr { th { (key) } td { (value) } }
                    }
                }
                @if let Some(plot_html) = &importance_plot {
                    h2 { "Feature importance" }
                    (PreEscaped(plot_html.clone()))
                }
            }
        }
    };
    page.into_string()
}

use eframe::egui::{Align2, Color32, Ui};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoint, PlotPoints, Text};

use crate::figure::format_db;
use crate::state::AppState;

const GRID: Color32 = Color32::from_gray(170);
const LABEL_RADIUS: f64 = 1.09;
const RADIAL_LABEL_DEG: f64 = 22.5;

// ---------------------------------------------------------------------------
// Polar plot (central panel)
// ---------------------------------------------------------------------------

/// Render the polar figure as a square cartesian plot with a drawn grid.
pub fn polar_plot(ui: &mut Ui, state: &AppState) {
    let figure = &state.figure;

    if figure.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No datasets in input (no '#' marker lines)");
        });
        return;
    }

    Plot::new("polar_plot")
        .legend(Legend::default().position(Corner::RightBottom))
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .include_x(-1.2)
        .include_x(1.2)
        .include_y(-1.2)
        .include_y(1.2)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for tick in figure.visible_radial_ticks() {
                if tick < 0.0 {
                    plot_ui.line(
                        Line::new(PlotPoints::from(figure.ring_xy(tick)))
                            .color(GRID)
                            .width(0.5),
                    );
                }
                let [x, y] = figure.to_xy(RADIAL_LABEL_DEG.to_radians(), tick);
                plot_ui.text(
                    Text::new(PlotPoint::new(x, y), format_db(tick))
                        .color(Color32::DARK_GRAY)
                        .anchor(Align2::CENTER_CENTER),
                );
            }
            plot_ui.line(
                Line::new(PlotPoints::from(figure.ring_xy(0.0)))
                    .color(Color32::GRAY)
                    .width(1.0),
            );

            for deg in &figure.angular_ticks_deg {
                let t = deg.to_radians();
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[0.0, 0.0], [t.cos(), t.sin()]]))
                        .color(GRID)
                        .width(0.5),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(LABEL_RADIUS * t.cos(), LABEL_RADIUS * t.sin()),
                        format!("{deg:.0}°"),
                    )
                    .anchor(Align2::CENTER_CENTER),
                );
            }

            for trace in state.visible_traces() {
                let points: PlotPoints = figure.trace_xy(trace).into_iter().collect();
                // bold is in points; egui widths are logical pixels
                let line = Line::new(points)
                    .name(&trace.label)
                    .color(trace.color)
                    .width(trace.width as f32);

                plot_ui.line(line);
            }
        });
}

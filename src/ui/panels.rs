use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::figure::format_db;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – trace list
// ---------------------------------------------------------------------------

/// Render the trace list with visibility checkboxes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Traces");
    ui.separator();

    if state.figure.traces.is_empty() {
        ui.label("No datasets loaded.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });
    ui.separator();

    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, trace) in state.figure.traces.iter().enumerate() {
                let label = if trace.label.is_empty() {
                    format!("dataset {}", idx + 1)
                } else {
                    trace.label.clone()
                };

                let mut checked = state.visible[idx];
                let text = RichText::new(label).color(trace.color);
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(idx);
                }
            }
        });

    if let Some(idx) = toggled {
        state.toggle(idx);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and a one-line summary.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(&state.figure.title);
        ui.separator();
        ui.label(format!(
            "{} traces, {} visible",
            state.figure.traces.len(),
            state.visible_count()
        ));
        ui.separator();
        ui.label(format!(
            "0 dB = {} dBm",
            format_db(state.figure.reference_dbm)
        ));
    });
}

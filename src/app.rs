use anyhow::{anyhow, Result};
use eframe::egui;

use crate::figure::PolarFigure;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RadigApp {
    pub state: AppState,
}

impl RadigApp {
    pub fn new(figure: PolarFigure) -> Self {
        Self {
            state: AppState::new(figure),
        }
    }
}

impl eframe::App for RadigApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: traces ----
        egui::SidePanel::left("trace_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: polar plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::polar_plot(ui, &self.state);
        });
    }
}

/// Open a window showing `figure`. Blocks until the window is closed.
pub fn show(figure: PolarFigure) -> Result<()> {
    let window_title = if figure.title.is_empty() {
        "radig".to_string()
    } else {
        format!("radig – {}", figure.title)
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };

    log::info!("opening viewer with {} trace(s)", figure.traces.len());
    eframe::run_native(
        &window_title,
        options,
        Box::new(|_cc| Ok(Box::new(RadigApp::new(figure)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

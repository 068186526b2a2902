use crate::figure::{PolarFigure, PolarTrace};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Everything the viewer shows, independent of rendering.
pub struct AppState {
    /// The figure built from the input file. Never modified.
    pub figure: PolarFigure,

    /// One flag per trace, same order as `figure.traces`.
    pub visible: Vec<bool>,
}

impl AppState {
    pub fn new(figure: PolarFigure) -> Self {
        let visible = vec![true; figure.traces.len()];
        Self { figure, visible }
    }

    /// Traces with their visibility flag set, in file order.
    pub fn visible_traces(&self) -> impl Iterator<Item = &PolarTrace> + '_ {
        self.figure
            .traces
            .iter()
            .zip(&self.visible)
            .filter(|(_, shown)| **shown)
            .map(|(trace, _)| trace)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    pub fn toggle(&mut self, idx: usize) {
        if let Some(flag) = self.visible.get_mut(idx) {
            *flag = !*flag;
        }
    }

    pub fn select_all(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = true);
    }

    pub fn select_none(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = false);
    }
}

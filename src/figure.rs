use eframe::egui::Color32;

use crate::color::{default_cycle, parse_color};
use crate::config::TickRange;
use crate::data::model::{display_name, Trace};
use crate::error::{DiagramError, Result};

/// Line width (points) for traces without a `bold` value.
pub const DEFAULT_LINE_WIDTH: f64 = 1.5;

/// Lowest value the normalisation reference can take.
pub const DBM_FLOOR: f64 = -120.0;

/// Spacing of the angular grid, degrees.
pub const ANGULAR_STEP_DEG: f64 = 30.0;

const AUTO_RINGS: f64 = 5.0;

// ---------------------------------------------------------------------------
// PolarFigure – everything the exporter and the viewer need
// ---------------------------------------------------------------------------

/// One trace, already normalised and styled.
#[derive(Debug, Clone)]
pub struct PolarTrace {
    pub label: String,
    pub color: Color32,
    /// Points, as in a printed figure.
    pub width: f64,
    /// `[theta (rad), r (dB below reference)]`.
    pub points: Vec<[f64; 2]>,
}

/// A polar plot ready to draw. Built once by [`build`]; both outputs read it.
#[derive(Debug, Clone)]
pub struct PolarFigure {
    pub title: String,
    /// Value subtracted from every `dbm` sample.
    pub reference_dbm: f64,
    pub traces: Vec<PolarTrace>,
    /// Radial value drawn at the centre. The outer edge is always 0.
    pub radial_min: f64,
    pub radial_ticks: Vec<f64>,
    pub angular_ticks_deg: Vec<f64>,
}

/// Normalise `traces` against their common maximum and resolve styling.
pub fn build(traces: &[Trace], title: &str, ticks: Option<TickRange>) -> Result<PolarFigure> {
    let reference_dbm = traces
        .iter()
        .filter_map(Trace::max_dbm)
        .fold(DBM_FLOOR, f64::max);

    let auto_colors = default_cycle(traces.iter().filter(|t| t.color.trim().is_empty()).count());
    let mut auto_colors = auto_colors.into_iter();

    let mut polar_traces = Vec::with_capacity(traces.len());
    for (idx, trace) in traces.iter().enumerate() {
        let color = if trace.color.trim().is_empty() {
            auto_colors.next().unwrap_or(Color32::GRAY)
        } else {
            parse_color(&trace.color).ok_or_else(|| DiagramError::UnsupportedColor {
                dataset: display_name(&trace.title, idx),
                color: trace.color.clone(),
            })?
        };

        let points = trace
            .samples
            .iter()
            .map(|s| [s.angles.to_radians(), s.dbm - reference_dbm])
            .collect();

        polar_traces.push(PolarTrace {
            label: trace.title.clone(),
            color,
            width: trace.bold.unwrap_or(DEFAULT_LINE_WIDTH),
            points,
        });
    }

    let data_min = polar_traces
        .iter()
        .flat_map(|t| t.points.iter().map(|p| p[1]))
        .fold(0.0, f64::min);

    let (radial_min, radial_ticks) = match ticks {
        Some(range) => {
            let ticks = arange_below_zero(range);
            let lowest = ticks.first().copied().unwrap_or(0.0);
            (data_min.min(lowest), ticks)
        }
        None => auto_ticks(data_min),
    };
    let radial_min = if radial_min < 0.0 { radial_min } else { -1.0 };

    let angular_ticks_deg = (0..)
        .map(|i: i32| f64::from(i) * ANGULAR_STEP_DEG)
        .take_while(|deg| *deg < 360.0)
        .collect();

    Ok(PolarFigure {
        title: title.to_string(),
        reference_dbm,
        traces: polar_traces,
        radial_min,
        radial_ticks,
        angular_ticks_deg,
    })
}

/// `min, min + step, ...` strictly below zero.
fn arange_below_zero(range: TickRange) -> Vec<f64> {
    let step = f64::from(range.step);
    (0..)
        .map(|i: i32| f64::from(range.min) + f64::from(i) * step)
        .take_while(|v| *v < 0.0)
        .collect()
}

/// Ticks at a round step covering `[data_min, 0]`, about five rings.
fn auto_ticks(data_min: f64) -> (f64, Vec<f64>) {
    if data_min >= 0.0 {
        return (-1.0, vec![-1.0, -0.5, 0.0]);
    }
    let step = nice_step(-data_min / AUTO_RINGS);
    let lowest = (data_min / step).floor() * step;
    let n = (-lowest / step).round() as usize;
    let ticks = (0..=n).map(|i| lowest + i as f64 * step).collect();
    (lowest, ticks)
}

/// Smallest of 1, 2, 2.5, 5, 10 × 10^k that is at least `raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude)
}

impl PolarFigure {
    /// Radial value mapped to `[0, 1]`: 0 at the centre, 1 at the rim.
    pub fn unit_radius(&self, r: f64) -> f64 {
        ((r - self.radial_min) / -self.radial_min).clamp(0.0, 1.0)
    }

    /// Unit-disc position of a polar point; angle 0 is east, counter-clockwise.
    pub fn to_xy(&self, theta: f64, r: f64) -> [f64; 2] {
        let rho = self.unit_radius(r);
        [rho * theta.cos(), rho * theta.sin()]
    }

    pub fn trace_xy(&self, trace: &PolarTrace) -> Vec<[f64; 2]> {
        trace.points.iter().map(|p| self.to_xy(p[0], p[1])).collect()
    }

    /// Closed circle through radial value `r`.
    pub fn ring_xy(&self, r: f64) -> Vec<[f64; 2]> {
        let rho = self.unit_radius(r);
        (0..=360)
            .map(|deg: i32| {
                let t = f64::from(deg).to_radians();
                [rho * t.cos(), rho * t.sin()]
            })
            .collect()
    }

    /// Ticks that fall inside the drawn range.
    pub fn visible_radial_ticks(&self) -> impl Iterator<Item = f64> + '_ {
        self.radial_ticks
            .iter()
            .copied()
            .filter(|t| *t >= self.radial_min && *t <= 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}

pub fn format_db(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sample;

    fn trace(title: &str, color: &str, rows: &[(f64, f64)]) -> Trace {
        Trace {
            title: title.to_string(),
            color: color.to_string(),
            bold: None,
            samples: rows
                .iter()
                .map(|&(angles, dbm)| Sample { angles, dbm })
                .collect(),
        }
    }

    #[test]
    fn normalises_against_global_maximum() {
        let traces = vec![
            trace("A", "red", &[(0.0, -10.0), (90.0, -20.0)]),
            trace("B", "blue", &[(0.0, -4.0), (180.0, -30.0)]),
        ];
        let fig = build(&traces, "t", None).unwrap();
        assert_eq!(fig.reference_dbm, -4.0);
        assert_eq!(fig.traces[0].points[0][1], -6.0);
        assert_eq!(fig.traces[1].points[0][1], 0.0);
        assert!((fig.traces[0].points[1][0] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn reference_never_drops_below_floor() {
        let fig = build(&[trace("deep", "k", &[(0.0, -150.0)])], "t", None).unwrap();
        assert_eq!(fig.reference_dbm, DBM_FLOOR);
        assert_eq!(fig.traces[0].points[0][1], -30.0);
    }

    #[test]
    fn default_width_and_colors() {
        let mut bold = trace("A", "", &[(0.0, -1.0)]);
        bold.bold = Some(3.0);
        let plain = trace("B", "", &[(0.0, -2.0)]);
        let fig = build(&[bold, plain], "t", None).unwrap();
        assert_eq!(fig.traces[0].width, 3.0);
        assert_eq!(fig.traces[1].width, DEFAULT_LINE_WIDTH);
        assert_ne!(fig.traces[0].color, fig.traces[1].color);
    }

    #[test]
    fn unknown_color_is_rejected() {
        let err = build(&[trace("A", "sparkly", &[(0.0, -1.0)])], "t", None).unwrap_err();
        match err {
            DiagramError::UnsupportedColor { dataset, color } => {
                assert_eq!(dataset, "'A'");
                assert_eq!(color, "sparkly");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn explicit_ticks_follow_arange() {
        let traces = vec![trace("A", "r", &[(0.0, 0.0), (90.0, -12.0)])];
        let fig = build(&traces, "t", Some(TickRange { min: -30, step: 10 })).unwrap();
        assert_eq!(fig.radial_ticks, vec![-30.0, -20.0, -10.0]);
        assert_eq!(fig.radial_min, -30.0);
    }

    #[test]
    fn auto_ticks_cover_data() {
        let traces = vec![trace("A", "r", &[(0.0, 0.0), (90.0, -23.0)])];
        let fig = build(&traces, "t", None).unwrap();
        assert_eq!(fig.radial_ticks, vec![-25.0, -20.0, -15.0, -10.0, -5.0, 0.0]);
        assert_eq!(fig.radial_min, -25.0);
    }

    #[test]
    fn angular_ticks_every_thirty_degrees() {
        let fig = build(&[], "empty", None).unwrap();
        assert!(fig.is_empty());
        assert_eq!(fig.angular_ticks_deg.len(), 12);
        assert_eq!(fig.angular_ticks_deg[11], 330.0);
        assert_eq!(fig.radial_min, -1.0);
    }

    #[test]
    fn projection_puts_zero_degrees_east() {
        let traces = vec![trace("A", "r", &[(0.0, 0.0), (90.0, -10.0)])];
        let fig = build(&traces, "t", Some(TickRange { min: -20, step: 10 })).unwrap();
        let xy = fig.trace_xy(&fig.traces[0]);
        assert!((xy[0][0] - 1.0).abs() < 1e-12 && xy[0][1].abs() < 1e-12);
        assert!(xy[1][0].abs() < 1e-12 && (xy[1][1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(4.6), 5.0);
        assert_eq!(nice_step(1.2), 2.0);
        assert_eq!(nice_step(2.1), 2.5);
        assert_eq!(nice_step(7.0), 10.0);
    }
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

/// Gain floor so nulls stay finite in dB.
const MIN_GAIN: f64 = 1e-3;

#[derive(Serialize)]
struct Row {
    angles: f64,
    dbm: f64,
}

struct Antenna {
    title: &'static str,
    color: &'static str,
    bold: Option<f64>,
    peak_dbm: f64,
    /// Linear field gain for an angle in radians, 1.0 at the main lobe.
    gain: fn(f64) -> f64,
}

fn dipole(theta: f64) -> f64 {
    theta.cos().abs()
}

fn patch(theta: f64) -> f64 {
    0.5 * (1.0 + theta.cos())
}

fn yagi(theta: f64) -> f64 {
    let main = (0.5 * (1.0 + theta.cos())).powi(4);
    let back = 0.15 * (0.5 * (1.0 - theta.cos())).powi(2);
    main + back
}

fn omni(theta: f64) -> f64 {
    1.0 - 0.1 * (3.0 * theta).sin().abs()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn marker(antenna: &Antenna) -> String {
    let mut line = format!("# title: \"{}\", color: {}", antenna.title, antenna.color);
    if let Some(bold) = antenna.bold {
        line.push_str(&format!(", bold: {bold}"));
    }
    line
}

fn write_block(out: &mut impl Write, antenna: &Antenna, rng: &mut SimpleRng) -> Result<()> {
    writeln!(out, "{}", marker(antenna))?;

    let mut csv_out = csv::Writer::from_writer(Vec::new());
    for step in 0..=72i32 {
        let angles = f64::from(step) * 5.0;
        let gain = (antenna.gain)(angles.to_radians()).max(MIN_GAIN);
        let dbm = antenna.peak_dbm + 20.0 * gain.log10() + rng.gauss(0.0, 0.3);
        csv_out.serialize(Row {
            angles,
            dbm: (dbm * 100.0).round() / 100.0,
        })?;
    }
    let body = csv_out
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV block: {}", e.error()))?;
    out.write_all(&body)?;
    Ok(())
}

fn main() -> Result<()> {
    let output_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_pattern.txt"));

    let antennas = [
        Antenna {
            title: "Half-wave dipole",
            color: "tab:blue",
            bold: None,
            peak_dbm: -32.0,
            gain: dipole,
        },
        Antenna {
            title: "Patch",
            color: "\"#d62728\"",
            bold: Some(2.0),
            peak_dbm: -28.0,
            gain: patch,
        },
        Antenna {
            title: "Yagi 5 el.",
            color: "green",
            bold: Some(2.5),
            peak_dbm: -24.0,
            gain: yagi,
        },
        Antenna {
            title: "Whip",
            color: "k",
            bold: Some(1.0),
            peak_dbm: -38.0,
            gain: omni,
        },
    ];

    let mut rng = SimpleRng::new(42);
    let file = File::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    let mut out = BufWriter::new(file);
    for antenna in &antennas {
        write_block(&mut out, antenna, &mut rng)?;
    }
    out.flush()?;

    println!(
        "Wrote {} antenna patterns to {}",
        antennas.len(),
        output_path.display()
    );
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const FIRST_YEAR: u32 = 1950;
const LAST_YEAR: u32 = 2017;

const NAMES: [&str; 8] = [
    "CREEK", "CANYON", "RIDGE", "OAK", "VALLEY", "MILL", "PINE", "SUMMIT",
];

/// Fire perimeter rows with the kinds of defects the real table carries:
/// unparseable years, empty acreage fields, unnamed fires.
fn write_frap(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["year_", "fire_name", "report_ac", "gis_acres"])?;

    let mut rows = 0;
    for year in FIRST_YEAR..=LAST_YEAR {
        // Fire counts and sizes drift upward over the decades.
        let trend = (year - FIRST_YEAR) as f64 / (LAST_YEAR - FIRST_YEAR) as f64;
        let n_fires = 40 + (rng.next_f64() * 40.0 * (1.0 + trend)) as usize;

        for _ in 0..n_fires {
            let gis = rng.gauss(4.0 + trend, 2.0).exp();
            let report = gis * rng.gauss(1.0, 0.05).max(0.5);

            let year_cell = if rng.chance(0.01) {
                "unknown".to_string()
            } else {
                year.to_string()
            };
            let name = if rng.chance(0.05) {
                String::new()
            } else {
                let idx = (rng.next_u64() % NAMES.len() as u64) as usize;
                NAMES[idx].to_string()
            };
            let report_cell = if rng.chance(0.3) {
                String::new()
            } else {
                format!("{report:.0}")
            };
            let gis_cell = if rng.chance(0.08) {
                String::new()
            } else if rng.chance(0.01) {
                "n/a".to_string()
            } else {
                format!("{gis:.3}")
            };

            w.write_record([year_cell, name, report_cell, gis_cell])?;
            rows += 1;
        }
    }
    w.flush()?;
    Ok(rows)
}

fn write_damage(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["year", "structures"])?;

    let mut rows = 0;
    for year in 1989..=LAST_YEAR {
        let structures = rng.gauss(6.5, 1.2).exp().round();
        w.write_record([year.to_string(), format!("{structures:.0}")])?;
        rows += 1;
    }
    w.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "sample_data".into()));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let frap = out_dir.join("calfire_frap.csv");
    let n_fires = write_frap(&frap, &mut rng)?;
    log::info!("Wrote {n_fires} fire rows to {}", frap.display());

    let damage = out_dir.join("calfire_damage.csv");
    let n_years = write_damage(&damage, &mut rng)?;
    log::info!("Wrote {n_years} damage rows to {}", damage.display());

    println!("Wrote sample datasets to {}", out_dir.display());
    Ok(())
}

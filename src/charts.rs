//! Chart Data Synthesizer
//!
//! Produces the two series shown next to an analysis result:
//!
//! - a heart-rate trend, hourly from 22:00 to 06:00, built from the result's
//!   average heart rate plus a sine swing and random jitter
//! - a reference hypnogram, half-hourly from 22:00 to 06:00, which is static
//!   illustrative data and does not depend on the result
//!
//! The jitter source is injectable. [`ChartSynthesizer`] draws from a seeded
//! generator when configured with a seed, so every render repeats exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Hour labels of the heart-rate trend
pub const HEART_RATE_LABELS: [&str; 9] = [
    "22:00", "23:00", "00:00", "01:00", "02:00", "03:00", "04:00", "05:00", "06:00",
];

/// Angular step of the sine swing per sample
pub const HEART_RATE_SINE_STEP: f64 = 0.7;
/// Peak amplitude of the sine swing, bpm
pub const HEART_RATE_SINE_AMPLITUDE: f64 = 8.0;
/// Full width of the uniform jitter, bpm (±half on either side)
pub const HEART_RATE_JITTER_SPAN: f64 = 5.0;

/// Display range of the heart-rate Y axis, bpm
pub const HEART_RATE_AXIS: ChartAxis = ChartAxis { min: 50.0, max: 90.0 };
/// Display range of the hypnogram Y axis (stage ordinals)
pub const HYPNOGRAM_AXIS: ChartAxis = ChartAxis { min: 0.0, max: 4.0 };

/// Fixed Y-axis range used when drawing a chart.
///
/// Clamping is visual only; series values are never truncated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartAxis {
    pub min: f64,
    pub max: f64,
}

impl ChartAxis {
    /// Clamp a value into the drawable range
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Sleep stages, ordered as plotted (Wake at the bottom of the axis)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepStage {
    Wake,
    N1,
    N2,
    N3,
    Rem,
}

impl SleepStage {
    pub const ALL: [SleepStage; 5] = [
        SleepStage::Wake,
        SleepStage::N1,
        SleepStage::N2,
        SleepStage::N3,
        SleepStage::Rem,
    ];

    /// Position on the hypnogram axis
    pub fn ordinal(&self) -> u8 {
        match self {
            SleepStage::Wake => 0,
            SleepStage::N1 => 1,
            SleepStage::N2 => 2,
            SleepStage::N3 => 3,
            SleepStage::Rem => 4,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// Axis and tooltip label
    pub fn label(&self) -> &'static str {
        match self {
            SleepStage::Wake => "Wake",
            SleepStage::N1 => "N1",
            SleepStage::N2 => "N2",
            SleepStage::N3 => "N3",
            SleepStage::Rem => "REM",
        }
    }

    /// Scoring code used in polysomnography annotations (W, N1, N2, N3, R)
    pub fn annotation_code(&self) -> &'static str {
        match self {
            SleepStage::Wake => "W",
            SleepStage::N1 => "N1",
            SleepStage::N2 => "N2",
            SleepStage::N3 => "N3",
            SleepStage::Rem => "R",
        }
    }
}

impl std::fmt::Display for SleepStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One point of the heart-rate trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartRateSample {
    pub time: &'static str,
    /// Rounded rate, bpm
    pub rate: i32,
}

/// One epoch of the hypnogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HypnogramSample {
    pub time: &'static str,
    pub stage: SleepStage,
}

/// Stage sequence of the reference night, 22:00 to 06:00 every 30 minutes
const REFERENCE_NIGHT: [(&str, SleepStage); 17] = [
    ("22:00", SleepStage::Wake),
    ("22:30", SleepStage::N1),
    ("23:00", SleepStage::N2),
    ("23:30", SleepStage::N3),
    ("00:00", SleepStage::N3),
    ("00:30", SleepStage::N2),
    ("01:00", SleepStage::Rem),
    ("01:30", SleepStage::N2),
    ("02:00", SleepStage::N3),
    ("02:30", SleepStage::N3),
    ("03:00", SleepStage::N2),
    ("03:30", SleepStage::Rem),
    ("04:00", SleepStage::N1),
    ("04:30", SleepStage::Wake),
    ("05:00", SleepStage::N1),
    ("05:30", SleepStage::N2),
    ("06:00", SleepStage::N1),
];

/// Heart-rate trend around `baseline` bpm.
///
/// Sample `i` is `round(baseline + sin(i * 0.7) * 8 + (u - 0.5) * 5)` with
/// `u` drawn uniformly from `[0, 1)`, so every value stays within
/// `baseline ± 11`.
pub fn heart_rate_series<R: Rng + ?Sized>(baseline: f64, rng: &mut R) -> Vec<HeartRateSample> {
    HEART_RATE_LABELS
        .iter()
        .enumerate()
        .map(|(i, &time)| {
            let swing = (i as f64 * HEART_RATE_SINE_STEP).sin() * HEART_RATE_SINE_AMPLITUDE;
            let jitter = (rng.gen::<f64>() - 0.5) * HEART_RATE_JITTER_SPAN;
            HeartRateSample {
                time,
                rate: (baseline + swing + jitter).round() as i32,
            }
        })
        .collect()
}

/// The static reference hypnogram
pub fn reference_hypnogram() -> Vec<HypnogramSample> {
    REFERENCE_NIGHT
        .iter()
        .map(|&(time, stage)| HypnogramSample { time, stage })
        .collect()
}

/// Chart source used by the API and CLI
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartSynthesizer {
    seed: Option<u64>,
}

impl ChartSynthesizer {
    /// Unseeded: every heart-rate render may differ
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded: every heart-rate render for the same baseline is identical
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn with_seed(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn heart_rate(&self, baseline: f64) -> Vec<HeartRateSample> {
        match self.seed {
            Some(seed) => heart_rate_series(baseline, &mut StdRng::seed_from_u64(seed)),
            None => heart_rate_series(baseline, &mut rand::thread_rng()),
        }
    }

    pub fn hypnogram(&self) -> Vec<HypnogramSample> {
        reference_hypnogram()
    }
}

use derive_getters::Getters;
use eyre::{ensure, Result};

/// Named sizing presets for typical workloads.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub enum Preset {
    /// Windows of 500 bases, suitable for short and noisy overlaps.
    #[default]
    Small,
    /// Windows of 1000 bases.
    Large,
}

/// Sizing parameters and heuristics of the diff aligner. Immutable once a workspace is built.
#[derive(Clone, PartialEq, Debug, Getters)]
pub struct Config {
    /// Length of a single extension window.
    segment_size: usize,
    /// The remaining tail is aligned in one go once it is at most `segment_size + segment_slack`.
    segment_slack: usize,
    /// Number of slots in each diagonal-state array.
    diagonal_capacity: usize,
    /// Maximum number of columns produced by a single window.
    symbol_capacity: usize,
    /// Maximum length of an input sequence.
    max_seq_size: usize,
    /// Maximum number of columns in the merged alignment.
    max_aln_size: usize,
    /// Maximum number of waypoints recorded by one search.
    max_waypoints: usize,
    /// Maximum number of traceback points in one reconstruction.
    max_trace_points: usize,
    /// Band tolerance as a fraction of the window length.
    band_fraction: f64,
    /// Lower bound of the band tolerance. Short tail windows can't absorb a single substitution
    /// with a tolerance below 2.
    min_band_tolerance: usize,
    /// Number of consecutive matches that mark a reliable window end.
    trim_matches: usize,
    /// Rewrite adjacent deletion/insertion pairs into substitutions.
    fold_substitutions: bool,
}

impl Config {
    pub fn small() -> Self {
        Self::from(Preset::Small)
    }

    pub fn large() -> Self {
        Self::from(Preset::Large)
    }

    pub fn with_segment_size(mut self, segment_size: usize) -> Self {
        self.segment_size = segment_size;
        self
    }

    pub fn with_segment_slack(mut self, segment_slack: usize) -> Self {
        self.segment_slack = segment_slack;
        self
    }

    pub fn with_diagonal_capacity(mut self, diagonal_capacity: usize) -> Self {
        self.diagonal_capacity = diagonal_capacity;
        self
    }

    pub fn with_symbol_capacity(mut self, symbol_capacity: usize) -> Self {
        self.symbol_capacity = symbol_capacity;
        self
    }

    pub fn with_max_seq_size(mut self, max_seq_size: usize) -> Self {
        self.max_seq_size = max_seq_size;
        self
    }

    pub fn with_max_aln_size(mut self, max_aln_size: usize) -> Self {
        self.max_aln_size = max_aln_size;
        self
    }

    pub fn with_max_waypoints(mut self, max_waypoints: usize) -> Self {
        self.max_waypoints = max_waypoints;
        self
    }

    pub fn with_max_trace_points(mut self, max_trace_points: usize) -> Self {
        self.max_trace_points = max_trace_points;
        self
    }

    pub fn with_band_fraction(mut self, band_fraction: f64) -> Self {
        self.band_fraction = band_fraction;
        self
    }

    pub fn with_min_band_tolerance(mut self, min_band_tolerance: usize) -> Self {
        self.min_band_tolerance = min_band_tolerance;
        self
    }

    pub fn with_trim_matches(mut self, trim_matches: usize) -> Self {
        self.trim_matches = trim_matches;
        self
    }

    pub fn with_fold_substitutions(mut self, fold_substitutions: bool) -> Self {
        self.fold_substitutions = fold_substitutions;
        self
    }

    /// Band tolerance for a window of the given length.
    pub fn band_tolerance(&self, window: usize) -> usize {
        ((self.band_fraction * window as f64) as usize).max(self.min_band_tolerance)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.segment_size > 0, "Segment size must be positive");
        ensure!(
            self.diagonal_capacity >= 3,
            "Diagonal capacity must hold at least 3 diagonals"
        );
        ensure!(
            self.band_fraction > 0.0 && self.band_fraction <= 1.0,
            "Band fraction must be in (0, 1], got {}",
            self.band_fraction
        );
        ensure!(self.trim_matches > 0, "Trim matches must be positive");

        // The longest window is the final one, and it yields at most one column per base
        let longest = self.segment_size + self.segment_slack;
        ensure!(
            self.symbol_capacity >= 2 * longest,
            "Symbol capacity ({}) can't hold an alignment of two {longest}-long windows",
            self.symbol_capacity
        );
        ensure!(
            self.max_seq_size > 0 && self.max_aln_size > 0,
            "Sequence and alignment size caps must be positive"
        );
        ensure!(
            self.max_waypoints > 0 && self.max_trace_points > 0,
            "Search buffer caps must be positive"
        );
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::small()
    }
}

impl From<Preset> for Config {
    fn from(preset: Preset) -> Self {
        let segment_size = match preset {
            Preset::Small => 500,
            Preset::Large => 1000,
        };
        Self {
            segment_size,
            segment_slack: 100,
            diagonal_capacity: 4096,
            symbol_capacity: 4096,
            max_seq_size: 5_000_000,
            max_aln_size: 5_000_000,
            max_waypoints: 5_000_000,
            max_trace_points: 5_000_000,
            band_fraction: 0.3,
            min_band_tolerance: 4,
            trim_matches: 4,
            fold_substitutions: true,
        }
    }
}

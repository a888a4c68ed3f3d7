use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{ensure, Result, WrapErr};

use lrkit_core_rs::seq::nucleotide;

use super::config::Config;
use super::extend::{extend, Extension};
use super::output::Output;
use super::record::Record;
use super::search::Search;
use super::view::{Direction, View};

/// Anchor of an alignment: a pair of positions believed to correspond to each other.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Constructor, Dissolve, Getters)]
pub struct Seed {
    query: usize,
    target: usize,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Verdict {
    /// The merged alignment is long enough, statistics are available.
    Accepted,
    /// The merged alignment is shorter than requested.
    Rejected,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Reusable scratch state of the aligner. A workspace is meant to be owned by a single thread
/// and reused for many alignments, buffers are reset at the start of every call.
#[derive(Clone, Debug)]
pub struct Workspace {
    config: Config,
    query: Vec<u8>,
    target: Vec<u8>,
    search: Search,
    record: Record,
    output: Output,
}

impl Workspace {
    pub fn new(config: Config) -> Result<Self> {
        config.validate().wrap_err("Invalid aligner configuration")?;
        Ok(Self {
            query: Vec::new(),
            target: Vec::new(),
            search: Search::new(
                *config.diagonal_capacity(),
                *config.max_waypoints(),
                *config.max_trace_points(),
            ),
            record: Record::new(*config.symbol_capacity()),
            output: Output::new(*config.max_aln_size()),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Result of the last [`Workspace::align`] call.
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Align ASCII sequences around the seed: extend to the left of the seed, then to the right
    /// of it, and merge both extensions. The search depth of each window is bounded by
    /// `error_rate`, alignments shorter than `min_len` columns are rejected.
    pub fn align(
        &mut self,
        query: &[u8],
        target: &[u8],
        seed: Seed,
        error_rate: f64,
        min_len: usize,
    ) -> Result<Verdict> {
        ensure!(
            error_rate.is_finite() && (0.0..=1.0).contains(&error_rate),
            "Error rate must be within [0, 1], got {error_rate}"
        );
        let max_seq_size = *self.config.max_seq_size();
        ensure!(
            query.len() <= max_seq_size && target.len() <= max_seq_size,
            "Sequences longer than {max_seq_size} bases are not supported (query: {}, target: {})",
            query.len(),
            target.len()
        );
        ensure!(
            seed.query <= query.len() && seed.target <= target.len(),
            "Seed ({}, {}) is outside of the sequences (query: {}, target: {})",
            seed.query,
            seed.target,
            query.len(),
            target.len()
        );
        nucleotide::encode_into(query, &mut self.query).wrap_err("Invalid query sequence")?;
        nucleotide::encode_into(target, &mut self.target).wrap_err("Invalid target sequence")?;

        self.output.reset();
        self.record.reset();
        let left = self.extend(
            Direction::Backward,
            (seed.query, seed.query),
            (seed.target, seed.target),
            error_rate,
        )?;

        self.record.reset();
        let right = self.extend(
            Direction::Forward,
            (seed.query, query.len() - seed.query),
            (seed.target, target.len() - seed.target),
            error_rate,
        )?;

        self.output.merge(seed.query, seed.target)?;
        debug_assert_eq!(
            self.output.query_range().len(),
            left.query + right.query
        );

        if self.output.columns() >= min_len {
            self.output.summarize();
            Ok(Verdict::Accepted)
        } else {
            log::debug!(
                "Alignment around seed ({}, {}) rejected: {} columns, at least {min_len} required",
                seed.query,
                seed.target,
                self.output.columns()
            );
            Ok(Verdict::Rejected)
        }
    }

    fn extend(
        &mut self,
        direction: Direction,
        (qanchor, qlen): (usize, usize),
        (tanchor, tlen): (usize, usize),
        error_rate: f64,
    ) -> Result<Extension> {
        let query = View::new(&self.query, qanchor, qlen, direction)?;
        let target = View::new(&self.target, tanchor, tlen, direction)?;
        extend(
            &self.config,
            &mut self.search,
            &mut self.record,
            self.output.lane_mut(direction),
            &query,
            &target,
            error_rate,
        )
    }
}

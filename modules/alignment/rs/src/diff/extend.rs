use eyre::Result;

use super::config::Config;
use super::output::Lane;
use super::record::Record;
use super::search::Search;
use super::view::View;
use crate::Alignable;

/// Progress of a one-directional extension.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Extension {
    /// Query bases covered by the retained columns.
    pub query: usize,
    /// Target bases covered by the retained columns.
    pub target: usize,
    /// Number of windows that contributed columns.
    pub windows: usize,
    /// Whether the extension stopped on a failed window.
    pub stopped: bool,
}

/// Extend the alignment window by window, starting at position 0 of both views.
///
/// Every window but the last one is trimmed back to the last run of `trim_matches` matching
/// columns, so the next window starts from a reliable point. The retained columns are appended
/// to the `lane` in extension order. A failed window ends the extension, previous windows are
/// kept.
pub fn extend(
    config: &Config,
    search: &mut Search,
    record: &mut Record,
    lane: &mut Lane,
    query: &View<u8>,
    target: &View<u8>,
    error_rate: f64,
) -> Result<Extension> {
    let mut progress = Extension::default();
    let mut remaining = query.len().min(target.len());

    while remaining > 0 {
        let last = remaining <= config.segment_size() + config.segment_slack();
        let size = if last {
            remaining
        } else {
            *config.segment_size()
        };

        let qwindow = query.window(progress.query, size)?;
        let twindow = target.window(progress.target, size)?;
        let found = search.run(
            &qwindow,
            &twindow,
            config.band_tolerance(size),
            error_rate,
            true,
            record,
        )?;
        if !found {
            progress.stopped = true;
            break;
        }
        if *config.fold_substitutions() {
            record.fold_substitutions();
        }

        let (retained, qtake, ttake) = if last {
            (record.columns(), *record.query_end(), *record.target_end())
        } else {
            let (retained, qtail, ttail) = record.unreliable_tail(*config.trim_matches());
            (
                retained,
                record.query_end() - qtail,
                record.target_end() - ttail,
            )
        };
        if qtake == 0 {
            progress.stopped = true;
            break;
        }

        lane.append(
            &record.query()[..retained],
            &record.target()[..retained],
        )?;
        progress.query += qtake;
        progress.target += ttake;
        progress.windows += 1;

        if last {
            break;
        }
        remaining = (query.len() - progress.query).min(target.len() - progress.target);
    }

    if progress.stopped {
        log::debug!(
            "{:?} extension stopped after {} window(s) at {}/{} query and {}/{} target bases",
            query.direction(),
            progress.windows,
            progress.query,
            query.len(),
            progress.target,
            target.len()
        );
    }
    Ok(progress)
}

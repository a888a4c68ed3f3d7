use eyre::{OptionExt, Result};
use lrkit_alignment_rs::diff::{Config, Direction, Seed, Summary, Verdict, Workspace};

use super::{mutate, random, ungap};

fn summary(workspace: &Workspace) -> Result<Summary> {
    (*workspace.output().summary()).ok_or_eyre("Accepted alignment without a summary")
}

#[test]
fn test_identical_sequences() -> Result<()> {
    let seq = random(3000, 11);
    let mut workspace = Workspace::new(Config::small())?;

    for seed in [0, 5, 1500, 3000] {
        let verdict = workspace.align(&seq, &seq, Seed::new(seed, seed), 0.1, 100)?;
        assert_eq!(verdict, Verdict::Accepted);

        let output = workspace.output();
        assert_eq!(output.columns(), 3000);
        assert_eq!(*output.query(), seq);
        assert_eq!(*output.target(), seq);
        assert_eq!(*output.query_range(), 0..3000);
        assert_eq!(*output.target_range(), 0..3000);
        assert!(output.pattern().iter().all(|x| *x == b'|'));

        let summary = summary(&workspace)?;
        assert_eq!(*summary.matches(), 3000);
        assert_eq!(
            (
                *summary.mismatches(),
                *summary.insertions(),
                *summary.deletions()
            ),
            (0, 0, 0)
        );
        assert_eq!(*summary.identity(), 100.0);
    }
    Ok(())
}

#[test]
fn test_high_error_rate_on_large_windows() -> Result<()> {
    let seq = random(3000, 23);
    let mut workspace = Workspace::new(Config::large())?;

    for error_rate in [0.5, 0.6, 1.0] {
        let verdict = workspace.align(&seq, &seq, Seed::new(1500, 1500), error_rate, 100)?;
        assert_eq!(verdict, Verdict::Accepted, "{error_rate}");
        assert_eq!(*workspace.output().query_range(), 0..3000);
        assert_eq!(*summary(&workspace)?.identity(), 100.0);
    }
    Ok(())
}

#[test]
fn test_short_tail_is_not_searched() -> Result<()> {
    // A single-base window gets a search depth of floor(2 * 0.1 * 2) = 0
    let seq = random(3000, 11);
    let mut workspace = Workspace::new(Config::small())?;

    let verdict = workspace.align(&seq, &seq, Seed::new(1, 1), 0.1, 100)?;
    assert!(verdict.is_accepted());
    assert_eq!(*workspace.output().query_range(), 1..3000);
    assert!(workspace.output().lane(Direction::Backward).is_empty());

    let verdict = workspace.align(&seq, &seq, Seed::new(2999, 2999), 0.1, 100)?;
    assert!(verdict.is_accepted());
    assert_eq!(*workspace.output().query_range(), 0..2999);
    Ok(())
}

#[test]
fn test_scenario() -> Result<()> {
    let mut workspace = Workspace::new(Config::small())?;
    let verdict = workspace.align(
        b"ACGTACGTACGT",
        b"ACGTACCTACGT",
        Seed::new(6, 6),
        0.2,
        10,
    )?;
    assert!(verdict.is_accepted());

    let summary = summary(&workspace)?;
    assert_eq!(*summary.matches(), 11);
    assert_eq!(*summary.mismatches(), 1);
    assert_eq!(*summary.insertions(), 0);
    assert_eq!(*summary.deletions(), 0);
    assert!((summary.identity() - 100.0 * 11.0 / 12.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_single_substitution() -> Result<()> {
    let query = random(2000, 1);
    let mut workspace = Workspace::new(Config::small())?;

    for pos in [3, 250, 499, 777, 1234, 1990] {
        // Both neighbours differ from the substituted base, so the change can't be explained
        // by shifting a gap
        let Some(pos) = (pos..1999).find(|&x| {
            query[x - 1] != query[x] && query[x] != query[x + 1] && query[x - 1] != query[x + 1]
        }) else {
            continue;
        };
        let mut target = query.clone();
        target[pos] = *b"ACGT"
            .iter()
            .find(|x| ![query[pos - 1], query[pos], query[pos + 1]].contains(x))
            .ok_or_eyre("No replacement base")?;

        for seed in [0, 1000] {
            let verdict = workspace.align(&query, &target, Seed::new(seed, seed), 0.1, 100)?;
            assert!(verdict.is_accepted());

            let output = workspace.output();
            assert_eq!(output.columns(), 2000);
            let mismatches: Vec<_> = output
                .pattern()
                .iter()
                .enumerate()
                .filter_map(|(ind, x)| (*x == b'*').then_some(ind))
                .collect();
            assert_eq!(mismatches, [pos]);

            let summary = summary(&workspace)?;
            assert_eq!(
                (
                    *summary.matches(),
                    *summary.mismatches(),
                    *summary.insertions(),
                    *summary.deletions()
                ),
                (1999, 1, 0, 0),
                "substitution at {pos}, seed {seed}"
            );
        }
    }
    Ok(())
}

#[test]
fn test_single_indel() -> Result<()> {
    let query = random(2000, 1);
    let mut workspace = Workspace::new(Config::small())?;

    for pos in [1, 100, 555, 1001, 1500, 1900] {
        let mut deleted = query.clone();
        deleted.remove(pos);
        let mut inserted = query.clone();
        inserted.insert(pos, b"ACGT"[pos % 4]);

        for (target, deletions, insertions) in [(&deleted, 1, 0), (&inserted, 0, 1)] {
            let verdict = workspace.align(&query, target, Seed::new(0, 0), 0.1, 100)?;
            assert!(verdict.is_accepted());

            let summary = summary(&workspace)?;
            assert_eq!(
                (
                    *summary.mismatches(),
                    *summary.deletions(),
                    *summary.insertions()
                ),
                (0, deletions, insertions),
                "indel at {pos}"
            );

            let output = workspace.output();
            let (qspan, tspan) = (output.query_range().len(), output.target_range().len());
            assert_eq!(qspan + insertions, tspan + deletions);
        }
    }
    Ok(())
}

#[test]
fn test_idempotence() -> Result<()> {
    let query = random(4000, 5);
    let target = mutate(&query, 80, 6);
    let mut workspace = Workspace::new(Config::large())?;

    workspace.align(&query, &target, Seed::new(0, 0), 0.3, 100)?;
    let first = workspace.output().clone();

    // Dirty all buffers with an unrelated alignment
    workspace.align(&target, &query, Seed::new(2000, 2000), 0.3, 100)?;
    assert_ne!(*workspace.output(), first);

    workspace.align(&query, &target, Seed::new(0, 0), 0.3, 100)?;
    assert_eq!(*workspace.output(), first);
    Ok(())
}

#[test]
fn test_round_trip() -> Result<()> {
    let mut workspace = Workspace::new(Config::small())?;
    for (len, permille, seed) in [(5000, 50, 8), (3000, 120, 9), (1200, 10, 10)] {
        let query = random(len, seed);
        let target = mutate(&query, permille, seed + 100);

        for anchor in [0, len / 3] {
            let seed = Seed::new(anchor, anchor * target.len() / len);
            workspace.align(&query, &target, seed, 0.3, 0)?;

            let output = workspace.output();
            assert_eq!(output.query().len(), output.target().len());
            assert_eq!(ungap(output.query()), query[output.query_range().clone()]);
            assert_eq!(ungap(output.target()), target[output.target_range().clone()]);

            let left = output.lane(Direction::Backward).len();
            let right = output.lane(Direction::Forward).len();
            assert_eq!(left + right, output.columns());
        }
    }
    Ok(())
}

#[test]
fn test_min_length_boundary() -> Result<()> {
    let mut workspace = Workspace::new(Config::small())?;
    let (query, target, seed) = (b"ACGTACGTACGT", b"ACGTACCTACGT", Seed::new(6, 6));

    let verdict = workspace.align(query, target, seed, 0.2, 13)?;
    assert_eq!(verdict, Verdict::Rejected);
    assert!(workspace.output().summary().is_none());
    assert!(workspace.output().pattern().is_empty());
    assert_eq!(workspace.output().columns(), 12);
    assert!(workspace.output().to_alignment().is_err());

    let verdict = workspace.align(query, target, seed, 0.2, 12)?;
    assert_eq!(verdict, Verdict::Accepted);
    assert_eq!(*summary(&workspace)?.matches(), 11);
    Ok(())
}

#[test]
fn test_segmentation_transparency() -> Result<()> {
    let query = random(5000, 7);
    let target = mutate(&query, 50, 8);

    let mut small = Workspace::new(Config::small())?;
    let mut large = Workspace::new(Config::large())?;
    for workspace in [&mut small, &mut large] {
        let verdict = workspace.align(&query, &target, Seed::new(0, 0), 0.3, 1000)?;
        assert!(verdict.is_accepted());
        assert!(workspace.output().query_range().end >= 4980);
        assert!(workspace.output().target_range().end >= 4980);
    }

    let (small, large) = (summary(&small)?, summary(&large)?);
    assert!((small.identity() - large.identity()).abs() < 0.5);
    assert!(*small.identity() > 90.0);
    Ok(())
}

#[test]
fn test_divergent_sequences_are_rejected() -> Result<()> {
    let query = random(1000, 21);
    let target = random(1000, 22);
    let mut workspace = Workspace::new(Config::small())?;

    let verdict = workspace.align(&query, &target, Seed::new(500, 500), 0.1, 100)?;
    assert_eq!(verdict, Verdict::Rejected);
    Ok(())
}

#[test]
fn test_substitutions_without_folding() -> Result<()> {
    let config = Config::small().with_fold_substitutions(false);
    let mut workspace = Workspace::new(config)?;
    workspace.align(
        b"ACGTACGTACGT",
        b"ACGTACCTACGT",
        Seed::new(6, 6),
        0.2,
        0,
    )?;
    let summary = summary(&workspace)?;
    assert_eq!(
        (
            *summary.matches(),
            *summary.mismatches(),
            *summary.insertions(),
            *summary.deletions()
        ),
        (11, 0, 1, 1)
    );
    Ok(())
}

#[test]
fn test_edit_script() -> Result<()> {
    let mut workspace = Workspace::new(Config::small())?;
    workspace.align(
        b"ACGTACGTACGT",
        b"ACGTACCTACGT",
        Seed::new(6, 6),
        0.2,
        0,
    )?;
    let alignment = workspace.output().to_alignment()?;
    assert_eq!(alignment.rle()?, "6=1X5=");
    assert_eq!(alignment.query(), "ACGTACGTACGT");
    assert_eq!(alignment.pattern(), "||||||*|||||");
    Ok(())
}

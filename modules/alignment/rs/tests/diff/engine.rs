use eyre::Result;
use lrkit_alignment_rs::diff::{Config, Engine, Seed, Task, Workspace};
use rayon::ThreadPoolBuilder;

use super::{mutate, random};

struct Pair {
    query: Vec<u8>,
    target: Vec<u8>,
    seed: Seed,
    min_len: usize,
}

fn workload() -> Vec<Pair> {
    let mut pairs = Vec::new();
    for ind in 0..24u64 {
        let query = random(800 + 150 * ind as usize, ind);
        let target = mutate(&query, 20 + 5 * ind, ind + 1000);
        let anchor = query.len() / (2 + ind as usize % 3);
        let seed = Seed::new(anchor, anchor * target.len() / query.len());
        // Every 5th task asks for an impossible length
        let min_len = if ind % 5 == 4 { 100_000 } else { 500 };
        pairs.push(Pair {
            query,
            target,
            seed,
            min_len,
        });
    }
    pairs
}

fn tasks(pairs: &[Pair]) -> Vec<Task<'_>> {
    pairs
        .iter()
        .map(|x| Task::new(&x.query, &x.target, x.seed, 0.3, x.min_len))
        .collect()
}

#[test]
fn test_engine_matches_workspace() -> Result<()> {
    let pairs = workload();
    let tasks = tasks(&pairs);

    let pool = ThreadPoolBuilder::new().num_threads(4).build()?;
    let mut engine = Engine::new(Config::small(), Some(pool))?;
    let results = engine.run(&tasks)?;
    assert_eq!(results.len(), tasks.len());

    let mut workspace = Workspace::new(Config::small())?;
    let (mut accepted, mut columns) = (0, 0);
    for (task, result) in tasks.iter().zip(&results) {
        let verdict = workspace.align(
            task.query(),
            task.target(),
            *task.seed(),
            *task.error_rate(),
            *task.min_len(),
        )?;
        match result {
            Some(alignment) => {
                assert!(verdict.is_accepted());
                assert_eq!(*alignment, workspace.output().to_alignment()?);
                accepted += 1;
                columns += alignment.columns();
            }
            None => assert!(!verdict.is_accepted()),
        }
    }
    assert_eq!(results.iter().filter(|x| x.is_none()).count(), 4);

    let stats = engine.stats();
    assert_eq!(*stats.attempted(), tasks.len());
    assert_eq!(*stats.accepted(), accepted);
    assert_eq!(*stats.rejected(), tasks.len() - accepted);
    assert_eq!(*stats.columns(), columns);
    assert!(*stats.time_s() >= 0.0);
    Ok(())
}

#[test]
fn test_engine_resets_workers_between_runs() -> Result<()> {
    let pairs = workload();
    let tasks = tasks(&pairs);

    let pool = ThreadPoolBuilder::new().num_threads(3).build()?;
    let mut engine = Engine::new(Config::large(), Some(pool))?;

    let first = engine.run(&tasks)?;
    let stats = engine.stats();

    let second = engine.run(&tasks)?;
    assert_eq!(first, second);
    assert_eq!(engine.stats().attempted(), stats.attempted());
    assert_eq!(engine.stats().columns(), stats.columns());

    let half = engine.run(&tasks[..12])?;
    assert_eq!(half[..], first[..12]);
    assert_eq!(*engine.stats().attempted(), 12);
    Ok(())
}

#[test]
fn test_engine_without_pool() -> Result<()> {
    let pairs = workload();
    let tasks = tasks(&pairs[..3]);

    let mut engine = Engine::new(Config::small(), None)?;
    let results = engine.run(&tasks)?;
    assert!(results.iter().all(|x| x.is_some()));
    assert!(engine.run(&[])?.is_empty());
    Ok(())
}

#[test]
fn test_engine_failure() -> Result<()> {
    assert!(Engine::new(Config::small().with_symbol_capacity(10), None).is_err());

    let pool = ThreadPoolBuilder::new().num_threads(2).build()?;
    let mut engine = Engine::new(Config::small(), Some(pool))?;
    let tasks = [
        Task::new(b"ACGTACGT", b"ACGTACGT", Seed::new(0, 0), 0.2, 1),
        Task::new(b"ACGTNCGT", b"ACGTACGT", Seed::new(0, 0), 0.2, 1),
    ];
    assert!(engine.run(&tasks).is_err());
    Ok(())
}

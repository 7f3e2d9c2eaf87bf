use crossbeam_channel::{Receiver, Sender, bounded};
use std::collections::BTreeMap;
use std::thread;
use tracing::{debug, trace};

/// Worker pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads; zero is treated as one.
    pub workers: usize,
    /// Items handed to a worker at a time; zero is treated as one.
    pub chunk_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            chunk_size: 100,
        }
    }
}

struct Batch<T> {
    id: u64,
    items: Vec<T>,
}

/// Applies `f` to every item on a pool of worker threads and hands the
/// results to `sink` in input order.
///
/// A feeder thread pulls `items` and groups them into chunks, the workers
/// map chunks independently, and the calling thread restores chunk order
/// before invoking `sink`. Channels are bounded to twice the worker count.
///
/// An `Err` from `items` is returned after every earlier item has reached
/// the sink. An `Err` from `sink` is returned immediately; the pool then
/// winds down as its channels disconnect.
pub fn ordered_map<I, T, U, E, F, S>(items: I, config: &PoolConfig, f: F, mut sink: S) -> Result<(), E>
where
    I: Iterator<Item = Result<T, E>> + Send,
    T: Send,
    U: Send,
    E: Send,
    F: Fn(T) -> U + Sync,
    S: FnMut(U) -> Result<(), E>,
{
    let workers = config.workers.max(1);
    let chunk_size = config.chunk_size.max(1);
    let (batch_tx, batch_rx) = bounded::<Batch<T>>(workers * 2);
    let (result_tx, result_rx) = bounded::<Batch<U>>(workers * 2);

    debug!(workers, chunk_size, "starting worker pool");

    thread::scope(|scope| {
        let feeder = scope.spawn(move || feed(items, chunk_size, batch_tx));

        let f = &f;
        for _ in 0..workers {
            let batch_rx = batch_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || work(batch_rx, result_tx, f));
        }
        drop(batch_rx);
        drop(result_tx);

        let drained = drain(result_rx, &mut sink);
        let fed = feeder
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        drained.and(fed)
    })
}

fn feed<I, T, E>(items: I, chunk_size: usize, batches: Sender<Batch<T>>) -> Result<(), E>
where
    I: Iterator<Item = Result<T, E>>,
{
    let mut id = 0;
    let mut current = Vec::with_capacity(chunk_size);

    for item in items {
        match item {
            Ok(item) => current.push(item),
            Err(e) => {
                if !current.is_empty() {
                    let _ = batches.send(Batch { id, items: current });
                }
                return Err(e);
            }
        }
        if current.len() == chunk_size {
            let items = std::mem::replace(&mut current, Vec::with_capacity(chunk_size));
            trace!(batch = id, "dispatching batch");
            if batches.send(Batch { id, items }).is_err() {
                return Ok(());
            }
            id += 1;
        }
    }

    if !current.is_empty() {
        trace!(batch = id, "dispatching final batch");
        let _ = batches.send(Batch { id, items: current });
    }
    Ok(())
}

fn work<T, U, F>(batches: Receiver<Batch<T>>, results: Sender<Batch<U>>, f: &F)
where
    F: Fn(T) -> U,
{
    while let Ok(batch) = batches.recv() {
        let items = batch.items.into_iter().map(f).collect();
        if results.send(Batch { id: batch.id, items }).is_err() {
            break;
        }
    }
}

fn drain<U, E, S>(results: Receiver<Batch<U>>, sink: &mut S) -> Result<(), E>
where
    S: FnMut(U) -> Result<(), E>,
{
    let mut pending = BTreeMap::new();
    let mut next = 0u64;

    for batch in results.iter() {
        pending.insert(batch.id, batch.items);
        while let Some(items) = pending.remove(&next) {
            next += 1;
            for item in items {
                sink(item)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn collect(n: usize, config: PoolConfig) -> Vec<usize> {
        let mut out = Vec::new();
        let items = (0..n).map(Ok::<_, String>);
        ordered_map(
            items,
            &config,
            |x| {
                if x % 7 == 0 {
                    thread::sleep(Duration::from_millis(2));
                }
                x * 10
            },
            |y| {
                out.push(y);
                Ok(())
            },
        )
        .unwrap();
        out
    }

    #[test]
    fn preserves_order_with_one_worker() {
        let out = collect(250, PoolConfig::default());
        assert_eq!(out, (0..250).map(|x| x * 10).collect::<Vec<_>>());
    }

    #[test]
    fn preserves_order_across_workers_and_chunk_sizes() {
        let expected = collect(300, PoolConfig::default());
        for (workers, chunk_size) in [(4, 1), (4, 7), (8, 100), (3, 1000)] {
            let out = collect(300, PoolConfig { workers, chunk_size });
            assert_eq!(out, expected, "workers={workers} chunk={chunk_size}");
        }
    }

    #[test]
    fn empty_input_never_calls_sink() {
        assert!(collect(0, PoolConfig { workers: 4, chunk_size: 3 }).is_empty());
    }

    #[test]
    fn zero_sized_config_still_runs() {
        let out = collect(5, PoolConfig { workers: 0, chunk_size: 0 });
        assert_eq!(out, vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn sink_error_stops_the_batch() {
        let mut seen = Vec::new();
        let result = ordered_map(
            (0..10_000).map(Ok::<usize, String>),
            &PoolConfig { workers: 4, chunk_size: 10 },
            |x| x,
            |x| {
                if x == 42 {
                    return Err(format!("stop at {x}"));
                }
                seen.push(x);
                Ok(())
            },
        );
        assert_eq!(result, Err("stop at 42".to_string()));
        assert_eq!(seen, (0..42).collect::<Vec<_>>());
    }

    #[test]
    fn source_error_follows_earlier_items() {
        let items = (0..25).map(|x| if x == 20 { Err("bad line".to_string()) } else { Ok(x) });
        let mut seen = Vec::new();
        let result = ordered_map(items, &PoolConfig { workers: 3, chunk_size: 4 }, |x| x, |x| {
            seen.push(x);
            Ok(())
        });
        assert_eq!(result, Err("bad line".to_string()));
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }
}

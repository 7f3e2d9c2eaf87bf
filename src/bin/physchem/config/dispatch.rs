use physchem::dispatch::{DispatchConfig, PROGRESS_INTERVAL, PoolConfig};

use crate::cli::RunOptions;

pub fn build_dispatch_config(opts: &RunOptions) -> DispatchConfig {
    DispatchConfig {
        pool: PoolConfig {
            workers: clamp_workers(opts.ncpu, num_cpus::get()),
            chunk_size: opts.chunk_size.max(1),
        },
        progress_interval: opts.verbose.then_some(PROGRESS_INTERVAL),
    }
}

fn clamp_workers(requested: usize, available: usize) -> usize {
    requested.min(available).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn workers_are_capped_by_available_cpus() {
        assert_eq!(clamp_workers(1, 8), 1);
        assert_eq!(clamp_workers(4, 8), 4);
        assert_eq!(clamp_workers(64, 8), 8);
        assert_eq!(clamp_workers(0, 8), 1);
    }

    #[test]
    fn progress_follows_verbose_flag() {
        let quiet = Cli::try_parse_from(["physchem", "-i", "a", "-o", "b"]).unwrap();
        assert_eq!(build_dispatch_config(&quiet.run).progress_interval, None);

        let verbose = Cli::try_parse_from(["physchem", "-i", "a", "-o", "b", "-v"]).unwrap();
        let config = build_dispatch_config(&verbose.run);
        assert_eq!(config.progress_interval, Some(1000));
        assert_eq!(config.pool.workers, 1);
        assert_eq!(config.pool.chunk_size, 100);
    }
}

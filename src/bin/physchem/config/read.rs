use physchem::ReadOptions;

use crate::cli::{IoOptions, WindowOptions};

pub fn build_read_options(io: &IoOptions, window: &WindowOptions) -> ReadOptions {
    ReadOptions {
        separator: io.separator.clone(),
        start: window.start,
        count: window.lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn window_flags_map_to_read_options() {
        let cli =
            Cli::try_parse_from(["physchem", "-i", "a", "-o", "b", "-p", "3", "-l", "2", "-s", ","])
                .unwrap();
        let options = build_read_options(&cli.io, &cli.window);
        assert_eq!(options.separator.as_deref(), Some(","));
        assert_eq!(options.start, 3);
        assert_eq!(options.count, Some(2));
    }
}

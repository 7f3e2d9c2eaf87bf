use std::path::PathBuf;

use clap::{Args, Parser};

#[derive(Parser)]
#[command(
    name = "physchem",
    about = "Physicochemical descriptors for SMILES libraries",
    version,
    author,
    before_help = crate::display::banner_for_help()
)]
pub struct Cli {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub window: WindowOptions,

    #[command(flatten)]
    pub run: RunOptions,
}

#[derive(Args)]
pub struct IoOptions {
    /// Input SMILES file, one structure per line ("-" for stdin)
    #[arg(short = 'i', long = "in", value_name = "FILE")]
    pub input: PathBuf,

    /// Output descriptor table ("-" for stdout)
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub output: PathBuf,

    /// Field separator (whitespace if omitted)
    #[arg(short = 's', long = "sep", value_name = "SEP")]
    pub separator: Option<String>,

    /// Suppress banner, spinner and summary (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Line Window")]
pub struct WindowOptions {
    /// First line to process, 1-based
    #[arg(short = 'p', long = "startpos", value_name = "LINE", default_value_t = 1)]
    pub start: usize,

    /// Number of lines to process (all remaining if omitted)
    #[arg(short = 'l', long = "lines", value_name = "N")]
    pub lines: Option<usize>,
}

#[derive(Args)]
#[command(next_help_heading = "Execution")]
pub struct RunOptions {
    /// Worker threads, capped at the number of CPUs
    #[arg(short = 'c', long = "ncpu", value_name = "N", default_value_t = 1)]
    pub ncpu: usize,

    /// Records handed to a worker at a time
    #[arg(long = "chunk-size", value_name = "N", default_value_t = 100)]
    pub chunk_size: usize,

    /// Report progress every 1000 molecules
    #[arg(short, long)]
    pub verbose: bool,

    /// Descriptor parameter table (TOML) replacing the built-in one
    #[arg(long = "params", value_name = "FILE")]
    pub params: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["physchem", "-i", "in.smi", "-o", "out.tsv"]).unwrap();
        assert_eq!(cli.io.input, PathBuf::from("in.smi"));
        assert_eq!(cli.io.output, PathBuf::from("out.tsv"));
        assert_eq!(cli.io.separator, None);
        assert_eq!(cli.window.start, 1);
        assert_eq!(cli.window.lines, None);
        assert_eq!(cli.run.ncpu, 1);
        assert_eq!(cli.run.chunk_size, 100);
        assert!(!cli.run.verbose);
        assert!(!cli.io.quiet);
    }

    #[test]
    fn long_flags() {
        let cli = Cli::try_parse_from([
            "physchem", "--in", "-", "--out", "-", "--sep", ",", "--startpos", "5", "--lines",
            "10", "--ncpu", "4", "--verbose", "--chunk-size", "7",
        ])
        .unwrap();
        assert_eq!(cli.io.separator.as_deref(), Some(","));
        assert_eq!(cli.window.start, 5);
        assert_eq!(cli.window.lines, Some(10));
        assert_eq!(cli.run.ncpu, 4);
        assert_eq!(cli.run.chunk_size, 7);
        assert!(cli.run.verbose);
    }

    #[test]
    fn input_and_output_are_required() {
        assert!(Cli::try_parse_from(["physchem", "-o", "out.tsv"]).is_err());
        assert!(Cli::try_parse_from(["physchem", "-i", "in.smi"]).is_err());
    }

    #[test]
    fn window_rejects_negative_values() {
        assert!(Cli::try_parse_from(["physchem", "-i", "a", "-o", "b", "-p", "-1"]).is_err());
        assert!(Cli::try_parse_from(["physchem", "-i", "a", "-o", "b", "-l", "x"]).is_err());
    }
}

use anyhow::{Context, Result, bail};
use physchem::dispatch::{self, PROGRESS_INTERVAL};
use physchem::{SmiReader, TableWriter};
use tracing::debug;

use crate::cli::Cli;
use crate::config::{build_dispatch_config, build_read_options, build_toolkit};
use crate::display::{Context as DisplayContext, Progress, print_summary};
use crate::io::{STDIO_PATH, create_output, open_input, stdin_is_tty};

pub fn run_batch(cli: Cli, ctx: DisplayContext) -> Result<()> {
    if cli.io.input.as_os_str() == STDIO_PATH && stdin_is_tty() {
        bail!(
            "Input is stdin but stdin is a terminal.\n\nUsage: physchem -i <FILE> -o <FILE> or pipe SMILES via stdin with -i -."
        );
    }

    let toolkit = build_toolkit(cli.run.params.as_deref())?;
    let read_options = build_read_options(&cli.io, &cli.window);
    let mut config = build_dispatch_config(&cli.run);
    if ctx.interactive {
        config.progress_interval.get_or_insert(PROGRESS_INTERVAL);
    }
    debug!(?read_options, ?config, "starting batch");

    let input = open_input(&cli.io.input)?;
    let output = create_output(&cli.io.output)?;
    let mut table = TableWriter::new(output).context("Failed to write table header")?;
    let reader = SmiReader::new(input, read_options);

    let mut progress = Progress::new(ctx.interactive);
    let result = dispatch::run(&toolkit, reader, &config, &mut table, &mut progress);
    progress.clear();

    let flushed = table.finish();
    let summary = result.context("Batch stopped before the end of the input")?;
    flushed.context("Failed to flush output table")?;

    if ctx.interactive {
        print_summary(&cli.io.input, &cli.io.output, &config, &summary);
    }
    progress.finish(summary.written);

    Ok(())
}

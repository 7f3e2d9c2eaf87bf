mod batch;

use batch::run_batch;

use anyhow::Result;

use crate::cli::Cli;
use crate::display::Context;

pub fn dispatch(cli: Cli, ctx: Context) -> Result<()> {
    run_batch(cli, ctx)
}

use anyhow::{Context, Result};

use super::open_queue;
use crate::cli::ListArgs;
use crate::display::{Context as DisplayContext, print_entry_list};

pub fn run_list(args: ListArgs, ctx: DisplayContext) -> Result<()> {
    let queue = open_queue(&args.queue)?;
    let ids = queue.entries().context("Failed to list queue entries")?;

    if !ctx.interactive {
        for id in &ids {
            println!("{}", id);
        }
        return Ok(());
    }

    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        match queue.load(&id) {
            Ok(record) => entries.push((id, record)),
            Err(e) => tracing::warn!(entry = %id, error = %e, "skipping unreadable entry"),
        }
    }
    print_entry_list(&entries);
    Ok(())
}

mod add;
mod list;
mod show;
mod write;

use add::run_add;
use list::run_list;
use show::run_show;
use write::run_write;

use anyhow::{Context, Result};
use vasp_stage::DirectoryQueue;

use crate::cli::{Command, QueueOptions};
use crate::display::Context as DisplayContext;

pub fn dispatch(command: Command, ctx: DisplayContext) -> Result<()> {
    match command {
        Command::Write(args) => run_write(args, ctx),
        Command::Add(args) => run_add(args, ctx),
        Command::List(args) => run_list(args, ctx),
        Command::Show(args) => run_show(args, ctx),
    }
}

fn open_queue(opts: &QueueOptions) -> Result<DirectoryQueue> {
    DirectoryQueue::open(&opts.root)
        .with_context(|| format!("Failed to open queue at {}", opts.root.display()))
}

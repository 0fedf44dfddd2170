use anyhow::{Context, Result};
use vasp_stage::{EntryId, INCAR_FILE, POSCAR_FILE, write_from_queue_with};

use super::open_queue;
use crate::cli::WriteArgs;
use crate::config::build_stage_config;
use crate::display::{Context as DisplayContext, Progress, print_structure_summary};

const TOTAL_STEPS: u8 = 2;

pub fn run_write(args: WriteArgs, ctx: DisplayContext) -> Result<()> {
    let queue = open_queue(&args.queue)?;
    let entry = EntryId::from(args.entry);
    let config = build_stage_config(&args.poscar);

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Writing inputs");
    let dir = write_from_queue_with(&queue, &entry, args.destination.as_deref(), &config)
        .with_context(|| format!("Failed to stage entry '{}'", entry))?;
    progress.done("Writing inputs", &[format!("into {}", dir.display())]);

    progress.step("Summarizing entry");
    let record = queue
        .load(&entry)
        .with_context(|| format!("Failed to reload entry '{}'", entry))?;
    let mut files = vec![POSCAR_FILE, INCAR_FILE];
    files.extend(record.auxiliary_file_names());
    progress.done("Summarizing entry", &[files.join(" ")]);

    if ctx.interactive {
        print_structure_summary(&record.structure);
    }
    progress.finish(&format!("Staged '{}'", entry));

    println!("{}", dir.display());
    Ok(())
}

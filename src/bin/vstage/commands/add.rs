use anyhow::{Context, Result};
use vasp_stage::{DirectoryQueue, EntryId, InputVariables};

use crate::cli::AddArgs;
use crate::config::build_kpoints;
use crate::display::{
    Context as DisplayContext, Progress, print_incar_table, print_structure_summary,
};

const TOTAL_STEPS: u8 = 1;

pub fn run_add(args: AddArgs, ctx: DisplayContext) -> Result<()> {
    let kpoints = build_kpoints(&args.kpoints)?;
    let queue = DirectoryQueue::create(&args.queue.root)
        .with_context(|| format!("Failed to create queue at {}", args.queue.root.display()))?;
    let entry = EntryId::from(args.entry);

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Importing inputs");
    let replaced = queue.contains(&entry);
    let record = queue
        .add_from_files(&entry, &args.poscar, &args.incar, kpoints)
        .with_context(|| format!("Failed to add entry '{}'", entry))?;
    tracing::info!(entry = %entry, replaced, "added entry");

    let mut details = vec![
        format!("POSCAR {}", args.poscar.display()),
        format!("INCAR  {}", args.incar.display()),
    ];
    if let Some(k) = &record.kpoints {
        details.push(format!("KPOINTS {} {:?}", k.mode, k.grid));
    }
    if replaced {
        details.push("replaced existing entry".to_string());
    }
    progress.done("Importing inputs", &details);

    if ctx.interactive {
        print_structure_summary(&record.structure);
        print_incar_table(&InputVariables::from(record.variables.clone()));
    }
    progress.finish(&format!("Added '{}'", entry));

    Ok(())
}

use std::io::{self, Write};

use anyhow::{Context, Result};
use vasp_stage::io::{write_incar, write_kpoints, write_poscar};
use vasp_stage::{EntryId, INCAR_FILE, InputVariables, POSCAR_FILE};
use vasp_stage::queue::KPOINTS_FILE;

use super::open_queue;
use crate::cli::ShowArgs;
use crate::display::{
    Context as DisplayContext, print_incar_table, print_structure_summary,
};

/// Prints the files `write` would produce for an entry, without touching
/// the filesystem.
pub fn run_show(args: ShowArgs, ctx: DisplayContext) -> Result<()> {
    let queue = open_queue(&args.queue)?;
    let entry = EntryId::from(args.entry);
    let record = queue
        .load(&entry)
        .with_context(|| format!("Failed to load entry '{}'", entry))?;
    let incar = InputVariables::from(record.variables.clone());

    if ctx.interactive {
        print_structure_summary(&record.structure);
        print_incar_table(&incar);
    }

    let mut out = io::stdout().lock();
    writeln!(out, "==> {} <==", POSCAR_FILE)?;
    write_poscar(&mut out, &record.structure, &Default::default())
        .context("Entry structure cannot be written as POSCAR")?;
    writeln!(out, "\n==> {} <==", INCAR_FILE)?;
    write_incar(&mut out, &incar).context("Entry tags cannot be written as INCAR")?;
    if let Some(kpoints) = &record.kpoints {
        writeln!(out, "\n==> {} <==", KPOINTS_FILE)?;
        write_kpoints(&mut out, kpoints).context("Entry mesh cannot be written as KPOINTS")?;
    }
    for (name, contents) in &record.files {
        writeln!(out, "\n==> {} <==", name)?;
        write!(out, "{}", contents)?;
    }
    out.flush()?;
    Ok(())
}

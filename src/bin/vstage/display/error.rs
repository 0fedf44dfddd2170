use std::io::{self, Write};

use anyhow::Error;
use vasp_stage::StageError;
use vasp_stage::io::{Error as IoError, Format};
use vasp_stage::queue::Error as QueueError;

use crate::util::text::wrap;

const INNER: usize = 60;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let bar = "─".repeat(INNER + 2);

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ┏{}┓", "━".repeat(INNER + 2));
    let _ = writeln!(stderr, "   ┃ {:<INNER$} ┃", "✗ vstage failed");
    let _ = writeln!(stderr, "   ┠{bar}┨");

    for (depth, message) in err.chain().map(|e| e.to_string()).enumerate() {
        let width = if depth == 0 { INNER } else { INNER - 2 };
        for (i, line) in wrap(&message, width).iter().enumerate() {
            let prefix = match (depth, i) {
                (0, _) => "",
                (_, 0) => "↳ ",
                _ => "  ",
            };
            let _ = writeln!(stderr, "   ┃ {prefix}{line:<width$} ┃");
        }
    }

    let hints = collect_hints(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ┠{bar}┨");
        let _ = writeln!(stderr, "   ┃ {:<INNER$} ┃", "Try:");
        for hint in &hints {
            for (i, line) in wrap(hint, INNER - 4).iter().enumerate() {
                let bullet = if i == 0 { "• " } else { "  " };
                let _ = writeln!(stderr, "   ┃   {bullet}{line:<w$} ┃", w = INNER - 4);
            }
        }
    }

    let _ = writeln!(stderr, "   ┗{}┛", "━".repeat(INNER + 2));
    let _ = writeln!(stderr);
}

/// Hints for the first typed library error found in the chain, or generic
/// hints from the message text when there is none.
fn collect_hints(err: &Error) -> Vec<String> {
    let mut hints = Vec::new();

    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<StageError>() {
            stage_hints(e, &mut hints);
        } else if let Some(e) = cause.downcast_ref::<QueueError>() {
            queue_hints(e, &mut hints);
        } else if let Some(e) = cause.downcast_ref::<IoError>() {
            format_hints(e, &mut hints);
        } else if let Some(e) = cause.downcast_ref::<io::Error>() {
            os_hints(e, &mut hints);
        } else {
            continue;
        }
        if !hints.is_empty() {
            return hints;
        }
    }

    fallback_hints(err, &mut hints);
    hints
}

fn stage_hints(err: &StageError, hints: &mut Vec<String>) {
    match err {
        StageError::InvalidDestination { .. } => {
            hints.push("DEST must be a directory, a regular file inside one, or a path that does not exist yet".into());
            hints.push("Sockets, FIFOs, devices, and broken symlinks are rejected".into());
        }
        StageError::DirectoryCreationFailed { path, .. } => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                hints.push(format!("Only the last path component is created; make sure '{}' exists", parent.display()));
            }
            hints.push("Check write permission on the parent directory".into());
        }
        StageError::EntryNotFound { entry } => {
            hints.push(format!("No '{entry}.toml' in the queue directory"));
            hints.push("Run 'vstage list -q <DIR>' to see the available entries".into());
        }
        StageError::WriteFailed { .. } => {
            hints.push("Files written before the failure were left in place".into());
            hints.push("Check free space and write permission in the destination".into());
        }
        StageError::Queue(_) => {}
    }
}

fn queue_hints(err: &QueueError, hints: &mut Vec<String>) {
    match err {
        QueueError::EntryNotFound(_) => {
            hints.push("Run 'vstage list -q <DIR>' to see the available entries".into());
        }
        QueueError::InvalidEntry { .. } => {
            hints.push("Entry names and auxiliary file names must be plain file names".into());
            hints.push("POSCAR and INCAR cannot be stored as auxiliary files".into());
        }
        QueueError::InvalidRoot(_) => {
            hints.push("Pass an existing queue directory with -q/--queue".into());
            hints.push("'vstage add' creates the directory on first use".into());
        }
        QueueError::Parse { .. } => {
            hints.push("The entry file is not a valid queue record".into());
            hints.push("It needs a [structure] table; [variables], [kpoints], and [files] are optional".into());
        }
        QueueError::Import { .. } => {}
        QueueError::Io { source, .. } => os_hints(source, hints),
        QueueError::Write { .. } | QueueError::Serialize { .. } => {
            hints.push("Check free space and write permission".into());
        }
    }
}

fn format_hints(err: &IoError, hints: &mut Vec<String>) {
    match err {
        IoError::Io { source } => os_hints(source, hints),
        IoError::Parse { format, line, .. } => {
            hints.push(format!("Inspect the {format} file around line {line}"));
            match format {
                Format::Poscar => hints.push(
                    "Expected: comment, scale, 3 lattice lines, species, counts, optional 'Selective dynamics', coordinate mode, positions".into(),
                ),
                Format::Incar => hints.push("Each assignment reads TAG = value; '#' and '!' start comments".into()),
                Format::Kpoints => {}
            }
        }
        IoError::InvalidData { format, .. } => {
            hints.push(format!("The data cannot be represented as a valid {format} file"));
        }
    }
}

fn os_hints(err: &io::Error, hints: &mut Vec<String>) {
    use io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound => hints.push("Check that the path exists".into()),
        ErrorKind::PermissionDenied => hints.push("Check file permissions with `ls -la`".into()),
        ErrorKind::AlreadyExists => hints.push("Something already exists at that path".into()),
        _ => {}
    }
}

fn fallback_hints(err: &Error, hints: &mut Vec<String>) {
    let text = err
        .chain()
        .map(|e| e.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    if text.contains("permission denied") {
        hints.push("Check file permissions with `ls -la`".into());
    } else if text.contains("no such file") {
        hints.push("Check that the path is spelled correctly".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;
    use vasp_stage::EntryId;

    #[test]
    fn entry_not_found_suggests_listing() {
        let err: Error = StageError::EntryNotFound {
            entry: EntryId::from("si"),
        }
        .into();
        let hints = collect_hints(&err.context("staging failed"));
        assert!(hints.iter().any(|h| h.contains("vstage list")));
    }

    #[test]
    fn queue_wrapper_uses_inner_hints() {
        let err: Error = StageError::Queue(QueueError::InvalidRoot(PathBuf::from("q"))).into();
        let hints = collect_hints(&err);
        assert!(hints.iter().any(|h| h.contains("--queue")));
    }

    #[test]
    fn parse_error_points_at_line() {
        let err: Error = IoError::parse(Format::Incar, 7, "missing '='").into();
        let hints = collect_hints(&err);
        assert!(hints[0].contains("line 7"));
    }

    #[test]
    fn untyped_errors_fall_back_to_text() {
        let result: anyhow::Result<()> =
            Err(anyhow::anyhow!("open failed: Permission denied")).context("reading INCAR");
        let hints = collect_hints(&result.unwrap_err());
        assert_eq!(hints.len(), 1);
    }
}

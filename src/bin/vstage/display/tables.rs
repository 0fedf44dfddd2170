use std::io::{self, Write};

use vasp_stage::{EntryId, EntryRecord, InputVariables, Structure};

use crate::util::text::truncate;

const INDENT: &str = "      ";
const TABLE_WIDTH: usize = 56;
const MAX_INCAR_ROWS: usize = 24;

pub fn print_structure_summary(structure: &Structure) {
    let mut out = io::stderr().lock();
    let _ = write_table(&mut out, "Structure", &["Property", "Value"], &structure_rows(structure));
}

pub fn print_incar_table(variables: &InputVariables) {
    let mut rows: Vec<Vec<String>> = variables
        .variables
        .iter()
        .take(MAX_INCAR_ROWS)
        .map(|(key, value)| vec![key.clone(), value.to_string()])
        .collect();
    if variables.len() > MAX_INCAR_ROWS {
        rows.push(vec![
            "...".to_string(),
            format!("({} more tags)", variables.len() - MAX_INCAR_ROWS),
        ]);
    }

    let mut out = io::stderr().lock();
    let _ = write_table(&mut out, "INCAR", &["Tag", "Value"], &rows);
}

pub fn print_entry_list(entries: &[(EntryId, EntryRecord)]) {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|(id, record)| {
            let kpoints = record
                .kpoints
                .as_ref()
                .map(|k| format!("{}x{}x{}", k.grid[0], k.grid[1], k.grid[2]))
                .unwrap_or_else(|| "-".to_string());
            vec![
                id.to_string(),
                record.structure.formula(),
                record.variables.len().to_string(),
                kpoints,
            ]
        })
        .collect();

    let mut out = io::stderr().lock();
    let _ = write_table(
        &mut out,
        &format!("Queue ({} entries)", entries.len()),
        &["Entry", "Formula", "Tags", "Mesh"],
        &rows,
    );
}

fn structure_rows(structure: &Structure) -> Vec<Vec<String>> {
    let [a, b, c] = structure.lattice.map(norm);
    let (alpha, beta, gamma) = lattice_angles(&structure.lattice);
    let species = structure
        .composition()
        .iter()
        .map(|(element, count)| format!("{element}:{count}"))
        .collect::<Vec<_>>()
        .join(" ");

    vec![
        vec!["Formula".into(), structure.formula()],
        vec!["Sites".into(), structure.site_count().to_string()],
        vec!["Species".into(), species],
        vec!["a b c (Å)".into(), format!("{a:.3} {b:.3} {c:.3}")],
        vec!["α β γ (°)".into(), format!("{alpha:.2} {beta:.2} {gamma:.2}")],
        vec!["Volume (Å³)".into(), format!("{:.3}", structure.volume())],
    ]
}

/// Writes a boxed table; column widths follow the content, capped so the
/// whole table stays within `TABLE_WIDTH`.
fn write_table(
    out: &mut impl Write,
    title: &str,
    header: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    let columns = header.len();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let budget = TABLE_WIDTH.saturating_sub(3 * columns + 1);
    while widths.iter().sum::<usize>() > budget {
        let Some(widest) = widths.iter_mut().max() else {
            break;
        };
        if *widest <= 4 {
            break;
        }
        *widest -= 1;
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{INDENT}{left}{}{right}", segments.join(mid))
    };
    let line = |cells: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let cell = truncate(cells.get(i).map(String::as_str).unwrap_or(""), w);
                format!(" {cell:<w$} ")
            })
            .collect();
        format!("{INDENT}│{}│", padded.join("│"))
    };

    writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, TABLE_WIDTH - 6))?;
    writeln!(out, "{}", rule("┌", "┬", "┐"))?;
    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    writeln!(out, "{}", line(&header))?;
    writeln!(out, "{}", rule("├", "┼", "┤"))?;
    for row in rows {
        writeln!(out, "{}", line(row))?;
    }
    writeln!(out, "{}", rule("└", "┴", "┘"))?;
    Ok(())
}

fn norm(v: [f64; 3]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn angle_between(u: &[f64; 3], v: &[f64; 3]) -> f64 {
    let dot: f64 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    (dot / (norm(*u) * norm(*v))).clamp(-1.0, 1.0).acos().to_degrees()
}

fn lattice_angles(lattice: &[[f64; 3]; 3]) -> (f64, f64, f64) {
    let [a, b, c] = lattice;
    (angle_between(b, c), angle_between(a, c), angle_between(a, b))
}

use crate::io::error::Error;
use crate::io::{CoordinateMode, Format, PoscarConfig};
use crate::model::structure::Structure;
use std::io::Write;

const SCALE_LINE: &str = "   1.0";

pub fn write<W: Write>(
    mut writer: W,
    structure: &Structure,
    config: &PoscarConfig,
) -> Result<(), Error> {
    if structure.is_empty() {
        return Err(Error::invalid_data(Format::Poscar, "structure has no sites"));
    }
    if structure.is_singular() {
        return Err(Error::invalid_data(
            Format::Poscar,
            "lattice vectors are linearly dependent",
        ));
    }

    let prec = config.precision;
    let width = prec + 6;

    let positions = match config.coordinates {
        CoordinateMode::Direct => structure.fractional_positions().ok_or_else(|| {
            Error::invalid_data(Format::Poscar, "cannot invert lattice for direct coordinates")
        })?,
        CoordinateMode::Cartesian => structure.sites.iter().map(|s| s.position).collect(),
    };

    writeln!(writer, "{}", comment_line(structure))?;
    writeln!(writer, "{}", SCALE_LINE)?;

    for row in &structure.lattice {
        writeln!(
            writer,
            "  {:>width$.prec$}{:>width$.prec$}{:>width$.prec$}",
            row[0], row[1], row[2]
        )?;
    }

    let groups = structure.grouped_indices();

    if config.species_line {
        let mut line = String::from(" ");
        for (element, _) in &groups {
            line.push_str(&format!(" {:>4}", element.symbol()));
        }
        writeln!(writer, "{}", line)?;
    }

    let mut line = String::from(" ");
    for (_, indices) in &groups {
        line.push_str(&format!(" {:>4}", indices.len()));
    }
    writeln!(writer, "{}", line)?;

    writeln!(
        writer,
        "{}",
        match config.coordinates {
            CoordinateMode::Direct => "Direct",
            CoordinateMode::Cartesian => "Cartesian",
        }
    )?;

    for (_, indices) in &groups {
        for &idx in indices {
            let p = positions[idx];
            writeln!(
                writer,
                "  {:>width$.prec$}{:>width$.prec$}{:>width$.prec$}",
                p[0], p[1], p[2]
            )?;
        }
    }

    Ok(())
}

fn comment_line(structure: &Structure) -> String {
    structure
        .comment
        .as_deref()
        .map(|c| c.replace(['\n', '\r'], " "))
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| structure.formula())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::element::Element;

    fn interleaved() -> Structure {
        let mut s = Structure::new([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        s.push(Element::Fe, [0.0, 0.0, 0.0]);
        s.push(Element::O, [2.0, 0.0, 0.0]);
        s.push(Element::Fe, [2.0, 2.0, 2.0]);
        s
    }

    fn render(structure: &Structure, config: &PoscarConfig) -> String {
        let mut buf = Vec::new();
        write(&mut buf, structure, config).expect("write poscar");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn writes_vasp5_layout_grouped_by_species() {
        let out = render(&interleaved(), &PoscarConfig::default());
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "Fe2O");
        assert_eq!(lines[1].trim(), "1.0");
        assert_eq!(
            lines[2].split_whitespace().collect::<Vec<_>>(),
            vec!["4.0000000000", "0.0000000000", "0.0000000000"]
        );
        assert_eq!(lines[5].split_whitespace().collect::<Vec<_>>(), vec!["Fe", "O"]);
        assert_eq!(lines[6].split_whitespace().collect::<Vec<_>>(), vec!["2", "1"]);
        assert_eq!(lines[7], "Direct");

        let coords: Vec<Vec<f64>> = lines[8..]
            .iter()
            .map(|l| l.split_whitespace().map(|t| t.parse().unwrap()).collect())
            .collect();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0], vec![0.0, 0.0, 0.0]);
        assert_eq!(coords[1], vec![0.5, 0.5, 0.5]);
        assert_eq!(coords[2], vec![0.5, 0.0, 0.0]);
    }

    #[test]
    fn cartesian_mode_without_species_line() {
        let config = PoscarConfig {
            coordinates: CoordinateMode::Cartesian,
            species_line: false,
            precision: 4,
        };
        let out = render(&interleaved().with_comment("line one\nline two"), &config);
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "line one line two");
        assert_eq!(lines[5].split_whitespace().collect::<Vec<_>>(), vec!["2", "1"]);
        assert_eq!(lines[6], "Cartesian");
        assert_eq!(lines[8].trim(), "2.0000    2.0000    2.0000");
    }

    #[test]
    fn rejects_empty_structure() {
        let s = Structure::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let err = write(Vec::new(), &s, &PoscarConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidData { format: Format::Poscar, .. }));
    }

    #[test]
    fn rejects_singular_lattice() {
        let mut s = Structure::new([[1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        s.push(Element::H, [0.0, 0.0, 0.0]);
        let err = write(Vec::new(), &s, &PoscarConfig::default()).unwrap_err();
        assert!(err.to_string().contains("linearly dependent"));
    }
}

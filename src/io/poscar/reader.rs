use crate::io::Format;
use crate::io::error::Error;
use crate::model::element::Element;
use crate::model::structure::Structure;
use std::io::BufRead;

struct LineCursor<R: BufRead> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> LineCursor<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn next(&mut self, what: &str) -> Result<String, Error> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(line?)
            }
            None => Err(self.error(format!("unexpected end of file while reading {}", what))),
        }
    }

    fn error(&self, details: impl Into<String>) -> Error {
        Error::parse(Format::Poscar, self.line_no.max(1), details)
    }
}

pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    let mut cursor = LineCursor::new(reader);

    let comment = cursor.next("comment")?.trim().to_string();

    let scale_line = cursor.next("scale factor")?;
    let scale: f64 = scale_line
        .split_whitespace()
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| cursor.error(format!("invalid scale factor '{}'", scale_line.trim())))?;
    if scale == 0.0 {
        return Err(cursor.error("scale factor must be non-zero"));
    }

    let mut lattice = [[0.0; 3]; 3];
    for row in lattice.iter_mut() {
        let line = cursor.next("lattice vector")?;
        *row = parse_triplet(&line).ok_or_else(|| cursor.error("expected three lattice components"))?;
    }

    let species_line = cursor.next("species")?;
    let first = species_line.split_whitespace().next().unwrap_or_default();
    if first.parse::<usize>().is_ok() {
        return Err(cursor.error("missing species line (VASP 4 layout is not supported)"));
    }
    let species = species_line
        .split_whitespace()
        .map(|token| {
            let symbol = token.split(['_', '/']).next().unwrap_or(token);
            symbol
                .parse::<Element>()
                .map_err(|e| cursor.error(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if species.is_empty() {
        return Err(cursor.error("species line is empty"));
    }

    let counts_line = cursor.next("species counts")?;
    let counts = counts_line
        .split_whitespace()
        .map(|t| t.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| cursor.error(format!("invalid species counts '{}'", counts_line.trim())))?;
    if counts.len() != species.len() {
        return Err(cursor.error(format!(
            "{} species but {} counts",
            species.len(),
            counts.len()
        )));
    }

    let mut mode_line = cursor.next("coordinate mode")?;
    if mode_line.trim_start().starts_with(['S', 's']) {
        mode_line = cursor.next("coordinate mode")?;
    }
    let cartesian = match mode_line.trim_start().chars().next() {
        Some('C' | 'c' | 'K' | 'k') => true,
        Some('D' | 'd') => false,
        _ => {
            return Err(cursor.error(format!(
                "unknown coordinate mode '{}'",
                mode_line.trim()
            )));
        }
    };

    let factor = if scale > 0.0 {
        scale
    } else {
        let unscaled = Structure::new(lattice).volume();
        if unscaled == 0.0 {
            return Err(cursor.error("cannot rescale a zero-volume lattice"));
        }
        (scale.abs() / unscaled).cbrt()
    };
    for row in lattice.iter_mut() {
        for v in row.iter_mut() {
            *v *= factor;
        }
    }

    let mut structure = Structure::new(lattice);
    if !comment.is_empty() {
        structure.comment = Some(comment);
    }

    for (element, count) in species.into_iter().zip(counts) {
        for _ in 0..count {
            let line = cursor.next("site coordinates")?;
            let coords =
                parse_triplet(&line).ok_or_else(|| cursor.error("expected three coordinates"))?;
            if cartesian {
                structure.push(element, coords.map(|c| c * factor));
            } else {
                structure.push_fractional(element, coords);
            }
        }
    }

    Ok(structure)
}

fn parse_triplet(line: &str) -> Option<[f64; 3]> {
    let mut it = line.split_whitespace().map(|t| t.parse::<f64>());
    let x = it.next()?.ok()?;
    let y = it.next()?.ok()?;
    let z = it.next()?.ok()?;
    Some([x, y, z])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::poscar::write;
    use crate::io::{CoordinateMode, PoscarConfig};
    use std::io::Cursor;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    const RUTILE: &str = "TiO2 rutile
1.0
  4.594  0.000  0.000
  0.000  4.594  0.000
  0.000  0.000  2.959
Ti O
2 4
Direct
 0.0    0.0    0.0
 0.5    0.5    0.5
 0.3053 0.3053 0.0
 0.6947 0.6947 0.0
 0.8053 0.1947 0.5
 0.1947 0.8053 0.5
";

    #[test]
    fn reads_direct_vasp5() {
        let s = read(Cursor::new(RUTILE)).expect("read");
        assert_eq!(s.comment.as_deref(), Some("TiO2 rutile"));
        assert_eq!(s.site_count(), 6);
        assert_eq!(s.formula(), "Ti2O4");
        assert!(approx_eq(s.sites[1].position[0], 2.297, 1e-9));
        assert!(approx_eq(s.sites[1].position[2], 1.4795, 1e-9));
    }

    #[test]
    fn applies_positive_scale_to_cartesian_sites() {
        let text = "scaled\n2.0\n1 0 0\n0 1 0\n0 0 1\nH\n1\nSelective dynamics\nCartesian\n0.25 0.0 0.0 T T F\n";
        let s = read(Cursor::new(text)).expect("read");
        assert!(approx_eq(s.lattice[0][0], 2.0, 1e-12));
        assert!(approx_eq(s.sites[0].position[0], 0.5, 1e-12));
    }

    #[test]
    fn negative_scale_sets_volume() {
        let text = "vol\n-27.0\n1 0 0\n0 1 0\n0 0 1\nC\n1\nDirect\n0 0 0\n";
        let s = read(Cursor::new(text)).expect("read");
        assert!(approx_eq(s.volume(), 27.0, 1e-9));
        assert!(approx_eq(s.lattice[1][1], 3.0, 1e-9));
    }

    #[test]
    fn strips_potcar_suffixes_from_species() {
        let text = "x\n1.0\n3 0 0\n0 3 0\n0 0 3\nFe_pv O\n1 1\nd\n0 0 0\n0.5 0.5 0.5\n";
        let s = read(Cursor::new(text)).expect("read");
        assert_eq!(s.species(), vec![Element::Fe, Element::O]);
    }

    #[test]
    fn rejects_vasp4_layout() {
        let text = "old\n1.0\n1 0 0\n0 1 0\n0 0 1\n1\nDirect\n0 0 0\n";
        let err = read(Cursor::new(text)).unwrap_err();
        match err {
            Error::Parse { format, line, details } => {
                assert_eq!(format, Format::Poscar);
                assert_eq!(line, 6);
                assert!(details.contains("species"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_truncated_site_block() {
        let text = "t\n1.0\n1 0 0\n0 1 0\n0 0 1\nH\n2\nDirect\n0 0 0\n";
        let err = read(Cursor::new(text)).unwrap_err();
        assert!(err.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn write_then_read_preserves_structure() {
        let mut original = Structure::new([[3.1, 0.2, 0.0], [0.0, 2.9, 0.1], [0.3, 0.0, 4.2]]);
        original.push(Element::Si, [0.1, 0.2, 0.3]);
        original.push(Element::O, [1.4, 1.1, 2.0]);
        original.push(Element::Si, [2.0, 2.0, 2.0]);

        for coordinates in [CoordinateMode::Direct, CoordinateMode::Cartesian] {
            let config = PoscarConfig {
                coordinates,
                ..PoscarConfig::default()
            };
            let mut buf = Vec::new();
            write(&mut buf, &original, &config).expect("write");
            let parsed = read(Cursor::new(buf)).expect("read");

            assert_eq!(parsed.composition(), original.composition());
            for (row_a, row_b) in parsed.lattice.iter().zip(original.lattice.iter()) {
                for k in 0..3 {
                    assert!(approx_eq(row_a[k], row_b[k], 1e-8));
                }
            }
            let expected = [0usize, 2, 1];
            for (site, &idx) in parsed.sites.iter().zip(expected.iter()) {
                for k in 0..3 {
                    assert!(approx_eq(site.position[k], original.sites[idx].position[k], 1e-8));
                }
            }
        }
    }
}

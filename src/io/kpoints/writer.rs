use crate::io::Format;
use crate::io::error::Error;
use crate::model::kpoints::Kpoints;
use std::io::Write;

const HEADER: &str = "Automatic mesh";

pub fn write<W: Write>(mut writer: W, kpoints: &Kpoints) -> Result<(), Error> {
    if kpoints.grid.contains(&0) {
        return Err(Error::invalid_data(
            Format::Kpoints,
            format!(
                "mesh subdivisions must be positive, got {} {} {}",
                kpoints.grid[0], kpoints.grid[1], kpoints.grid[2]
            ),
        ));
    }

    writeln!(writer, "{}", HEADER)?;
    writeln!(writer, "0")?;
    writeln!(writer, "{}", kpoints.mode)?;
    writeln!(
        writer,
        "  {:>3} {:>3} {:>3}",
        kpoints.grid[0], kpoints.grid[1], kpoints.grid[2]
    )?;
    writeln!(
        writer,
        "  {:.3} {:.3} {:.3}",
        kpoints.shift[0], kpoints.shift[1], kpoints.shift[2]
    )?;
    Ok(())
}

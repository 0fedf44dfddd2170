use vasp_stage::StageConfig;
use vasp_stage::io::{CoordinateMode, PoscarConfig};

use crate::cli::PoscarOptions;

pub fn build_stage_config(opts: &PoscarOptions) -> StageConfig {
    StageConfig {
        poscar: PoscarConfig {
            coordinates: if opts.cartesian {
                CoordinateMode::Cartesian
            } else {
                CoordinateMode::Direct
            },
            species_line: !opts.no_species,
            precision: usize::from(opts.precision),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let opts = PoscarOptions {
            cartesian: false,
            no_species: false,
            precision: 10,
        };
        assert_eq!(build_stage_config(&opts), StageConfig::default());
    }

    #[test]
    fn flags_map_onto_poscar_config() {
        let opts = PoscarOptions {
            cartesian: true,
            no_species: true,
            precision: 6,
        };
        let config = build_stage_config(&opts).poscar;
        assert_eq!(config.coordinates, CoordinateMode::Cartesian);
        assert!(!config.species_line);
        assert_eq!(config.precision, 6);
    }
}

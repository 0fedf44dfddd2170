use anyhow::{Result, bail};
use vasp_stage::{Kpoints, KpointsMode};

use crate::cli::KpointsOptions;

pub fn build_kpoints(opts: &KpointsOptions) -> Result<Option<Kpoints>> {
    let Some(grid) = &opts.grid else {
        return Ok(None);
    };

    let [a, b, c] = grid.as_slice() else {
        bail!("--kpoints-grid takes exactly three subdivisions, got {}", grid.len());
    };
    if [a, b, c].iter().any(|n| **n == 0) {
        bail!("k-point subdivisions must be positive, got {} {} {}", a, b, c);
    }

    let mode = if opts.gamma {
        KpointsMode::Gamma
    } else {
        KpointsMode::MonkhorstPack
    };
    Ok(Some(Kpoints::new(mode, [*a, *b, *c])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(grid: Option<Vec<u32>>, gamma: bool) -> KpointsOptions {
        KpointsOptions { grid, gamma }
    }

    #[test]
    fn no_grid_means_no_mesh() {
        assert!(build_kpoints(&opts(None, false)).unwrap().is_none());
    }

    #[test]
    fn selects_mesh_mode() {
        let mp = build_kpoints(&opts(Some(vec![3, 3, 1]), false))
            .unwrap()
            .unwrap();
        assert_eq!(mp.mode, KpointsMode::MonkhorstPack);
        assert_eq!(mp.grid, [3, 3, 1]);

        let gamma = build_kpoints(&opts(Some(vec![2, 2, 2]), true))
            .unwrap()
            .unwrap();
        assert_eq!(gamma.mode, KpointsMode::Gamma);
    }

    #[test]
    fn rejects_zero_subdivisions() {
        assert!(build_kpoints(&opts(Some(vec![4, 0, 4]), false)).is_err());
    }
}

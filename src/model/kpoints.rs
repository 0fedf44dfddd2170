use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KpointsMode {
    #[default]
    Gamma,
    MonkhorstPack,
}

impl fmt::Display for KpointsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpointsMode::Gamma => write!(f, "Gamma"),
            KpointsMode::MonkhorstPack => write!(f, "Monkhorst-Pack"),
        }
    }
}

/// Automatically generated k-point mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpoints {
    #[serde(default)]
    pub mode: KpointsMode,
    pub grid: [u32; 3],
    #[serde(default)]
    pub shift: [f64; 3],
}

impl Kpoints {
    pub fn new(mode: KpointsMode, grid: [u32; 3]) -> Self {
        Self {
            mode,
            grid,
            shift: [0.0; 3],
        }
    }

    pub fn gamma(grid: [u32; 3]) -> Self {
        Self::new(KpointsMode::Gamma, grid)
    }

    pub fn monkhorst_pack(grid: [u32; 3]) -> Self {
        Self::new(KpointsMode::MonkhorstPack, grid)
    }

    pub fn point_count(&self) -> u64 {
        self.grid.iter().map(|&n| u64::from(n)).product()
    }
}

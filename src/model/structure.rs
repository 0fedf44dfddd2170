use super::element::Element;
use serde::{Deserialize, Serialize};

const SINGULAR_EPS: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub element: Element,
    /// Cartesian position in Å.
    pub position: [f64; 3],
}

impl Site {
    pub fn new(element: Element, position: [f64; 3]) -> Self {
        Self { element, position }
    }
}

/// A periodic crystal structure.
///
/// Lattice vectors are stored as rows (`lattice[0]` is **a**). Site
/// positions are Cartesian; fractional coordinates are derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub lattice: [[f64; 3]; 3],
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl Structure {
    pub fn new(lattice: [[f64; 3]; 3]) -> Self {
        Self {
            comment: None,
            lattice,
            sites: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn push(&mut self, element: Element, position: [f64; 3]) {
        self.sites.push(Site::new(element, position));
    }

    /// Adds a site given in fractional coordinates.
    pub fn push_fractional(&mut self, element: Element, frac: [f64; 3]) {
        let position = self.to_cartesian(frac);
        self.sites.push(Site::new(element, position));
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn volume(&self) -> f64 {
        determinant(&self.lattice).abs()
    }

    #[inline]
    pub fn is_singular(&self) -> bool {
        determinant(&self.lattice).abs() < SINGULAR_EPS
    }

    /// Distinct species in order of first appearance.
    pub fn species(&self) -> Vec<Element> {
        let mut species = Vec::new();
        for site in &self.sites {
            if !species.contains(&site.element) {
                species.push(site.element);
            }
        }
        species
    }

    /// Species with their site counts, in order of first appearance.
    pub fn composition(&self) -> Vec<(Element, usize)> {
        self.species()
            .into_iter()
            .map(|el| {
                let count = self.sites.iter().filter(|s| s.element == el).count();
                (el, count)
            })
            .collect()
    }

    /// Formula in species order, e.g. `Si2O4`. Unit counts are written bare.
    pub fn formula(&self) -> String {
        self.composition()
            .into_iter()
            .map(|(el, n)| {
                if n == 1 {
                    el.symbol().to_string()
                } else {
                    format!("{}{}", el.symbol(), n)
                }
            })
            .collect()
    }

    /// Site indices grouped by species, preserving the relative order of
    /// sites within each species.
    pub fn grouped_indices(&self) -> Vec<(Element, Vec<usize>)> {
        self.species()
            .into_iter()
            .map(|el| {
                let indices = self
                    .sites
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.element == el)
                    .map(|(i, _)| i)
                    .collect();
                (el, indices)
            })
            .collect()
    }

    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = &self.lattice;
        let mut out = [0.0; 3];
        for (k, o) in out.iter_mut().enumerate() {
            *o = frac[0] * m[0][k] + frac[1] * m[1][k] + frac[2] * m[2][k];
        }
        out
    }

    /// Returns `None` when the lattice is singular.
    pub fn to_fractional(&self, cart: [f64; 3]) -> Option<[f64; 3]> {
        let inv = inverse(&self.lattice)?;
        let mut out = [0.0; 3];
        for (k, o) in out.iter_mut().enumerate() {
            *o = cart[0] * inv[0][k] + cart[1] * inv[1][k] + cart[2] * inv[2][k];
        }
        Some(out)
    }

    pub fn fractional_positions(&self) -> Option<Vec<[f64; 3]>> {
        self.sites
            .iter()
            .map(|s| self.to_fractional(s.position))
            .collect()
    }
}

fn determinant(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn inverse(m: &[[f64; 3]; 3]) -> Option<[[f64; 3]; 3]> {
    let det = determinant(m);
    if det.abs() < SINGULAR_EPS {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}

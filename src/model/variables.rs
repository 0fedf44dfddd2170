use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::io::error::Error;
use crate::io::incar;

/// A single INCAR tag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncarValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
    List(Vec<IncarValue>),
}

impl IncarValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            IncarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            IncarValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to reals.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            IncarValue::Real(x) => Some(*x),
            IncarValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for IncarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncarValue::Bool(true) => f.write_str(".TRUE."),
            IncarValue::Bool(false) => f.write_str(".FALSE."),
            IncarValue::Int(i) => write!(f, "{}", i),
            IncarValue::Real(x) => write!(f, "{}", format_real(*x)),
            IncarValue::Text(s) => f.write_str(s),
            IncarValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Reals always carry a decimal point so they read back as reals.
fn format_real(x: f64) -> String {
    let text = x.to_string();
    if x.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{}.0", text)
    } else {
        text
    }
}

impl From<bool> for IncarValue {
    fn from(v: bool) -> Self {
        IncarValue::Bool(v)
    }
}

impl From<i64> for IncarValue {
    fn from(v: i64) -> Self {
        IncarValue::Int(v)
    }
}

impl From<i32> for IncarValue {
    fn from(v: i32) -> Self {
        IncarValue::Int(i64::from(v))
    }
}

impl From<f64> for IncarValue {
    fn from(v: f64) -> Self {
        IncarValue::Real(v)
    }
}

impl From<&str> for IncarValue {
    fn from(v: &str) -> Self {
        IncarValue::Text(v.to_string())
    }
}

impl From<String> for IncarValue {
    fn from(v: String) -> Self {
        IncarValue::Text(v)
    }
}

impl<T: Into<IncarValue>> From<Vec<T>> for IncarValue {
    fn from(v: Vec<T>) -> Self {
        IncarValue::List(v.into_iter().map(Into::into).collect())
    }
}

pub type VariableMap = BTreeMap<String, IncarValue>;

/// Container for the INCAR tags of one calculation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputVariables {
    pub variables: VariableMap,
}

impl InputVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a tag, normalizing the key to uppercase.
    pub fn set(&mut self, key: &str, value: impl Into<IncarValue>) -> Option<IncarValue> {
        self.variables
            .insert(key.trim().to_uppercase(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&IncarValue> {
        self.variables.get(&key.trim().to_uppercase())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Writes the container as an INCAR file at `path`, replacing any
    /// existing file. Nothing is touched if a value cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let mut buf = Vec::new();
        incar::write(&mut buf, self)?;
        fs::write(path.as_ref(), buf)?;
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path.as_ref())?;
        incar::read(BufReader::new(file))
    }
}

impl From<VariableMap> for InputVariables {
    fn from(variables: VariableMap) -> Self {
        Self { variables }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_vasp_literals() {
        assert_eq!(IncarValue::Bool(true).to_string(), ".TRUE.");
        assert_eq!(IncarValue::Bool(false).to_string(), ".FALSE.");
        assert_eq!(IncarValue::Int(-3).to_string(), "-3");
        assert_eq!(IncarValue::Real(520.0).to_string(), "520.0");
        assert_eq!(IncarValue::Real(0.0001).to_string(), "0.0001");
        assert_eq!(IncarValue::from("Accurate").to_string(), "Accurate");
        assert_eq!(
            IncarValue::from(vec![1.0, 0.5, -1.0]).to_string(),
            "1.0 0.5 -1.0"
        );
    }

    #[test]
    fn set_normalizes_keys() {
        let mut vi = InputVariables::new();
        assert!(vi.set("encut", 520.0).is_none());
        assert_eq!(vi.get("ENCUT"), Some(&IncarValue::Real(520.0)));
        assert_eq!(vi.get(" Encut "), Some(&IncarValue::Real(520.0)));
        assert_eq!(vi.set("ENCUT", 400.0), Some(IncarValue::Real(520.0)));
        assert_eq!(vi.len(), 1);
    }

    #[test]
    fn numeric_accessors() {
        assert_eq!(IncarValue::Int(4).as_real(), Some(4.0));
        assert_eq!(IncarValue::Real(4.5).as_int(), None);
        assert_eq!(IncarValue::Bool(true).as_bool(), Some(true));
        assert_eq!(IncarValue::from("x").as_real(), None);
    }

    #[test]
    fn untagged_serde_accepts_toml_scalars() {
        #[derive(Deserialize)]
        struct Wrapper {
            variables: VariableMap,
        }

        let parsed: Wrapper = toml::from_str(
            r#"
            [variables]
            ENCUT = 520.0
            ISMEAR = 0
            LWAVE = false
            PREC = "Accurate"
            MAGMOM = [1.0, -1.0]
            "#,
        )
        .unwrap();

        let vars = parsed.variables;
        assert_eq!(vars["ENCUT"], IncarValue::Real(520.0));
        assert_eq!(vars["ISMEAR"], IncarValue::Int(0));
        assert_eq!(vars["LWAVE"], IncarValue::Bool(false));
        assert_eq!(vars["PREC"], IncarValue::from("Accurate"));
        assert_eq!(vars["MAGMOM"], IncarValue::from(vec![1.0, -1.0]));
    }
}

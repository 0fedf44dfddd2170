use super::reader::parse_value;
use crate::io::Format;
use crate::io::error::Error;
use crate::model::variables::{IncarValue, InputVariables};
use std::io::Write;

/// Characters the INCAR grammar treats as comment starts or separators.
const RESERVED: [char; 4] = ['#', '!', ';', '='];

pub fn write<W: Write>(mut writer: W, vars: &InputVariables) -> Result<(), Error> {
    let key_width = vars.variables.keys().map(|k| k.len()).max().unwrap_or(0);

    for (key, value) in &vars.variables {
        validate(key, value)?;
    }

    if vars.variables.is_empty() {
        writeln!(writer, "# no tags set")?;
    }
    for (key, value) in &vars.variables {
        writeln!(writer, "{:<key_width$} = {}", key, value)?;
    }

    Ok(())
}

/// Rejects anything whose written form would not read back as the same value.
fn validate(key: &str, value: &IncarValue) -> Result<(), Error> {
    if key.is_empty() || key.contains(|c: char| c.is_whitespace() || RESERVED.contains(&c)) {
        return Err(Error::invalid_data(
            Format::Incar,
            format!("invalid tag name '{}'", key),
        ));
    }
    validate_shape(key, value)?;

    match parse_value(&value.to_string()) {
        Ok(parsed) if parsed == *value => Ok(()),
        Ok(parsed) => Err(Error::invalid_data(
            Format::Incar,
            format!("value of {} would read back as {:?}", key, parsed),
        )),
        Err(details) => Err(Error::invalid_data(
            Format::Incar,
            format!("value of {} would not read back: {}", key, details),
        )),
    }
}

fn validate_shape(key: &str, value: &IncarValue) -> Result<(), Error> {
    match value {
        IncarValue::Text(s) if s.contains(['\n', '\r']) => Err(Error::invalid_data(
            Format::Incar,
            format!("value of {} spans multiple lines", key),
        )),
        IncarValue::Text(s) if s.contains(RESERVED) => Err(Error::invalid_data(
            Format::Incar,
            format!("value of {} contains one of '#', '!', ';', '='", key),
        )),
        IncarValue::List(items) if items.is_empty() => Err(Error::invalid_data(
            Format::Incar,
            format!("value of {} is an empty list", key),
        )),
        IncarValue::List(items) => items.iter().try_for_each(|item| match item {
            IncarValue::List(_) => Err(Error::invalid_data(
                Format::Incar,
                format!("value of {} contains a nested list", key),
            )),
            scalar => validate_shape(key, scalar),
        }),
        _ => Ok(()),
    }
}

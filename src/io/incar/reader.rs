use crate::io::Format;
use crate::io::error::Error;
use crate::model::variables::{IncarValue, InputVariables};
use std::io::BufRead;

/// Upper bound on the length of an expanded list value.
const MAX_LIST_LEN: usize = 1 << 20;

pub fn read<R: BufRead>(reader: R) -> Result<InputVariables, Error> {
    let mut vars = InputVariables::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        let content = line.split(['#', '!']).next().unwrap_or_default();

        for assignment in content.split(';') {
            if assignment.trim().is_empty() {
                continue;
            }

            let (key, raw) = assignment.split_once('=').ok_or_else(|| {
                Error::parse(
                    Format::Incar,
                    line_no,
                    format!("expected 'TAG = value', found '{}'", assignment.trim()),
                )
            })?;

            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                return Err(Error::parse(
                    Format::Incar,
                    line_no,
                    format!("invalid tag name '{}'", key),
                ));
            }

            let value = parse_value(raw).map_err(|details| {
                Error::parse(Format::Incar, line_no, format!("{}: {}", key, details))
            })?;

            vars.set(key, value);
        }
    }

    Ok(vars)
}

pub(super) fn parse_value(raw: &str) -> Result<IncarValue, String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    match tokens.as_slice() {
        [] => Err("missing value".to_string()),
        [single] if !single.contains('*') => Ok(parse_scalar(single)),
        _ => {
            let mut items = Vec::with_capacity(tokens.len());
            for token in &tokens {
                match expand_repeat(token)? {
                    Some((count, value)) => {
                        if count > MAX_LIST_LEN - items.len() {
                            return Err(format!(
                                "repetition '{}' expands past {} items",
                                token, MAX_LIST_LEN
                            ));
                        }
                        items.extend(std::iter::repeat_n(value, count));
                    }
                    None if items.len() < MAX_LIST_LEN => items.push(parse_scalar(token)),
                    None => return Err(format!("list longer than {} items", MAX_LIST_LEN)),
                }
            }

            // Free text such as `SYSTEM = bulk silicon` stays a single string.
            if items.iter().any(|v| matches!(v, IncarValue::Text(_))) {
                Ok(IncarValue::Text(tokens.join(" ")))
            } else {
                Ok(IncarValue::List(items))
            }
        }
    }
}

/// Expands VASP repetition syntax (`3*0.0`).
fn expand_repeat(token: &str) -> Result<Option<(usize, IncarValue)>, String> {
    let Some((count, value)) = token.split_once('*') else {
        return Ok(None);
    };
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let count = match count.parse::<usize>() {
        Ok(0) => return Err(format!("repetition '{}' has a zero count", token)),
        Ok(n) if n <= MAX_LIST_LEN => n,
        _ => {
            return Err(format!(
                "repetition '{}' expands past {} items",
                token, MAX_LIST_LEN
            ));
        }
    };
    if value.is_empty() {
        return Err(format!("repetition '{}' has no value", token));
    }
    Ok(Some((count, parse_scalar(value))))
}

fn parse_scalar(token: &str) -> IncarValue {
    match token.to_ascii_uppercase().as_str() {
        ".TRUE." | ".T." | "T" | "TRUE" => return IncarValue::Bool(true),
        ".FALSE." | ".F." | "F" | "FALSE" => return IncarValue::Bool(false),
        _ => {}
    }

    if let Ok(i) = token.parse::<i64>() {
        return IncarValue::Int(i);
    }

    // Fortran double-precision exponents (1.0D-5).
    let normalized = token.replace(['d', 'D'], "e");
    if let Ok(x) = normalized.parse::<f64>()
        && x.is_finite()
    {
        return IncarValue::Real(x);
    }

    IncarValue::Text(token.to_string())
}

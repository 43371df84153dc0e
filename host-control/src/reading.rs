use std::{fmt, str::FromStr};

/// One `<SENSOR>, <quantity>, <value>` line from the board
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sensor: String,
    pub quantity: String,
    pub value: f64,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Line does not have exactly three fields
    #[error("expected 3 fields, got {0}")]
    FieldCount(usize),
    /// Sensor or quantity field is blank
    #[error("blank sensor or quantity")]
    EmptyField,
    /// Sensor or quantity holds something other than `[A-Za-z0-9_-]`
    #[error("{0:?} is not a valid name")]
    InvalidName(String),
    /// Third field is not a finite number
    #[error("{0:?} is not a value")]
    Value(String),
}

/// Sensor and quantity names end up in file names, keep them to `[A-Za-z0-9_-]`
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn name(field: &str) -> Result<String, ParseError> {
    match field {
        "" => Err(ParseError::EmptyField),
        f if is_valid_name(f) => Ok(f.to_string()),
        f => Err(ParseError::InvalidName(f.to_string())),
    }
}

impl FromStr for Reading {
    type Err = ParseError;

    /// Fields are comma-separated, whitespace around each field is ignored
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();

        let [sensor, quantity, value] = fields.as_slice() else {
            return Err(ParseError::FieldCount(fields.len()));
        };

        let sensor = name(sensor)?;
        let quantity = name(quantity)?;
        let value = value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::Value(value.to_string()))?;

        Ok(Self { sensor, quantity, value })
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.sensor, self.quantity, self.value)
    }
}

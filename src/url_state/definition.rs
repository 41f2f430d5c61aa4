// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a parameter value read from the URL is coerced before it is handed to a state setter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Parse the parameter as a number.
    Num,

    /// Keep the parameter as it is.
    #[default]
    Str,
}

/// Value of a single state field or URL parameter.
///
/// Numbers are kept as `f64` so that a failed coercion can surface as `NaN` instead of an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Num(f64),
    Str(String),
}

impl ParamValue {
    /// Parse a raw parameter according to the requested value type.
    ///
    /// Numeric parsing trims surrounding whitespace. Anything that does not parse, including an
    /// empty string, becomes `NaN`.
    pub fn coerce(raw: &str, value_type: ValueType) -> Self {
        match value_type {
            ValueType::Str => Self::Str(raw.to_owned()),
            ValueType::Num => Self::Num(raw.trim().parse::<f64>().unwrap_or(f64::NAN)),
        }
    }

    /// Returns `true` for the empty string. Numbers are never empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Str(value) if value.is_empty())
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Num(_) => None,
            Self::Str(value) => Some(value),
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => write!(f, "{}", value),
            Self::Num(value) if value.is_nan() => write!(f, "NaN"),
            Self::Num(value) if value.is_infinite() => {
                let sign = if value.is_sign_negative() { "-" } else { "" };
                write!(f, "{}Infinity", sign)
            }
            // Integral values print without a fractional part, "3" rather than "3.0".
            Self::Num(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            // Beyond these magnitudes JavaScript switches to exponent notation, "1e+21".
            Self::Num(value) if value.abs() >= 1e21 || (*value != 0.0 && value.abs() < 1e-6) => {
                let formatted = format!("{:e}", value);
                match formatted.split_once('e') {
                    Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                        write!(f, "{}e+{}", mantissa, exponent)
                    }
                    _ => write!(f, "{}", formatted),
                }
            }
            Self::Num(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Num(value as f64)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Num(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Num(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Mapping between one state field and one URL parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Name of the field in the view's state.
    pub state_name: String,

    /// Name of the URL parameter, without the query prefix.
    pub param_name: String,

    /// Value used whenever the state field is empty or the parameter is missing.
    pub default_param_value: String,

    #[serde(default)]
    pub value_type: ValueType,
}

impl FieldDefinition {
    pub fn new(
        state_name: impl Into<String>,
        param_name: impl Into<String>,
        default_param_value: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            state_name: state_name.into(),
            param_name: param_name.into(),
            default_param_value: default_param_value.into(),
            value_type,
        }
    }

    /// Field which is coerced to a number when read back from the URL.
    pub fn num(
        state_name: impl Into<String>,
        param_name: impl Into<String>,
        default_param_value: impl Into<String>,
    ) -> Self {
        Self::new(state_name, param_name, default_param_value, ValueType::Num)
    }

    /// Field which is read back from the URL as a string.
    pub fn str(
        state_name: impl Into<String>,
        param_name: impl Into<String>,
        default_param_value: impl Into<String>,
    ) -> Self {
        Self::new(state_name, param_name, default_param_value, ValueType::Str)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("state field '{0}' is mapped more than once")]
    DuplicateStateName(String),

    #[error("url parameter '{0}' is mapped more than once")]
    DuplicateParamName(String),

    #[error("state field '{0}' is mapped to an empty url parameter name")]
    EmptyParamName(String),
}

/// Validated list of field definitions.
///
/// Every state field and every parameter name appears at most once, which keeps the mapping
/// between state and URL bidirectional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldDefinitions(Vec<FieldDefinition>);

impl FieldDefinitions {
    pub fn new(definitions: Vec<FieldDefinition>) -> Result<Self, DefinitionError> {
        let mut state_names = HashSet::new();
        let mut param_names = HashSet::new();

        for definition in &definitions {
            if definition.param_name.is_empty() {
                return Err(DefinitionError::EmptyParamName(
                    definition.state_name.clone(),
                ));
            }

            if !state_names.insert(definition.state_name.as_str()) {
                return Err(DefinitionError::DuplicateStateName(
                    definition.state_name.clone(),
                ));
            }

            if !param_names.insert(definition.param_name.as_str()) {
                return Err(DefinitionError::DuplicateParamName(
                    definition.param_name.clone(),
                ));
            }
        }

        Ok(Self(definitions))
    }

    pub fn into_inner(self) -> Vec<FieldDefinition> {
        self.0
    }
}

impl Deref for FieldDefinitions {
    type Target = [FieldDefinition];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<FieldDefinition>> for FieldDefinitions {
    type Error = DefinitionError;

    fn try_from(definitions: Vec<FieldDefinition>) -> Result<Self, Self::Error> {
        Self::new(definitions)
    }
}

impl<'a> IntoIterator for &'a FieldDefinitions {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for FieldDefinitions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let definitions: Vec<FieldDefinition> = Deserialize::deserialize(deserializer)?;

        FieldDefinitions::new(definitions)
            .map_err(|err| serde::de::Error::custom(format!("invalid field definitions, {}", err)))
    }
}

/// Namespace prepended to every parameter name of one synchronizer.
///
/// Independent views sharing one URL use distinct prefixes so they never overwrite each other's
/// parameters. The empty prefix is allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryPrefix(String);

impl QueryPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Full URL parameter name for the given (unprefixed) parameter.
    pub fn key(&self, param_name: &str) -> String {
        format!("{}{}", self.0, param_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QueryPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QueryPrefix {
    fn from(prefix: &str) -> Self {
        Self::new(prefix)
    }
}

impl From<String> for QueryPrefix {
    fn from(prefix: String) -> Self {
        Self(prefix)
    }
}

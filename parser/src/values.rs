//! Raw values collected for one option.

use std::collections::BTreeMap;

use optline_core::OptionKind;
use serde::Serialize;

/// Raw string values of a matched option, shaped by its [`OptionKind`].
///
/// `Normal` and `Boolean` options hold at most one value, `List` options an
/// ordered sequence and `Group` options a property map.
///
/// # Examples
///
/// ```
/// use optline_core::OptionKind;
/// use optline_parser::OptionValues;
///
/// let mut values = OptionValues::empty(OptionKind::Group);
/// values.push("key=value".to_string());
/// assert_eq!(values.properties().unwrap()["key"], "value");
///
/// let mut values = OptionValues::empty(OptionKind::List);
/// values.push("5".to_string());
/// values.push("10".to_string());
/// assert_eq!(values.as_slice(), ["5", "10"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValues {
    /// Zero or one value.
    Single(Option<String>),
    /// Ordered values.
    List(Vec<String>),
    /// `key=value` properties.
    Map(BTreeMap<String, String>),
}

impl Default for OptionValues {
    fn default() -> Self {
        Self::Single(None)
    }
}

impl OptionValues {
    /// Returns the empty value holder for `kind`.
    pub fn empty(kind: OptionKind) -> Self {
        match kind {
            OptionKind::Normal | OptionKind::Boolean => Self::Single(None),
            OptionKind::List => Self::List(Vec::new()),
            OptionKind::Group => Self::Map(BTreeMap::new()),
        }
    }

    /// Builds values from declared defaults. Group defaults are written as
    /// `key=value`; entries without `=` are skipped.
    pub fn from_defaults(kind: OptionKind, defaults: &[String]) -> Self {
        let mut values = Self::empty(kind);
        for value in defaults {
            values.push(value.clone());
        }
        values
    }

    /// Adds one value: replaces a single value, appends to a list, or
    /// inserts a `key=value` property.
    pub fn push(&mut self, value: String) {
        match self {
            Self::Single(slot) => *slot = Some(value),
            Self::List(values) => values.push(value),
            Self::Map(map) => {
                if let Some((key, value)) = value.split_once('=') {
                    map.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    /// Inserts a property.
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Self::Map(map) = self {
            map.insert(key.to_string(), value.to_string());
        }
    }

    /// Returns the scalar or list values; empty for properties.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Single(value) => value.as_slice(),
            Self::List(values) => values,
            Self::Map(_) => &[],
        }
    }

    /// Returns the property map, if this holds properties.
    pub fn properties(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns `true` if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.is_none(),
            Self::List(values) => values.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }
}

/// Splits `token` on `separator`, dropping trailing empty pieces and
/// trimming the rest.
pub(crate) fn split_values(token: &str, separator: char) -> Vec<String> {
    let mut pieces: Vec<&str> = token.split(separator).collect();
    while pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }
    pieces.into_iter().map(|piece| piece.trim().to_string()).collect()
}

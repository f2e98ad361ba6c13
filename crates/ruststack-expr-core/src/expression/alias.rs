//! The alias table shared by every tree compiled in one `build()`.
//!
//! Names and values are aliased in first-seen order. A structurally equal
//! name segment or value always maps back to the alias it got the first time,
//! and distinct inputs never share an alias.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use ruststack_expr_model::AttributeValue;

use crate::error::{ExpressionError, ExpressionResult};

/// Prefix of expression attribute name aliases.
pub const NAME_ALIAS_PREFIX: char = '#';

/// Prefix of expression attribute value aliases.
pub const VALUE_ALIAS_PREFIX: char = ':';

#[derive(Debug, Default)]
pub(crate) struct AliasTable {
    names: Vec<String>,
    name_index: HashMap<String, usize>,
    values: Vec<AttributeValue>,
    value_index: HashMap<AttributeValue, usize>,
}

impl AliasTable {
    /// Alias one attribute name segment.
    pub(crate) fn alias_name(&mut self, name: &str) -> String {
        let index = match self.name_index.get(name) {
            Some(index) => *index,
            None => {
                let index = self.names.len();
                self.names.push(name.to_owned());
                self.name_index.insert(name.to_owned(), index);
                index
            }
        };
        format!("{NAME_ALIAS_PREFIX}{index}")
    }

    /// Alias one literal value, rejecting values the store would refuse.
    pub(crate) fn alias_value(&mut self, value: &AttributeValue) -> ExpressionResult<String> {
        let index = match self.value_index.entry(value.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                validate_value(value)?;
                let index = self.values.len();
                self.values.push(value.clone());
                *entry.insert(index)
            }
        };
        Ok(format!("{VALUE_ALIAS_PREFIX}{index}"))
    }

    pub(crate) fn name_count(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Consume the table into the `ExpressionAttributeNames` and
    /// `ExpressionAttributeValues` maps.
    pub(crate) fn into_maps(self) -> (HashMap<String, String>, HashMap<String, AttributeValue>) {
        let names = self
            .names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (format!("{NAME_ALIAS_PREFIX}{i}"), name))
            .collect();
        let values = self
            .values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (format!("{VALUE_ALIAS_PREFIX}{i}"), value))
            .collect();
        (names, values)
    }
}

fn validate_value(value: &AttributeValue) -> ExpressionResult<()> {
    match value {
        AttributeValue::N(n) => validate_number(n),
        AttributeValue::Ss(members) => validate_set("string", members),
        AttributeValue::Ns(members) => {
            validate_set("number", members)?;
            members.iter().try_for_each(|n| validate_number(n))
        }
        AttributeValue::Bs(members) => validate_set("binary", members),
        AttributeValue::L(items) => items.iter().try_for_each(validate_value),
        AttributeValue::M(fields) => fields.values().try_for_each(validate_value),
        AttributeValue::Null(false) => Err(ExpressionError::invalid_parameter(
            "null value must be {\"NULL\": true}",
        )),
        AttributeValue::S(_)
        | AttributeValue::B(_)
        | AttributeValue::Bool(_)
        | AttributeValue::Null(true) => Ok(()),
    }
}

fn validate_number(n: &str) -> ExpressionResult<()> {
    if n.trim().parse::<f64>().is_ok_and(f64::is_finite) {
        Ok(())
    } else {
        Err(ExpressionError::invalid_parameter(format!(
            "invalid number value {n:?}"
        )))
    }
}

fn validate_set<T: Eq + std::hash::Hash>(kind: &str, members: &[T]) -> ExpressionResult<()> {
    if members.is_empty() {
        return Err(ExpressionError::invalid_parameter(format!(
            "{kind} set value must not be empty"
        )));
    }
    let mut seen = std::collections::HashSet::with_capacity(members.len());
    if members.iter().all(|m| seen.insert(m)) {
        Ok(())
    } else {
        Err(ExpressionError::invalid_parameter(format!(
            "{kind} set value contains duplicate members"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_reuse_aliases_for_equal_inputs() {
        let mut table = AliasTable::default();
        assert_eq!(table.alias_name("Artist"), "#0");
        assert_eq!(table.alias_name("Title"), "#1");
        assert_eq!(table.alias_name("Artist"), "#0");

        let v = AttributeValue::from("x");
        assert_eq!(table.alias_value(&v).unwrap(), ":0");
        assert_eq!(table.alias_value(&AttributeValue::from(1)).unwrap(), ":1");
        assert_eq!(table.alias_value(&v).unwrap(), ":0");

        assert_eq!(table.name_count(), 2);
        assert_eq!(table.value_count(), 2);
    }

    #[test]
    fn test_should_keep_string_and_number_apart() {
        let mut table = AliasTable::default();
        let s = table.alias_value(&AttributeValue::from("1")).unwrap();
        let n = table.alias_value(&AttributeValue::from(1)).unwrap();
        assert_ne!(s, n);
    }

    #[test]
    fn test_should_share_alias_for_reordered_sets() {
        let mut table = AliasTable::default();
        let first = table
            .alias_value(&AttributeValue::string_set(["x", "y"]))
            .unwrap();
        let second = table
            .alias_value(&AttributeValue::string_set(["y", "x"]))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(table.value_count(), 1);
    }

    #[test]
    fn test_should_export_maps() {
        let mut table = AliasTable::default();
        table.alias_name("a");
        table.alias_value(&AttributeValue::Bool(true)).unwrap();
        let (names, values) = table.into_maps();
        assert_eq!(names.get("#0").map(String::as_str), Some("a"));
        assert_eq!(values.get(":0"), Some(&AttributeValue::Bool(true)));
    }

    #[test]
    fn test_should_reject_values_the_store_refuses() {
        let mut table = AliasTable::default();
        for bad in [
            AttributeValue::Ss(vec![]),
            AttributeValue::string_set(["a", "a"]),
            AttributeValue::N("NaN".to_owned()),
            AttributeValue::from(f64::INFINITY),
            AttributeValue::Ns(vec!["1".to_owned(), "one".to_owned()]),
            AttributeValue::L(vec![AttributeValue::Bs(vec![])]),
            AttributeValue::Null(false),
            AttributeValue::M(HashMap::from([(
                "gone".to_owned(),
                AttributeValue::Null(false),
            )])),
        ] {
            let err = table.alias_value(&bad).unwrap_err();
            assert!(err.is_invalid_parameter(), "expected rejection of {bad}");
        }
        assert_eq!(table.value_count(), 0);
    }
}

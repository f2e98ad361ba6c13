//! The top-level builder and its compiled result.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use ruststack_expr_model::AttributeValue;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::config::ExpressionConfig;
use crate::error::{ExpressionError, ExpressionResult};
use crate::expression::compiler::Compiler;
use crate::expression::{Condition, KeyCondition, Projection, Update};

/// The five expression kinds a request can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    /// `ConditionExpression`.
    Condition,
    /// `FilterExpression`.
    Filter,
    /// `KeyConditionExpression`.
    KeyCondition,
    /// `ProjectionExpression`.
    Projection,
    /// `UpdateExpression`.
    Update,
}

impl ExpressionKind {
    /// The request member the expression is sent in.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Condition => "ConditionExpression",
            Self::Filter => "FilterExpression",
            Self::KeyCondition => "KeyConditionExpression",
            Self::Projection => "ProjectionExpression",
            Self::Update => "UpdateExpression",
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collects up to one tree of each kind and compiles them together.
///
/// Each `with_*` call stores its tree, replacing any tree of the same kind
/// stored before. The builder takes `self` by value and has no internal
/// locking; share it across threads only behind your own synchronization.
///
/// ```
/// use ruststack_expr_core::{Comparable, ExpressionBuilder, Projection, name, value};
///
/// let expr = ExpressionBuilder::new()
///     .with_filter(name("Artist").equal(value("No One You Know")))
///     .with_projection(Projection::new([name("SongTitle"), name("AlbumTitle")]))
///     .build()
///     .unwrap();
///
/// assert_eq!(expr.filter(), Some("#0 = :0"));
/// assert_eq!(expr.projection(), Some("#1, #2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExpressionBuilder {
    config: ExpressionConfig,
    condition: Option<Condition>,
    filter: Option<Condition>,
    key_condition: Option<KeyCondition>,
    projection: Option<Projection>,
    update: Option<Update>,
}

impl ExpressionBuilder {
    /// An empty builder with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom limits for this builder's `build()` calls.
    #[must_use]
    pub fn with_config(mut self, config: ExpressionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the condition expression.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Set the filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the key condition expression.
    #[must_use]
    pub fn with_key_condition(mut self, key_condition: impl Into<KeyCondition>) -> Self {
        self.key_condition = Some(key_condition.into());
        self
    }

    /// Set the projection expression.
    #[must_use]
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the update expression.
    #[must_use]
    pub fn with_update(mut self, update: Update) -> Self {
        self.update = Some(update);
        self
    }

    /// Compile every stored tree against one alias table.
    ///
    /// Trees are compiled in the order condition, filter, key condition,
    /// projection, update, which fixes the alias numbering. Building the same
    /// builder twice yields identical results.
    ///
    /// # Errors
    ///
    /// Returns `UnsetParameter` if no tree was stored, and `InvalidParameter`
    /// if any tree is malformed.
    pub fn build(&self) -> ExpressionResult<Expression> {
        if self.condition.is_none()
            && self.filter.is_none()
            && self.key_condition.is_none()
            && self.projection.is_none()
            && self.update.is_none()
        {
            return Err(ExpressionError::unset_parameter("ExpressionBuilder"));
        }

        let mut compiler = Compiler::new(&self.config);
        let condition = self
            .condition
            .as_ref()
            .map(|tree| compiler.compile(ExpressionKind::Condition, tree))
            .transpose()?;
        let filter = self
            .filter
            .as_ref()
            .map(|tree| compiler.compile(ExpressionKind::Filter, tree))
            .transpose()?;
        let key_condition = self
            .key_condition
            .as_ref()
            .map(|tree| compiler.compile(ExpressionKind::KeyCondition, tree))
            .transpose()?;
        let projection = self
            .projection
            .as_ref()
            .map(|tree| compiler.compile(ExpressionKind::Projection, tree))
            .transpose()?;
        let update = self
            .update
            .as_ref()
            .map(|tree| compiler.compile(ExpressionKind::Update, tree))
            .transpose()?;

        let aliases = compiler.into_aliases();
        debug!(
            condition = condition.is_some(),
            filter = filter.is_some(),
            key_condition = key_condition.is_some(),
            projection = projection.is_some(),
            update = update.is_some(),
            names = aliases.name_count(),
            values = aliases.value_count(),
            "built expression"
        );
        let (names, values) = aliases.into_maps();

        Ok(Expression {
            condition,
            filter,
            key_condition,
            projection,
            update,
            names,
            values,
        })
    }
}

/// The compiled expressions of one `build()` plus the alias maps they share.
///
/// Serializes to the matching members of a DynamoDB request, omitting
/// expressions that were not built and empty maps. Map entries are written in
/// key order, so equal expressions serialize to identical bytes:
///
/// ```json
/// {"FilterExpression": "#0 = :0", "ExpressionAttributeNames": {"#0": "Artist"}, ...}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    #[serde(rename = "ConditionExpression", skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    #[serde(rename = "FilterExpression", skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    #[serde(rename = "KeyConditionExpression", skip_serializing_if = "Option::is_none")]
    key_condition: Option<String>,
    #[serde(rename = "ProjectionExpression", skip_serializing_if = "Option::is_none")]
    projection: Option<String>,
    #[serde(rename = "UpdateExpression", skip_serializing_if = "Option::is_none")]
    update: Option<String>,
    #[serde(
        rename = "ExpressionAttributeNames",
        skip_serializing_if = "HashMap::is_empty",
        serialize_with = "sorted"
    )]
    names: HashMap<String, String>,
    #[serde(
        rename = "ExpressionAttributeValues",
        skip_serializing_if = "HashMap::is_empty",
        serialize_with = "sorted"
    )]
    values: HashMap<String, AttributeValue>,
}

fn sorted<S: Serializer, V: Serialize>(
    map: &HashMap<String, V>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    map.iter().collect::<BTreeMap<_, _>>().serialize(serializer)
}

impl Expression {
    /// The compiled condition expression, if one was set.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// The compiled filter expression, if one was set.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// The compiled key condition expression, if one was set.
    #[must_use]
    pub fn key_condition(&self) -> Option<&str> {
        self.key_condition.as_deref()
    }

    /// The compiled projection expression, if one was set.
    #[must_use]
    pub fn projection(&self) -> Option<&str> {
        self.projection.as_deref()
    }

    /// The compiled update expression, if one was set.
    #[must_use]
    pub fn update(&self) -> Option<&str> {
        self.update.as_deref()
    }

    /// Look up a compiled expression by kind.
    #[must_use]
    pub fn get(&self, kind: ExpressionKind) -> Option<&str> {
        match kind {
            ExpressionKind::Condition => self.condition(),
            ExpressionKind::Filter => self.filter(),
            ExpressionKind::KeyCondition => self.key_condition(),
            ExpressionKind::Projection => self.projection(),
            ExpressionKind::Update => self.update(),
        }
    }

    /// `ExpressionAttributeNames`: name alias to attribute name segment.
    ///
    /// Must be sent with the request whenever it is non-empty.
    #[must_use]
    pub fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    /// `ExpressionAttributeValues`: value alias to literal value.
    ///
    /// Must be sent with the request whenever it is non-empty.
    #[must_use]
    pub fn values(&self) -> &HashMap<String, AttributeValue> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Comparable, key, name, set, value};

    #[test]
    fn test_should_share_results_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExpressionBuilder>();
        assert_send_sync::<Expression>();
    }

    #[test]
    fn test_should_chain_config_with_trees() {
        let config = ExpressionConfig {
            max_expression_length: 4,
            ..ExpressionConfig::default()
        };
        let builder = ExpressionBuilder::new()
            .with_condition(name("a").equal(value(1)))
            .with_config(config);
        assert!(builder.build().unwrap_err().is_invalid_parameter());
        let relaxed = builder.with_config(ExpressionConfig::default());
        assert_eq!(relaxed.build().unwrap().condition(), Some("#0 = :0"));
    }

    #[test]
    fn test_should_serialize_maps_in_key_order() {
        let builder = ExpressionBuilder::new().with_projection(Projection::new(
            ["e", "d", "c", "b", "a"].into_iter().map(name),
        ));
        let first = serde_json::to_string(&builder.build().unwrap()).unwrap();
        let second = serde_json::to_string(&builder.build().unwrap()).unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with(
            r##""ExpressionAttributeNames":{"#0":"e","#1":"d","#2":"c","#3":"b","#4":"a"}}"##
        ));
    }

    #[test]
    fn test_should_fail_without_trees() {
        let err = ExpressionBuilder::new().build().unwrap_err();
        assert!(err.is_unset_parameter());
    }

    #[test]
    fn test_should_replace_tree_of_same_kind() {
        let expr = ExpressionBuilder::new()
            .with_condition(name("old").equal(value("stale")))
            .with_condition(name("new").equal(value("fresh")))
            .build()
            .unwrap();
        assert_eq!(expr.condition(), Some("#0 = :0"));
        assert_eq!(expr.names().len(), 1);
        assert_eq!(expr.names()["#0"], "new");
        assert_eq!(expr.values()[":0"], AttributeValue::from("fresh"));
    }

    #[test]
    fn test_should_number_aliases_in_kind_order() {
        let expr = ExpressionBuilder::new()
            .with_update(set(name("u"), value(3)))
            .with_key_condition(key("k").equal(value(2)))
            .with_condition(name("c").equal(value(1)))
            .build()
            .unwrap();
        assert_eq!(expr.get(ExpressionKind::Condition), Some("#0 = :0"));
        assert_eq!(expr.get(ExpressionKind::KeyCondition), Some("#1 = :1"));
        assert_eq!(expr.get(ExpressionKind::Update), Some("SET #2 = :2"));
        assert_eq!(expr.filter(), None);
        assert_eq!(expr.projection(), None);
    }

    #[test]
    fn test_should_return_no_partial_result_on_error() {
        let result = ExpressionBuilder::new()
            .with_condition(name("ok").equal(value(1)))
            .with_update(set(name("bad..path"), value(1)))
            .build();
        assert!(result.unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_should_serialize_request_members() {
        let expr = ExpressionBuilder::new()
            .with_condition(name("id").attribute_not_exists())
            .build()
            .unwrap();
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ConditionExpression": "attribute_not_exists(#0)",
                "ExpressionAttributeNames": {"#0": "id"},
            })
        );
    }
}

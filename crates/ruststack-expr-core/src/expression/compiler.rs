//! Recursive-descent emission of expression strings.
//!
//! The compiler walks one tree at a time, writing its textual form while
//! feeding every name segment and literal into the alias table it owns. The
//! builder runs every tree of one `build()` through the same compiler, so the
//! trees share aliases.
//!
//! Formatting rules:
//!
//! - `AND`/`OR` chains of one operator are emitted flat; a child using the
//!   other operator is parenthesized. `NOT` always parenthesizes its operand.
//! - Update clauses are emitted SET, REMOVE, ADD, DELETE, separated by one
//!   space; empty clauses are omitted.
//! - A projection lists each distinct path once, at its first position.

use std::collections::HashSet;

use ruststack_expr_model::{AttributeType, AttributeValue};
use tracing::trace;

use super::alias::AliasTable;
use super::ast::{Expr, LogicalOp, SetValue, UpdateExpr};
use super::condition::Condition;
use super::key_condition::KeyCondition;
use super::operand::{NameOperand, Operand, ValueOperand};
use super::path::{AttributePath, PathElement};
use super::projection::Projection;
use super::update::Update;
use crate::builder::ExpressionKind;
use crate::config::ExpressionConfig;
use crate::error::{ExpressionError, ExpressionResult};

/// A tree that can be compiled into an expression string.
pub(crate) trait Compile {
    fn compile(&self, compiler: &mut Compiler<'_>, out: &mut String) -> ExpressionResult<()>;
}

/// Compiles trees against one shared [`AliasTable`].
#[derive(Debug)]
pub(crate) struct Compiler<'a> {
    config: &'a ExpressionConfig,
    aliases: AliasTable,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(config: &'a ExpressionConfig) -> Self {
        Self {
            config,
            aliases: AliasTable::default(),
        }
    }

    pub(crate) fn into_aliases(self) -> AliasTable {
        self.aliases
    }

    /// Compile one tree and check the result against the length limit.
    pub(crate) fn compile(
        &mut self,
        kind: ExpressionKind,
        tree: &impl Compile,
    ) -> ExpressionResult<String> {
        let mut out = String::new();
        tree.compile(self, &mut out)?;
        if out.len() > self.config.max_expression_length {
            return Err(ExpressionError::invalid_parameter(format!(
                "{kind} is {} bytes long, the limit is {}",
                out.len(),
                self.config.max_expression_length
            )));
        }
        trace!(%kind, expression = %out, "compiled expression tree");
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Conditions
    // -----------------------------------------------------------------------

    fn write_expr(&mut self, expr: &Expr, out: &mut String) -> ExpressionResult<()> {
        match expr {
            Expr::Compare { left, op, right } => {
                self.write_operand(left, out)?;
                out.push(' ');
                out.push_str(&op.to_string());
                out.push(' ');
                self.write_operand(right, out)
            }
            Expr::Between { value, low, high } => {
                self.write_operand(value, out)?;
                out.push_str(" BETWEEN ");
                self.write_operand(low, out)?;
                out.push_str(" AND ");
                self.write_operand(high, out)
            }
            Expr::In { value, list } => self.write_in(value, list, out),
            Expr::Logical { op, left, right } => {
                self.write_logical_child(*op, left, out)?;
                out.push(' ');
                out.push_str(&op.to_string());
                out.push(' ');
                self.write_logical_child(*op, right, out)
            }
            Expr::Not(inner) => {
                out.push_str("NOT (");
                self.write_expr(inner, out)?;
                out.push(')');
                Ok(())
            }
            Expr::Function { name, args } => {
                if args.len() != name.arity() {
                    return Err(ExpressionError::invalid_parameter(format!(
                        "{name} takes {} argument(s), got {}",
                        name.arity(),
                        args.len()
                    )));
                }
                if !matches!(args.first(), Some(Operand::Name(_))) {
                    return Err(ExpressionError::invalid_parameter(format!(
                        "the first argument of {name} must be an attribute path"
                    )));
                }
                out.push_str(&name.to_string());
                self.write_arguments(args.iter().map(Argument::Operand), out)
            }
        }
    }

    fn write_logical_child(
        &mut self,
        parent: LogicalOp,
        child: &Expr,
        out: &mut String,
    ) -> ExpressionResult<()> {
        let wrap = matches!(child, Expr::Logical { op, .. } if *op != parent);
        if wrap {
            out.push('(');
        }
        self.write_expr(child, out)?;
        if wrap {
            out.push(')');
        }
        Ok(())
    }

    fn write_in(
        &mut self,
        value: &Operand,
        list: &[Operand],
        out: &mut String,
    ) -> ExpressionResult<()> {
        if list.is_empty() {
            return Err(ExpressionError::invalid_parameter(
                "IN requires at least one candidate",
            ));
        }
        if list.len() > self.config.max_in_operands {
            return Err(ExpressionError::invalid_parameter(format!(
                "IN accepts at most {} candidates, got {}",
                self.config.max_in_operands,
                list.len()
            )));
        }
        self.write_operand(value, out)?;
        out.push_str(" IN ");
        self.write_arguments(list.iter().map(Argument::Operand), out)
    }

    // -----------------------------------------------------------------------
    // Operands
    // -----------------------------------------------------------------------

    fn write_operand(&mut self, operand: &Operand, out: &mut String) -> ExpressionResult<()> {
        match operand {
            Operand::Name(name) => self.write_name(name, out),
            Operand::Value(value) => self.write_value(value.value(), out),
            Operand::Size(size) => {
                out.push_str("size(");
                self.write_name(size.name(), out)?;
                out.push(')');
                Ok(())
            }
            Operand::List(_) => self.write_value(&literal(operand)?, out),
        }
    }

    fn write_name(&mut self, name: &NameOperand, out: &mut String) -> ExpressionResult<()> {
        self.write_path(name.path()?, out);
        Ok(())
    }

    fn write_path(&mut self, path: &AttributePath, out: &mut String) {
        for (i, element) in path.elements().iter().enumerate() {
            match element {
                PathElement::Attribute(segment) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(&self.aliases.alias_name(segment));
                }
                PathElement::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
    }

    fn write_value(&mut self, value: &AttributeValue, out: &mut String) -> ExpressionResult<()> {
        out.push_str(&self.aliases.alias_value(value)?);
        Ok(())
    }

    /// `(a, b, ...)`.
    fn write_arguments<'t>(
        &mut self,
        args: impl Iterator<Item = Argument<'t>>,
        out: &mut String,
    ) -> ExpressionResult<()> {
        out.push('(');
        for (i, arg) in args.enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match arg {
                Argument::Operand(operand) => self.write_operand(operand, out)?,
                Argument::Name(name) => self.write_name(name, out)?,
                Argument::Value(value) => self.write_set_value(value, out)?,
            }
        }
        out.push(')');
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    fn write_projection(
        &mut self,
        names: &[NameOperand],
        out: &mut String,
    ) -> ExpressionResult<()> {
        if names.is_empty() {
            return Err(ExpressionError::invalid_parameter(
                "projection must name at least one attribute",
            ));
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            let path = name.path()?;
            if !seen.insert(path) {
                continue;
            }
            if seen.len() > 1 {
                out.push_str(", ");
            }
            self.write_path(path, out);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Updates
    // -----------------------------------------------------------------------

    fn write_update(&mut self, update: &UpdateExpr, out: &mut String) -> ExpressionResult<()> {
        if update.is_empty() {
            return Err(ExpressionError::invalid_parameter(
                "update must contain at least one action",
            ));
        }

        let mut clauses = Vec::with_capacity(4);
        if !update.set_actions.is_empty() {
            let mut clause = String::from("SET ");
            for (i, (target, value)) in update.set_actions.iter().enumerate() {
                if i > 0 {
                    clause.push_str(", ");
                }
                self.write_name(target, &mut clause)?;
                clause.push_str(" = ");
                self.write_set_value(value, &mut clause)?;
            }
            clauses.push(clause);
        }
        if !update.remove_paths.is_empty() {
            let mut clause = String::from("REMOVE ");
            for (i, target) in update.remove_paths.iter().enumerate() {
                if i > 0 {
                    clause.push_str(", ");
                }
                self.write_name(target, &mut clause)?;
            }
            clauses.push(clause);
        }
        if !update.add_actions.is_empty() {
            clauses.push(self.write_set_actions("ADD", &update.add_actions, accepts_add)?);
        }
        if !update.delete_actions.is_empty() {
            clauses.push(self.write_set_actions(
                "DELETE",
                &update.delete_actions,
                AttributeType::is_set,
            )?);
        }

        out.push_str(&clauses.join(" "));
        Ok(())
    }

    /// An ADD or DELETE clause: `KEYWORD #a :v, #b :w`.
    fn write_set_actions(
        &mut self,
        keyword: &str,
        actions: &[(NameOperand, ValueOperand)],
        accepts: fn(AttributeType) -> bool,
    ) -> ExpressionResult<String> {
        let mut clause = format!("{keyword} ");
        for (i, (target, value)) in actions.iter().enumerate() {
            let ty = AttributeType::of(value.value());
            if !accepts(ty) {
                return Err(ExpressionError::invalid_parameter(format!(
                    "{keyword} does not accept a value of type {ty}"
                )));
            }
            if i > 0 {
                clause.push_str(", ");
            }
            self.write_name(target, &mut clause)?;
            clause.push(' ');
            self.write_value(value.value(), &mut clause)?;
        }
        Ok(clause)
    }

    fn write_set_value(&mut self, value: &SetValue, out: &mut String) -> ExpressionResult<()> {
        match value {
            SetValue::Operand(Operand::Size(_)) => Err(ExpressionError::invalid_parameter(
                "size() cannot be used in an update expression",
            )),
            SetValue::Operand(operand) => self.write_operand(operand, out),
            SetValue::Plus(left, right) | SetValue::Minus(left, right) => {
                if is_arithmetic(left) || is_arithmetic(right) {
                    return Err(ExpressionError::invalid_parameter(
                        "a SET value allows a single '+' or '-'",
                    ));
                }
                self.write_set_value(left, out)?;
                out.push_str(if matches!(value, SetValue::Plus(..)) {
                    " + "
                } else {
                    " - "
                });
                self.write_set_value(right, out)
            }
            SetValue::ListAppend(left, right) => {
                out.push_str("list_append");
                self.write_arguments(
                    [Argument::Value(left), Argument::Value(right)].into_iter(),
                    out,
                )
            }
            SetValue::IfNotExists(path, default) => {
                out.push_str("if_not_exists");
                self.write_arguments(
                    [Argument::Name(path), Argument::Value(default)].into_iter(),
                    out,
                )
            }
        }
    }
}

/// One argument of a function-call form: `name(arg, ...)` or `(candidate, ...)`.
enum Argument<'t> {
    Operand(&'t Operand),
    Name(&'t NameOperand),
    Value(&'t SetValue),
}

fn is_arithmetic(value: &SetValue) -> bool {
    matches!(value, SetValue::Plus(..) | SetValue::Minus(..))
}

fn accepts_add(ty: AttributeType) -> bool {
    ty == AttributeType::Number || ty.is_set()
}

/// Fold a literal operand (or list of literals) into one value.
fn literal(operand: &Operand) -> ExpressionResult<AttributeValue> {
    match operand {
        Operand::Value(value) => Ok(value.value().clone()),
        Operand::List(members) => members
            .iter()
            .map(literal)
            .collect::<ExpressionResult<Vec<_>>>()
            .map(AttributeValue::L),
        Operand::Name(_) | Operand::Size(_) => Err(ExpressionError::invalid_parameter(
            "list operands may only contain literal values",
        )),
    }
}

/// The operand a key condition constrains.
fn key_operand(expr: &Expr) -> Option<&Operand> {
    match expr {
        Expr::Compare { left, .. } => Some(left.as_ref()),
        Expr::Between { value, .. } => Some(value.as_ref()),
        Expr::Function { args, .. } => args.first(),
        Expr::In { .. } | Expr::Logical { .. } | Expr::Not(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Tree kinds
// ---------------------------------------------------------------------------

impl Compile for Condition {
    fn compile(&self, compiler: &mut Compiler<'_>, out: &mut String) -> ExpressionResult<()> {
        compiler.write_expr(self.expr(), out)
    }
}

impl Compile for KeyCondition {
    fn compile(&self, compiler: &mut Compiler<'_>, out: &mut String) -> ExpressionResult<()> {
        if let Expr::Logical { left, right, .. } = self.expr() {
            if key_operand(left).is_some() && key_operand(left) == key_operand(right) {
                return Err(ExpressionError::invalid_parameter(
                    "partition key and sort key conditions must name different attributes",
                ));
            }
        }
        compiler.write_expr(self.expr(), out)
    }
}

impl Compile for Projection {
    fn compile(&self, compiler: &mut Compiler<'_>, out: &mut String) -> ExpressionResult<()> {
        compiler.write_projection(self.names(), out)
    }
}

impl Compile for Update {
    fn compile(&self, compiler: &mut Compiler<'_>, out: &mut String) -> ExpressionResult<()> {
        compiler.write_update(self.expr(), out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::condition::{Comparable, not};
    use crate::expression::key_condition::key;
    use crate::expression::operand::{name, value};
    use crate::expression::update::{if_not_exists, list_append, plus, set};

    fn compile_one(tree: &impl Compile) -> ExpressionResult<String> {
        let config = ExpressionConfig::default();
        let mut compiler = Compiler::new(&config);
        compiler.compile(ExpressionKind::Condition, tree)
    }

    #[test]
    fn test_should_compile_nested_paths_per_segment() {
        let cond = name("info.ratings[2].score").greater_than(value(5));
        assert_eq!(compile_one(&cond).unwrap(), "#0.#1[2].#2 > :0");
    }

    #[test]
    fn test_should_flatten_same_operator_chains() {
        let cond = name("a")
            .equal(value(1))
            .and(name("b").equal(value(2)))
            .and(name("c").equal(value(3)));
        assert_eq!(
            compile_one(&cond).unwrap(),
            "#0 = :0 AND #1 = :1 AND #2 = :2"
        );
    }

    #[test]
    fn test_should_parenthesize_mixed_operators() {
        let cond = name("a")
            .equal(value(1))
            .or(name("b").equal(value(2)))
            .and(name("c").equal(value(3)).or(name("d").equal(value(4))));
        assert_eq!(
            compile_one(&cond).unwrap(),
            "(#0 = :0 OR #1 = :1) AND (#2 = :2 OR #3 = :3)"
        );

        let cond = name("a")
            .equal(value(1))
            .and(name("b").equal(value(2)))
            .or(name("c").equal(value(3)));
        assert_eq!(
            compile_one(&cond).unwrap(),
            "(#0 = :0 AND #1 = :1) OR #2 = :2"
        );
    }

    #[test]
    fn test_should_parenthesize_not() {
        let cond = not(name("a").equal(value(1)).or(name("b").attribute_exists()));
        assert_eq!(
            compile_one(&cond).unwrap(),
            "NOT (#0 = :0 OR attribute_exists(#1))"
        );
    }

    #[test]
    fn test_should_compile_between_in_and_size() {
        let cond = name("tags")
            .size()
            .between(value(1), value(10))
            .and(name("status").in_list([value("a"), value("b"), value("a")]));
        assert_eq!(
            compile_one(&cond).unwrap(),
            "size(#0) BETWEEN :0 AND :1 AND #1 IN (:2, :3, :2)"
        );
    }

    #[test]
    fn test_should_reject_empty_in_list() {
        let cond = name("status").in_list(Vec::<Operand>::new());
        assert!(compile_one(&cond).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_should_reject_oversized_in_list() {
        let cond = name("id").in_list((0..101).map(value));
        assert!(compile_one(&cond).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_should_alias_list_literals_as_one_value() {
        let cond = name("pair").equal(Operand::list([value(1), value("x")]));
        assert_eq!(compile_one(&cond).unwrap(), "#0 = :0");

        let cond = name("pair").equal(Operand::list([Operand::from(name("other"))]));
        assert!(compile_one(&cond).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_should_report_malformed_names() {
        let cond = name("a[x]").attribute_exists();
        assert!(compile_one(&cond).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_should_compile_key_condition() {
        let cond = key("pk")
            .equal(value("p"))
            .and(key("sk").between(value(1), value(9)));
        assert_eq!(
            compile_one(&cond).unwrap(),
            "#0 = :0 AND #1 BETWEEN :1 AND :2"
        );
    }

    #[test]
    fn test_should_reject_key_condition_on_one_attribute() {
        let cond = key("pk").equal(value("p")).and(key("pk").begins_with("x"));
        assert!(compile_one(&cond).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_should_compile_update_clauses_in_fixed_order() {
        let update = set(name("a"), value(1))
            .delete(name("d"), value(AttributeValue::string_set(["x"])))
            .add(name("c"), value(2))
            .remove(name("b"))
            .set(name("e"), name("a"))
            .remove(name("f[0]"));
        assert_eq!(
            compile_one(&update).unwrap(),
            "SET #0 = :0, #1 = #0 REMOVE #2, #3[0] ADD #4 :1 DELETE #5 :2"
        );
    }

    #[test]
    fn test_should_compile_set_functions() {
        let counter = plus(if_not_exists(name("count"), value(0)), value(1));
        let appended = list_append(name("list"), value(vec![AttributeValue::from("x")]));
        let update = set(name("count"), counter).set(name("list"), appended);
        assert_eq!(
            compile_one(&update).unwrap(),
            "SET #0 = if_not_exists(#0, :0) + :1, #1 = list_append(#1, :2)"
        );
    }

    #[test]
    fn test_should_reject_illegal_update_values() {
        let nested = set(name("a"), plus(plus(name("a"), value(1)), value(2)));
        assert!(compile_one(&nested).unwrap_err().is_invalid_parameter());

        let sized = set(name("a"), name("b").size());
        assert!(compile_one(&sized).unwrap_err().is_invalid_parameter());

        let add_string = crate::expression::update::add(name("a"), value("x"));
        assert!(compile_one(&add_string).unwrap_err().is_invalid_parameter());

        let delete_number = crate::expression::update::delete(name("a"), value(1));
        assert!(compile_one(&delete_number).unwrap_err().is_invalid_parameter());

        assert!(compile_one(&Update::new()).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_should_list_duplicate_projection_paths_once() {
        let projection =
            Projection::new([name("a"), name("b.c"), name("a"), name("b.c"), name("c")]);
        assert_eq!(compile_one(&projection).unwrap(), "#0, #1.#2, #2");
    }

    #[test]
    fn test_should_reject_empty_projection() {
        let err = compile_one(&Projection::default()).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_should_enforce_expression_length_limit() {
        let config = ExpressionConfig {
            max_expression_length: 8,
            ..ExpressionConfig::default()
        };
        let mut compiler = Compiler::new(&config);
        let short = name("a").equal(value(1));
        assert_eq!(
            compiler.compile(ExpressionKind::Filter, &short).unwrap(),
            "#0 = :0"
        );
        let long = short.clone().and(short);
        assert!(
            compiler
                .compile(ExpressionKind::Filter, &long)
                .unwrap_err()
                .is_invalid_parameter()
        );
    }
}

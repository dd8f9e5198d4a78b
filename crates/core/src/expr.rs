//! Expression evaluator for default values and enum entry values.
//!
//! Evaluation is a pure recursive dispatch over [`Expr`]. Variables are
//! looked up in a [`Context`], a map of bindings whose values may
//! themselves be nested contexts (composite variables). Scoping uses two
//! operations only: a child scope starts as a `clone` of its own bindings
//! and `enhance`s itself with outer bindings it does not already have.

use crate::ast::{BinaryOp, ElementId, ElementKind, Expr, SourceGraph};
use mml_interchange::{format_number, DefaultValue, Resolution, Unresolved};
use std::collections::BTreeMap;
use std::fmt;

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Bool(b) => DefaultValue::Bool(b),
            Value::Number(n) => DefaultValue::Number(n),
            Value::Str(s) => DefaultValue::Str(s),
        }
    }
}

// ──────────────────────────────────────────────
// Contexts
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Value(Value),
    Scope(Context),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Bound,
}

/// Variable bindings keyed by the declaring variable element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    bindings: BTreeMap<ElementId, Binding>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, variable: ElementId, name: impl Into<String>, value: Value) {
        self.bindings.insert(
            variable,
            Binding {
                name: name.into(),
                value: Bound::Value(value),
            },
        );
    }

    pub fn bind_scope(&mut self, variable: ElementId, name: impl Into<String>, scope: Context) {
        self.bindings.insert(
            variable,
            Binding {
                name: name.into(),
                value: Bound::Scope(scope),
            },
        );
    }

    pub fn get(&self, variable: ElementId) -> Option<&Binding> {
        self.bindings.get(&variable)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Adds every outer binding this context does not already bind.
    pub fn enhance(&mut self, outer: &Context) {
        for (variable, binding) in &outer.bindings {
            self.bindings
                .entry(*variable)
                .or_insert_with(|| binding.clone());
        }
    }

    /// Looks up a dotted path such as `t.inner.x`.
    ///
    /// Every segment but the last must name a binding that holds a nested
    /// context; the last must name a plain value.
    pub fn lookup_path(&self, path: &str) -> Option<&Value> {
        match path.split_once('.') {
            Some((head, rest)) => self.bindings.values().find_map(|b| match &b.value {
                Bound::Scope(scope) if b.name == head => scope.lookup_path(rest),
                _ => None,
            }),
            None => self.bindings.values().find_map(|b| match &b.value {
                Bound::Value(v) if b.name == path => Some(v),
                _ => None,
            }),
        }
    }
}

// ──────────────────────────────────────────────
// Evaluation
// ──────────────────────────────────────────────

/// Evaluate `expr` against `ctx`.
///
/// `graph` is consulted for enum entries, whose value may itself be an
/// expression.
pub fn evaluate(expr: &Expr, graph: &SourceGraph, ctx: &Context) -> Resolution<Value> {
    match expr {
        Expr::Bool(b) => Resolution::Resolved(Value::Bool(*b)),
        Expr::Number(n) => Resolution::Resolved(Value::Number(*n)),
        Expr::Str(s) => Resolution::Resolved(Value::Str(s.clone())),

        Expr::Variable(var) => {
            let bound = var
                .target
                .and_then(|t| ctx.get(t))
                .and_then(|b| match &b.value {
                    Bound::Value(v) => Some(v.clone()),
                    Bound::Scope(_) => None,
                });
            match bound {
                Some(v) => Resolution::Resolved(v),
                None => Resolution::Unresolved(Unresolved::UnboundVariable {
                    name: var.text.clone(),
                }),
            }
        }

        Expr::QualifiedVariable(path) => match ctx.lookup_path(path) {
            Some(v) => Resolution::Resolved(v.clone()),
            None => Resolution::Unresolved(Unresolved::UnboundVariable { name: path.clone() }),
        },

        Expr::EnumValue(entry_ref) => {
            let entry = entry_ref
                .target
                .and_then(|t| graph.element(t))
                .and_then(|el| match &el.kind {
                    ElementKind::EnumEntry(e) => Some(e),
                    _ => None,
                });
            match entry {
                Some(e) => match &e.value {
                    Some(value) => evaluate(value, graph, ctx),
                    None => Resolution::Resolved(Value::Str(e.name.clone())),
                },
                None => Resolution::Unresolved(Unresolved::DanglingReference {
                    text: entry_ref.text.clone(),
                }),
            }
        }

        Expr::Binary { op, left, right } => {
            let l = evaluate(left, graph, ctx);
            let r = evaluate(right, graph, ctx);
            match (l, r) {
                (Resolution::Resolved(l), Resolution::Resolved(r)) => apply(*op, l, r),
                (Resolution::Unresolved(u), _) | (_, Resolution::Unresolved(u)) => {
                    Resolution::Unresolved(Unresolved::Unevaluable {
                        reason: format!("operand of '{}' is unresolved: {}", op.symbol(), u),
                    })
                }
            }
        }
    }
}

/// Applies `op` to two evaluated operands.
///
/// Supported combinations: `+` on any mix of numbers and strings, `*` on
/// two numbers or a string and a number (repetition), and `-`, `/`, `%`,
/// `^` on two numbers. Booleans are never valid operands.
fn apply(op: BinaryOp, left: Value, right: Value) -> Resolution<Value> {
    use Value::{Number, Str};

    let result = match (op, &left, &right) {
        (BinaryOp::Add, Number(a), Number(b)) => Some(Number(a + b)),
        (BinaryOp::Add, Str(a), Number(b)) => Some(Str(format!("{}{}", a, format_number(*b)))),
        (BinaryOp::Add, Number(a), Str(b)) => Some(Str(format!("{}{}", format_number(*a), b))),
        (BinaryOp::Add, Str(a), Str(b)) => Some(Str(format!("{}{}", a, b))),

        (BinaryOp::Mul, Number(a), Number(b)) => Some(Number(a * b)),
        (BinaryOp::Mul, Str(s), Number(n)) | (BinaryOp::Mul, Number(n), Str(s)) => {
            repeat(s, *n).map(Str)
        }

        (BinaryOp::Sub, Number(a), Number(b)) => Some(Number(a - b)),
        (BinaryOp::Rem, Number(a), Number(b)) => Some(Number(a % b)),
        (BinaryOp::Pow, Number(a), Number(b)) => Some(Number(a.powf(*b))),
        (BinaryOp::Div, Number(a), Number(b)) => Some(Number(a / b)),

        _ => None,
    };

    match result {
        Some(v) => Resolution::Resolved(v),
        None => Resolution::Unresolved(Unresolved::Unevaluable {
            reason: format!(
                "{} {} {}",
                left.type_name(),
                op.symbol(),
                right.type_name()
            ),
        }),
    }
}

/// Upper bound, in bytes, on the result of a string repetition.
const MAX_REPEAT_LEN: usize = 1 << 24;

fn repeat(s: &str, count: f64) -> Option<String> {
    if count < 0.0 || count.fract() != 0.0 || !count.is_finite() {
        return None;
    }
    if count > MAX_REPEAT_LEN as f64 {
        return None;
    }
    let count = count as usize;
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_LEN => Some(s.repeat(count)),
        _ => None,
    }
}

//! Field and value comparison rules.
//!
//! Field rules read values through a lookup callback:
//!
//! - `!id` holds when `id` is absent
//! - `id=1` holds when `id` loosely equals `1`
//! - `id!=1` / `id<>1` hold when `id` is present and not loosely equal to `1`
//! - `id` holds when `id` is present
//!
//! Value rules compare a single value strictly: `foo` requires the string
//! `foo`, `!foo` rejects it.

use crate::core::{ErrorContext, Result};
use crate::rules::value::{Value, parse_numeric};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static COMPARISON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^!<=]+)(!=|<>|=)(.+)").expect("comparison regex is valid"));

/// Comparison operator of a field rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
}

/// A field rule after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule<'a> {
    /// `!field`
    Absent(&'a str),
    /// `field=literal`, `field!=literal`, `field<>literal`
    Compare {
        field: &'a str,
        operator: Operator,
        literal: &'a str,
    },
    /// `field`
    Present(&'a str),
}

impl<'a> FieldRule<'a> {
    pub fn parse(rule: &'a str) -> Self {
        if let Some(field) = rule.strip_prefix('!') {
            return FieldRule::Absent(field);
        }
        if let Some(caps) = COMPARISON.captures(rule) {
            if let (Some(field), Some(op), Some(literal)) = (caps.get(1), caps.get(2), caps.get(3)) {
                let operator = if op.as_str() == "=" {
                    Operator::Equal
                } else {
                    Operator::NotEqual
                };
                return FieldRule::Compare {
                    field: field.as_str(),
                    operator,
                    literal: literal.as_str(),
                };
            }
        }
        FieldRule::Present(rule)
    }

    pub fn evaluate<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<Value>,
    {
        match *self {
            FieldRule::Absent(field) => lookup(field).is_none(),
            FieldRule::Compare {
                field,
                operator: Operator::Equal,
                literal,
            } => lookup(field).is_some_and(|v| v.loose_eq_str(literal)),
            FieldRule::Compare {
                field,
                operator: Operator::NotEqual,
                literal,
            } => lookup(field).is_some_and(|v| !v.loose_eq_str(literal)),
            FieldRule::Present(field) => lookup(field).is_some(),
        }
    }
}

/// Evaluate one field rule against the lookup
pub fn evaluate_field_rule<F>(rule: &str, lookup: F) -> bool
where
    F: Fn(&str) -> Option<Value>,
{
    let parsed = FieldRule::parse(rule);
    let result = parsed.evaluate(lookup);
    debug!(rule, ?parsed, result, "field rule evaluated");
    result
}

/// Key of a rule set entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKey {
    /// Index of the entry within its set
    Position(usize),
    /// The entry value is a raw regex applied to this field
    Field(String),
}

impl RuleKey {
    /// Any numeric string (`7`, `-1`, `1.5`, `1e2`) is positional, anything
    /// else names a field
    pub fn from_key(key: &str, index: usize) -> Self {
        match parse_numeric(key) {
            Some(_) => RuleKey::Position(index),
            None => RuleKey::Field(key.to_string()),
        }
    }
}

/// An ordered collection of field rules combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRuleSet {
    entries: Vec<(RuleKey, String)>,
}

impl FieldRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, rule)` pairs as read from configuration
    pub fn from_keyed<I, K, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: AsRef<str>,
        R: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .enumerate()
                .map(|(index, (k, r))| (RuleKey::from_key(k.as_ref(), index), r.into()))
                .collect(),
        }
    }

    /// Append a grammar rule at the next position
    pub fn rule<R: Into<String>>(mut self, rule: R) -> Self {
        let position = self.entries.len();
        self.entries.push((RuleKey::Position(position), rule.into()));
        self
    }

    /// Append a raw pattern that the named field must fully match
    pub fn named<K: Into<String>, P: Into<String>>(mut self, field: K, pattern: P) -> Self {
        self.entries.push((RuleKey::Field(field.into()), pattern.into()));
        self
    }

    pub fn entries(&self) -> &[(RuleKey, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&str> for FieldRuleSet {
    fn from(rule: &str) -> Self {
        Self::new().rule(rule)
    }
}

impl From<String> for FieldRuleSet {
    fn from(rule: String) -> Self {
        Self::new().rule(rule)
    }
}

impl<S: Into<String>> From<Vec<S>> for FieldRuleSet {
    fn from(rules: Vec<S>) -> Self {
        rules.into_iter().fold(Self::new(), FieldRuleSet::rule)
    }
}

fn named_pattern_matches(field: &str, pattern: &str, value: Option<Value>) -> Result<bool> {
    let regex = Regex::new(&format!("^{}$", pattern)).context_pattern(pattern)?;
    let result = value.is_some_and(|v| regex.is_match(&v.to_string()));
    debug!(field, pattern, result, "named pattern evaluated");
    Ok(result)
}

/// Evaluate every entry of the set, stopping at the first failure.
///
/// Fails only when a named entry carries an invalid regex.
pub fn evaluate_field_rule_set<F>(rules: &FieldRuleSet, lookup: F) -> Result<bool>
where
    F: Fn(&str) -> Option<Value>,
{
    for (key, rule) in &rules.entries {
        let satisfied = match key {
            RuleKey::Position(_) => evaluate_field_rule(rule, &lookup),
            RuleKey::Field(field) => named_pattern_matches(field, rule, lookup(field))?,
        };
        if !satisfied {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluate one value rule with strict equality
pub fn evaluate_value_rule(rule: &str, value: &Value) -> bool {
    let result = match rule.strip_prefix('!') {
        Some(rest) => !value.strict_eq_str(rest),
        None => value.strict_eq_str(rule),
    };
    debug!(rule, value = %value, result, "value rule evaluated");
    result
}

/// AND over value rules applied to the same value
pub fn evaluate_value_rule_set<I>(rules: I, value: &Value) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    rules
        .into_iter()
        .all(|rule| evaluate_value_rule(rule.as_ref(), value))
}

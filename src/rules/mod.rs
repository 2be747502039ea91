pub mod compare;
pub mod dot_path;
pub mod value;
pub mod wildcard;

pub use compare::{
    FieldRule, FieldRuleSet, Operator, RuleKey, evaluate_field_rule, evaluate_field_rule_set,
    evaluate_value_rule, evaluate_value_rule_set,
};
pub use dot_path::split_dot_path;
pub use value::Value;
pub use wildcard::{
    SelectorSet, WildcardPattern, class_part, compile, matches, matches_class,
    matches_class_method,
};

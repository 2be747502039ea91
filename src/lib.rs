//! Selector and rule matching for class, method and field selectors.
//!
//! ```
//! use selrule::rules::{Value, evaluate_field_rule, matches_class_method};
//!
//! assert!(matches_class_method("App\\*::get*", "App\\Foo", "getName").unwrap());
//! assert!(evaluate_field_rule("id=1", |_| Some(Value::Int(1))));
//! ```

pub mod core;
pub mod io;
pub mod rules;
pub mod services;

pub use crate::core::{Config, Result, SelruleError};

//! Property default lookup used to feed field rules.
//!
//! A `DefaultValueResolver` answers "default value of property P on class X"
//! for types it can introspect. Bean names are not loadable types; the
//! `BeanRegistry` maps them to their class first. `PropertyResolver` consults
//! injected values before either.

use crate::rules::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A source of default property values
pub trait DefaultValueResolver: Send + Sync {
    /// Whether this backend can answer for `identifier` at all
    fn is_loadable(&self, identifier: &str) -> bool;

    /// Default value of `property`, `None` if absent
    fn default_value(&self, identifier: &str, property: &str) -> Option<Value>;

    /// Get a human-readable description of this backend
    fn description(&self) -> &'static str;
}

/// Defaults keyed by property name
pub type PropertyDefaults = HashMap<String, Value>;

fn collect_defaults<I, K, V>(defaults: I) -> PropertyDefaults
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    defaults
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Native type introspection: class name to declared property defaults
#[derive(Debug, Clone, Default)]
pub struct TypeIntrospector {
    types: HashMap<String, PropertyDefaults>,
}

impl TypeIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type<C, I, K, V>(mut self, class_name: C, defaults: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.types
            .insert(class_name.into(), collect_defaults(defaults));
        self
    }
}

impl DefaultValueResolver for TypeIntrospector {
    fn is_loadable(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier)
    }

    fn default_value(&self, identifier: &str, property: &str) -> Option<Value> {
        self.types.get(identifier)?.get(property).cloned()
    }

    fn description(&self) -> &'static str {
        "Native type introspection"
    }
}

/// Bean name to class name, parsed from metadata once at startup
#[derive(Debug, Clone, Default)]
pub struct BeanRegistry {
    beans: HashMap<String, String>,
}

impl BeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bean<B: Into<String>, C: Into<String>>(mut self, bean_name: B, class_name: C) -> Self {
        self.beans.insert(bean_name.into(), class_name.into());
        self
    }

    /// Class backing a bean name
    pub fn class_name(&self, bean_name: &str) -> Option<&str> {
        self.beans.get(bean_name).map(String::as_str)
    }
}

/// Values injected into beans at runtime, keyed by identifier and property
#[derive(Debug, Clone, Default)]
pub struct InjectedValues {
    values: HashMap<(String, String), Value>,
}

impl InjectedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value<C, P, V>(mut self, identifier: C, property: P, value: V) -> Self
    where
        C: Into<String>,
        P: Into<String>,
        V: Into<Value>,
    {
        self.values
            .insert((identifier.into(), property.into()), value.into());
        self
    }

    pub fn get(&self, identifier: &str, property: &str) -> Option<&Value> {
        self.values
            .get(&(identifier.to_string(), property.to_string()))
    }
}

/// Resolves property values for a class name or a bean name
#[derive(Clone)]
pub struct PropertyResolver {
    native: Arc<dyn DefaultValueResolver>,
    beans: Arc<BeanRegistry>,
    injected: InjectedValues,
}

impl PropertyResolver {
    pub fn new(native: Arc<dyn DefaultValueResolver>, beans: Arc<BeanRegistry>) -> Self {
        Self {
            native,
            beans,
            injected: InjectedValues::new(),
        }
    }

    pub fn with_injected(mut self, injected: InjectedValues) -> Self {
        self.injected = injected;
        self
    }

    /// Injected value first, then the type's default. An identifier that is
    /// not a loadable type is treated as a bean name and mapped to its class.
    /// Unknown identifiers resolve to `None`.
    pub fn class_property_value(&self, identifier: &str, property: &str) -> Option<Value> {
        if let Some(value) = self.injected.get(identifier, property) {
            return Some(value.clone());
        }

        let class_name = if self.native.is_loadable(identifier) {
            identifier
        } else {
            self.beans.class_name(identifier)?
        };
        let value = self.native.default_value(class_name, property);
        debug!(
            identifier,
            class_name,
            property,
            backend = self.native.description(),
            found = value.is_some(),
            "resolved property default"
        );
        value
    }

    /// A lookup callback over one identifier's properties
    pub fn field_lookup<'a>(&'a self, identifier: &'a str) -> impl Fn(&str) -> Option<Value> + 'a {
        move |property: &str| self.class_property_value(identifier, property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FieldRuleSet, evaluate_field_rule, evaluate_field_rule_set};

    fn resolver() -> PropertyResolver {
        let native = TypeIntrospector::new().with_type(
            "App\\Model\\User",
            [("status", Value::from("active")), ("level", Value::Int(1))],
        );
        let native = native.with_type("App\\Cache\\UserCache", [("ttl", Value::Int(60))]);
        let beans = BeanRegistry::new()
            .with_bean("UserCache", "App\\Cache\\UserCache")
            .with_bean("Orphan", "App\\Missing\\Orphan");
        PropertyResolver::new(Arc::new(native), Arc::new(beans))
    }

    #[test]
    fn test_native_type_defaults() {
        let resolver = resolver();
        assert_eq!(
            resolver.class_property_value("App\\Model\\User", "status"),
            Some(Value::from("active"))
        );
        assert_eq!(resolver.class_property_value("App\\Model\\User", "missing"), None);
    }

    #[test]
    fn test_bean_name_resolves_through_its_class() {
        let resolver = resolver();
        assert_eq!(
            resolver.class_property_value("UserCache", "ttl"),
            Some(Value::Int(60))
        );
        assert_eq!(resolver.class_property_value("UserCache", "size"), None);
        assert_eq!(resolver.class_property_value("Unknown", "ttl"), None);
        // registered bean whose class is not loadable
        assert_eq!(resolver.class_property_value("Orphan", "ttl"), None);
    }

    #[test]
    fn test_injected_values_win() {
        let resolver = resolver()
            .with_injected(InjectedValues::new().with_value("App\\Model\\User", "level", 5i64));
        assert_eq!(
            resolver.class_property_value("App\\Model\\User", "level"),
            Some(Value::Int(5))
        );
    }

    #[test]
    fn test_bean_registry_class_name() {
        let registry = BeanRegistry::new().with_bean("Mailer", "App\\Mail\\Mailer");
        assert_eq!(registry.class_name("Mailer"), Some("App\\Mail\\Mailer"));
        assert_eq!(registry.class_name("Nope"), None);
    }

    #[test]
    fn test_lookup_feeds_rules() {
        let resolver = resolver();
        let user = resolver.field_lookup("App\\Model\\User");
        assert!(evaluate_field_rule("level=1", &user));
        assert!(evaluate_field_rule("!deleted", &user));

        let rules = FieldRuleSet::from(vec!["status!=banned", "level"]).named("status", "act.*");
        assert!(evaluate_field_rule_set(&rules, &user).unwrap());

        let cache = resolver.field_lookup("UserCache");
        assert!(evaluate_field_rule("ttl=60", cache));
    }
}

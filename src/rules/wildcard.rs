use crate::core::{ErrorContext, Result, SelruleError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::trace;

/// Separator between the class and method halves of a selector
pub const CLASS_METHOD_SEPARATOR: &str = "::";

/// Selectors come from configuration, so the distinct set is small. Past this
/// many entries new patterns are compiled but no longer cached.
pub const PATTERN_CACHE_LIMIT: usize = 1024;

static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// A selector compiled into an anchored regex
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    selector: String,
    regex: Regex,
}

impl WildcardPattern {
    /// The selector this pattern was compiled from
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The generated regex source
    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }

    /// True iff the whole candidate matches
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Convert a selector into regex source. `*` is the only wildcard.
pub fn wildcard_to_regex(selector: &str) -> String {
    let body = selector
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!("^{}$", body)
}

/// Compile a selector into an anchored pattern, reusing cached regexes
pub fn compile(selector: &str) -> Result<WildcardPattern> {
    if let Ok(cache) = PATTERN_CACHE.read() {
        if let Some(regex) = cache.get(selector) {
            return Ok(WildcardPattern {
                selector: selector.to_string(),
                regex: regex.clone(),
            });
        }
    }

    let source = wildcard_to_regex(selector);
    let regex = Regex::new(&source).context_pattern(selector)?;
    trace!(selector, regex = %source, "compiled selector");

    if let Ok(mut cache) = PATTERN_CACHE.write() {
        if cache.len() < PATTERN_CACHE_LIMIT {
            cache.insert(selector.to_string(), regex.clone());
        }
    }

    Ok(WildcardPattern {
        selector: selector.to_string(),
        regex,
    })
}

/// Check whether `candidate` fully matches `selector`
pub fn matches(selector: &str, candidate: &str) -> Result<bool> {
    Ok(compile(selector)?.is_match(candidate))
}

/// Split a `Class::Method` selector on its first separator
pub fn split_class_method(selector: &str) -> Result<(&str, &str)> {
    selector.split_once(CLASS_METHOD_SEPARATOR).ok_or_else(|| {
        SelruleError::invalid_selector(selector, "missing '::' between class and method")
    })
}

/// Class half of a selector; a selector without `::` is all class
pub fn class_part(selector: &str) -> &str {
    selector
        .split_once(CLASS_METHOD_SEPARATOR)
        .map_or(selector, |(class_rule, _)| class_rule)
}

/// Both halves of a `Class::Method` selector must match
pub fn matches_class_method(selector: &str, class_name: &str, method_name: &str) -> Result<bool> {
    let (class_rule, method_rule) = split_class_method(selector)?;
    Ok(matches(class_rule, class_name)? && matches(method_rule, method_name)?)
}

/// Only the class half is checked
pub fn matches_class(selector: &str, class_name: &str) -> Result<bool> {
    matches(class_part(selector), class_name)
}

/// A list of selectors compiled up front, matched as a union
#[derive(Debug, Clone, Default)]
pub struct SelectorSet {
    compiled: Vec<WildcardPattern>,
}

impl SelectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selectors(selectors: &[String]) -> Result<Self> {
        let compiled = selectors
            .iter()
            .map(|s| compile(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { compiled })
    }

    /// Compile only the class half of each selector
    pub fn with_class_selectors(selectors: &[String]) -> Result<Self> {
        let compiled = selectors
            .iter()
            .map(|s| compile(class_part(s)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { compiled })
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// First selector matching the candidate, if any
    pub fn first_match(&self, candidate: &str) -> Option<&str> {
        self.compiled
            .iter()
            .find(|p| p.is_match(candidate))
            .map(WildcardPattern::selector)
    }

    pub fn matches_any(&self, candidate: &str) -> bool {
        self.first_match(candidate).is_some()
    }
}

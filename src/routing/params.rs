//! Path parameters bound during dispatch.
//!
//! # Responsibilities
//! - Hold the `{name} -> value` bindings accumulated down the router tree
//! - Merge fresh bindings into a new map for each recursive branch
//! - Typed and validated read access for terminal handlers
//!
//! # Design Decisions
//! - Merging never mutates: a sibling explored after a failed branch must not
//!   see the discarded branch's bindings
//! - Missing, unparsable or invalid values read as `None`

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

static MD5_HASH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]{32}$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Parameter bindings visible to a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: HashMap<String, String>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.values.insert(name, value);
    }

    /// Raw value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value bound to `name`, parsed as `T`.
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    /// Value bound to `name` if it satisfies `rule`.
    pub fn get_validated(&self, name: &str, rule: &ParamRule) -> Option<&str> {
        self.get(name).filter(|v| rule.accepts(v))
    }

    /// A new map with every binding of `self` plus `fresh`; `fresh` wins on
    /// collisions.
    pub fn merged(&self, fresh: &PathParams) -> PathParams {
        let mut values = self.values.clone();
        values.extend(
            fresh
                .values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        PathParams { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for PathParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Validation rule for a parameter value.
///
/// The whole value must match; rules are anchored on construction.
#[derive(Debug, Clone)]
pub struct ParamRule {
    regex: Regex,
}

impl ParamRule {
    /// Rule from a user regex, e.g. `[0-9]+`.
    pub fn matching(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&format!("^(?:{})$", pattern))?,
        })
    }

    /// 32 lowercase hex-ish characters.
    pub fn md5_hash() -> Self {
        Self {
            regex: MD5_HASH_REGEX.clone(),
        }
    }

    /// Hyphenated UUID, any case.
    pub fn uuid() -> Self {
        Self {
            regex: UUID_REGEX.clone(),
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

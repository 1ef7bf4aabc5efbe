//! Block identities, concrete block states and state predicates
//!
//! A [`BlockIdentity`] is the type of a block (`minecraft:oak_log`). A
//! [`BlockState`] is what the world actually holds at a position: an identity
//! plus its variant properties (`axis=y`). A [`StatePredicate`] is the
//! configured filter over those properties.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::block_cache;
use super::NamespacedKey;
use crate::config::{ConfigError, ConfigResult};

/// Interned identity of a block type
///
/// Equality and hashing are structural on the namespaced key; interning only
/// guarantees each key is materialized once per process (see
/// [`block_cache`]).
#[derive(Clone)]
pub struct BlockIdentity(Arc<NamespacedKey>);

impl BlockIdentity {
    /// Interned identity for `key`
    pub fn of(key: NamespacedKey) -> Self {
        block_cache::intern(key)
    }

    /// Parse and intern a `namespace:name` block key
    pub fn parse(input: &str) -> ConfigResult<Self> {
        NamespacedKey::parse(input).map(Self::of)
    }

    /// Build an identity outside the cache. Only the cache itself does this.
    pub(super) fn uncached(key: NamespacedKey) -> Self {
        Self(Arc::new(key))
    }

    pub fn key(&self) -> &NamespacedKey {
        &self.0
    }

    pub fn namespace(&self) -> &str {
        self.0.namespace()
    }

    pub fn name(&self) -> &str {
        self.0.key()
    }
}

impl PartialEq for BlockIdentity {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for BlockIdentity {}

impl Hash for BlockIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for BlockIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockIdentity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for BlockIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockIdentity({})", self.0)
    }
}

impl fmt::Display for BlockIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete block as read from the world: identity plus variant properties
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockState {
    identity: BlockIdentity,
    properties: BTreeMap<String, String>,
}

impl BlockState {
    /// State with no variant properties
    pub fn new(identity: BlockIdentity) -> Self {
        Self {
            identity,
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties
            .insert(name.to_ascii_lowercase(), value.to_ascii_lowercase());
        self
    }

    /// Parse `namespace:name[prop=value,...]`
    pub fn parse(input: &str) -> ConfigResult<Self> {
        let (key, properties) = split_selector(input)?;
        let identity = BlockIdentity::parse(key)?;
        let properties = match properties {
            Some(body) => parse_properties(input, body)?,
            None => BTreeMap::new(),
        };
        Ok(Self {
            identity,
            properties,
        })
    }

    pub fn identity(&self) -> &BlockIdentity {
        &self.identity
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)?;
        write_properties(f, &self.properties)
    }
}

/// Required property values a block state must carry to match a list entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatePredicate {
    requirements: BTreeMap<String, String>,
}

impl StatePredicate {
    /// Parse the body of a selector, with or without the surrounding brackets
    ///
    /// Returns `Ok(None)` for an empty body (`""` or `"[]"`): an empty
    /// predicate would match every state, which is the same as no predicate.
    pub fn parse(selector: &str) -> ConfigResult<Option<Self>> {
        let trimmed = selector.trim();
        let body = match (trimmed.strip_prefix('['), trimmed.strip_suffix(']')) {
            (Some(_), Some(_)) => &trimmed[1..trimmed.len() - 1],
            (None, None) => trimmed,
            _ => {
                return Err(ConfigError::InvalidStatePredicate {
                    input: selector.to_string(),
                    reason: "unbalanced brackets".to_string(),
                })
            }
        };

        let requirements = parse_properties(selector, body)?;
        if requirements.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self { requirements }))
        }
    }

    /// True if every required property is present on `state` with the same value
    pub fn matches(&self, state: &BlockState) -> bool {
        self.requirements
            .iter()
            .all(|(name, value)| state.property(name) == Some(value.as_str()))
    }

    pub fn requirements(&self) -> &BTreeMap<String, String> {
        &self.requirements
    }
}

impl fmt::Display for StatePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_properties(f, &self.requirements)
    }
}

/// Parse a block list entry such as `minecraft:oak_log[axis=y]`
pub fn parse_block_selector(input: &str) -> ConfigResult<(BlockIdentity, Option<StatePredicate>)> {
    let (key, properties) = split_selector(input)?;
    let identity = BlockIdentity::parse(key).map_err(|e| ConfigError::InvalidBlockEntry {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    let predicate = match properties {
        Some(body) => StatePredicate::parse(body)?,
        None => None,
    };
    Ok((identity, predicate))
}

/// Split `key[body]` into `key` and `body`
fn split_selector(input: &str) -> ConfigResult<(&str, Option<&str>)> {
    let trimmed = input.trim();
    match trimmed.find('[') {
        None => {
            if trimmed.contains(']') {
                return Err(ConfigError::InvalidBlockEntry {
                    input: input.to_string(),
                    reason: "']' without matching '['".to_string(),
                });
            }
            Ok((trimmed, None))
        }
        Some(open) => {
            if !trimmed.ends_with(']') {
                return Err(ConfigError::InvalidStatePredicate {
                    input: input.to_string(),
                    reason: "unterminated '['".to_string(),
                });
            }
            let body = &trimmed[open + 1..trimmed.len() - 1];
            if body.contains('[') || body.contains(']') {
                return Err(ConfigError::InvalidStatePredicate {
                    input: input.to_string(),
                    reason: "nested brackets".to_string(),
                });
            }
            Ok((&trimmed[..open], Some(body)))
        }
    }
}

fn parse_properties(input: &str, body: &str) -> ConfigResult<BTreeMap<String, String>> {
    let mut properties = BTreeMap::new();
    if body.trim().is_empty() {
        return Ok(properties);
    }

    for pair in body.split(',') {
        let invalid = |reason: String| ConfigError::InvalidStatePredicate {
            input: input.to_string(),
            reason,
        };

        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| invalid(format!("'{}' is missing '='", pair.trim())))?;
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();

        if name.is_empty() {
            return Err(invalid(format!("empty property name in '{}'", pair.trim())));
        }
        if value.is_empty() {
            return Err(invalid(format!("empty value for property '{}'", name)));
        }

        if let Some(previous) = properties.get(&name) {
            if *previous != value {
                return Err(invalid(format!(
                    "property '{}' given conflicting values '{}' and '{}'",
                    name, previous, value
                )));
            }
        }
        properties.insert(name, value);
    }

    Ok(properties)
}

fn write_properties(f: &mut fmt::Formatter<'_>, properties: &BTreeMap<String, String>) -> fmt::Result {
    if properties.is_empty() {
        return Ok(());
    }
    write!(f, "[")?;
    for (i, (name, value)) in properties.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}={}", name, value)?;
    }
    write!(f, "]")
}

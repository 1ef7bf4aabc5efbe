use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{ConfigError, ConfigResult};
use crate::constants::keys::DEFAULT_NAMESPACE;

/// A `namespace:key` pair identifying a block, an item or a pattern
///
/// Both halves are stored lowercase. The namespace may contain `[a-z0-9_.-]`,
/// the key additionally `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamespacedKey {
    namespace: String,
    key: String,
}

impl NamespacedKey {
    /// Create a key from its two halves, validating both
    pub fn new(namespace: &str, key: &str) -> ConfigResult<Self> {
        let namespace = namespace.trim().to_ascii_lowercase();
        let key = key.trim().to_ascii_lowercase();
        let input = || format!("{}:{}", namespace, key);

        if namespace.is_empty() {
            return Err(ConfigError::InvalidKey {
                input: input(),
                reason: "namespace is empty".to_string(),
            });
        }
        if key.is_empty() {
            return Err(ConfigError::InvalidKey {
                input: input(),
                reason: "key is empty".to_string(),
            });
        }
        if let Some(c) = namespace.chars().find(|c| !is_namespace_char(*c)) {
            return Err(ConfigError::InvalidKey {
                input: input(),
                reason: format!("illegal character '{}' in namespace", c),
            });
        }
        if let Some(c) = key.chars().find(|c| !is_key_char(*c)) {
            return Err(ConfigError::InvalidKey {
                input: input(),
                reason: format!("illegal character '{}' in key", c),
            });
        }

        Ok(Self { namespace, key })
    }

    /// Key in the default (`minecraft`) namespace
    pub fn minecraft(key: &str) -> ConfigResult<Self> {
        Self::new(DEFAULT_NAMESPACE, key)
    }

    /// Parse `namespace:key`, or `key` in the default namespace
    pub fn parse(input: &str) -> ConfigResult<Self> {
        match input.split_once(':') {
            Some((namespace, key)) => {
                if key.contains(':') {
                    return Err(ConfigError::InvalidKey {
                        input: input.to_string(),
                        reason: "more than one ':' separator".to_string(),
                    });
                }
                Self::new(namespace, key)
            }
            None => Self::minecraft(input),
        }
    }

    /// Key from parts already known to be lowercase and valid
    pub(crate) fn from_parts_unchecked(namespace: &str, key: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

fn is_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')
}

fn is_key_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl fmt::Display for NamespacedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.key)
    }
}

impl FromStr for NamespacedKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NamespacedKey {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NamespacedKey> for String {
    fn from(key: NamespacedKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_namespace() {
        let key = NamespacedKey::parse("veinminer:tube_y").expect("valid key");
        assert_eq!(key.namespace(), "veinminer");
        assert_eq!(key.key(), "tube_y");
        assert_eq!(key.to_string(), "veinminer:tube_y");
    }

    #[test]
    fn test_parse_defaults_to_minecraft() {
        let key = NamespacedKey::parse("Iron_Ore").expect("valid key");
        assert_eq!(key, NamespacedKey::minecraft("iron_ore").expect("valid key"));
    }

    #[test]
    fn test_rejects_malformed_keys() {
        assert!(NamespacedKey::parse("").is_err());
        assert!(NamespacedKey::parse("minecraft:").is_err());
        assert!(NamespacedKey::parse(":stone").is_err());
        assert!(NamespacedKey::parse("a:b:c").is_err());
        assert!(NamespacedKey::parse("mod/x:stone").is_err());
        assert!(NamespacedKey::parse("minecraft:gold ore").is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let key = NamespacedKey::parse("ore:gold").expect("valid key");
        let json = serde_json::to_string(&key).expect("serialize");
        assert_eq!(json, "\"ore:gold\"");
        let back: NamespacedKey = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, key);
        assert!(serde_json::from_str::<NamespacedKey>("\"bad key\"").is_err());
    }
}

//! Activation strategies: when a break turns into a vein-mine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Condition under which vein mining triggers for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ActivationStrategy {
    /// Vein mining is off
    Never,
    /// Triggered by the client mod's keybind
    Client,
    /// Triggered while sneaking
    #[default]
    Sneak,
    /// Triggered while standing
    Stand,
    /// Always on
    Always,
}

/// Snapshot of the player state the strategies look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerState {
    /// Online and alive; an invalid player is never active
    pub valid: bool,
    pub sneaking: bool,
    /// The client mod reports its activation key as held
    pub client_active: bool,
}

impl PlayerState {
    pub fn standing() -> Self {
        Self {
            valid: true,
            sneaking: false,
            client_active: false,
        }
    }

    pub fn sneaking() -> Self {
        Self {
            valid: true,
            sneaking: true,
            client_active: false,
        }
    }
}

impl ActivationStrategy {
    pub const ALL: [ActivationStrategy; 5] = [
        ActivationStrategy::Never,
        ActivationStrategy::Client,
        ActivationStrategy::Sneak,
        ActivationStrategy::Stand,
        ActivationStrategy::Always,
    ];

    /// Stable id written to player files
    pub fn id(self) -> &'static str {
        match self {
            ActivationStrategy::Never => "NONE",
            ActivationStrategy::Client => "CLIENT",
            ActivationStrategy::Sneak => "SNEAK",
            ActivationStrategy::Stand => "STAND",
            ActivationStrategy::Always => "ALWAYS",
        }
    }

    /// Case-insensitive lookup by id; `never` is accepted for `NONE`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("never") {
            return Some(ActivationStrategy::Never);
        }
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.id().eq_ignore_ascii_case(name))
    }

    /// Server default from a configured name
    ///
    /// `SNEAK` when the name is unrecognised, or names `CLIENT`: defaults
    /// reach players without the client mod.
    pub fn default_from_name(name: &str) -> Self {
        match Self::from_name(name) {
            Some(strategy) if strategy.requires_client() => {
                log::warn!(
                    "[ActivationStrategy::default_from_name] {} cannot be the server default, using {}",
                    strategy,
                    ActivationStrategy::Sneak
                );
                ActivationStrategy::Sneak
            }
            Some(strategy) => strategy,
            None => {
                log::warn!(
                    "[ActivationStrategy::default_from_name] Unknown activation strategy '{}', using {}",
                    name,
                    ActivationStrategy::Sneak
                );
                ActivationStrategy::Sneak
            }
        }
    }

    /// Whether vein mining is active for a player in `state`
    pub fn is_active(self, state: &PlayerState) -> bool {
        if !state.valid {
            return false;
        }
        match self {
            ActivationStrategy::Never => false,
            ActivationStrategy::Client => state.client_active,
            ActivationStrategy::Sneak => state.sneaking,
            ActivationStrategy::Stand => !state.sneaking,
            ActivationStrategy::Always => true,
        }
    }

    /// Only players running the client mod may select this strategy
    pub fn requires_client(self) -> bool {
        self == ActivationStrategy::Client
    }
}

impl fmt::Display for ActivationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ActivationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown activation strategy '{}'", s))
    }
}

impl TryFrom<String> for ActivationStrategy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActivationStrategy> for String {
    fn from(strategy: ActivationStrategy) -> Self {
        strategy.id().to_string()
    }
}

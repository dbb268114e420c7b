use std::fmt;
use std::str::FromStr;

/// How to treat two different operators of equal precedence that do not merge,
/// such as `a+b-c` when alternates are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EqualPrecedence {
    /// Apply left to right: the earlier application becomes the first operand
    /// of the later one. Right-associative operators still nest to the right.
    #[default]
    LeftToRight,
    /// Refuse the formula with `AmbiguousEqualPrecedence`.
    Reject,
}

impl FromStr for EqualPrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "left-to-right" | "ltr" => Ok(EqualPrecedence::LeftToRight),
            "reject" | "error" => Ok(EqualPrecedence::Reject),
            other => Err(format!("unknown equal-precedence policy '{other}'")),
        }
    }
}

impl fmt::Display for EqualPrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EqualPrecedence::LeftToRight => f.write_str("left"),
            EqualPrecedence::Reject => f.write_str("reject"),
        }
    }
}

/// Tunables for [`TreeBuilder`](super::TreeBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    pub equal_precedence: EqualPrecedence,
    /// Whether `-` joins `+` chains and `/` joins `*` chains
    pub merge_alternates: bool,
    /// Deepest tree accepted; deeper input fails with `NestingTooDeep`
    pub max_depth: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            equal_precedence: EqualPrecedence::LeftToRight,
            merge_alternates: true,
            max_depth: 256,
        }
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equal_precedence(mut self, policy: EqualPrecedence) -> Self {
        self.equal_precedence = policy;
        self
    }

    pub fn merge_alternates(mut self, merge: bool) -> Self {
        self.merge_alternates = merge;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Defaults overridden by the environment:
    /// `LATREE_EQUAL_PRECEDENCE` (`left`/`reject`), `LATREE_MERGE_ALTERNATES`
    /// (`0`/`1`/`true`/`false`) and `LATREE_MAX_DEPTH`.
    /// Malformed values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(s) = lookup("LATREE_EQUAL_PRECEDENCE") {
            match s.parse::<EqualPrecedence>() {
                Ok(policy) => config.equal_precedence = policy,
                Err(e) => log::warn!("ignoring LATREE_EQUAL_PRECEDENCE: {e}"),
            }
        }
        if let Some(s) = lookup("LATREE_MERGE_ALTERNATES") {
            match parse_flag(&s) {
                Some(flag) => config.merge_alternates = flag,
                None => log::warn!("ignoring LATREE_MERGE_ALTERNATES: expected a boolean, got '{s}'"),
            }
        }
        if let Some(s) = lookup("LATREE_MAX_DEPTH") {
            match s.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_depth = n,
                _ => log::warn!("ignoring LATREE_MAX_DEPTH: expected a positive integer, got '{s}'"),
            }
        }
        config
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

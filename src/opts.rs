#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum NoiseLevel {
    Polite,
    LoudAndProud,
    FranklyQuitePedantic,
}

impl Default for NoiseLevel {
    fn default() -> Self {
        Self::Polite
    }
}

impl NoiseLevel {
    pub fn from_occurrences(occurrences: u64) -> Self {
        match occurrences {
            0 => Self::Polite,
            1 => Self::LoudAndProud,
            _ => Self::FranklyQuitePedantic,
        }
    }

    /// Default `env_logger` filter for this level. `RUST_LOG` still wins.
    pub fn log_filter(self) -> &'static str {
        match self {
            Self::Polite => "warn",
            Self::LoudAndProud => "client_cards=info",
            Self::FranklyQuitePedantic => "client_cards=debug,ureq=info",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Clobbering {
    Forbid,
    Allow,
}

impl Default for Clobbering {
    fn default() -> Self {
        Self::Forbid
    }
}

impl Clobbering {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Self::Allow
        } else {
            Self::Forbid
        }
    }

    pub fn allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

use std::str::FromStr;

use tracing::Level;

use crate::error::Error;
use crate::game::DEFAULT_GHOSTS;

pub const GHOSTS_VAR: &str = "CHASE_GHOSTS";
pub const SEED_VAR: &str = "CHASE_SEED";
pub const LOG_VAR: &str = "CHASE_LOG";

/// Startup knobs. The board itself is fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub ghosts: usize,
    pub seed: Option<u64>,
    pub log_level: Option<Level>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ghosts: DEFAULT_GHOSTS,
            seed: None,
            log_level: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Unset or blank variables keep their defaults; anything else must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut settings = Settings::default();
        let read = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(raw) = read(GHOSTS_VAR) {
            let ghosts: usize = parse(GHOSTS_VAR, &raw)?;
            if ghosts == 0 {
                return Err(Error::InvalidSetting {
                    name: GHOSTS_VAR,
                    value: raw,
                    reason: "at least one ghost is required".to_string(),
                });
            }
            settings.ghosts = ghosts;
        }
        if let Some(raw) = read(SEED_VAR) {
            settings.seed = Some(parse(SEED_VAR, &raw)?);
        }
        if let Some(raw) = read(LOG_VAR) {
            settings.log_level = Some(parse(LOG_VAR, &raw)?);
        }
        Ok(settings)
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|err| Error::InvalidSetting {
        name,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

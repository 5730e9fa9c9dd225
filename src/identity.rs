//! Scout name resolution.
//!
//! Every saved match is attributed to the scout who recorded it. Rather than
//! requiring `--scout` on every match, the name is resolved through a chain:
//!
//! 1. `--scout <name>`: explicit per-match override
//! 2. `SCOUT_NAME` env var: set once per device or shell
//! 3. `default-scout` in `~/.scout/config.toml`
//! 4. `Anonymous`
//!
//! Blank values at any step fall through to the next.

use std::env;

use crate::config::Config;
use crate::session::ANONYMOUS;

/// Environment variable consulted after `--scout`.
pub const SCOUT_NAME_VAR: &str = "SCOUT_NAME";

/// Resolve the scout name from the tiered resolution chain.
pub fn resolve_scout(explicit: Option<&str>, config: &Config) -> String {
    let from_env = env::var(SCOUT_NAME_VAR).ok();
    first_named([explicit, from_env.as_deref(), config.default_scout.as_deref()])
}

fn first_named(candidates: [Option<&str>; 3]) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(ANONYMOUS)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_wins() {
        // Decided before the environment is read, so safe under parallel tests.
        let config = Config {
            default_scout: Some("config".into()),
            ..Config::default()
        };
        assert_eq!(resolve_scout(Some("sam"), &config), "sam");
    }

    #[test]
    fn falls_through_in_order() {
        assert_eq!(first_named([None, Some("env"), Some("config")]), "env");
        assert_eq!(first_named([None, None, Some("config")]), "config");
        assert_eq!(first_named([None, None, None]), ANONYMOUS);
    }

    #[test]
    fn blank_values_fall_through() {
        assert_eq!(first_named([Some("  "), Some(""), Some(" riley ")]), "riley");
        assert_eq!(first_named([Some(""), None, Some(" ")]), ANONYMOUS);
    }
}

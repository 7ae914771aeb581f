use std::collections::HashMap;
use std::env;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable holding the Amadeus client id.
pub const AMADEUS_CLIENT_ID: &str = "AMADEUS_CLIENT_ID";
/// Environment variable holding the Amadeus client secret.
pub const AMADEUS_CLIENT_SECRET: &str = "AMADEUS_CLIENT_SECRET";

/// Read-only snapshot of the process configuration, taken once at startup.
///
/// Components never reach into the environment themselves; they receive this
/// snapshot (or values pulled from it) through their constructors. A missing
/// credential disables the dependent feature instead of failing startup.
#[derive(Clone)]
pub struct AppConfig {
    vars: HashMap<String, String>,
}

impl AppConfig {
    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        Self::from_pairs(env::vars())
    }

    /// Build a config from explicit key/value pairs (used by tests).
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: pairs.into_iter().collect(),
        }
    }

    /// Look up a named secret. Unset and empty values both count as absent.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.resolve(GEMINI_API_KEY)
    }

    pub fn amadeus_client_id(&self) -> Option<&str> {
        self.resolve(AMADEUS_CLIENT_ID)
    }

    pub fn amadeus_client_secret(&self) -> Option<&str> {
        self.resolve(AMADEUS_CLIENT_SECRET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolve_returns_set_values() {
        let config = AppConfig::from_pairs(pairs(&[(GEMINI_API_KEY, "abc123")]));
        assert_eq!(config.resolve(GEMINI_API_KEY), Some("abc123"));
        assert_eq!(config.gemini_api_key(), Some("abc123"));
    }

    #[test]
    fn resolve_returns_none_for_unset() {
        let config = AppConfig::from_pairs(pairs(&[]));
        assert_eq!(config.resolve(AMADEUS_CLIENT_ID), None);
        assert_eq!(config.amadeus_client_id(), None);
        assert_eq!(config.amadeus_client_secret(), None);
    }

    #[test]
    fn empty_and_blank_values_count_as_absent() {
        let config = AppConfig::from_pairs(pairs(&[
            (GEMINI_API_KEY, ""),
            (AMADEUS_CLIENT_ID, "   "),
        ]));
        assert_eq!(config.gemini_api_key(), None);
        assert_eq!(config.amadeus_client_id(), None);
    }

    #[test]
    #[serial]
    fn from_env_snapshots_process_environment() {
        env::set_var("TRIP_COMPANION_TEST_VAR", "snapshot-me");
        let config = AppConfig::from_env();
        env::remove_var("TRIP_COMPANION_TEST_VAR");

        // The snapshot was taken while the variable was set; later changes to
        // the environment do not affect it.
        assert_eq!(config.resolve("TRIP_COMPANION_TEST_VAR"), Some("snapshot-me"));
    }
}

use anyhow::Context;
use duel_core::Count;
use duel_core::Handle;
use duel_records::Member;
use duel_records::Rules;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Process configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_url: Option<String>,
    pub bind: String,
    pub admins: HashSet<Handle<Member>>,
    pub rules: Rules,
    pub window: Duration,
    pub bracket: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let count = |key: &str, default: Count| -> anyhow::Result<Count> {
            var(key)
                .map(|v| v.trim().parse::<Count>())
                .transpose()
                .with_context(|| format!("{} must be a small number", key))
                .map(|v| v.unwrap_or(default))
        };
        let pool = |key: &str, default: &[&str]| -> Vec<String> {
            var(key)
                .map(|v| list(&v))
                .unwrap_or_else(|| default.iter().map(|s| s.to_string()).collect())
        };
        let rules = Rules {
            best_of: count("TOURNAMENT_BEST_OF", duel_core::BEST_OF)?,
            vetos: count("TOURNAMENT_VETOS", duel_core::VETOS)?,
            bans: count("TOURNAMENT_BANS", duel_core::BANS)?,
            characters: pool("TOURNAMENT_CHARACTERS", duel_core::CHARACTERS),
            builds: pool("TOURNAMENT_BUILDS", duel_core::BUILDS),
        };
        rules.validate().context("invalid tournament rules")?;
        let window = match var("CAST_WINDOW") {
            None => duel_core::CAST_WINDOW,
            Some(v) => duel_core::parse_duration(&v)
                .with_context(|| format!("CAST_WINDOW {} is not a duration like 15m", v))?,
        };
        Ok(Self {
            db_url: var("DB_URL"),
            bind: var("BIND_ADDR").unwrap_or_else(|| String::from("0.0.0.0:8888")),
            admins: var("ADMIN_IDS")
                .map(|v| list(&v).into_iter().map(Handle::from).collect())
                .unwrap_or_default(),
            rules,
            window,
            bracket: var("BRACKET_FILE").map(PathBuf::from),
        })
    }
}

fn list(v: &str) -> Vec<String> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.bind, "0.0.0.0:8888");
        assert_eq!(settings.rules, Rules::default());
        assert_eq!(settings.window, duel_core::CAST_WINDOW);
        assert!(settings.db_url.is_none());
        assert!(settings.admins.is_empty());
    }
    #[test]
    fn overrides_are_read() {
        let settings = settings(&[
            ("TOURNAMENT_BEST_OF", "5"),
            ("TOURNAMENT_BANS", "0"),
            ("ADMIN_IDS", " 1, 2 ,,"),
            ("CAST_WINDOW", "30m"),
            ("BRACKET_FILE", "bracket.json"),
        ])
        .unwrap();
        assert_eq!(settings.rules.best_of, 5);
        assert_eq!(settings.rules.bans, 0);
        assert_eq!(settings.admins.len(), 2);
        assert!(settings.admins.contains(&Handle::from("2")));
        assert_eq!(settings.window, Duration::from_secs(1800));
        assert_eq!(settings.bracket, Some(PathBuf::from("bracket.json")));
    }
    #[test]
    fn bad_values_fail_loudly() {
        assert!(settings(&[("TOURNAMENT_BEST_OF", "4")]).is_err());
        assert!(settings(&[("TOURNAMENT_VETOS", "many")]).is_err());
        assert!(settings(&[("CAST_WINDOW", "soon")]).is_err());
        assert!(settings(&[("TOURNAMENT_BUILDS", "a,b")]).is_err());
    }
}

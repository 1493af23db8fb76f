use duel_core::Count;
use serde::Serialize;

/// Tournament configuration every match of the event is opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rules {
    pub best_of: Count,
    pub vetos: Count,
    pub bans: Count,
    pub characters: Vec<String>,
    pub builds: Vec<String>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            best_of: duel_core::BEST_OF,
            vetos: duel_core::VETOS,
            bans: duel_core::BANS,
            characters: duel_core::CHARACTERS.iter().map(|s| s.to_string()).collect(),
            builds: duel_core::BUILDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Rules {
    /// Fewest items a pool needs so the draft can never run dry:
    /// every ban, every pick, and every vetoed pick consumes one item.
    pub fn minimum(&self) -> usize {
        self.best_of as usize + 2 * self.bans as usize + 2 * self.vetos as usize
    }
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.best_of % 2 == 0 {
            return Err(RulesError::EvenBestOf(self.best_of));
        }
        for (kind, pool) in [("character", &self.characters), ("build", &self.builds)] {
            if pool.len() < self.minimum() {
                return Err(RulesError::SmallPool {
                    kind,
                    have: pool.len(),
                    need: self.minimum(),
                });
            }
            if let Some(dup) = pool
                .iter()
                .enumerate()
                .find(|(i, item)| pool[..*i].contains(item))
                .map(|(_, item)| item.clone())
            {
                return Err(RulesError::Duplicate(dup));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("best of must be odd, got {0}")]
    EvenBestOf(Count),
    #[error("{kind} pool holds {have} items but needs at least {need}")]
    SmallPool {
        kind: &'static str,
        have: usize,
        need: usize,
    },
    #[error("{0} appears twice in a pool")]
    Duplicate(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults_validate() {
        assert_eq!(Rules::default().validate(), Ok(()));
    }
    #[test]
    fn even_best_of_is_refused() {
        let rules = Rules {
            best_of: 4,
            ..Rules::default()
        };
        assert_eq!(rules.validate(), Err(RulesError::EvenBestOf(4)));
    }
    #[test]
    fn small_pool_is_refused() {
        let rules = Rules {
            builds: vec!["a".into(), "b".into()],
            ..Rules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(RulesError::SmallPool { kind: "build", .. })
        ));
    }
    #[test]
    fn duplicates_are_refused() {
        let mut rules = Rules::default();
        rules.characters.push(rules.characters[0].clone());
        assert_eq!(
            rules.validate(),
            Err(RulesError::Duplicate(rules.characters[0].clone()))
        );
    }
}

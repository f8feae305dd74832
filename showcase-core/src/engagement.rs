use serde::Deserialize;

/// What to do when a user likes or buys the same item again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementPolicy {
    /// Append another entry for the same user.
    #[default]
    Allow,
    /// Refuse the action when the user already has an entry.
    RejectDuplicate,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{actor} is already recorded on this item")]
pub struct DuplicateEngagement {
    pub actor: String,
}

impl EngagementPolicy {
    /// Check whether `actor` may be appended to `existing`.
    pub fn admit<'a, I>(&self, actor: &str, existing: I) -> Result<(), DuplicateEngagement>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self {
            EngagementPolicy::Allow => Ok(()),
            EngagementPolicy::RejectDuplicate => {
                if existing.into_iter().any(|a| a == actor) {
                    Err(DuplicateEngagement { actor: actor.to_string() })
                } else {
                    Ok(())
                }
            }
        }
    }
}

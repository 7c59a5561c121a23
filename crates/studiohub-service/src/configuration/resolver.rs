//! Effective configuration resolution across the four override scopes.

use std::sync::Arc;

use tracing::debug;

use studiohub_core::error::AppError;
use studiohub_core::result::AppResult;
use studiohub_database::repositories::ConfigurationRepository;
use studiohub_entity::configuration::{
    ConfigScope, ConfigurationOverride, EffectiveConfiguration, OverrideFields,
};

/// Merges the four-level override chain (organization → headquarters →
/// activity → session) into one effective configuration.
///
/// Resolution starts from hard-coded defaults and applies each stored
/// override in scope order, replacing only the fields the override sets.
/// The result is never persisted; sessions stamp a copy at creation time.
#[derive(Debug, Clone)]
pub struct ConfigurationResolver {
    /// Override store.
    config_repo: Arc<ConfigurationRepository>,
}

impl ConfigurationResolver {
    /// Create a new configuration resolver.
    pub fn new(config_repo: Arc<ConfigurationRepository>) -> Self {
        Self { config_repo }
    }

    /// Resolve the effective configuration for a session context.
    ///
    /// The organization, headquarters, and activity ids are mandatory and
    /// must be positive; `session_id` is only present once a concrete
    /// session exists (e.g. for per-session admin overrides).
    pub async fn resolve(
        &self,
        organization_id: i64,
        headquarters_id: i64,
        activity_id: i64,
        session_id: Option<i64>,
    ) -> AppResult<EffectiveConfiguration> {
        require_positive(organization_id, "organization_id")?;
        require_positive(headquarters_id, "headquarters_id")?;
        require_positive(activity_id, "activity_id")?;

        let mut chain: Vec<(ConfigScope, i64)> = vec![
            (ConfigScope::Organization, organization_id),
            (ConfigScope::Headquarters, headquarters_id),
            (ConfigScope::Activity, activity_id),
        ];
        if let Some(session_id) = session_id {
            require_positive(session_id, "session_id")?;
            chain.push((ConfigScope::Session, session_id));
        }

        let mut resolved = EffectiveConfiguration::default();
        for (scope, scope_id) in chain {
            if let Some(ov) = self.config_repo.find_by_scope(scope, scope_id).await? {
                resolved = resolved.merge_with(&ov.fields());
            }
        }

        debug!(
            organization_id,
            headquarters_id,
            activity_id,
            session_id,
            max_participants = resolved.max_participants,
            waitlist_enabled = resolved.waitlist_enabled,
            "Resolved effective configuration"
        );
        Ok(resolved)
    }

    /// Validate and store an override at a scope.
    pub async fn set_override(
        &self,
        scope: ConfigScope,
        scope_id: i64,
        fields: OverrideFields,
    ) -> AppResult<ConfigurationOverride> {
        require_positive(scope_id, "scope_id")?;
        fields.validate()?;
        let fields = fields.normalized();
        self.config_repo.upsert(scope, scope_id, &fields).await
    }

    /// Remove an override at a scope; later resolutions fall back to the
    /// parent scope. Sessions keep whatever they stamped.
    pub async fn delete_override(&self, scope: ConfigScope, scope_id: i64) -> AppResult<()> {
        require_positive(scope_id, "scope_id")?;
        if !self.config_repo.delete(scope, scope_id).await? {
            return Err(AppError::not_found("No configuration override at this scope"));
        }
        debug!(?scope, scope_id, "Deleted configuration override");
        Ok(())
    }
}

/// Reject non-positive identifiers.
pub(crate) fn require_positive(id: i64, name: &str) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::validation(format!("{name} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert!(require_positive(1, "id").is_ok());
        assert!(require_positive(0, "id").is_err());
        assert!(require_positive(-5, "id").is_err());
    }
}

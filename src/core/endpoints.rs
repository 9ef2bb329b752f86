// src/core/endpoints.rs
//! Static endpoint registries, one per backend.
//!
//! Each entry maps a logical operation name to a path template relative to the
//! backend's base URL. Templates contain at most one `{id}` placeholder.

use super::backend::Backend;
use std::fmt;

const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub template: &'static str,
}

impl Endpoint {
    pub const fn new(name: &'static str, template: &'static str) -> Self {
        Self { name, template }
    }

    pub fn is_parameterized(&self) -> bool {
        self.template.contains(ID_PLACEHOLDER)
    }

    /// Path of a fixed endpoint. Parameterized templates are returned verbatim.
    pub fn path(&self) -> &'static str {
        self.template
    }

    /// Render the template with a percent-encoded identifier.
    pub fn with_id(&self, id: impl fmt::Display) -> String {
        let id = id.to_string();
        self.template
            .replace(ID_PLACEHOLDER, &urlencoding::encode(&id))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.template)
    }
}

pub mod primary {
    use super::Endpoint;

    pub const AUTH_ME: Endpoint = Endpoint::new("auth.me", "/auth/me");
    pub const JOBS_LIST: Endpoint = Endpoint::new("jobs.list", "/jobs");
    pub const JOBS_DETAIL: Endpoint = Endpoint::new("jobs.detail", "/jobs/{id}");
    pub const JOBS_SEARCH: Endpoint = Endpoint::new("jobs.search", "/search");
    pub const ORGS_LIST: Endpoint = Endpoint::new("orgs.list", "/orgs");
    pub const ORGS_DETAIL: Endpoint = Endpoint::new("orgs.detail", "/orgs/{id}");
    pub const APPLICATIONS_LIST: Endpoint = Endpoint::new("applications.list", "/applications");
    pub const APPLICATIONS_DETAIL: Endpoint =
        Endpoint::new("applications.detail", "/applications/{id}");
    pub const APPLICATIONS_STATUS: Endpoint =
        Endpoint::new("applications.status", "/applications/{id}/status");
    pub const NOTIFICATIONS_LIST: Endpoint = Endpoint::new("notifications.list", "/notifications");
    pub const NOTIFICATIONS_MARK_READ: Endpoint =
        Endpoint::new("notifications.mark_read", "/notifications/{id}/read");
    pub const UPLOADS_RESUME: Endpoint = Endpoint::new("uploads.resume", "/uploads/resume");

    pub const ALL: &[Endpoint] = &[
        AUTH_ME,
        JOBS_LIST,
        JOBS_DETAIL,
        JOBS_SEARCH,
        ORGS_LIST,
        ORGS_DETAIL,
        APPLICATIONS_LIST,
        APPLICATIONS_DETAIL,
        APPLICATIONS_STATUS,
        NOTIFICATIONS_LIST,
        NOTIFICATIONS_MARK_READ,
        UPLOADS_RESUME,
    ];
}

pub mod ai {
    use super::Endpoint;

    pub const CANDIDATES_ME: Endpoint = Endpoint::new("candidates.me", "/v1/candidates/me");
    pub const JOBS_LIST: Endpoint = Endpoint::new("jobs.list", "/v1/jobs");
    pub const JOBS_CANDIDATES: Endpoint =
        Endpoint::new("jobs.candidates", "/v1/jobs/{id}/candidates");
    pub const RESUMES_INGEST: Endpoint = Endpoint::new("resumes.ingest", "/v1/resumes/ingest");
    pub const RESUMES_FEATURES: Endpoint =
        Endpoint::new("resumes.features", "/v1/resumes/{id}/features");
    pub const RESUMES_INSIGHTS: Endpoint = Endpoint::new("resumes.insights", "/ai/resume/insights");
    pub const ANALYTICS_INSIGHTS: Endpoint = Endpoint::new("analytics.insights", "/ai/analytics");
    pub const ANALYTICS_EMPLOYER: Endpoint =
        Endpoint::new("analytics.employer", "/v1/analytics/employer/{id}");
    pub const RECOMMENDATIONS_LIST: Endpoint =
        Endpoint::new("recommendations.list", "/ai/recommendations");
    pub const RECOMMENDATIONS_FEEDBACK: Endpoint =
        Endpoint::new("recommendations.feedback", "/ai/recommendations/feedback");
    pub const APPLICATIONS_CREATE: Endpoint = Endpoint::new("applications.create", "/v1/applications");
    pub const USERS_LIST: Endpoint = Endpoint::new("users.list", "/v1/users");
    pub const USERS_CREATE: Endpoint = Endpoint::new("users.create", "/v1/users");
    pub const USERS_BY_EMAIL: Endpoint = Endpoint::new("users.by_email", "/v1/users/by-email");
    pub const USERS_ENSURE: Endpoint = Endpoint::new("users.ensure", "/v1/users/ensure");
    pub const USERS_DETAIL: Endpoint = Endpoint::new("users.detail", "/v1/users/{id}");
    pub const STARRED_LIST: Endpoint = Endpoint::new("starred.list", "/v1/users/me/starred-jobs");
    pub const STARRED_DETAIL: Endpoint =
        Endpoint::new("starred.detail", "/v1/users/me/starred-jobs/{id}");

    pub const ALL: &[Endpoint] = &[
        CANDIDATES_ME,
        JOBS_LIST,
        JOBS_CANDIDATES,
        RESUMES_INGEST,
        RESUMES_FEATURES,
        RESUMES_INSIGHTS,
        ANALYTICS_INSIGHTS,
        ANALYTICS_EMPLOYER,
        RECOMMENDATIONS_LIST,
        RECOMMENDATIONS_FEEDBACK,
        APPLICATIONS_CREATE,
        USERS_LIST,
        USERS_CREATE,
        USERS_BY_EMAIL,
        USERS_ENSURE,
        USERS_DETAIL,
        STARRED_LIST,
        STARRED_DETAIL,
    ];
}

/// Read-only view over one backend's endpoint table.
#[derive(Debug, Clone, Copy)]
pub struct EndpointRegistry {
    backend: Backend,
    entries: &'static [Endpoint],
}

impl EndpointRegistry {
    pub fn primary() -> Self {
        Self {
            backend: Backend::Primary,
            entries: primary::ALL,
        }
    }

    pub fn ai() -> Self {
        Self {
            backend: Backend::Ai,
            entries: ai::ALL,
        }
    }

    pub fn for_backend(backend: Backend) -> Self {
        match backend {
            Backend::Primary => Self::primary(),
            Backend::Ai => Self::ai(),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn lookup(&self, name: &str) -> Option<&'static Endpoint> {
        self.entries.iter().find(|endpoint| endpoint.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Endpoint> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_with_id_encodes_identifier() {
        assert_eq!(primary::JOBS_DETAIL.with_id("42"), "/jobs/42");
        assert_eq!(
            ai::RESUMES_FEATURES.with_id("a b/c"),
            "/v1/resumes/a%20b%2Fc/features"
        );
    }

    #[test]
    fn test_fixed_path_is_unchanged() {
        assert!(!primary::JOBS_LIST.is_parameterized());
        assert_eq!(primary::JOBS_LIST.path(), "/jobs");
        assert_eq!(primary::JOBS_LIST.with_id(7), "/jobs");
    }

    #[test]
    fn test_registry_lookup() {
        let registry = EndpointRegistry::ai();
        assert_eq!(registry.backend(), Backend::Ai);
        assert_eq!(
            registry.lookup("resumes.ingest").map(|e| e.template),
            Some("/v1/resumes/ingest")
        );
        assert!(registry.lookup("auth.me").is_none());
        assert!(EndpointRegistry::primary().lookup("auth.me").is_some());
    }

    #[test]
    fn test_registry_names_are_unique() {
        for registry in [EndpointRegistry::primary(), EndpointRegistry::ai()] {
            let names: HashSet<_> = registry.iter().map(|e| e.name).collect();
            assert_eq!(names.len(), registry.iter().count());
        }
    }
}

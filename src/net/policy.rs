//! Per-endpoint exemptions for the request pipeline.
//!
//! DESIGN
//! ======
//! One table declares, for every exempt API path fragment, whether outbound
//! requests carry the credential and whether a 401 forces a login redirect.
//! The "public" and "no-redirect" lists are both views of this table. They
//! differ only for the profile fetch, which must carry the credential but
//! reports its own 401 to the session instead of redirecting.
//!
//! Matching is substring containment against the request path.

#[cfg(test)]
#[path = "policy_test.rs"]
mod policy_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialPolicy {
    Attach,
    Omit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedPolicy {
    /// Clear the persisted credential and hard-redirect to the login view.
    ForceLogin,
    /// Hand the 401 back to the caller untouched.
    Propagate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointPolicy {
    pub fragment: &'static str,
    pub credential: CredentialPolicy,
    pub on_unauthorized: UnauthorizedPolicy,
}

/// Resolved policy for one request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPolicy {
    pub credential: CredentialPolicy,
    pub on_unauthorized: UnauthorizedPolicy,
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self { credential: CredentialPolicy::Attach, on_unauthorized: UnauthorizedPolicy::ForceLogin }
    }
}

pub const EXEMPT_ENDPOINTS: &[EndpointPolicy] = &[
    EndpointPolicy {
        fragment: "/auth/login",
        credential: CredentialPolicy::Omit,
        on_unauthorized: UnauthorizedPolicy::Propagate,
    },
    EndpointPolicy {
        fragment: "/auth/register",
        credential: CredentialPolicy::Omit,
        on_unauthorized: UnauthorizedPolicy::Propagate,
    },
    EndpointPolicy {
        fragment: "/auth/me",
        credential: CredentialPolicy::Attach,
        on_unauthorized: UnauthorizedPolicy::Propagate,
    },
];

/// Combine every table entry whose fragment occurs in `path`.
#[must_use]
pub fn policy_for(path: &str) -> PathPolicy {
    policy_in(EXEMPT_ENDPOINTS, path)
}

fn policy_in(table: &[EndpointPolicy], path: &str) -> PathPolicy {
    let mut policy = PathPolicy::default();
    for entry in table.iter().filter(|e| path.contains(e.fragment)) {
        if entry.credential == CredentialPolicy::Omit {
            policy.credential = CredentialPolicy::Omit;
        }
        if entry.on_unauthorized == UnauthorizedPolicy::Propagate {
            policy.on_unauthorized = UnauthorizedPolicy::Propagate;
        }
    }
    policy
}

/// Fragments whose requests never carry a credential.
pub fn public_fragments() -> impl Iterator<Item = &'static str> {
    EXEMPT_ENDPOINTS
        .iter()
        .filter(|e| e.credential == CredentialPolicy::Omit)
        .map(|e| e.fragment)
}

/// Fragments whose 401 responses never force a login redirect.
pub fn no_redirect_fragments() -> impl Iterator<Item = &'static str> {
    EXEMPT_ENDPOINTS
        .iter()
        .filter(|e| e.on_unauthorized == UnauthorizedPolicy::Propagate)
        .map(|e| e.fragment)
}

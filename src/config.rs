//! Client configuration resolved once at startup.
//!
//! DESIGN
//! ======
//! The API base address depends on the build profile. Production builds talk
//! to the origin that served the page; development builds talk to a fixed
//! local backend. Both knobs are compile-time because a WASM bundle has no
//! process environment to read at runtime.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_DEV_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProfile {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown build profile: {0}")]
    UnknownProfile(String),
    #[error("page origin unavailable in a production build")]
    MissingOrigin,
}

impl BuildProfile {
    /// Profile of the running build.
    ///
    /// `PADDOCK_PROFILE` (read at compile time) may force `production` or
    /// `development`; otherwise release builds are production.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] if `PADDOCK_PROFILE` names
    /// anything else.
    pub fn current() -> Result<Self, ConfigError> {
        parse_profile(option_env!("PADDOCK_PROFILE"), cfg!(debug_assertions))
    }
}

fn parse_profile(raw: Option<&str>, debug_build: bool) -> Result<BuildProfile, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(if debug_build { BuildProfile::Development } else { BuildProfile::Production }),
        Some("production") => Ok(BuildProfile::Production),
        Some("development") => Ok(BuildProfile::Development),
        Some(other) => Err(ConfigError::UnknownProfile(other.to_owned())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub profile: BuildProfile,
    pub base_url: String,
}

impl ClientConfig {
    /// Resolve the profile and base address for this page.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the profile is unknown or a production
    /// build cannot read the page origin.
    pub fn resolve() -> Result<Self, ConfigError> {
        let profile = BuildProfile::current()?;
        let base_url = resolve_base_url(profile, page_origin().as_deref(), option_env!("PADDOCK_DEV_API_URL"))?;
        Ok(Self { profile, base_url })
    }

    /// Development config pointing at the local backend.
    #[must_use]
    pub fn development() -> Self {
        Self { profile: BuildProfile::Development, base_url: DEFAULT_DEV_API_URL.to_owned() }
    }
}

/// Pick the API base address for `profile`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingOrigin`] for a production build without a
/// page origin.
pub fn resolve_base_url(
    profile: BuildProfile,
    origin: Option<&str>,
    dev_override: Option<&str>,
) -> Result<String, ConfigError> {
    let raw = match profile {
        BuildProfile::Production => origin
            .filter(|o| !o.trim().is_empty())
            .ok_or(ConfigError::MissingOrigin)?,
        BuildProfile::Development => dev_override
            .filter(|o| !o.trim().is_empty())
            .unwrap_or(DEFAULT_DEV_API_URL),
    };
    Ok(raw.trim().trim_end_matches('/').to_owned())
}

fn page_origin() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()?.location().origin().ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

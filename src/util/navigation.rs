//! Full-page navigation, used when application state must be discarded.

/// Performs a hard redirect: the page reloads and client state restarts.
pub trait Navigator: Send + Sync {
    fn hard_redirect(&self, path: &str);
}

/// Sets `window.location.href`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

#[cfg(feature = "hydrate")]
impl Navigator for BrowserNavigator {
    fn hard_redirect(&self, path: &str) {
        if let Some(window) = web_sys::window()
            && let Err(e) = window.location().set_href(path)
        {
            leptos::logging::warn!("redirect to {path} failed: {e:?}");
        }
    }
}

/// No page to reload outside the browser; the request is only logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn hard_redirect(&self, path: &str) {
        leptos::logging::log!("hard redirect to {path} skipped outside the browser");
    }
}

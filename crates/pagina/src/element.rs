//! Stale-safe element handle.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};
use crate::session::{RawRef, Session};

/// Total lookup attempts per operation before a stale fault surfaces
pub const MAX_REFRESH_ATTEMPTS: usize = 5;

/// A resilient handle to a remote element
///
/// `Element` remembers how its target was found (session plus locator) so it
/// can recover from staleness on its own. Every delegated operation retries
/// on a stale fault: the handle re-resolves its locator through the session,
/// swaps in the fresh reference, and repeats the operation, up to
/// [`MAX_REFRESH_ATTEMPTS`] attempts in total. Once retries are exhausted the
/// stale error surfaces with this handle's locator and the attempt count.
/// All other errors propagate immediately.
///
/// Handles are created by the resolution layer
/// ([`Instance::element`](crate::Instance::element) and friends); tests can
/// build them directly against a [`MockSession`](crate::MockSession).
pub struct Element {
    session: Arc<dyn Session>,
    locator: Locator,
    raw: Mutex<RawRef>,
}

impl Element {
    /// Wrap a raw reference together with the session and locator it came from
    #[must_use]
    pub fn new(session: Arc<dyn Session>, locator: Locator, raw: RawRef) -> Self {
        Self {
            session,
            locator,
            raw: Mutex::new(raw),
        }
    }

    /// Resolve `locator` through the session and wrap the result
    pub fn resolve(session: Arc<dyn Session>, locator: Locator) -> PaginaResult<Self> {
        let raw = session.find_one(&locator)?;
        Ok(Self::new(session, locator, raw))
    }

    /// The locator this handle re-resolves through
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Tag name of the element
    pub fn tag_name(&self) -> PaginaResult<String> {
        self.with_retry(|raw| raw.tag_name())
    }

    /// Visible text of the element
    pub fn text(&self) -> PaginaResult<String> {
        self.with_retry(|raw| raw.text())
    }

    /// Value of an attribute, or `None` if the attribute is absent
    pub fn attribute(&self, name: &str) -> PaginaResult<Option<String>> {
        self.with_retry(|raw| raw.attribute(name))
    }

    /// Click the element
    pub fn click(&self) -> PaginaResult<()> {
        self.with_retry(|raw| raw.click())
    }

    /// Clear the element's input value
    pub fn clear(&self) -> PaginaResult<()> {
        self.with_retry(|raw| raw.clear())
    }

    /// Type text into the element
    pub fn send_keys(&self, text: &str) -> PaginaResult<()> {
        self.with_retry(|raw| raw.send_keys(text))
    }

    /// Whether the element is rendered visible
    pub fn is_displayed(&self) -> PaginaResult<bool> {
        self.with_retry(|raw| raw.is_displayed())
    }

    /// Whether the element is enabled
    pub fn is_enabled(&self) -> PaginaResult<bool> {
        self.with_retry(|raw| raw.is_enabled())
    }

    /// Whether the element is selected (checkboxes, options)
    pub fn is_selected(&self) -> PaginaResult<bool> {
        self.with_retry(|raw| raw.is_selected())
    }

    /// Find one descendant, returning a resilient handle
    ///
    /// The child refreshes through the session using its own locator, so a
    /// replaced parent does not strand it.
    pub fn find_one(&self, locator: &Locator) -> PaginaResult<Self> {
        let raw = self.with_retry(|raw| raw.find_one(locator))?;
        Ok(Self::new(Arc::clone(&self.session), locator.clone(), raw))
    }

    /// Find all matching descendants as resilient handles
    pub fn find_many(&self, locator: &Locator) -> PaginaResult<Vec<Self>> {
        let raws = self.with_retry(|raw| raw.find_many(locator))?;
        Ok(raws
            .into_iter()
            .map(|raw| Self::new(Arc::clone(&self.session), locator.clone(), raw))
            .collect())
    }

    /// Replace the inner reference with a fresh lookup of this handle's locator
    fn refresh(&self) -> PaginaResult<()> {
        let fresh = self.session.find_one(&self.locator)?;
        *self.raw.lock().unwrap() = fresh;
        Ok(())
    }

    fn with_retry<T, F>(&self, mut op: F) -> PaginaResult<T>
    where
        F: FnMut(&RawRef) -> PaginaResult<T>,
    {
        let mut attempt = 1;
        loop {
            let raw = Arc::clone(&self.raw.lock().unwrap());
            match op(&raw) {
                Err(err) if err.is_stale() && attempt < MAX_REFRESH_ATTEMPTS => {
                    tracing::debug!(
                        strategy = %self.locator.strategy(),
                        value = self.locator.value(),
                        attempt,
                        "stale element detected, refreshing"
                    );
                    self.refresh()?;
                    attempt += 1;
                }
                Err(err) if err.is_stale() => {
                    return Err(PaginaError::stale(&self.locator, attempt));
                }
                other => return other,
            }
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

//! Session and raw-element traits, plus mock implementations for tests.
//!
//! [`Session`] is the narrow seam between the page-object layer and whatever
//! actually drives a browser. Implementations own exactly one remote session
//! and are passed around explicitly as `Arc<dyn Session>`; the crate keeps no
//! global session state.
//!
//! [`RawElement`] is a direct, non-resilient reference to a remote element.
//! Any of its methods may fail with [`PaginaError::StaleReference`] once the
//! underlying node is replaced; the resilient retry lives one layer up, in
//! [`Element`](crate::Element).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::locator::{Locator, Strategy};
use crate::result::{PaginaError, PaginaResult};

/// Shared reference to a raw remote element
pub type RawRef = Arc<dyn RawElement>;

impl std::fmt::Debug for dyn RawElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RawElement")
    }
}

/// Direct reference to a remote element, with no staleness protection
pub trait RawElement: Send + Sync {
    /// Tag name of the element
    fn tag_name(&self) -> PaginaResult<String>;

    /// Visible text of the element
    fn text(&self) -> PaginaResult<String>;

    /// Value of an attribute, or `None` if the attribute is absent
    fn attribute(&self, name: &str) -> PaginaResult<Option<String>>;

    /// Click the element
    fn click(&self) -> PaginaResult<()>;

    /// Clear the element's input value
    fn clear(&self) -> PaginaResult<()>;

    /// Type text into the element
    fn send_keys(&self, text: &str) -> PaginaResult<()>;

    /// Whether the element is rendered visible
    fn is_displayed(&self) -> PaginaResult<bool>;

    /// Whether the element is enabled
    fn is_enabled(&self) -> PaginaResult<bool>;

    /// Whether the element is selected (checkboxes, options)
    fn is_selected(&self) -> PaginaResult<bool>;

    /// Find exactly one descendant, failing with `NotFound` on zero matches
    fn find_one(&self, locator: &Locator) -> PaginaResult<RawRef>;

    /// Find all matching descendants; zero matches is an empty vec
    fn find_many(&self, locator: &Locator) -> PaginaResult<Vec<RawRef>>;
}

/// A live browser-automation session
///
/// One `Session` value owns one remote session. Lookups are always fresh;
/// the session never caches elements.
pub trait Session: Send + Sync {
    /// Find exactly one element, failing with `NotFound` on zero matches
    fn find_one(&self, locator: &Locator) -> PaginaResult<RawRef>;

    /// Find all matching elements; zero matches is an empty vec
    fn find_many(&self, locator: &Locator) -> PaginaResult<Vec<RawRef>>;
}

/// In-memory session for tests
///
/// Elements are registered per locator, and every lookup is recorded in a
/// call log so tests can assert on lookup traffic.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pagina::{Locator, MockElement, MockSession, Session};
///
/// let session = MockSession::new();
/// session.insert(Locator::id("save"), Arc::new(MockElement::new("button")));
///
/// let raw = session.find_one(&Locator::id("save")).unwrap();
/// assert_eq!(raw.tag_name().unwrap(), "button");
/// assert_eq!(session.calls(), vec!["find_one: id=save"]);
/// ```
#[derive(Default)]
pub struct MockSession {
    elements: Mutex<HashMap<Locator, Vec<Arc<MockElement>>>>,
    call_log: Mutex<Vec<String>>,
}

impl MockSession {
    /// Create an empty mock session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single element under a locator, replacing any previous entry
    pub fn insert(&self, locator: Locator, element: Arc<MockElement>) {
        self.insert_all(locator, vec![element]);
    }

    /// Register a list of elements under a locator, replacing any previous entry
    pub fn insert_all(&self, locator: Locator, elements: Vec<Arc<MockElement>>) {
        self.elements
            .lock()
            .unwrap()
            .insert(locator, elements);
    }

    /// Remove all elements registered under a locator
    pub fn remove(&self, locator: &Locator) {
        self.elements.lock().unwrap().remove(locator);
    }

    /// Snapshot of the recorded lookup calls, in order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    /// Whether a call matching `entry` was recorded
    #[must_use]
    pub fn was_called(&self, entry: &str) -> bool {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .any(|call| call == entry)
    }

    fn log(&self, entry: String) {
        self.call_log.lock().unwrap().push(entry);
    }
}

impl Session for MockSession {
    fn find_one(&self, locator: &Locator) -> PaginaResult<RawRef> {
        self.log(format!("find_one: {locator}"));
        let elements = self.elements.lock().unwrap();
        elements
            .get(locator)
            .and_then(|list| list.first())
            .map(|element| Arc::clone(element) as RawRef)
            .ok_or_else(|| PaginaError::not_found(locator))
    }

    fn find_many(&self, locator: &Locator) -> PaginaResult<Vec<RawRef>> {
        self.log(format!("find_many: {locator}"));
        let elements = self.elements.lock().unwrap();
        Ok(elements
            .get(locator)
            .map(|list| {
                list.iter()
                    .map(|element| Arc::clone(element) as RawRef)
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for MockSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSession")
            .field("registered", &self.elements.lock().unwrap().len())
            .field("calls", &self.call_log.lock().unwrap().len())
            .finish()
    }
}

/// Scriptable element for tests
///
/// State mutations are observable through accessors: clicks toggle the
/// selected flag and are counted, `clear`/`send_keys` edit the `value`
/// attribute and keep a typed-text log. `fail_stale(n)` arms the element to
/// fail its next `n` operations with a stale fault.
pub struct MockElement {
    tag: String,
    text: Mutex<String>,
    attributes: Mutex<HashMap<String, String>>,
    selected: Mutex<bool>,
    displayed: bool,
    enabled: bool,
    clicks: AtomicUsize,
    clears: AtomicUsize,
    typed: Mutex<Vec<String>>,
    stale_left: AtomicUsize,
    children: Mutex<HashMap<Locator, Vec<Arc<MockElement>>>>,
    child_calls: Mutex<Vec<String>>,
}

impl MockElement {
    /// Create an element with the given tag name
    #[must_use]
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            text: Mutex::new(String::new()),
            attributes: Mutex::new(HashMap::new()),
            selected: Mutex::new(false),
            displayed: true,
            enabled: true,
            clicks: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
            typed: Mutex::new(Vec::new()),
            stale_left: AtomicUsize::new(0),
            children: Mutex::new(HashMap::new()),
            child_calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the visible text
    #[must_use]
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        *self.text.lock().unwrap() = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute<K: Into<String>, V: Into<String>>(self, name: K, value: V) -> Self {
        self.attributes
            .lock()
            .unwrap()
            .insert(name.into(), value.into());
        self
    }

    /// Set the selected flag
    #[must_use]
    pub fn with_selected(self, selected: bool) -> Self {
        *self.selected.lock().unwrap() = selected;
        self
    }

    /// Set the displayed flag
    #[must_use]
    pub const fn with_displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    /// Set the enabled flag
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Arm the element to fail its next `n` operations with a stale fault
    pub fn fail_stale(&self, n: usize) {
        self.stale_left.store(n, Ordering::SeqCst);
    }

    /// Register child elements reachable via scoped lookup
    pub fn add_child(&self, locator: Locator, elements: Vec<Arc<MockElement>>) {
        self.children.lock().unwrap().insert(locator, elements);
    }

    /// How many times the element was clicked
    #[must_use]
    pub fn click_count(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    /// How many times the element was cleared
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Text chunks sent via `send_keys`, in order
    #[must_use]
    pub fn typed(&self) -> Vec<String> {
        self.typed.lock().unwrap().clone()
    }

    /// Scoped lookups issued against this element, in order
    #[must_use]
    pub fn child_lookups(&self) -> Vec<String> {
        self.child_calls.lock().unwrap().clone()
    }

    fn guard(&self) -> PaginaResult<()> {
        // consume one scripted stale fault if armed
        let mut left = self.stale_left.load(Ordering::SeqCst);
        while left > 0 {
            match self.stale_left.compare_exchange(
                left,
                left - 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => {
                    return Err(PaginaError::StaleReference {
                        strategy: Strategy::Id,
                        value: String::from("<mock>"),
                        attempts: 1,
                    })
                }
                Err(current) => left = current,
            }
        }
        Ok(())
    }
}

impl RawElement for MockElement {
    fn tag_name(&self) -> PaginaResult<String> {
        self.guard()?;
        Ok(self.tag.clone())
    }

    fn text(&self) -> PaginaResult<String> {
        self.guard()?;
        Ok(self.text.lock().unwrap().clone())
    }

    fn attribute(&self, name: &str) -> PaginaResult<Option<String>> {
        self.guard()?;
        Ok(self.attributes.lock().unwrap().get(name).cloned())
    }

    fn click(&self) -> PaginaResult<()> {
        self.guard()?;
        self.clicks.fetch_add(1, Ordering::SeqCst);
        let mut selected = self.selected.lock().unwrap();
        *selected = !*selected;
        Ok(())
    }

    fn clear(&self) -> PaginaResult<()> {
        self.guard()?;
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.attributes
            .lock()
            .unwrap()
            .insert("value".to_string(), String::new());
        Ok(())
    }

    fn send_keys(&self, text: &str) -> PaginaResult<()> {
        self.guard()?;
        self.typed.lock().unwrap().push(text.to_string());
        let mut attributes = self.attributes.lock().unwrap();
        let value = attributes.entry("value".to_string()).or_default();
        value.push_str(text);
        Ok(())
    }

    fn is_displayed(&self) -> PaginaResult<bool> {
        self.guard()?;
        Ok(self.displayed)
    }

    fn is_enabled(&self) -> PaginaResult<bool> {
        self.guard()?;
        Ok(self.enabled)
    }

    fn is_selected(&self) -> PaginaResult<bool> {
        self.guard()?;
        Ok(*self.selected.lock().unwrap())
    }

    fn find_one(&self, locator: &Locator) -> PaginaResult<RawRef> {
        self.guard()?;
        self.child_calls
            .lock()
            .unwrap()
            .push(format!("find_one: {locator}"));
        let children = self.children.lock().unwrap();
        children
            .get(locator)
            .and_then(|list| list.first())
            .map(|element| Arc::clone(element) as RawRef)
            .ok_or_else(|| PaginaError::not_found(locator))
    }

    fn find_many(&self, locator: &Locator) -> PaginaResult<Vec<RawRef>> {
        self.guard()?;
        self.child_calls
            .lock()
            .unwrap()
            .push(format!("find_many: {locator}"));
        let children = self.children.lock().unwrap();
        Ok(children
            .get(locator)
            .map(|list| {
                list.iter()
                    .map(|element| Arc::clone(element) as RawRef)
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for MockElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockElement")
            .field("tag", &self.tag)
            .field("displayed", &self.displayed)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

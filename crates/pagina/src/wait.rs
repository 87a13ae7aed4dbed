//! Polling waits over pages and arbitrary conditions.
//!
//! Waiting lives strictly above the element handle: the handle's stale retry
//! is bounded and immediate, while waits here poll a condition on a fixed
//! interval until it holds or a timeout elapses.

use std::thread;
use std::time::{Duration, Instant};

use crate::page::{Page, PageModel};
use crate::result::{PaginaError, PaginaResult};

/// Default wait timeout
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default poll interval between condition checks
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Timeout and poll interval for a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    timeout_ms: u64,
    poll_interval_ms: u64,
}

impl WaitOptions {
    /// Options with the default timeout and poll interval
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Set the timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the poll interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// The timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The poll interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// How long the condition took to hold
    pub elapsed: Duration,
    /// Description of the awaited condition
    pub waited_for: String,
}

/// Poll `condition` until it returns true or the timeout elapses
///
/// The condition is checked once immediately, so an already-true condition
/// returns without sleeping. On timeout the error carries `description`.
pub fn wait_until<F>(
    description: &str,
    mut condition: F,
    options: &WaitOptions,
) -> PaginaResult<WaitResult>
where
    F: FnMut() -> bool,
{
    let started = Instant::now();
    loop {
        if condition() {
            return Ok(WaitResult {
                elapsed: started.elapsed(),
                waited_for: description.to_string(),
            });
        }
        if started.elapsed() >= options.timeout() {
            return Err(PaginaError::Timeout {
                ms: options.timeout_ms,
                condition: description.to_string(),
            });
        }
        thread::sleep(options.poll_interval());
    }
}

/// Waits bound to a [`Page`]
pub struct WaitForPage<'a, M: PageModel> {
    page: &'a Page<M>,
    options: WaitOptions,
}

impl<M: PageModel> std::fmt::Debug for WaitForPage<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitForPage")
            .field("page", &self.page.model().label())
            .field("options", &self.options)
            .finish()
    }
}

impl<'a, M: PageModel> WaitForPage<'a, M> {
    /// Wait on `page` with default options
    #[must_use]
    pub fn new(page: &'a Page<M>) -> Self {
        Self {
            page,
            options: WaitOptions::new(),
        }
    }

    /// Override the wait options
    #[must_use]
    pub const fn with_options(mut self, options: WaitOptions) -> Self {
        self.options = options;
        self
    }

    /// Wait until the page validates
    pub fn to_appear(&self) -> PaginaResult<WaitResult> {
        let description = format!("{} to appear", self.page.model().label());
        wait_until(&description, || self.page.is_present(), &self.options)
    }

    /// Wait until the page stops validating
    pub fn to_disappear(&self) -> PaginaResult<WaitResult> {
        let description = format!("{} to disappear", self.page.model().label());
        wait_until(&description, || !self.page.is_present(), &self.options)
    }

    /// Wait until an arbitrary predicate over the page holds
    pub fn status<F>(&self, description: &str, mut predicate: F) -> PaginaResult<WaitResult>
    where
        F: FnMut(&Page<M>) -> bool,
    {
        wait_until(description, || predicate(self.page), &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use crate::model::{Descriptor, Field, Model};
    use crate::session::{MockElement, MockSession, Session};
    use std::sync::Arc;

    struct Banner {
        message: Field,
    }

    impl Default for Banner {
        fn default() -> Self {
            Self {
                message: Field::new(Locator::id("banner")),
            }
        }
    }

    impl Model for Banner {}

    impl PageModel for Banner {
        fn label(&self) -> &'static str {
            "banner"
        }

        fn required(&self) -> Vec<&Descriptor> {
            vec![self.message.descriptor()]
        }
    }

    fn immediate() -> WaitOptions {
        WaitOptions::new().with_timeout(0).with_poll_interval(1)
    }

    mod wait_until_tests {
        use super::*;

        #[test]
        fn test_true_condition_returns_without_sleeping() {
            let result = wait_until("always true", || true, &immediate()).unwrap();
            assert_eq!(result.waited_for, "always true");
            assert!(result.elapsed < Duration::from_millis(50));
        }

        #[test]
        fn test_timeout_carries_the_condition_text() {
            let err = wait_until("never true", || false, &immediate()).unwrap_err();
            match err {
                PaginaError::Timeout { ms, condition } => {
                    assert_eq!(ms, 0);
                    assert_eq!(condition, "never true");
                }
                other => panic!("expected timeout, got {other}"),
            }
        }

        #[test]
        fn test_condition_becoming_true_ends_the_wait() {
            let mut polls = 0;
            let options = WaitOptions::new().with_timeout(5_000).with_poll_interval(1);
            let result = wait_until(
                "third poll",
                || {
                    polls += 1;
                    polls >= 3
                },
                &options,
            )
            .unwrap();
            assert_eq!(result.waited_for, "third poll");
            assert_eq!(polls, 3);
        }
    }

    mod wait_for_page_tests {
        use super::*;

        #[test]
        fn test_to_appear_succeeds_for_a_present_page() {
            let session = Arc::new(MockSession::new());
            session.insert(Locator::id("banner"), Arc::new(MockElement::new("div")));

            let page = Page::<Banner>::open(Arc::clone(&session) as Arc<dyn Session>).unwrap();
            let result = WaitForPage::new(&page)
                .with_options(immediate())
                .to_appear()
                .unwrap();
            assert_eq!(result.waited_for, "banner to appear");
        }

        #[test]
        fn test_to_disappear_succeeds_once_validation_fails() {
            let session = Arc::new(MockSession::new());
            session.insert(Locator::id("banner"), Arc::new(MockElement::new("div")));

            let page = Page::<Banner>::open(Arc::clone(&session) as Arc<dyn Session>).unwrap();
            session.remove(&Locator::id("banner"));

            let result = WaitForPage::new(&page)
                .with_options(immediate())
                .to_disappear()
                .unwrap();
            assert_eq!(result.waited_for, "banner to disappear");
        }

        #[test]
        fn test_status_waits_on_a_page_predicate() {
            let session = Arc::new(MockSession::new());
            session.insert(
                Locator::id("banner"),
                Arc::new(MockElement::new("div").with_text("saved")),
            );

            let page = Page::<Banner>::open(Arc::clone(&session) as Arc<dyn Session>).unwrap();
            let result = WaitForPage::new(&page)
                .with_options(immediate())
                .status("banner reads saved", |page| {
                    page.instance()
                        .element(&page.model().message)
                        .and_then(|message| message.text())
                        .is_ok_and(|text| text == "saved")
                })
                .unwrap();
            assert_eq!(result.waited_for, "banner reads saved");
        }
    }
}

//! Page wrapper with init-time validation of required elements.

use std::fmt;
use std::sync::Arc;

use crate::model::{Descriptor, Instance, Model};
use crate::result::{PaginaError, PaginaResult};
use crate::session::Session;

/// A model describing a whole page
///
/// Beyond its fields, a page model names itself for diagnostics and lists
/// the descriptors that must resolve for the page to count as loaded.
pub trait PageModel: Model {
    /// Human-readable page label, used in validation errors
    fn label(&self) -> &'static str;

    /// Descriptors that must resolve for the page to count as loaded
    fn required(&self) -> Vec<&Descriptor>;
}

/// A page object validated at construction
///
/// [`Page::open`] probes every required descriptor once and fails with
/// [`PaginaError::PageValidation`] if any of them cannot be resolved, so a
/// wrong or half-loaded page is caught before any interaction with it.
pub struct Page<M: PageModel> {
    instance: Instance<M>,
}

impl<M: PageModel> Page<M> {
    /// Open a static page, validating its required elements
    pub fn open(session: Arc<dyn Session>) -> PaginaResult<Self> {
        let page = Self {
            instance: Instance::new(session),
        };
        page.validate()?;
        Ok(page)
    }

    /// Open a dynamic page for `identifier`, validating its required elements
    pub fn open_dynamic<S: Into<String>>(
        session: Arc<dyn Session>,
        identifier: S,
    ) -> PaginaResult<Self> {
        let page = Self {
            instance: Instance::with_identifier(session, identifier),
        };
        page.validate()?;
        Ok(page)
    }

    /// Probe every required descriptor once
    pub fn validate(&self) -> PaginaResult<()> {
        let model = self.instance.model();
        for descriptor in model.required() {
            self.instance
                .check(descriptor)
                .map_err(|source| PaginaError::PageValidation {
                    page: model.label().to_string(),
                    reason: source.to_string(),
                })?;
        }
        tracing::debug!(page = model.label(), "page validated");
        Ok(())
    }

    /// Whether the page currently validates
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.validate().is_ok()
    }

    /// The bound instance, for resolving the page's fields
    #[must_use]
    pub const fn instance(&self) -> &Instance<M> {
        &self.instance
    }

    /// The declared page model
    #[must_use]
    pub const fn model(&self) -> &M {
        self.instance.model()
    }
}

impl<M: PageModel> fmt::Debug for Page<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("label", &self.instance.model().label())
            .field("identifier", &self.instance.identifier())
            .finish()
    }
}

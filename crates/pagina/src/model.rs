//! Declarative page models: descriptors, fields, roots, and instances.
//!
//! A page model is plain data: a [`Model`] type holds [`Field`]s describing
//! where its elements live, and optionally a [`RootField`] scoping every
//! lookup. Nothing touches the browser at declaration time. Resolution
//! happens when an [`Instance`] (a model bound to a session, and for dynamic
//! models an identifier) is asked for an element, and every access issues
//! fresh lookups.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use pagina::{Field, Instance, Locator, MockElement, MockSession, Model, RootField};
//!
//! struct Login {
//!     root: RootField,
//!     username: Field,
//! }
//!
//! impl Default for Login {
//!     fn default() -> Self {
//!         Self {
//!             root: RootField::new(Locator::id("loginForm")),
//!             username: Field::new(Locator::id("loginForm_user")),
//!         }
//!     }
//! }
//!
//! impl Model for Login {
//!     fn root(&self) -> Option<&RootField> {
//!         Some(&self.root)
//!     }
//! }
//!
//! let session = Arc::new(MockSession::new());
//! let form = Arc::new(MockElement::new("form"));
//! form.add_child(Locator::id("loginForm_user"), vec![Arc::new(MockElement::new("input"))]);
//! session.insert(Locator::id("loginForm"), form);
//!
//! let page = Instance::<Login>::new(session);
//! let username = page.element(&page.model().username).unwrap();
//! assert_eq!(username.tag_name().unwrap(), "input");
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::element::Element;
use crate::locator::{Locator, Strategy};
use crate::result::{PaginaError, PaginaResult};
use crate::session::Session;
use crate::widgets::Helper;

/// The evaluation-free core of a field: where, how many, and whether dynamic
///
/// Descriptors are immutable after construction. A `dynamic` descriptor's
/// locator is a template interpolated with the instance identifier at access
/// time; `as_list` selects multi-element lookup. The two are mutually
/// exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    locator: Locator,
    as_list: bool,
    dynamic: bool,
}

impl Descriptor {
    fn new(locator: Locator, as_list: bool, dynamic: bool) -> PaginaResult<Self> {
        if as_list && dynamic {
            return Err(PaginaError::InvalidDescriptor {
                message: format!("'{locator}' cannot be both a list and dynamic"),
            });
        }
        Ok(Self {
            locator,
            as_list,
            dynamic,
        })
    }

    /// The declared locator (template, if dynamic)
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Whether the descriptor resolves to a list of elements
    #[must_use]
    pub const fn is_list(&self) -> bool {
        self.as_list
    }

    /// Whether the locator is interpolated with the instance identifier
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

/// Options for the checked [`Field::with_options`] constructor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Resolve to a list of elements
    pub as_list: bool,
    /// Interpolate the locator with the instance identifier
    pub dynamic: bool,
}

/// A declared element of a page model
///
/// `H` is the helper the resolved handle is wrapped in; it defaults to the
/// plain [`Element`]. Fields built with the infallible constructors are valid
/// by construction; [`Field::with_options`] checks arbitrary combinations.
pub struct Field<H: Helper = Element> {
    descriptor: Descriptor,
    _helper: PhantomData<fn() -> H>,
}

impl<H: Helper> Field<H> {
    /// A single-element field
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        Self {
            descriptor: Descriptor {
                locator,
                as_list: false,
                dynamic: false,
            },
            _helper: PhantomData,
        }
    }

    /// A multi-element field
    #[must_use]
    pub fn list(locator: Locator) -> Self {
        Self {
            descriptor: Descriptor {
                locator,
                as_list: true,
                dynamic: false,
            },
            _helper: PhantomData,
        }
    }

    /// A single-element field whose locator template takes the instance identifier
    #[must_use]
    pub fn dynamic(locator: Locator) -> Self {
        Self {
            descriptor: Descriptor {
                locator,
                as_list: false,
                dynamic: true,
            },
            _helper: PhantomData,
        }
    }

    /// Checked constructor, rejecting the list+dynamic combination
    pub fn with_options(
        strategy: Strategy,
        value: &str,
        options: FieldOptions,
    ) -> PaginaResult<Self> {
        let descriptor = Descriptor::new(
            Locator::new(strategy, value),
            options.as_list,
            options.dynamic,
        )?;
        Ok(Self {
            descriptor,
            _helper: PhantomData,
        })
    }

    /// The underlying descriptor
    #[must_use]
    pub const fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl<H: Helper> fmt::Debug for Field<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl<H: Helper> Clone for Field<H> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            _helper: PhantomData,
        }
    }
}

/// The model-scope root element declaration
///
/// When a model declares a root, every field lookup is scoped to the resolved
/// root element. The root itself always resolves at session scope. A dynamic
/// root's locator template takes the instance identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootField {
    locator: Locator,
    dynamic: bool,
}

impl RootField {
    /// A static root
    #[must_use]
    pub const fn new(locator: Locator) -> Self {
        Self {
            locator,
            dynamic: false,
        }
    }

    /// A root whose locator template takes the instance identifier
    #[must_use]
    pub const fn dynamic(locator: Locator) -> Self {
        Self {
            locator,
            dynamic: true,
        }
    }

    /// The declared locator (template, if dynamic)
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Whether the locator is interpolated with the instance identifier
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

/// A declarative page model
///
/// Implementations are plain data holding [`Field`]s (typically built in
/// `Default::default`). A model declaring a [`RootField`] scopes all its
/// field lookups under the resolved root.
pub trait Model: Default {
    /// Human-readable model name, used in diagnostics
    #[must_use]
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The model-scope root, if any
    fn root(&self) -> Option<&RootField> {
        None
    }
}

/// A model bound to a session, ready to resolve elements
///
/// Static instances carry no identifier; dynamic instances are constructed
/// with one, and it never changes afterwards. Instances hold no element
/// state, so they are cheap to build and safe to discard between accesses.
pub struct Instance<M: Model> {
    session: Arc<dyn Session>,
    model: M,
    identifier: Option<String>,
}

impl<M: Model> Instance<M> {
    /// Bind a static model instance to a session
    #[must_use]
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self {
            session,
            model: M::default(),
            identifier: None,
        }
    }

    /// Bind a dynamic model instance to a session with its identifier
    #[must_use]
    pub fn with_identifier<S: Into<String>>(session: Arc<dyn Session>, identifier: S) -> Self {
        Self {
            session,
            model: M::default(),
            identifier: Some(identifier.into()),
        }
    }

    /// The declared model
    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// The instance identifier, if this is a dynamic instance
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// The session this instance resolves through
    #[must_use]
    pub fn session(&self) -> Arc<dyn Session> {
        Arc::clone(&self.session)
    }

    /// Resolve a single-element field, wrapping the handle in its helper
    ///
    /// Fails with `InvalidDescriptor` if the field was declared as a list.
    pub fn element<H: Helper>(&self, field: &Field<H>) -> PaginaResult<H> {
        let descriptor = field.descriptor();
        if descriptor.is_list() {
            return Err(PaginaError::InvalidDescriptor {
                message: format!(
                    "'{}' is a list descriptor, use elements()",
                    descriptor.locator()
                ),
            });
        }
        let locator = self.effective_locator(descriptor)?;
        let raw = match self.root_element()? {
            Some(root) => root.find_one(&locator)?,
            None => Element::resolve(Arc::clone(&self.session), locator)?,
        };
        Ok(H::from_element(raw))
    }

    /// Resolve a multi-element field, wrapping each handle in its helper
    ///
    /// Zero matches yields an empty vec. Fails with `InvalidDescriptor` if
    /// the field was declared single.
    pub fn elements<H: Helper>(&self, field: &Field<H>) -> PaginaResult<Vec<H>> {
        let descriptor = field.descriptor();
        if !descriptor.is_list() {
            return Err(PaginaError::InvalidDescriptor {
                message: format!(
                    "'{}' is a single-element descriptor, use element()",
                    descriptor.locator()
                ),
            });
        }
        let locator = self.effective_locator(descriptor)?;
        let handles = match self.root_element()? {
            Some(root) => root.find_many(&locator)?,
            None => {
                let raws = self.session.find_many(&locator)?;
                raws.into_iter()
                    .map(|raw| Element::new(Arc::clone(&self.session), locator.clone(), raw))
                    .collect()
            }
        };
        Ok(handles.into_iter().map(H::from_element).collect())
    }

    /// Resolve a bare descriptor once, discarding the result
    ///
    /// Used by page validation to probe required elements with the same
    /// scoping and interpolation rules as field access.
    pub fn check(&self, descriptor: &Descriptor) -> PaginaResult<()> {
        let locator = self.effective_locator(descriptor)?;
        let scope = self.root_element()?;
        if descriptor.is_list() {
            match scope {
                Some(root) => {
                    root.find_many(&locator)?;
                }
                None => {
                    self.session.find_many(&locator)?;
                }
            }
        } else {
            match scope {
                Some(root) => {
                    root.find_one(&locator)?;
                }
                None => {
                    self.session.find_one(&locator)?;
                }
            }
        }
        Ok(())
    }

    fn effective_locator(&self, descriptor: &Descriptor) -> PaginaResult<Locator> {
        if !descriptor.is_dynamic() {
            return Ok(descriptor.locator().clone());
        }
        let identifier =
            self.identifier
                .as_deref()
                .ok_or_else(|| PaginaError::MissingIdentifier {
                    strategy: descriptor.locator().strategy(),
                    value: descriptor.locator().value().to_string(),
                })?;
        Ok(descriptor.locator().interpolate(identifier))
    }

    fn root_element(&self) -> PaginaResult<Option<Element>> {
        let Some(root) = self.model.root() else {
            return Ok(None);
        };
        let locator = if root.is_dynamic() {
            let identifier =
                self.identifier
                    .as_deref()
                    .ok_or_else(|| PaginaError::MissingIdentifier {
                        strategy: root.locator().strategy(),
                        value: root.locator().value().to_string(),
                    })?;
            root.locator().interpolate(identifier)
        } else {
            root.locator().clone()
        };
        Element::resolve(Arc::clone(&self.session), locator).map(Some)
    }
}

impl<M: Model> fmt::Debug for Instance<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("model", &self.model.name())
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl<M: Model> fmt::Display for Instance<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(id) => write!(f, "page model {} \"{id}\"", self.model.name()),
            None => write!(f, "page model {}", self.model.name()),
        }
    }
}

//! Locator strategies and values for element lookup.
//!
//! A [`Locator`] names where an element lives: a lookup [`Strategy`] paired
//! with a strategy-specific value. Locator values may carry one `%s` or `%d`
//! interpolation slot, filled in later from an instance identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lookup strategy for locating elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Match by element id attribute
    Id,
    /// Match by CSS selector
    Css,
    /// Match by XPath expression
    XPath,
    /// Match by class name
    ClassName,
    /// Match by name attribute
    Name,
    /// Match by tag name
    TagName,
    /// Match by exact link text
    LinkText,
    /// Match by partial link text
    PartialLinkText,
}

impl Strategy {
    /// Wire name of the strategy
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css selector",
            Self::XPath => "xpath",
            Self::ClassName => "class name",
            Self::Name => "name",
            Self::TagName => "tag name",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable strategy/value pair identifying where an element lives
///
/// The value may contain a single `%s` or `%d` slot. Such a locator is a
/// template and must be interpolated with an identifier before lookup.
///
/// # Examples
///
/// ```
/// use pagina::{Locator, Strategy};
///
/// let locator = Locator::id("loginForm_user");
/// assert_eq!(locator.strategy(), Strategy::Id);
/// assert!(!locator.is_template());
///
/// let row = Locator::xpath("//table[@id='vms']/tbody/tr[%d]");
/// assert_eq!(
///     row.interpolate("3").value(),
///     "//table[@id='vms']/tbody/tr[3]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator from a strategy and value
    pub fn new<S: Into<String>>(strategy: Strategy, value: S) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Locator matching by element id
    pub fn id<S: Into<String>>(value: S) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// Locator matching by CSS selector
    pub fn css<S: Into<String>>(value: S) -> Self {
        Self::new(Strategy::Css, value)
    }

    /// Locator matching by XPath expression
    pub fn xpath<S: Into<String>>(value: S) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Locator matching by class name
    pub fn class_name<S: Into<String>>(value: S) -> Self {
        Self::new(Strategy::ClassName, value)
    }

    /// Locator matching by name attribute
    pub fn name<S: Into<String>>(value: S) -> Self {
        Self::new(Strategy::Name, value)
    }

    /// Locator matching by tag name
    pub fn tag_name<S: Into<String>>(value: S) -> Self {
        Self::new(Strategy::TagName, value)
    }

    /// Locator matching by exact link text
    pub fn link_text<S: Into<String>>(value: S) -> Self {
        Self::new(Strategy::LinkText, value)
    }

    /// Locator matching by partial link text
    pub fn partial_link_text<S: Into<String>>(value: S) -> Self {
        Self::new(Strategy::PartialLinkText, value)
    }

    /// The lookup strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The strategy-specific value (or value template)
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the value contains an interpolation slot (`%s` or `%d`)
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.value.contains("%s") || self.value.contains("%d")
    }

    /// Fill the first interpolation slot with `identifier`
    ///
    /// A locator without a slot is returned unchanged.
    #[must_use]
    pub fn interpolate(&self, identifier: &str) -> Self {
        let slot = match (self.value.find("%s"), self.value.find("%d")) {
            (Some(s), Some(d)) => Some(s.min(d)),
            (Some(s), None) => Some(s),
            (None, Some(d)) => Some(d),
            (None, None) => None,
        };
        let Some(at) = slot else {
            return self.clone();
        };
        let mut value = String::with_capacity(self.value.len() + identifier.len());
        value.push_str(&self.value[..at]);
        value.push_str(identifier);
        value.push_str(&self.value[at + 2..]);
        Self {
            strategy: self.strategy,
            value,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

//! Form widget helpers layered over the resilient element handle.

use crate::element::Element;
use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};

/// Wraps a resolved [`Element`] in a richer, widget-specific interface
///
/// A model field declares its helper as the `Field` type parameter; the
/// resolution layer wraps the resilient handle at access time. `Element`
/// implements `Helper` as the identity, so fields default to plain handles.
pub trait Helper {
    /// Build the helper around a resolved handle
    fn from_element(element: Element) -> Self;
}

impl Helper for Element {
    fn from_element(element: Element) -> Self {
        element
    }
}

/// Text input field
#[derive(Debug)]
pub struct TextInput {
    element: Element,
}

impl TextInput {
    /// Current input value (the `value` attribute)
    pub fn value(&self) -> PaginaResult<String> {
        Ok(self.element.attribute("value")?.unwrap_or_default())
    }

    /// Replace the input value: clear, then type
    pub fn set_value(&self, text: &str) -> PaginaResult<()> {
        self.element.clear()?;
        self.element.send_keys(text)
    }

    /// The underlying resilient handle
    #[must_use]
    pub const fn element(&self) -> &Element {
        &self.element
    }
}

impl Helper for TextInput {
    fn from_element(element: Element) -> Self {
        Self { element }
    }
}

/// Checkbox input
///
/// `check`/`uncheck` click only when the state actually differs, so they are
/// safe to call unconditionally.
#[derive(Debug)]
pub struct Checkbox {
    element: Element,
}

impl Checkbox {
    /// Whether the box is currently checked
    pub fn is_checked(&self) -> PaginaResult<bool> {
        self.element.is_selected()
    }

    /// Ensure the box is checked
    pub fn check(&self) -> PaginaResult<()> {
        self.set(true)
    }

    /// Ensure the box is unchecked
    pub fn uncheck(&self) -> PaginaResult<()> {
        self.set(false)
    }

    /// Drive the box to the requested state
    pub fn set(&self, checked: bool) -> PaginaResult<()> {
        if self.is_checked()? != checked {
            self.element.click()?;
        }
        Ok(())
    }

    /// The underlying resilient handle
    #[must_use]
    pub const fn element(&self) -> &Element {
        &self.element
    }
}

impl Helper for Checkbox {
    fn from_element(element: Element) -> Self {
        Self { element }
    }
}

/// `<select>` drop-down
#[derive(Debug)]
pub struct SelectBox {
    element: Element,
}

impl SelectBox {
    /// Visible texts of all options
    pub fn options(&self) -> PaginaResult<Vec<String>> {
        self.option_elements()?
            .iter()
            .map(Element::text)
            .collect()
    }

    /// Visible texts of the currently selected options
    pub fn selected(&self) -> PaginaResult<Vec<String>> {
        let mut texts = Vec::new();
        for option in self.option_elements()? {
            if option.is_selected()? {
                texts.push(option.text()?);
            }
        }
        Ok(texts)
    }

    /// Select the option whose visible text equals `text`
    pub fn select(&self, text: &str) -> PaginaResult<()> {
        for option in self.option_elements()? {
            if option.text()? == text {
                return option.click();
            }
        }
        Err(PaginaError::NotFound {
            strategy: crate::Strategy::TagName,
            value: format!("option with visible text '{text}'"),
        })
    }

    /// The underlying resilient handle
    #[must_use]
    pub const fn element(&self) -> &Element {
        &self.element
    }

    fn option_elements(&self) -> PaginaResult<Vec<Element>> {
        self.element.find_many(&Locator::tag_name("option"))
    }
}

impl Helper for SelectBox {
    fn from_element(element: Element) -> Self {
        Self { element }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MockElement, MockSession, Session};
    use std::sync::Arc;

    fn wrap<H: Helper>(session: &Arc<MockSession>, locator: Locator) -> H {
        let shared: Arc<dyn Session> = Arc::clone(session) as Arc<dyn Session>;
        H::from_element(Element::resolve(shared, locator).unwrap())
    }

    mod text_input_tests {
        use super::*;

        #[test]
        fn test_set_value_clears_then_types() {
            let session = Arc::new(MockSession::new());
            let mock = Arc::new(MockElement::new("input").with_attribute("value", "old"));
            session.insert(Locator::id("user"), Arc::clone(&mock));

            let input: TextInput = wrap(&session, Locator::id("user"));
            input.set_value("secret").unwrap();

            assert_eq!(mock.clear_count(), 1);
            assert_eq!(mock.typed(), vec!["secret"]);
            assert_eq!(input.value().unwrap(), "secret");
        }

        #[test]
        fn test_value_of_blank_input_is_empty() {
            let session = Arc::new(MockSession::new());
            session.insert(Locator::id("user"), Arc::new(MockElement::new("input")));

            let input: TextInput = wrap(&session, Locator::id("user"));
            assert_eq!(input.value().unwrap(), "");
        }
    }

    mod checkbox_tests {
        use super::*;

        #[test]
        fn test_check_and_uncheck_are_idempotent() {
            let session = Arc::new(MockSession::new());
            let mock = Arc::new(MockElement::new("input"));
            session.insert(Locator::id("agree"), Arc::clone(&mock));

            let checkbox: Checkbox = wrap(&session, Locator::id("agree"));
            checkbox.check().unwrap();
            checkbox.check().unwrap();
            assert!(checkbox.is_checked().unwrap());
            assert_eq!(mock.click_count(), 1);

            checkbox.uncheck().unwrap();
            checkbox.uncheck().unwrap();
            assert!(!checkbox.is_checked().unwrap());
            assert_eq!(mock.click_count(), 2);
        }
    }

    mod select_box_tests {
        use super::*;

        fn seeded_select(session: &Arc<MockSession>) -> (Arc<MockElement>, Vec<Arc<MockElement>>) {
            let select = Arc::new(MockElement::new("select"));
            let options = vec![
                Arc::new(MockElement::new("option").with_text("Fedora")),
                Arc::new(
                    MockElement::new("option")
                        .with_text("Debian")
                        .with_selected(true),
                ),
                Arc::new(MockElement::new("option").with_text("NixOS")),
            ];
            select.add_child(Locator::tag_name("option"), options.clone());
            session.insert(Locator::id("distro"), Arc::clone(&select));
            (select, options)
        }

        #[test]
        fn test_options_and_selected_read_visible_texts() {
            let session = Arc::new(MockSession::new());
            let _ = seeded_select(&session);

            let select: SelectBox = wrap(&session, Locator::id("distro"));
            assert_eq!(select.options().unwrap(), vec!["Fedora", "Debian", "NixOS"]);
            assert_eq!(select.selected().unwrap(), vec!["Debian"]);
        }

        #[test]
        fn test_select_clicks_the_matching_option() {
            let session = Arc::new(MockSession::new());
            let (_, options) = seeded_select(&session);

            let select: SelectBox = wrap(&session, Locator::id("distro"));
            select.select("NixOS").unwrap();
            assert_eq!(options[2].click_count(), 1);
            assert_eq!(options[0].click_count(), 0);
        }

        #[test]
        fn test_select_missing_option_is_not_found() {
            let session = Arc::new(MockSession::new());
            let _ = seeded_select(&session);

            let select: SelectBox = wrap(&session, Locator::id("distro"));
            let err = select.select("Arch").unwrap_err();
            assert!(err.is_not_found());
            assert!(err.to_string().contains("Arch"));
        }
    }
}

//! Pagina: declarative page objects with stale-safe element handles
//!
//! Pagina (Spanish: "page") structures browser test automation around page
//! models. A model declares WHERE its elements live as plain data; nothing
//! touches the browser until an element is accessed, and every access runs
//! through a handle that recovers from stale references on its own.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PAGINA Architecture                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐    ┌───────────┐    ┌───────────┐             │
//! │  │ Page      │    │ Instance  │    │ Element   │             │
//! │  │ Models    │───►│ (resolve  │───►│ (stale-   │──► Session  │
//! │  │ (data)    │    │  lazily)  │    │  safe)    │             │
//! │  └───────────┘    └───────────┘    └───────────┘             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser side is abstracted behind the [`Session`] trait; any driver
//! that can look elements up by [`Locator`] plugs in. Sessions are owned and
//! passed explicitly, never cached globally.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod container;
mod element;
mod locator;
mod model;
mod page;
mod result;
mod session;
mod wait;
mod widgets;

pub use container::{Container, Rows};
pub use element::{Element, MAX_REFRESH_ATTEMPTS};
pub use locator::{Locator, Strategy};
pub use model::{Descriptor, Field, FieldOptions, Instance, Model, RootField};
pub use page::{Page, PageModel};
pub use result::{PaginaError, PaginaResult};
pub use session::{MockElement, MockSession, RawElement, RawRef, Session};
pub use wait::{
    wait_until, WaitForPage, WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
pub use widgets::{Checkbox, Helper, SelectBox, TextInput};

/// Convenience re-exports for test code
pub mod prelude {
    pub use super::container::*;
    pub use super::element::*;
    pub use super::locator::*;
    pub use super::model::*;
    pub use super::page::*;
    pub use super::result::*;
    pub use super::session::*;
    pub use super::wait::*;
    pub use super::widgets::*;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    fn init_tracing() {
        use tracing_subscriber::EnvFilter;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    mod login_scenario_tests {
        use super::*;

        struct LoginPage {
            root: RootField,
            username: Field,
            password: Field<TextInput>,
            submit: Field,
        }

        impl Default for LoginPage {
            fn default() -> Self {
                Self {
                    root: RootField::new(Locator::id("loginForm")),
                    username: Field::new(Locator::id("loginForm_user")),
                    password: Field::new(Locator::id("loginForm_pass")),
                    submit: Field::new(Locator::css("button[type=submit]")),
                }
            }
        }

        impl Model for LoginPage {
            fn root(&self) -> Option<&RootField> {
                Some(&self.root)
            }
        }

        impl PageModel for LoginPage {
            fn label(&self) -> &'static str {
                "login page"
            }

            fn required(&self) -> Vec<&Descriptor> {
                vec![
                    self.username.descriptor(),
                    self.password.descriptor(),
                    self.submit.descriptor(),
                ]
            }
        }

        struct Fixture {
            session: Arc<MockSession>,
            username: Arc<MockElement>,
            password: Arc<MockElement>,
            submit: Arc<MockElement>,
        }

        fn fixture() -> Fixture {
            init_tracing();
            let session = Arc::new(MockSession::new());
            let form = Arc::new(MockElement::new("form"));
            let username = Arc::new(MockElement::new("input"));
            let password = Arc::new(MockElement::new("input").with_attribute("value", "old"));
            let submit = Arc::new(MockElement::new("button").with_text("Log in"));
            form.add_child(Locator::id("loginForm_user"), vec![Arc::clone(&username)]);
            form.add_child(Locator::id("loginForm_pass"), vec![Arc::clone(&password)]);
            form.add_child(
                Locator::css("button[type=submit]"),
                vec![Arc::clone(&submit)],
            );
            session.insert(Locator::id("loginForm"), form);
            Fixture {
                session,
                username,
                password,
                submit,
            }
        }

        #[test]
        fn test_login_flow_end_to_end() {
            let fx = fixture();
            let page =
                Page::<LoginPage>::open(Arc::clone(&fx.session) as Arc<dyn Session>).unwrap();

            let username = page.instance().element(&page.model().username).unwrap();
            username.send_keys("admin").unwrap();

            let password = page.instance().element(&page.model().password).unwrap();
            password.set_value("secret").unwrap();

            page.instance()
                .element(&page.model().submit)
                .unwrap()
                .click()
                .unwrap();

            assert_eq!(fx.username.typed(), vec!["admin"]);
            assert_eq!(fx.password.clear_count(), 1);
            assert_eq!(fx.password.typed(), vec!["secret"]);
            assert_eq!(fx.submit.click_count(), 1);
        }

        #[test]
        fn test_field_access_is_scoped_to_the_form_root() {
            let fx = fixture();
            let page =
                Page::<LoginPage>::open(Arc::clone(&fx.session) as Arc<dyn Session>).unwrap();

            fx.session.insert(
                Locator::id("loginForm_user"),
                Arc::new(MockElement::new("input").with_text("decoy")),
            );

            let username = page.instance().element(&page.model().username).unwrap();
            assert_eq!(username.text().unwrap(), "");
        }

        #[test]
        fn test_typing_survives_a_rerendered_form() {
            let fx = fixture();
            let page =
                Page::<LoginPage>::open(Arc::clone(&fx.session) as Arc<dyn Session>).unwrap();

            let username = page.instance().element(&page.model().username).unwrap();
            fx.username.fail_stale(2);
            fx.session
                .insert(Locator::id("loginForm_user"), Arc::clone(&fx.username));

            username.send_keys("admin").unwrap();
            assert_eq!(fx.username.typed(), vec!["admin"]);
        }
    }
}

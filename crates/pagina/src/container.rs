//! Iteration over repeated page structures (tables, tiles, lists).

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::element::Element;
use crate::model::{Field, Instance, Model};
use crate::result::{PaginaError, PaginaResult};
use crate::session::Session;

/// A model describing a repeated structure
///
/// The container declares a list field matching one element per row, and
/// names the dynamic row model produced per entry. A container whose `rows`
/// returns `None` never had its collection declared and is not iterable.
pub trait Container: Model {
    /// The dynamic model each row is viewed through
    type Row: Model;

    /// The list field matching one element per row
    fn rows(&self) -> Option<&Field<Element>>;
}

impl<C: Container> Instance<C> {
    /// Number of rows currently present
    pub fn row_count(&self) -> PaginaResult<usize> {
        let field = self.rows_field()?;
        Ok(self.elements(field)?.len())
    }

    /// Iterate over the container's rows as bound row-model instances
    ///
    /// The row count is captured once, here. Each yielded
    /// [`Instance`] carries a 1-based position as its identifier, so row
    /// elements resolve lazily and stay fresh; rows shifting underneath a
    /// live iterator are the caller's concern.
    pub fn rows(&self) -> PaginaResult<Rows<C::Row>> {
        let count = self.row_count()?;
        Ok(Rows {
            session: self.session(),
            next: 1,
            count,
            _row: PhantomData,
        })
    }

    fn rows_field(&self) -> PaginaResult<&Field<Element>> {
        self.model()
            .rows()
            .ok_or_else(|| PaginaError::RowsNotInitialized {
                model: self.model().name().to_string(),
            })
    }
}

/// Finite, forward-only iterator of row instances
///
/// Yields `Instance<R>` values with identifiers `"1"` through `"N"`, where
/// `N` was the row count when the iterator was built.
pub struct Rows<R: Model> {
    session: Arc<dyn Session>,
    next: usize,
    count: usize,
    _row: PhantomData<fn() -> R>,
}

impl<R: Model> Iterator for Rows<R> {
    type Item = Instance<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.count {
            return None;
        }
        let instance =
            Instance::<R>::with_identifier(Arc::clone(&self.session), self.next.to_string());
        self.next += 1;
        Some(instance)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.next - 1);
        (remaining, Some(remaining))
    }
}

impl<R: Model> ExactSizeIterator for Rows<R> {}

impl<R: Model> fmt::Debug for Rows<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("next", &self.next)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

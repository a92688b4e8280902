//! # Result Cursors
//!
//! Range, rich-query and history results arrive through platform-side
//! cursors. They are sequential, forward-only and cannot be restarted, and
//! each open cursor holds resources on the peer until it is closed.
//!
//! `Cursor` wraps a [`CursorSource`] and guarantees the source is closed
//! exactly once: explicitly through [`Cursor::close()`], which reports a
//! close failure to the caller, or implicitly on drop, which logs it. Early
//! returns through `?` therefore cannot leak a cursor.

use tfc_core::LedgerError;

/// A backend producing results for a [`Cursor`].
pub trait CursorSource<T> {
    /// The next result, or `None` once the result set is exhausted.
    fn advance(&mut self) -> Option<Result<T, LedgerError>>;

    /// Release backend resources. Called at most once.
    fn close(&mut self) -> Result<(), LedgerError>;
}

/// A forward-only, release-on-drop result cursor.
pub struct Cursor<'a, T> {
    source: Box<dyn CursorSource<T> + 'a>,
    closed: bool,
}

impl<'a, T> Cursor<'a, T> {
    /// Wrap a backend source.
    pub fn new(source: impl CursorSource<T> + 'a) -> Self {
        Self {
            source: Box::new(source),
            closed: false,
        }
    }

    /// Close the cursor, surfacing any release failure.
    pub fn close(mut self) -> Result<(), LedgerError> {
        self.release()
    }

    /// Whether the cursor has been released.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn release(&mut self) -> Result<(), LedgerError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.close()
    }
}

impl<T> Iterator for Cursor<'_, T> {
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.source.advance()
    }
}

impl<T> Drop for Cursor<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(error = %e, "failed to release ledger cursor");
        }
    }
}

impl<T> std::fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor").field("closed", &self.closed).finish()
    }
}

/// A source over results that are already materialized.
#[derive(Debug)]
pub struct VecSource<T> {
    items: std::vec::IntoIter<T>,
}

impl<T> VecSource<T> {
    /// Serve the given results in order.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl<T> CursorSource<T> for VecSource<T> {
    fn advance(&mut self) -> Option<Result<T, LedgerError>> {
        self.items.next().map(Ok)
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        Ok(())
    }
}

use crate::record::Record;

/// Read contract for the materialized key→record view.
///
/// The view is derived, never independently stored: it is the fold of all
/// admitted operations for each key, latest wins, with DEL leaving no
/// current record. The admission gate evaluates ownership against this
/// contract, and the empty-query search path enumerates through it.
pub trait StoreView {
    /// The current record for a key, if one exists.
    fn get(&self, key: &str) -> Option<Record>;

    /// All current records, in underlying store order.
    fn all(&self) -> Vec<Record>;
}

impl<T: StoreView + ?Sized> StoreView for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<Record> {
        (**self).get(key)
    }

    fn all(&self) -> Vec<Record> {
        (**self).all()
    }
}

/// Empty view: no key has a current record. Useful as the genesis state
/// for replay and as a base case in gate tests.
pub struct EmptyView;

impl StoreView for EmptyView {
    fn get(&self, _key: &str) -> Option<Record> {
        None
    }

    fn all(&self) -> Vec<Record> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_has_nothing() {
        assert!(EmptyView.get("anything").is_none());
        assert!(EmptyView.all().is_empty());
    }
}

use crate::error::GraphError;
use std::fmt::Debug;

/// A linked sequence of arena records addressed by handle.
///
/// Vertex order and each vertex's arc order are both chains. The search
/// helpers below are written once against this trait and instantiated for
/// both.
pub(crate) trait Chain {
    /// Handle addressing a record in the arena.
    type Handle: Copy + Debug;
    /// The record type stored behind a handle.
    type Node;

    /// Resolves a handle to its record, or `None` if the slot is vacant.
    fn resolve(&self, handle: Self::Handle) -> Option<&Self::Node>;

    /// Returns the handle of the record following `node`, if any.
    fn next(&self, node: &Self::Node) -> Option<Self::Handle>;
}

/// Walks `chain` from `start` until `matches` accepts a record or the chain ends.
///
/// Returns the handle of the first match. A link pointing at a vacant slot is
/// reported as [`GraphError::Corrupted`] instead of being treated as the end.
pub(crate) fn linear_search<C, F>(
    chain: &C,
    start: Option<C::Handle>,
    mut matches: F,
) -> Result<Option<C::Handle>, GraphError>
where
    C: Chain,
    F: FnMut(&C::Node) -> bool,
{
    let mut cursor = start;
    while let Some(handle) = cursor {
        let Some(node) = chain.resolve(handle) else {
            #[cfg(feature = "logging")]
            log::warn!("dangling link to {handle:?} during linear search");
            return Err(GraphError::Corrupted(format!(
                "link points at vacant slot {handle:?}"
            )));
        };
        if matches(node) {
            return Ok(Some(handle));
        }
        cursor = chain.next(node);
    }
    Ok(None)
}

/// Visits every record of `chain` from `start`, in link order.
pub(crate) fn walk<C, F>(chain: &C, start: Option<C::Handle>, mut visit: F) -> Result<(), GraphError>
where
    C: Chain,
    F: FnMut(C::Handle, &C::Node),
{
    // Driving the search with a predicate that never matches gives a full walk,
    // but the predicate does not see handles, so keep our own cursor alongside.
    let mut cursor = start;
    linear_search(chain, start, |node| {
        if let Some(handle) = cursor {
            visit(handle, node);
        }
        cursor = chain.next(node);
        false
    })?;
    Ok(())
}

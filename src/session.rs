//! Editing state.
//!
//! [`EditSession`](crate::EditSession) is the mutable state behind the editor controls; it hands
//! the pipeline an immutable [`EditSnapshot`](crate::EditSnapshot) at export time.
//! [`EditDocument`](crate::EditDocument) describes a whole edit as JSON.

pub(crate) mod document;
pub(crate) mod editor;
pub(crate) mod snapshot;

//! XML comments module
//!
//! This module gathers the XML documentation comments files of a build into one
//! working set. It handles:
//! 1. Documentation identifiers (`T:`, `M:`, ... IDs) and their namespaces
//! 2. Loading, editing and saving individual comments files
//! 3. Lookups, namespace placeholder rewrites and `cref` scanning across all files

pub mod comment_collection;
pub mod comment_source;
pub mod doc_id;
pub mod error;
pub mod xml_tree;
pub mod xml_utils;

pub use comment_collection::CommentCollection;
pub use comment_source::{CommentSource, MemberEntry, MemberLocation};
pub use doc_id::{DocId, IdKind};
pub use error::{DocsError, DocsResult, SaveFailure, XmlTreeError};

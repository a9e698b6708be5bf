//! A single XML comments file
//!
//! Owns the parsed tree of one `doc/members` file together with a lookup index
//! from member name to its position in the members container, and tracks
//! whether anything changed since it was loaded.

use std::collections::HashMap;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use super::error::{DocsError, DocsResult, IoContext, XmlTreeError};
use super::doc_id::rewrite_namespace_placeholder;
use super::xml_tree::{XmlDocument, XmlElement, XmlNode};

/// Root element of an XML comments file
pub const DOC_ELEMENT: &str = "doc";
/// Container holding the `member` entries
pub const MEMBERS_ELEMENT: &str = "members";
/// One documented member
pub const MEMBER_ELEMENT: &str = "member";
/// Attribute holding a member's identifier
pub const NAME_ATTRIBUTE: &str = "name";

/// Member name to index in the members container's `children`
type MemberIndex = HashMap<String, usize>;

/// Where a member entry lives inside a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberLocation {
    /// Position of the source in the collection
    pub source: usize,
    /// Index of the entry in the members container's children
    pub position: usize,
}

/// Mutable handle to a member entry
///
/// Reading through the handle leaves the source untouched. Any mutable access
/// marks the owning source dirty and drops its lookup index, since the entry's
/// name may change.
pub struct MemberEntry<'a> {
    element: &'a mut XmlElement,
    dirty: &'a mut bool,
    index: &'a mut Option<MemberIndex>,
    location: MemberLocation,
}

impl MemberEntry<'_> {
    pub fn location(&self) -> MemberLocation {
        self.location
    }
}

impl Deref for MemberEntry<'_> {
    type Target = XmlElement;

    fn deref(&self) -> &XmlElement {
        &*self.element
    }
}

impl DerefMut for MemberEntry<'_> {
    fn deref_mut(&mut self) -> &mut XmlElement {
        *self.dirty = true;
        *self.index = None;
        &mut *self.element
    }
}

/// One loaded XML comments file
#[derive(Debug)]
pub struct CommentSource {
    origin_path: PathBuf,
    document: XmlDocument,
    /// Index of the members container in the root's children
    members_slot: usize,
    index: Option<MemberIndex>,
    is_dirty: bool,
}

impl CommentSource {
    /// Read and parse the comments file at `path`
    pub fn load(path: impl AsRef<Path>) -> DocsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_path_context(path)?;
        let source = Self::from_content(path, &content)?;
        log::info!(
            "Loaded comments file {} ({} members)",
            path.display(),
            source.member_count()
        );
        Ok(source)
    }

    /// Build a source from in-memory content, e.g. comments injected by a plug-in
    ///
    /// `path` is where the content will be written by [`CommentSource::save`].
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> DocsResult<Self> {
        let origin_path = path.into();
        let invalid = |source: XmlTreeError| DocsError::InvalidDocument {
            path: origin_path.clone(),
            source,
        };

        let document = XmlDocument::parse(content).map_err(invalid)?;
        if document.root.name() != DOC_ELEMENT {
            return Err(invalid(XmlTreeError::Structure(format!(
                "root element is <{}>, expected <{}>",
                document.root.name(),
                DOC_ELEMENT
            ))));
        }

        let members_slot = (0..document.root.children.len())
            .find(|&i| {
                document
                    .root
                    .element_at(i)
                    .is_some_and(|e| e.name() == MEMBERS_ELEMENT)
            })
            .ok_or_else(|| {
                invalid(XmlTreeError::Structure(format!(
                    "missing <{}> container",
                    MEMBERS_ELEMENT
                )))
            })?;

        let mut source = Self {
            origin_path,
            document,
            members_slot,
            index: None,
            is_dirty: false,
        };
        source.ensure_index();
        Ok(source)
    }

    pub fn origin_path(&self) -> &Path {
        &self.origin_path
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// Name of the documented assembly from `doc/assembly/name`
    pub fn assembly_name(&self) -> Option<String> {
        let name = self.document.root.child("assembly")?.child("name")?;
        let text: String = name
            .children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(raw) => Some(raw.as_str()),
                _ => None,
            })
            .collect();
        quick_xml::escape::unescape(text.trim())
            .ok()
            .map(|s| s.into_owned())
    }

    /// The `members` container
    pub fn members(&self) -> &XmlElement {
        match self.document.root.element_at(self.members_slot) {
            Some(members) => members,
            None => unreachable!("members container is checked when the source is created"),
        }
    }

    /// Mutable access to the `members` container; marks the source dirty
    pub fn members_mut(&mut self) -> &mut XmlElement {
        self.is_dirty = true;
        self.index = None;
        self.members_container_mut()
    }

    fn members_container_mut(&mut self) -> &mut XmlElement {
        match self.document.root.element_at_mut(self.members_slot) {
            Some(members) => members,
            None => unreachable!("members container is checked when the source is created"),
        }
    }

    /// Member entries in document order
    pub fn member_entries(&self) -> impl Iterator<Item = &XmlElement> {
        self.members()
            .child_elements()
            .filter(|e| e.name() == MEMBER_ELEMENT)
    }

    pub fn member_count(&self) -> usize {
        self.member_entries().count()
    }

    /// Position of the first entry named `name`
    pub fn member_position(&self, name: &str) -> Option<usize> {
        match &self.index {
            Some(index) => index.get(name).copied(),
            None => self.scan_for_member(name),
        }
    }

    pub fn find_member(&self, name: &str) -> Option<&XmlElement> {
        self.member_position(name)
            .and_then(|position| self.members().element_at(position))
    }

    /// Rebuild the name index if it was dropped by a mutable access
    pub fn ensure_index(&mut self) {
        if self.index.is_some() {
            return;
        }

        let mut index = MemberIndex::new();
        for (position, node) in self.members().children.iter().enumerate() {
            if let XmlNode::Element(element) = node {
                if element.name() != MEMBER_ELEMENT {
                    continue;
                }
                if let Some(name) = element.attribute(NAME_ATTRIBUTE) {
                    index.entry(name.to_string()).or_insert(position);
                }
            }
        }
        self.index = Some(index);
    }

    fn scan_for_member(&self, name: &str) -> Option<usize> {
        let members = self.members();
        (0..members.children.len()).find(|&i| {
            members.element_at(i).is_some_and(|e| {
                e.name() == MEMBER_ELEMENT && e.attribute(NAME_ATTRIBUTE) == Some(name)
            })
        })
    }

    /// Handle to the entry at `position`, tagged with the source's collection slot
    pub(crate) fn entry_at(&mut self, source: usize, position: usize) -> Option<MemberEntry<'_>> {
        let members = self.document.root.element_at_mut(self.members_slot)?;
        let element = members.element_at_mut(position)?;
        Some(MemberEntry {
            element,
            dirty: &mut self.is_dirty,
            index: &mut self.index,
            location: MemberLocation { source, position },
        })
    }

    /// Append an empty `<member name="...">` entry and return its position
    pub fn add_member(&mut self, name: &str) -> usize {
        let mut member = XmlElement::new(MEMBER_ELEMENT);
        member.set_attribute(NAME_ATTRIBUTE, name);

        self.ensure_index();
        let position = self.members_container_mut().push_element(member);
        if let Some(index) = &mut self.index {
            index.entry(name.to_string()).or_insert(position);
        }
        self.is_dirty = true;
        position
    }

    /// Rename every `T:...NamespaceDoc` / `T:...NamespaceGroupDoc` entry to the
    /// namespace identifier it documents. Returns the number of rewritten entries.
    pub fn replace_namespace_doc_entries(&mut self) -> usize {
        let renames: Vec<(usize, String)> = self
            .members()
            .children
            .iter()
            .enumerate()
            .filter_map(|(position, node)| match node {
                XmlNode::Element(e) if e.name() == MEMBER_ELEMENT => {
                    let name = e.attribute(NAME_ATTRIBUTE)?;
                    if !name.starts_with("T:") {
                        return None;
                    }
                    rewrite_namespace_placeholder(name)
                        .map(|rewritten| (position, rewritten))
                }
                _ => None,
            })
            .collect();

        if renames.is_empty() {
            return 0;
        }

        let members = self.members_container_mut();
        for (position, rewritten) in &renames {
            if let Some(member) = members.element_at_mut(*position) {
                log::debug!(
                    "Rewriting {} to {}",
                    member.attribute(NAME_ATTRIBUTE).unwrap_or_default(),
                    rewritten
                );
                member.set_attribute(NAME_ATTRIBUTE, rewritten.as_str());
            }
        }
        self.is_dirty = true;
        self.index = None;
        self.ensure_index();
        renames.len()
    }

    /// Write the document back to its origin path if it changed
    ///
    /// Returns whether anything was written. The dirty flag is only cleared
    /// once the write succeeds.
    pub fn save(&mut self) -> DocsResult<bool> {
        if !self.is_dirty {
            return Ok(false);
        }

        fs::write(&self.origin_path, self.document.to_xml()).with_path_context(&self.origin_path)?;
        self.is_dirty = false;
        log::info!("Saved comments file {}", self.origin_path.display());
        Ok(true)
    }
}

#[cfg(test)]
#[path = "comment_source_tests.rs"]
mod tests;

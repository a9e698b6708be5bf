//! Collection of XML comments files used during a build
//!
//! Sources are kept in the order they were added. Lookups search them in that
//! order and take the first match; entries that have to be fabricated always go
//! into the first source.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use quick_xml::escape::escape;

use super::comment_source::{CommentSource, MemberEntry, MemberLocation};
use super::doc_id::namespace_from_cref;
use super::error::{DocsError, DocsResult, SaveFailure};
use super::xml_tree::XmlElement;

/// Tags whose presence means the inherited documentation tool has to run
pub const INHERITANCE_MARKER_TAGS: &[&str] =
    &["inheritdoc", "AttachedPropertyComments", "AttachedEventComments"];

/// Tags whose `cref` attribute is scanned for referenced namespaces
///
/// `permission` is deliberately absent: its references are never reported.
pub const CROSS_REFERENCE_TAGS: &[&str] = &["event", "exception", "inheritdoc", "see", "seealso"];

/// Attribute holding a cross-reference identifier
pub const CREF_ATTRIBUTE: &str = "cref";

/// Placeholder substituted with the project's unique ID by the configuration transform
pub const UNIQUE_ID_PLACEHOLDER: &str = "{@UniqueId}";

/// The comments files of one build
#[derive(Debug, Default)]
pub struct CommentCollection {
    sources: Vec<CommentSource>,
}

impl CommentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every file in `paths`, in order
    ///
    /// Any file that cannot be read or parsed aborts the whole collection.
    pub fn load<I, P>(paths: I) -> DocsResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let sources = paths
            .into_iter()
            .map(CommentSource::load)
            .collect::<DocsResult<Vec<_>>>()?;
        log::info!("Loaded {} comments file(s)", sources.len());
        Ok(Self { sources })
    }

    pub fn push(&mut self, source: CommentSource) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CommentSource> {
        self.sources.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommentSource> {
        self.sources.iter()
    }

    /// True if any member carries `inheritdoc`, `AttachedPropertyComments` or
    /// `AttachedEventComments` anywhere in its content
    pub fn contains_inherited_documentation(&self) -> bool {
        self.sources.iter().any(|source| {
            source
                .members()
                .descendants()
                .any(|e| INHERITANCE_MARKER_TAGS.contains(&e.name()))
        })
    }

    /// Save every dirty source
    ///
    /// A failing source does not stop the others from being written; all
    /// failures are reported together afterwards.
    pub fn save(&mut self) -> DocsResult<()> {
        let mut failures = Vec::new();

        for file in &mut self.sources {
            match file.save() {
                Ok(_) => {}
                Err(DocsError::Io { path, source }) => {
                    log::warn!("Unable to save comments file {}: {}", path.display(), source);
                    failures.push(SaveFailure { path, source });
                }
                Err(e) => return Err(e),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DocsError::Save { failures })
        }
    }

    /// Where the first entry named `identifier` lives, searching sources in order
    pub fn locate_member(&self, identifier: &str) -> Option<MemberLocation> {
        self.sources
            .iter()
            .enumerate()
            .find_map(|(source, file)| {
                file.member_position(identifier)
                    .map(|position| MemberLocation { source, position })
            })
    }

    /// Read-only lookup; never fabricates an entry
    pub fn find_member(&self, identifier: &str) -> Option<&XmlElement> {
        let location = self.locate_member(identifier)?;
        self.sources[location.source]
            .members()
            .element_at(location.position)
    }

    /// Find the entry whose `name` is exactly `identifier`, or add an empty one
    /// to the first source
    ///
    /// The identifier is not parsed; it is matched verbatim.
    pub fn find_or_create_member(&mut self, identifier: &str) -> DocsResult<MemberEntry<'_>> {
        if self.sources.is_empty() {
            return Err(DocsError::EmptyCollection);
        }

        for source in &mut self.sources {
            source.ensure_index();
        }

        let location = match self.locate_member(identifier) {
            Some(location) => location,
            None => {
                let first = &mut self.sources[0];
                let position = first.add_member(identifier);
                log::debug!(
                    "Added missing member {} to {}",
                    identifier,
                    first.origin_path().display()
                );
                MemberLocation {
                    source: 0,
                    position,
                }
            }
        };

        match self.sources[location.source].entry_at(location.source, location.position) {
            Some(entry) => Ok(entry),
            None => unreachable!("located member entries are always elements"),
        }
    }

    /// Convert `NamespaceDoc`/`NamespaceGroupDoc` type entries in every source into
    /// namespace and namespace group entries
    pub fn replace_namespace_doc_entries(&mut self) {
        for source in &mut self.sources {
            let count = source.replace_namespace_doc_entries();
            if count > 0 {
                log::info!(
                    "Converted {} namespace placeholder(s) in {}",
                    count,
                    source.origin_path().display()
                );
            }
        }
    }

    /// Render one reference line per source for a build configuration file
    ///
    /// With `for_inherited_docs` each line is a `<scan file="..." />` tag;
    /// otherwise a `<data files="..." />` tag with duplicate warnings off and the
    /// project comments group ID. Sources already under `working_folder`
    /// (compared case-insensitively) are written relative to it.
    pub fn comment_file_list(&self, working_folder: &str, for_inherited_docs: bool) -> String {
        let (tag, decorations) = if for_inherited_docs {
            ("scan file", String::new())
        } else {
            (
                "data files",
                format!(
                    " duplicateWarning=\"false\" groupId=\"Project_Comments_{}\"",
                    UNIQUE_ID_PLACEHOLDER
                ),
            )
        };

        let mut list = String::with_capacity(2048);
        for source in &self.sources {
            let origin = source.origin_path().to_string_lossy();
            let path = strip_prefix_ignore_case(&origin, working_folder).unwrap_or(&*origin);
            let _ = write!(
                list,
                "            <{}=\"{}\"{} />\r\n",
                tag,
                escape(path),
                decorations
            );
        }
        list
    }

    /// Distinct namespaces from `valid_namespaces` referenced by `cref`
    /// attributes, in the order they are first seen
    ///
    /// The scan is lazy and single-pass; call again to rescan.
    pub fn referenced_namespaces<'a>(
        &'a self,
        valid_namespaces: &'a HashSet<String>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let mut seen = HashSet::new();
        self.sources
            .iter()
            .flat_map(|source| cross_references(source))
            .filter_map(namespace_from_cref)
            .filter(move |ns| valid_namespaces.contains(*ns) && seen.insert(*ns))
    }
}

impl<'a> IntoIterator for &'a CommentCollection {
    type Item = &'a CommentSource;
    type IntoIter = std::slice::Iter<'a, CommentSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

/// `cref` values of the cross-reference tags in a source, in document order
fn cross_references(source: &CommentSource) -> impl Iterator<Item = &str> {
    source
        .document()
        .root
        .descendants()
        .filter(|e| CROSS_REFERENCE_TAGS.contains(&e.name()))
        .filter_map(|e| e.attribute(CREF_ATTRIBUTE))
}

/// `path` with `prefix` removed, if it starts with it ignoring ASCII case
fn strip_prefix_ignore_case<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let head = path.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &path[prefix.len()..])
}

#[cfg(test)]
#[path = "comment_collection_tests.rs"]
mod tests;

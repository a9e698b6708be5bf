//! Documentation identifiers
//!
//! Parses and canonicalizes the `Prefix:Dotted.Name(param,list)` strings that key
//! `member` entries in XML comments files and appear in `cref` attributes.

use std::fmt;

use super::error::{DocsError, DocsResult};

/// Type name used by source authors to attach comments to a namespace
pub const NAMESPACE_DOC_MARKER: &str = "NamespaceDoc";

/// Type name used by source authors to attach comments to a namespace group
pub const NAMESPACE_GROUP_DOC_MARKER: &str = "NamespaceGroupDoc";

/// The kind of entity an identifier names, selected by its one-letter prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// `T:`
    Type,
    /// `N:`
    Namespace,
    /// `G:`
    NamespaceGroup,
    /// `M:` methods, constructors and operators
    Method,
    /// `F:`
    Field,
    /// `P:`
    Property,
    /// `E:`
    Event,
    /// `R:`
    Resource,
    /// Any other prefix, kept as-is
    Unknown(char),
}

impl IdKind {
    pub fn from_prefix(prefix: char) -> Self {
        match prefix {
            'T' => IdKind::Type,
            'N' => IdKind::Namespace,
            'G' => IdKind::NamespaceGroup,
            'M' => IdKind::Method,
            'F' => IdKind::Field,
            'P' => IdKind::Property,
            'E' => IdKind::Event,
            'R' => IdKind::Resource,
            other => IdKind::Unknown(other),
        }
    }

    pub fn prefix(self) -> char {
        match self {
            IdKind::Type => 'T',
            IdKind::Namespace => 'N',
            IdKind::NamespaceGroup => 'G',
            IdKind::Method => 'M',
            IdKind::Field => 'F',
            IdKind::Property => 'P',
            IdKind::Event => 'E',
            IdKind::Resource => 'R',
            IdKind::Unknown(c) => c,
        }
    }

    /// Whether this kind names something contained in a type
    pub fn is_member(self) -> bool {
        matches!(
            self,
            IdKind::Method | IdKind::Field | IdKind::Property | IdKind::Event
        )
    }

    /// Namespace-like kinds name their target directly rather than something inside it
    fn is_namespace_like(self) -> bool {
        matches!(
            self,
            IdKind::Namespace | IdKind::NamespaceGroup | IdKind::Resource
        )
    }
}

/// A parsed documentation identifier
///
/// `parameters` is `None` when the identifier has no parameter list at all and
/// `Some(vec![])` for an explicit empty list (`M:Foo.Bar()`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocId {
    pub kind: IdKind,
    pub qualified_name: String,
    pub parameters: Option<Vec<String>>,
    /// Text after the closing parenthesis, e.g. `~System.Int32` on conversion operators
    pub suffix: Option<String>,
}

impl DocId {
    /// Parse a raw identifier such as `M:System.String.Join(System.String,System.String[])`
    pub fn parse(raw: &str) -> DocsResult<Self> {
        let mut chars = raw.chars();
        let prefix = chars
            .next()
            .ok_or_else(|| DocsError::malformed(raw, "identifier is empty"))?;
        if chars.next() != Some(':') {
            return Err(DocsError::malformed(raw, "missing ':' after the prefix"));
        }
        let body = chars.as_str();
        if body.is_empty() {
            return Err(DocsError::malformed(raw, "identifier body is empty"));
        }

        let (qualified_name, parameters, suffix) = match body.find('(') {
            Some(open) => {
                let (params, suffix) = parse_parameter_list(raw, &body[open..])?;
                (&body[..open], Some(params), suffix)
            }
            None => (body, None, None),
        };

        if qualified_name.is_empty() {
            return Err(DocsError::malformed(raw, "qualified name is empty"));
        }
        if qualified_name.starts_with('.') || qualified_name.ends_with('.') {
            return Err(DocsError::malformed(
                raw,
                "qualified name has a leading or trailing '.'",
            ));
        }

        Ok(Self {
            kind: IdKind::from_prefix(prefix),
            qualified_name: qualified_name.to_string(),
            parameters,
            suffix,
        })
    }

    /// The dotted name segments, outermost first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.qualified_name.split('.')
    }

    /// The namespace implied by this identifier
    ///
    /// Namespace, namespace group and resource identifiers return their whole
    /// name. Everything else drops the last dotted segment; a name without a dot
    /// is returned whole.
    pub fn containing_namespace(&self) -> &str {
        if self.kind.is_namespace_like() {
            return &self.qualified_name;
        }

        match self.qualified_name.rfind('.') {
            Some(dot) => &self.qualified_name[..dot],
            None => &self.qualified_name,
        }
    }

    /// Turn a `T:Some.Namespace.NamespaceDoc` placeholder into `N:Some.Namespace`
    /// (or `G:` for `NamespaceGroupDoc`)
    ///
    /// Returns `None` when this is not a placeholder type.
    pub fn namespace_placeholder_target(&self) -> Option<DocId> {
        if self.kind != IdKind::Type || self.parameters.is_some() {
            return None;
        }

        let (namespace, last) = self.qualified_name.rsplit_once('.')?;
        let kind = match last {
            NAMESPACE_DOC_MARKER => IdKind::Namespace,
            NAMESPACE_GROUP_DOC_MARKER => IdKind::NamespaceGroup,
            _ => return None,
        };

        Some(DocId {
            kind,
            qualified_name: namespace.to_string(),
            parameters: None,
            suffix: None,
        })
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.prefix(), self.qualified_name)?;
        if let Some(params) = &self.parameters {
            write!(f, "({})", params.join(","))?;
        }
        if let Some(suffix) = &self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for DocId {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocId::parse(s)
    }
}

/// Parse `(a,b{c,d},e[])...` into its top-level parameters and anything after `)`
fn parse_parameter_list(raw: &str, list: &str) -> DocsResult<(Vec<String>, Option<String>)> {
    let mut depth = 0usize;
    let mut close = None;

    for (i, c) in list.char_indices().skip(1) {
        match c {
            '(' | '{' | '[' => depth += 1,
            ')' if depth == 0 => {
                close = Some(i);
                break;
            }
            ')' | '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    let close = close.ok_or_else(|| DocsError::malformed(raw, "unterminated parameter list"))?;
    let suffix = &list[close + 1..];

    Ok((
        split_parameters(&list[1..close]),
        (!suffix.is_empty()).then(|| suffix.to_string()),
    ))
}

/// Split a parameter list on commas that are not nested in `{}`, `[]` or `()`
pub fn split_parameters(params: &str) -> Vec<String> {
    if params.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in params.char_indices() {
        match c {
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                result.push(params[start..i].to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    result.push(params[start..].to_string());

    result
}

/// Rewrite a raw `T:...NamespaceDoc`/`T:...NamespaceGroupDoc` identifier
///
/// Returns `None` when the identifier is not a namespace placeholder.
pub fn rewrite_namespace_placeholder(raw: &str) -> Option<String> {
    DocId::parse(raw)
        .ok()?
        .namespace_placeholder_target()
        .map(|id| id.to_string())
}

/// Extract the namespace a `cref` value points into
///
/// Values too short to be an identifier, without a `:` after the prefix, or
/// containing neither `.` nor `(` are rejected. Member references are reduced to
/// their containing type first; `R:`, `N:` and `T:` references are taken as-is.
pub fn namespace_from_cref(cref: &str) -> Option<&str> {
    let bytes = cref.as_bytes();
    if bytes.len() <= 2 || bytes[1] != b':' || !cref.contains(['.', '(']) {
        return None;
    }

    let mut id = cref.trim();
    let names_type_or_namespace = id
        .get(..2)
        .is_some_and(|p| ["R:", "N:", "T:"].iter().any(|x| p.eq_ignore_ascii_case(x)));

    if !names_type_or_namespace {
        if let Some(open) = id.find('(') {
            id = &id[..open];
        }
        if let Some(dot) = id.rfind('.') {
            id = &id[..dot];
        }
    }

    match id.rfind('.') {
        Some(dot) => id.get(2..dot),
        None => id.get(2..),
    }
}

#[cfg(test)]
#[path = "doc_id_tests.rs"]
mod tests;

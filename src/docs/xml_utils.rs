//! Helpers for XML text handled outside the comment collection
//!
//! Build component configurations are edited as raw XML and only need a
//! well-formedness check. Help collection files carry a DOCTYPE with a SYSTEM
//! reference that has to be dropped before they can be loaded.

use regex::Regex;

use super::error::XmlTreeError;
use super::xml_tree::XmlDocument;

/// Check that a component configuration is a well-formed, single-rooted document
pub fn check_configuration(xml: &str) -> Result<(), XmlTreeError> {
    XmlDocument::parse(xml).map(|_| ())
}

/// Remove the `SYSTEM "..."` part of a DOCTYPE declaration, keeping the declaration itself
///
/// `<!DOCTYPE HelpCollection SYSTEM "ms-help://hx/resources/HelpCollection.DTD">`
/// becomes `<!DOCTYPE HelpCollection>`.
pub fn strip_doctype_system_id(content: &str) -> String {
    let re = Regex::new(r#"(?i)(<\s*!DOCTYPE \w+)(\s*SYSTEM\s*".*?")(>)"#)
        .expect("Failed to compile DOCTYPE regex");
    re.replace_all(content, "$1$3").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_configuration() {
        assert!(check_configuration(r#"<configuration><copy base="x" /></configuration>"#).is_ok());
        assert!(check_configuration("<configuration><copy></configuration>").is_err());
        assert!(check_configuration("<a /><b />").is_err());
        assert!(check_configuration("").is_err());
    }

    #[test]
    fn test_strip_doctype_system_id() {
        let content = "<?xml version=\"1.0\"?>\r\n<!DOCTYPE HelpCollection SYSTEM \"ms-help://hx/resources/HelpCollection.DTD\">\r\n<HelpCollection />";
        assert_eq!(
            strip_doctype_system_id(content),
            "<?xml version=\"1.0\"?>\r\n<!DOCTYPE HelpCollection>\r\n<HelpCollection />"
        );
    }

    #[test]
    fn test_strip_doctype_is_case_insensitive_and_leaves_others() {
        assert_eq!(
            strip_doctype_system_id("<!doctype HelpIndex system \"x.dtd\"><HelpIndex />"),
            "<!doctype HelpIndex><HelpIndex />"
        );
        assert_eq!(
            strip_doctype_system_id("<!DOCTYPE HelpTOC><HelpTOC />"),
            "<!DOCTYPE HelpTOC><HelpTOC />"
        );
    }

    #[test]
    fn test_stripped_collection_file_parses() {
        let content = "<!DOCTYPE HelpCollection SYSTEM \"ms-help://hx/resources/HelpCollection.DTD\"><HelpCollection><CompilerOptions /></HelpCollection>";
        assert!(check_configuration(&strip_doctype_system_id(content)).is_ok());
    }
}

use super::*;

const SAMPLE: &str = r#"<?xml version="1.0"?>
<!-- generated -->
<doc>
    <assembly>
        <name>Demo</name>
    </assembly>
    <members>
        <member name="T:Demo.Widget">
            <summary>A widget &amp; its <see cref="T:Demo.Part" />.</summary>
            <example><![CDATA[var w = new Widget<int>();]]></example>
        </member>
        <member name="M:Demo.Widget.Run(System.Collections.Generic.List{System.String})" />
    </members>
</doc>
"#;

#[test]
fn test_parse_and_write_back_unchanged() {
    let document = XmlDocument::parse(SAMPLE).unwrap();
    assert_eq!(document.to_xml(), SAMPLE);
}

#[test]
fn test_attribute_values_are_unescaped() {
    let document =
        XmlDocument::parse(r#"<doc><member name="M:A.B(System.String,&quot;x&quot;)"/></doc>"#)
            .unwrap();
    let member = document.root.child("member").unwrap();
    assert_eq!(member.attribute("name"), Some(r#"M:A.B(System.String,"x")"#));
    assert_eq!(member.attribute("missing"), None);
}

#[test]
fn test_written_attributes_are_escaped() {
    let mut document = XmlDocument::parse("<doc><member name=\"x\"/></doc>").unwrap();
    document
        .root
        .element_at_mut(0)
        .unwrap()
        .set_attribute("name", "a<b & \"c\"");

    let reparsed = XmlDocument::parse(&document.to_xml()).unwrap();
    assert_eq!(
        reparsed.root.child("member").unwrap().attribute("name"),
        Some("a<b & \"c\"")
    );
}

#[test]
fn test_descendants_in_document_order() {
    let document = XmlDocument::parse(SAMPLE).unwrap();
    let names: Vec<&str> = document.root.descendants().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec![
            "assembly", "name", "members", "member", "summary", "see", "example", "member"
        ]
    );
}

#[test]
fn test_push_element_and_set_attribute() {
    let mut members = XmlElement::new("members");
    let mut member = XmlElement::new("member");
    member.set_attribute("name", "T:First");
    member.set_attribute("name", "T:Second");

    let index = members.push_element(member);
    assert_eq!(index, 0);
    let added = members.element_at(index).unwrap();
    assert_eq!(added.attribute("name"), Some("T:Second"));
    assert_eq!(added.attributes().count(), 1);
}

#[test]
fn test_new_document_has_declaration() {
    let document = XmlDocument::new(XmlElement::new("doc"));
    assert_eq!(
        document.to_xml(),
        r#"<?xml version="1.0" encoding="utf-8"?><doc />"#
    );
}

#[test]
fn test_rejects_malformed_documents() {
    let bad = [
        "",
        "   ",
        "<doc>",
        "<doc></other>",
        "<a/><b/>",
        "text<doc/>",
        "<doc attr=\"x\" attr=\"y\"/>",
    ];

    for content in bad {
        assert!(
            XmlDocument::parse(content).is_err(),
            "expected {:?} to be rejected",
            content
        );
    }
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let document = XmlDocument::parse("\u{feff}<doc/>").unwrap();
    assert_eq!(document.root.name(), "doc");
}

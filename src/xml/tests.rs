use super::*;

fn round_trip(root: &Element, indent: bool) -> Element {
    let mut bytes = Vec::new();
    write_document(root, &mut bytes, indent).unwrap();
    parse_document(bytes.as_slice()).unwrap()
}

#[test]
fn test_parse_nested() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- comment -->
<Root Version="1.0">
  <Header><Title>Hello &amp; welcome</Title></Header>
  <Data/>
</Root>"#;
    let root = parse_document(xml.as_bytes()).unwrap();
    assert_eq!(root.name, "Root");
    assert_eq!(root.attribute("Version"), Some("1.0"));
    let title = root.required_child("Header").unwrap().child("Title").unwrap();
    assert_eq!(title.text, "Hello & welcome");
    assert!(root.child("Data").unwrap().children.is_empty());
    assert!(root.child("Missing").is_none());
}

#[test]
fn test_write_then_parse() {
    let root = Element::new("Root")
        .with_attribute("UID", "0123456789ABCDEF")
        .with_attribute("xml:lang", "en-US")
        .with_child(Element::new("Title").with_text("a < b"))
        .with_child(Element::new("Empty"));
    assert_eq!(round_trip(&root, true), root);
    assert_eq!(round_trip(&root, false), root);
}

#[test]
fn test_set_attribute_keeps_position() {
    let mut element = Element::new("E").with_attribute("A", "1").with_attribute("B", "2");
    element.set_attribute("A", "3");
    assert_eq!(element.attributes[0], ("A".to_string(), "3".to_string()));
    assert!(element.required_attribute("C").is_err());
}

#[test]
fn test_malformed_documents() {
    assert!(parse_document("<Root><Open></Root>".as_bytes()).is_err());
    assert!(parse_document("<Root>".as_bytes()).is_err());
    assert!(parse_document("".as_bytes()).is_err());
    assert!(parse_document("<A/><B/>".as_bytes()).is_err());
}

#[test]
fn test_cdata_text() {
    let root = parse_document("<R><![CDATA[x < y]]></R>".as_bytes()).unwrap();
    assert_eq!(root.text, "x < y");
}

#[test]
fn test_leaf_whitespace_preserved() {
    let root = Element::new("Root")
        .with_child(Element::new("Title").with_text("  padded title  "))
        .with_child(Element::new("Note").with_text("line one\n"))
        .with_child(Element::new("Group").with_child(Element::new("Inner").with_text(" x")));
    assert_eq!(round_trip(&root, true), root);
    assert_eq!(round_trip(&root, false), root);
}

#[test]
fn test_indentation_between_children_dropped() {
    let xml = "<Root>\n  <A> a </A>\n  <B>\n    <C/>\n  </B>\n</Root>";
    let root = parse_document(xml.as_bytes()).unwrap();
    assert_eq!(root.text, "");
    assert_eq!(root.child("A").unwrap().text, " a ");
    assert_eq!(root.child("B").unwrap().text, "");
}

/// XML parser and serializer tests.
///
/// Parsing checks the element-to-value overlay (leaf text, attributes,
/// repeated siblings, collections). Serialization checks the declaration,
/// indentation, item naming and the attribute/text overlay in reverse.
use transform_core::{json, xml, ConvertError, Format, Value};

const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Parse XML and render the result as compact JSON for easy comparison.
fn xml_as_json(input: &str) -> String {
    let value = xml::parse(input, 100).expect("xml parse failed");
    json::serialize(&value, 0).expect("json serialize failed")
}

/// Parse JSON and render it as XML under `root`.
fn json_as_xml(input: &str, indentation: usize) -> String {
    let value = json::parse(input, 100).expect("json parse failed");
    xml::serialize(&value, "root", indentation).expect("xml serialize failed")
}

fn assert_parse_error(input: &str) {
    match xml::parse(input, 100) {
        Err(ConvertError::Parse { format, .. }) => assert_eq!(format, Format::Xml),
        other => panic!("expected XML parse error for {input:?}, got {other:?}"),
    }
}

// ============================================================================
// Parsing
// ============================================================================

mod parsing {
    use super::*;

    #[test]
    fn leaves_are_strings() {
        assert_eq!(
            xml_as_json("<root><id>1</id><active>true</active></root>"),
            r#"{"id":"1","active":"true"}"#
        );
    }

    #[test]
    fn repeated_siblings_become_arrays() {
        assert_eq!(
            xml_as_json("<root><tag>a</tag><other>x</other><tag>b</tag></root>"),
            r#"{"tag":["a","b"],"other":"x"}"#
        );
    }

    #[test]
    fn collection_element_becomes_array() {
        let doc = "<root><employees>\
                   <employee><name>A</name></employee>\
                   <employee><name>B</name></employee>\
                   </employees></root>";
        assert_eq!(xml_as_json(doc), r#"{"employees":[{"name":"A"},{"name":"B"}]}"#);
    }

    #[test]
    fn single_child_stays_an_object() {
        assert_eq!(
            xml_as_json("<root><employees><employee>A</employee></employees></root>"),
            r#"{"employees":{"employee":"A"}}"#
        );
    }

    #[test]
    fn leaf_with_attributes_keeps_text_and_attributes() {
        assert_eq!(
            xml_as_json(r#"<root><price currency="EUR">9.50</price></root>"#),
            r##"{"price":{"#text":"9.50","@currency":"EUR"}}"##
        );
    }

    #[test]
    fn element_attributes_follow_children() {
        assert_eq!(
            xml_as_json(r#"<root><user id="7"><name>Ann</name></user></root>"#),
            r#"{"user":{"name":"Ann","@id":"7"}}"#
        );
    }

    #[test]
    fn entities_and_cdata_are_text() {
        assert_eq!(
            xml_as_json("<root><a>x &amp; y &lt;z&gt;</a><b><![CDATA[<raw>]]></b></root>"),
            r#"{"a":"x & y <z>","b":"<raw>"}"#
        );
    }

    #[test]
    fn surrounding_spaces_in_text_are_kept() {
        let doc = "<root>\n  <name>  Alice  </name>\n  <blank>   </blank>\n</root>";
        assert_eq!(xml_as_json(doc), r#"{"name":"  Alice  ","blank":""}"#);
    }

    #[test]
    fn mixed_text_keeps_its_spacing() {
        assert_eq!(
            xml_as_json("<root><p> hello <b>x</b></p></root>"),
            r##"{"p":{"b":"x","#text":" hello "}}"##
        );
    }

    #[test]
    fn namespaces_are_dropped() {
        let doc = r#"<root xmlns:h="http://example.com/h"><h:table>t</h:table></root>"#;
        assert_eq!(xml_as_json(doc), r#"{"table":"t"}"#);
    }

    #[test]
    fn declaration_and_comments_are_ignored() {
        let doc = "<?xml version=\"1.0\"?>\n<!-- note -->\n<root><a>1</a></root>\n";
        assert_eq!(xml_as_json(doc), r#"{"a":"1"}"#);
    }

    #[test]
    fn malformed_documents_fail() {
        assert_parse_error("<root><a>1</b></root>");
        assert_parse_error("<root><a>1</a>");
        assert_parse_error("<a/><b/>");
        assert_parse_error("<root/>trailing");
        assert_parse_error("just text");
    }

    #[test]
    fn depth_limit_applies_to_elements() {
        assert!(xml::parse("<a><b><c>1</c></b></a>", 3).is_ok());
        assert!(matches!(
            xml::parse("<a><b><c>1</c></b></a>", 2),
            Err(ConvertError::DepthExceeded { limit: 2 })
        ));
    }
}

// ============================================================================
// Serialization
// ============================================================================

mod serialization {
    use super::*;

    #[test]
    fn flat_object_indented() {
        assert_eq!(
            json_as_xml(r#"{"id":1,"name":"Alice"}"#, 2),
            format!("{DECL}\n<root>\n  <id>1</id>\n  <name>Alice</name>\n</root>")
        );
    }

    #[test]
    fn zero_indentation_is_one_line() {
        assert_eq!(
            json_as_xml(r#"{"id":1,"name":"Alice"}"#, 0),
            format!("{DECL}<root><id>1</id><name>Alice</name></root>")
        );
    }

    #[test]
    fn plural_array_items_are_singular() {
        let out = json_as_xml(r#"{"employees":[{"name":"A"},{"name":"B"}]}"#, 2);
        assert_eq!(out.matches("<employee>").count(), 2);
        assert_eq!(out.matches("<employees>").count(), 1);
        assert!(out.contains("<name>A</name>"));
    }

    #[test]
    fn item_names_fall_back_to_type_field_then_item() {
        let out = json_as_xml(r#"{"fleet":[{"type":"car","seats":4}],"data":[1,2]}"#, 0);
        assert!(out.contains("<fleet><car><type>car</type><seats>4</seats></car></fleet>"), "{out}");
        assert!(out.contains("<data><item>1</item><item>2</item></data>"), "{out}");
    }

    #[test]
    fn attribute_overlay_is_reversed() {
        let out = json_as_xml(r##"{"price":{"@currency":"EUR","#text":"9.50"}}"##, 0);
        assert_eq!(out, format!(r#"{DECL}<root><price currency="EUR">9.50</price></root>"#));
    }

    #[test]
    fn empty_values_are_empty_elements() {
        let value = Value::Object(
            [
                ("none", Value::Null),
                ("list", Value::Array(vec![])),
                ("obj", Value::Object(Default::default())),
            ]
            .into_iter()
            .collect(),
        );
        let out = xml::serialize(&value, "root", 0).unwrap();
        assert_eq!(out, format!("{DECL}<root><none/><list/><obj/></root>"));
    }

    #[test]
    fn special_characters_are_escaped() {
        let out = json_as_xml(r#"{"note":"a < b & c > d"}"#, 0);
        assert!(out.contains("<note>a &lt; b &amp; c &gt; d</note>"), "{out}");
    }

    #[test]
    fn illegal_names_are_sanitized() {
        let out = json_as_xml(r#"{"first name":"A","1st":"B"}"#, 0);
        assert!(out.contains("<first_name>A</first_name>"), "{out}");
        assert!(out.contains("<_1st>B</_1st>"), "{out}");
    }

    #[test]
    fn padded_text_reads_back_unchanged() {
        let out = json_as_xml(r#"{"name":"  Alice  "}"#, 2);
        assert!(out.contains("<name>  Alice  </name>"), "{out}");
        assert_eq!(xml_as_json(&out), r#"{"name":"  Alice  "}"#);
    }

    #[test]
    fn custom_root_name() {
        let value = json::parse(r#"{"a":1}"#, 10).unwrap();
        let out = xml::serialize(&value, "data", 0).unwrap();
        assert_eq!(out, format!("{DECL}<data><a>1</a></data>"));
    }

    #[test]
    fn serialized_collection_parses_back() {
        let input = r#"{"employees":[{"name":"A"},{"name":"B"}]}"#;
        assert_eq!(xml_as_json(&json_as_xml(input, 2)), input);
    }
}

/// HTTP call contract tests: routing, status codes, content types and the
/// plain-text error bodies.
use transform_core::endpoint::{handle, ConvertQuery, Response, INVALID_TARGET_MESSAGE};

fn post(path: &str, pairs: &[(&str, &str)], body: &str) -> Response {
    let query = ConvertQuery::from_pairs(pairs.iter().copied()).expect("query should bind");
    handle(path, &query, body)
}

// ============================================================================
// Pair routes
// ============================================================================

mod pair_routes {
    use super::*;

    #[test]
    fn csv_to_json_with_compact_output() {
        let res = post("/api/convert/csv-to-json", &[("indentation", "0")], "id,name\n1,Alice\n2,Bob");
        assert_eq!(res.status, 200);
        assert_eq!(res.content_type, "application/json; charset=utf-8");
        assert_eq!(res.body, r#"[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]"#);
        assert!(res.is_success());
    }

    #[test]
    fn json_to_xml_with_defaults() {
        let res = post("/api/convert/json-to-xml", &[], r#"{"id":1,"name":"Alice"}"#);
        assert_eq!(res.status, 200);
        assert_eq!(res.content_type, "application/xml; charset=utf-8");
        assert_eq!(
            res.body,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <id>1</id>\n  <name>Alice</name>\n</root>"
        );
    }

    #[test]
    fn root_name_is_honored() {
        let res = post("/api/convert/yaml-to-xml", &[("rootName", "config"), ("indentation", "0")], "a: 1");
        assert!(res.body.ends_with("<config><a>1</a></config>"), "{}", res.body);
    }

    #[test]
    fn content_types_per_target() {
        assert_eq!(
            post("/api/convert/json-to-yaml", &[], r#"{"a":1}"#).content_type,
            "application/x-yaml; charset=utf-8"
        );
        assert_eq!(
            post("/api/convert/json-to-csv", &[], r#"[{"a":1}]"#).content_type,
            "text/csv; charset=utf-8"
        );
    }

    #[test]
    fn empty_body_names_the_source_format() {
        let res = post("/api/convert/xml-to-json", &[], "  ");
        assert_eq!(res.status, 400);
        assert_eq!(res.content_type, "text/plain; charset=utf-8");
        assert_eq!(res.body, "Invalid XML data");
    }

    #[test]
    fn conversion_failure_is_bad_request_with_message() {
        let res = post("/api/convert/json-to-csv", &[], "42");
        assert_eq!(res.status, 400);
        assert!(res.body.starts_with("Error converting JSON to CSV: "), "{}", res.body);
    }
}

// ============================================================================
// Auto route
// ============================================================================

mod auto_route {
    use super::*;

    #[test]
    fn detects_and_converts() {
        let res = post(
            "/api/convert/auto",
            &[("targetFormat", "YAML")],
            r#"{"name":"Alice","tags":["a"]}"#,
        );
        assert_eq!(res.status, 200);
        assert_eq!(res.content_type, "application/x-yaml; charset=utf-8");
        assert_eq!(res.body, "name: Alice\ntags:\n  - a\n");
    }

    #[test]
    fn missing_or_unknown_target_is_rejected() {
        for pairs in [&[][..], &[("targetFormat", "toml")][..], &[("targetFormat", "")][..]] {
            let res = post("/api/convert/auto", pairs, r#"{"a":1}"#);
            assert_eq!(res.status, 400);
            assert_eq!(res.body, INVALID_TARGET_MESSAGE);
        }
    }

    #[test]
    fn empty_body_is_invalid_input() {
        let res = post("/api/convert/auto", &[("targetFormat", "json")], "");
        assert_eq!(res.status, 400);
        assert_eq!(res.body, "Invalid input data");
    }

    #[test]
    fn undetectable_body() {
        let res = post("/api/convert/auto", &[("targetFormat", "json")], "hello");
        assert_eq!(res.status, 400);
        assert_eq!(res.body, "Error during auto-conversion: Could not detect input format");
    }
}

// ============================================================================
// Routing and query binding
// ============================================================================

mod routing {
    use super::*;

    #[test]
    fn unknown_routes_are_not_found() {
        for path in ["/api/convert/json-to-json", "/api/convert/json-to-toml", "/api/convert", "/health"] {
            assert_eq!(post(path, &[], "{}").status, 404, "{path}");
        }
    }

    #[test]
    fn query_deserializes_from_camel_case() {
        let query: ConvertQuery =
            serde_json::from_str(r#"{"rootName":"items","targetFormat":"csv"}"#).unwrap();
        assert_eq!(query.indentation, 2);
        assert_eq!(query.root_name, "items");
        assert_eq!(query.target_format.as_deref(), Some("csv"));
    }

    #[test]
    fn non_numeric_indentation_fails_to_bind() {
        assert!(ConvertQuery::from_pairs([("indentation", "two")]).is_err());
    }
}

// Tests for output formatting
//
// These tests verify listing and data rendering across the supported
// output formats using an in-memory writer.

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use umami_core::http::SharedBuffer;
use umami_core::types::{Team, Website};

fn writer(format: OutputFormat) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let writer = OutputWriter::with_writer(format, false, false, Box::new(buffer.clone()));
    (writer, buffer)
}

fn websites() -> Vec<Website> {
    vec![
        Website {
            id: "w1".to_string(),
            name: "Blog".to_string(),
            domain: "blog.example".to_string(),
        },
        Website {
            id: "w2".to_string(),
            name: "Shop".to_string(),
            domain: "shop.example".to_string(),
        },
    ]
}

fn website_row(w: &Website) -> Vec<String> {
    vec![w.id.clone(), w.name.clone(), w.domain.clone()]
}

#[test]
fn test_human_listing_is_tab_separated() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    out.listing(&websites(), website_row, "No websites found.").unwrap();

    assert_eq!(
        buffer.contents(),
        "w1\tBlog\tblog.example\nw2\tShop\tshop.example\n"
    );
}

#[test]
fn test_human_listing_empty_message() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    let teams: Vec<Team> = Vec::new();
    out.listing(&teams, |t| vec![t.id.clone(), t.name.clone()], "No teams found.")
        .unwrap();

    assert_eq!(buffer.contents(), "No teams found.\n");
}

#[test]
fn test_json_listing_prints_array() {
    let (mut out, buffer) = writer(OutputFormat::JsonPretty);
    let teams: Vec<Team> = Vec::new();
    out.listing(&teams, |t| vec![t.id.clone()], "No teams found.").unwrap();
    assert_eq!(buffer.contents(), "[]\n");

    let (mut out, buffer) = writer(OutputFormat::Json);
    out.listing(&websites()[..1], website_row, "unused").unwrap();
    assert_eq!(
        buffer.contents(),
        "[{\"id\":\"w1\",\"name\":\"Blog\",\"domain\":\"blog.example\"}]\n"
    );
}

#[test]
fn test_data_pretty_json() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    out.data(&json!({"pageviews": {"value": 5}})).unwrap();

    assert_eq!(
        buffer.contents(),
        "{\n  \"pageviews\": {\n    \"value\": 5\n  }\n}\n"
    );
}

#[test]
fn test_data_yaml() {
    let (mut out, buffer) = writer(OutputFormat::Yaml);
    out.data(&json!({"x": 1})).unwrap();
    assert_eq!(buffer.contents(), "x: 1\n");
}

#[test]
fn test_success_respects_quiet() {
    let buffer = SharedBuffer::new();
    let mut out = OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(buffer.clone()));
    out.success("Token saved.").unwrap();
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_no_spinner_for_custom_writer() {
    let (out, _) = writer(OutputFormat::Human);
    assert!(out.spinner("Loading").is_none());
}

#[test]
fn test_format_rows() {
    let rows = vec![
        vec!["a".to_string(), "b".to_string()],
        vec!["c".to_string(), "d".to_string()],
    ];
    assert_eq!(OutputFormat::Human.format_rows(&rows), "a\tb\nc\td");
}

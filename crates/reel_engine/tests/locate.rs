use reel_engine::{SourceRef, StrategyError};

#[test]
fn extracts_document_and_tab_from_query() {
    let source = SourceRef::parse(
        "https://docs.google.com/spreadsheets/d/1AbC_x-9/edit?pli=1&gid=478131050#gid=478131050",
    )
    .expect("sheet url");
    assert_eq!(source.document_id, "1AbC_x-9");
    assert_eq!(source.tab_id, "478131050");
}

#[test]
fn falls_back_to_fragment_tab() {
    let source =
        SourceRef::parse("https://docs.google.com/spreadsheets/d/doc123/edit#gid=42").unwrap();
    assert_eq!(source.document_id, "doc123");
    assert_eq!(source.tab_id, "42");
}

#[test]
fn empty_query_tab_uses_fragment() {
    let source =
        SourceRef::parse("https://docs.google.com/spreadsheets/d/doc/edit?gid=#gid=7").unwrap();
    assert_eq!(source.tab_id, "7");
}

#[test]
fn fragment_tab_stops_at_next_parameter() {
    let source =
        SourceRef::parse("https://docs.google.com/spreadsheets/d/doc/edit#gid=7&range=A1").unwrap();
    assert_eq!(source.tab_id, "7");
}

#[test]
fn missing_tab_is_empty_and_defaults_to_zero() {
    let source = SourceRef::parse("https://docs.google.com/spreadsheets/d/doc").unwrap();
    assert_eq!(source.document_id, "doc");
    assert!(source.tab_id.is_empty());
    assert_eq!(source.tab_or_default(), "0");
}

#[test]
fn non_sheet_inputs_yield_no_identifier() {
    assert_eq!(SourceRef::parse("not a url"), None);
    assert_eq!(SourceRef::parse("https://example.com/data.csv"), None);
    assert_eq!(SourceRef::parse("https://example.com/d/"), None);
    assert_eq!(SourceRef::parse(""), None);
}

#[test]
fn resolve_names_the_rejected_input() {
    assert_eq!(
        SourceRef::resolve("  https://example.com/data.csv "),
        Err(StrategyError::InvalidSource("https://example.com/data.csv".to_string()))
    );
    let source = SourceRef::resolve("https://docs.google.com/spreadsheets/d/abc/edit").unwrap();
    assert_eq!(source.document_id, "abc");
}

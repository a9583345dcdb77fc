use reel_engine::{find_column, normalize_header, ColumnIndex, Field};

#[test]
fn normalization_lowercases_trims_and_joins_whitespace() {
    assert_eq!(normalize_header("  Event Params.Key "), "event_params.key");
    assert_eq!(normalize_header("Geo \t  Country"), "geo_country");
    assert_eq!(normalize_header(""), "");
}

#[test]
fn exact_match_after_normalization() {
    assert_eq!(find_column(&["Event Params.Key"], &["event_params.key"]), Some(0));
}

#[test]
fn substring_containment_is_the_fallback() {
    assert_eq!(
        find_column(&["my_event_params_key_x"], &["event_params.key"]),
        Some(0)
    );
    assert_eq!(
        find_column(&["other", "xx_event_name_yy"], &["event_name"]),
        Some(1)
    );
}

#[test]
fn exact_match_beats_earlier_substring_match() {
    let header = ["user_country_code", "country"];
    assert_eq!(find_column(&header, &["country"]), Some(1));
}

#[test]
fn earlier_candidate_wins_among_exact_matches() {
    let header = ["country", "geo.country"];
    assert_eq!(
        find_column(&header, Field::Country.candidates()),
        Some(1)
    );
}

#[test]
fn first_header_wins_among_substring_matches() {
    let header = ["a_country_x", "b_country_y"];
    assert_eq!(find_column(&header, &["country"]), Some(0));
}

#[test]
fn unmatched_fields_are_absent() {
    assert_eq!(find_column(&["foo", "bar"], &["event_name"]), None);
    let index = ColumnIndex::resolve(&["foo", "bar"]);
    assert_eq!(index, ColumnIndex::default());
    assert!(!index.has_classification());
}

#[test]
fn resolves_analytics_export_header() {
    let header = [
        "event_date",
        "event_timestamp",
        "event_name",
        "event_params.key",
        "event_params.value.string_value",
        "user_pseudo_id",
        "geo.country",
        "Subscription Status",
    ];
    let index = ColumnIndex::resolve(&header);
    assert_eq!(index.timestamp, Some(1));
    assert_eq!(index.event_name, Some(2));
    assert_eq!(index.param_key, Some(3));
    assert_eq!(index.param_value, Some(4));
    assert_eq!(index.user_id, Some(5));
    assert_eq!(index.country, Some(6));
    assert_eq!(index.subscription_status, Some(7));
    assert!(index.has_classification());
    assert_eq!(index.get(Field::ParamValue), Some(4));
}

use pretty_assertions::assert_eq;
use reel_core::{
    facet_values, update, ActiveFilters, AppState, DomainRecord, FilterKind, FilterPill, Msg,
};

fn record(id: usize, country: &str, category: &str, status: &str) -> DomainRecord {
    DomainRecord {
        id,
        country: country.to_string(),
        category_name: category.to_string(),
        subscription_status: status.to_string(),
        output_url: format!("https://x/out{id}.mp4"),
        ..DomainRecord::default()
    }
}

fn loaded(records: Vec<DomainRecord>) -> AppState {
    let (state, _) = update(AppState::new(), Msg::InputChanged("https://x".to_string()));
    let (state, _) = update(state, Msg::LoadClicked);
    let (state, _) = update(
        state,
        Msg::LoadFinished {
            request_id: 1,
            result: Ok(records),
        },
    );
    state
}

fn sample() -> Vec<DomainRecord> {
    vec![
        record(0, "VN", "Art", "active"),
        record(1, "US", "Art", "cancelled"),
        record(2, "VN", "Music", ""),
        record(3, "", "Music", "active"),
    ]
}

fn toggle(state: AppState, kind: FilterKind, value: &str) -> AppState {
    update(
        state,
        Msg::FilterToggled {
            kind,
            value: value.to_string(),
        },
    )
    .0
}

fn visible_ids(state: &AppState) -> Vec<usize> {
    state.visible_records().map(|record| record.id).collect()
}

#[test]
fn facets_are_unique_sorted_and_non_empty() {
    let records = sample();
    assert_eq!(facet_values(&records, FilterKind::Country), vec!["US", "VN"]);
    assert_eq!(facet_values(&records, FilterKind::Category), vec!["Art", "Music"]);
    assert_eq!(
        facet_values(&records, FilterKind::Subscription),
        vec!["active", "cancelled"]
    );
    assert!(facet_values(&records, FilterKind::User).is_empty());
}

#[test]
fn empty_filters_admit_everything() {
    let filters = ActiveFilters::new();
    assert!(filters.is_empty());
    assert!(sample().iter().all(|record| filters.matches(record)));
}

#[test]
fn values_within_a_kind_are_alternatives() {
    let state = loaded(sample());
    let state = toggle(state, FilterKind::Country, "VN");
    assert_eq!(visible_ids(&state), vec![0, 2]);

    let state = toggle(state, FilterKind::Country, "US");
    assert_eq!(visible_ids(&state), vec![0, 1, 2]);
}

#[test]
fn kinds_combine_conjunctively() {
    let state = loaded(sample());
    let state = toggle(state, FilterKind::Country, "VN");
    let state = toggle(state, FilterKind::Category, "Music");
    assert_eq!(visible_ids(&state), vec![2]);
    assert_eq!(state.view().count_label, "1 records");
}

#[test]
fn toggling_twice_deselects() {
    let mut filters = ActiveFilters::new();
    assert!(filters.toggle(FilterKind::Style, "Anime"));
    assert!(filters.is_selected(FilterKind::Style, "Anime"));
    assert!(!filters.toggle(FilterKind::Style, "Anime"));
    assert!(filters.is_empty());
}

#[test]
fn pills_follow_kind_then_value_order() {
    let state = loaded(sample());
    let state = toggle(state, FilterKind::Category, "Music");
    let state = toggle(state, FilterKind::Country, "VN");
    let state = toggle(state, FilterKind::Category, "Art");

    assert_eq!(
        state.view().active_filters,
        vec![
            FilterPill {
                kind: FilterKind::Country,
                value: "VN".to_string(),
                label: "country: VN".to_string(),
            },
            FilterPill {
                kind: FilterKind::Category,
                value: "Art".to_string(),
                label: "category: Art".to_string(),
            },
            FilterPill {
                kind: FilterKind::Category,
                value: "Music".to_string(),
                label: "category: Music".to_string(),
            },
        ]
    );
}

#[test]
fn removing_a_pill_and_clearing_a_kind() {
    let state = loaded(sample());
    let state = toggle(state, FilterKind::Category, "Music");
    let state = toggle(state, FilterKind::Category, "Art");
    let state = toggle(state, FilterKind::Country, "US");
    assert_eq!(visible_ids(&state), vec![1]);

    let (state, _) = update(
        state,
        Msg::FilterRemoved {
            kind: FilterKind::Category,
            value: "Art".to_string(),
        },
    );
    assert!(visible_ids(&state).is_empty());

    let (state, _) = update(state, Msg::FilterCleared(FilterKind::Category));
    assert_eq!(visible_ids(&state), vec![1]);
    assert_eq!(state.view().active_filters.len(), 1);
}

#[test]
fn filter_change_returns_to_first_page() {
    let records = (0..70)
        .map(|id| record(id, if id % 2 == 0 { "VN" } else { "US" }, "Art", ""))
        .collect();
    let state = loaded(records);
    let (state, _) = update(state, Msg::PageRequested(3));
    assert_eq!(state.page(), 3);

    let state = toggle(state, FilterKind::Country, "VN");
    assert_eq!(state.page(), 1);
    assert_eq!(state.view().page_info, "1/2");
}

#[test]
fn selection_survives_filter_when_still_visible() {
    let state = loaded(sample());
    let (state, _) = update(state, Msg::RecordSelected { id: 2 });

    let state = toggle(state, FilterKind::Country, "VN");
    assert_eq!(state.selected_record().map(|record| record.id), Some(2));
    assert_eq!(state.selected_offset(), Some(1));

    let state = toggle(state, FilterKind::Category, "Art");
    assert_eq!(state.selected_record(), None);
}

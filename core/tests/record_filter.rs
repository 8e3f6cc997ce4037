//! RecordFilter: matching rules, stable sorting, missing keys and purity.

use merchant_risk_core::{
    filter::{FilterCriteria, RecordFilter, SortSpec},
    fixtures,
    record::Record,
};

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn search_category_and_date_desc() {
    let records = vec![
        Record::new("A")
            .with("title", "A transaction")
            .with("category", "Security")
            .with_date("date", "2024-01-01"),
        Record::new("B")
            .with("title", "B transaction")
            .with("category", "Security")
            .with_date("date", "2024-01-02"),
    ];
    let criteria = FilterCriteria::new()
        .search("transaction")
        .with_filter("category", "Security");

    let out = RecordFilter::new(["title"]).apply(&records, &criteria, &SortSpec::desc("date"));
    assert_eq!(ids(&out), vec!["B", "A"]);
}

#[test]
fn empty_input_yields_empty_output() {
    let filter = RecordFilter::risk_register();
    let criteria = FilterCriteria::new().search("breach").with_filter("severity", "High");
    assert!(filter.apply(&[], &criteria, &SortSpec::asc("priority")).is_empty());
    assert!(filter.apply(&[], &FilterCriteria::new(), &SortSpec::desc("missing")).is_empty());
}

#[test]
fn no_matches_is_an_empty_result() {
    let out = RecordFilter::risk_register().apply(
        &fixtures::risks(),
        &FilterCriteria::new().search("no such risk anywhere"),
        &SortSpec::asc("priority"),
    );
    assert!(out.is_empty());
}

#[test]
fn passthrough_criteria_return_everything_sorted() {
    let risks = fixtures::risks();
    let criteria = FilterCriteria::new()
        .with_filter("severity", "all")
        .with_filter("category", "all")
        .with_filter("status", "all");

    let out = RecordFilter::risk_register().apply(&risks, &criteria, &SortSpec::desc("priority"));
    assert_eq!(out.len(), risks.len());
    assert_eq!(ids(&out), vec!["risk-005", "risk-004", "risk-003", "risk-002", "risk-001"]);
}

#[test]
fn filtering_is_idempotent() {
    let filter = RecordFilter::risk_register();
    let risks = fixtures::risks();
    let criteria = FilterCriteria::new().search("payment").with_filter("severity", "High");
    let sort = SortSpec::asc("dateIdentified");

    let once = filter.apply(&risks, &criteria, &sort);
    let twice = filter.apply(&once, &criteria, &sort);
    assert!(!once.is_empty());
    assert_eq!(once, twice);
}

#[test]
fn source_collection_is_untouched() {
    let risks = fixtures::risks();
    let before = risks.clone();
    let _ = RecordFilter::risk_register().apply(&risks, &FilterCriteria::new(), &SortSpec::desc("priority"));
    assert_eq!(risks, before);
}

#[test]
fn equal_keys_keep_input_order_in_both_directions() {
    let records: Vec<Record> = [("r1", "High"), ("r2", "Low"), ("r3", "High"), ("r4", "Low"), ("r5", "High")]
        .into_iter()
        .map(|(id, sev)| Record::new(id).with("severity", sev))
        .collect();
    let filter = RecordFilter::risk_register();

    let asc = filter.apply(&records, &FilterCriteria::new(), &SortSpec::asc("severity"));
    assert_eq!(ids(&asc), vec!["r1", "r3", "r5", "r2", "r4"]);

    let desc = filter.apply(&records, &FilterCriteria::new(), &SortSpec::desc("severity"));
    assert_eq!(ids(&desc), vec!["r2", "r4", "r1", "r3", "r5"]);
}

#[test]
fn numbers_sort_numerically_not_lexically() {
    let records: Vec<Record> = [("a", 10i64), ("b", 9), ("c", 100)]
        .into_iter()
        .map(|(id, p)| Record::new(id).with("priority", p))
        .collect();
    let out = RecordFilter::risk_register().apply(&records, &FilterCriteria::new(), &SortSpec::asc("priority"));
    assert_eq!(ids(&out), vec!["b", "a", "c"]);
}

#[test]
fn records_missing_the_key_sort_last_either_way() {
    let records = vec![
        Record::new("none-1"),
        Record::new("late").with_date("date", "2024-03-01"),
        Record::new("none-2"),
        Record::new("early").with_date("date", "2024-01-01"),
    ];
    let filter = RecordFilter::event_timeline();

    let asc = filter.apply(&records, &FilterCriteria::new(), &SortSpec::asc("date"));
    assert_eq!(ids(&asc), vec!["early", "late", "none-1", "none-2"]);

    let desc = filter.apply(&records, &FilterCriteria::new(), &SortSpec::desc("date"));
    assert_eq!(ids(&desc), vec!["late", "early", "none-1", "none-2"]);
}

#[test]
fn unknown_sort_key_keeps_input_order() {
    let risks = fixtures::risks();
    let out = RecordFilter::risk_register().apply(&risks, &FilterCriteria::new(), &SortSpec::desc("nonexistent"));
    assert_eq!(ids(&out), ids(&risks));
}

#[test]
fn categorical_match_does_not_fold_case() {
    let filter = RecordFilter::risk_register();
    let risks = fixtures::risks();

    let exact = filter.filter(&risks, &FilterCriteria::new().with_filter("status", "Active"));
    assert_eq!(ids(&exact), vec!["risk-001", "risk-003"]);

    let lower = filter.filter(&risks, &FilterCriteria::new().with_filter("status", "active"));
    assert!(lower.is_empty());
}

#[test]
fn search_covers_every_designated_field() {
    let filter = RecordFilter::risk_register();
    let risks = fixtures::risks();

    // "restricted countries" appears only in details, not in any title.
    let out = filter.filter(&risks, &FilterCriteria::new().search("Restricted Countries"));
    assert_eq!(ids(&out), vec!["risk-005"]);

    // Owner is not a search field.
    assert!(filter.filter(&risks, &FilterCriteria::new().search("Fraud Strategy")).is_empty());
}

#[test]
fn timeline_selector_searches_event_type() {
    let out = RecordFilter::event_timeline().apply(
        &fixtures::timeline_events(),
        &FilterCriteria::new().search("breach"),
        &SortSpec::desc("date"),
    );
    assert_eq!(ids(&out), vec!["evt-005"]);
}

#[test]
fn search_reaches_date_shaped_and_numeric_fields() {
    // A date-shaped title is typed as a date once it passes through serde.
    let record: Record = serde_json::from_str(r#"{"id":"x","title":"2024-01-15"}"#).unwrap();
    let by_title = RecordFilter::new(["title"]);
    assert_eq!(by_title.filter(&[record], &FilterCriteria::new().search("2024")).len(), 1);

    let alert = Record::new("alert-001")
        .with("message", "Unusual spike in transaction volume detected")
        .with("potentialLoss", 23_456i64);
    let by_loss = RecordFilter::new(["potentialLoss"]);
    assert_eq!(by_loss.filter(&[alert.clone()], &FilterCriteria::new().search("3456")).len(), 1);
    assert!(by_loss.filter(&[alert], &FilterCriteria::new().search("spike")).is_empty());
}

#[test]
fn serde_round_trip_keeps_records_searchable() {
    let original = Record::new("evt").with("event", "2024-01-15").with("type", "Security Alert");
    let json = serde_json::to_string(&original).unwrap();
    let restored: Record = serde_json::from_str(&json).unwrap();

    let filter = RecordFilter::event_timeline();
    let criteria = FilterCriteria::new().search("2024-01");
    assert_eq!(filter.filter(&[original], &criteria).len(), 1);
    assert_eq!(filter.filter(&[restored.clone()], &criteria).len(), 1);
    assert_eq!(restored.get("event").map(|v| v.to_string()).as_deref(), Some("2024-01-15"));
}

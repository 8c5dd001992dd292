use deepest_scan::{find_deepest_text, scan, ScanOutcome, MALFORMED_SENTINEL};

#[test]
fn balanced_tags_without_text_yield_empty_string() {
    for input in ["<a></a>", "<a><b></b><c></c></a>", "<html><body><div></div></body></html>"] {
        assert_eq!(find_deepest_text(input), "", "input: {input}");
    }
}

#[test]
fn deepest_of_two_levels() {
    let report = scan("<a><b>x</b></a>");
    assert_eq!(report.outcome, ScanOutcome::Deepest { text: "x".into() });
    assert_eq!(report.max_depth, 2);
}

#[test]
fn text_before_record_is_cleared_and_text_after_is_ignored() {
    let report = scan("<a>x<b>y</b>z</a>");
    assert_eq!(report.outcome.as_str(), "y");
    assert_eq!(report.max_depth, 2);
}

#[test]
fn leading_closing_tag_is_malformed_and_stops_scan() {
    let report = scan("</a><b><c>never seen</c></b>");
    assert_eq!(report.outcome, ScanOutcome::Malformed { offset: 0 });
    assert_eq!(report.max_depth, 0);
    assert_eq!(find_deepest_text("</a>"), MALFORMED_SENTINEL);
}

#[test]
fn scanning_is_idempotent() {
    let input = "<html><body><div><p> repeated </p></div> noise <span>other</span></body></html>";
    let first = scan(input);
    let second = scan(input);
    assert_eq!(first, second);
    assert_eq!(find_deepest_text(input), find_deepest_text(input));
}

#[test]
fn whitespace_only_deepest_text_is_empty_not_sentinel() {
    let result = find_deepest_text("<a>outer<b>   \t  </b></a>");
    assert_eq!(result, "");
    assert_ne!(result, MALFORMED_SENTINEL);
}

#[test]
fn excursion_text_is_concatenated_on_return_to_record_depth() {
    let input = "<div><p>first</p>between<p>second</p></div>";
    assert_eq!(find_deepest_text(input), "firstbetweensecond");
}

#[test]
fn excursion_without_return_is_not_recorded() {
    let input = "<div><p>first</p>between</div>trailing";
    assert_eq!(find_deepest_text(input), "first");
}

#[test]
fn deeper_record_replaces_earlier_one() {
    let input = "<a><b>shallow</b><c><d>deeper</d></c></a>";
    let report = scan(input);
    assert_eq!(report.outcome.as_str(), "deeper");
    assert_eq!(report.max_depth, 3);
}

#[test]
fn joined_page_body() {
    // A page as the fetcher delivers it: line breaks already removed.
    let page = "<html><head><title>Title</title></head><body>  <div>    <p>This is the deepest text.</p>  </div></body></html>";
    assert_eq!(find_deepest_text(page), "This is the deepest text.");
}

#[test]
fn tag_attributes_are_not_text() {
    let input = r#"<div class="outer"><a href="/x" title="hi">link</a></div>"#;
    assert_eq!(find_deepest_text(input), "link");
}

#[cfg(feature = "serde")]
#[test]
fn report_serializes_with_tagged_outcome() {
    let json = serde_json::to_value(scan("<a>x</a>")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "outcome": { "kind": "deepest", "text": "x" }, "max_depth": 1 })
    );

    let json = serde_json::to_value(scan("</a>")).unwrap();
    assert_eq!(json["outcome"]["kind"], "malformed");
    assert_eq!(json["outcome"]["offset"], 0);
}

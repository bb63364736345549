//! Tests for glossary page parsing.

use brevity_error::{BrevityErrorKind, SourceErrorKind};
use brevity_terms::{
    DEFAULT_FIRST_TERM, DEFAULT_STOP_HEADING, clean_definition, clean_name, parse_terms,
};

const PAGE: &str = r#"
<html><body>
<div class="mw-parser-output">
  <dl><dt>Lead</dt><dd>Page furniture that precedes the glossary.</dd></dl>
  <div class="mw-heading mw-heading2"><h2 id="A">A</h2></div>
  <dl>
    <dt>Aborting/Abort/Aborted</dt>
    <dd>Directive to cease an action or attack.<sup>[1]</sup></dd>
    <dt>Bogey* [USAF]</dt>
    <dd>A radar or visual air contact whose identity is <b>unknown</b> .</dd>
  </dl>
  <div class="mw-heading mw-heading2"><h2 id="W">W</h2></div>
  <dl>
    <dt>Winchester</dt>
    <dd>No ordnance remaining.</dd>
    <dt>Bogey</dt>
    <dd>Duplicate entry that should be ignored.</dd>
  </dl>
  <h2><span class="mw-headline" id="See_also">See also</span></h2>
  <dl><dt>Not a term</dt><dd>Appears after the glossary.</dd></dl>
</div>
</body></html>
"#;

#[test]
fn test_parse_glossary_between_markers() {
    let terms = parse_terms(PAGE, DEFAULT_FIRST_TERM, DEFAULT_STOP_HEADING).unwrap();

    let names: Vec<&str> = terms.iter().map(|t| t.name().as_str()).collect();
    assert_eq!(names, vec!["Aborting/Abort/Aborted", "Bogey", "Winchester"]);
}

#[test]
fn test_parse_cleans_definitions() {
    let terms = parse_terms(PAGE, DEFAULT_FIRST_TERM, DEFAULT_STOP_HEADING).unwrap();

    assert_eq!(
        terms[0].definition(),
        "Directive to cease an action or attack."
    );
    assert_eq!(
        terms[1].definition(),
        "A radar or visual air contact whose identity is unknown."
    );
    assert_eq!(terms[1].id().as_str(), "bogey");
}

#[test]
fn test_missing_first_term_keeps_everything_before_stop() {
    let terms = parse_terms(PAGE, "Not present", DEFAULT_STOP_HEADING).unwrap();
    assert_eq!(terms.first().unwrap().name(), "Lead");
    assert!(terms.iter().all(|t| t.name() != "Not a term"));
}

#[test]
fn test_page_without_content_is_parse_error() {
    let err = parse_terms("<html><body><p>moved</p></body></html>", "", "")
        .unwrap_err();
    match err.kind() {
        BrevityErrorKind::Source(e) => assert!(matches!(e.kind, SourceErrorKind::Parse(_))),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_page_without_terms_is_empty_error() {
    let html = r#"<div class="mw-parser-output"><p>Nothing here</p></div>"#;
    let err = parse_terms(html, DEFAULT_FIRST_TERM, DEFAULT_STOP_HEADING).unwrap_err();
    match err.kind() {
        BrevityErrorKind::Source(e) => assert_eq!(e.kind, SourceErrorKind::Empty),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_clean_helpers() {
    assert_eq!(clean_name("  *Joker*  [note]  "), "Joker");
    assert_eq!(clean_name("Hit(s) [USMC only]"), "Hit(s)");
    assert_eq!(
        clean_definition("Fuel  state [2] above bingo [citation needed] ."),
        "Fuel state above bingo."
    );
}

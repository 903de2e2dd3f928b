use std::sync::Once;

use pretty_assertions::assert_eq;

use normdoc_core::{extract_fields, DocCategory};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(harvest_logging::initialize_for_tests);
}

#[test]
fn category_is_first_token() {
    init_logging();
    let fields = extract_fields("Постановление Правительства");
    assert_eq!(fields.category, "Постановление");
    assert_eq!(DocCategory::from_token(&fields.category), DocCategory::Other);
}

#[test]
fn empty_title_yields_all_empty_fields() {
    init_logging();
    let fields = extract_fields("");
    assert_eq!(fields.category, "");
    assert_eq!(fields.identifier, "");
    assert_eq!(fields.effective_date, "");
    assert_eq!(fields.related_rule, "");
    assert!(fields.issuing_bodies.is_empty());
}

#[test]
fn marked_identifier_and_numeric_date() {
    init_logging();
    let fields = extract_fields("Приказ № 123 от 02.12.2020 г. Минстроя России");
    assert_eq!(fields.category, "Приказ");
    assert_eq!(fields.identifier, "123");
    assert_eq!(fields.effective_date, "02.12.2020");
    assert!(fields.issuing_bodies.contains("Минстрой России"));
}

#[test]
fn identifier_span_is_consumed_before_date_extraction() {
    init_logging();
    // The dotted date inside the identifier must not be re-matched by the
    // date rule once the identifier span has been removed.
    let fields = extract_fields("Письмо № 02.12.2020-ОД от 3 марта 2021 года");
    assert_eq!(fields.identifier, "02.12.2020-ОД");
    assert_eq!(fields.effective_date, "03.03.2021");
}

#[test]
fn order_fallback_takes_first_slash_token() {
    init_logging();
    let fields = extract_fields("Приказ Минстроя России 897/пр");
    assert_eq!(fields.identifier, "897/пр");
    assert!(fields.issuing_bodies.contains("Минстрой России"));
}

#[test]
fn order_fallback_prefers_earliest_of_several_slash_tokens() {
    init_logging();
    let fields = extract_fields("Приказ 10/а 20/б");
    assert_eq!(fields.identifier, "10/а");
}

#[test]
fn spec_rule_fallback_takes_dotted_numeral() {
    init_logging();
    let fields = extract_fields("СП 22.13330.2016 Основания зданий и сооружений");
    assert_eq!(fields.category, "СП");
    assert_eq!(fields.identifier, "22.13330.2016");
}

#[test]
fn letter_without_marker_has_no_identifier() {
    init_logging();
    let fields = extract_fields("Письмо о разъяснении требований");
    assert_eq!(fields.identifier, "");
    assert_eq!(fields.effective_date, "");
}

#[test]
fn wordy_date_with_known_month_formats_numerically() {
    init_logging();
    let fields = extract_fields("Приказ № 7 от 5 мая 2021 г.");
    assert_eq!(fields.effective_date, "05.05.2021");
}

#[test]
fn wordy_date_with_unknown_month_keeps_month_text() {
    init_logging();
    let fields = extract_fields("Приказ № 7 от 7 липня 2020");
    assert_eq!(fields.effective_date, "7 липня 2020");
}

#[test]
fn year_marker_is_consumed_only_when_adjacent() {
    init_logging();
    // " г." elsewhere in the title must not extend the consumed span.
    let fields = extract_fields("Приказ от 5 мая 2021 по объектам в г. Москве");
    assert_eq!(fields.effective_date, "05.05.2021");
}

#[test]
fn amendment_with_related_rule() {
    init_logging();
    let fields = extract_fields("Изменение № 1 к СП 42.13330.2016");
    assert_eq!(fields.category, "Изменение");
    assert_eq!(fields.identifier, "1");
    assert_eq!(fields.related_rule, "СП 42.13330.2016");
}

#[test]
fn issuing_bodies_collapse_duplicates() {
    init_logging();
    let fields =
        extract_fields("Письмо Минстроя России и Министерства строительства о порядке");
    assert_eq!(fields.issuing_bodies.len(), 1);
    assert!(fields.issuing_bodies.contains("Минстрой России"));
}

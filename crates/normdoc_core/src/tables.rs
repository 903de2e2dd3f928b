use std::collections::BTreeSet;

/// Month-name lookup for dates spelled out in titles ("2 декабря 2020").
/// Names are the genitive forms used after a day number.
pub fn month_number(name: &str) -> Option<u32> {
    let lowered = name.to_lowercase();
    let number = match lowered.as_str() {
        "января" => 1,
        "февраля" => 2,
        "марта" => 3,
        "апреля" => 4,
        "мая" => 5,
        "июня" => 6,
        "июля" => 7,
        "августа" => 8,
        "сентября" => 9,
        "октября" => 10,
        "ноября" => 11,
        "декабря" => 12,
        _ => return None,
    };
    Some(number)
}

/// Substring -> canonical issuing-body name.
///
/// Keys are stems so declined forms in running text still match.
const ISSUING_BODIES: &[(&str, &str)] = &[
    ("Минстро", "Минстрой России"),
    ("Министерства строительства", "Минстрой России"),
    ("Минрегион", "Минрегион России"),
    ("Росстандарт", "Росстандарт"),
    ("Госстро", "Госстрой России"),
    ("Главгосэкспертиз", "Главгосэкспертиза России"),
    ("Правительств", "Правительство РФ"),
];

/// Collects every canonical issuing-body name whose key occurs in `text`.
///
/// This scan never consumes characters from the title remainder; keys may
/// overlap spans already claimed by other fields.
pub fn issuing_bodies_in(text: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for (key, canonical) in ISSUING_BODIES {
        if text.contains(key) {
            found.insert((*canonical).to_string());
        }
    }
    found
}

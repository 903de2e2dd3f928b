use crate::card::Card;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOutcome {
    pub accepted: Vec<Card>,
    pub skipped: usize,
}

/// Drops cards whose category token is in the exclusion set.
///
/// Accepted cards keep their input order.
pub fn filter_cards<S: AsRef<str>>(cards: Vec<Card>, excluded: &[S]) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for card in cards {
        let skip = excluded
            .iter()
            .any(|category| category.as_ref() == card.category);
        if skip {
            outcome.skipped += 1;
        } else {
            outcome.accepted.push(card);
        }
    }
    outcome
}

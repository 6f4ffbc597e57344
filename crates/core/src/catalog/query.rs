//! Read-only views over a generated catalog.
//!
//! Every filter is stable: matches keep their catalog order.

use crate::models::GameRecord;

/// Rating at which a game counts as featured.
pub const FEATURED_RATING: f64 = 9.0;

/// Games whose genre matches exactly (case-sensitive).
pub fn by_genre(records: &[GameRecord], genre: &str) -> Vec<GameRecord> {
    records
        .iter()
        .filter(|record| record.genre == genre)
        .cloned()
        .collect()
}

/// Games rated at least [`FEATURED_RATING`].
pub fn featured(records: &[GameRecord]) -> Vec<GameRecord> {
    with_min_rating(records, FEATURED_RATING)
}

/// Games rated `min` or higher.
pub fn with_min_rating(records: &[GameRecord], min: f64) -> Vec<GameRecord> {
    records
        .iter()
        .filter(|record| record.rating >= min)
        .cloned()
        .collect()
}

/// Filter games using a case-insensitive substring search over title,
/// description and genre. An empty query returns everything.
pub fn search(records: &[GameRecord], query: &str) -> Vec<GameRecord> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| matches_query(record, &needle))
        .cloned()
        .collect()
}

/// True when `record` contains the already-lowercased `needle`.
pub fn matches_query(record: &GameRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || record.genre.to_lowercase().contains(needle)
}

/// Distinct genres in first-seen order.
pub fn genres(records: &[GameRecord]) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for record in records {
        if !genres.iter().any(|genre| genre == &record.genre) {
            genres.push(record.genre.clone());
        }
    }
    genres
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{generate_catalog, GeneratorOptions};

    fn catalog() -> Vec<GameRecord> {
        generate_catalog(&GeneratorOptions::seeded(5)).into_records()
    }

    fn titles(records: &[GameRecord]) -> Vec<&str> {
        records.iter().map(|record| record.title.as_str()).collect()
    }

    #[test]
    fn empty_search_returns_everything_in_order() {
        let records = catalog();
        assert_eq!(search(&records, ""), records);
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = catalog();
        let hits = search(&records, "ZELDA");
        assert_eq!(titles(&hits), vec!["The Legend of Zelda: Breath of the Wild"]);
    }

    #[test]
    fn search_covers_description_and_genre() {
        let records = catalog();
        assert_eq!(titles(&search(&records, "night city")), vec!["Cyberpunk 2077"]);
        assert_eq!(
            titles(&search(&records, "metroid")),
            vec!["Hollow Knight"]
        );
        assert!(search(&records, "no such game").is_empty());
    }

    #[test]
    fn featured_keeps_order_and_threshold() {
        let records = catalog();
        let expected: Vec<_> = records
            .iter()
            .filter(|record| record.rating >= 9.0)
            .map(|record| record.title.as_str())
            .collect();
        let hits = featured(&records);
        assert_eq!(titles(&hits), expected);
        assert!(titles(&hits).contains(&"Hollow Knight"));
        assert!(!titles(&hits).contains(&"Cyberpunk 2077"));
    }

    #[test]
    fn genre_filter_is_exact() {
        let records = catalog();
        assert_eq!(
            titles(&by_genre(&records, "RPG")),
            vec!["Cyberpunk 2077", "The Witcher 3: Wild Hunt"]
        );
        assert!(by_genre(&records, "rpg").is_empty());
        assert!(by_genre(&records, "Racing").is_empty());
    }

    #[test]
    fn genres_are_listed_once() {
        let records = catalog();
        assert_eq!(
            genres(&records),
            vec![
                "Adventure",
                "Action",
                "RPG",
                "Action RPG",
                "Superhero",
                "Metroidvania"
            ]
        );
    }

    #[test]
    fn min_rating_is_inclusive() {
        let records = catalog();
        assert_eq!(with_min_rating(&records, 9.6).len(), 2);
        assert_eq!(with_min_rating(&records, 0.0).len(), records.len());
    }
}

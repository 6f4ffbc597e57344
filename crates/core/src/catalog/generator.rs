use std::{collections::HashSet, time::Duration};

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{GameRecord, PLATFORMS};

use super::source::{self, RawEntry};

/// Uniform draws above this value count as a hit (~30%).
const SALE_THRESHOLD: f64 = 0.7;
const MIN_DISCOUNT: u32 = 10;
const MAX_DISCOUNT: u32 = 59;

/// How the sale flag and the discount percentage are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleModel {
    /// One draw decides both fields; a sale always carries a discount.
    #[default]
    Coupled,
    /// Two unrelated draws, so a record may be on sale at 0% or discounted
    /// without the sale flag.
    Independent,
}

/// Knobs for catalog generation.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// When set, sale fields are derived from this seed and the record id.
    pub seed: Option<u64>,
    /// Sale draw strategy.
    pub sale_model: SaleModel,
    /// Artificial latency applied by [`fetch_catalog`].
    pub load_delay: Duration,
}

impl GeneratorOptions {
    /// Deterministic options with no latency.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// A generated catalog and the parameters it was generated with.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<GameRecord>,
    /// When the catalog was produced.
    pub generated_at: DateTime<Utc>,
    /// Seed used for sale draws, if any.
    pub seed: Option<u64>,
}

impl Catalog {
    /// Records in catalog order.
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// Consume the catalog, keeping only the records.
    pub fn into_records(self) -> Vec<GameRecord> {
        self.records
    }

    /// Look up a record by id.
    pub fn get(&self, id: u32) -> Option<&GameRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Generate the built-in catalog.
pub fn generate_catalog(options: &GeneratorOptions) -> Catalog {
    let records = generate_from(source::builtin_entries(), options);
    debug!(total = records.len(), seed = ?options.seed, "Catalog generated");
    Catalog {
        records,
        generated_at: Utc::now(),
        seed: options.seed,
    }
}

/// Async one-shot load, mirroring a remote fetch. Never fails.
pub async fn fetch_catalog(options: GeneratorOptions) -> Catalog {
    if !options.load_delay.is_zero() {
        tokio::time::sleep(options.load_delay).await;
    }
    generate_catalog(&options)
}

/// Deduplicate `entries` by title and enrich each kept entry.
///
/// Ids are assigned densely over the kept entries, so a duplicate does not
/// leave a gap.
pub fn generate_from(
    entries: impl IntoIterator<Item = RawEntry>,
    options: &GeneratorOptions,
) -> Vec<GameRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for entry in entries {
        if !seen.insert(entry.title.clone()) {
            debug!(title = %entry.title, "Dropping duplicate catalog entry");
            continue;
        }
        let id = records.len() as u32 + 1;
        records.push(enrich(id, entry, options));
    }
    records
}

fn enrich(id: u32, entry: RawEntry, options: &GeneratorOptions) -> GameRecord {
    let mut rng = sale_rng(options.seed, id);
    let (is_on_sale, discount_percentage) = draw_sale(&mut rng, options.sale_model);
    GameRecord {
        id,
        price: price_for_rating(entry.rating),
        release_year: source::release_year(&entry.title),
        developer: source::developer(&entry.title).to_string(),
        platform: PLATFORMS.iter().map(|name| name.to_string()).collect(),
        is_on_sale,
        discount_percentage,
        title: entry.title,
        description: entry.description,
        image: entry.image,
        rating: entry.rating,
        genre: entry.genre,
    }
}

/// Higher ratings cost more; rounded down to a multiple of 5, minus a cent.
pub fn price_for_rating(rating: f64) -> f64 {
    let base = (rating * 7.0).floor() + 15.0;
    (base / 5.0).floor() * 5.0 - 0.01
}

fn sale_rng(seed: Option<u64>, id: u32) -> ChaCha8Rng {
    match seed {
        Some(seed) => {
            ChaCha8Rng::seed_from_u64(seed ^ u64::from(id).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        }
        None => ChaCha8Rng::seed_from_u64(rand::random()),
    }
}

fn draw_sale(rng: &mut impl Rng, model: SaleModel) -> (bool, u32) {
    match model {
        SaleModel::Coupled => {
            if rng.gen::<f64>() > SALE_THRESHOLD {
                (true, rng.gen_range(MIN_DISCOUNT..=MAX_DISCOUNT))
            } else {
                (false, 0)
            }
        }
        SaleModel::Independent => {
            let on_sale = rng.gen::<f64>() > SALE_THRESHOLD;
            let discount = if rng.gen::<f64>() > SALE_THRESHOLD {
                rng.gen_range(MIN_DISCOUNT..=MAX_DISCOUNT)
            } else {
                0
            };
            (on_sale, discount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::{DEFAULT_DEVELOPER, DEFAULT_RELEASE_YEAR};

    fn entry(title: &str, rating: f64) -> RawEntry {
        RawEntry::new(title, "desc", "https://example.com/x.png", rating, "Action")
    }

    #[test]
    fn deduplicates_by_first_title_with_dense_ids() {
        let entries = vec![
            entry("Alpha", 8.0),
            entry("Beta", 7.0),
            entry("Alpha", 9.9),
            entry("Gamma", 6.0),
            entry("Beta", 1.0),
        ];
        let records = generate_from(entries, &GeneratorOptions::seeded(7));
        let summary: Vec<_> = records
            .iter()
            .map(|record| (record.id, record.title.as_str(), record.rating))
            .collect();
        assert_eq!(
            summary,
            vec![(1, "Alpha", 8.0), (2, "Beta", 7.0), (3, "Gamma", 6.0)]
        );
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let records = generate_from(
            vec![entry("Alpha", 8.0), entry("alpha", 8.0)],
            &GeneratorOptions::default(),
        );
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn price_follows_rating_formula() {
        assert!((price_for_rating(9.5) - 79.99).abs() < 1e-9);
        assert!((price_for_rating(8.2) - 69.99).abs() < 1e-9);
        assert!((price_for_rating(0.0) - 14.99).abs() < 1e-9);
        assert!((price_for_rating(10.0) - 84.99).abs() < 1e-9);
    }

    #[test]
    fn unknown_titles_use_defaults() {
        let records = generate_from(vec![entry("Mystery", 5.0)], &GeneratorOptions::default());
        assert_eq!(records[0].release_year, DEFAULT_RELEASE_YEAR);
        assert_eq!(records[0].developer, DEFAULT_DEVELOPER);
        assert_eq!(
            records[0].platform,
            vec!["PC", "PlayStation", "Xbox", "Nintendo Switch"]
        );
    }

    #[test]
    fn builtin_catalog_is_enriched() {
        let catalog = generate_catalog(&GeneratorOptions::seeded(1));
        assert_eq!(catalog.len(), 9);
        let zelda = catalog.get(1).expect("first record");
        assert_eq!(zelda.title, "The Legend of Zelda: Breath of the Wild");
        assert_eq!(zelda.release_year, 2017);
        assert_eq!(zelda.developer, "Nintendo");
        assert!((zelda.price - 79.99).abs() < 1e-9);
        let ids: Vec<_> = catalog.records().iter().map(|record| record.id).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn seeded_generation_is_stable() {
        let first = generate_catalog(&GeneratorOptions::seeded(42));
        let second = generate_catalog(&GeneratorOptions::seeded(42));
        assert_eq!(first.records(), second.records());
    }

    #[test]
    fn coupled_sales_are_consistent() {
        for seed in 0..200 {
            for record in generate_catalog(&GeneratorOptions::seeded(seed)).records() {
                if record.is_on_sale {
                    assert!((MIN_DISCOUNT..=MAX_DISCOUNT).contains(&record.discount_percentage));
                } else {
                    assert_eq!(record.discount_percentage, 0);
                }
            }
        }
    }

    #[test]
    fn independent_discounts_stay_in_range() {
        let mut saw_discount = false;
        for seed in 0..200 {
            let options = GeneratorOptions {
                seed: Some(seed),
                sale_model: SaleModel::Independent,
                ..GeneratorOptions::default()
            };
            for record in generate_catalog(&options).records() {
                let discount = record.discount_percentage;
                assert!(discount == 0 || (MIN_DISCOUNT..=MAX_DISCOUNT).contains(&discount));
                saw_discount |= discount > 0;
            }
        }
        assert!(saw_discount);
    }

    #[tokio::test]
    async fn fetch_returns_generated_catalog() {
        let catalog = fetch_catalog(GeneratorOptions {
            seed: Some(9),
            load_delay: Duration::from_millis(1),
            ..GeneratorOptions::default()
        })
        .await;
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.seed, Some(9));
    }
}

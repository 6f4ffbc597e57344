//! Shared domain models.

use serde::{Deserialize, Serialize};

/// Platforms every catalog entry is offered on.
pub const PLATFORMS: [&str; 4] = ["PC", "PlayStation", "Xbox", "Nintendo Switch"];

/// A fully enriched catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// 1-based identifier assigned in catalog order.
    pub id: u32,
    /// Human-readable game title, unique within a catalog.
    pub title: String,
    /// Short blurb shown in the details pane.
    pub description: String,
    /// Cover art URL.
    pub image: String,
    /// Critic score on a 0-10 scale.
    pub rating: f64,
    /// Genre label (e.g. `Action RPG`).
    pub genre: String,
    /// Price in US dollars, always ending in `.99`.
    pub price: f64,
    /// Year of first release.
    pub release_year: i32,
    /// Studio credit.
    pub developer: String,
    /// Platforms the game is offered on.
    pub platform: Vec<String>,
    /// Whether the promotional sale badge is shown.
    pub is_on_sale: bool,
    /// Discount in percent, zero when no discount was drawn.
    pub discount_percentage: u32,
}

/// Coarse bucket used to colour ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    /// 9.0 and above.
    High,
    /// 8.0 up to 9.0.
    Mid,
    /// Everything below 8.0.
    Low,
}

impl GameRecord {
    /// Price before the discount was applied, if the game is on sale.
    ///
    /// A sale with a zero discount has no meaningful original price and
    /// returns `None`.
    pub fn original_price(&self) -> Option<f64> {
        if !self.is_on_sale || self.discount_percentage == 0 {
            return None;
        }
        Some(self.price / (1.0 - f64::from(self.discount_percentage) / 100.0))
    }

    /// Bucket the rating for display.
    pub fn rating_tier(&self) -> RatingTier {
        if self.rating >= 9.0 {
            RatingTier::High
        } else if self.rating >= 8.0 {
            RatingTier::Mid
        } else {
            RatingTier::Low
        }
    }

    /// Returns a user-facing label combining title and release year.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.title, self.release_year)
    }
}

/// Format a dollar amount the way the storefront does (`$79.99`).
pub fn format_price(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let dollars = group_thousands(cents / 100);
    format!("{sign}${dollars}.{:02}", cents % 100)
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Year used when a title has no release entry.
pub const DEFAULT_RELEASE_YEAR: i32 = 2020;
/// Studio credit used when a title has no developer entry.
pub const DEFAULT_DEVELOPER: &str = "Unknown Developer";

/// A catalog entry before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Title, also the deduplication key.
    pub title: String,
    /// Short blurb.
    pub description: String,
    /// Cover art URL.
    pub image: String,
    /// Critic score on a 0-10 scale.
    pub rating: f64,
    /// Genre label.
    pub genre: String,
}

impl RawEntry {
    /// Build an entry from borrowed strings.
    pub fn new(title: &str, description: &str, image: &str, rating: f64, genre: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            image: image.to_string(),
            rating,
            genre: genre.to_string(),
        }
    }
}

const COVER_BASE: &str = "https://images.igdb.com/igdb/image/upload/t_cover_big";

/// The built-in mock data set, in display order.
pub fn builtin_entries() -> Vec<RawEntry> {
    let cover = |code: &str| format!("{COVER_BASE}/{code}.png");
    vec![
        RawEntry::new(
            "The Legend of Zelda: Breath of the Wild",
            "Explore the vast kingdom of Hyrule in this critically acclaimed open-world adventure.",
            &cover("co1wyy"),
            9.5,
            "Adventure",
        ),
        RawEntry::new(
            "God of War: Ragnarok",
            "Kratos and Atreus venture through the Nine Realms in this action-packed Norse saga.",
            &cover("co6t5v"),
            9.3,
            "Action",
        ),
        RawEntry::new(
            "Cyberpunk 2077",
            "Dive into the neon-lit streets of Night City in this futuristic RPG.",
            &cover("co1r0n"),
            8.2,
            "RPG",
        ),
        RawEntry::new(
            "Elden Ring",
            "Unravel the mysteries of the Lands Between in this open-world dark fantasy RPG.",
            &cover("co3p8u"),
            9.7,
            "Action RPG",
        ),
        RawEntry::new(
            "Spider-Man: Miles Morales",
            "Swing through New York as Miles Morales and take on new threats.",
            &cover("co6t4i"),
            8.8,
            "Superhero",
        ),
        RawEntry::new(
            "Red Dead Redemption 2",
            "Follow Arthur Morgan and the Van der Linde gang across the dying Wild West.",
            &cover("co1r84"),
            9.6,
            "Adventure",
        ),
        RawEntry::new(
            "Hollow Knight",
            "Battle your way through the ruined kingdom of Hallownest in this indie classic.",
            &cover("co1r3h"),
            9.0,
            "Metroidvania",
        ),
        RawEntry::new(
            "The Witcher 3: Wild Hunt",
            "Become Geralt of Rivia and explore a vast open world full of monsters and magic.",
            &cover("co1rgn"),
            9.4,
            "RPG",
        ),
        RawEntry::new(
            "Assassin's Creed Valhalla",
            "Lead your Viking clan to glory as Eivor in this historical action RPG.",
            &cover("co1rj4"),
            8.6,
            "Action RPG",
        ),
    ]
}

static RELEASE_YEARS: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    HashMap::from([
        ("The Legend of Zelda: Breath of the Wild", 2017),
        ("God of War: Ragnarok", 2022),
        ("Cyberpunk 2077", 2020),
        ("Elden Ring", 2022),
        ("Spider-Man: Miles Morales", 2020),
        ("Red Dead Redemption 2", 2018),
        ("Hollow Knight", 2017),
        ("The Witcher 3: Wild Hunt", 2015),
        ("Assassin's Creed Valhalla", 2020),
    ])
});

static DEVELOPERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("The Legend of Zelda: Breath of the Wild", "Nintendo"),
        ("God of War: Ragnarok", "Santa Monica Studio"),
        ("Cyberpunk 2077", "CD Projekt Red"),
        ("Elden Ring", "FromSoftware"),
        ("Spider-Man: Miles Morales", "Insomniac Games"),
        ("Red Dead Redemption 2", "Rockstar Games"),
        ("Hollow Knight", "Team Cherry"),
        ("The Witcher 3: Wild Hunt", "CD Projekt Red"),
        ("Assassin's Creed Valhalla", "Ubisoft"),
    ])
});

/// Exact-title release year lookup.
pub fn release_year(title: &str) -> i32 {
    RELEASE_YEARS
        .get(title)
        .copied()
        .unwrap_or(DEFAULT_RELEASE_YEAR)
}

/// Exact-title developer lookup.
pub fn developer(title: &str) -> &'static str {
    DEVELOPERS.get(title).copied().unwrap_or(DEFAULT_DEVELOPER)
}

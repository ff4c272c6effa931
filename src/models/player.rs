//! Player record and the legacy bare-name normalization.

use serde::{Deserialize, Serialize};

/// Points every player starts with; also assumed for records that never stored any.
pub const STARTING_POINTS: i64 = 1000;

/// A registered player. Names are unique within a tournament and act as the player key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlayerRecord", rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    /// Decklist link, empty when none was given.
    #[serde(default)]
    pub deck: String,
    /// None for records that were never scored; read through [`Player::points`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub auto_final: bool,
}

impl Player {
    /// Create a new player with the given name and starting points.
    pub fn new(name: impl Into<String>, deck: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deck: deck.into(),
            points: Some(STARTING_POINTS),
            auto_final: false,
        }
    }

    /// Current points, defaulting to [`STARTING_POINTS`].
    pub fn points(&self) -> i64 {
        self.points.unwrap_or(STARTING_POINTS)
    }

    /// Add a (possibly negative) delta to the player's points.
    pub fn add_points(&mut self, change: i64) {
        self.points = Some(self.points() + change);
    }
}

/// On-disk shape of a player: older tournaments stored bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlayerRecord {
    Name(String),
    Full(PlayerFields),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerFields {
    name: String,
    #[serde(default)]
    deck: Option<String>,
    #[serde(default)]
    points: Option<i64>,
    #[serde(default)]
    auto_final: Option<bool>,
}

impl From<PlayerRecord> for Player {
    fn from(record: PlayerRecord) -> Self {
        match record {
            PlayerRecord::Name(name) => Self {
                name,
                deck: String::new(),
                points: None,
                auto_final: false,
            },
            PlayerRecord::Full(f) => Self {
                name: f.name,
                deck: f.deck.unwrap_or_default(),
                points: f.points,
                auto_final: f.auto_final.unwrap_or(false),
            },
        }
    }
}

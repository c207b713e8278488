use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::{GameError, GameResult};
use super::globals::*;
use super::tile::{Deed, Schedule, StaticKind, Tile, TileKind};

#[derive(Clone, Debug, Serialize, Deserialize)]
/// A declarative description of a board.
pub struct BoardSchema {
    pub name: String,
    /// One entry per tile, in board order.
    pub tiles: Vec<TileSchema>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// One entry of a board schema, tagged with the kind of tile it describes.
pub enum TileSchema {
    Property {
        idx: usize,
        name: String,
        color: Color,
        cost: Schedule,
        schedule: Schedule,
    },
    Infra {
        idx: usize,
        name: String,
        color: Color,
        cost: Schedule,
        schedule: Schedule,
    },
    Event {
        idx: usize,
        name: String,
        deck: DeckKind,
    },
    Tax {
        idx: usize,
        name: String,
        amount: Money,
    },
    Static {
        idx: usize,
        name: String,
        kind: StaticKind,
    },
}

impl TileSchema {
    fn idx(&self) -> usize {
        match self {
            TileSchema::Property { idx, .. }
            | TileSchema::Infra { idx, .. }
            | TileSchema::Event { idx, .. }
            | TileSchema::Tax { idx, .. }
            | TileSchema::Static { idx, .. } => *idx,
        }
    }

    /// Turn this entry into a tile, checking the amounts it lists.
    fn create(&self) -> GameResult<Tile> {
        let (name, kind) = match self {
            TileSchema::Property {
                name,
                color,
                cost,
                schedule,
                ..
            } => {
                check_deed(name, cost, schedule)?;
                (name, TileKind::Property(Deed::property(*color, *cost, *schedule)))
            }
            TileSchema::Infra {
                name,
                color,
                cost,
                schedule,
                ..
            } => {
                check_deed(name, cost, schedule)?;
                (
                    name,
                    TileKind::Infrastructure(Deed::infrastructure(*color, *cost, *schedule)),
                )
            }
            TileSchema::Event { name, deck, .. } => (name, TileKind::Event(*deck)),
            TileSchema::Tax { name, amount, .. } => {
                if *amount < 0 {
                    return Err(GameError::Configuration(format!(
                        "{} has a negative tax of {}",
                        name, amount
                    )));
                }
                (name, TileKind::Tax(*amount))
            }
            TileSchema::Static { name, kind, .. } => (name, TileKind::Static(*kind)),
        };

        Ok(Tile {
            name: name.clone(),
            index: self.idx(),
            kind,
        })
    }
}

/// A deed must have a positive title price and no negative amounts.
fn check_deed(name: &str, cost: &Schedule, fees: &Schedule) -> GameResult<()> {
    if cost.title <= 0 {
        return Err(GameError::Configuration(format!(
            "{} needs a positive title price",
            name
        )));
    }

    let amounts = [cost.house, cost.hotel, fees.title, fees.house, fees.hotel];
    if amounts.iter().any(|&amount| amount < 0) {
        return Err(GameError::Configuration(format!(
            "{} lists a negative amount",
            name
        )));
    }

    Ok(())
}

impl BoardSchema {
    /// The Singapore-edition board that ships with the crate.
    pub fn standard() -> GameResult<Self> {
        BoardSchema::from_json(STANDARD_SCHEMA_JSON)
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GameResult<Self> {
        let json = fs::read_to_string(path)?;
        BoardSchema::from_json(&json)
    }

    /// Construct the tiles of the board, in board order.
    pub fn build(&self) -> GameResult<Vec<Tile>> {
        if self.tiles.len() != BOARD_SIZE {
            return Err(GameError::Configuration(format!(
                "{} lists {} tiles, expected {}",
                self.name,
                self.tiles.len(),
                BOARD_SIZE
            )));
        }

        let mut tiles = Vec::with_capacity(BOARD_SIZE);
        for (position, entry) in self.tiles.iter().enumerate() {
            // Entries must be listed in board order
            if entry.idx() != position {
                return Err(GameError::Configuration(format!(
                    "tile at position {} is tagged with index {}",
                    position,
                    entry.idx()
                )));
            }

            tiles.push(entry.create()?);
        }

        // Players sent to jail are moved to this position directly
        if !matches!(
            tiles[JAIL_POSITION].kind,
            TileKind::Static(StaticKind::JustVisiting)
        ) {
            return Err(GameError::Configuration(format!(
                "tile {} must be the jail",
                JAIL_POSITION
            )));
        }

        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schema_builds() {
        let schema = BoardSchema::standard().unwrap();
        let tiles = schema.build().unwrap();

        assert_eq!(schema.name, "board-sg");
        assert_eq!(tiles.len(), BOARD_SIZE);
        assert_eq!(tiles[1].name, "Geylang Road");
        assert_eq!(tiles[39].name, "Marina Bay");
        assert_eq!(tiles.iter().filter(|t| t.is_purchasable()).count(), 28);
        assert!(tiles.iter().enumerate().all(|(i, t)| t.index == i));
    }

    #[test]
    fn test_schema_names_match_tiles() {
        let schema = BoardSchema::standard().unwrap();
        let tiles = schema.build().unwrap();

        for (entry, tile) in schema.tiles.iter().zip(&tiles) {
            let name = match entry {
                TileSchema::Property { name, .. }
                | TileSchema::Infra { name, .. }
                | TileSchema::Event { name, .. }
                | TileSchema::Tax { name, .. }
                | TileSchema::Static { name, .. } => name,
            };
            assert_eq!(name, &tile.name);
        }
    }

    #[test]
    fn test_short_schema_is_rejected() {
        let mut schema = BoardSchema::standard().unwrap();
        schema.tiles.pop();

        assert!(matches!(schema.build(), Err(GameError::Configuration(_))));
    }

    #[test]
    fn test_out_of_order_schema_is_rejected() {
        let mut schema = BoardSchema::standard().unwrap();
        schema.tiles.swap(1, 3);

        assert!(matches!(schema.build(), Err(GameError::Configuration(_))));
    }

    #[test]
    fn test_free_title_is_rejected() {
        let mut schema = BoardSchema::standard().unwrap();
        if let TileSchema::Property { cost, .. } = &mut schema.tiles[1] {
            cost.title = 0;
        }

        assert!(matches!(schema.build(), Err(GameError::Configuration(_))));
    }

    #[test]
    fn test_unknown_tile_type_is_a_json_error() {
        let json = r#"{"name": "broken", "tiles": [{"idx": 0, "type": "casino", "name": "Casino"}]}"#;
        assert!(matches!(BoardSchema::from_json(json), Err(GameError::Json(_))));
    }
}

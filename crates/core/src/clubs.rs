//! Club selection from distance, terrain and elevation
//!
//! The club table and the terrain overrides are both ordered lists: the first
//! club whose range holds the adjusted distance is the base match, then the
//! first terrain rule that applies decides the final club and its reason.

use tracing::debug;

use crate::types::{ElevationKind, Recommendation, TerrainKind};

/// Slack on range edges for products like `200.0 * 1.1`
const EDGE_TOLERANCE: f64 = 1e-9;

/// A club and the closed yardage interval it is normally hit from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClubRange {
    pub club: &'static str,
    pub min_yards: f64,
    pub max_yards: f64,
}

impl ClubRange {
    const fn new(club: &'static str, min_yards: f64, max_yards: f64) -> Self {
        Self {
            club,
            min_yards,
            max_yards,
        }
    }

    pub fn contains(&self, yards: f64) -> bool {
        self.min_yards - EDGE_TOLERANCE <= yards && yards <= self.max_yards + EDGE_TOLERANCE
    }
}

/// Driver to Putter; ranges overlap and the first match wins
pub const CLUB_RANGES: [ClubRange; 14] = [
    ClubRange::new("Driver", 200.0, 280.0),
    ClubRange::new("Madera 3", 180.0, 230.0),
    ClubRange::new("Madera 5", 170.0, 220.0),
    ClubRange::new("Hierro 3", 160.0, 210.0),
    ClubRange::new("Hierro 4", 150.0, 200.0),
    ClubRange::new("Hierro 5", 140.0, 180.0),
    ClubRange::new("Hierro 6", 130.0, 170.0),
    ClubRange::new("Hierro 7", 120.0, 160.0),
    ClubRange::new("Hierro 8", 110.0, 150.0),
    ClubRange::new("Hierro 9", 100.0, 140.0),
    ClubRange::new("Pitching Wedge (PW)", 80.0, 120.0),
    ClubRange::new("Sand Wedge (SW)", 60.0, 100.0),
    ClubRange::new("Lob Wedge (LW)", 40.0, 80.0),
    ClubRange::new("Putter", 0.0, 40.0),
];

pub const UNDETERMINED_CLUB: &str = "No se pudo determinar";

const UNDETERMINED_REASON: &str = "Lo siento, no pude determinar una recomendación adecuada.";

// ============================================================================
// Terrain Rules
// ============================================================================

/// What a terrain rule does with the base match
#[derive(Debug, Clone, Copy)]
enum Outcome {
    /// Replace the club
    Override {
        club: &'static str,
        reason: &'static str,
    },
    /// Keep the club; `{club}` in the template is replaced by its name
    Keep { template: &'static str },
}

struct TerrainRule {
    applies: fn(TerrainKind, &str, f64) -> bool,
    outcome: Outcome,
}

/// Evaluated in order once a base club is found
const TERRAIN_RULES: &[TerrainRule] = &[
    TerrainRule {
        applies: |terrain, club, _| terrain == TerrainKind::Bunker && !club.contains("Wedge"),
        outcome: Outcome::Override {
            club: "Sand Wedge (SW)",
            reason: "Recomiendo el Sand Wedge para salir del bunker con facilidad.",
        },
    },
    TerrainRule {
        applies: |terrain, _, yards| terrain == TerrainKind::Rough && yards > 150.0,
        outcome: Outcome::Override {
            club: "Hierro 5",
            reason: "Un hierro 5 es una buena opción para salir del rough con distancia.",
        },
    },
    TerrainRule {
        applies: |terrain, _, yards| terrain == TerrainKind::Green && yards <= 40.0,
        outcome: Outcome::Override {
            club: "Putter",
            reason: "Usa el putter para rodar la pelota hacia el hoyo.",
        },
    },
    TerrainRule {
        applies: |terrain, _, yards| terrain == TerrainKind::Tee && yards >= 200.0,
        outcome: Outcome::Override {
            club: "Driver",
            reason: "El driver es ideal para el tee de salida en distancias largas.",
        },
    },
    TerrainRule {
        applies: |terrain, _, _| terrain == TerrainKind::Fairway,
        outcome: Outcome::Keep {
            template: "El {club} es adecuado para esta distancia desde el fairway.",
        },
    },
    TerrainRule {
        applies: |_, _, _| true,
        outcome: Outcome::Keep {
            template: "Puedes usar el {club} para esta distancia.",
        },
    },
];

// ============================================================================
// Recommendation
// ============================================================================

/// Raw distance scaled by the slope
pub fn adjusted_distance(yards: f64, elevation: ElevationKind) -> f64 {
    yards * elevation.distance_factor()
}

/// First club in table order whose range holds the distance
pub fn base_club(yards: f64) -> Option<&'static ClubRange> {
    CLUB_RANGES.iter().find(|range| range.contains(yards))
}

pub fn recommend_club(
    distance_yards: f64,
    terrain: TerrainKind,
    elevation: ElevationKind,
) -> Recommendation {
    let yards = adjusted_distance(distance_yards, elevation);

    let Some(range) = base_club(yards) else {
        debug!(yards, "No club range holds the distance");
        return Recommendation {
            club: UNDETERMINED_CLUB.to_string(),
            justification: UNDETERMINED_REASON.to_string(),
        };
    };

    let outcome = TERRAIN_RULES
        .iter()
        .find(|rule| (rule.applies)(terrain, range.club, yards))
        .map(|rule| rule.outcome)
        .unwrap_or(Outcome::Keep {
            template: "Puedes usar el {club} para esta distancia.",
        });

    debug!(yards, base = range.club, terrain = terrain.as_str(), "Club selected");

    match outcome {
        Outcome::Override { club, reason } => Recommendation {
            club: club.to_string(),
            justification: reason.to_string(),
        },
        Outcome::Keep { template } => Recommendation {
            club: range.club.to_string(),
            justification: template.replace("{club}", range.club),
        },
    }
}

//! The military rank ladder over the 0-2000 RP scale.

use serde::Serialize;

/// Label shown for players who have not qualified for a rank yet.
pub const PROVISIONAL_LABEL: &str = "Provisional";

/// Top of the RP scale.
pub const MAX_SCORE: u32 = 2000;

/// One rung of the rank ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankTier {
    pub name: &'static str,
    pub abbrev: &'static str,
    /// Minimum RP score for this rank
    pub threshold: u32,
}

impl RankTier {
    /// Display label, e.g. "Captain (CPT)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.abbrev)
    }
}

/// Ladder in ascending threshold order. Warrant Officer 1 starts at exactly
/// 1099 and General caps the scale at exactly 2000.
pub const LADDER: [RankTier; 20] = [
    RankTier { name: "Private", abbrev: "PVT", threshold: 0 },
    RankTier { name: "Private First Class", abbrev: "PFC", threshold: 150 },
    RankTier { name: "Lance Corporal", abbrev: "LCPL", threshold: 280 },
    RankTier { name: "Corporal", abbrev: "CPL", threshold: 400 },
    RankTier { name: "Sergeant", abbrev: "SGT", threshold: 520 },
    RankTier { name: "Staff Sergeant", abbrev: "SSG", threshold: 640 },
    RankTier { name: "Sergeant First Class", abbrev: "SFC", threshold: 750 },
    RankTier { name: "Master Sergeant", abbrev: "MSG", threshold: 850 },
    RankTier { name: "First Sergeant", abbrev: "1SG", threshold: 940 },
    RankTier { name: "Sergeant Major", abbrev: "SGM", threshold: 1020 },
    RankTier { name: "Warrant Officer 1", abbrev: "WO1", threshold: 1099 },
    RankTier { name: "Chief Warrant Officer 2", abbrev: "CW2", threshold: 1199 },
    RankTier { name: "Second Lieutenant", abbrev: "2LT", threshold: 1299 },
    RankTier { name: "First Lieutenant", abbrev: "1LT", threshold: 1399 },
    RankTier { name: "Captain", abbrev: "CPT", threshold: 1499 },
    RankTier { name: "Major", abbrev: "MAJ", threshold: 1599 },
    RankTier { name: "Lieutenant Colonel", abbrev: "LTC", threshold: 1699 },
    RankTier { name: "Colonel", abbrev: "COL", threshold: 1799 },
    RankTier { name: "Brigadier General", abbrev: "BG", threshold: 1899 },
    RankTier { name: "General", abbrev: "GEN", threshold: 2000 },
];

/// A player's place on the ladder.
#[derive(Debug, Clone, Serialize)]
pub struct RankStanding {
    pub rank: RankTier,

    /// Next rank up, absent at the top of the ladder
    pub next: Option<RankTier>,

    /// Percent progress from the current threshold to the next (0-100)
    pub progress_percent: f64,

    /// Points still needed for the next rank; zero at the top
    pub points_to_next: u32,
}

impl RankStanding {
    pub fn label(&self) -> String {
        self.rank.label()
    }
}

/// Find the standing for an RP score. Scores above the scale clamp to the
/// top rank.
pub fn standing_for_score(score: u32) -> RankStanding {
    let score = score.min(MAX_SCORE);

    let idx = LADDER
        .iter()
        .rposition(|tier| tier.threshold <= score)
        .unwrap_or(0);

    let rank = LADDER[idx];
    let next = LADDER.get(idx + 1).copied();

    let (progress_percent, points_to_next) = match next {
        Some(next_tier) => {
            let span = (next_tier.threshold - rank.threshold) as f64;
            let into = (score - rank.threshold) as f64;
            (into / span * 100.0, next_tier.threshold - score)
        }
        None => (100.0, 0),
    };

    RankStanding {
        rank,
        next,
        progress_percent,
        points_to_next,
    }
}

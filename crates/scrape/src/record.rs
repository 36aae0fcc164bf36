// ABOUTME: Immutable per-request stats records and the raw-to-typed assembly layer.
// ABOUTME: from_raw constructors apply uniform numeric coercion and documented defaults per field.

//! Output records for one scraped profile.
//!
//! Parsers collect loosely-typed `Raw*` bundles of whatever text their
//! extractors found; the `from_raw` constructors here are the single place
//! where coercion and defaults are applied. Every numeric field of a
//! finished record is either the cleanly converted value or its documented
//! default, never a half-converted state. Records are created fresh per
//! request and never mutated after assembly.

use serde::{Deserialize, Serialize};

use crate::extract::convert;

/// One weapon block from the profile's top-weapons panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub name: String,
    pub weapon_type: String,
    pub silhouette_url: String,
    pub accuracy: Vec<String>,
    pub kills: u32,
}

/// One map block from the profile's top-maps panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStats {
    pub name: String,
    pub win_percentage: f64,
    pub matches: u32,
}

/// One role block from the profile's role breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleStats {
    pub name: String,
    pub win_rate: f64,
    pub kda: f64,
    pub wins: u32,
    pub losses: u32,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

/// Raw weapon fields as found in the page. `name` is the block's required
/// anchor; the parser skips any block where it is missing.
#[derive(Debug, Default, Clone)]
pub struct RawWeapon {
    pub name: String,
    pub weapon_type: Option<String>,
    pub silhouette_url: Option<String>,
    pub accuracy: Vec<String>,
    pub kills: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct RawMap {
    pub name: String,
    pub win_percentage: Option<String>,
    pub matches: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct RawRole {
    pub name: String,
    pub win_rate: Option<String>,
    pub kda: Option<String>,
    pub wins: Option<String>,
    pub losses: Option<String>,
    pub kills: Option<String>,
    pub deaths: Option<String>,
    pub assists: Option<String>,
}

impl WeaponStats {
    pub fn from_raw(raw: RawWeapon) -> Self {
        Self {
            name: raw.name,
            weapon_type: convert::label_or(raw.weapon_type, "Unknown"),
            silhouette_url: raw.silhouette_url.unwrap_or_default(),
            accuracy: raw.accuracy,
            kills: convert::int_or(raw.kills.as_deref(), 0),
        }
    }
}

impl MapStats {
    pub fn from_raw(raw: RawMap) -> Self {
        Self {
            name: raw.name,
            win_percentage: convert::float_or(raw.win_percentage.as_deref(), 0.0),
            matches: convert::int_or(raw.matches.as_deref(), 0),
        }
    }
}

impl RoleStats {
    pub fn from_raw(raw: RawRole) -> Self {
        Self {
            name: raw.name,
            win_rate: convert::float_or(raw.win_rate.as_deref(), 0.0),
            kda: convert::float_or(raw.kda.as_deref(), 0.0),
            wins: convert::int_or(raw.wins.as_deref(), 0),
            losses: convert::int_or(raw.losses.as_deref(), 0),
            kills: convert::int_or(raw.kills.as_deref(), 0),
            deaths: convert::int_or(raw.deaths.as_deref(), 0),
            assists: convert::int_or(raw.assists.as_deref(), 0),
        }
    }
}

/// Raw field bundle produced by the Valorant parser.
#[derive(Debug, Default, Clone)]
pub struct RawValorant {
    pub current_rank: Option<String>,
    pub peak_rank: Option<String>,
    pub peak_rank_episode: Option<String>,
    pub kd_ratio: Option<String>,
    pub kills: Option<String>,
    pub wins: Option<String>,
    pub matches_played: Option<String>,
    pub headshot_percentage: Option<String>,
    pub win_percentage: Option<String>,
    pub playtime: Option<String>,
    pub acs: Option<String>,
    pub tracker_score: Option<String>,
    pub top_weapons: Vec<RawWeapon>,
    pub top_maps: Vec<RawMap>,
    pub roles: Vec<RawRole>,
}

/// Valorant profile statistics for one player and season scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValorantStats {
    pub username: String,
    pub platform: String,
    pub season: String,
    pub current_rank: String,
    pub peak_rank: String,
    pub peak_rank_episode: String,
    pub kd_ratio: f64,
    pub kills: u32,
    pub wins: u32,
    pub matches_played: u32,
    pub headshot_percentage: f64,
    pub win_percentage: f64,
    pub hours_played: f64,
    pub acs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker_score: Option<u32>,
    pub top_weapons: Vec<WeaponStats>,
    pub top_maps: Vec<MapStats>,
    pub roles: Vec<RoleStats>,
}

impl ValorantStats {
    pub fn from_raw(username: &str, season: &str, raw: RawValorant) -> Self {
        Self {
            username: username.to_string(),
            platform: "valorant".to_string(),
            season: season.to_string(),
            current_rank: convert::label_or(raw.current_rank, "Unknown"),
            peak_rank: convert::label_or(raw.peak_rank, "Unknown"),
            peak_rank_episode: convert::label_or(raw.peak_rank_episode, "N/A"),
            kd_ratio: convert::float_or(raw.kd_ratio.as_deref(), 0.0),
            kills: convert::int_or(raw.kills.as_deref(), 0),
            wins: convert::int_or(raw.wins.as_deref(), 0),
            matches_played: convert::int_or(raw.matches_played.as_deref(), 0),
            headshot_percentage: convert::float_or(raw.headshot_percentage.as_deref(), 0.0),
            win_percentage: convert::float_or(raw.win_percentage.as_deref(), 0.0),
            hours_played: convert::hours(raw.playtime.as_deref()),
            acs: convert::float_or(raw.acs.as_deref(), 0.0),
            tracker_score: convert::int_opt(raw.tracker_score.as_deref()),
            top_weapons: raw.top_weapons.into_iter().map(WeaponStats::from_raw).collect(),
            top_maps: raw.top_maps.into_iter().map(MapStats::from_raw).collect(),
            roles: raw.roles.into_iter().map(RoleStats::from_raw).collect(),
        }
    }
}

/// Raw field bundle produced by the CS2 parser.
#[derive(Debug, Default, Clone)]
pub struct RawCs2 {
    pub current_rank: Option<String>,
    pub peak_rating: Option<String>,
    pub peak_tier: Option<String>,
    pub kd_ratio: Option<String>,
    pub matches_played: Option<String>,
    pub headshot_percentage: Option<String>,
    pub wins: Option<String>,
    pub kills: Option<String>,
    pub playtime: Option<String>,
    pub win_percentage: Option<String>,
    pub tracker_score: Option<String>,
}

/// CS2 profile statistics for one player and playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cs2Stats {
    pub steam_id: String,
    pub platform: String,
    pub playlist: String,
    pub current_rank: String,
    pub peak_rank: String,
    pub kd_ratio: f64,
    pub matches_played: u32,
    pub headshot_percentage: f64,
    pub wins: u32,
    pub kills: u32,
    pub hours_played: f64,
    pub win_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker_score: Option<u32>,
}

impl Cs2Stats {
    pub fn from_raw(steam_id: &str, playlist: &str, raw: RawCs2) -> Self {
        let peak_rank = match (raw.peak_rating, raw.peak_tier) {
            (Some(rating), Some(tier)) => format!("{} ({})", rating, tier),
            (Some(rating), None) => rating,
            (None, _) => "Unknown".to_string(),
        };
        Self {
            steam_id: steam_id.to_string(),
            platform: "cs2".to_string(),
            playlist: playlist.to_string(),
            current_rank: convert::label_or(raw.current_rank, "Unknown"),
            peak_rank,
            kd_ratio: convert::float_or(raw.kd_ratio.as_deref(), 0.0),
            matches_played: convert::int_or(raw.matches_played.as_deref(), 0),
            headshot_percentage: convert::float_or(raw.headshot_percentage.as_deref(), 0.0),
            wins: convert::int_or(raw.wins.as_deref(), 0),
            kills: convert::int_or(raw.kills.as_deref(), 0),
            hours_played: convert::hours(raw.playtime.as_deref()),
            win_percentage: convert::float_or(raw.win_percentage.as_deref(), 0.0),
            tracker_score: convert::int_opt(raw.tracker_score.as_deref()),
        }
    }
}

/// Raw field bundle produced by the TFT parser.
#[derive(Debug, Default, Clone)]
pub struct RawTft {
    pub current_rank: Option<String>,
    pub league_points: Option<String>,
    pub wins: Option<String>,
    pub losses: Option<String>,
    pub win_percentage: Option<String>,
    pub matches_played: Option<String>,
}

/// TFT profile statistics for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TftStats {
    pub username: String,
    pub platform: String,
    pub current_rank: String,
    pub league_points: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_percentage: f64,
    pub matches_played: u32,
}

impl TftStats {
    pub fn from_raw(username: &str, raw: RawTft) -> Self {
        Self {
            username: username.to_string(),
            platform: "tft".to_string(),
            current_rank: convert::label_or(raw.current_rank, "Unknown"),
            league_points: convert::int_or(raw.league_points.as_deref(), 0),
            wins: convert::int_or(raw.wins.as_deref(), 0),
            losses: convert::int_or(raw.losses.as_deref(), 0),
            win_percentage: convert::float_or(raw.win_percentage.as_deref(), 0.0),
            matches_played: convert::int_or(raw.matches_played.as_deref(), 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valorant_from_raw_coerces_known_values() {
        let raw = RawValorant {
            current_rank: Some("Diamond 2".to_string()),
            kd_ratio: Some("1.18".to_string()),
            kills: Some("1,234".to_string()),
            win_percentage: Some("54.3%".to_string()),
            playtime: Some("817.2h Play Time".to_string()),
            tracker_score: Some("812 /1,000".to_string()),
            ..Default::default()
        };
        let stats = ValorantStats::from_raw("TenZ#0505", "current", raw);
        assert_eq!(stats.username, "TenZ#0505");
        assert_eq!(stats.platform, "valorant");
        assert_eq!(stats.current_rank, "Diamond 2");
        assert_eq!(stats.kd_ratio, 1.18);
        assert_eq!(stats.kills, 1234);
        assert_eq!(stats.win_percentage, 54.3);
        assert_eq!(stats.hours_played, 817.2);
        // "812 /1,000" is not a clean integer token, so the score is absent.
        assert_eq!(stats.tracker_score, None);
    }

    #[test]
    fn test_valorant_from_raw_all_defaults() {
        let stats = ValorantStats::from_raw("ghost", "all", RawValorant::default());
        assert_eq!(stats.current_rank, "Unknown");
        assert_eq!(stats.peak_rank, "Unknown");
        assert_eq!(stats.peak_rank_episode, "N/A");
        assert_eq!(stats.kills, 0);
        assert_eq!(stats.kd_ratio, 0.0);
        assert_eq!(stats.hours_played, 0.0);
        assert_eq!(stats.tracker_score, None);
        assert!(stats.top_weapons.is_empty());
    }

    #[test]
    fn test_cs2_peak_rank_rendering() {
        let raw = RawCs2 {
            peak_rating: Some("18111".to_string()),
            peak_tier: Some("Gold".to_string()),
            ..Default::default()
        };
        let stats = Cs2Stats::from_raw("765611", "premier", raw);
        assert_eq!(stats.peak_rank, "18111 (Gold)");

        let missing = Cs2Stats::from_raw("765611", "premier", RawCs2::default());
        assert_eq!(missing.peak_rank, "Unknown");
        assert_eq!(missing.current_rank, "Unknown");
    }

    #[test]
    fn test_tracker_score_omitted_from_json_when_absent() {
        let stats = Cs2Stats::from_raw("765611", "premier", RawCs2::default());
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("tracker_score").is_none());
        assert_eq!(json["platform"], "cs2");
    }

    #[test]
    fn test_tft_from_raw() {
        let raw = RawTft {
            current_rank: Some("Platinum IV".to_string()),
            league_points: Some("56".to_string()),
            wins: Some("102".to_string()),
            losses: Some("98".to_string()),
            win_percentage: Some("51.0".to_string()),
            matches_played: Some("200".to_string()),
        };
        let stats = TftStats::from_raw("k3soju", raw);
        assert_eq!(stats.current_rank, "Platinum IV");
        assert_eq!(stats.league_points, 56);
        assert_eq!(stats.wins, 102);
        assert_eq!(stats.losses, 98);
        assert_eq!(stats.matches_played, 200);
    }

    #[test]
    fn test_nested_assembly_defaults() {
        let weapon = WeaponStats::from_raw(RawWeapon {
            name: "Vandal".to_string(),
            kills: Some("not-a-number".to_string()),
            ..Default::default()
        });
        assert_eq!(weapon.kills, 0);
        assert_eq!(weapon.weapon_type, "Unknown");
        assert_eq!(weapon.silhouette_url, "");
    }
}

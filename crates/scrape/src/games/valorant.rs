// ABOUTME: Valorant profile parser: rank summary, stat panel, and the weapon/map/role breakdowns.
// ABOUTME: Composes the shared extractors in a fixed sequence and assembles a ValorantStats record.

use std::str::FromStr;

use scraper::{ElementRef, Html};
use url::Url;

use crate::extract::select;
use crate::games::GameParser;
use crate::record::{RawMap, RawRole, RawValorant, RawWeapon, ValorantStats};

const BASE_URL: &str = "https://tracker.gg/valorant/profile/riot";

/// Season scope for a Valorant profile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Season {
    #[default]
    Current,
    All,
}

impl Season {
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Current => "current",
            Season::All => "all",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown season '{0}', expected 'current' or 'all'")]
pub struct ParseSeasonError(String);

impl FromStr for Season {
    type Err = ParseSeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Season::Current),
            "all" => Ok(Season::All),
            other => Err(ParseSeasonError(other.to_string())),
        }
    }
}

/// The Valorant parser strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Valorant;

impl GameParser for Valorant {
    type Query = Season;
    type Record = ValorantStats;

    fn profile_url(&self, player: &str, season: &Season) -> String {
        let mut url = Url::parse(BASE_URL).unwrap();
        url.path_segments_mut()
            .unwrap()
            .push(player)
            .push("overview");
        if *season == Season::All {
            url.query_pairs_mut().append_pair("season", "all");
        }
        url.to_string()
    }

    fn extract(&self, doc: &Html, player: &str, season: &Season) -> ValorantStats {
        let (peak_rank, peak_rank_episode) = peak_rank(doc);
        let raw = RawValorant {
            current_rank: current_rank(doc),
            peak_rank,
            peak_rank_episode,
            kd_ratio: select::stat_value(doc, "K/D Ratio"),
            kills: kills(doc),
            wins: select::stat_value(doc, "Wins"),
            matches_played: matches_played(doc),
            headshot_percentage: select::stat_value(doc, "Headshot %"),
            win_percentage: select::stat_value(doc, "Win %"),
            playtime: select::select_first(doc, "span.playtime").map(select::text_of),
            acs: select::stat_value(doc, "ACS"),
            tracker_score: tracker_score(doc),
            top_weapons: top_weapons(doc),
            top_maps: top_maps(doc),
            roles: roles(doc),
        };
        ValorantStats::from_raw(player, season.as_str(), raw)
    }
}

/// Current competitive rank from the primary rating summary. The tier label
/// is prefixed only when an RR node is present, matching the page's layout
/// for ranked-rated entries.
fn current_rank(doc: &Html) -> Option<String> {
    let section = select::select_first(doc, "div.rating-summary__content")?;
    let info = select::descendant(section, "div.rating-entry__rank-info")?;
    let value = select::descendant(info, "div.value").map(select::text_of)?;
    let label = select::descendant(info, "div.label").map(select::text_of);
    match (label, select::descendant(info, "span.mmr")) {
        (Some(label), Some(_)) => Some(format!("{} {}", label, value)),
        _ => Some(value),
    }
}

/// Peak rank and its episode/act context from the secondary rating summary.
fn peak_rank(doc: &Html) -> (Option<String>, Option<String>) {
    let info = select::select_first(doc, "div.rating-summary__content--secondary")
        .and_then(|section| select::descendant(section, "div.rating-entry__rank-info"));
    let Some(info) = info else {
        return (None, None);
    };
    let value = select::descendant(info, "div.value").map(select::text_of);
    let episode = select::descendant(info, "div.subtext").map(select::text_of);
    (value, episode)
}

/// Kills live in a `div.numbers` block; the value span is located through
/// the label's parent rather than document order.
fn kills(doc: &Html) -> Option<String> {
    let label = select::find_titled(doc, "span", "Kills")?;
    let numbers = select::ancestor(label, "div", "numbers")?;
    select::descendant(numbers, "span.value").map(select::text_of)
}

fn matches_played(doc: &Html) -> Option<String> {
    select::select_first(doc, "span.matches")
        .map(|el| select::text_of(el).replace("Matches", "").trim().to_string())
}

/// Tracker score renders as e.g. "812 / 1,000"; only the leading token counts.
fn tracker_score(doc: &Html) -> Option<String> {
    let section = select::select_first(doc, "div.score__text")?;
    let value = select::descendant(section, "div.value").map(select::text_of)?;
    value.split_whitespace().next().map(str::to_string)
}

/// Top weapons, one block per `div.weapon`. A block without a name anchor
/// is skipped, not failed; document order is preserved.
fn top_weapons(doc: &Html) -> Vec<RawWeapon> {
    select::select_each(doc, "div.weapon")
        .into_iter()
        .filter_map(|block| {
            let name = select::descendant(block, "div.weapon__name").map(select::text_of)?;
            Some(RawWeapon {
                name,
                weapon_type: select::descendant(block, "div.weapon__type").map(select::text_of),
                silhouette_url: select::descendant(block, "img")
                    .and_then(|img| select::attr_of(img, "src")),
                accuracy: texts_of(select::descendant_each(block, "div.weapon__accuracy-hits span")),
                kills: select::descendant(block, "span.value").map(select::text_of),
            })
        })
        .collect()
}

/// Top maps, one block per `div.top-maps__maps-map`.
fn top_maps(doc: &Html) -> Vec<RawMap> {
    select::select_each(doc, "div.top-maps__maps-map")
        .into_iter()
        .filter_map(|block| {
            let name = select::descendant(block, "div.name").map(select::text_of)?;
            Some(RawMap {
                name,
                win_percentage: select::descendant(block, "div.value").map(select::text_of),
                matches: select::descendant(block, "div.label")
                    .map(|el| select::text_of(el).replace("Matches", "").trim().to_string()),
            })
        })
        .collect()
}

/// Per-role breakdown, one block per `div.roles__role`.
fn roles(doc: &Html) -> Vec<RawRole> {
    select::select_each(doc, "div.roles__role")
        .into_iter()
        .filter_map(|block| {
            let name = select::descendant(block, "div.role__name").map(select::text_of)?;
            let stat = |css: &str| select::descendant(block, css).map(select::text_of);
            Some(RawRole {
                name,
                win_rate: stat("span.role__win-rate"),
                kda: stat("span.role__kda"),
                wins: stat("span.role__wins"),
                losses: stat("span.role__losses"),
                kills: stat("span.role__kills"),
                deaths: stat("span.role__deaths"),
                assists: stat("span.role__assists"),
            })
        })
        .collect()
}

fn texts_of(els: Vec<ElementRef<'_>>) -> Vec<String> {
    els.into_iter().map(select::text_of).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"
        <!DOCTYPE html>
        <html>
        <body>
            <div class="score__container">
                <div class="score__text">
                    <div class="label">Tracker Score</div>
                    <div class="value">812 / 1,000</div>
                </div>
            </div>
            <div class="rating-summary__content">
                <div class="rating-entry__rank-info">
                    <div class="label">Immortal</div>
                    <div class="value">1</div>
                    <span class="mmr">212 RR</span>
                </div>
            </div>
            <div class="rating-summary__content rating-summary__content--secondary">
                <div class="rating-entry__rank-info">
                    <div class="value">Radiant</div>
                    <div class="subtext">Episode 7: Act II</div>
                </div>
            </div>
            <span class="matches">1,204 Matches</span>
            <span class="playtime">817.2h Play Time</span>
            <div class="giant-stats">
                <div class="numbers">
                    <span class="name" title="K/D Ratio">K/D Ratio</span>
                    <span class="value">1.18</span>
                </div>
                <div class="numbers">
                    <span class="name" title="Kills">Kills</span>
                    <span class="value">21,345</span>
                </div>
                <div class="numbers">
                    <span class="name" title="Wins">Wins</span>
                    <span class="value">640</span>
                </div>
                <div class="numbers">
                    <span class="name" title="Headshot %">Headshot %</span>
                    <span class="value">27.4%</span>
                </div>
                <div class="numbers">
                    <span class="name" title="Win %">Win %</span>
                    <span class="value">53.2%</span>
                </div>
                <div class="numbers">
                    <span class="name" title="ACS">ACS</span>
                    <span class="value">241.7</span>
                </div>
            </div>
            <div class="weapon">
                <div class="weapon__name">Vandal</div>
                <div class="weapon__type">Rifle</div>
                <img class="weapon__silhouette" src="https://cdn.example/vandal.png">
                <div class="weapon__accuracy-hits">
                    <span>H 31%</span>
                    <span>B 58%</span>
                    <span>L 11%</span>
                </div>
                <span class="value">9,812</span>
            </div>
            <div class="weapon">
                <div class="weapon__type">Rifle</div>
                <span class="value">4,102</span>
            </div>
            <div class="weapon">
                <div class="weapon__name">Operator</div>
                <span class="value">1,044</span>
            </div>
            <div class="top-maps__maps-map">
                <div class="name">Ascent</div>
                <div class="value">57.8%</div>
                <div class="label">186 Matches</div>
            </div>
            <div class="top-maps__maps-map">
                <div class="name">Bind</div>
                <div class="value">49.1%</div>
                <div class="label">142 Matches</div>
            </div>
            <div class="roles__role">
                <div class="role__name">Duelist</div>
                <span class="role__win-rate">54.0%</span>
                <span class="role__kda">1.42</span>
                <span class="role__wins">310</span>
                <span class="role__losses">264</span>
                <span class="role__kills">10,204</span>
                <span class="role__deaths">8,311</span>
                <span class="role__assists">2,577</span>
            </div>
        </body>
        </html>
    "#;

    fn parse_fixture() -> ValorantStats {
        let doc = Html::parse_document(FIXTURE);
        Valorant.extract(&doc, "TenZ#0505", &Season::Current)
    }

    #[test]
    fn test_profile_url_encodes_player_and_season() {
        assert_eq!(
            Valorant.profile_url("TenZ#0505", &Season::Current),
            "https://tracker.gg/valorant/profile/riot/TenZ%230505/overview"
        );
        assert_eq!(
            Valorant.profile_url("TenZ#0505", &Season::All),
            "https://tracker.gg/valorant/profile/riot/TenZ%230505/overview?season=all"
        );
    }

    #[test]
    fn test_extracts_known_fixture_values() {
        let stats = parse_fixture();
        assert_eq!(stats.username, "TenZ#0505");
        assert_eq!(stats.platform, "valorant");
        assert_eq!(stats.season, "current");
        assert_eq!(stats.current_rank, "Immortal 1");
        assert_eq!(stats.peak_rank, "Radiant");
        assert_eq!(stats.peak_rank_episode, "Episode 7: Act II");
        assert_eq!(stats.kd_ratio, 1.18);
        assert_eq!(stats.kills, 21_345);
        assert_eq!(stats.wins, 640);
        assert_eq!(stats.matches_played, 1204);
        assert_eq!(stats.headshot_percentage, 27.4);
        assert_eq!(stats.win_percentage, 53.2);
        assert_eq!(stats.hours_played, 817.2);
        assert_eq!(stats.acs, 241.7);
        assert_eq!(stats.tracker_score, Some(812));
    }

    #[test]
    fn test_weapon_block_without_name_is_skipped() {
        let stats = parse_fixture();
        let names: Vec<&str> = stats.top_weapons.iter().map(|w| w.name.as_str()).collect();
        // Middle block has no name anchor; order of the rest is preserved.
        assert_eq!(names, vec!["Vandal", "Operator"]);
        assert_eq!(stats.top_weapons[0].kills, 9812);
        assert_eq!(stats.top_weapons[0].weapon_type, "Rifle");
        assert_eq!(
            stats.top_weapons[0].silhouette_url,
            "https://cdn.example/vandal.png"
        );
        assert_eq!(
            stats.top_weapons[0].accuracy,
            vec!["H 31%", "B 58%", "L 11%"]
        );
        // The skipped block's fields never bleed into the next record.
        assert_eq!(stats.top_weapons[1].weapon_type, "Unknown");
        assert_eq!(stats.top_weapons[1].kills, 1044);
    }

    #[test]
    fn test_maps_and_roles_in_document_order() {
        let stats = parse_fixture();
        assert_eq!(stats.top_maps.len(), 2);
        assert_eq!(stats.top_maps[0].name, "Ascent");
        assert_eq!(stats.top_maps[0].win_percentage, 57.8);
        assert_eq!(stats.top_maps[0].matches, 186);
        assert_eq!(stats.top_maps[1].name, "Bind");

        assert_eq!(stats.roles.len(), 1);
        let duelist = &stats.roles[0];
        assert_eq!(duelist.name, "Duelist");
        assert_eq!(duelist.win_rate, 54.0);
        assert_eq!(duelist.kda, 1.42);
        assert_eq!(duelist.wins, 310);
        assert_eq!(duelist.losses, 264);
        assert_eq!(duelist.kills, 10_204);
        assert_eq!(duelist.deaths, 8311);
        assert_eq!(duelist.assists, 2577);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = parse_fixture();
        let second = parse_fixture();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_rank_container_defaults_rank_only() {
        let stripped = FIXTURE.replace("rating-summary__content", "gone");
        let doc = Html::parse_document(&stripped);
        let stats = Valorant.extract(&doc, "TenZ#0505", &Season::Current);
        assert_eq!(stats.current_rank, "Unknown");
        assert_eq!(stats.peak_rank, "Unknown");
        assert_eq!(stats.peak_rank_episode, "N/A");
        // Every other field still populates normally.
        assert_eq!(stats.kills, 21_345);
        assert_eq!(stats.kd_ratio, 1.18);
        assert_eq!(stats.tracker_score, Some(812));
    }

    #[test]
    fn test_empty_document_is_all_defaults() {
        let doc = Html::parse_document("<html><body></body></html>");
        let stats = Valorant.extract(&doc, "ghost#0000", &Season::All);
        assert_eq!(stats.season, "all");
        assert_eq!(stats.current_rank, "Unknown");
        assert_eq!(stats.kills, 0);
        assert_eq!(stats.tracker_score, None);
        assert!(stats.top_weapons.is_empty());
        assert!(stats.top_maps.is_empty());
        assert!(stats.roles.is_empty());
    }

    #[test]
    fn test_season_from_str() {
        assert_eq!("current".parse::<Season>().unwrap(), Season::Current);
        assert_eq!("all".parse::<Season>().unwrap(), Season::All);
        assert!("episode7".parse::<Season>().is_err());
    }
}

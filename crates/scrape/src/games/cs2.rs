// ABOUTME: CS2 profile parser with the explicit premier/competitive two-branch rank rule.
// ABOUTME: Competitive playlists expose a highest rating in place of the premier current rating card.

use std::str::FromStr;

use scraper::Html;
use url::Url;

use crate::extract::select;
use crate::games::GameParser;
use crate::record::{Cs2Stats, RawCs2};

const BASE_URL: &str = "https://tracker.gg/cs2/profile/steam";

/// Playlist scope for a CS2 profile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playlist {
    #[default]
    Premier,
    Competitive,
}

impl Playlist {
    pub fn as_str(self) -> &'static str {
        match self {
            Playlist::Premier => "premier",
            Playlist::Competitive => "competitive",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown playlist '{0}', expected 'premier' or 'competitive'")]
pub struct ParsePlaylistError(String);

impl FromStr for Playlist {
    type Err = ParsePlaylistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "premier" => Ok(Playlist::Premier),
            "competitive" => Ok(Playlist::Competitive),
            other => Err(ParsePlaylistError(other.to_string())),
        }
    }
}

/// The CS2 parser strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cs2;

impl GameParser for Cs2 {
    type Query = Playlist;
    type Record = Cs2Stats;

    fn profile_url(&self, player: &str, playlist: &Playlist) -> String {
        let mut url = Url::parse(BASE_URL).unwrap();
        url.path_segments_mut()
            .unwrap()
            .push(player)
            .push("overview");
        url.query_pairs_mut()
            .append_pair("playlist", playlist.as_str());
        url.to_string()
    }

    fn extract(&self, doc: &Html, player: &str, playlist: &Playlist) -> Cs2Stats {
        // Competitive pages carry no current-rating card; the highlighted
        // highest rating stands in for it. The two layouts are distinct
        // structures, not variations of one lookup.
        let current_rank = match playlist {
            Playlist::Competitive => competitive_highest_rating(doc),
            Playlist::Premier => premier_current_rating(doc),
        };
        let (peak_rating, peak_tier) = peak_rating(doc);
        let raw = RawCs2 {
            current_rank,
            peak_rating,
            peak_tier,
            kd_ratio: select::stat_value(doc, "K/D Ratio"),
            matches_played: matches_played(doc),
            headshot_percentage: select::stat_value(doc, "Headshot %"),
            wins: select::stat_value(doc, "Wins"),
            kills: kills(doc),
            playtime: select::select_first(doc, "span.playtime").map(select::text_of),
            win_percentage: select::stat_value(doc, "Win %"),
            tracker_score: tracker_score(doc),
        };
        Cs2Stats::from_raw(player, playlist.as_str(), raw)
    }
}

fn competitive_highest_rating(doc: &Html) -> Option<String> {
    let section = select::select_first(doc, "div.trn-profile-highlighted-content__stats")?;
    select::descendant(section, "span.stat__value").map(select::text_of)
}

/// Premier rating: the "Current Rating" card title, up to its card, down to
/// the emblem label. Thousands separators are stripped from the label.
fn premier_current_rating(doc: &Html) -> Option<String> {
    let header = select::find_text(doc, "h3.trn-card__title", "Current Rating")?;
    let card = select::ancestor(header, "div", "trn-card")?;
    select::descendant(card, "label.rating-emblem__label")
        .map(|el| select::text_of(el).replace(',', ""))
}

fn peak_rating(doc: &Html) -> (Option<String>, Option<String>) {
    let header = select::find_text(
        doc,
        "div.text-16.font-stylized.font-medium.text-secondary.mb-2",
        "Peak Rating",
    );
    let Some(card) = header.and_then(|h| select::ancestor(h, "div", "p-4")) else {
        return (None, None);
    };
    let rating = select::descendant(card, "label.rating-emblem__label")
        .map(|el| select::text_of(el).replace(',', ""));
    let tier = select::descendant(card, "div.text-18.font-medium").map(select::text_of);
    (rating, tier)
}

fn kills(doc: &Html) -> Option<String> {
    let label = select::find_titled(doc, "span", "Kills")?;
    let numbers = select::ancestor(label, "div", "numbers")?;
    select::descendant(numbers, "span.value").map(select::text_of)
}

fn matches_played(doc: &Html) -> Option<String> {
    select::select_first(doc, "span.matches")
        .map(|el| select::text_of(el).replace("Matches", "").trim().to_string())
}

fn tracker_score(doc: &Html) -> Option<String> {
    let section = select::select_first(doc, "div.score__text")?;
    let value = select::descendant(section, "div.value").map(select::text_of)?;
    value.split_whitespace().next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"
        <!DOCTYPE html>
        <html>
        <body>
            <div class="trn-profile-highlighted-content__stats">
                <span class="stat__value">The Global Elite</span>
            </div>
            <div class="trn-card">
                <h3 class="trn-card__title">Current Rating</h3>
                <div class="rating-emblem">
                    <label class="rating-emblem__label">18,344</label>
                </div>
            </div>
            <div class="p-4">
                <div class="text-16 font-stylized font-medium text-secondary mb-2">Peak Rating</div>
                <div class="rating-emblem">
                    <label class="rating-emblem__label">19,001</label>
                </div>
                <div class="text-18 font-medium">Supreme</div>
            </div>
            <span class="matches">N/A Matches</span>
            <span class="playtime">1,032.4h Play Time</span>
            <div class="giant-stats">
                <div class="numbers">
                    <span class="name" title="K/D Ratio">K/D Ratio</span>
                    <span class="value">1.04</span>
                </div>
                <div class="numbers">
                    <span class="name" title="Kills">Kills</span>
                    <span class="value">48,202</span>
                </div>
                <div class="numbers">
                    <span class="name" title="Wins">Wins</span>
                    <span class="value">1,512</span>
                </div>
                <div class="numbers">
                    <span class="name" title="Headshot %">Headshot %</span>
                    <span class="value">46.1%</span>
                </div>
                <div class="numbers">
                    <span class="name" title="Win %">Win %</span>
                    <span class="value">52.8%</span>
                </div>
            </div>
            <div class="score__text">
                <div class="label">Tracker Score</div>
                <div class="value">640 / 1,000</div>
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn test_profile_url_always_carries_playlist() {
        assert_eq!(
            Cs2.profile_url("76561198000000000", &Playlist::Premier),
            "https://tracker.gg/cs2/profile/steam/76561198000000000/overview?playlist=premier"
        );
        assert_eq!(
            Cs2.profile_url("76561198000000000", &Playlist::Competitive),
            "https://tracker.gg/cs2/profile/steam/76561198000000000/overview?playlist=competitive"
        );
    }

    #[test]
    fn test_premier_branch_reads_current_rating_card() {
        let doc = Html::parse_document(FIXTURE);
        let stats = Cs2.extract(&doc, "76561198000000000", &Playlist::Premier);
        assert_eq!(stats.playlist, "premier");
        assert_eq!(stats.current_rank, "18344");
        assert_eq!(stats.peak_rank, "19001 (Supreme)");
        assert_eq!(stats.kd_ratio, 1.04);
        assert_eq!(stats.kills, 48_202);
        assert_eq!(stats.wins, 1512);
        assert_eq!(stats.headshot_percentage, 46.1);
        assert_eq!(stats.win_percentage, 52.8);
        assert_eq!(stats.hours_played, 1032.4);
        assert_eq!(stats.tracker_score, Some(640));
        // Malformed matches text defaults rather than propagating.
        assert_eq!(stats.matches_played, 0);
    }

    #[test]
    fn test_competitive_branch_reads_highest_rating() {
        let doc = Html::parse_document(FIXTURE);
        let stats = Cs2.extract(&doc, "76561198000000000", &Playlist::Competitive);
        assert_eq!(stats.playlist, "competitive");
        assert_eq!(stats.current_rank, "The Global Elite");
        // Everything outside the rank branch is shared between playlists.
        assert_eq!(stats.peak_rank, "19001 (Supreme)");
        assert_eq!(stats.kills, 48_202);
    }

    #[test]
    fn test_missing_rank_cards_default() {
        let doc = Html::parse_document("<html><body></body></html>");
        let stats = Cs2.extract(&doc, "7656", &Playlist::Premier);
        assert_eq!(stats.current_rank, "Unknown");
        assert_eq!(stats.peak_rank, "Unknown");
        assert_eq!(stats.tracker_score, None);
    }

    #[test]
    fn test_playlist_from_str() {
        assert_eq!("premier".parse::<Playlist>().unwrap(), Playlist::Premier);
        assert_eq!(
            "competitive".parse::<Playlist>().unwrap(),
            Playlist::Competitive
        );
        assert!("wingman".parse::<Playlist>().is_err());
    }
}

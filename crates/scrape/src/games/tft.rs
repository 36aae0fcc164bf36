// ABOUTME: TFT profile parser: progression rank with league points plus the win/loss stat panel.
// ABOUTME: The simplest strategy, with no season or playlist axis.

use scraper::Html;
use url::Url;

use crate::extract::select;
use crate::games::GameParser;
use crate::record::{RawTft, TftStats};

const BASE_URL: &str = "https://tracker.gg/tft/profile/riot";

/// The TFT parser strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tft;

impl GameParser for Tft {
    type Query = ();
    type Record = TftStats;

    fn profile_url(&self, player: &str, _query: &()) -> String {
        let mut url = Url::parse(BASE_URL).unwrap();
        url.path_segments_mut()
            .unwrap()
            .push(player)
            .push("overview");
        url.to_string()
    }

    fn extract(&self, doc: &Html, player: &str, _query: &()) -> TftStats {
        let (current_rank, league_points) = progression(doc);
        let raw = RawTft {
            current_rank,
            league_points,
            wins: select::stat_value(doc, "Wins"),
            losses: select::stat_value(doc, "Losses"),
            win_percentage: select::stat_value(doc, "Win %"),
            matches_played: select::stat_value(doc, "Matches Played"),
        };
        TftStats::from_raw(player, raw)
    }
}

/// Rank and league points live together in the highlighted progression
/// stat; the LP text carries a "Tier Progress:" prefix and "LP" suffix.
fn progression(doc: &Html) -> (Option<String>, Option<String>) {
    let Some(section) = select::select_first(doc, "div.highlighted-stat--progression") else {
        return (None, None);
    };
    let rank = select::descendant(section, "div.highlight-text").map(select::text_of);
    let league_points = select::descendant(section, "span.progression").map(|el| {
        select::text_of(el)
            .replace("Tier Progress: ", "")
            .replace(" LP", "")
            .trim()
            .to_string()
    });
    (rank, league_points)
}

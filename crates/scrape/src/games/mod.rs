// ABOUTME: Per-game parser implementations sharing one parser interface and the field extractor utilities.
// ABOUTME: Each game contributes a profile URL builder and a fixed extraction sequence over the parsed page.

pub mod cs2;
pub mod tft;
pub mod valorant;

use scraper::Html;

pub use cs2::{Cs2, Playlist};
pub use tft::Tft;
pub use valorant::{Season, Valorant};

/// One stats-site game, as a strategy over the shared extractor utilities.
///
/// A parser owns the mapping from player identifier (plus its game's query
/// axis) to a profile URL, and the fixed sequence of field extractions that
/// turns one fetched page into one record. Extraction never fails: a field
/// whose anchors are missing lands at its documented default, and the
/// record is assembled regardless.
pub trait GameParser {
    /// The season/playlist axis for this game, `()` when there is none.
    type Query;
    /// The assembled stats record.
    type Record;

    /// Builds the profile URL for a player, percent-encoding the identifier.
    fn profile_url(&self, player: &str, query: &Self::Query) -> String;

    /// Runs the extraction sequence over a parsed page and assembles the record.
    fn extract(&self, doc: &Html, player: &str, query: &Self::Query) -> Self::Record;
}

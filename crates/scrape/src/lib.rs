// ABOUTME: Main library entry point for the player-stats scraping core.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, game parsers, records, and ScrapeError.

//! Scraping core for tracker.gg player statistics.
//!
//! This crate fetches rendered profile pages through a FlareSolverr
//! instance, runs a per-game extraction sequence over the parsed HTML, and
//! assembles one immutable stats record per request. Missing or malformed
//! page fragments default field-by-field instead of failing the parse.
//!
//! # Example
//!
//! ```no_run
//! use playerstats_scrape::{Client, Season, Valorant};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), playerstats_scrape::ScrapeError> {
//!     let client = Client::builder().build();
//!     match client.player_stats(&Valorant, "TenZ#0505", Season::Current).await? {
//!         Some(stats) => println!("{} is {}", stats.username, stats.current_rank),
//!         None => println!("no stats found"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod extract;
pub mod games;
pub mod options;
pub mod record;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::games::{Cs2, GameParser, Playlist, Season, Tft, Valorant};
pub use crate::options::{ClientBuilder, Options};
pub use crate::record::{
    Cs2Stats, MapStats, RoleStats, TftStats, ValorantStats, WeaponStats,
};

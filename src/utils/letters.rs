use once_cell::sync::Lazy;

use crate::{game::error::SettingsError, models::Letter};

/// Word the board is scanned for unless configured otherwise
pub const DEFAULT_TARGET_WORD: &str = "FOX";

/// Tiles dealt per letter at game setup
pub static DEFAULT_TILE_COUNTS: Lazy<Vec<(Letter, usize)>> =
    Lazy::new(|| vec![(Letter::F, 5), (Letter::O, 6), (Letter::X, 5)]);

/// Parse a tile multiplicity list such as `F=5,O=6,X=5`.
/// A letter listed twice has its counts summed.
pub fn parse_tile_counts(raw: &str) -> Result<Vec<(Letter, usize)>, SettingsError> {
    let mut counts: Vec<(Letter, usize)> = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let malformed = || SettingsError::MalformedTileCount(entry.to_string());

        let (letter, count) = entry.split_once('=').ok_or_else(malformed)?;
        let mut chars = letter.trim().chars();
        let ch = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => return Err(malformed()),
        };
        let letter = Letter::try_from(ch).map_err(SettingsError::UnknownLetter)?;
        let count: usize = count.trim().parse().map_err(|_| malformed())?;

        match counts.iter_mut().find(|(l, _)| *l == letter) {
            Some((_, existing)) => *existing += count,
            None => counts.push((letter, count)),
        }
    }

    Ok(counts)
}

/// Total number of tiles a count list produces
pub fn total_tiles(counts: &[(Letter, usize)]) -> usize {
    counts.iter().map(|(_, n)| n).sum()
}

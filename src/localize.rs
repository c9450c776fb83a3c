//! Per-request localisation of cached games.
//!
//! Cached values are shared between requests, so a translated description is
//! always written to a copy. The game held by the cache keeps its original
//! text.

use crate::error::Result;
use crate::model::Game;
use crate::provider::Translator;

/// Return a copy of `game` with its description translated to `language`.
///
/// The copy is returned unchanged when no language is requested or the game
/// has no description.
pub async fn localize_game<T: Translator>(
    game: &Game,
    translator: &T,
    language: Option<&str>,
) -> Result<Game> {
    let mut localized = game.clone();

    let language = match language.map(str::trim).filter(|l| !l.is_empty()) {
        Some(language) => language,
        None => return Ok(localized),
    };

    if let Some(description) = game.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let translated = translator.translate(description, None, language).await?;
        debug!("Localized game {} to {}", game.id, language);
        localized.description = Some(translated);
    }

    Ok(localized)
}

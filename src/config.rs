use anyhow::{Context, Result};
use std::{env, time::Duration};

use crate::{
    game::{GameSettings, TargetWord},
    utils::letters::{parse_tile_counts, total_tiles, DEFAULT_TARGET_WORD},
};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub settings: GameSettings,
    /// Sessions nobody watches are dropped after this long without activity
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
        };

        let settings = GameSettings {
            width: env::var("BOARD_WIDTH")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .context("BOARD_WIDTH must be a number")?,
            height: env::var("BOARD_HEIGHT")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .context("BOARD_HEIGHT must be a number")?,
            target: env::var("TARGET_WORD")
                .unwrap_or_else(|_| DEFAULT_TARGET_WORD.to_string())
                .parse::<TargetWord>()
                .context("TARGET_WORD must only use tile letters")?,
            tile_counts: parse_tile_counts(
                &env::var("TILE_COUNTS").unwrap_or_else(|_| "F=5,O=6,X=5".to_string()),
            )
            .context("TILE_COUNTS must look like F=5,O=6,X=5")?,
        };
        settings.validate().context("Invalid game settings")?;
        if total_tiles(&settings.tile_counts) < settings.width * settings.height {
            tracing::warn!(
                "Only {} tiles for a {}x{} board; a game without the word can never fill up",
                total_tiles(&settings.tile_counts),
                settings.width,
                settings.height
            );
        }

        let game = GameConfig {
            settings,
            session_idle: Duration::from_secs(
                env::var("SESSION_IDLE_SECS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .unwrap_or(600),
            ),
        };

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            game: GameConfig {
                settings: GameSettings::default(),
                session_idle: Duration::from_secs(1),
            },
        };
        assert_eq!(config.server_addr(), "127.0.0.1:8080");
    }
}

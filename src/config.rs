//! Game parameters
//!
//! Read once at session start from the page URL (or command-line arguments on
//! native), validated and clamped before any grid is built. The restart
//! mechanism hands the same values back through the query string.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::limit;

/// Validated game parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawConfig")]
pub struct GameConfig {
    /// Grid side length (2-9)
    pub size: u32,
    /// Number of bombs (1 to size³ - 1)
    pub bomb_count: u32,
}

/// Unvalidated wire form; deserialization clamps through [`GameConfig::new`]
#[derive(Deserialize)]
struct RawConfig {
    size: u32,
    bomb_count: u32,
}

impl From<RawConfig> for GameConfig {
    fn from(raw: RawConfig) -> Self {
        Self::new(raw.size, raw.bomb_count)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            bomb_count: DEFAULT_BOMBS,
        }
    }
}

impl GameConfig {
    /// Build from typed values, clamping both into range
    pub fn new(size: u32, bomb_count: u32) -> Self {
        Self::from_values(Some(size as i64), Some(bomb_count as i64))
    }

    /// Build from raw text values (`None` when the parameter is absent)
    pub fn from_raw(size: Option<&str>, bombs: Option<&str>) -> Self {
        Self::from_values(read_param("size", size), read_param("bombs", bombs))
    }

    fn from_values(size: Option<i64>, bombs: Option<i64>) -> Self {
        let size = limit(
            size,
            MIN_GRID_SIZE as i64,
            MAX_GRID_SIZE as i64,
            DEFAULT_GRID_SIZE as i64,
        ) as u32;
        let max_bombs = max_bombs_for(size) as i64;
        let bomb_count = limit(bombs, MIN_BOMBS as i64, max_bombs, DEFAULT_BOMBS as i64) as u32;
        Self { size, bomb_count }
    }

    /// Parse `size` and `bombs` out of a URL or a bare query string
    pub fn from_query(url: &str) -> Self {
        Self::from_raw(query_param(url, "size"), query_param(url, "bombs"))
    }

    /// Parse `key=value` command-line arguments
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query = args
            .into_iter()
            .map(|a| a.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("&");
        Self::from_query(&query)
    }

    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        (self.size * self.size * self.size) as usize
    }

    /// Most bombs this grid size allows
    pub fn max_bombs(&self) -> u32 {
        max_bombs_for(self.size)
    }

    /// Query string carrying these parameters
    pub fn to_query(&self) -> String {
        format!("size={}&bombs={}", self.size, self.bomb_count)
    }

    /// Page URL that starts a fresh session with the same parameters
    pub fn restart_url(&self) -> String {
        format!("{}?{}", INDEX_PAGE, self.to_query())
    }

    /// Read parameters from the current page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn from_location() -> Self {
        match web_sys::window().and_then(|w| w.location().href().ok()) {
            Some(href) => {
                let config = Self::from_query(&href);
                log::info!("Config from URL: size={} bombs={}", config.size, config.bomb_count);
                config
            }
            None => {
                log::info!("No page location, using default config");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_location() -> Self {
        Self::default()
    }
}

fn max_bombs_for(size: u32) -> u32 {
    size * size * size - 1
}

/// Parse a single numeric parameter.
///
/// Fractional values are truncated; anything else non-numeric is an error.
pub fn parse_param(key: &'static str, raw: Option<&str>) -> Result<i64, ConfigError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(ConfigError::Missing(key));
    };
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v.trunc() as i64),
        _ => Err(ConfigError::NotANumber {
            key,
            raw: raw.to_string(),
        }),
    }
}

fn read_param(key: &'static str, raw: Option<&str>) -> Option<i64> {
    match parse_param(key, raw) {
        Ok(v) => Some(v),
        Err(ConfigError::Missing(_)) => None,
        Err(e) => {
            log::warn!("{e}, using default");
            None
        }
    }
}

/// First value of `key` in the query part of `url`.
///
/// Accepts a full URL (`page?a=1&b=2#frag`) or a bare query (`a=1&b=2`).
pub fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let query = url.split_once('?').map_or(url, |(_, q)| q);
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

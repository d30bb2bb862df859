// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::BoardConfig;
use crate::error::Result;

pub struct BoardReader;

impl BoardReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a JSON board mapping, either bare (`{"mapping": [...]}`) or
    /// wrapped in a `board_config` object.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<BoardConfig> {
        let path_str = path.as_ref().display().to_string();
        log::info!("Loading board mapping: {path_str}");

        let content = fs::read_to_string(path)?;
        let config = parse_board_config(&content)?;

        if config.mapping.is_empty() {
            log::warn!("Board mapping {path_str} declares no pins");
        } else {
            log::info!("Loaded {} pin assignments", config.mapping.len());
        }
        Ok(config)
    }
}

impl Default for BoardReader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_board_config(content: &str) -> Result<BoardConfig> {
    let mut value: Value = serde_json::from_str(content)?;
    if let Some(inner) = value.get_mut("board_config") {
        value = inner.take();
    }
    Ok(serde_json::from_value(value)?)
}

//! UCI options: definitions, validation and mapping onto search parameters

use crate::search::SearchParams;

/// UCI option types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionType {
    Spin { default: i64, min: i64, max: i64 },
    String { default: String },
}

/// Individual UCI option definition
#[derive(Debug, Clone)]
pub struct UciOption {
    pub name: &'static str,
    pub opt_type: OptionType,
}

impl UciOption {
    /// The `option name ...` line announced after `uci`
    pub fn announce(&self) -> String {
        match &self.opt_type {
            OptionType::Spin { default, min, max } => format!(
                "option name {} type spin default {} min {} max {}",
                self.name, default, min, max
            ),
            OptionType::String { default } => {
                format!("option name {} type string default {}", self.name, default)
            }
        }
    }
}

pub const HASH_MIN: usize = 1;
pub const HASH_MAX: usize = 4096;
pub const DEPTH_MIN: u8 = 1;
pub const DEPTH_MAX: u8 = 32;

/// Current option values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOptions {
    /// Hash table size in MB
    pub hash: usize,

    /// Default search depth for `go` without a depth
    pub depth: u8,

    /// Tie-break seed; None = entropy
    pub seed: Option<u64>,
}

impl Default for UciOptions {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            hash: params.tt_size_mb,
            depth: params.max_depth,
            seed: params.seed,
        }
    }
}

impl UciOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Option definitions in announcement order
    pub fn definitions() -> Vec<UciOption> {
        let defaults = Self::default();
        vec![
            UciOption {
                name: "Hash",
                opt_type: OptionType::Spin {
                    default: defaults.hash as i64,
                    min: HASH_MIN as i64,
                    max: HASH_MAX as i64,
                },
            },
            UciOption {
                name: "Depth",
                opt_type: OptionType::Spin {
                    default: defaults.depth as i64,
                    min: DEPTH_MIN as i64,
                    max: DEPTH_MAX as i64,
                },
            },
            UciOption {
                name: "Seed",
                opt_type: OptionType::String {
                    default: "random".to_string(),
                },
            },
        ]
    }

    /// Set option value; the error string is reported to the GUI
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), String> {
        let value = value
            .map(str::trim)
            .ok_or_else(|| format!("Option {} requires a value", name))?;
        match name.to_ascii_lowercase().as_str() {
            "hash" => {
                let mb: usize = value
                    .parse()
                    .map_err(|_| format!("Invalid value for option Hash: {}", value))?;
                if !(HASH_MIN..=HASH_MAX).contains(&mb) {
                    return Err(format!("Hash must be between {} and {} MB", HASH_MIN, HASH_MAX));
                }
                self.hash = mb;
            }
            "depth" => {
                let depth: u8 = value
                    .parse()
                    .map_err(|_| format!("Invalid value for option Depth: {}", value))?;
                if !(DEPTH_MIN..=DEPTH_MAX).contains(&depth) {
                    return Err(format!("Depth must be between {} and {}", DEPTH_MIN, DEPTH_MAX));
                }
                self.depth = depth;
            }
            "seed" => {
                self.seed = if value.eq_ignore_ascii_case("random") {
                    None
                } else {
                    Some(
                        value
                            .parse()
                            .map_err(|_| format!("Invalid value for option Seed: {}", value))?,
                    )
                };
            }
            _ => return Err(format!("Unknown option: {}", name)),
        }
        Ok(())
    }

    /// Search parameters carrying these option values over `base`
    pub fn apply(&self, base: &SearchParams) -> SearchParams {
        SearchParams {
            max_depth: self.depth,
            tt_size_mb: self.hash,
            seed: self.seed,
            ..base.clone()
        }
    }
}

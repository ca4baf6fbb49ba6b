//! `KEY=VALUE` configuration files.
//!
//! ```text
//! # a 20x15 maze
//! WIDTH=20
//! HEIGHT=15
//! ENTRY=0,0
//! EXIT=14,19
//! OUTPUT_FILE=maze.txt
//! PERFECT=True
//! SEED=42
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Keys are case insensitive, a repeated key
//! overrides the earlier value and unknown keys are ignored with a warning.

use std::fs;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use error_chain::bail;
use log::{debug, warn};
use rand::Rng;

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::masks::{Motif, MotifPolicy};
use crate::maze::MazeParameters;
use crate::utils::{self, FnvHashMap};

pub const DEFAULT_OUTPUT_FILE: &str = "maze.txt";

const KNOWN_KEYS: [&str; 9] = ["WIDTH", "HEIGHT", "ENTRY", "EXIT", "SEED", "PERFECT", "OUTPUT_FILE",
                               "MOTIF", "MOTIF_POLICY"];

/// A validated configuration.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    pub entry: GridCoordinate,
    pub exit: GridCoordinate,
    /// None means a fresh seed is drawn for every run.
    pub seed: Option<u64>,
    pub output_file: PathBuf,
    pub motif: bool,
    pub motif_policy: MotifPolicy,
}

impl MazeConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<MazeConfig> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .chain_err(|| format!("unable to read config file {}", path.display()))?;
        let config = text.parse::<MazeConfig>()
                         .chain_err(|| format!("bad config file {}", path.display()))?;
        debug!("loaded {:?} from {}", config, path.display());
        Ok(config)
    }

    /// The seed to carve with, drawing and logging a random one if none was configured.
    pub fn seed_or_random(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::thread_rng().gen::<u64>();
                warn!("no SEED configured, using {}", seed);
                seed
            }
        }
    }

    pub fn to_parameters(&self) -> MazeParameters {
        MazeParameters {
            width: self.width,
            height: self.height,
            seed: self.seed_or_random(),
            entry: self.entry,
            exit: self.exit,
            motif: if self.motif { Some(Motif::forty_two()) } else { None },
            motif_policy: self.motif_policy,
        }
    }

    /// Check the configuration describes a maze that can be generated.
    pub fn validate(&self) -> Result<()> {
        let mut params = MazeParameters::new(self.width, self.height, 0);
        params.entry = self.entry;
        params.exit = self.exit;
        params.validate().map(|_| ())
    }
}

impl FromStr for MazeConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<MazeConfig> {
        let raw = raw_entries(s)?;
        for key in raw.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            warn!("ignoring unknown config key {}", key);
        }

        let width = required_number(&raw, "WIDTH")?;
        let height = required_number(&raw, "HEIGHT")?;
        let entry = optional_value(&raw, "ENTRY", parse_coordinate)?
            .unwrap_or_else(|| GridCoordinate::new(0, 0));
        let exit = optional_value(&raw, "EXIT", parse_coordinate)?
            .unwrap_or_else(|| GridCoordinate::new(height.saturating_sub(1), width.saturating_sub(1)));
        let seed = optional_value(&raw, "SEED", parse_number::<u64>)?;

        if !optional_value(&raw, "PERFECT", parse_bool)?.unwrap_or(true) {
            bail!(ErrorKind::InvalidConfig("PERFECT=False is not supported, every maze is perfect"
                                               .to_owned()));
        }

        let output_file = raw.get("OUTPUT_FILE")
                             .map(|(_, value)| PathBuf::from(value))
                             .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));
        let motif = optional_value(&raw, "MOTIF", parse_bool)?.unwrap_or(true);
        let motif_policy = optional_value(&raw, "MOTIF_POLICY", parse_motif_policy)?.unwrap_or_default();

        let config = MazeConfig {
            width,
            height,
            entry,
            exit,
            seed,
            output_file,
            motif,
            motif_policy,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Upper cased key to (line number, value). The last occurrence of a key wins.
type RawEntries = FnvHashMap<String, (usize, String)>;

fn raw_entries(text: &str) -> Result<RawEntries> {
    let mut raw = utils::fnv_hashmap(KNOWN_KEYS.len());
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut key_value = line.splitn(2, '=');
        let key = key_value.next().unwrap_or("").trim();
        let value = match key_value.next() {
            Some(value) => value.trim(),
            None => bail!(ErrorKind::InvalidConfig(format!("line {}: expected KEY=VALUE but found {:?}",
                                                           line_number, line))),
        };
        if key.is_empty() {
            bail!(ErrorKind::InvalidConfig(format!("line {}: empty key", line_number)));
        }

        let key = key.to_ascii_uppercase();
        if let Some((previous_line, _)) = raw.insert(key.clone(), (line_number, value.to_owned())) {
            debug!("{} on line {} overrides line {}", key, line_number, previous_line);
        }
    }
    Ok(raw)
}

type ValueResult<T> = ::std::result::Result<T, String>;

fn optional_value<T, F>(raw: &RawEntries, key: &str, parse: F) -> Result<Option<T>>
    where F: Fn(&str, &str) -> ValueResult<T>
{
    match raw.get(key) {
        Some(&(line_number, ref value)) => {
            parse(key, value.as_str()).map(Some).map_err(|reason| {
                ErrorKind::InvalidConfig(format!("line {}: {}", line_number, reason)).into()
            })
        }
        None => Ok(None),
    }
}

fn required_number(raw: &RawEntries, key: &str) -> Result<usize> {
    match optional_value(raw, key, parse_number::<usize>)? {
        Some(n) => Ok(n),
        None => bail!(ErrorKind::InvalidConfig(format!("missing required key {}", key))),
    }
}

fn parse_number<T: FromStr<Err = ParseIntError>>(key: &str, value: &str) -> ValueResult<T> {
    value.parse::<T>().map_err(|e| format!("{}={:?} is not a number: {}", key, value, e))
}

fn parse_coordinate(key: &str, value: &str) -> ValueResult<GridCoordinate> {
    value.parse::<GridCoordinate>()
         .map_err(|e| format!("{}={:?} is not a row,col pair: {}", key, value, e))
}

fn parse_bool(key: &str, value: &str) -> ValueResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!("{}={:?} should be True or False", key, value)),
    }
}

fn parse_motif_policy(key: &str, value: &str) -> ValueResult<MotifPolicy> {
    value.parse::<MotifPolicy>()
         .map_err(|_| format!("{}={:?} should be blocked or opened", key, value))
}

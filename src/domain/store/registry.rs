//! Named per-retailer store instances

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::shared::errors::StoreError;

use super::KvStore;

/// The fixed set of tracked stores, each bound to its own default file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Retailer {
    Common,
    Target,
    PokemonCenter,
    GameStop,
    Evo,
}

impl Retailer {
    /// Default collection file name under the data directory.
    pub fn store_file(&self) -> &'static str {
        match self {
            Retailer::Common => "common.json",
            Retailer::Target => "target.json",
            Retailer::PokemonCenter => "pk_center.json",
            Retailer::GameStop => "gamestop.json",
            Retailer::Evo => "evo.json",
        }
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Retailer::Common => "common",
            Retailer::Target => "target",
            Retailer::PokemonCenter => "pokemon_center",
            Retailer::GameStop => "gamestop",
            Retailer::Evo => "evo",
        };
        f.write_str(name)
    }
}

impl FromStr for Retailer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Retailer::Common),
            "target" => Ok(Retailer::Target),
            "pokemon_center" => Ok(Retailer::PokemonCenter),
            "gamestop" => Ok(Retailer::GameStop),
            "evo" => Ok(Retailer::Evo),
            other => Err(format!("unknown retailer {other:?}")),
        }
    }
}

/// Context object handing out the per-retailer store instances.
///
/// Constructed once at startup and passed by reference to whichever worker
/// needs it. Each retailer's store is opened exactly once, by the worker
/// that owns it; there is no process-global state.
#[derive(Debug, Clone)]
pub struct StoreRegistry {
    data_dir: PathBuf,
}

impl StoreRegistry {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Open the single store instance for `retailer` at its default path.
    pub fn open(&self, retailer: Retailer) -> Result<KvStore, StoreError> {
        KvStore::open(self.data_dir.join(retailer.store_file()))
    }
}

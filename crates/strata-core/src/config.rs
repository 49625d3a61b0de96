//! # Bridge Configuration
//!
//! Host-controlled settings for the bridge.
//!
//! [`BridgeConfig`] is the plain value the host hands to
//! [`Bridge::start`](crate::runtime::Bridge::start). It can be built by hand or
//! read from the environment:
//!
//! - `STRATA_MAX_DEPTH`: initial max print depth (default: 8)
//! - `STRATA_SEARCH_PATH`: initial search path for the embedded side
//! - `STRATA_DEBUG`: when set (to anything), enables diagnostics
//!
//! Once started, the bridge keeps the live values in [`Settings`], which the
//! host may update at any time. The max depth is read fresh at the start of
//! every top-level print.

use std::cell::{Cell, RefCell};
use std::env;

use once_cell::unsync::OnceCell;

use crate::error::{BridgeError, BridgeResult};

/// Environment variable that enables diagnostics.
pub const DIAGNOSTICS_ENV: &str = "STRATA_DEBUG";
/// Environment variable holding the initial max print depth.
pub const MAX_DEPTH_ENV: &str = "STRATA_MAX_DEPTH";
/// Environment variable holding the initial search path.
pub const SEARCH_PATH_ENV: &str = "STRATA_SEARCH_PATH";

/// Max print depth used when nothing else is configured.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Startup configuration for a bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig
{
    /// Initial max print depth.
    pub max_depth: u32,
    /// Initial search path, if any.
    pub search_path: Option<String>,
    /// Force diagnostics on or off. `None` defers to `STRATA_DEBUG`, read at
    /// first use.
    pub diagnostics: Option<bool>,
}

impl Default for BridgeConfig
{
    fn default() -> Self
    {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            search_path: None,
            diagnostics: None,
        }
    }
}

impl BridgeConfig
{
    /// Read the configuration from the process environment.
    ///
    /// ## Errors
    ///
    /// `InvalidArgument` if `STRATA_MAX_DEPTH` is set but isn't a non-negative integer.
    pub fn from_env() -> BridgeResult<Self>
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// ## Errors
    ///
    /// Same as [`BridgeConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BridgeResult<Self>
    {
        let max_depth = match lookup(MAX_DEPTH_ENV) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|err| {
                BridgeError::InvalidArgument(format!("{MAX_DEPTH_ENV}={raw:?} is not a valid depth: {err}"))
            })?,
            None => DEFAULT_MAX_DEPTH,
        };
        let search_path = lookup(SEARCH_PATH_ENV).filter(|path| !path.is_empty());

        Ok(Self {
            max_depth,
            search_path,
            diagnostics: None,
        })
    }
}

/// Live settings of a running bridge.
///
/// Uses single-threaded interior mutability: the host updates settings from
/// the same thread that drives printing.
#[derive(Debug)]
pub struct Settings
{
    max_depth: Cell<u32>,
    search_path: RefCell<Option<String>>,
    diagnostics: OnceCell<bool>,
}

impl Settings
{
    #[must_use]
    pub fn from_config(config: BridgeConfig) -> Self
    {
        let diagnostics = OnceCell::new();
        if let Some(enabled) = config.diagnostics {
            let _ = diagnostics.set(enabled);
        }
        Self {
            max_depth: Cell::new(config.max_depth),
            search_path: RefCell::new(config.search_path),
            diagnostics,
        }
    }

    pub fn max_depth(&self) -> u32
    {
        self.max_depth.get()
    }

    pub fn set_max_depth(&self, max_depth: u32)
    {
        self.max_depth.set(max_depth);
    }

    /// Copy of the current search path.
    pub fn search_path(&self) -> Option<String>
    {
        self.search_path.borrow().clone()
    }

    /// Replace the search path wholesale. The previous value is dropped.
    pub fn set_search_path(&self, search_path: &str)
    {
        *self.search_path.borrow_mut() = Some(search_path.to_owned());
    }

    /// Whether diagnostics are enabled. The environment is consulted once.
    pub fn diagnostics(&self) -> bool
    {
        *self.diagnostics.get_or_init(|| env::var_os(DIAGNOSTICS_ENV).is_some())
    }
}

impl Default for Settings
{
    fn default() -> Self
    {
        Self::from_config(BridgeConfig::default())
    }
}

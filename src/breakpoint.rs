//! Responsive breakpoint resolution.
//!
//! Maps a measured container width in pixels to one of three breakpoints,
//! each with its own column count and its own independent widget layout.
//!
//! # Breakpoints
//!
//! - **lg** (>= 900 px): 12 columns
//! - **md** (600-899 px): 6 columns
//! - **sm** (< 600 px): 1 column
//!
//! Resolution is pure and must be redone on every width change (window
//! resize, sidebar collapse). Nothing here caches a previous answer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named viewport-width tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Wide containers, 12 columns.
    Lg,
    /// Medium containers, 6 columns.
    Md,
    /// Narrow containers, single column.
    Sm,
}

impl Breakpoint {
    /// All breakpoints, widest first.
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Lg, Breakpoint::Md, Breakpoint::Sm];

    /// Resolve the active breakpoint for a container width in pixels.
    pub fn resolve(width_px: u32) -> Self {
        match width_px {
            w if w >= Breakpoint::Lg.min_width() => Breakpoint::Lg,
            w if w >= Breakpoint::Md.min_width() => Breakpoint::Md,
            _ => Breakpoint::Sm,
        }
    }

    /// Grid column count for this breakpoint.
    pub fn columns(self) -> u16 {
        match self {
            Breakpoint::Lg => 12,
            Breakpoint::Md => 6,
            Breakpoint::Sm => 1,
        }
    }

    /// Minimum container width (inclusive) at which this breakpoint applies.
    pub fn min_width(self) -> u32 {
        match self {
            Breakpoint::Lg => 900,
            Breakpoint::Md => 600,
            Breakpoint::Sm => 0,
        }
    }

    /// Key used for this breakpoint in the persisted layout map.
    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Lg => "lg",
            Breakpoint::Md => "md",
            Breakpoint::Sm => "sm",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for parsing a Breakpoint from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBreakpointError(pub String);

impl fmt::Display for ParseBreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid breakpoint: {}", self.0)
    }
}

impl std::error::Error for ParseBreakpointError {}

impl FromStr for Breakpoint {
    type Err = ParseBreakpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lg" => Ok(Breakpoint::Lg),
            "md" => Ok(Breakpoint::Md),
            "sm" => Ok(Breakpoint::Sm),
            _ => Err(ParseBreakpointError(s.to_string())),
        }
    }
}

/// Result of resolving a container width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBreakpoint {
    /// Active breakpoint.
    pub name: Breakpoint,
    /// Column count of the active breakpoint.
    pub columns: u16,
}

/// Resolve a container width into the active breakpoint and its column count.
pub fn resolve(width_px: u32) -> ResolvedBreakpoint {
    let name = Breakpoint::resolve(width_px);
    ResolvedBreakpoint {
        name,
        columns: name.columns(),
    }
}

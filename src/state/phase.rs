/// Phase definitions for the crawl loop
///
/// This module defines every phase the crawl loop can be in and which moves
/// between them are legal.
use std::fmt;

/// Represents the current phase of the crawl loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Per-Page Phases =====
    /// Requesting the current page body
    Fetching,

    /// Looking for anti-bot or access-denied markers
    CheckingBlock,

    /// Finding the post containers on the page
    Locating,

    /// Turning post containers into records and writing them
    Extracting,

    /// Resolving the next page and pacing before fetching it
    Advancing,

    // ===== Terminal Phases =====
    /// No further page to visit
    Done,

    /// The site refused to serve genuine content
    Blocked,

    /// A transport or output failure stopped the crawl
    Fatal,
}

impl CrawlPhase {
    /// Returns true if the crawl loop has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Blocked | Self::Fatal)
    }

    /// Returns true if this phase allows moving to `next`
    ///
    /// ```text
    /// Fetching ──▶ CheckingBlock ──▶ Locating ──▶ Extracting ──▶ Advancing ──▶ Fetching
    ///    │               │               └──────────────────────────▲     │
    ///    ▼               ▼                            │                   ▼
    ///  Fatal          Blocked                       Fatal                Done
    /// ```
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        matches!(
            (self, next),
            (Fetching, CheckingBlock)
                | (Fetching, Fatal)
                | (CheckingBlock, Locating)
                | (CheckingBlock, Blocked)
                | (Locating, Extracting)
                | (Locating, Advancing)
                | (Extracting, Advancing)
                | (Extracting, Fatal)
                | (Advancing, Fetching)
                | (Advancing, Done)
        )
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::CheckingBlock => "checking_block",
            Self::Locating => "locating",
            Self::Extracting => "extracting",
            Self::Advancing => "advancing",
            Self::Done => "done",
            Self::Blocked => "blocked",
            Self::Fatal => "fatal",
        }
    }

    /// Returns all phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Fetching,
            Self::CheckingBlock,
            Self::Locating,
            Self::Extracting,
            Self::Advancing,
            Self::Done,
            Self::Blocked,
            Self::Fatal,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Parser output events.
//!
//! Grammar functions never touch the tree builder directly. They append
//! events which the sink replays into a green tree once parsing is done, so
//! speculative parses can be rewound by truncating the event list.

use super::errors::ErrorCode;
use crate::SyntaxKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Event {
    /// Open a node. `forward_parent` is the distance to a later `Start`
    /// event that wraps this one (set by `CompletedMarker::precede`).
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    /// Consume the next significant token.
    Token,
    /// Close the innermost open node.
    Finish,
    /// Record a syntax error at the current position.
    Error { code: ErrorCode },
    /// Placeholder for an abandoned or moved `Start`.
    #[default]
    Tombstone,
}

//! Drag and resize interaction state machine.
//!
//! A [`LayoutEngine`] owns the committed layout of one breakpoint and is
//! either idle or in the middle of exactly one drag/resize session:
//!
//! ```text
//! Idle --begin--> Dragging --preview--> Dragging
//!                    |  \--commit--> Idle (working copy becomes committed)
//!                    \----cancel--> Idle (rollback target restored)
//! ```
//!
//! Previews are never persisted; persistence is the caller's job once
//! [`LayoutEngine::commit`] hands back the new layout.

use super::{clamp, compact, Layout, ProposedRect};
use crate::breakpoint::Breakpoint;
use crate::catalog::WidgetId;
use thiserror::Error;

/// Errors from the interaction state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// `begin` was called while another item is being dragged or resized.
    #[error("widget {active} is already being moved")]
    AlreadyDragging {
        /// Item of the session in flight.
        active: WidgetId,
    },

    /// `preview`, `commit` or `cancel` was called with no session in flight.
    #[error("no drag or resize in progress")]
    NotDragging,

    /// The item is not part of the layout being edited.
    #[error("widget {id} is not in the {breakpoint} layout")]
    UnknownItem {
        /// Requested widget.
        id: WidgetId,
        /// Breakpoint of the layout.
        breakpoint: Breakpoint,
    },
}

/// Kind of gesture driving a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Moving an item; width and height are kept.
    Drag,
    /// Resizing an item; the top-left corner is kept.
    Resize,
}

#[derive(Debug, Clone)]
struct Session {
    id: WidgetId,
    kind: InteractionKind,
    rollback: Layout,
    working: Layout,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Dragging(Session),
}

/// Layout engine for one breakpoint.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    breakpoint: Breakpoint,
    committed: Layout,
    state: State,
}

impl LayoutEngine {
    /// Creates an idle engine over the committed layout of `breakpoint`.
    pub fn new(breakpoint: Breakpoint, committed: Layout) -> Self {
        Self {
            breakpoint,
            committed,
            state: State::Idle,
        }
    }

    /// Breakpoint this engine edits.
    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Last committed layout.
    pub fn committed(&self) -> &Layout {
        &self.committed
    }

    /// Layout to render right now: the live preview while dragging,
    /// otherwise the committed layout.
    pub fn current(&self) -> &Layout {
        match &self.state {
            State::Idle => &self.committed,
            State::Dragging(session) => &session.working,
        }
    }

    /// Returns `true` while a session is in flight.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging(_))
    }

    /// Item and gesture of the session in flight.
    pub fn active(&self) -> Option<(&WidgetId, InteractionKind)> {
        match &self.state {
            State::Idle => None,
            State::Dragging(session) => Some((&session.id, session.kind)),
        }
    }

    /// Starts a drag or resize of `id`.
    pub fn begin(&mut self, id: &WidgetId, kind: InteractionKind) -> Result<(), InteractionError> {
        if let State::Dragging(session) = &self.state {
            return Err(InteractionError::AlreadyDragging {
                active: session.id.clone(),
            });
        }
        if !self.committed.contains(id) {
            return Err(InteractionError::UnknownItem {
                id: id.clone(),
                breakpoint: self.breakpoint,
            });
        }
        tracing::debug!("Started {:?} of {} on {}", kind, id, self.breakpoint);
        self.state = State::Dragging(Session {
            id: id.clone(),
            kind,
            rollback: self.committed.clone(),
            working: self.committed.clone(),
        });
        Ok(())
    }

    /// Applies a proposed rect to the dragged item and returns the
    /// compacted layout for live rendering.
    ///
    /// The proposal is clamped to the item's minimum size and the grid
    /// bounds. Each preview starts from the rollback target, so moving an
    /// item back restores the items it had pushed.
    pub fn preview(&mut self, proposed: ProposedRect) -> Result<&Layout, InteractionError> {
        let columns = self.breakpoint.columns();
        let State::Dragging(session) = &mut self.state else {
            return Err(InteractionError::NotDragging);
        };

        let mut working = session.rollback.clone();
        let Some(item) = working.get_mut(&session.id) else {
            return Err(InteractionError::UnknownItem {
                id: session.id.clone(),
                breakpoint: self.breakpoint,
            });
        };
        let rect = clamp(proposed, item.min_w, item.min_h, columns);
        item.set_rect(rect);

        session.working = compact(&working);
        Ok(&session.working)
    }

    /// Moves the dragged item's top-left corner, keeping its size.
    pub fn drag_to(&mut self, x: i32, y: i32) -> Result<&Layout, InteractionError> {
        let rect = self.rollback_rect()?;
        self.preview(ProposedRect { x, y, ..rect })
    }

    /// Resizes the dragged item, keeping its top-left corner.
    pub fn resize_to(&mut self, w: i32, h: i32) -> Result<&Layout, InteractionError> {
        let rect = self.rollback_rect()?;
        self.preview(ProposedRect { w, h, ..rect })
    }

    /// Makes the last preview the committed layout and returns it.
    ///
    /// Committing a session without any preview commits the unchanged
    /// layout.
    pub fn commit(&mut self) -> Result<Layout, InteractionError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => Err(InteractionError::NotDragging),
            State::Dragging(session) => {
                tracing::debug!("Committed {} on {}", session.id, self.breakpoint);
                self.committed = session.working;
                Ok(self.committed.clone())
            }
        }
    }

    /// Discards the session and restores the rollback target.
    pub fn cancel(&mut self) -> Result<(), InteractionError> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => Err(InteractionError::NotDragging),
            State::Dragging(session) => {
                tracing::debug!("Cancelled interaction on {} ({})", session.id, self.breakpoint);
                self.committed = session.rollback;
                Ok(())
            }
        }
    }

    fn rollback_rect(&self) -> Result<ProposedRect, InteractionError> {
        let State::Dragging(session) = &self.state else {
            return Err(InteractionError::NotDragging);
        };
        session
            .rollback
            .get(&session.id)
            .map(|item| ProposedRect::from(item.rect()))
            .ok_or_else(|| InteractionError::UnknownItem {
                id: session.id.clone(),
                breakpoint: self.breakpoint,
            })
    }
}

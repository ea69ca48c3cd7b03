use join_domain::{TaskId, TaskStatus};

/// UI surface a pointer interaction happened inside of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayRegion {
    TaskEditor(TaskId),
    AddTask(TaskStatus),
    CardMenu(TaskId),
    /// Anywhere that is not an overlay: the board background, a card body,
    /// the header.
    Outside,
}

/// The single open overlay, menu, or dropdown.
///
/// Exactly one token exists for the whole board, owned by the coordinator,
/// so at most one surface is open at a time and there is one place that
/// decides what an outside click closes. Replaces per-component
/// document-level click listeners.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveOverlay {
    #[default]
    None,
    TaskEditor(TaskId),
    AddTask(TaskStatus),
    CardMenu(TaskId),
}

impl ActiveOverlay {
    pub fn is_open(&self) -> bool {
        !matches!(self, ActiveOverlay::None)
    }

    pub fn editor_task(&self) -> Option<&TaskId> {
        match self {
            ActiveOverlay::TaskEditor(id) => Some(id),
            _ => None,
        }
    }

    fn owns(&self, region: &OverlayRegion) -> bool {
        match (self, region) {
            (ActiveOverlay::TaskEditor(a), OverlayRegion::TaskEditor(b)) => a == b,
            (ActiveOverlay::AddTask(a), OverlayRegion::AddTask(b)) => a == b,
            (ActiveOverlay::CardMenu(a), OverlayRegion::CardMenu(b)) => a == b,
            _ => false,
        }
    }

    /// Any interaction outside the owning region closes the open overlay.
    /// Returns true when something was closed.
    pub fn close_if_outside(&mut self, region: &OverlayRegion) -> bool {
        if self.is_open() && !self.owns(region) {
            *self = ActiveOverlay::None;
            return true;
        }
        false
    }

    /// Card burger menu toggle: opening one menu closes whatever else was
    /// open, clicking the open menu's card again closes it.
    pub fn toggle_menu(&mut self, id: TaskId) {
        if *self == ActiveOverlay::CardMenu(id.clone()) {
            *self = ActiveOverlay::None;
        } else {
            *self = ActiveOverlay::CardMenu(id);
        }
    }
}

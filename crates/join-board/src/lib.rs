pub mod card_view;
pub mod coordinator;
pub mod editor;
pub mod overlay;

pub use card_view::{AssigneeBadge, CardView, MoveDirection, StatusMove};
pub use coordinator::BoardCoordinator;
pub use editor::{TaskEditor, TaskForm, ValidationFlags};
pub use overlay::{ActiveOverlay, OverlayRegion};

pub mod controller;
pub mod review;

pub use controller::{
    AppState, ChatController, ChatControllerBuilder, CycleOutcome, SubmitState, Trigger,
    FALLBACK_REPLY,
};
pub use review::{SelectedExchange, Selection, SidebarEntry};

// Application and presentation layers for the subscription dashboard backend

pub mod application;
pub mod presentation;

pub use presentation::bootstrap::{build_app_state, start};
pub use presentation::state::AppState;

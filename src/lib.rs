// Library entry so integration tests and external tools can reference internal modules.
// The binary (`main.rs`) builds on top of these same modules.
pub mod constants;
pub mod dispatch;
pub mod flows;
pub mod gateway;
pub mod handler;
pub mod interactions;
pub mod model;
pub mod session;
pub mod ui;
pub mod util;

// Convenient re-exports for frequently used types.
pub use model::AppState;

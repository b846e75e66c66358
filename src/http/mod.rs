//! Local control API
//!
//! Lets a browser page or script drive the chat client:
//! - POST /chat/send - Run one turn
//! - GET /chat/state - Current pipeline stage
//! - GET /chat/transcript - Rendered messages
//! - GET|PUT /chat/settings - Model, speaker, style, prompt and room
//! - GET /chat/prompts - Available system prompts
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, SendMessageRequest, StateResponse};
pub use routes::create_router;
pub use state::AppState;

//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::ChatService;

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat: Arc<ChatService>) -> Self {
        Self { chat }
    }
}

use std::sync::Arc;

use super::{Icon, IconPool, Message, MessagePool};

/// What a single status query gets back. `None` means "leave the host default".
#[derive(Debug, Clone, Default)]
pub struct MotdResponse {
    pub message: Option<Arc<Message>>,
    pub icon: Option<Arc<Icon>>,
    /// Generation of the provider that produced this response.
    pub generation: u64,
}

/// Source of status responses.
///
/// Implementations are shared across every thread answering status queries and
/// must not block or perform I/O.
pub trait MotdProvider: Send + Sync {
    fn next_response(&self) -> MotdResponse;

    /// Load cycle this provider was built by; 0 for hand-built providers.
    fn generation(&self) -> u64 {
        0
    }
}

/// Independent uniform draws from a message pool and an icon pool.
#[derive(Debug, Default)]
pub struct SimpleMotdProvider {
    messages: MessagePool,
    icons: IconPool,
    generation: u64,
}

impl SimpleMotdProvider {
    pub fn new(messages: MessagePool, icons: IconPool) -> Self {
        Self {
            messages,
            icons,
            generation: 0,
        }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn messages(&self) -> &MessagePool {
        &self.messages
    }

    pub fn icons(&self) -> &IconPool {
        &self.icons
    }
}

impl MotdProvider for SimpleMotdProvider {
    fn next_response(&self) -> MotdResponse {
        MotdResponse {
            message: self.messages.pick_random(),
            icon: self.icons.pick_random(),
            generation: self.generation,
        }
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

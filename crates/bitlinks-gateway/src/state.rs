use std::sync::Arc;

use bitlinks_pipeline::Bitlinks;

#[derive(Clone)]
pub struct AppState {
    bitlinks: Arc<dyn Bitlinks>,
}

impl AppState {
    pub fn new(bitlinks: Arc<dyn Bitlinks>) -> Self {
        Self { bitlinks }
    }

    pub fn bitlinks(&self) -> &dyn Bitlinks {
        self.bitlinks.as_ref()
    }
}

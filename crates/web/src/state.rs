use std::sync::Arc;

use storage::{ContentSource, Database, RatingStore, services::CompletionEvaluator};

/// Shared handler state: the stores every feature reads and writes through.
#[derive(Clone)]
pub struct AppState {
    ratings: Arc<dyn RatingStore>,
    content: Arc<dyn ContentSource>,
}

impl AppState {
    pub fn new(ratings: Arc<dyn RatingStore>, content: Arc<dyn ContentSource>) -> Self {
        Self { ratings, content }
    }

    pub fn from_database(db: Database) -> Self {
        let db = Arc::new(db);
        Self::new(db.clone(), db)
    }

    pub fn content(&self) -> &dyn ContentSource {
        self.content.as_ref()
    }

    pub fn evaluator(&self) -> CompletionEvaluator<'_> {
        CompletionEvaluator::new(self.ratings.as_ref(), self.content.as_ref())
    }
}

pub mod completion;

pub use completion::{CompletionEvaluator, type_is_complete};

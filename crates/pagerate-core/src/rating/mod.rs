//! Page ratings: records, vocabularies, presentation modes and the flow
//! controller that ties them to the store.

mod flow;
mod mode;
mod model;
pub mod vocabulary;

pub use flow::{FlowError, FlowState, PageDraft, Progress, RatingFlowController, RatingTarget};
pub use mode::{PresentationMode, Prompt};
pub use model::{OverallRatingRecord, PageRating, Rating, RatingRecord};
pub use vocabulary::{QualitySelection, Vocabulary, VocabularyScope};

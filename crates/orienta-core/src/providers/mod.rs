pub mod http;
pub mod memory;
pub mod traits;

pub use http::HttpApi;
pub use memory::{
    FailingQuestionProvider, MemoryMarkerStore, ScriptedSubmitter, StaticQuestionProvider,
};
pub use traits::{
    marker_key, CompletionMarkerStore, QuestionProvider, ResultSubmitter, SubmissionRequest,
    SubmittedResult,
};

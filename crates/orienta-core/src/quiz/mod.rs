pub mod answers;
pub mod question;
pub mod runner;
pub mod session;

pub use answers::{AnswerRecord, AnswerSheet};
pub use question::{AnswerOption, Question, QuestionSet, TestId};
pub use runner::SessionRunner;
pub use session::{CompletionOutcome, FailureKind, QuizSession, SessionState};

pub mod domain;
pub mod error;
pub mod protocol;
pub mod question_bank;

pub use question_bank::QuestionBank;

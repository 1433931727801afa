pub mod core;
pub mod quizzes;

#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod quiz;

pub use app_services::QuizServices;
pub use error::QuizError;
pub use quiz::{
    QuizController, QuizProgress, QuizSession, SubmitCheck, SubmitOutcome, TICK_INTERVAL, Tick,
};

#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod fixture;
pub mod http;
pub mod source;

pub use auth::AuthSession;
pub use error::SourceError;
pub use fixture::{FixtureQuiz, FixtureQuizSource};
pub use http::{HttpQuizSource, HttpSourceConfig};
pub use reqwest::StatusCode;
pub use source::{QuizSource, SourceConfig, SourceKind, build_source};

//! JSON shapes spoken by the LMS backend and their mapping into domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use quiz_core::model::{
    AnswerResult, AttemptId, OptionId, QuestionId, QuestionKind, QuizId, QuizOption, QuizQuestion,
    QuizResults, StartedAttempt,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Envelope wrapped around every successful response: `{code, message, data}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub(crate) fn require_data(self, status: StatusCode) -> Result<T, SourceError> {
        self.data.ok_or_else(|| SourceError::Api {
            status,
            message: if self.message.is_empty() {
                "response carried no data".into()
            } else {
                self.message
            },
        })
    }
}

/// Body of a non-2xx response: `{code, message, error}`.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error: String,
}

/// Turn a raw HTTP response into either the decoded envelope or a typed error.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<ApiResponse<T>, SourceError> {
    if !status.is_success() {
        let parsed: ApiErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let message = if parsed.message.is_empty() {
            parsed.error
        } else {
            parsed.message
        };
        if status == StatusCode::UNAUTHORIZED {
            return Err(SourceError::Unauthorized { message });
        }
        return Err(SourceError::Api { status, message });
    }
    Ok(serde_json::from_slice(body)?)
}

//
// ─── REQUESTS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(crate) struct StartRequest {
    pub quiz_id: QuizId,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    pub quiz_id: QuizId,
    pub answers: &'a BTreeMap<String, String>,
    pub time_spent: u32,
}

//
// ─── RESPONSES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct WireOption {
    id: OptionId,
    option: String,
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    id: QuestionId,
    question: String,
    #[serde(rename = "type", default)]
    kind: QuestionKind,
    #[serde(default)]
    options: Option<Vec<WireOption>>,
}

impl From<WireQuestion> for QuizQuestion {
    fn from(wire: WireQuestion) -> Self {
        let options = wire
            .options
            .unwrap_or_default()
            .into_iter()
            .map(|option| QuizOption::new(option.id, option.option))
            .collect();
        QuizQuestion::new(wire.id, wire.question, wire.kind, options)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartResponse {
    attempt_id: AttemptId,
    quiz_id: QuizId,
    #[serde(default)]
    questions: Option<Vec<WireQuestion>>,
    started_at: DateTime<Utc>,
    time_limit_seconds: u32,
}

impl From<StartResponse> for StartedAttempt {
    fn from(wire: StartResponse) -> Self {
        Self {
            attempt_id: wire.attempt_id,
            quiz_id: wire.quiz_id,
            questions: wire
                .questions
                .unwrap_or_default()
                .into_iter()
                .map(QuizQuestion::from)
                .collect(),
            started_at: wire.started_at,
            time_limit_seconds: wire.time_limit_seconds,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    attempt_id: AttemptId,
    quiz_id: QuizId,
    score: u32,
    total_marks: u32,
    percentage: f64,
    passed: bool,
    #[serde(default)]
    coins_awarded: u32,
    submitted_at: DateTime<Utc>,
    #[serde(default)]
    answers: Option<Vec<WireAnswerResult>>,
}

/// Per-question grading. Unanswered questions come back with a `null` answer.
#[derive(Debug, Deserialize)]
struct WireAnswerResult {
    question_id: QuestionId,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    user_answer: Option<String>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    is_correct: bool,
}

impl From<WireAnswerResult> for AnswerResult {
    fn from(wire: WireAnswerResult) -> Self {
        Self {
            question_id: wire.question_id,
            question: wire.question.unwrap_or_default(),
            user_answer: wire.user_answer.unwrap_or_default(),
            correct_answer: wire.correct_answer.unwrap_or_default(),
            is_correct: wire.is_correct,
        }
    }
}

impl From<SubmitResponse> for QuizResults {
    fn from(wire: SubmitResponse) -> Self {
        Self {
            attempt_id: wire.attempt_id,
            quiz_id: wire.quiz_id,
            score: wire.score,
            total_marks: wire.total_marks,
            percentage: wire.percentage,
            passed: wire.passed,
            coins_awarded: wire.coins_awarded,
            submitted_at: wire.submitted_at,
            answers: wire
                .answers
                .unwrap_or_default()
                .into_iter()
                .map(AnswerResult::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizAttempt;

    #[test]
    fn start_response_maps_questions_and_options() {
        let body = br#"{
            "code": 200, "message": "ok",
            "data": {
                "attempt_id": 11, "quiz_id": 3,
                "started_at": "2024-05-01T10:00:00Z",
                "time_limit_seconds": 600,
                "questions": [
                    {"id": 1, "question": "2 + 2?", "type": "multiple_choice",
                     "options": [{"id": 10, "option": "3"}, {"id": 11, "option": "4"}]},
                    {"id": 2, "question": "Water is wet", "type": "true_false",
                     "options": [{"id": 20, "option": "True"}, {"id": 21, "option": "False"}]}
                ]
            }
        }"#;
        let envelope: ApiResponse<StartResponse> = decode_response(StatusCode::OK, body).unwrap();
        let started = StartedAttempt::from(envelope.require_data(StatusCode::OK).unwrap());

        assert_eq!(started.attempt_id, AttemptId::new(11));
        assert_eq!(started.time_limit_seconds, 600);
        assert_eq!(started.questions.len(), 2);
        assert_eq!(started.questions[0].options[1].text, "4");
        assert_eq!(started.questions[1].kind, QuestionKind::TrueFalse);
    }

    #[test]
    fn null_questions_decode_as_empty() {
        let body = br#"{"data": {"attempt_id": 1, "quiz_id": 1, "questions": null,
            "started_at": "2024-05-01T10:00:00Z", "time_limit_seconds": 60}}"#;
        let envelope: ApiResponse<StartResponse> = decode_response(StatusCode::OK, body).unwrap();
        let started = StartedAttempt::from(envelope.require_data(StatusCode::OK).unwrap());
        assert!(started.questions.is_empty());
    }

    #[test]
    fn submit_request_uses_backend_field_names() {
        let mut answers = BTreeMap::new();
        answers.insert("1".to_string(), "10".to_string());
        let request = SubmitRequest {
            quiz_id: QuizId::new(3),
            answers: &answers,
            time_spent: 42,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"quiz_id": 3, "answers": {"1": "10"}, "time_spent": 42})
        );
    }

    #[test]
    fn submit_response_maps_answer_results() {
        let body = br#"{"data": {
            "attempt_id": 11, "quiz_id": 3, "score": 1, "total_marks": 2,
            "percentage": 50.0, "passed": false, "coins_awarded": 0,
            "submitted_at": "2024-05-01T10:05:00Z",
            "answers": [
                {"question_id": 1, "question": "2 + 2?", "user_answer": "4",
                 "correct_answer": "4", "is_correct": true},
                {"question_id": 2, "question": "Water is wet", "user_answer": "False",
                 "correct_answer": "True", "is_correct": false}
            ]}}"#;
        let envelope: ApiResponse<SubmitResponse> = decode_response(StatusCode::OK, body).unwrap();
        let results = QuizResults::from(envelope.require_data(StatusCode::OK).unwrap());
        assert_eq!(results.correct_count(), 1);
        assert_eq!(results.incorrect_count(), 1);
        assert!(!results.passed);
    }

    #[test]
    fn null_user_answer_decodes_as_blank() {
        let body = br#"{"data": {
            "attempt_id": 12, "quiz_id": 3, "score": 0, "total_marks": 2,
            "percentage": 0.0, "passed": false,
            "submitted_at": "2024-05-01T10:05:00Z",
            "answers": [
                {"question_id": 1, "question": "2 + 2?", "user_answer": null,
                 "correct_answer": "4", "is_correct": false},
                {"question_id": 2, "question": "Water is wet", "correct_answer": null,
                 "is_correct": false}
            ]}}"#;
        let envelope: ApiResponse<SubmitResponse> = decode_response(StatusCode::OK, body).unwrap();
        let results = QuizResults::from(envelope.require_data(StatusCode::OK).unwrap());
        assert_eq!(results.answers.len(), 2);
        assert_eq!(results.answers[0].user_answer, "");
        assert_eq!(results.answers[0].correct_answer, "4");
        assert_eq!(results.answers[1].correct_answer, "");
        assert_eq!(results.incorrect_count(), 2);
    }

    #[test]
    fn null_attempt_list_is_empty() {
        let envelope: ApiResponse<Vec<QuizAttempt>> =
            decode_response(StatusCode::OK, br#"{"code": 200, "message": "ok", "data": null}"#)
                .unwrap();
        assert!(envelope.data.unwrap_or_default().is_empty());
    }

    #[test]
    fn unauthorized_status_is_typed() {
        let err = decode_response::<StartResponse>(StatusCode::UNAUTHORIZED, b"{}").unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized { .. }));
        assert_eq!(err.user_message("Failed to start quiz"), "Failed to start quiz");
    }

    #[test]
    fn unauthorized_keeps_server_message() {
        let body = br#"{"code": 401, "message": "Session expired, please log in again"}"#;
        let err = decode_response::<StartResponse>(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized { .. }));
        assert_eq!(
            err.user_message("Failed to start quiz"),
            "Session expired, please log in again"
        );
    }

    #[test]
    fn error_body_message_is_kept() {
        let body = br#"{"code": 403, "message": "Maximum attempts reached", "error": "Forbidden"}"#;
        let err = decode_response::<StartResponse>(StatusCode::FORBIDDEN, body).unwrap_err();
        assert_eq!(err.user_message("Failed to start quiz"), "Maximum attempts reached");
    }

    #[test]
    fn non_json_error_body_falls_back() {
        let err =
            decode_response::<StartResponse>(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert_eq!(err.user_message("Failed to start quiz"), "Failed to start quiz");
    }

    #[test]
    fn missing_data_is_an_api_error() {
        let envelope: ApiResponse<StartResponse> =
            decode_response(StatusCode::OK, br#"{"code": 200, "message": ""}"#).unwrap();
        let err = envelope.require_data(StatusCode::OK).unwrap_err();
        assert!(matches!(err, SourceError::Api { .. }));
    }
}

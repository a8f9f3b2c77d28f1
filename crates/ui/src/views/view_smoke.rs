use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{OptionId, QuestionId, QuizId};
use remote::FixtureQuizSource;
use services::QuizController;

use super::render_session;

fn sample_controller(quiz_id: u64) -> QuizController {
    QuizController::new(QuizId::new(quiz_id), Arc::new(FixtureQuizSource::sample()))
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn start_screen_renders_quiz_facts() {
    let quiz = sample_controller(1);
    quiz.load().await.expect("load quiz");

    let text = render_session(&quiz.snapshot());
    assert!(text.contains("Rust Ownership Basics"), "missing title in {text}");
    assert!(text.contains("Questions:      3"), "missing count in {text}");
    assert!(text.contains("Time limit:     10 minutes"), "missing limit in {text}");
    assert!(text.contains("Max attempts:   3"), "missing max in {text}");
    assert!(text.contains("[s] Start Quiz"), "missing start action in {text}");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn taking_screen_tracks_selection_and_clock() {
    let quiz = sample_controller(1);
    quiz.start().await.expect("start quiz");
    quiz.select_answer(QuestionId::new(1), OptionId::new(12))
        .expect("select");
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let text = render_session(&quiz.snapshot());
    assert!(text.contains("Question 1 of 3"), "missing counter in {text}");
    assert!(text.contains("Time left: 09:59"), "missing clock in {text}");
    assert!(
        text.contains("(*) The caller can no longer use it"),
        "missing selection in {text}"
    );
    assert!(text.contains("[1] 2 3"), "missing dots in {text}");
    assert!(!text.contains("[p] Previous"), "first question has no previous");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn results_screen_lists_review() {
    let quiz = sample_controller(2);
    quiz.start().await.expect("start quiz");
    quiz.select_answer(QuestionId::new(1), OptionId::new(1))
        .expect("select");
    quiz.confirm_submit().await.expect("submit");

    let text = render_session(&quiz.snapshot());
    assert!(text.contains("Congratulations! You passed!"), "missing headline in {text}");
    assert!(text.contains("Score:       1 / 2"), "missing score in {text}");
    assert!(text.contains("+10 coins earned"), "missing coins in {text}");
    assert!(text.contains("Your answer: Not answered"), "missing review in {text}");
    assert!(text.contains("Correct answer: False"), "missing key in {text}");
}

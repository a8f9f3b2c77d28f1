mod quiz_results_vm;
mod quiz_start_vm;
mod quiz_taking_vm;
mod time_fmt;

pub use quiz_results_vm::{AnswerRowVm, QuizResultsVm};
pub use quiz_start_vm::{AttemptRowVm, QuizStartVm};
pub use quiz_taking_vm::{
    DotState, LOADING_MESSAGE, OptionVm, QuestionDotVm, QuizTakingVm, confirm_submit_message,
    map_quiz_taking,
};
pub use time_fmt::{LOW_TIME_SECONDS, format_clock, format_datetime, is_low_time};

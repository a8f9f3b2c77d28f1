use crate::vm::QuizStartVm;

use super::rule;

#[must_use]
pub fn render_start(vm: &QuizStartVm) -> String {
    let mut lines = vec![vm.title.clone()];
    if let Some(description) = &vm.description {
        lines.push(description.clone());
    }
    lines.push(rule());
    lines.push(format!("Questions:      {}", vm.question_count));
    lines.push(format!("Time limit:     {} minutes", vm.minutes));
    lines.push(format!("Passing score:  {}", vm.passing_score));
    lines.push(format!("Max attempts:   {}", vm.max_attempts));

    if let Some(best) = &vm.best_attempt {
        lines.push(String::new());
        lines.push(best.clone());
    }

    if !vm.attempts.is_empty() {
        lines.push(String::new());
        lines.push("Previous attempts:".into());
        for row in &vm.attempts {
            lines.push(format!(
                "  #{:<3} {:>7}  {:<6}  {}",
                row.number, row.percentage, row.result_label, row.date
            ));
        }
    }

    lines.push(rule());
    if let Some(error) = &vm.start_error {
        lines.push(format!("! {error}"));
    }
    if vm.is_starting {
        lines.push("Starting...".into());
    } else if vm.max_attempts_reached {
        lines.push("Maximum attempts reached".into());
    } else {
        lines.push("[s] Start Quiz  [q] Quit".into());
    }
    lines.join("\n")
}

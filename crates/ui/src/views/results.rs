use crate::vm::QuizResultsVm;

use super::rule;

#[must_use]
pub fn render_results(vm: &QuizResultsVm) -> String {
    let mut lines = vec![
        vm.headline.to_string(),
        rule(),
        format!("Score:       {}", vm.score),
        format!("Percentage:  {}", vm.percentage),
        format!("Correct:     {}", vm.correct),
        format!("Incorrect:   {}", vm.incorrect),
    ];
    if let Some(coins) = &vm.coins {
        lines.push(coins.clone());
    }

    lines.push(rule());
    lines.push("Answer Review".into());
    for row in &vm.rows {
        let mark = if row.is_correct { "+" } else { "x" };
        lines.push(format!("{mark} {}", row.title));
        lines.push(format!("    Your answer: {}", row.user_answer));
        if let Some(correct) = &row.correct_answer {
            lines.push(format!("    Correct answer: {correct}"));
        }
    }

    lines.push(rule());
    lines.push("[r] Try Again  [q] Quit".into());
    lines.join("\n")
}

use crate::vm::{DotState, LOADING_MESSAGE, QuizTakingVm};

use super::rule;

#[must_use]
pub fn render_loading() -> String {
    LOADING_MESSAGE.to_string()
}

#[must_use]
pub fn render_taking(vm: &QuizTakingVm) -> String {
    let clock = if vm.low_time {
        format!("Time left: {} (!)", vm.clock)
    } else {
        format!("Time left: {}", vm.clock)
    };

    let mut lines = vec![
        format!("{}  [{}]", vm.counter, vm.kind_label),
        clock,
        rule(),
        vm.prompt.clone(),
        String::new(),
    ];
    for (i, option) in vm.options.iter().enumerate() {
        let mark = if option.selected { "(*)" } else { "( )" };
        lines.push(format!("  {} {mark} {}", i + 1, option.text));
    }

    lines.push(rule());
    lines.push(vm.answered_label.clone());
    let dots: Vec<String> = vm
        .dots
        .iter()
        .map(|dot| match dot.state {
            DotState::Current => format!("[{}]", dot.label),
            DotState::Answered => format!("{}*", dot.label),
            DotState::Unanswered => dot.label.clone(),
        })
        .collect();
    lines.push(dots.join(" "));

    if let Some(error) = &vm.submit_error {
        lines.push(format!("! {error}"));
    }

    let mut actions = Vec::new();
    if !vm.is_first {
        actions.push("[p] Previous");
    }
    if !vm.is_last {
        actions.push("[n] Next");
    }
    actions.push("[a <n>] Answer");
    actions.push("[g <n>] Go to");
    if vm.is_submitting {
        actions.push("Submitting...");
    } else {
        actions.push("[submit] Submit Quiz");
    }
    lines.push(actions.join("  "));
    lines.join("\n")
}

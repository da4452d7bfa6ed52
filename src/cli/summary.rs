//! Console summary of a report

use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use merge_list::ci::NO_DATA;
use merge_list::eligibility::PrEvaluation;
use merge_list::report::Report;
use merge_list::types::TriState;
use supports_hyperlinks::Stream;
use terminal_link::Link;

fn pr_number(evaluation: &PrEvaluation, hyperlinks: bool) -> String {
    let text = format!("#{}", evaluation.snapshot.number);
    if hyperlinks && !evaluation.snapshot.html_url.is_empty() {
        Link::new(&text, &evaluation.snapshot.html_url).to_string()
    } else {
        text
    }
}

fn tri_state(value: TriState) -> String {
    match value {
        TriState::True => check(),
        TriState::False => cross(),
        TriState::Unknown => "?".muted(),
    }
}

fn flags(evaluation: &PrEvaluation) -> String {
    let verdict = &evaluation.verdict;
    let mut flags = Vec::new();
    if verdict.hotfix {
        flags.push("hotfix".to_string());
    }
    if verdict.trivial {
        flags.push("trivial".to_string());
    }
    if verdict.do_not_merge {
        flags.push("dnm".to_string());
    }
    if let Some(days) = verdict.ci_age_days {
        flags.push(format!("ci {days}d"));
    }
    flags.join(",")
}

/// Print a per-PR table plus the CI and release lines
pub fn print_summary(report: &Report) {
    let hyperlinks = supports_hyperlinks::on(Stream::Stdout);

    println!("{}: {}", "Release".emphasis(), report.freeze.phase_text().accent());
    let ci = report.ci.summary();
    if ci == NO_DATA {
        println!("{}: {}", "CI".emphasis(), ci.muted());
    } else {
        println!("{}: {}", "CI".emphasis(), ci);
    }
    if let Some(ref head) = report.ci.substituted_for {
        println!(
            "    {}",
            format!("using {} in place of cancelled {}", report.ci.commit, head).muted()
        );
    }
    println!();

    println!(
        "{}",
        format!(
            "{:<8} {:<20} {:<24} {:<24} {:>6} {:>6} {:>6} {:>4} {:>4} flags",
            "number", "author", "assignees", "approvers", "hours", "biz", "left", "reb", "asg"
        )
        .emphasis()
    );

    for evaluation in &report.entries {
        let pr = &evaluation.snapshot;
        let verdict = &evaluation.verdict;
        let assignees = pr.assignees.iter().cloned().collect::<Vec<_>>().join(",");
        let line = format!(
            "{:<8} {:<20} {:<24} {:<24} {:>6} {:>6} {:>6}",
            format!("#{}", pr.number),
            pr.author,
            assignees,
            verdict.approvers.join(","),
            verdict.elapsed_hours,
            verdict.elapsed_business_hours,
            verdict.remaining_hours,
        );
        // Padding is computed on the plain number; swap in the link afterwards
        let line = line.replacen(&format!("#{}", pr.number), &pr_number(evaluation, hyperlinks), 1);
        let assignee = if verdict.assignee_approved { check() } else { cross() };
        let text = format!(
            "{line}    {}    {}  {}",
            tri_state(verdict.rebaseable),
            assignee,
            flags(evaluation)
        );

        if verdict.is_ready() {
            println!("{text}");
        } else {
            println!("{}", text.muted());
        }
    }

    for failure in &report.failures {
        println!("{} {}", cross(), failure.to_string().warn());
    }
    println!();
}

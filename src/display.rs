use crate::models::{ProblemState, Session, TemplateRegistry};
use crate::testrun::TestSummary;

pub fn display_session(session: &Session) {
    println!("\n{}", "=".repeat(60));
    println!("  Contest {}", session.contest_id);
    println!("  {}", session.working_directory.display());
    println!("{}\n", "=".repeat(60));

    println!("{:<8} {:<12} {:<10} {}", "Problem", "Template", "Tests", "Submit");
    println!("{}", "-".repeat(60));
    for state in &session.problems {
        println!("{}", status_row(state));
    }
    println!();
}

fn status_row(state: &ProblemState) -> String {
    let tests = format!("{}/{}", state.test_verdict.passed, state.test_verdict.total);
    let mut submit = state.submit_verdict.label.short().to_string();
    if !state.submit_verdict.message.is_empty() {
        submit = format!("{} ({})", submit, state.submit_verdict.message);
    }
    format!(
        "{:<8} {:<12} {:<10} {}",
        state.problem_id, state.template_name, tests, submit
    )
}

pub fn display_summary(problem_id: &str, summary: &TestSummary) {
    for case in &summary.cases {
        if case.passed {
            println!("test {}: ok", case.index);
            continue;
        }
        if case.timed_out {
            println!("test {}: TIMED OUT", case.index);
            continue;
        }
        println!("test {}: FAILED", case.index);
        println!("  expected:\n{}", indent(&case.expected));
        println!("  actual:\n{}", indent(&case.actual));
        if !case.stderr.trim().is_empty() {
            println!("  stderr:\n{}", indent(&case.stderr));
        }
    }

    println!("========================================");
    if summary.failed == 0 {
        println!("{}: {}/{} tests passed", problem_id, summary.passed, summary.total);
    } else {
        println!(
            "{}: {}/{} tests passed - {} failed",
            problem_id, summary.passed, summary.total, summary.failed
        );
    }
    println!("========================================");
}

pub fn display_templates(registry: &TemplateRegistry) {
    for template in &registry.templates {
        let marker = if template.name == registry.starter_name { "*" } else { " " };
        let language = template.language().map_or("?", |lang| lang.display_name());
        println!(
            "{} {:<12} {:<8} {}",
            marker,
            template.name,
            language,
            template.source_path.display()
        );
        if let Some(build) = &template.build_command {
            println!("    build: {}", build);
        }
        println!("    run:   {}", template.run_command);
    }
}

fn indent(text: &str) -> String {
    text.trim_end()
        .lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

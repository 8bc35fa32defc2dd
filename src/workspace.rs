use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::error::{ForcesError, Result};
use crate::models::{Contest, Problem, ProblemState, Session, Template, Test};
use crate::scrape::problem_url;

const TESTS_DIR: &str = "tests";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionPolicy {
    /// Leave an existing solution file alone.
    KeepExisting,
    Overwrite,
}

pub fn tests_dir(contest_dir: &Path, problem_id: &str) -> PathBuf {
    contest_dir.join(TESTS_DIR).join(problem_id)
}

pub fn input_path(tests_dir: &Path, index: usize) -> PathBuf {
    tests_dir.join(format!("in{}.txt", index))
}

pub fn output_path(tests_dir: &Path, index: usize) -> PathBuf {
    tests_dir.join(format!("out{}.txt", index))
}

pub fn solution_file_name(problem_id: &str, template: &Template) -> String {
    format!("{}{}", problem_id, template.file_extension)
}

/// Writes `tests/{id}/in{N}.txt` and `out{N}.txt` for every sample, replacing
/// files of the same name and removing numbered files left over from a
/// previous scrape with more samples.
pub fn write_tests(contest_dir: &Path, problem: &Problem) -> Result<PathBuf> {
    let dir = tests_dir(contest_dir, &problem.id);
    fs::create_dir_all(&dir).map_err(|e| ForcesError::file(&dir, e))?;

    for (index, test) in problem.tests.iter().enumerate() {
        let input = input_path(&dir, index);
        fs::write(&input, &test.input).map_err(|e| ForcesError::file(&input, e))?;
        let output = output_path(&dir, index);
        fs::write(&output, &test.output).map_err(|e| ForcesError::file(&output, e))?;
    }

    remove_stale_tests(&dir, problem.tests.len())?;
    debug!("wrote {} tests to {}", problem.tests.len(), dir.display());
    Ok(dir)
}

fn remove_stale_tests(dir: &Path, count: usize) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| ForcesError::file(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| ForcesError::file(dir, e))?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if test_index(name).is_some_and(|index| index >= count) {
            warn!("removing stale test file {}", path.display());
            fs::remove_file(&path).map_err(|e| ForcesError::file(&path, e))?;
        }
    }
    Ok(())
}

fn test_index(file_name: &str) -> Option<usize> {
    let stem = file_name.strip_suffix(".txt")?;
    let digits = stem
        .strip_prefix("in")
        .or_else(|| stem.strip_prefix("out"))?;
    digits.parse().ok()
}

pub fn read_tests(tests_dir: &Path, count: usize) -> Result<Vec<Test>> {
    (0..count)
        .map(|index| -> Result<Test> {
            let input = input_path(tests_dir, index);
            let output = output_path(tests_dir, index);
            Ok(Test {
                input: fs::read_to_string(&input).map_err(|e| ForcesError::file(&input, e))?,
                output: fs::read_to_string(&output).map_err(|e| ForcesError::file(&output, e))?,
            })
        })
        .collect()
}

/// Template source with a header comment naming the problem prepended.
pub fn generate_solution(
    template: &Template,
    host: &str,
    contest: &Contest,
    problem: &Problem,
    generated_at: DateTime<Local>,
) -> Result<Vec<u8>> {
    let source =
        fs::read(&template.source_path).map_err(|e| ForcesError::file(&template.source_path, e))?;

    let c = template.comment_prefix();
    let header = format!(
        "{c} Contest: {}\n{c} Problem: {}\n{c} URL: {}\n{c} Generated: {}\n\n",
        contest.id,
        problem.name.trim(),
        problem_url(host, &contest.id, &problem.id),
        generated_at.format("%Y-%m-%d %H:%M:%S"),
    );

    let mut bytes = header.into_bytes();
    bytes.extend_from_slice(&source);
    Ok(bytes)
}

/// Returns whether the file was written.
pub fn write_solution(path: &Path, contents: &[u8], policy: SolutionPolicy) -> Result<bool> {
    if policy == SolutionPolicy::KeepExisting && path.exists() {
        warn!("{} already exists, keeping it (use --force to overwrite)", path.display());
        return Ok(false);
    }
    fs::write(path, contents).map_err(|e| ForcesError::file(path, e))?;
    Ok(true)
}

/// Writes every test and solution file for `contest` under `contest_dir` and
/// returns the matching session. The session is not persisted here.
pub fn populate(
    contest: &Contest,
    template: &Template,
    contest_dir: &Path,
    host: &str,
    policy: SolutionPolicy,
) -> Result<Session> {
    fs::create_dir_all(contest_dir).map_err(|e| ForcesError::file(contest_dir, e))?;

    let now = Local::now();
    let mut problems = Vec::with_capacity(contest.problems.len());
    for problem in &contest.problems {
        write_tests(contest_dir, problem)?;

        let solution = solution_file_name(&problem.id, template);
        let contents = generate_solution(template, host, contest, problem, now)?;
        if write_solution(&contest_dir.join(&solution), &contents, policy)? {
            info!("generated {}", solution);
        }

        problems.push(ProblemState::new(
            problem.id.clone(),
            template.name.clone(),
            solution,
            problem.tests.len(),
        ));
    }

    Ok(Session {
        working_directory: contest_dir.to_path_buf(),
        contest_id: contest.id.clone(),
        problems,
    })
}

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::{read_json, write_json, ConfigPaths};
use crate::error::{ForcesError, Result};
use crate::workspace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitLabel {
    #[default]
    NotAttempted,
    MemoryLimitExceeded,
    TimeLimitExceeded,
    RuntimeError,
    WrongAnswer,
    IdlenessLimitExceeded,
    JudgementFailed,
    Accepted,
}

impl SubmitLabel {
    pub fn short(&self) -> &'static str {
        match self {
            SubmitLabel::NotAttempted => "-",
            SubmitLabel::MemoryLimitExceeded => "MLE",
            SubmitLabel::TimeLimitExceeded => "TLE",
            SubmitLabel::RuntimeError => "RE",
            SubmitLabel::WrongAnswer => "WA",
            SubmitLabel::IdlenessLimitExceeded => "ILE",
            SubmitLabel::JudgementFailed => "JF",
            SubmitLabel::Accepted => "AC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestVerdict {
    pub passed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitVerdict {
    pub label: SubmitLabel,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemState {
    pub problem_id: String,
    pub template_name: String,
    /// Solution file name, relative to the session's working directory.
    pub solution: String,
    pub test_verdict: TestVerdict,
    #[serde(default)]
    pub submit_verdict: SubmitVerdict,
}

impl ProblemState {
    pub fn new(
        problem_id: impl Into<String>,
        template_name: impl Into<String>,
        solution: impl Into<String>,
        total_tests: usize,
    ) -> Self {
        Self {
            problem_id: problem_id.into(),
            template_name: template_name.into(),
            solution: solution.into(),
            test_verdict: TestVerdict {
                passed: 0,
                total: total_tests,
            },
            submit_verdict: SubmitVerdict::default(),
        }
    }
}

/// Progress on the contest most recently set up with `forces train`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub working_directory: PathBuf,
    pub contest_id: String,
    pub problems: Vec<ProblemState>,
}

impl Session {
    pub fn load(paths: &ConfigPaths) -> Result<Self> {
        read_json(&paths.session())?.ok_or_else(|| {
            ForcesError::NotFound("session; run `forces train <contest>` first".to_string())
        })
    }

    /// Replaces the stored session as a whole.
    pub fn save(&self, paths: &ConfigPaths) -> Result<()> {
        write_json(paths, &paths.session(), self)
    }

    pub fn find_problem(&self, id: &str) -> Option<&ProblemState> {
        self.problems
            .iter()
            .find(|p| p.problem_id.eq_ignore_ascii_case(id))
    }

    pub fn solution_path(&self, state: &ProblemState) -> PathBuf {
        self.working_directory.join(&state.solution)
    }

    pub fn tests_dir(&self, state: &ProblemState) -> PathBuf {
        workspace::tests_dir(&self.working_directory, &state.problem_id)
    }

    /// The problem whose solution file was modified last.
    pub fn most_recently_touched(&self) -> Result<&ProblemState> {
        let mut latest: Option<(&ProblemState, std::time::SystemTime)> = None;
        for state in &self.problems {
            let path = self.solution_path(state);
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .map_err(|e| ForcesError::file(&path, e))?;
            if latest.map_or(true, |(_, best)| modified > best) {
                latest = Some((state, modified));
            }
        }
        latest
            .map(|(state, _)| state)
            .ok_or(ForcesError::EmptySession)
    }

    /// An explicitly named problem, or the most recently touched one.
    pub fn resolve(&self, id: Option<&str>) -> Result<&ProblemState> {
        match id {
            Some(id) => self
                .find_problem(id)
                .ok_or_else(|| ForcesError::NotFound(format!("problem '{}' in session", id))),
            None => self.most_recently_touched(),
        }
    }
}

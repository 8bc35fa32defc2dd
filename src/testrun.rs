use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::error::{ForcesError, Result};
use crate::models::{ProblemState, Session, Template};
use crate::workspace::read_tests;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub struct CaseResult {
    pub index: usize,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub stderr: String,
    pub timed_out: bool,
}

#[derive(Debug)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub cases: Vec<CaseResult>,
}

/// Builds (if the template has a build step) and runs the problem's solution
/// against every stored sample. A run still going after `limit` is killed and
/// counts as a failure.
pub fn run_tests(
    template: &Template,
    session: &Session,
    state: &ProblemState,
    limit: Duration,
) -> Result<TestSummary> {
    let src = session.solution_path(state);
    let bin = src.with_extension("");
    let workdir = &session.working_directory;

    if let Some(build) = &template.build_command {
        let command = expand(build, &src, &bin);
        info!("building: {}", command);
        let output = shell(&command, workdir, None, None)?;
        if !output.status.success() {
            return Err(ForcesError::Process {
                command,
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
    }

    let run = expand(&template.run_command, &src, &bin);
    let tests = read_tests(&session.tests_dir(state), state.test_verdict.total)?;

    let mut cases = Vec::with_capacity(tests.len());
    for (index, test) in tests.iter().enumerate() {
        debug!("test {}: {}", index, run);
        let output = shell(&run, workdir, Some(&test.input), Some(limit))?;
        let actual = String::from_utf8_lossy(&output.stdout).to_string();
        let mut stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if output.timed_out {
            warn!("test {} killed after {:?}", index, limit);
        } else if !output.status.success() {
            stderr.push_str(&format!("\n(exited with {})", output.status));
        }
        cases.push(CaseResult {
            index,
            passed: !output.timed_out
                && output.status.success()
                && outputs_match(&test.output, &actual),
            expected: test.output.clone(),
            actual,
            stderr,
            timed_out: output.timed_out,
        });
    }

    let passed = cases.iter().filter(|c| c.passed).count();
    Ok(TestSummary {
        passed,
        failed: cases.len() - passed,
        total: cases.len(),
        cases,
    })
}

/// Token-wise comparison, so trailing spaces and newlines never matter.
pub fn outputs_match(expected: &str, actual: &str) -> bool {
    expected.split_whitespace().eq(actual.split_whitespace())
}

fn expand(command: &str, src: &Path, bin: &Path) -> String {
    command
        .replace("{src}", &shell_quote(src))
        .replace("{bin}", &shell_quote(bin))
}

fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}

struct RunOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    timed_out: bool,
}

// Every pipe is serviced on its own thread; a solution may write while it reads.
fn shell(
    command: &str,
    workdir: &Path,
    stdin: Option<&str>,
    limit: Option<Duration>,
) -> Result<RunOutput> {
    let process_error = |e: io::Error| ForcesError::Process {
        command: command.to_string(),
        detail: e.to_string(),
    };

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(workdir)
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(process_error)?;

    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(pipe)) => Some(feed(pipe, input.to_string())),
        _ => None,
    };
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let (status, timed_out) = wait_with_limit(&mut child, limit).map_err(process_error)?;

    let stdout = join(stdout).map_err(process_error)?;
    let stderr = join(stderr).map_err(process_error)?;
    if let Some(writer) = writer {
        join(writer).map_err(process_error)?;
    }

    Ok(RunOutput {
        status,
        stdout,
        stderr,
        timed_out,
    })
}

fn feed(mut pipe: ChildStdin, input: String) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || match pipe.write_all(input.as_bytes()) {
        // a solution that exits without reading its input closes the pipe early
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join<T>(handle: JoinHandle<io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "pipe thread panicked")))
}

fn wait_with_limit(child: &mut Child, limit: Option<Duration>) -> io::Result<(ExitStatus, bool)> {
    let Some(limit) = limit else {
        return Ok((child.wait()?, false));
    };

    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if Instant::now() >= deadline {
            // the child may exit between try_wait and kill
            let _ = child.kill();
            return Ok((child.wait()?, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::{Problem, Test};
    use crate::workspace::write_tests;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const LIMIT: Duration = Duration::from_secs(10);

    fn setup(dir: &Path, tests: Vec<Test>) -> (Session, ProblemState) {
        let total = tests.len();
        write_tests(
            dir,
            &Problem {
                id: "A".to_string(),
                name: "A".to_string(),
                tests,
            },
        )
        .unwrap();
        fs::write(dir.join("A.sh"), "").unwrap();

        let state = ProblemState::new("A", "echo", "A.sh", total);
        let session = Session {
            working_directory: dir.to_path_buf(),
            contest_id: "1".to_string(),
            problems: vec![state.clone()],
        };
        (session, state)
    }

    fn template(run: &str, build: Option<&str>) -> Template {
        Template {
            name: "echo".to_string(),
            source_path: PathBuf::from("unused"),
            file_extension: ".sh".to_string(),
            run_command: run.to_string(),
            build_command: build.map(str::to_string),
        }
    }

    #[test]
    fn test_outputs_match_ignores_whitespace_layout() {
        assert!(outputs_match("1 2\n3\n", "1 2 3"));
        assert!(!outputs_match("1 2", "1 2 3"));
    }

    #[test]
    fn test_counts_passes_and_failures() {
        let temp = TempDir::new().unwrap();
        let (session, state) = setup(
            temp.path(),
            vec![Test::new("1 2", "1 2"), Test::new("3", "4"), Test::new("5\n", "5")],
        );

        let summary = run_tests(&template("cat", None), &session, &state, LIMIT).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.cases[1].passed);
        assert_eq!(summary.cases[1].actual, "3");
    }

    #[test]
    fn test_nonzero_exit_fails_case() {
        let temp = TempDir::new().unwrap();
        let (session, state) = setup(temp.path(), vec![Test::new("1", "1")]);

        let summary = run_tests(&template("cat; exit 3", None), &session, &state, LIMIT).unwrap();
        assert_eq!(summary.passed, 0);
        assert!(summary.cases[0].stderr.contains("exited"));
    }

    #[test]
    fn test_build_failure_is_error() {
        let temp = TempDir::new().unwrap();
        let (session, state) = setup(temp.path(), vec![Test::new("1", "1")]);

        let err = run_tests(&template("cat", Some("echo nope >&2; false")), &session, &state, LIMIT)
            .unwrap_err();
        match err {
            ForcesError::Process { detail, .. } => assert_eq!(detail, "nope"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_placeholders_expand_to_solution_paths() {
        let temp = TempDir::new().unwrap();
        let (session, state) = setup(temp.path(), vec![Test::new("", "A.sh")]);

        let summary = run_tests(&template("basename {src}", None), &session, &state, LIMIT).unwrap();
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn test_large_input_echoed_back_does_not_block() {
        let temp = TempDir::new().unwrap();
        let big: String = (0..50_000).map(|i| format!("{} ", i)).collect();
        let (session, state) = setup(temp.path(), vec![Test::new(big.clone(), big)]);

        let summary = run_tests(&template("cat", None), &session, &state, LIMIT).unwrap();
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn test_run_over_limit_is_killed() {
        let temp = TempDir::new().unwrap();
        let (session, state) = setup(temp.path(), vec![Test::new("1", "1")]);

        let started = Instant::now();
        let summary = run_tests(
            &template("exec sleep 30", None),
            &session,
            &state,
            Duration::from_millis(200),
        )
        .unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(summary.failed, 1);
        assert!(summary.cases[0].timed_out);
    }
}

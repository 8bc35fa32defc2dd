use std::collections::HashSet;

use log::{info, warn};

use crate::error::{ForcesError, Result};
use crate::models::{Contest, Problem};
use crate::scrape::{
    contest_url, extract_problem_ids, extract_problem_name, extract_sample_tests, problem_url,
    PageFetcher, PageTree,
};

/// Scrapes a contest into memory.
///
/// With no explicit ids the contest listing decides which problems to fetch;
/// otherwise the given ids are used in order and the listing is never requested.
/// Ids are unique ignoring case; a repeat is dropped and the first kept.
/// Any failing problem aborts the whole assembly.
pub fn assemble(
    fetcher: &dyn PageFetcher,
    host: &str,
    contest_id: &str,
    explicit_ids: &[String],
) -> Result<Contest> {
    validate_id(contest_id)?;

    let problem_ids = if explicit_ids.is_empty() {
        let page = PageTree::parse(&fetcher.fetch(&contest_url(host, contest_id))?);
        extract_problem_ids(&page.root())?
    } else {
        explicit_ids.to_vec()
    };

    let mut seen = HashSet::new();
    let mut contest = Contest::new(contest_id);
    for id in problem_ids {
        validate_id(&id)?;
        if !seen.insert(id.to_ascii_lowercase()) {
            warn!("skipping repeated problem id {}", id);
            continue;
        }
        info!("scraping problem {}/{}", contest_id, id);

        let page = PageTree::parse(&fetcher.fetch(&problem_url(host, contest_id, &id))?);
        let name = extract_problem_name(&page.root())?;
        let tests = extract_sample_tests(&page.root())?;
        contest.problems.push(Problem { id, name, tests });
    }

    Ok(contest)
}

/// Ids become directory and file names, so only plain alphanumerics pass.
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ForcesError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned pages by URL and records every request.
    #[derive(Default)]
    pub(crate) struct FakeFetcher {
        pages: HashMap<String, String>,
        pub(crate) requests: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        pub(crate) fn with(mut self, url: String, html: &str) -> Self {
            self.pages.insert(url, html.to_string());
            self
        }
    }

    impl PageFetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| ForcesError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    pub(crate) const HOST: &str = "codeforces.com";

    pub(crate) fn listing(ids: &[&str]) -> String {
        let rows: String = ids
            .iter()
            .map(|id| format!(r#"<tr><td class="id"><a href="/p/{id}">{id}</a></td><td>name</td></tr>"#))
            .collect();
        format!(r#"<html><body><table class="problems"><tr><th>#</th><th>Name</th></tr>{rows}</table></body></html>"#)
    }

    pub(crate) fn problem_page(title: &str, samples: &[(&str, &str)]) -> String {
        let blocks: String = samples
            .iter()
            .map(|(input, output)| {
                format!(
                    r#"<div class="input"><div class="title">Input</div><pre>{input}</pre></div><div class="output"><div class="title">Output</div><pre>{output}</pre></div>"#
                )
            })
            .collect();
        format!(
            r#"<html><body><div class="header"><div class="title">{title}</div></div><div class="sample-test">{blocks}</div></body></html>"#
        )
    }

    pub(crate) fn contest_fetcher() -> FakeFetcher {
        FakeFetcher::default()
            .with(contest_url(HOST, "1720"), &listing(&["A", "B"]))
            .with(
                problem_url(HOST, "1720", "A"),
                &problem_page("A. Burenka Plays with Fractions", &[("1\n2 1 1 1", "0")]),
            )
            .with(
                problem_url(HOST, "1720", "B"),
                &problem_page("B. Interesting Sum", &[("1\n5\n1 2 3 4 5", "7")]),
            )
    }

    #[test]
    fn test_assemble_from_listing() {
        let fetcher = contest_fetcher();
        let contest = assemble(&fetcher, HOST, "1720", &[]).unwrap();

        assert_eq!(contest.id, "1720");
        let ids: Vec<&str> = contest.problems.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert!(contest.problems.iter().all(|p| p.tests.len() == 1));
        assert_eq!(contest.problems[1].name, "B. Interesting Sum");
        assert_eq!(contest.problems[1].tests[0].output, "7");
    }

    #[test]
    fn test_explicit_ids_skip_listing() {
        let fetcher = contest_fetcher();
        let contest = assemble(&fetcher, HOST, "1720", &["B".to_string()]).unwrap();

        assert_eq!(contest.problems.len(), 1);
        assert_eq!(
            *fetcher.requests.borrow(),
            vec![problem_url(HOST, "1720", "B")]
        );
    }

    #[test]
    fn test_explicit_ids_keep_caller_order() {
        let fetcher = contest_fetcher();
        let ids = vec!["B".to_string(), "A".to_string()];
        let contest = assemble(&fetcher, HOST, "1720", &ids).unwrap();
        assert_eq!(contest.problems[0].id, "B");
        assert_eq!(contest.problems[1].id, "A");
    }

    #[test]
    fn test_one_failing_problem_aborts_assembly() {
        let fetcher = contest_fetcher().with(
            problem_url(HOST, "1720", "B"),
            r#"<html><body><div class="title">B</div><div class="sample-test"><div class="input"><pre>1</pre></div></div></body></html>"#,
        );
        let err = assemble(&fetcher, HOST, "1720", &[]).unwrap_err();
        assert!(matches!(err, ForcesError::Malformed(_)));
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let fetcher = contest_fetcher();
        let err = assemble(&fetcher, HOST, "1720", &["../A".to_string()]).unwrap_err();
        assert!(matches!(err, ForcesError::InvalidId(_)));
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[test]
    fn test_repeated_ids_are_scraped_once() {
        let fetcher = contest_fetcher();
        let ids = vec!["A".to_string(), "B".to_string(), "A".to_string()];
        let contest = assemble(&fetcher, HOST, "1720", &ids).unwrap();

        let ids: Vec<&str> = contest.problems.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(fetcher.requests.borrow().len(), 2);
    }

    #[test]
    fn test_ids_differing_only_in_case_keep_first() {
        let fetcher = contest_fetcher().with(
            problem_url(HOST, "1720", "a"),
            &problem_page("A. lower", &[("1", "1")]),
        );
        let ids = vec!["A".to_string(), "a".to_string()];
        let contest = assemble(&fetcher, HOST, "1720", &ids).unwrap();

        assert_eq!(contest.problems.len(), 1);
        assert_eq!(contest.problems[0].id, "A");
        assert_eq!(
            *fetcher.requests.borrow(),
            vec![problem_url(HOST, "1720", "A")]
        );
    }

    #[test]
    fn test_repeated_listing_rows_collapse() {
        let fetcher = contest_fetcher().with(contest_url(HOST, "1720"), &listing(&["A", "B", "A"]));
        let contest = assemble(&fetcher, HOST, "1720", &[]).unwrap();
        assert_eq!(contest.problems.len(), 2);
    }
}

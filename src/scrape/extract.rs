use log::debug;

use crate::error::{ForcesError, Result};
use crate::models::Test;

use super::tree::{collect_text, element_children, find_first, has_class, last_element_child, PageNode};

const PROBLEMS_CLASS: &str = "problems";
const TITLE_CLASS: &str = "title";
const SAMPLE_TEST_CLASS: &str = "sample-test";

/// Problem ids from a contest page, in listing order.
///
/// The listing is a table classed `problems` whose first row is a header;
/// every following row links to a problem and the link text is its id.
pub fn extract_problem_ids<N: PageNode>(contest: &N) -> Result<Vec<String>> {
    let listing = find_first(contest, |n| has_class(n, PROBLEMS_CLASS))
        .ok_or_else(|| ForcesError::NotFound("problem listing (class=\"problems\")".to_string()))?;
    let body = find_first(&listing, |n| n.tag() == "tbody")
        .ok_or_else(|| ForcesError::NotFound("problem listing body".to_string()))?;

    let rows: Vec<N> = element_children(&body)
        .into_iter()
        .filter(|row| row.tag() == "tr")
        .collect();

    let mut ids = Vec::with_capacity(rows.len().saturating_sub(1));
    for (index, row) in rows.iter().enumerate().skip(1) {
        let anchor = find_first(row, |n| n.tag() == "a").ok_or_else(|| {
            ForcesError::Malformed(format!("listing row {} has no problem link", index))
        })?;
        let id = collect_text(&anchor)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ForcesError::Malformed(format!("listing row {} has an empty problem id", index))
            })?;
        ids.push(id);
    }

    debug!("extracted {} problem ids", ids.len());
    Ok(ids)
}

/// Raw text of the first node sitting directly inside a `title` container.
pub fn extract_problem_name<N: PageNode>(problem: &N) -> Result<String> {
    let name = find_first(problem, |n| {
        n.is_text() && n.parent().map_or(false, |p| has_class(&p, TITLE_CLASS))
    })
    .ok_or_else(|| ForcesError::NotFound("problem name (class=\"title\")".to_string()))?;

    Ok(name.text().to_string())
}

// <div class="sample-test">
//     <div class="input"><div class="title">Input</div><pre>...</pre></div>
//     <div class="output"><div class="title">Output</div><pre>...</pre></div>
//     ...
// </div>
pub fn extract_sample_tests<N: PageNode>(problem: &N) -> Result<Vec<Test>> {
    let container = find_first(problem, |n| has_class(n, SAMPLE_TEST_CLASS))
        .ok_or_else(|| ForcesError::NotFound("sample tests (class=\"sample-test\")".to_string()))?;

    let blocks = element_children(&container);
    if blocks.len() % 2 != 0 {
        return Err(ForcesError::Malformed(format!(
            "sample input {} has no matching output",
            blocks.len() / 2
        )));
    }

    blocks
        .chunks(2)
        .enumerate()
        .map(|(index, pair)| -> Result<Test> {
            let input = block_text(&pair[0], index, "input")?;
            let output = block_text(&pair[1], index, "output")?;
            Ok(Test::new(input, output))
        })
        .collect()
}

fn block_text<N: PageNode>(block: &N, index: usize, side: &str) -> Result<String> {
    let pre = last_element_child(block).ok_or_else(|| {
        ForcesError::Malformed(format!("sample {} {} has no text block", side, index))
    })?;
    collect_text(&pre)
        .ok_or_else(|| ForcesError::Malformed(format!("sample {} {} is empty", side, index)))
}

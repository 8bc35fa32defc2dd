/// One published sample case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub input: String,
    pub output: String,
}

impl Test {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub id: String,
    pub name: String,
    pub tests: Vec<Test>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contest {
    pub id: String,
    pub problems: Vec<Problem>,
}

impl Contest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            problems: Vec::new(),
        }
    }
}

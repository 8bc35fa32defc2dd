use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    C,
    Rs,
    Py,
    Java,
    Kt,
    Go,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Rs => "Rust",
            Language::Py => "Python",
            Language::Java => "Java",
            Language::Kt => "Kotlin",
            Language::Go => "Go",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Rs => "rs",
            Language::Py => "py",
            Language::Java => "java",
            Language::Kt => "kt",
            Language::Go => "go",
        }
    }

    /// Accepts an extension with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext.trim_start_matches('.') {
            "cpp" | "cc" | "cxx" => Some(Language::Cpp),
            "c" => Some(Language::C),
            "rs" => Some(Language::Rs),
            "py" => Some(Language::Py),
            "java" => Some(Language::Java),
            "kt" => Some(Language::Kt),
            "go" => Some(Language::Go),
            _ => None,
        }
    }

    pub fn comment_prefix(&self) -> &'static str {
        match self {
            Language::Py => "#",
            _ => "//",
        }
    }

    /// Build step run once before the tests, if the language needs one.
    /// `{src}` is the solution file, `{bin}` the solution path minus extension.
    pub fn build_command(&self) -> Option<&'static str> {
        match self {
            Language::Cpp => Some("g++ -std=c++17 -O2 -o {bin} {src}"),
            Language::C => Some("gcc -std=c11 -O2 -o {bin} {src} -lm"),
            Language::Rs => Some("rustc -O -o {bin} {src}"),
            Language::Kt => Some("kotlinc {src} -include-runtime -d {bin}.jar"),
            Language::Go => Some("go build -o {bin} {src}"),
            Language::Py | Language::Java => None,
        }
    }

    pub fn run_command(&self) -> &'static str {
        match self {
            Language::Cpp | Language::C | Language::Rs | Language::Go => "{bin}",
            Language::Py => "python3 {src}",
            Language::Java => "java {src}",
            Language::Kt => "java -jar {bin}.jar",
        }
    }

    pub fn starter_source(&self) -> &'static str {
        match self {
            Language::Cpp => {
                "#include <bits/stdc++.h>\nusing namespace std;\n\nint main() {\n    ios::sync_with_stdio(false);\n    cin.tie(nullptr);\n\n    return 0;\n}\n"
            }
            Language::C => "#include <stdio.h>\n\nint main(void) {\n\n    return 0;\n}\n",
            Language::Rs => {
                "use std::io::{self, Read};\n\nfn main() {\n    let mut input = String::new();\n    io::stdin().read_to_string(&mut input).unwrap();\n}\n"
            }
            Language::Py => "import sys\n\ninput = sys.stdin.readline\n\n\ndef main():\n    pass\n\n\nmain()\n",
            Language::Java => {
                "import java.util.*;\n\npublic class Main {\n    public static void main(String[] args) {\n        Scanner in = new Scanner(System.in);\n    }\n}\n"
            }
            Language::Kt => "fun main() {\n}\n",
            Language::Go => {
                "package main\n\nimport (\n\t\"bufio\"\n\t\"os\"\n)\n\nfunc main() {\n\treader := bufio.NewReader(os.Stdin)\n\t_ = reader\n}\n"
            }
        }
    }
}

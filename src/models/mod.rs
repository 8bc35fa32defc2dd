pub mod config;
pub mod contest;
pub mod language;
pub mod session;
pub mod template;

pub use contest::{Contest, Problem, Test};
pub use language::Language;
pub use session::{ProblemState, Session};
pub use template::{Template, TemplateRegistry};

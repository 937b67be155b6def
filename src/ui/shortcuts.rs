//! Shell command names, shared by the parser and the help text.

pub const FACET: &str = ":facet";
pub const FACETS: &str = ":facets";
pub const CLEAR: &str = ":clear";
pub const HISTORY: &str = ":history";
pub const RECALL: &str = ":recall";
pub const FORGET: &str = ":forget";
pub const HELP: &str = ":help";
pub const QUIT: &str = ":quit";
pub const QUIT_SHORT: &str = ":q";

//! Analysis pipeline: locate, expand, match, extract.
//!
//! Each discovery task runs the stages in order against an [`host::AnalysisHost`]:
//! `locate` resolves a function entry from a symbol name or byte signature,
//! `expand` linearizes the function's ranges into one decoded instruction
//! stream, `matcher` finds opcode-category idioms in that stream, and
//! `extract` turns a unique match into concrete operand values.

pub mod expand;
pub mod extract;
pub mod host;
pub mod locate;
pub mod matcher;

pub use expand::expand;
pub use host::AnalysisHost;
pub use locate::locate;
pub use matcher::find_all;

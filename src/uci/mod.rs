pub mod r#loop;
pub mod options;
pub mod parser;

pub use options::UciOptions;
pub use parser::{parse_uci_command, UciCommand};
pub use r#loop::{drive, process_uci_line, run_uci_loop, UciEngine, UciState};

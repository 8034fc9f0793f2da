mod error;
mod readers;
mod util;

pub use error::Error;
pub use readers::{is_gzipped, open_text_reader};
pub use util::{handle_error_and_exit, Result};

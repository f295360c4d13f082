//! Writers that deliver finished records

pub mod console;
pub mod io;

pub use console::ConsoleWriter;
pub use io::IoWriter;

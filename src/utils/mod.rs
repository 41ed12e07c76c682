pub mod settings_console;
pub mod tools;

pub use self::settings_console::{spawn_stdin_reader, ConsoleCommand};
pub use self::tools::show_rust_core_dependencies;

pub mod convert;
pub mod setup;
pub mod teardown;

pub use convert::{run_convert, ConvertCommand};
pub use setup::{run_setup, SetupCommand};
pub use teardown::run_teardown;

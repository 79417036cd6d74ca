mod run;

pub use self::run::{run, RunOptions};

pub mod conf;
pub mod emit;
pub mod watch;

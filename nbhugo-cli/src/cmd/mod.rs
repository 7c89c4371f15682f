pub mod convert;
pub mod watch;

pub(crate) mod behaviors;
pub(crate) mod bootstrap;
pub(crate) mod config;
pub(crate) mod dump;
pub(crate) mod loop_runner;
pub(crate) mod spawning;

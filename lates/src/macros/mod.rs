#[macro_use]
mod tracing;

pub mod logging;

#[macro_use]
mod macros;

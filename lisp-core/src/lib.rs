pub mod parser;
pub mod environment;
pub mod eval;
pub mod builtins;
pub mod interpreter;
pub mod utils;

#[cfg(test)]
mod test_utils;

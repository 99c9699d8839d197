pub mod environment;
pub mod value;

pub mod prelude {
    pub use super::{
        environment::*,
        value::*
    };
}

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    RedefinedNative {
        location: SrcSpan,
        name: String,
    },
    UnusedValue {
        location: SrcSpan,
    },
}

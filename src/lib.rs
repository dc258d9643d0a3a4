// src/lib.rs

pub mod core;
pub mod error;

pub use crate::core::location::Location;
pub use crate::core::phonemizer::Phonemizer;
pub use crate::core::result::PhonemizeResult;
pub use crate::core::symbols::{StopKind, StopType};
pub use crate::error::{PhonemizerError, Result};

//! Message sources
//!
//! A fresh [`Message`] is produced for every invocation, either from a text
//! file or from a configured constant.

mod content;
mod source;

pub use content::{Message, SubjectLine};
pub use source::{
    ConstantSource, FileSource, MessageSource, MissingSourcePolicy, from_settings,
};

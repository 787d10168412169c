// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html

mod access_flags;
pub mod annotation;
pub mod attributes;
mod class_file;
#[macro_use]
pub mod constant_pool;
mod cursor;
pub mod descriptor;
mod error;
pub mod mutf8;
mod parser;
pub mod render;

use std::io::Read;

pub use self::class_file::{ClassFile, FieldInfo, MethodInfo};
pub use access_flags::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
pub use attributes::{Attribute, Attributes};
pub use constant_pool::ConstantPool;
pub use error::ClassFileError;
pub use parser::{Parser, MAGIC};
pub use render::render;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;

/// Decodes one class file from `r`.
///
/// Nothing of the model survives a failure; the whole decode is aborted.
pub fn decode(r: impl Read) -> Result<ClassFile> {
    ClassFile::parse(r)
}

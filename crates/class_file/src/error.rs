use thiserror::Error;

use crate::constant_pool;

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error(transparent)]
    IOError(std::io::Error),
    #[error("Unexpected end of input")]
    TruncatedInput,
    #[error("Invalid magic identifier: 0x{0:X}")]
    NotAClassFile(u32),
    #[error("Invalid cp info tag: {0}")]
    UnsupportedConstantTag(u8),
    #[error("Invalid element value tag: {0:?}")]
    UnsupportedElementValueTag(char),
    #[error("Annotation nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("Constant pool index out of range: {0}")]
    IndexOutOfRange(u16),
    #[error("Expected {0}, found {1}")]
    UnexpectedConstantPoolEntry(&'static str, constant_pool::CpInfo),
}

impl From<std::io::Error> for ClassFileError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => ClassFileError::TruncatedInput,
            _ => ClassFileError::IOError(e),
        }
    }
}

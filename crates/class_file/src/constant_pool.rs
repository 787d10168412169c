use std::fmt;

use crate::{ClassFileError, Result};

#[macro_export]
macro_rules! matches_cp_info {
    ($cp:expr, $index:expr, $i:ident) => {
        match $cp.get($index)? {
            $crate::constant_pool::CpInfo::$i(ref n) => Ok(n),
            c => Err($crate::ClassFileError::UnexpectedConstantPoolEntry(
                stringify!($i),
                c.clone(),
            )),
        }
    };
}

/// The 1-indexed constant pool of a class file.
///
/// Slot 0 is never stored; the slot following a `Long` or `Double` holds
/// [`CpInfo::Unusable`]. Both resolve to [`ClassFileError::IndexOutOfRange`].
#[derive(Debug, Default, PartialEq)]
pub struct ConstantPool {
    cp_infos: Vec<CpInfo>,
}
impl ConstantPool {
    pub fn new(cp_infos: Vec<CpInfo>) -> Self {
        Self { cp_infos }
    }

    /// The `constant_pool_count` this table was read with.
    pub fn count(&self) -> usize {
        self.cp_infos.len() + 1
    }

    pub fn get(&self, index: u16) -> Result<&CpInfo> {
        match (index as usize)
            .checked_sub(1)
            .and_then(|i| self.cp_infos.get(i))
        {
            None | Some(CpInfo::Unusable) => Err(ClassFileError::IndexOutOfRange(index)),
            Some(cp_info) => Ok(cp_info),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        matches_cp_info!(self, index, Utf8).map(String::as_str)
    }

    /// Resolves a `CONSTANT_Class_info` index to the class name it refers to.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        let ClassInfo { name_index } = matches_cp_info!(self, index, Class)?;
        self.utf8(*name_index)
    }

    /// Iterates the usable entries along with their pool index.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &CpInfo)> {
        self.cp_infos
            .iter()
            .enumerate()
            .filter(|(_, c)| !matches!(c, CpInfo::Unusable))
            .map(|(i, c)| (i as u16 + 1, c))
    }
}
impl<'a> IntoIterator for &'a ConstantPool {
    type Item = &'a CpInfo;
    type IntoIter = std::slice::Iter<'a, CpInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.cp_infos.iter()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum CpInfo {
    Class(ClassInfo),
    FieldRef(RefInfo),
    MethodRef(RefInfo),
    InterfaceMethodRef(RefInfo),
    String { string_index: u16 },
    Integer(i32),
    /// Raw IEEE 754 bits, so NaN payloads survive and compare equal.
    Float(u32),
    Long(i64),
    Double(u64),
    NameAndType(NameAndTypeInfo),
    Utf8(String),
    MethodHandle(MethodHandleInfo),
    MethodType(MethodTypeInfo),
    InvokeDynamic(InvokeDynamicInfo),
    Unusable,
}
impl CpInfo {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELD_REF: u8 = 9;
    pub const METHOD_REF: u8 = 10;
    pub const INTERFACE_METHOD_REF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const INVOKE_DYNAMIC: u8 = 18;

    /// Number of pool slots taken by an entry with this tag.
    pub fn slot_size(tag: u8) -> usize {
        match tag {
            Self::LONG | Self::DOUBLE => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpInfo::Class(ClassInfo { name_index }) => write!(f, "Class #{}", name_index),
            CpInfo::FieldRef(r) => write!(f, "Fieldref {}", r),
            CpInfo::MethodRef(r) => write!(f, "Methodref {}", r),
            CpInfo::InterfaceMethodRef(r) => write!(f, "InterfaceMethodref {}", r),
            CpInfo::String { string_index } => write!(f, "String #{}", string_index),
            CpInfo::Integer(v) => write!(f, "Integer {}", v),
            CpInfo::Float(bits) => write!(f, "Float {}", f32::from_bits(*bits)),
            CpInfo::Long(v) => write!(f, "Long {}", v),
            CpInfo::Double(bits) => write!(f, "Double {}", f64::from_bits(*bits)),
            CpInfo::NameAndType(NameAndTypeInfo {
                name_index,
                descriptor_index,
            }) => write!(f, "NameAndType #{}:#{}", name_index, descriptor_index),
            CpInfo::Utf8(s) => write!(f, "Utf8 {:?}", s),
            CpInfo::MethodHandle(MethodHandleInfo {
                reference_kind,
                reference_index,
            }) => write!(f, "MethodHandle {}:#{}", reference_kind, reference_index),
            CpInfo::MethodType(MethodTypeInfo { descriptor_index }) => {
                write!(f, "MethodType #{}", descriptor_index)
            }
            CpInfo::InvokeDynamic(InvokeDynamicInfo {
                bootstrap_method_attr_index,
                name_and_type_index,
            }) => write!(
                f,
                "InvokeDynamic #{}:#{}",
                bootstrap_method_attr_index, name_and_type_index
            ),
            CpInfo::Unusable => write!(f, "(unusable)"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct RefInfo {
    pub class_index: u16,
    pub name_and_type_index: u16,
}
impl fmt::Display for RefInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.#{}", self.class_index, self.name_and_type_index)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassInfo {
    // The constant_pool entry at name_index must be a CONSTANT_Utf8_info structure
    // representing a valid binary class or interface name encoded in internal form.
    pub name_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NameAndTypeInfo {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvokeDynamicInfo {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodHandleInfo {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodTypeInfo {
    pub descriptor_index: u16,
}

#[cfg(test)]
mod constant_pool_tests {
    use super::*;

    fn pool() -> ConstantPool {
        ConstantPool::new(vec![
            CpInfo::Class(ClassInfo { name_index: 2 }),
            CpInfo::Utf8("my/MyClass".into()),
            CpInfo::Long(5),
            CpInfo::Unusable,
            CpInfo::Integer(7),
        ])
    }

    #[test]
    fn it_should_resolve_a_class_name() {
        assert_eq!(pool().class_name(1).unwrap(), "my/MyClass");
    }

    #[test]
    fn it_should_reject_the_reserved_index() {
        assert!(matches!(
            pool().get(0),
            Err(ClassFileError::IndexOutOfRange(0))
        ));
    }

    #[test]
    fn it_should_reject_an_index_past_the_end() {
        assert!(matches!(
            pool().get(6),
            Err(ClassFileError::IndexOutOfRange(6))
        ));
    }

    #[test]
    fn it_should_reject_the_slot_after_a_long() {
        assert_eq!(pool().get(3).unwrap(), &CpInfo::Long(5));
        assert!(matches!(
            pool().get(4),
            Err(ClassFileError::IndexOutOfRange(4))
        ));
    }

    #[test]
    fn it_should_reject_an_entry_of_the_wrong_kind() {
        assert!(matches!(
            pool().utf8(5),
            Err(ClassFileError::UnexpectedConstantPoolEntry(
                "Utf8",
                CpInfo::Integer(7)
            ))
        ));
    }

    #[test]
    fn it_should_skip_unusable_slots_when_iterating() {
        let indices = pool().iter().map(|(i, _)| i).collect::<Vec<_>>();
        assert_eq!(indices, vec![1, 2, 3, 5]);
        assert_eq!(pool().count(), 6);
    }

    #[test]
    fn it_should_display_entries() {
        assert_eq!(CpInfo::Utf8("Test".into()).to_string(), "Utf8 \"Test\"");
        assert_eq!(
            CpInfo::MethodRef(RefInfo {
                class_index: 1,
                name_and_type_index: 4
            })
            .to_string(),
            "Methodref #1.#4"
        );
    }
}

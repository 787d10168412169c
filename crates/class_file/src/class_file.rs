use std::io::{BufReader, Read};

use crate::{
    annotation::Annotation, attributes::Attributes, parser::Parser, ClassAccessFlags,
    ConstantPool, FieldAccessFlags, MethodAccessFlags, Result,
};

/// A decoded class file.
///
/// Every index the model holds was resolved once while decoding, so the
/// accessors below only fail for a model assembled by hand.
#[derive(Debug, PartialEq)]
pub struct ClassFile {
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: u16,
    /// Zero when there is no superclass.
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Attributes,
}
impl ClassFile {
    pub fn parse(bytes: impl Read) -> Result<ClassFile> {
        Parser::new(BufReader::new(bytes)).parse()
    }

    pub fn class_name(&self) -> Result<&str> {
        self.constant_pool.class_name(self.this_class)
    }

    pub fn super_class(&self) -> Result<Option<&str>> {
        // If the value of the super_class item is zero, then this class file must represent the
        // class Object, the only class or interface without a direct superclass.
        if self.super_class == 0 {
            return Ok(None);
        }

        self.constant_pool.class_name(self.super_class).map(Some)
    }

    pub fn interface_names(&self) -> Result<Vec<&str>> {
        self.interfaces
            .iter()
            .map(|&i| self.constant_pool.class_name(i))
            .collect()
    }

    pub fn field_name(&self, field: &FieldInfo) -> Result<&str> {
        self.constant_pool.utf8(field.name_index)
    }

    pub fn field_descriptor(&self, field: &FieldInfo) -> Result<&str> {
        self.constant_pool.utf8(field.descriptor_index)
    }

    pub fn method_name(&self, method: &MethodInfo) -> Result<&str> {
        self.constant_pool.utf8(method.name_index)
    }

    pub fn method_descriptor(&self, method: &MethodInfo) -> Result<&str> {
        self.constant_pool.utf8(method.descriptor_index)
    }

    /// Class-level `RuntimeVisibleAnnotations`.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.attributes.annotations()
    }

    /// An interface, but not an annotation interface.
    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
            && !self.access_flags.contains(ClassAccessFlags::ANNOTATION)
    }

    pub fn is_annotation(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::ANNOTATION)
    }

    /// Neither an interface nor an enum.
    pub fn is_class(&self) -> bool {
        !self
            .access_flags
            .intersects(ClassAccessFlags::INTERFACE | ClassAccessFlags::ENUM)
    }

    pub fn is_enum(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::ENUM)
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::ABSTRACT)
    }

    pub fn is_public(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::PUBLIC)
    }

    pub fn is_final(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::FINAL)
    }

    pub fn is_synthetic(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::SYNTHETIC)
    }
}

#[derive(Debug, PartialEq)]
pub struct FieldInfo {
    pub access_flags: FieldAccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}

#[derive(Debug, PartialEq)]
pub struct MethodInfo {
    pub access_flags: MethodAccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}

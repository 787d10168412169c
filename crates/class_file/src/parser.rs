use std::io::Read;

use crate::{
    annotation::{Annotation, ConstKind, ElementValue, ElementValuePair},
    attributes::{Attributes, RUNTIME_VISIBLE_ANNOTATIONS},
    class_file::{FieldInfo, MethodInfo},
    constant_pool::{
        ClassInfo, InvokeDynamicInfo, MethodHandleInfo, MethodTypeInfo, NameAndTypeInfo, RefInfo,
    },
    cursor::ByteCursor,
    mutf8,
};

use super::{constant_pool::CpInfo, *};

pub const MAGIC: u32 = 0xCAFEBABE;

/// Deepest nesting of annotations and arrays inside one element value.
pub const MAX_ELEMENT_VALUE_DEPTH: usize = 64;

pub struct Parser<R> {
    r: ByteCursor<R>,
}
impl<R: Read> Parser<R> {
    pub fn new(r: R) -> Self {
        Self {
            r: ByteCursor::new(r),
        }
    }

    pub fn parse(&mut self) -> Result<ClassFile> {
        let magic = self.parse_magic_identifier()?;
        let (minor_version, major_version) = self.parse_version()?;
        log::debug!("class file version {}.{}", major_version, minor_version);

        let constant_pool = self.parse_constant_pool()?;
        let access_flags = ClassAccessFlags::from_bits_truncate(self.read_u16()?);
        let this_class = self.parse_class_index(&constant_pool)?;

        // Zero only for java/lang/Object.
        let super_class = match self.read_u16()? {
            0 => 0,
            index => {
                constant_pool.class_name(index)?;
                index
            }
        };

        let interfaces_count = self.read_u16()?;
        let interfaces = (0..interfaces_count)
            .map(|_| self.parse_class_index(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let fields_count = self.read_u16()?;
        let fields = (0..fields_count)
            .map(|_| self.parse_field_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let methods_count = self.read_u16()?;
        let methods = (0..methods_count)
            .map(|_| self.parse_method_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let attributes_count = self.read_u16()?;
        let attributes = self.parse_attributes(attributes_count, &constant_pool)?;

        Ok(ClassFile {
            magic,
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn parse_magic_identifier(&mut self) -> Result<u32> {
        match self.read_u32()? {
            MAGIC => Ok(MAGIC),
            magic_identifier => Err(ClassFileError::NotAClassFile(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.read_u16()?;
        let major = self.read_u16()?;
        Ok((minor, major))
    }

    fn parse_class_index(&mut self, constant_pool: &ConstantPool) -> Result<u16> {
        let index = self.read_u16()?;
        constant_pool.class_name(index)?;
        Ok(index)
    }

    fn parse_field_info(&mut self, constant_pool: &ConstantPool) -> Result<FieldInfo> {
        let access_flags = FieldAccessFlags::from_bits_truncate(self.read_u16()?);
        let (name_index, descriptor_index) = self.parse_name_and_descriptor(constant_pool)?;
        let attributes_count = self.read_u16()?;
        let attributes = self.parse_attributes(attributes_count, constant_pool)?;

        Ok(FieldInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_method_info(&mut self, constant_pool: &ConstantPool) -> Result<MethodInfo> {
        let access_flags = MethodAccessFlags::from_bits_truncate(self.read_u16()?);
        let (name_index, descriptor_index) = self.parse_name_and_descriptor(constant_pool)?;
        let attributes_count = self.read_u16()?;
        let attributes = self.parse_attributes(attributes_count, constant_pool)?;

        Ok(MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_name_and_descriptor(&mut self, constant_pool: &ConstantPool) -> Result<(u16, u16)> {
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        constant_pool.utf8(name_index)?;
        constant_pool.utf8(descriptor_index)?;
        Ok((name_index, descriptor_index))
    }

    fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.read_u16()?;

        let count = (constant_pool_count as usize).saturating_sub(1);
        let mut res = Vec::with_capacity(count);
        while res.len() < count {
            let (cp_info, slot_size) = self.parse_cp_info()?;
            log::trace!("#{} = {}", res.len() + 1, cp_info);
            res.push(cp_info);
            (1..slot_size).for_each(|_| res.push(CpInfo::Unusable));
        }
        // A trailing long or double has nowhere to put its second slot.
        res.truncate(count);

        Ok(ConstantPool::new(res))
    }

    fn parse_cp_info(&mut self) -> Result<(CpInfo, usize)> {
        let tag = self.read_u8()?;
        let cp_info = match tag {
            CpInfo::UTF8 => self.parse_utf8()?,
            CpInfo::INTEGER => CpInfo::Integer(self.r.read_i32()?),
            CpInfo::FLOAT => CpInfo::Float(self.read_u32()?),
            CpInfo::LONG => CpInfo::Long(self.r.read_i64()?),
            CpInfo::DOUBLE => CpInfo::Double(self.r.read_u64()?),
            CpInfo::CLASS => self.parse_class_info()?,
            CpInfo::STRING => self.parse_string()?,
            CpInfo::FIELD_REF => CpInfo::FieldRef(self.parse_ref_info()?),
            CpInfo::METHOD_REF => CpInfo::MethodRef(self.parse_ref_info()?),
            CpInfo::INTERFACE_METHOD_REF => CpInfo::InterfaceMethodRef(self.parse_ref_info()?),
            CpInfo::NAME_AND_TYPE => self.parse_name_and_type_info()?,
            CpInfo::METHOD_HANDLE => self.parse_method_handle()?,
            CpInfo::METHOD_TYPE => self.parse_method_type_info()?,
            CpInfo::INVOKE_DYNAMIC => self.parse_invoke_dynamic_info()?,
            _ => return Err(ClassFileError::UnsupportedConstantTag(tag)),
        };

        Ok((cp_info, CpInfo::slot_size(tag)))
    }

    fn parse_utf8(&mut self) -> Result<CpInfo> {
        let length = self.read_u16()?;
        let bytes = self.r.fill(length as usize)?;

        Ok(CpInfo::Utf8(mutf8::decode(bytes)))
    }

    fn parse_class_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_u16()?;

        Ok(CpInfo::Class(ClassInfo { name_index }))
    }

    fn parse_string(&mut self) -> Result<CpInfo> {
        let string_index = self.read_u16()?;

        Ok(CpInfo::String { string_index })
    }

    fn parse_name_and_type_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;

        Ok(CpInfo::NameAndType(NameAndTypeInfo {
            name_index,
            descriptor_index,
        }))
    }

    fn parse_method_handle(&mut self) -> Result<CpInfo> {
        let reference_kind = self.read_u8()?;
        let reference_index = self.read_u16()?;

        Ok(CpInfo::MethodHandle(MethodHandleInfo {
            reference_kind,
            reference_index,
        }))
    }

    fn parse_method_type_info(&mut self) -> Result<CpInfo> {
        let descriptor_index = self.read_u16()?;

        Ok(CpInfo::MethodType(MethodTypeInfo { descriptor_index }))
    }

    fn parse_invoke_dynamic_info(&mut self) -> Result<CpInfo> {
        let bootstrap_method_attr_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(CpInfo::InvokeDynamic(InvokeDynamicInfo {
            bootstrap_method_attr_index,
            name_and_type_index,
        }))
    }

    fn parse_ref_info(&mut self) -> Result<RefInfo> {
        let class_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(RefInfo {
            class_index,
            name_and_type_index,
        })
    }

    fn parse_attribute(&mut self, constant_pool: &ConstantPool) -> Result<Attribute> {
        let attribute_name_index = self.read_u16()?;
        let attribute_length = self.read_u32()?;
        let info = self.r.read_exact(attribute_length as usize)?;

        let name = constant_pool.utf8(attribute_name_index)?;
        log::trace!("attribute {} ({} bytes)", name, info.len());

        let annotations = if name == RUNTIME_VISIBLE_ANNOTATIONS {
            Some(Parser::new(info.as_slice()).parse_annotations(constant_pool)?)
        } else {
            None
        };

        Ok(Attribute {
            attribute_name_index,
            info,
            annotations,
        })
    }

    fn parse_attributes(
        &mut self,
        attributes_count: u16,
        constant_pool: &ConstantPool,
    ) -> Result<Attributes> {
        (0..attributes_count)
            .map(|_| self.parse_attribute(constant_pool))
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }

    fn parse_annotations(&mut self, constant_pool: &ConstantPool) -> Result<Vec<Annotation>> {
        let num_annotations = self.read_u16()?;
        (0..num_annotations)
            .map(|_| self.parse_annotation(constant_pool, 0))
            .collect()
    }

    fn parse_annotation(
        &mut self,
        constant_pool: &ConstantPool,
        depth: usize,
    ) -> Result<Annotation> {
        let type_index = self.read_u16()?;
        constant_pool.utf8(type_index)?;

        let num_element_value_pairs = self.read_u16()?;
        let element_value_pairs = (0..num_element_value_pairs)
            .map(|_| self.parse_element_value_pair(constant_pool, depth))
            .collect::<Result<Vec<_>>>()?;

        Ok(Annotation {
            type_index,
            element_value_pairs,
        })
    }

    fn parse_element_value_pair(
        &mut self,
        constant_pool: &ConstantPool,
        depth: usize,
    ) -> Result<ElementValuePair> {
        let element_name_index = self.read_u16()?;
        constant_pool.utf8(element_name_index)?;
        let value = self.parse_element_value(constant_pool, depth + 1)?;

        Ok(ElementValuePair {
            element_name_index,
            value,
        })
    }

    fn parse_element_value(
        &mut self,
        constant_pool: &ConstantPool,
        depth: usize,
    ) -> Result<ElementValue> {
        if depth > MAX_ELEMENT_VALUE_DEPTH {
            return Err(ClassFileError::NestingTooDeep(MAX_ELEMENT_VALUE_DEPTH));
        }
        let tag = self.read_u8()? as char;

        let element_value = match tag {
            ElementValue::ENUM => {
                let type_name_index = self.read_u16()?;
                let const_name_index = self.read_u16()?;
                constant_pool.utf8(type_name_index)?;
                constant_pool.utf8(const_name_index)?;

                ElementValue::Enum {
                    type_name_index,
                    const_name_index,
                }
            }
            ElementValue::CLASS => {
                let class_info_index = self.read_u16()?;
                constant_pool.utf8(class_info_index)?;

                ElementValue::Class { class_info_index }
            }
            ElementValue::ANNOTATION => {
                ElementValue::Annotation(self.parse_annotation(constant_pool, depth)?)
            }
            ElementValue::ARRAY => {
                let num_values = self.read_u16()?;
                let values = (0..num_values)
                    .map(|_| self.parse_element_value(constant_pool, depth + 1))
                    .collect::<Result<Vec<_>>>()?;

                ElementValue::Array(values)
            }
            _ => {
                let kind = ConstKind::try_from(tag)?;
                let const_value_index = self.read_u16()?;
                constant_pool.get(const_value_index)?;

                ElementValue::Const {
                    kind,
                    const_value_index,
                }
            }
        };

        Ok(element_value)
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.r.read_u32()
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.r.read_u16()
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.r.read_u8()
    }
}



#[cfg(test)]
mod parse_element_value_tests {
    use super::*;

    fn pool() -> ConstantPool {
        ConstantPool::new(vec![
            CpInfo::Utf8("Lmy/Color;".into()),
            CpInfo::Utf8("RED".into()),
            CpInfo::Integer(3),
        ])
    }

    #[test]
    fn it_should_parse_a_constant() {
        assert_eq!(
            Parser::new(&[b'I', 0x00, 0x03][..])
                .parse_element_value(&pool(), 1)
                .unwrap(),
            ElementValue::Const {
                kind: ConstKind::Int,
                const_value_index: 3
            }
        );
    }

    #[test]
    fn it_should_parse_an_array_of_enums() {
        let bytes = [b'[', 0x00, 0x02, b'e', 0, 1, 0, 2, b's', 0, 2];
        assert_eq!(
            Parser::new(&bytes[..])
                .parse_element_value(&pool(), 1)
                .unwrap(),
            ElementValue::Array(vec![
                ElementValue::Enum {
                    type_name_index: 1,
                    const_name_index: 2
                },
                ElementValue::Const {
                    kind: ConstKind::String,
                    const_value_index: 2
                }
            ])
        );
    }

    #[test]
    fn it_should_fail_on_an_unknown_tag() {
        assert!(matches!(
            Parser::new(&[b'x', 0x00, 0x03][..]).parse_element_value(&pool(), 1),
            Err(ClassFileError::UnsupportedElementValueTag('x'))
        ));
    }

    #[test]
    fn it_should_fail_on_an_out_of_range_constant() {
        assert!(matches!(
            Parser::new(&[b'Z', 0x00, 0x04][..]).parse_element_value(&pool(), 1),
            Err(ClassFileError::IndexOutOfRange(4))
        ));
    }

    fn nested_arrays(levels: usize) -> Vec<u8> {
        let mut bytes = [b'[', 0x00, 0x01].repeat(levels);
        bytes.extend_from_slice(&[b'I', 0x00, 0x03]);
        bytes
    }

    #[test]
    fn it_should_parse_nested_arrays_up_to_the_limit() {
        let mut value = Parser::new(nested_arrays(MAX_ELEMENT_VALUE_DEPTH - 1).as_slice())
            .parse_element_value(&pool(), 1)
            .unwrap();

        let mut levels = 0;
        while let ElementValue::Array(mut values) = value {
            value = values.remove(0);
            levels += 1;
        }
        assert_eq!(levels, MAX_ELEMENT_VALUE_DEPTH - 1);
    }

    #[test]
    fn it_should_reject_arrays_nested_too_deep() {
        assert!(matches!(
            Parser::new(nested_arrays(200_000).as_slice())
                .parse_element_value(&pool(), 1),
            Err(ClassFileError::NestingTooDeep(MAX_ELEMENT_VALUE_DEPTH))
        ));
    }

    #[test]
    fn it_should_reject_annotations_nested_too_deep() {
        let mut bytes = Vec::new();
        for _ in 0..=MAX_ELEMENT_VALUE_DEPTH {
            bytes.extend_from_slice(&[b'@', 0x00, 0x01, 0x00, 0x01, 0x00, 0x02]);
        }
        bytes.extend_from_slice(&[b'I', 0x00, 0x03]);

        assert!(matches!(
            Parser::new(bytes.as_slice()).parse_element_value(&pool(), 1),
            Err(ClassFileError::NestingTooDeep(MAX_ELEMENT_VALUE_DEPTH))
        ));
    }

    #[test]
    fn it_should_fail_if_the_value_is_cut_short() {
        assert!(matches!(
            Parser::new(&[b'@', 0x00, 0x01, 0x00][..]).parse_element_value(&pool(), 1),
            Err(ClassFileError::TruncatedInput)
        ));
    }
}

use std::fmt;

use crate::{annotation::Annotation, ConstantPool};

pub const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";

#[derive(PartialEq, Clone)]
pub struct Attribute {
    pub attribute_name_index: u16,
    /// The payload exactly as read, whether or not it was understood.
    pub info: Vec<u8>,
    /// Set only for `RuntimeVisibleAnnotations`.
    pub annotations: Option<Vec<Annotation>>,
}
impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("attribute_name_index", &self.attribute_name_index)
            .field("info", &format!("({} bytes)", self.info.len()))
            .field("annotations", &self.annotations)
            .finish()
    }
}

#[derive(Debug, Default, PartialEq, Clone)]
pub struct Attributes(pub Vec<Attribute>);
impl Attributes {
    pub fn find_by_name(&self, name: &str, constant_pool: &ConstantPool) -> Option<&Attribute> {
        self.0
            .iter()
            .find(|a| constant_pool.utf8(a.attribute_name_index).ok() == Some(name))
    }

    /// Annotations of every `RuntimeVisibleAnnotations` attribute, in order.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.0
            .iter()
            .filter_map(|a| a.annotations.as_ref())
            .flatten()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

use crate::ClassFileError;

#[derive(Debug, PartialEq, Clone)]
pub struct Annotation {
    /// Field descriptor of the annotation interface, e.g. `Ljava/lang/Deprecated;`.
    pub type_index: u16,
    pub element_value_pairs: Vec<ElementValuePair>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ElementValuePair {
    pub element_name_index: u16,
    pub value: ElementValue,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ElementValue {
    Const {
        kind: ConstKind,
        const_value_index: u16,
    },
    Enum {
        type_name_index: u16,
        const_name_index: u16,
    },
    Class {
        class_info_index: u16,
    },
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}

/// Element values whose payload is a single constant pool index.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConstKind {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    String,
}

impl ConstKind {
    pub fn tag(self) -> char {
        match self {
            ConstKind::Byte => 'B',
            ConstKind::Char => 'C',
            ConstKind::Double => 'D',
            ConstKind::Float => 'F',
            ConstKind::Int => 'I',
            ConstKind::Long => 'J',
            ConstKind::Short => 'S',
            ConstKind::Boolean => 'Z',
            ConstKind::String => 's',
        }
    }
}

impl TryFrom<char> for ConstKind {
    type Error = ClassFileError;

    fn try_from(tag: char) -> Result<Self, Self::Error> {
        match tag {
            'B' => Ok(ConstKind::Byte),
            'C' => Ok(ConstKind::Char),
            'D' => Ok(ConstKind::Double),
            'F' => Ok(ConstKind::Float),
            'I' => Ok(ConstKind::Int),
            'J' => Ok(ConstKind::Long),
            'S' => Ok(ConstKind::Short),
            'Z' => Ok(ConstKind::Boolean),
            's' => Ok(ConstKind::String),
            _ => Err(ClassFileError::UnsupportedElementValueTag(tag)),
        }
    }
}

impl ElementValue {
    pub const ENUM: char = 'e';
    pub const CLASS: char = 'c';
    pub const ANNOTATION: char = '@';
    pub const ARRAY: char = '[';

    pub fn tag(&self) -> char {
        match self {
            ElementValue::Const { kind, .. } => kind.tag(),
            ElementValue::Enum { .. } => Self::ENUM,
            ElementValue::Class { .. } => Self::CLASS,
            ElementValue::Annotation(_) => Self::ANNOTATION,
            ElementValue::Array(_) => Self::ARRAY,
        }
    }
}

use std::{borrow::Cow, fmt};

use crate::{
    annotation::{Annotation, ConstKind, ElementValue},
    class_file::{FieldInfo, MethodInfo},
    constant_pool::CpInfo,
    descriptor::{FieldType, MethodDescriptor},
    ClassAccessFlags, ClassFile, ConstantPool,
};

/// Renders a class file as a Java-like declaration.
pub fn render(class_file: &ClassFile) -> String {
    class_file.to_string()
}

/// One line per usable constant pool entry, `#index = entry`.
pub fn constant_pool(constant_pool: &ConstantPool) -> String {
    constant_pool
        .iter()
        .map(|(index, cp_info)| format!("#{} = {}\n", index, cp_info))
        .collect()
}

impl fmt::Display for ClassFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cp = &self.constant_pool;

        writeln!(f, "// version: {}.{}", self.major_version, self.minor_version)?;
        writeln!(f, "// constant pool count: {}", cp.count())?;
        writeln!(f, "// field count: {}", self.fields.len())?;
        writeln!(f, "// method count: {}", self.methods.len())?;

        for annotation in self.annotations() {
            writeln!(f, "{}", DisplayAnnotation(cp, annotation))?;
        }

        write!(
            f,
            "{} {}",
            self.access_flags.modifiers(),
            class_name(cp, self.this_class)
        )?;

        let interfaces = self
            .interfaces
            .iter()
            .map(|&i| class_name(cp, i))
            .collect::<Vec<_>>();

        if self.access_flags.contains(ClassAccessFlags::INTERFACE) {
            write_names(f, "extends ", &interfaces)?;
        } else {
            if self.super_class != 0 {
                write!(f, "\n\t\textends {}", class_name(cp, self.super_class))?;
            }
            write_names(f, "implements ", &interfaces)?;
        }

        f.write_str(" {")?;

        if !self.fields.is_empty() {
            f.write_str("\n\t//---------- Fields ----------")?;
        }
        for field in &self.fields {
            write_field(f, cp, field)?;
        }

        if !self.methods.is_empty() {
            if !self.fields.is_empty() {
                f.write_str("\n")?;
            }
            f.write_str("\n\t//---------- Methods ----------")?;
        }
        for method in &self.methods {
            write_method(f, cp, method)?;
        }

        f.write_str("\n}")
    }
}

fn write_names(f: &mut fmt::Formatter<'_>, keyword: &str, names: &[Cow<str>]) -> fmt::Result {
    for (i, name) in names.iter().enumerate() {
        if i == 0 {
            write!(f, "\n\t\t{}{}", keyword, name)?;
        } else {
            write!(f, ",\n\t\t{:width$}{}", "", name, width = keyword.len())?;
        }
    }
    Ok(())
}

fn write_field(f: &mut fmt::Formatter<'_>, cp: &ConstantPool, field: &FieldInfo) -> fmt::Result {
    for annotation in field.attributes.annotations() {
        write!(f, "\n\t{}", DisplayAnnotation(cp, annotation))?;
    }

    let descriptor = utf8(cp, field.descriptor_index);
    let field_type = FieldType::parse(&descriptor)
        .map(|t| Cow::Owned(t.to_string()))
        .unwrap_or(descriptor);

    write!(
        f,
        "\n\t{} {} {};",
        field.access_flags.modifiers(),
        field_type,
        utf8(cp, field.name_index)
    )
}

fn write_method(f: &mut fmt::Formatter<'_>, cp: &ConstantPool, method: &MethodInfo) -> fmt::Result {
    for annotation in method.attributes.annotations() {
        write!(f, "\n\t{}", DisplayAnnotation(cp, annotation))?;
    }

    let name = utf8(cp, method.name_index);
    let descriptor = utf8(cp, method.descriptor_index);
    write!(f, "\n\t{} ", method.access_flags.modifiers())?;

    let Some(MethodDescriptor {
        parameters,
        return_type,
    }) = MethodDescriptor::parse(&descriptor)
    else {
        return write!(f, "{} {};", name, descriptor);
    };

    // Constructors and static initializers have no return type in source.
    if !name.starts_with('<') {
        match return_type {
            Some(t) => write!(f, "{} ", t)?,
            None => f.write_str("void ")?,
        }
    }

    let parameters = parameters
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    write!(f, "{}({});", name, parameters.join(", "))
}

struct DisplayAnnotation<'a>(&'a ConstantPool, &'a Annotation);
impl fmt::Display for DisplayAnnotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let DisplayAnnotation(cp, annotation) = *self;

        write!(f, "@{}", type_name(cp, annotation.type_index))?;
        if annotation.element_value_pairs.is_empty() {
            return Ok(());
        }

        f.write_str("(")?;
        for (i, pair) in annotation.element_value_pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}={}",
                utf8(cp, pair.element_name_index),
                DisplayElementValue(cp, &pair.value)
            )?;
        }
        f.write_str(")")
    }
}

struct DisplayElementValue<'a>(&'a ConstantPool, &'a ElementValue);
impl fmt::Display for DisplayElementValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let DisplayElementValue(cp, element_value) = *self;

        match element_value {
            ElementValue::Const {
                kind,
                const_value_index,
            } => write_const(f, cp, *kind, *const_value_index),
            ElementValue::Enum {
                type_name_index,
                const_name_index,
            } => write!(
                f,
                "{}.{}",
                type_name(cp, *type_name_index),
                utf8(cp, *const_name_index)
            ),
            ElementValue::Class { class_info_index } => {
                let descriptor = utf8(cp, *class_info_index);
                match FieldType::parse_return(&descriptor) {
                    Some(Some(t)) => write!(f, "{}.class", t),
                    Some(None) => f.write_str("void.class"),
                    None => write!(f, "{}.class", descriptor),
                }
            }
            ElementValue::Annotation(annotation) => {
                write!(f, "{}", DisplayAnnotation(cp, annotation))
            }
            ElementValue::Array(values) => {
                f.write_str("{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", DisplayElementValue(cp, value))?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_const(
    f: &mut fmt::Formatter<'_>,
    cp: &ConstantPool,
    kind: ConstKind,
    index: u16,
) -> fmt::Result {
    match (kind, cp.get(index)) {
        (ConstKind::Boolean, Ok(CpInfo::Integer(v))) => write!(f, "{}", *v != 0),
        (ConstKind::Char, Ok(CpInfo::Integer(v))) => {
            match char::from_u32(*v as u32) {
                Some(c) => write!(f, "{:?}", c),
                None => write!(f, "{}", v),
            }
        }
        (ConstKind::Byte | ConstKind::Short | ConstKind::Int, Ok(CpInfo::Integer(v))) => {
            write!(f, "{}", v)
        }
        (ConstKind::Long, Ok(CpInfo::Long(v))) => write!(f, "{}L", v),
        (ConstKind::Float, Ok(CpInfo::Float(bits))) => {
            write!(f, "{}f", f32::from_bits(*bits))
        }
        (ConstKind::Double, Ok(CpInfo::Double(bits))) => {
            write!(f, "{}", f64::from_bits(*bits))
        }
        (ConstKind::String, Ok(CpInfo::Utf8(s))) => write!(f, "{:?}", s),
        _ => write!(f, "#{}", index),
    }
}

fn utf8(cp: &ConstantPool, index: u16) -> Cow<'_, str> {
    cp.utf8(index)
        .map(Cow::Borrowed)
        .unwrap_or_else(|_| Cow::Owned(format!("#{}", index)))
}

fn class_name(cp: &ConstantPool, index: u16) -> Cow<'_, str> {
    cp.class_name(index)
        .map(Cow::Borrowed)
        .unwrap_or_else(|_| Cow::Owned(format!("#{}", index)))
}

/// A field descriptor in source form, or as written if it does not parse.
fn type_name(cp: &ConstantPool, index: u16) -> Cow<'_, str> {
    let descriptor = utf8(cp, index);
    match FieldType::parse(&descriptor) {
        Some(t) => Cow::Owned(t.to_string()),
        None => descriptor,
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::{
        annotation::ElementValuePair,
        attributes::{Attribute, Attributes},
        constant_pool::ClassInfo,
        FieldAccessFlags, MethodAccessFlags,
    };

    fn pool() -> ConstantPool {
        ConstantPool::new(vec![
            CpInfo::Class(ClassInfo { name_index: 2 }),          // 1
            CpInfo::Utf8("my/Widget".into()),                    // 2
            CpInfo::Class(ClassInfo { name_index: 4 }),          // 3
            CpInfo::Utf8("java/lang/Object".into()),             // 4
            CpInfo::Class(ClassInfo { name_index: 6 }),          // 5
            CpInfo::Utf8("java/lang/Runnable".into()),           // 6
            CpInfo::Class(ClassInfo { name_index: 8 }),          // 7
            CpInfo::Utf8("java/io/Serializable".into()),         // 8
            CpInfo::Utf8("count".into()),                        // 9
            CpInfo::Utf8("[J".into()),                           // 10
            CpInfo::Utf8("run".into()),                          // 11
            CpInfo::Utf8("(ILjava/lang/String;)Z".into()),       // 12
            CpInfo::Utf8("<init>".into()),                       // 13
            CpInfo::Utf8("()V".into()),                          // 14
            CpInfo::Utf8("RuntimeVisibleAnnotations".into()),    // 15
            CpInfo::Utf8("Ljava/lang/Deprecated;".into()),       // 16
            CpInfo::Utf8("since".into()),                        // 17
            CpInfo::Utf8("9".into()),                            // 18
            CpInfo::Integer(1),                                  // 19
            CpInfo::Utf8("forRemoval".into()),                   // 20
        ])
    }

    fn deprecated() -> Attribute {
        Attribute {
            attribute_name_index: 15,
            info: vec![],
            annotations: Some(vec![Annotation {
                type_index: 16,
                element_value_pairs: vec![
                    ElementValuePair {
                        element_name_index: 17,
                        value: ElementValue::Const {
                            kind: ConstKind::String,
                            const_value_index: 18,
                        },
                    },
                    ElementValuePair {
                        element_name_index: 20,
                        value: ElementValue::Const {
                            kind: ConstKind::Boolean,
                            const_value_index: 19,
                        },
                    },
                ],
            }]),
        }
    }

    fn class_file(access_flags: ClassAccessFlags) -> ClassFile {
        ClassFile {
            magic: 0xCAFEBABE,
            minor_version: 0,
            major_version: 52,
            constant_pool: pool(),
            access_flags,
            this_class: 1,
            super_class: 3,
            interfaces: vec![5, 7],
            fields: vec![FieldInfo {
                access_flags: FieldAccessFlags::PRIVATE | FieldAccessFlags::STATIC,
                name_index: 9,
                descriptor_index: 10,
                attributes: Attributes(vec![deprecated()]),
            }],
            methods: vec![
                MethodInfo {
                    access_flags: MethodAccessFlags::PUBLIC,
                    name_index: 13,
                    descriptor_index: 14,
                    attributes: Attributes::default(),
                },
                MethodInfo {
                    access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::SYNCHRONIZED,
                    name_index: 11,
                    descriptor_index: 12,
                    attributes: Attributes::default(),
                },
            ],
            attributes: Attributes::default(),
        }
    }

    #[test]
    fn it_should_render_a_class() {
        let rendered = render(&class_file(ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER));

        assert_eq!(
            rendered,
            "// version: 52.0\n\
             // constant pool count: 21\n\
             // field count: 1\n\
             // method count: 2\n\
             public class my/Widget\n\
             \t\textends java/lang/Object\n\
             \t\timplements java/lang/Runnable,\n\
             \t\t           java/io/Serializable {\n\
             \t//---------- Fields ----------\n\
             \t@java.lang.Deprecated(since=\"9\", forRemoval=true)\n\
             \tprivate static long[] count;\n\
             \n\
             \t//---------- Methods ----------\n\
             \tpublic <init>();\n\
             \tpublic synchronized boolean run(int, java.lang.String);\n\
             }"
        );
    }

    #[test]
    fn it_should_list_super_interfaces_after_extends_for_an_interface() {
        let mut class_file = class_file(ClassAccessFlags::from_bits_truncate(0x0601));
        class_file.fields.clear();
        class_file.methods.clear();

        assert_eq!(
            render(&class_file),
            "// version: 52.0\n\
             // constant pool count: 21\n\
             // field count: 0\n\
             // method count: 0\n\
             public interface my/Widget\n\
             \t\textends java/lang/Runnable,\n\
             \t\t        java/io/Serializable {\n\
             }"
        );
    }

    #[test]
    fn it_should_render_unresolvable_indices_as_numbers() {
        let mut class_file = class_file(ClassAccessFlags::PUBLIC);
        class_file.this_class = 40;
        class_file.methods[1].descriptor_index = 19;

        let rendered = render(&class_file);
        assert!(rendered.contains("public class #40"));
        assert!(rendered.contains("public synchronized run #19;"));
    }

    #[test]
    fn it_should_render_nested_element_values() {
        let cp = pool();
        let value = ElementValue::Array(vec![
            ElementValue::Class {
                class_info_index: 16,
            },
            ElementValue::Enum {
                type_name_index: 16,
                const_name_index: 17,
            },
            ElementValue::Annotation(Annotation {
                type_index: 16,
                element_value_pairs: vec![],
            }),
        ]);

        assert_eq!(
            DisplayElementValue(&cp, &value).to_string(),
            "{java.lang.Deprecated.class, java.lang.Deprecated.since, @java.lang.Deprecated}"
        );
    }

    #[test]
    fn it_should_dump_the_constant_pool() {
        let dump = constant_pool(&pool());
        assert!(dump.starts_with("#1 = Class #2\n#2 = Utf8 \"my/Widget\"\n"));
        assert!(dump.ends_with("#20 = Utf8 \"forRemoval\"\n"));
    }
}

// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html#jvms-4.3

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::take_until,
    character::complete::char,
    combinator::{eof, map, value},
    multi::many0,
    sequence::delimited,
    IResult,
};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum FieldType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Object(String),
    Short,
    Boolean,
    Array(Box<FieldType>),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MethodDescriptor {
    pub parameters: Vec<FieldType>,
    /// `None` for `void`.
    pub return_type: Option<FieldType>,
}

impl FieldType {
    pub fn parse(descriptor: &str) -> Option<FieldType> {
        parse_field_descriptor(descriptor).ok().map(|(_, t)| t)
    }

    /// Parses a field type or `V`, as found in a `class_info_index`.
    pub fn parse_return(descriptor: &str) -> Option<Option<FieldType>> {
        let (input, return_type) = parse_return_type(descriptor).ok()?;
        eof::<_, nom::error::Error<&str>>(input).ok()?;
        Some(return_type)
    }
}

impl MethodDescriptor {
    pub fn parse(descriptor: &str) -> Option<MethodDescriptor> {
        parse_method_descriptor(descriptor).ok().map(|(_, d)| d)
    }
}

/// Java source spelling, e.g. `java.lang.String[]`.
impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Byte => f.write_str("byte"),
            FieldType::Char => f.write_str("char"),
            FieldType::Double => f.write_str("double"),
            FieldType::Float => f.write_str("float"),
            FieldType::Int => f.write_str("int"),
            FieldType::Long => f.write_str("long"),
            FieldType::Short => f.write_str("short"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Object(class_name) => f.write_str(&class_name.replace('/', ".")),
            FieldType::Array(component) => write!(f, "{}[]", component),
        }
    }
}

fn parse_field_descriptor(input: &str) -> IResult<&str, FieldType> {
    let (input, field_type) = parse_field_type(input)?;
    let (input, _) = eof(input)?;
    Ok((input, field_type))
}

fn parse_method_descriptor(input: &str) -> IResult<&str, MethodDescriptor> {
    let (input, parameters) = delimited(char('('), many0(parse_field_type), char(')'))(input)?;
    let (input, return_type) = parse_return_type(input)?;
    let (input, _) = eof(input)?;

    Ok((
        input,
        MethodDescriptor {
            parameters,
            return_type,
        },
    ))
}

fn parse_return_type(input: &str) -> IResult<&str, Option<FieldType>> {
    alt((map(parse_field_type, Some), value(None, char('V'))))(input)
}

fn parse_field_type(input: &str) -> IResult<&str, FieldType> {
    alt((parse_base_type, parse_object_type, parse_array_type))(input)
}

fn parse_base_type(input: &str) -> IResult<&str, FieldType> {
    alt((
        value(FieldType::Byte, char('B')),
        value(FieldType::Char, char('C')),
        value(FieldType::Double, char('D')),
        value(FieldType::Float, char('F')),
        value(FieldType::Int, char('I')),
        value(FieldType::Long, char('J')),
        value(FieldType::Short, char('S')),
        value(FieldType::Boolean, char('Z')),
    ))(input)
}

fn parse_object_type(input: &str) -> IResult<&str, FieldType> {
    let (input, class_name) = delimited(char('L'), take_until(";"), char(';'))(input)?;

    Ok((input, FieldType::Object(class_name.to_string())))
}

fn parse_array_type(input: &str) -> IResult<&str, FieldType> {
    let (input, _) = char('[')(input)?;
    let (input, component) = parse_field_type(input)?;

    Ok((input, FieldType::Array(Box::new(component))))
}

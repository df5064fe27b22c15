//! XML resource bundle documents.
//!
//! ```xml
//! <resourceBundle locale="en_US" exceptionClassName="com.acme.AcmeException">
//!   <message name="HappyBirthday">
//!     <!-- Greets someone. -->
//!     <text>Happy Birthday, {0}! You don''t look {1,number}.</text>
//!   </message>
//!   <exception name="TooYoung">
//!     <text>{0} has not been born yet.</text>
//!   </exception>
//! </resourceBundle>
//! ```

use std::{collections::HashMap, io::BufRead};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    error::Error,
    locale::Locale,
    traits::BundleLoader,
    types::{ExceptionDef, FactoryHint, Property, Resource, ResourceBundle, ResourceKind},
};

/// Loads bundles from the `<resourceBundle>` XML schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlLoader;

impl BundleLoader for XmlLoader {
    fn load<R: BufRead>(reader: R) -> Result<ResourceBundle, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        let mut buf = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.name().as_ref() == b"resourceBundle" => {
                    let attrs = Attributes::of(e)?;
                    let mut bundle = new_bundle(attrs)?;
                    parse_bundle_children(&mut bundle, &mut xml_reader)?;
                    return Ok(bundle);
                }
                Event::Empty(ref e) if e.name().as_ref() == b"resourceBundle" => {
                    return new_bundle(Attributes::of(e)?);
                }
                Event::Start(ref e) | Event::Empty(ref e) => {
                    return Err(Error::invalid_bundle(format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                Event::Eof => {
                    return Err(Error::invalid_bundle(
                        "missing <resourceBundle> root element",
                    ));
                }
                _ => {}
            }
            buf.clear();
        }
    }
}

/// Owned attribute values of one element.
struct Attributes(HashMap<String, String>);

impl Attributes {
    fn of(e: &BytesStart) -> Result<Self, Error> {
        let mut values = HashMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            values.insert(key, attr.unescape_value()?.into_owned());
        }
        Ok(Attributes(values))
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    fn require(&mut self, name: &str, element: &str) -> Result<String, Error> {
        self.take(name).ok_or_else(|| {
            Error::invalid_bundle(format!("<{}> tag missing '{}'", element, name))
        })
    }
}

fn new_bundle(mut attrs: Attributes) -> Result<ResourceBundle, Error> {
    let locale = attrs
        .take("locale")
        .ok_or_else(|| Error::MissingLocale("document".to_string()))?;
    let mut bundle = ResourceBundle::new(Locale::parse(&locale)?);
    bundle.metadata.exception_class_name = attrs.take("exceptionClassName");
    bundle.metadata.cpp_namespace = attrs.take("cppNamespace");
    bundle.metadata.cpp_common_include = attrs.take("cppCommonInclude");
    bundle.metadata.cpp_exception_class_name = attrs.take("cppExceptionClassName");
    bundle.metadata.cpp_exception_class_location = attrs.take("cppExceptionClassLocation");
    Ok(bundle)
}

fn parse_bundle_children<R: BufRead>(
    bundle: &mut ResourceBundle,
    xml_reader: &mut Reader<R>,
) -> Result<(), Error> {
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"code" => bundle.metadata.code = Some(read_text(xml_reader, b"code")?),
                b"factory" => {
                    bundle.factories.push(parse_factory(Attributes::of(e)?)?);
                    skip_element(xml_reader, b"factory")?;
                }
                b"message" => {
                    let resource = parse_resource(Attributes::of(e)?, false, xml_reader)?;
                    bundle.add_resource(resource)?;
                }
                b"exception" => {
                    let resource = parse_resource(Attributes::of(e)?, true, xml_reader)?;
                    bundle.add_resource(resource)?;
                }
                other => {
                    let other = other.to_vec();
                    skip_element(xml_reader, &other)?;
                }
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"factory" => bundle.factories.push(parse_factory(Attributes::of(e)?)?),
                b"message" => {
                    let resource = resource_shell(Attributes::of(e)?, false)?;
                    bundle.add_resource(resource)?;
                }
                b"exception" => {
                    let resource = resource_shell(Attributes::of(e)?, true)?;
                    bundle.add_resource(resource)?;
                }
                _ => {}
            },
            Event::End(ref e) if e.name().as_ref() == b"resourceBundle" => return Ok(()),
            Event::Eof => return Err(Error::invalid_bundle("unexpected EOF in <resourceBundle>")),
            _ => {}
        }
        buf.clear();
    }
}

fn parse_factory(mut attrs: Attributes) -> Result<FactoryHint, Error> {
    Ok(FactoryHint {
        class_name: attrs.require("className", "factory")?,
        signature: attrs.require("signature", "factory")?,
    })
}

fn resource_shell(mut attrs: Attributes, is_exception: bool) -> Result<Resource, Error> {
    let element = if is_exception { "exception" } else { "message" };
    let name = attrs.require("name", element)?;
    let kind = if is_exception {
        let flag = |value: String| value.eq_ignore_ascii_case("true");
        ResourceKind::Exception(ExceptionDef {
            class_name: attrs.take("className"),
            cpp_class_name: attrs.take("cppClassName"),
            cpp_class_location: attrs.take("cppClassLocation"),
            chain_exceptions: attrs.take("chainExceptions").map(flag),
            cpp_chain_exceptions: attrs.take("cppChainExceptions").map(flag),
        })
    } else {
        ResourceKind::Message
    };
    Ok(Resource {
        name,
        text: None,
        properties: Vec::new(),
        comment: None,
        kind,
    })
}

fn parse_resource<R: BufRead>(
    attrs: Attributes,
    is_exception: bool,
    xml_reader: &mut Reader<R>,
) -> Result<Resource, Error> {
    let mut resource = resource_shell(attrs, is_exception)?;
    let end = if is_exception { &b"exception"[..] } else { &b"message"[..] };

    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"text" => resource.text = Some(read_text(xml_reader, b"text")?),
                b"property" => {
                    let name = Attributes::of(e)?.require("name", "property")?;
                    let value = read_text(xml_reader, b"property")?;
                    resource.properties.push(Property { name, value });
                }
                other => {
                    let other = other.to_vec();
                    skip_element(xml_reader, &other)?;
                }
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"text" => resource.text = Some(String::new()),
                b"property" => {
                    let name = Attributes::of(e)?.require("name", "property")?;
                    resource.properties.push(Property {
                        name,
                        value: String::new(),
                    });
                }
                _ => {}
            },
            Event::Comment(ref e) => {
                if resource.comment.is_none() {
                    resource.comment = Some(String::from_utf8_lossy(e).trim().to_string());
                }
            }
            Event::End(ref e) if e.name().as_ref() == end => return Ok(resource),
            Event::Eof => {
                return Err(Error::invalid_bundle(format!(
                    "unexpected EOF in resource '{}'",
                    resource.name
                )));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Reads the character content of the current element up to its end tag.
/// Text and CDATA sections are concatenated verbatim.
fn read_text<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(ref e) => text.push_str(&e.unescape()?),
            Event::CData(ref e) => text.push_str(&String::from_utf8_lossy(e)),
            Event::Start(_) => depth += 1,
            Event::End(ref e) if depth == 0 && e.name().as_ref() == end => return Ok(text),
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => {
                return Err(Error::invalid_bundle(format!(
                    "unexpected EOF in <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn skip_element<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<(), Error> {
    let mut buf = Vec::new();
    xml_reader.read_to_end_into(quick_xml::name::QName(end), &mut buf)?;
    Ok(())
}

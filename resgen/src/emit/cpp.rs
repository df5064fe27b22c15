//! C++ resource classes: a header and an implementation file per bundle.

use crate::{
    emit::common::{
        HeaderContext, SourceBuilder, comment_block, do_not_modify_banner, generated_by_block,
        quote_for_cpp,
    },
    error::Error,
    naming::resource_initcap,
    placeholder::TypeNames,
    types::{Resource, ResourceBundle},
};

/// Base class used when none is configured.
pub const DEFAULT_BASE_CLASS: &str = "ResourceBundle";

/// Checks that every resource can be rendered as C++.
///
/// Must pass before any C++ output is written. `source` names the bundle in
/// error messages.
pub fn validate(bundle: &ResourceBundle, source: &str) -> Result<(), Error> {
    let default_location = bundle.metadata.cpp_exception_class_location.as_deref();
    if bundle.metadata.cpp_exception_class_name.is_some() && default_location.is_none() {
        return Err(Error::MissingExceptionLocation {
            resource: None,
            path: source.to_string(),
        });
    }

    for resource in &bundle.resources {
        resource.require_text()?;
        let Some(exception) = resource.as_exception() else {
            continue;
        };
        if exception.cpp_class_name.is_some()
            && exception.cpp_class_location.is_none()
            && default_location.is_none()
        {
            return Err(Error::MissingExceptionLocation {
                resource: Some(resource.name.clone()),
                path: source.to_string(),
            });
        }
        if bundle.cpp_exception_class(exception).is_none() {
            return Err(Error::MissingExceptionClass {
                resource: resource.name.clone(),
                path: source.to_string(),
            });
        }
    }
    Ok(())
}

/// The C++ class generated for a bundle.
#[derive(Debug, Clone, Copy)]
pub struct CppClass<'a> {
    pub bundle: &'a ResourceBundle,
    /// Unqualified class name, also the stem of the generated files.
    pub class_name: &'a str,
    pub base_class: &'a str,
}

/// Per-resource pieces shared by the header and the implementation.
struct CppMember<'a> {
    resource: &'a Resource,
    text: &'a str,
    initcap: String,
    parameter_list: String,
    argument_list: String,
    /// Exception class and whether a `prev`-chaining overload is wanted.
    exception: Option<(&'a str, bool)>,
}

impl<'a> CppClass<'a> {
    pub fn header_file_name(&self) -> String {
        format!("{}.h", self.class_name)
    }

    pub fn implementation_file_name(&self) -> String {
        format!("{}.cpp", self.class_name)
    }

    fn include_guard(&self) -> String {
        let guard = format!("{}_Included", self.class_name);
        match self.bundle.metadata.cpp_namespace.as_deref() {
            Some(namespace) => {
                let mut chars = namespace.chars();
                let capitalized: String = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                };
                format!("{}_{}", capitalized, guard)
            }
            None => guard,
        }
    }

    fn members(&self) -> Result<Vec<CppMember<'a>>, Error> {
        self.bundle
            .resources
            .iter()
            .map(|resource| {
                let text = resource.require_text()?;
                let signature = resource.signature()?;
                let exception = match resource.as_exception() {
                    Some(exception) => {
                        let class = self.bundle.cpp_exception_class(exception).ok_or_else(|| {
                            Error::MissingExceptionClass {
                                resource: resource.name.clone(),
                                path: self.class_name.to_string(),
                            }
                        })?;
                        Some((class, exception.cpp_chain_exceptions == Some(true)))
                    }
                    None => None,
                };
                Ok(CppMember {
                    resource,
                    text,
                    initcap: resource_initcap(&resource.name),
                    parameter_list: signature.parameter_list(&TypeNames::CPP),
                    argument_list: signature.argument_list(),
                    exception,
                })
            })
            .collect()
    }

    fn chain_parameters(parameter_list: &str, class: &str) -> String {
        if parameter_list.is_empty() {
            format!("const {} * const prev", class)
        } else {
            format!("{}, const {} * const prev", parameter_list, class)
        }
    }

    pub fn render_header(&self, header: &HeaderContext) -> Result<String, Error> {
        let members = self.members()?;
        let name = self.class_name;
        let cache = format!("{}BundleCache", name);
        let guard = self.include_guard();
        let metadata = &self.bundle.metadata;

        let mut out = SourceBuilder::new();
        do_not_modify_banner(&mut out, header.style);
        generated_by_block(&mut out, header);

        out.push_line(&format!("#ifndef {}", guard));
        out.push_line(&format!("#define {}", guard));
        out.blank();
        out.push_line("#include <ctime>");
        out.push_line("#include <string>");
        out.blank();
        out.push_line("#include \"Locale.h\"");
        out.push_line("#include \"ResourceDefinition.h\"");
        out.push_line("#include \"ResourceBundle.h\"");
        out.blank();
        out.push_line(&format!(
            "// begin includes specified by {}",
            header.source_display
        ));
        if let Some(location) = &metadata.cpp_exception_class_location {
            out.push_line(&format!("#include \"{}\"", location));
        }
        for member in &members {
            if let Some(location) = member
                .resource
                .as_exception()
                .and_then(|e| e.cpp_class_location.as_deref())
            {
                out.push_line(&format!("#include \"{}\"", location));
            }
        }
        out.push_line(&format!(
            "// end includes specified by {}",
            header.source_display
        ));
        out.blank();
        if let Some(namespace) = &metadata.cpp_namespace {
            out.push_line(&format!("namespace {} {{", namespace));
            out.blank();
        }
        out.blank();

        out.push_line(&format!("class {};", name));
        out.push_line(&format!("typedef map<Locale, {}*> {};", name, cache));
        out.blank();
        out.push_line(&format!("class {} : {}", name, self.base_class));
        out.push_line("{");
        out.indent();
        out.push_line("protected:");
        out.push_line(&format!("explicit {}(Locale locale);", name));
        out.blank();
        out.push_line("public:");
        out.push_line(&format!("virtual ~{}() {{ }}", name));
        out.blank();
        out.push_line(&format!("static const {} &instance();", name));
        out.push_line(&format!(
            "static const {} &instance(const Locale &locale);",
            name
        ));
        out.blank();
        out.push_line("static void setResourceFileLocation(const std::string &location);");
        out.blank();

        for member in &members {
            comment_block(
                &mut out,
                &member.resource.name,
                member.text,
                member.resource.comment.as_deref(),
            );
            out.push_line(&format!(
                "std::string {}({}) const;",
                member.resource.name, member.parameter_list
            ));
            if let Some((class, chain)) = member.exception {
                out.push_line(&format!(
                    "{}* new{}({}) const;",
                    class, member.initcap, member.parameter_list
                ));
                if chain {
                    out.push_line(&format!(
                        "{}* new{}({}) const;",
                        class,
                        member.initcap,
                        Self::chain_parameters(&member.parameter_list, class)
                    ));
                }
            }
            out.blank();
        }

        out.push_line("private:");
        for member in &members {
            out.push_line(&format!("ResourceDefinition _{};", member.resource.name));
        }
        out.blank();
        out.push_line("template<class _GRB, class _BC, class _BC_ITER>");
        out.push_line("    friend _GRB *makeInstance(_BC &bundleCache, const Locale &locale);");
        out.dedent();
        out.push_line("};");

        if let Some(namespace) = &metadata.cpp_namespace {
            out.blank();
            out.push_line(&format!("}} // end namespace {}", namespace));
        }
        out.blank();
        out.push_line(&format!("#endif // {}", guard));
        Ok(out.build())
    }

    pub fn render_implementation(&self, header: &HeaderContext) -> Result<String, Error> {
        let members = self.members()?;
        let name = self.class_name;
        let cache = format!("{}BundleCache", name);
        let metadata = &self.bundle.metadata;

        let mut out = SourceBuilder::new();
        do_not_modify_banner(&mut out, header.style);
        generated_by_block(&mut out, header);

        if let Some(common) = &metadata.cpp_common_include {
            out.push_line(&format!(
                "// begin common include specified by {}",
                header.source_display
            ));
            out.push_line(&format!("#include \"{}\"", common));
            out.push_line(&format!(
                "// end common include specified by {}",
                header.source_display
            ));
        }
        out.push_line(&format!("#include \"{}\"", self.header_file_name()));
        out.push_line("#include \"ResourceBundle.h\"");
        out.push_line("#include \"Locale.h\"");
        out.blank();
        out.push_line("#include <map>");
        out.push_line("#include <string>");
        out.blank();
        if let Some(namespace) = &metadata.cpp_namespace {
            out.push_line(&format!("namespace {} {{", namespace));
            out.blank();
        }
        out.push_line("using namespace std;");
        out.blank();
        out.push_line(&format!("#define BASENAME ({})", quote_for_cpp(name)));
        out.blank();
        out.push_line(&format!("static {} bundleCache;", cache));
        out.push_line("static string bundleLocation(\"\");");
        out.blank();

        out.push_line(&format!("const {0} &{0}::instance()", name));
        out.push_line("{");
        out.push_line(&format!("    return {}::instance(Locale::getDefault());", name));
        out.push_line("}");
        out.blank();
        out.push_line(&format!(
            "const {0} &{0}::instance(const Locale &locale)",
            name
        ));
        out.push_line("{");
        out.push_line(&format!(
            "    return *makeInstance<{}, {}, {}::iterator>(bundleCache, locale);",
            name, cache, cache
        ));
        out.push_line("}");
        out.blank();
        out.push_line(&format!(
            "void {}::setResourceFileLocation(const string &location)",
            name
        ));
        out.push_line("{");
        out.push_line("    bundleLocation = location;");
        out.push_line("}");
        out.blank();

        out.push_line(&format!("{0}::{0}(Locale locale)", name));
        let base_init = format!(
            "    : {}(BASENAME, locale, bundleLocation)",
            self.base_class
        );
        if members.is_empty() {
            out.push_line(&base_init);
        } else {
            out.push_line(&format!("{},", base_init));
        }
        for (i, member) in members.iter().enumerate() {
            let separator = if i + 1 < members.len() { "," } else { "" };
            out.push_line(&format!(
                "      _{}(this, {}){}",
                member.resource.name,
                quote_for_cpp(&member.resource.name),
                separator
            ));
        }
        out.push_line("{ }");
        out.blank();

        for member in &members {
            let resource_name = &member.resource.name;
            out.push_line(&format!(
                "string {}::{}({}) const",
                name, resource_name, member.parameter_list
            ));
            out.push_line("{");
            out.push_line(&format!(
                "    return _{}.format({});",
                resource_name, member.argument_list
            ));
            out.push_line("}");

            let Some((class, chain)) = member.exception else {
                continue;
            };
            out.push_line(&format!(
                "{}* {}::new{}({}) const",
                class, name, member.initcap, member.parameter_list
            ));
            out.push_line("{");
            out.push_line(&format!(
                "    return new {}({}({}));",
                class, resource_name, member.argument_list
            ));
            out.push_line("}");
            out.blank();

            if chain {
                out.push_line(&format!(
                    "{}* {}::new{}({}) const",
                    class,
                    name,
                    member.initcap,
                    Self::chain_parameters(&member.parameter_list, class)
                ));
                out.push_line("{");
                out.push_line(&format!(
                    "    return new {}({}({}), prev);",
                    class, resource_name, member.argument_list
                ));
                out.push_line("}");
                out.blank();
            }
        }

        if let Some(namespace) = &metadata.cpp_namespace {
            out.blank();
            out.push_line(&format!("}} // end namespace {}", namespace));
        }
        Ok(out.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        emit::common::CommentStyle,
        locale::Locale,
        types::{ExceptionDef, Resource},
    };
    use std::path::Path;

    fn header() -> HeaderContext {
        HeaderContext::new(Path::new("src/happy/Birthday.xml"), CommentStyle::ScmSafe, "")
    }

    fn birthday() -> ResourceBundle {
        let mut bundle = ResourceBundle::new(Locale::parse("en_US").unwrap());
        bundle.metadata.cpp_namespace = Some("happy".to_string());
        bundle.metadata.cpp_exception_class_name = Some("BirthdayException".to_string());
        bundle.metadata.cpp_exception_class_location = Some("BirthdayException.h".to_string());
        bundle
            .add_resource(Resource::message(
                "HappyBirthday",
                "Happy Birthday, {0}! You don''t look {1,number}.",
            ))
            .unwrap();
        bundle
            .add_resource(Resource::exception(
                "TooYoung",
                "{0} has not been born yet.",
                ExceptionDef {
                    cpp_chain_exceptions: Some(true),
                    ..ExceptionDef::default()
                },
            ))
            .unwrap();
        bundle
    }

    fn class(bundle: &ResourceBundle) -> CppClass<'_> {
        CppClass {
            bundle,
            class_name: "Birthday",
            base_class: DEFAULT_BASE_CLASS,
        }
    }

    #[test]
    fn test_validate_default_class_without_location() {
        let mut bundle = birthday();
        bundle.metadata.cpp_exception_class_location = None;
        assert!(matches!(
            validate(&bundle, "Birthday.xml"),
            Err(Error::MissingExceptionLocation { resource: None, .. })
        ));
    }

    #[test]
    fn test_validate_resource_class_without_location() {
        let mut bundle = ResourceBundle::new(Locale::parse("en").unwrap());
        bundle
            .add_resource(Resource::exception(
                "Oops",
                "oops",
                ExceptionDef {
                    cpp_class_name: Some("OopsError".to_string()),
                    ..ExceptionDef::default()
                },
            ))
            .unwrap();
        let err = validate(&bundle, "Oops.xml").unwrap_err();
        assert!(err.to_string().contains("specified for Oops"));
    }

    #[test]
    fn test_validate_no_exception_class_at_all() {
        let mut bundle = ResourceBundle::new(Locale::parse("en").unwrap());
        bundle
            .add_resource(Resource::exception("Oops", "oops", ExceptionDef::default()))
            .unwrap();
        assert!(matches!(
            validate(&bundle, "Oops.xml"),
            Err(Error::MissingExceptionClass { resource, .. }) if resource == "Oops"
        ));
    }

    #[test]
    fn test_validate_missing_text() {
        let mut bundle = birthday();
        bundle.resources[0].text = None;
        assert!(matches!(
            validate(&bundle, "Birthday.xml"),
            Err(Error::MissingText(_))
        ));
        assert!(validate(&birthday(), "Birthday.xml").is_ok());
    }

    #[test]
    fn test_header() {
        let bundle = birthday();
        let h = class(&bundle).render_header(&header()).unwrap();
        assert!(h.contains("#ifndef Happy_Birthday_Included\n#define Happy_Birthday_Included\n"));
        assert!(h.contains("#include \"BirthdayException.h\"\n// end includes specified by .../Birthday.xml\n"));
        assert!(h.contains("namespace happy {\n"));
        assert!(h.contains("typedef map<Locale, Birthday*> BirthdayBundleCache;\n"));
        assert!(h.contains("class Birthday : ResourceBundle\n{\n"));
        assert!(h.contains(
            "    std::string HappyBirthday(const std::string &p0, int p1) const;\n"
        ));
        assert!(h.contains("    BirthdayException* newTooYoung(const std::string &p0) const;\n"));
        assert!(h.contains(
            "    BirthdayException* newTooYoung(const std::string &p0, const BirthdayException * const prev) const;\n"
        ));
        assert!(h.contains("    ResourceDefinition _HappyBirthday;\n    ResourceDefinition _TooYoung;\n"));
        assert!(h.ends_with("} // end namespace happy\n\n#endif // Happy_Birthday_Included\n"));
    }

    #[test]
    fn test_implementation() {
        let bundle = birthday();
        let cpp = class(&bundle).render_implementation(&header()).unwrap();
        assert!(cpp.contains("#include \"Birthday.h\"\n"));
        assert!(cpp.contains("#define BASENAME (\"Birthday\")\n"));
        assert!(cpp.contains("static BirthdayBundleCache bundleCache;\n"));
        assert!(cpp.contains(
            "Birthday::Birthday(Locale locale)\n    : ResourceBundle(BASENAME, locale, bundleLocation),\n      _HappyBirthday(this, \"HappyBirthday\"),\n      _TooYoung(this, \"TooYoung\")\n{ }\n"
        ));
        assert!(cpp.contains(
            "string Birthday::HappyBirthday(const std::string &p0, int p1) const\n{\n    return _HappyBirthday.format(p0, p1);\n}\n"
        ));
        assert!(cpp.contains(
            "BirthdayException* Birthday::newTooYoung(const std::string &p0) const\n{\n    return new BirthdayException(TooYoung(p0));\n}\n"
        ));
        assert!(cpp.contains("    return new BirthdayException(TooYoung(p0), prev);\n"));
        assert!(cpp.ends_with("} // end namespace happy\n"));
    }

    #[test]
    fn test_chain_without_parameters_returns_pointer() {
        let mut bundle = birthday();
        bundle
            .add_resource(Resource::exception(
                "Oops",
                "Something broke",
                ExceptionDef {
                    cpp_chain_exceptions: Some(true),
                    ..ExceptionDef::default()
                },
            ))
            .unwrap();
        let h = class(&bundle).render_header(&header()).unwrap();
        assert!(h.contains(
            "    BirthdayException* newOops(const BirthdayException * const prev) const;\n"
        ));
    }

    #[test]
    fn test_no_chain_overload_by_default() {
        let mut bundle = birthday();
        if let crate::types::ResourceKind::Exception(e) = &mut bundle.resources[1].kind {
            e.cpp_chain_exceptions = None;
        }
        let h = class(&bundle).render_header(&header()).unwrap();
        assert!(!h.contains("prev"));
    }

    #[test]
    fn test_common_include() {
        let mut bundle = birthday();
        bundle.metadata.cpp_common_include = Some("common.h".to_string());
        let cpp = class(&bundle).render_implementation(&header()).unwrap();
        assert!(cpp.contains(
            "// begin common include specified by .../Birthday.xml\n#include \"common.h\"\n"
        ));
    }
}

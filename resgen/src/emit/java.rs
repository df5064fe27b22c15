//! Java resource classes.
//!
//! The base class holds one definition per resource plus typed accessor
//! and exception factory methods. Each locale gets an empty subclass that
//! exists only so `ResourceBundle.getBundle` can find the locale's
//! properties file.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    emit::common::{
        HeaderContext, SourceBuilder, add_lists, comment_block, do_not_modify_banner,
        generated_by_block, quote_for_java,
    },
    error::Error,
    locale::Locale,
    naming::{class_name_sans_package, package_name, remove_package, resource_initcap},
    placeholder::TypeNames,
    shape::{ConstructorKind, ConstructorShapeProvider, ExceptionConstructorShape, RunContext},
    types::{Resource, ResourceBundle},
};

/// Base class used when none is configured.
pub const DEFAULT_BASE_CLASS: &str = "org.eigenbase.resgen.ShadowResourceBundle";

const DEFINITION_CLASS: &str = "org.eigenbase.resgen.ResourceDefinition";

/// Code generation style of the base class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JavaStyle {
    /// A static definition plus `get`/`new` methods per resource.
    #[default]
    #[serde(alias = "dynamic")]
    Direct,
    /// One member per resource whose type carries `str`/`ex` methods.
    Functor,
}

impl FromStr for JavaStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" | "dynamic" => Ok(JavaStyle::Direct),
            "functor" => Ok(JavaStyle::Functor),
            other => Err(format!("Invalid style '{}'", other)),
        }
    }
}

impl Display for JavaStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JavaStyle::Direct => write!(f, "direct"),
            JavaStyle::Functor => write!(f, "functor"),
        }
    }
}

/// The Java class generated for a bundle's base locale.
#[derive(Debug, Clone, Copy)]
pub struct JavaBaseClass<'a> {
    pub bundle: &'a ResourceBundle,
    /// Fully-qualified name, e.g. `happy.Birthday`.
    pub class_name: &'a str,
    pub base_class: &'a str,
    pub style: JavaStyle,
}

impl JavaBaseClass<'_> {
    pub fn render(
        &self,
        header: &HeaderContext,
        shapes: &dyn ConstructorShapeProvider,
        ctx: &mut RunContext,
    ) -> Result<String, Error> {
        let simple_name = remove_package(self.class_name);
        let mut out = SourceBuilder::new();
        file_header(&mut out, self.class_name, header);

        out.push_line(&format!(
            "public class {} extends {} {{",
            simple_name, self.base_class
        ));
        out.indent();
        out.push_line(&format!("public {}() throws IOException {{", simple_name));
        out.push_line("}");
        out.push_line(&format!(
            "private static final String baseName = {};",
            quote_for_java(self.class_name)
        ));
        out.push_line("/**");
        out.push_line(&format!(
            " * Retrieves the singleton instance of {{@link {}}}. If",
            simple_name
        ));
        out.push_line(" * the application has called {@link #setThreadLocale}, returns the");
        out.push_line(" * resource for the thread's locale.");
        out.push_line(" */");
        out.push_line(&format!(
            "public static synchronized {} instance() {{",
            simple_name
        ));
        out.push_line(&format!(
            "    return ({}) instance(baseName, getThreadOrDefaultLocale(), ResourceBundle.getBundle(baseName, getThreadOrDefaultLocale()));",
            simple_name
        ));
        out.push_line("}");
        out.push_line("/**");
        out.push_line(&format!(
            " * Retrieves the instance of {{@link {}}} for the given locale.",
            simple_name
        ));
        out.push_line(" */");
        out.push_line(&format!(
            "public static synchronized {} instance(Locale locale) {{",
            simple_name
        ));
        out.push_line(&format!(
            "    return ({}) instance(baseName, locale, ResourceBundle.getBundle(baseName, locale));",
            simple_name
        ));
        out.push_line("}");
        if let Some(code) = &self.bundle.metadata.code {
            out.push_line("// begin of included code");
            out.push_raw(code);
            if !code.ends_with('\n') {
                out.blank();
            }
            out.push_line("// end of included code");
        }

        let mut functors = FunctorTypes::default();
        for resource in &self.bundle.resources {
            let members = ResourceMembers::resolve(self.bundle, resource, shapes, ctx)?;
            out.blank();
            comment_block(
                &mut out,
                &resource.name,
                members.text,
                resource.comment.as_deref(),
            );
            match self.style {
                JavaStyle::Direct => members.render_direct(&mut out),
                JavaStyle::Functor => {
                    let functor = functors.type_for(&members, simple_name);
                    members.render_functor_field(&mut out, &functor);
                }
            }
        }
        out.dedent();
        out.blank();
        out.push_raw(&functors.definitions.build());
        out.push_line("}");
        out.blank();
        out.push_line(&format!("// End {}.java", simple_name));
        Ok(out.build())
    }
}

/// The empty subclass generated for one locale, e.g. `Birthday_fr_FR`.
pub fn render_locale_class(class_name: &str, locale: &Locale, header: &HeaderContext) -> String {
    let localized = class_name_sans_package(class_name, Some(locale));
    let mut out = SourceBuilder::new();
    file_header(&mut out, class_name, header);
    out.push_line(&format!(
        "public class {} extends {} {{",
        localized,
        remove_package(class_name)
    ));
    out.indent();
    out.push_line(&format!("public {}() throws IOException {{", localized));
    out.push_line("}");
    out.dedent();
    out.push_line("}");
    out.blank();
    out.push_line(&format!("// End {}.java", localized));
    out.build()
}

fn file_header(out: &mut SourceBuilder, class_name: &str, header: &HeaderContext) {
    do_not_modify_banner(out, header.style);
    if let Some(package) = package_name(class_name) {
        out.push_line(&format!("package {};", package));
    }
    out.push_line("import java.io.IOException;");
    out.push_line("import java.util.Locale;");
    out.push_line("import java.util.ResourceBundle;");
    out.push_line("import org.eigenbase.resgen.*;");
    out.blank();
    generated_by_block(out, header);
}

/// Everything needed to render one resource's members.
struct ResourceMembers<'a> {
    resource: &'a Resource,
    text: &'a str,
    initcap: String,
    parameter_list: String,
    argument_list: String,
    argument_array: String,
    exception: Option<ExceptionFactories<'a>>,
}

struct ExceptionFactories<'a> {
    class_name: &'a str,
    /// `None` when the class's constructors are unknown.
    shape: Option<ExceptionConstructorShape>,
    chain: bool,
}

impl ExceptionFactories<'_> {
    fn factory(&self) -> Option<ConstructorKind> {
        self.shape.and_then(|s| s.factory_constructor())
    }

    fn cause_factory(&self) -> Option<ConstructorKind> {
        if !self.chain {
            return None;
        }
        self.shape.and_then(|s| s.cause_constructor())
    }
}

impl<'a> ResourceMembers<'a> {
    fn resolve(
        bundle: &'a ResourceBundle,
        resource: &'a Resource,
        shapes: &dyn ConstructorShapeProvider,
        ctx: &mut RunContext,
    ) -> Result<Self, Error> {
        let text = resource.require_text()?;
        let signature = resource.signature()?;
        let argument_list = signature.argument_list();
        let argument_array = if argument_list.is_empty() {
            "emptyObjectArray".to_string()
        } else {
            format!("new Object[] {{{}}}", argument_list)
        };

        let exception = resource.as_exception().map(|exception| {
            let class_name = bundle.java_exception_class(exception);
            let shape = ctx.resolve_shape(shapes, class_name, bundle.factory_signatures(class_name));
            ExceptionFactories {
                class_name,
                shape,
                chain: exception.chain_exceptions != Some(false),
            }
        });

        Ok(Self {
            resource,
            text,
            initcap: resource_initcap(&resource.name),
            parameter_list: signature.parameter_list(&TypeNames::JAVA),
            argument_list,
            argument_array,
            exception,
        })
    }

    fn render_direct(&self, out: &mut SourceBuilder) {
        let name = &self.initcap;
        let instantiate = format!(
            "{}.instantiate({})",
            name,
            add_lists(&["this", self.argument_array.as_str()])
        );
        let get = format!("get{}({})", name, self.argument_list);

        out.push_line(&format!(
            "public static final {def} {name} = new {def}({key}, {text});",
            def = DEFINITION_CLASS,
            name = name,
            key = quote_for_java(name),
            text = quote_for_java(self.text),
        ));
        out.push_line(&format!("public String get{}({}) {{", name, self.parameter_list));
        out.push_line(&format!("    return {}.toString();", instantiate));
        out.push_line("}");

        let Some(exception) = &self.exception else {
            return;
        };
        let class = exception.class_name;
        if let Some(kind) = exception.factory() {
            let args = match kind {
                ConstructorKind::Instance => instantiate.clone(),
                ConstructorKind::InstanceCause => format!("{}, null", instantiate),
                ConstructorKind::Message => get.clone(),
                ConstructorKind::MessageCause => format!("{}, null", get),
            };
            out.push_line(&format!(
                "public {} new{}({}) {{",
                class, name, self.parameter_list
            ));
            out.push_line(&format!("    return new {}({});", class, args));
            out.push_line("}");
        }
        if let Some(kind) = exception.cause_factory() {
            let message = match kind {
                ConstructorKind::InstanceCause => &instantiate,
                _ => &get,
            };
            out.push_line(&format!(
                "public {} new{}({}) {{",
                class,
                name,
                add_lists(&[self.parameter_list.as_str(), "Throwable err"])
            ));
            out.push_line(&format!("    return new {}({}, err);", class, message));
            out.push_line("}");
        }
    }

    fn render_functor_field(&self, out: &mut SourceBuilder, functor: &str) {
        out.push_line(&format!(
            "public final {functor} {name} = new {functor}({key}, {text}, {props});",
            functor = functor,
            name = self.initcap,
            key = quote_for_java(&self.initcap),
            text = quote_for_java(self.text),
            props = self.property_list(),
        ));
    }

    fn property_list(&self) -> String {
        if self.resource.properties.is_empty() {
            return "null".to_string();
        }
        let items: Vec<String> = self
            .resource
            .properties
            .iter()
            .flat_map(|p| [quote_for_java(&p.name), quote_for_java(&p.value)])
            .collect();
        format!("new String[] {{{}}}", items.join(", "))
    }
}

/// Nested `_DefN` classes of the functor style, one per distinct
/// combination of parameter list and exception factories.
#[derive(Default)]
struct FunctorTypes {
    by_key: HashMap<(String, Option<String>, bool), String>,
    definitions: SourceBuilder,
}

impl FunctorTypes {
    fn type_for(&mut self, members: &ResourceMembers<'_>, bundle_class: &str) -> String {
        let key = (
            members.parameter_list.clone(),
            members.exception.as_ref().map(|e| e.class_name.to_string()),
            members.exception.as_ref().is_some_and(|e| e.chain),
        );
        if let Some(name) = self.by_key.get(&key) {
            return name.clone();
        }
        let name = format!("_Def{}", self.by_key.len());
        self.define(&name, members, bundle_class);
        self.by_key.insert(key, name.clone());
        name
    }

    fn define(&mut self, functor: &str, members: &ResourceMembers<'_>, bundle_class: &str) {
        let out = &mut self.definitions;
        let bundle_this = format!("{}.this", bundle_class);
        let instantiate = format!(
            "instantiate({})",
            add_lists(&[bundle_this.as_str(), members.argument_array.as_str()])
        );
        let message = format!("{}.toString()", instantiate);

        out.indent();
        out.blank();
        out.push_line("/**");
        out.push_line(" * Definition for resources which");
        if let Some(exception) = &members.exception {
            out.push_line(&format!(
                " * return a {{@link {}}} exception and",
                exception.class_name
            ));
        }
        out.push_line(&format!(
            " * take arguments '{}'.",
            members.parameter_list
        ));
        out.push_line(" */");
        out.push_line(&format!(
            "public final class {} extends {} {{",
            functor, DEFINITION_CLASS
        ));
        out.indent();
        out.push_line(&format!(
            "{}(String key, String baseMessage, String[] props) {{",
            functor
        ));
        out.push_line("    super(key, baseMessage, props);");
        out.push_line("}");
        out.push_line(&format!("public String str({}) {{", members.parameter_list));
        out.push_line(&format!("    return {};", message));
        out.push_line("}");

        if let Some(exception) = &members.exception {
            let class = exception.class_name;
            if let Some(kind) = exception.factory() {
                let args = match kind {
                    ConstructorKind::Instance => instantiate.clone(),
                    ConstructorKind::InstanceCause => format!("{}, null", instantiate),
                    ConstructorKind::Message => message.clone(),
                    ConstructorKind::MessageCause => format!("{}, null", message),
                };
                out.push_line(&format!("public {} ex({}) {{", class, members.parameter_list));
                out.push_line(&format!("    return new {}({});", class, args));
                out.push_line("}");
            }
            if let Some(kind) = exception.cause_factory() {
                let cause_message = match kind {
                    ConstructorKind::InstanceCause => &instantiate,
                    _ => &message,
                };
                out.push_line(&format!(
                    "public {} ex({}) {{",
                    class,
                    add_lists(&[members.parameter_list.as_str(), "Throwable err"])
                ));
                out.push_line(&format!("    return new {}({}, err);", class, cause_message));
                out.push_line("}");
            }
        }
        out.dedent();
        out.push_line("}");
        out.dedent();
    }
}

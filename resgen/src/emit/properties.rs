use crate::{
    emit::common::{HeaderContext, TOOL_NAME, quote_for_properties},
    error::Error,
    locale::Locale,
    naming::{class_name_sans_package, localized_class_name},
    shape::RunContext,
    types::ResourceBundle,
};

fn push_provenance(out: &mut String, header: &HeaderContext) {
    out.push_str(&format!("# It was generated by {}\n", TOOL_NAME));
    out.push_str(&format!("# from {}\n", header.source_display));
    if let Some(timestamp) = &header.timestamp {
        out.push_str(&format!("# on {}.\n", timestamp));
    }
    out.push('\n');
}

/// Renders the base `.properties` file holding every message of the bundle.
///
/// Messages with an odd number of single quotes are still written, with a
/// warning recorded in `ctx`.
pub fn render_base(
    bundle: &ResourceBundle,
    class_name: &str,
    header: &HeaderContext,
    ctx: &mut RunContext,
) -> Result<String, Error> {
    let mut out = String::new();
    out.push_str("# This file contains the resources for\n");
    out.push_str(&format!(
        "# class '{}'; the base locale is '{}'.\n",
        class_name, bundle.locale
    ));
    push_provenance(&mut out, header);

    for resource in &bundle.resources {
        let text = resource.require_text()?;
        if text.matches('\'').count() % 2 == 1 {
            ctx.warn(format!(
                "The message for resource '{}' has an odd number of single-quotes. \
                 These should probably be doubled (to include a single-quote in a message), \
                 or paired (to include literal text in a message).",
                resource.name
            ));
        }
        out.push_str(&format!("{}={}\n", resource.name, quote_for_properties(text)));
    }

    out.push_str(&format!("# End {}.properties\n", class_name));
    Ok(out)
}

/// Renders the placeholder file for a locale without translations.
pub fn render_locale_stub(class_name: &str, locale: &Locale, header: &HeaderContext) -> String {
    let localized = localized_class_name(class_name, Some(locale));
    let mut out = String::new();
    out.push_str("# This file contains the resources for\n");
    out.push_str(&format!(
        "# class '{}' and locale '{}'.\n",
        localized, locale
    ));
    push_provenance(&mut out, header);
    out.push_str("# This file is intentionally blank. Add property values\n");
    out.push_str("# to this file to override the translations in the base\n");
    out.push_str(&format!(
        "# properties file, {}.properties\n",
        class_name_sans_package(class_name, Some(locale))
    ));
    out.push('\n');
    out.push_str(&format!("# End {}.properties\n", localized));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{emit::common::CommentStyle, types::Resource};
    use indoc::formatdoc;
    use std::path::Path;

    fn birthday() -> ResourceBundle {
        let mut bundle = ResourceBundle::new(Locale::parse("en_US").unwrap());
        bundle
            .add_resource(Resource::message(
                "HappyBirthday",
                "Happy Birthday, {0}! You don''t look {1,number}.",
            ))
            .unwrap();
        bundle
            .add_resource(Resource::message("Path", "c:\\temp\\{0}"))
            .unwrap();
        bundle
    }

    #[test]
    fn test_render_base_scm_safe() {
        let header = HeaderContext::new(
            Path::new("src/happy/Birthday.xml"),
            CommentStyle::ScmSafe,
            "Tue Jul 17 20:52:06 2012",
        );
        let mut ctx = RunContext::new();
        let out = render_base(&birthday(), "happy.Birthday", &header, &mut ctx).unwrap();
        let expected = formatdoc!(
            r#"
                # This file contains the resources for
                # class 'happy.Birthday'; the base locale is 'en_US'.
                # It was generated by {}
                # from .../Birthday.xml

                HappyBirthday=Happy Birthday, {{0}}! You don''t look {{1,number}}.
                Path=c:\\temp\\{{0}}
                # End happy.Birthday.properties
            "#,
            TOOL_NAME
        );
        assert_eq!(out, expected);
        assert!(ctx.warnings().is_empty());
    }

    #[test]
    fn test_render_base_normal_has_timestamp() {
        let header = HeaderContext::new(
            Path::new("src/happy/Birthday.xml"),
            CommentStyle::Normal,
            "Tue Jul 17 20:52:06 2012",
        );
        let mut ctx = RunContext::new();
        let out = render_base(&birthday(), "happy.Birthday", &header, &mut ctx).unwrap();
        assert!(out.contains("# from src/happy/Birthday.xml\n# on Tue Jul 17 20:52:06 2012.\n\n"));
    }

    #[test]
    fn test_odd_quotes_warn_but_emit() {
        let mut bundle = ResourceBundle::new(Locale::parse("en").unwrap());
        bundle
            .add_resource(Resource::message("Dont", "You don't look well"))
            .unwrap();
        let header = HeaderContext::new(Path::new("Dont.xml"), CommentStyle::ScmSafe, "");
        let mut ctx = RunContext::new();
        let out = render_base(&bundle, "Dont", &header, &mut ctx).unwrap();
        assert!(out.contains("Dont=You don't look well\n"));
        assert_eq!(ctx.warnings().len(), 1);
        assert!(ctx.warnings()[0].contains("'Dont' has an odd number of single-quotes"));
    }

    #[test]
    fn test_missing_text_is_fatal() {
        let mut bundle = birthday();
        bundle.resources[1].text = None;
        let header = HeaderContext::new(Path::new("B.xml"), CommentStyle::ScmSafe, "");
        let mut ctx = RunContext::new();
        assert!(matches!(
            render_base(&bundle, "B", &header, &mut ctx),
            Err(Error::MissingText(name)) if name == "Path"
        ));
    }

    #[test]
    fn test_render_locale_stub() {
        let header = HeaderContext::new(
            Path::new("src/happy/Birthday.xml"),
            CommentStyle::ScmSafe,
            "",
        );
        let locale = Locale::parse("fr_FR").unwrap();
        let out = render_locale_stub("happy.Birthday", &locale, &header);
        let expected = formatdoc!(
            "
                # This file contains the resources for
                # class 'happy.Birthday_fr_FR' and locale 'fr_FR'.
                # It was generated by {}
                # from .../Birthday.xml

                # This file is intentionally blank. Add property values
                # to this file to override the translations in the base
                # properties file, Birthday_fr_FR.properties

                # End happy.Birthday_fr_FR.properties
            ",
            TOOL_NAME
        );
        assert_eq!(out, expected);
    }
}

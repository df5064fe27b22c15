use indoc::indoc;
use resgen::{
    CommentStyle, Error, ExceptionConstructorShape, GenerateOptions, Generator, Include, JavaStyle,
    Mode,
};
use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};
use tempfile::TempDir;

const BIRTHDAY: &str = indoc! {r#"
    <?xml version="1.0" ?>
    <resourceBundle locale="en_US">
      <message name="HappyBirthday">
        <!-- Greets the birthday person. -->
        <text>Happy Birthday, {0}! You don''t look {1,number}.</text>
      </message>
      <exception name="TooYoung">
        <text>{0} has not been born yet.</text>
      </exception>
    </resourceBundle>
"#};

fn write_source(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn options(src: &Path) -> GenerateOptions {
    GenerateOptions {
        src_dir: src.to_path_buf(),
        comment_style: CommentStyle::ScmSafe,
        ..GenerateOptions::default()
    }
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_birthday_end_to_end() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(src.path(), "happy/Birthday.xml", BIRTHDAY);

    let options = GenerateOptions {
        dest_dir: Some(out.path().to_path_buf()),
        locales: Some("en_US,fr_FR".to_string()),
        ..options(src.path())
    };
    let report = Generator::new(options).run(&[Include::new("happy/Birthday.xml")]);
    assert!(!report.has_errors(), "{:?}", report.outcomes[0].error);
    assert!(report.warnings.is_empty());

    let happy = out.path().join("happy");
    let mut files: Vec<String> = fs::read_dir(&happy)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(
        files,
        vec![
            "Birthday.java",
            "Birthday.properties",
            "Birthday_en_US.java",
            "Birthday_en_US.properties",
            "Birthday_fr_FR.java",
            "Birthday_fr_FR.properties",
        ]
    );

    let java = read(happy.join("Birthday.java"));
    assert!(java.contains("     * Greets the birthday person.\n"));
    assert!(java.contains("public String getHappyBirthday(String p0, Number p1) {"));
    assert!(java.contains("public java.lang.RuntimeException newTooYoung(String p0) {"));
    assert!(java.contains(
        "public java.lang.RuntimeException newTooYoung(String p0, Throwable err) {"
    ));

    let properties = read(happy.join("Birthday.properties"));
    assert!(properties.contains("HappyBirthday=Happy Birthday, {0}! You don''t look {1,number}.\n"));
    assert!(properties.contains("TooYoung={0} has not been born yet.\n"));
    assert!(read(happy.join("Birthday_fr_FR.properties")).contains("intentionally blank"));
    assert!(
        read(happy.join("Birthday_fr_FR.java"))
            .contains("public class Birthday_fr_FR extends Birthday {")
    );
}

#[test]
fn test_bundle_locale_must_be_in_list() {
    let src = TempDir::new().unwrap();
    write_source(
        src.path(),
        "happy/Birthday.xml",
        &BIRTHDAY.replace("en_US", "fr_FR"),
    );
    let options = GenerateOptions {
        locales: Some("en_US,de_DE".to_string()),
        ..options(src.path())
    };
    let report = Generator::new(options).run(&[Include::new("happy/Birthday.xml")]);

    let Some(Error::Include { source, .. }) = &report.outcomes[0].error else {
        panic!("expected an include error");
    };
    assert!(matches!(
        **source,
        Error::LocaleNotInList { ref locale, .. } if locale == "fr_FR"
    ));
    assert!(!src.path().join("happy/Birthday.java").exists());
}

#[test]
fn test_unknown_class_warns_once_across_resources() {
    let src = TempDir::new().unwrap();
    let resources: String = (0..5)
        .map(|i| format!("  <exception name=\"Failure{i}\"><text>Failure {{0}}</text></exception>\n"))
        .collect();
    let xml = format!(
        "<resourceBundle locale=\"en\" exceptionClassName=\"com.acme.Unknown\">\n{}</resourceBundle>\n",
        resources
    );
    write_source(src.path(), "Failures.xml", &xml);

    let report = Generator::new(options(src.path())).run(&[Include::new("Failures.xml")]);
    assert!(!report.has_errors());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("com.acme.Unknown"));

    let java = read(src.path().join("Failures.java"));
    assert!(java.contains("public String getFailure4(String p0)"));
    assert!(!java.contains("newFailure"));
}

#[test]
fn test_factory_hint_gives_cause_factory() {
    let src = TempDir::new().unwrap();
    write_source(
        src.path(),
        "Hinted.xml",
        indoc! {r#"
            <resourceBundle locale="en">
              <factory className="com.acme.MyError" signature="(String message, Throwable cause)"/>
              <exception name="Broken" className="com.acme.MyError">
                <text>{0} is broken</text>
              </exception>
            </resourceBundle>
        "#},
    );
    let report = Generator::new(options(src.path())).run(&[Include::new("Hinted.xml")]);
    assert!(!report.has_errors());
    assert!(report.warnings.is_empty());

    let java = read(src.path().join("Hinted.java"));
    assert!(java.contains(
        "public com.acme.MyError newBroken(String p0, Throwable err) {\n        return new com.acme.MyError(getBroken(p0), err);"
    ));
    assert!(java.contains("return new com.acme.MyError(getBroken(p0), null);"));
}

#[test]
fn test_configured_shape_table() {
    let src = TempDir::new().unwrap();
    write_source(
        src.path(),
        "Configured.xml",
        indoc! {r#"
            <resourceBundle locale="en" exceptionClassName="com.acme.AcmeException">
              <exception name="Denied"><text>Access denied</text></exception>
            </resourceBundle>
        "#},
    );
    let mut generator = Generator::new(options(src.path()));
    generator.shapes_mut().insert(
        "com.acme.AcmeException",
        ExceptionConstructorShape {
            instance: true,
            ..ExceptionConstructorShape::default()
        },
    );
    let report = generator.run(&[Include::new("Configured.xml")]);
    assert!(!report.has_errors());

    let java = read(src.path().join("Configured.java"));
    assert!(java.contains(
        "return new com.acme.AcmeException(Denied.instantiate(this, emptyObjectArray));"
    ));
    assert!(!java.contains("Throwable err"));
}

#[test]
fn test_functor_style() {
    let src = TempDir::new().unwrap();
    write_source(src.path(), "happy/Birthday.xml", BIRTHDAY);
    let options = GenerateOptions {
        style: JavaStyle::Functor,
        ..options(src.path())
    };
    let report = Generator::new(options).run(&[Include::new("happy/Birthday.xml")]);
    assert!(!report.has_errors());

    let java = read(src.path().join("happy/Birthday.java"));
    assert!(java.contains("public final _Def0 HappyBirthday = new _Def0("));
    assert!(java.contains("public final _Def1 TooYoung = new _Def1("));
    assert!(java.contains("public String str(String p0, Number p1) {"));
}

#[test]
fn test_cpp_output() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(
        src.path(),
        "happy/Birthday.xml",
        &BIRTHDAY.replace(
            "locale=\"en_US\"",
            "locale=\"en_US\" cppNamespace=\"happy\" cppExceptionClassName=\"BirthdayException\" cppExceptionClassLocation=\"BirthdayException.h\"",
        ),
    );
    let options = GenerateOptions {
        mode: Mode::Cpp,
        dest_dir: Some(out.path().to_path_buf()),
        ..options(src.path())
    };
    let report = Generator::new(options).run(&[Include::new("happy/Birthday.xml")]);
    assert!(!report.has_errors(), "{:?}", report.outcomes[0].error);

    let header = read(out.path().join("Birthday.h"));
    assert!(header.contains("#ifndef Happy_Birthday_Included"));
    assert!(header.contains("    std::string HappyBirthday(const std::string &p0, int p1) const;"));
    let implementation = read(out.path().join("Birthday.cpp"));
    assert!(implementation.contains("    return new BirthdayException(TooYoung(p0));"));

    assert!(!out.path().join("happy/Birthday.java").exists());
    assert!(out.path().join("happy/Birthday.properties").exists());
}

#[test]
fn test_chain_attributes_apply_to_their_own_backend() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_source(
        src.path(),
        "happy/Birthday.xml",
        indoc! {r#"
            <resourceBundle locale="en_US" cppExceptionClassName="BirthdayException" cppExceptionClassLocation="BirthdayException.h">
              <exception name="TooYoung" chainExceptions="false" cppChainExceptions="true">
                <text>{0} has not been born yet.</text>
              </exception>
              <exception name="TooOld" cppChainExceptions="false">
                <text>{0} is too old.</text>
              </exception>
            </resourceBundle>
        "#},
    );
    let options = GenerateOptions {
        mode: Mode::All,
        dest_dir: Some(out.path().to_path_buf()),
        ..options(src.path())
    };
    let report = Generator::new(options).run(&[Include::new("happy/Birthday.xml")]);
    assert!(!report.has_errors(), "{:?}", report.outcomes[0].error);

    let java = read(out.path().join("happy/Birthday.java"));
    assert!(!java.contains("newTooYoung(String p0, Throwable err)"));
    assert!(java.contains("public java.lang.RuntimeException newTooOld(String p0, Throwable err) {"));

    let header = read(out.path().join("Birthday.h"));
    assert!(header.contains(
        "    BirthdayException* newTooYoung(const std::string &p0, const BirthdayException * const prev) const;"
    ));
    assert!(!header.contains("newTooOld(const std::string &p0, const BirthdayException * const prev)"));
}

#[test]
fn test_cpp_validation_writes_nothing() {
    let src = TempDir::new().unwrap();
    write_source(src.path(), "happy/Birthday.xml", BIRTHDAY);
    let options = GenerateOptions {
        mode: Mode::Cpp,
        ..options(src.path())
    };
    let report = Generator::new(options).run(&[Include::new("happy/Birthday.xml")]);

    let Some(Error::Include { source, .. }) = &report.outcomes[0].error else {
        panic!("expected an include error");
    };
    assert!(matches!(**source, Error::MissingExceptionClass { ref resource, .. } if resource == "TooYoung"));
    assert!(!src.path().join("Birthday.h").exists());
    assert!(!src.path().join("happy/Birthday.properties").exists());
}

#[test]
fn test_staleness_and_force() {
    let src = TempDir::new().unwrap();
    write_source(src.path(), "happy/Birthday.xml", BIRTHDAY);
    let source = src.path().join("happy/Birthday.xml");
    let past = SystemTime::now() - Duration::from_secs(3600);
    fs::File::options()
        .write(true)
        .open(&source)
        .unwrap()
        .set_modified(past)
        .unwrap();

    let generator = Generator::new(options(src.path()));
    let includes = [Include::new("happy/Birthday.xml")];
    assert_eq!(generator.run(&includes).generated().count(), 4);
    assert_eq!(generator.run(&includes).generated().count(), 0);

    let forced = Generator::new(GenerateOptions {
        force: true,
        ..options(src.path())
    });
    // The locale properties file lives in the source tree, so it is its own
    // override and is never regenerated once it exists.
    let locale_properties = src.path().join("happy/Birthday_en_US.properties");
    let report = forced.run(&includes);
    assert_eq!(report.generated().count(), 3);
    assert_eq!(report.outcomes[0].up_to_date, vec![locale_properties.clone()]);

    fs::File::options()
        .write(true)
        .open(&source)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(3600))
        .unwrap();
    let report = generator.run(&includes);
    assert_eq!(report.generated().count(), 3);
    assert_eq!(report.outcomes[0].up_to_date, vec![locale_properties]);
}

#[test]
fn test_huge_placeholder_index_fails_only_its_include() {
    let src = TempDir::new().unwrap();
    write_source(
        src.path(),
        "Codes.xml",
        r#"<resourceBundle locale="en"><message name="ErrorCode"><text>Error code {4294967295}</text></message></resourceBundle>"#,
    );
    write_source(src.path(), "happy/Birthday.xml", BIRTHDAY);

    let report = Generator::new(options(src.path())).run(&[
        Include::new("Codes.xml"),
        Include::new("happy/Birthday.xml"),
    ]);
    assert_eq!(report.error_count(), 1);
    let Some(Error::Include { source, .. }) = &report.outcomes[0].error else {
        panic!("expected an include error");
    };
    assert!(matches!(**source, Error::InvalidBundle(ref message) if message.contains("ErrorCode")));
    assert!(!src.path().join("Codes.properties").exists());
    assert!(report.outcomes[1].is_ok());
}

#[test]
fn test_missing_text_fails_only_its_include() {
    let src = TempDir::new().unwrap();
    write_source(
        src.path(),
        "Broken.xml",
        "<resourceBundle locale=\"en\"><message name=\"Empty\"/></resourceBundle>",
    );
    write_source(src.path(), "happy/Birthday.xml", BIRTHDAY);

    let report = Generator::new(options(src.path())).run(&[
        Include::new("Broken.xml"),
        Include::new("happy/Birthday.xml"),
    ]);
    assert_eq!(report.error_count(), 1);
    let error = report.outcomes[0].error.as_ref().unwrap().to_string();
    assert!(error.contains("Broken.xml"));
    assert!(error.contains("resource 'Empty' has no message"));
    assert!(report.outcomes[1].is_ok());
}

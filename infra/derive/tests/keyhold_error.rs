use std::borrow::Cow;

#[test]
fn keyhold_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/keyhold_error_pass.rs");
    t.pass("tests/ui/keyhold_slice_pass.rs");
}

#[keyhold_derive::keyhold_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[test]
fn context_is_attached_to_source_errors() {
    let io: std::result::Result<(), std::io::Error> =
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));

    let err = io.context("Reading settings").unwrap_err();
    assert!(matches!(err, DemoError::Io { context: Some(_), .. }));
    assert!(err.to_string().contains("Reading settings"));
}

#[test]
fn internal_variant_converts_from_strings() {
    let from_static: DemoError = "boom".into();
    assert!(matches!(from_static, DemoError::Internal { .. }));

    let from_owned: DemoError = String::from("boom owned").into();
    assert!(from_owned.to_string().contains("boom owned"));
}

#[test]
fn question_mark_converts_sources() {
    fn read() -> Result<(), DemoError> {
        Err(std::io::Error::other("disk on fire"))?;
        Ok(())
    }

    assert!(matches!(read().unwrap_err(), DemoError::Io { context: None, .. }));
}

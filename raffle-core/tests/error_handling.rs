use raffle_core::{ConfigError, CoreError, DrawError, ErrorExt, ErrorReporter, PageError};

#[test]
fn test_error_codes() {
    let page_error = CoreError::Page(PageError::WaitTimeout {
        selector: "ul.comment_list".to_string(),
        timeout_ms: 5000,
    });
    assert_eq!(page_error.error_code(), "PAGE");

    let config_error = CoreError::Config(ConfigError::MissingField {
        field: "thread_url".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    let draw_error = CoreError::Draw(DrawError::InsufficientPool {
        available: 1,
        requested: 2,
    });
    assert_eq!(draw_error.error_code(), "DRAW");

    let nested = PageError::NavigationFailed {
        target: "https://cafe.naver.com/x".to_string(),
        details: "net::ERR_NAME_NOT_RESOLVED".to_string(),
    };
    assert_eq!(nested.error_code(), "PAGE_NAVIGATION_FAILED");
}

#[test]
fn test_conversions() {
    let error: CoreError = PageError::ConnectionLost.into();
    assert!(matches!(error, CoreError::Page(PageError::ConnectionLost)));

    let error: CoreError = DrawError::InsufficientPool {
        available: 0,
        requested: 1,
    }
    .into();
    assert!(matches!(
        error,
        CoreError::Draw(DrawError::InsufficientPool { available: 0, .. })
    ));
}

#[test]
fn test_user_friendly_messages() {
    let timeout = CoreError::Page(PageError::WaitTimeout {
        selector: ".info_area".to_string(),
        timeout_ms: 5000,
    });
    let message = timeout.user_friendly_message();
    assert!(message.contains(".info_area"));

    let draw = CoreError::Draw(DrawError::InsufficientPool {
        available: 1,
        requested: 2,
    });
    let message = draw.user_friendly_message();
    assert!(message.contains("(1) < 2"));

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "winner_count".to_string(),
        value: "zero".to_string(),
    });
    let message = config_error.user_friendly_message();
    assert!(message.contains("winner_count"));
    assert!(message.contains("zero"));
}

#[test]
fn test_display_reports_shortfall() {
    let error = DrawError::InsufficientPool {
        available: 3,
        requested: 5,
    };
    assert_eq!(
        error.to_string(),
        "Insufficient eligible pool: 3 available, 5 requested"
    );
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new();
    let error = CoreError::Page(PageError::ConnectionLost);

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
}

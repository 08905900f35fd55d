//! Subscriber installation. Kept in its own binary because the subscriber is global.

#[test]
fn test_tracing_installs_once() {
    vellum::init_tracing().unwrap();
    tracing::info!("subscriber installed");

    assert!(vellum::init_tracing().is_err());
    assert!(vellum::init_json_tracing().is_err());
}

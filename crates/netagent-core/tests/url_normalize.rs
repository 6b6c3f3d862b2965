use netagent_core::url::{join_download_url, normalize, normalize_with, DEFAULT_SERVICE_URL};

#[test]
fn absent_or_blank_url_uses_default() {
    assert_eq!(normalize(None), DEFAULT_SERVICE_URL);
    assert_eq!(normalize(Some("")), DEFAULT_SERVICE_URL);
    assert_eq!(normalize(Some("   ")), DEFAULT_SERVICE_URL);
}

#[test]
fn legacy_marker_is_truncated() {
    assert_eq!(
        normalize(Some("https://eu.example.com/Contrast/api")),
        "https://eu.example.com"
    );
    assert_eq!(
        normalize(Some("https://eu.example.com/Contrast")),
        "https://eu.example.com"
    );
    assert_eq!(
        normalize(Some("https://host:8443/Contrast/Contrast/")),
        "https://host:8443"
    );
}

#[test]
fn url_without_marker_is_unchanged() {
    for url in [
        "https://eu.example.com",
        "https://eu.example.com/",
        "http://10.0.0.5:8080/teamserver",
    ] {
        assert_eq!(normalize(Some(url)), url);
    }
}

#[test]
fn custom_marker_and_default() {
    assert_eq!(
        normalize_with(Some("https://a/legacy/x"), "https://d", "/legacy"),
        "https://a"
    );
    assert_eq!(normalize_with(None, "https://d", "/legacy"), "https://d");
}

#[test]
fn download_url_has_single_separator() {
    assert_eq!(
        join_download_url("https://eu.example.com/", "/Contrast/api/engine/dotnet"),
        "https://eu.example.com/Contrast/api/engine/dotnet"
    );
    assert_eq!(
        join_download_url("https://eu.example.com", "Contrast/api/engine/dotnet"),
        "https://eu.example.com/Contrast/api/engine/dotnet"
    );
}

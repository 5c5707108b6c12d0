pub(crate) mod download;
pub(crate) mod github;
pub(crate) mod pdf;
pub(crate) mod settings;

/// Milliseconds since the Unix epoch, used to name exported files.
pub(crate) fn unix_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// One decoded access-log line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LogRecord {
    /// Request time, Unix seconds.
    pub timestamp: i64,
    pub method: Option<String>,
    /// Request target as logged, query string included.
    pub path: Option<String>,
    pub status: u16,
    /// Raw response size token; `-` when nothing was sent.
    pub bytes: Option<String>,
}

/// Returns the traffic section of a request path.
///
/// The section runs up to (not including) the first `/` after the leading one,
/// or is the whole path when there is none. A query string is never part of it.
///
/// `/api/users/42?x=1` -> `/api`, `/health` -> `/health`, `/` -> `/`.
pub fn section_of(path: &str) -> &str {
    let section = match path.get(1..).and_then(|rest| rest.find('/')) {
        Some(idx) => &path[..idx + 1],
        None => path,
    };

    match section.find('?') {
        Some(idx) => &section[..idx],
        None => section,
    }
}

/// Extracts the session token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` for a missing header, another scheme, or an empty token. The scheme is
/// matched case-insensitively.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

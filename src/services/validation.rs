/// Minimum accepted password length for signup, reset, and change flows
pub const MIN_PASSWORD_LEN: usize = 8;

/// Shallow email shape check: one '@' with a dotted, non-empty domain.
/// Deliverability is not verified here; the reset-email flow is the
/// authoritative test.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !email.contains(char::is_whitespace)
}

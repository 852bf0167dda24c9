//! ARN helpers and console sign-in links

/// Sign-in domain of the commercial AWS partition
pub const DEFAULT_SIGN_IN_DOMAIN: &str = "aws.amazon.com";

/// Extract the account number from an ARN (field 5 in colon-delimited format)
pub fn account_number(arn: &str) -> Option<&str> {
    let mut parts = arn.split(':');
    let account = parts.nth(4)?;
    // A resource segment must follow the account
    parts.next()?;
    if account.is_empty() {
        return None;
    }
    Some(account)
}

/// Console sign-in URL for an account, e.g. `https://123456789012.signin.aws.amazon.com/console`
pub fn sign_in_url(account: &str, domain: &str) -> String {
    format!("https://{account}.signin.{domain}/console")
}

//! Text and JSON rendering for command results

use anyhow::{Context, Result};
use iamc_access_control::{sign_in_url, User};

const RULE: &str = "-------------------------------------------------------";

pub fn sign_in_line(user: &User, domain: &str) -> Option<String> {
    user.account_number().map(|account| {
        format!(
            "This account's sign-in link: {}",
            sign_in_url(account, domain)
        )
    })
}

pub fn users_table(users: &[User], domain: &str) -> String {
    let mut out = format!("{RULE}\nUser Id\t\t\tUser Name\tCreated\n{RULE}\n");
    for user in users {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            user.user_id,
            user.user_name,
            user.create_date.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    out.push_str(&format!("{RULE}\nTotal {} users.\n", users.len()));
    if let Some(line) = users.first().and_then(|u| sign_in_line(u, domain)) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn users_json(users: &[User]) -> Result<String> {
    serde_json::to_string_pretty(users).context("Failed to serialize users")
}

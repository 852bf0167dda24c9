use crate::grants::Service;
use crate::types::{PolicyDocument, Statement};

pub const POLICY_VERSION: &str = "2012-10-17";

/// Build the group policy for a service: allow every action of the
/// service's namespace on every resource.
///
/// The document id is the group name, so the policy stored on a group always
/// identifies the one service it represents.
pub fn build_service_policy(service: Service) -> PolicyDocument {
    let grant = service.grant();
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        id: Some(grant.group_name.to_string()),
        statement: vec![Statement {
            sid: statement_sid(grant.action_namespace),
            effect: "Allow".to_string(),
            action: grant.all_actions(),
            resource: "*".to_string(),
        }],
    }
}

/// Statement ids must be alphanumeric: `ec2` -> `IamcAllowEc2`
fn statement_sid(namespace: &str) -> String {
    let mut chars = namespace.chars().filter(char::is_ascii_alphanumeric);
    let head = chars.next().map(|c| c.to_ascii_uppercase());
    head.into_iter()
        .chain(chars)
        .fold(String::from("IamcAllow"), |mut sid, c| {
            sid.push(c);
            sid
        })
}

//! Node profiles - connection and tuning descriptors for one MySQL endpoint.
//!
//! Passwords are stored in plaintext, exactly as entered.

use crate::error::ReplicaError;
use serde::{Deserialize, Serialize};

fn default_auto_increment_increment() -> u32 {
    2
}

fn default_auto_increment_offset() -> u32 {
    1
}

/// A stored MySQL endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeProfile {
    /// Registry identifier, assigned on insert and never changed
    pub id: String,
    /// Display label (not unique)
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// MySQL server_id
    pub server_id: u32,
    #[serde(default = "default_auto_increment_increment")]
    pub auto_increment_increment: u32,
    #[serde(default = "default_auto_increment_offset")]
    pub auto_increment_offset: u32,
}

impl NodeProfile {
    /// `host:port`, for display and logs
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Replace every field except the id with the draft's values
    pub fn replaced_by(&self, draft: NodeDraft) -> Result<NodeProfile, ReplicaError> {
        draft.into_profile(self.id.clone())
    }

    /// Apply the same trimming and checks as an insert
    pub fn normalized(self) -> Result<NodeProfile, ReplicaError> {
        let NodeProfile {
            id,
            name,
            host,
            port,
            user,
            password,
            server_id,
            auto_increment_increment,
            auto_increment_offset,
        } = self;
        NodeDraft {
            name,
            host,
            port,
            user,
            password,
            server_id,
            auto_increment_increment,
            auto_increment_offset,
        }
        .into_profile(id)
    }
}

/// A node profile without an identifier, as collected from the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDraft {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub server_id: u32,
    #[serde(default = "default_auto_increment_increment")]
    pub auto_increment_increment: u32,
    #[serde(default = "default_auto_increment_offset")]
    pub auto_increment_offset: u32,
}

impl NodeDraft {
    pub fn new(name: &str, host: &str, port: u16, user: &str, password: &str, server_id: u32) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            port,
            user: user.to_string(),
            password: password.to_string(),
            server_id,
            auto_increment_increment: default_auto_increment_increment(),
            auto_increment_offset: default_auto_increment_offset(),
        }
    }

    /// Set auto-increment coordination values
    pub fn with_auto_increment(mut self, increment: u32, offset: u32) -> Self {
        self.auto_increment_increment = increment;
        self.auto_increment_offset = offset;
        self
    }

    /// Normalise and attach an id. Name, host and user are trimmed; the
    /// password is kept verbatim.
    pub fn into_profile(self, id: String) -> Result<NodeProfile, ReplicaError> {
        let host = self.host.trim().to_string();
        if host.is_empty() {
            return Err(ReplicaError::InvalidNode("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ReplicaError::InvalidNode("port must be a positive integer".to_string()));
        }

        Ok(NodeProfile {
            id,
            name: self.name.trim().to_string(),
            host,
            port: self.port,
            user: self.user.trim().to_string(),
            password: self.password,
            server_id: self.server_id,
            auto_increment_increment: self.auto_increment_increment,
            auto_increment_offset: self.auto_increment_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_is_trimmed() {
        let draft = NodeDraft::new("  db-a ", " 10.0.0.5 ", 3306, " root ", " secret ", 1);
        let node = draft.into_profile("n1".to_string()).unwrap();

        assert_eq!(node.name, "db-a");
        assert_eq!(node.host, "10.0.0.5");
        assert_eq!(node.user, "root");
        assert_eq!(node.password, " secret ");
    }

    #[test]
    fn test_zero_port_rejected() {
        let draft = NodeDraft::new("a", "db", 0, "root", "pw", 1);
        let err = draft.into_profile("n1".to_string()).unwrap_err();
        assert_eq!(err.code(), "invalid_node");
    }

    #[test]
    fn test_auto_increment_defaults_when_missing() {
        let json = r#"{"id":"x","name":"a","host":"h","port":3306,"user":"u","password":"p","server_id":7}"#;
        let node: NodeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(node.auto_increment_increment, 2);
        assert_eq!(node.auto_increment_offset, 1);
    }

    #[test]
    fn test_normalized_trims_and_checks_host() {
        let mut node = NodeDraft::new("a", "h", 3306, "root", "pw", 1)
            .into_profile("n1".to_string())
            .unwrap();
        node.name = " b ".to_string();
        let node = node.normalized().unwrap();
        assert_eq!(node.name, "b");
        assert_eq!(node.id, "n1");

        let mut blank = node;
        blank.host = String::new();
        assert_eq!(blank.normalized().unwrap_err().code(), "invalid_node");
    }

    #[test]
    fn test_replaced_by_keeps_id() {
        let original = NodeDraft::new("a", "h1", 3306, "root", "pw", 1)
            .into_profile("keep-me".to_string())
            .unwrap();
        let updated = original
            .replaced_by(NodeDraft::new("b", "h2", 3307, "admin", "pw2", 9))
            .unwrap();

        assert_eq!(updated.id, "keep-me");
        assert_eq!(updated.host, "h2");
        assert_eq!(updated.server_id, 9);
    }
}

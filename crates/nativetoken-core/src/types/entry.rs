//! Registered token entries

use super::{Apl, TokenId, TokenRequest};

/// One registered native process and the capability set it declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntry {
    /// Packed token id assigned at first registration
    pub token_id: TokenId,
    /// Declared access protection level
    pub apl: Apl,
    /// Lookup key, unique within a registry
    pub process_name: String,
    /// Data capabilities, order preserved
    pub dcaps: Vec<String>,
    /// Permissions, order preserved
    pub perms: Vec<String>,
    /// Native ACLs, never longer than `perms`
    pub acls: Vec<String>,
}

/// The part of an entry a re-registration may replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Access protection level
    pub apl: Apl,
    /// Data capabilities
    pub dcaps: Vec<String>,
    /// Permissions
    pub perms: Vec<String>,
    /// Native ACLs
    pub acls: Vec<String>,
}

impl TokenEntry {
    /// Build a fresh entry from a validated request
    pub fn from_request(token_id: TokenId, apl: Apl, request: &TokenRequest) -> Self {
        Self {
            token_id,
            apl,
            process_name: request.process_name.clone(),
            dcaps: request.dcaps.clone(),
            perms: request.perms.clone(),
            acls: request.acls.clone(),
        }
    }

    /// Whether `apl`/`dcaps` or `perms` differ from what is stored.
    ///
    /// ACLs are not compared; they are replaced only alongside a change to
    /// one of the compared fields.
    pub fn declaration_differs(&self, apl: Apl, request: &TokenRequest) -> bool {
        self.apl != apl || self.dcaps != request.dcaps || self.perms != request.perms
    }

    /// Current declaration, kept so a failed update can be undone
    pub fn declaration(&self) -> Declaration {
        Declaration {
            apl: self.apl,
            dcaps: self.dcaps.clone(),
            perms: self.perms.clone(),
            acls: self.acls.clone(),
        }
    }

    /// Replace the declaration wholesale, returning the previous one
    pub fn replace_declaration(&mut self, next: Declaration) -> Declaration {
        Declaration {
            apl: std::mem::replace(&mut self.apl, next.apl),
            dcaps: std::mem::replace(&mut self.dcaps, next.dcaps),
            perms: std::mem::replace(&mut self.perms, next.perms),
            acls: std::mem::replace(&mut self.acls, next.acls),
        }
    }
}

impl Declaration {
    /// Declaration carried by a validated request
    pub fn from_request(apl: Apl, request: &TokenRequest) -> Self {
        Self {
            apl,
            dcaps: request.dcaps.clone(),
            perms: request.perms.clone(),
            acls: request.acls.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenType;

    fn request() -> TokenRequest {
        TokenRequest {
            process_name: "foo".to_string(),
            dcaps: vec!["A".to_string()],
            perms: vec!["p1".to_string(), "p2".to_string()],
            acls: vec![],
            apl: Some("system_basic".to_string()),
        }
    }

    #[test]
    fn test_unchanged_declaration() {
        let req = request();
        let entry = TokenEntry::from_request(
            TokenId::new(1, TokenType::Native, 1),
            Apl::SystemBasic,
            &req,
        );
        assert!(!entry.declaration_differs(Apl::SystemBasic, &req));
        assert!(entry.declaration_differs(Apl::SystemCore, &req));
    }

    #[test]
    fn test_perm_order_matters() {
        let req = request();
        let entry = TokenEntry::from_request(
            TokenId::new(1, TokenType::Native, 1),
            Apl::SystemBasic,
            &req,
        );
        let mut swapped = req.clone();
        swapped.perms.reverse();
        assert!(entry.declaration_differs(Apl::SystemBasic, &swapped));
    }

    #[test]
    fn test_acl_only_change_not_detected() {
        let req = request();
        let entry = TokenEntry::from_request(
            TokenId::new(1, TokenType::Native, 1),
            Apl::SystemBasic,
            &req,
        );
        let mut with_acl = req.clone();
        with_acl.acls.push("p1".to_string());
        assert!(!entry.declaration_differs(Apl::SystemBasic, &with_acl));
    }

    #[test]
    fn test_replace_returns_previous() {
        let req = request();
        let mut entry = TokenEntry::from_request(
            TokenId::new(1, TokenType::Native, 1),
            Apl::SystemBasic,
            &req,
        );
        let mut next = req.clone();
        next.dcaps = vec!["B".to_string(), "C".to_string()];
        let previous =
            entry.replace_declaration(Declaration::from_request(Apl::SystemCore, &next));
        assert_eq!(previous.dcaps, vec!["A".to_string()]);
        assert_eq!(previous.apl, Apl::SystemBasic);
        assert_eq!(entry.dcaps.len(), 2);
        assert_eq!(entry.apl, Apl::SystemCore);
    }
}

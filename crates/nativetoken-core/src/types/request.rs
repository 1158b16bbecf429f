//! Token requests and their validation
//!
//! [`TokenRequest`] is the owned form used by Rust callers. [`TokenInfoParams`]
//! mirrors the C calling convention, with declared counts and optional
//! slices, so that negative counts and missing entries can be rejected
//! instead of being unrepresentable.

use super::Apl;
use crate::errors::{Result, TokenError};
use crate::limits::{
    MAX_ACL_NUM, MAX_DCAPS_NUM, MAX_DCAP_LEN, MAX_PERM_LEN, MAX_PERM_NUM, MAX_PROCESS_NAME_LEN,
};

/// Count and length bounds for one string-array field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListBounds {
    /// Field name used in error messages
    pub field: &'static str,
    /// Largest accepted element count
    pub max_num: usize,
    /// Largest accepted element length in bytes
    pub max_len: usize,
}

impl ListBounds {
    /// Bounds on `dcaps`
    pub const DCAPS: ListBounds = ListBounds {
        field: "dcaps",
        max_num: MAX_DCAPS_NUM,
        max_len: MAX_DCAP_LEN,
    };
    /// Bounds on `perms`
    pub const PERMS: ListBounds = ListBounds {
        field: "perms",
        max_num: MAX_PERM_NUM,
        max_len: MAX_PERM_LEN,
    };
    /// Bounds on `acls`
    pub const ACLS: ListBounds = ListBounds {
        field: "acls",
        max_num: MAX_ACL_NUM,
        max_len: MAX_PERM_LEN,
    };

    /// Check count and per-element length; elements must be non-empty.
    /// The message names the field and the offending index.
    pub fn check<S: AsRef<str>>(&self, items: &[S]) -> std::result::Result<(), String> {
        if items.len() > self.max_num {
            return Err(format!(
                "{} count {} exceeds {}",
                self.field,
                items.len(),
                self.max_num
            ));
        }
        for (i, item) in items.iter().enumerate() {
            let len = item.as_ref().len();
            if len == 0 {
                return Err(format!("{}[{i}] is empty", self.field));
            }
            if len > self.max_len {
                return Err(format!(
                    "{}[{i}] length {len} exceeds {}",
                    self.field, self.max_len
                ));
            }
        }
        Ok(())
    }
}

/// Check a process name: non-empty and at most 256 bytes
pub fn check_process_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("processName is empty".to_string());
    }
    if name.len() > MAX_PROCESS_NAME_LEN {
        return Err(format!(
            "processName length {} exceeds {MAX_PROCESS_NAME_LEN}",
            name.len()
        ));
    }
    Ok(())
}

/// Capability set a native process declares when asking for a token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRequest {
    /// Lookup key for the registry
    pub process_name: String,
    /// Data capabilities
    pub dcaps: Vec<String>,
    /// Permissions
    pub perms: Vec<String>,
    /// Native ACLs
    pub acls: Vec<String>,
    /// Access protection level string (`normal`, `system_basic`, `system_core`)
    pub apl: Option<String>,
}

impl TokenRequest {
    /// Validate the request in field order and return its parsed APL.
    ///
    /// The first failing field aborts validation.
    pub fn validate(&self) -> Result<Apl> {
        check_process_name(&self.process_name).map_err(TokenError::invalid_request)?;
        ListBounds::DCAPS
            .check(&self.dcaps)
            .map_err(TokenError::invalid_request)?;
        ListBounds::PERMS
            .check(&self.perms)
            .map_err(TokenError::invalid_request)?;
        ListBounds::ACLS
            .check(&self.acls)
            .map_err(TokenError::invalid_request)?;
        if self.acls.len() > self.perms.len() {
            return Err(TokenError::invalid_request(format!(
                "acls count {} exceeds perms count {}",
                self.acls.len(),
                self.perms.len()
            )));
        }
        match self.apl.as_deref() {
            Some(apl) => apl.parse(),
            None => Err(TokenError::invalid_request("aplStr is missing")),
        }
    }
}

/// Borrowed request shaped like the C entry point
///
/// Counts are signed and declared separately from the slices they describe.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenInfoParams<'a> {
    /// Declared number of dcaps
    pub dcaps_num: i32,
    /// Declared number of permissions
    pub perms_num: i32,
    /// Declared number of ACLs
    pub acls_num: i32,
    /// Dcap entries; may be absent when `dcaps_num` is zero
    pub dcaps: Option<&'a [Option<&'a str>]>,
    /// Permission entries; may be absent when `perms_num` is zero
    pub perms: Option<&'a [Option<&'a str>]>,
    /// ACL entries; may be absent when `acls_num` is zero
    pub acls: Option<&'a [Option<&'a str>]>,
    /// Process name
    pub process_name: Option<&'a str>,
    /// Access protection level string
    pub apl_str: Option<&'a str>,
}

fn collect_list(
    bounds: ListBounds,
    declared: i32,
    items: Option<&[Option<&str>]>,
) -> Result<Vec<String>> {
    let count = usize::try_from(declared).map_err(|_| {
        TokenError::invalid_request(format!("{} count {declared} is negative", bounds.field))
    })?;
    if count > bounds.max_num {
        return Err(TokenError::invalid_request(format!(
            "{} count {count} exceeds {}",
            bounds.field, bounds.max_num
        )));
    }
    if count == 0 {
        return Ok(Vec::new());
    }
    let items = items.ok_or_else(|| {
        TokenError::invalid_request(format!("{} is missing with count {count}", bounds.field))
    })?;
    if items.len() < count {
        return Err(TokenError::invalid_request(format!(
            "{} holds {} entries, {count} declared",
            bounds.field,
            items.len()
        )));
    }
    let mut owned = Vec::with_capacity(count);
    for (i, item) in items[..count].iter().enumerate() {
        match item {
            Some(s) => owned.push((*s).to_string()),
            None => {
                return Err(TokenError::invalid_request(format!(
                    "{}[{i}] is missing",
                    bounds.field
                )))
            }
        }
    }
    Ok(owned)
}

impl<'a> TokenInfoParams<'a> {
    /// Convert into an owned request, rejecting what only the C shape can
    /// express: missing name, negative counts, missing slices or entries.
    ///
    /// Length and emptiness checks are left to [`TokenRequest::validate`].
    pub fn to_request(&self) -> Result<TokenRequest> {
        let process_name = self
            .process_name
            .ok_or_else(|| TokenError::invalid_request("processName is missing"))?;
        check_process_name(process_name).map_err(TokenError::invalid_request)?;
        let dcaps = collect_list(ListBounds::DCAPS, self.dcaps_num, self.dcaps)?;
        let perms = collect_list(ListBounds::PERMS, self.perms_num, self.perms)?;
        let acls = collect_list(ListBounds::ACLS, self.acls_num, self.acls)?;
        Ok(TokenRequest {
            process_name: process_name.to_string(),
            dcaps,
            perms,
            acls,
            apl: self.apl_str.map(str::to_string),
        })
    }
}

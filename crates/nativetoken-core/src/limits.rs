//! Size and count bounds enforced on requests and persisted records

/// Longest accepted process name, in bytes
pub const MAX_PROCESS_NAME_LEN: usize = 256;
/// Most dcaps a process may declare
pub const MAX_DCAPS_NUM: usize = 32;
/// Longest accepted dcap, in bytes
pub const MAX_DCAP_LEN: usize = 1024;
/// Most permissions a process may declare
pub const MAX_PERM_NUM: usize = 64;
/// Longest accepted permission or ACL, in bytes
pub const MAX_PERM_LEN: usize = 256;
/// Most ACLs a process may declare
pub const MAX_ACL_NUM: usize = MAX_PERM_NUM;
/// Upper bound on the config file size, in bytes
pub const MAX_JSON_FILE_LEN: u64 = 102_400;
/// Draws attempted before giving up on a fresh unique id
pub const MAX_RETRY_TIMES: u32 = 1000;

/// Process name that receives a shell-typed token
pub const DEFAULT_SHELL_PROCESS_NAME: &str = "hdcd";
/// Default location of the persisted registry
pub const DEFAULT_TOKEN_FILE_PATH: &str = "/data/service/el0/access_token/nativetoken.json";
/// Owner read/write, group read
pub const DEFAULT_TOKEN_FILE_MODE: u32 = 0o640;

//! Config file codec
//!
//! The registry file is a JSON array with one object per registered process:
//!
//! ```json
//! [{"processName":"foo","APL":2,"version":1,"tokenId":672137509,"tokenAttr":0,
//!   "dcaps":["A"],"permissions":["p1","p2"],"nativeAcls":[]}]
//! ```
//!
//! Records are handled as `serde_json::Value` trees rather than derived
//! structs so that `update` touches only the fields it owns and leaves any
//! other keys in place.

use nativetoken_core::types::check_process_name;
use nativetoken_core::types::DEFAULT_TOKEN_VERSION;
use nativetoken_core::{
    Apl, ListBounds, Result, TokenEntry, TokenError, TokenId, TokenStoreEffects,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Key holding the process name
pub const PROCESS_KEY_NAME: &str = "processName";
/// Key holding the numeric access protection level
pub const APL_KEY_NAME: &str = "APL";
/// Key holding the record format version
pub const VERSION_KEY_NAME: &str = "version";
/// Key holding the packed token id
pub const TOKEN_ID_KEY_NAME: &str = "tokenId";
/// Key holding the token attribute word
pub const TOKEN_ATTR_KEY_NAME: &str = "tokenAttr";
/// Key holding the dcap array
pub const DCAPS_KEY_NAME: &str = "dcaps";
/// Key holding the permission array
pub const PERMS_KEY_NAME: &str = "permissions";
/// Key holding the native ACL array
pub const ACLS_KEY_NAME: &str = "nativeAcls";

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// Encode one entry as a JSON object
pub fn to_json(entry: &TokenEntry) -> Value {
    let mut object = Map::new();
    object.insert(
        PROCESS_KEY_NAME.to_string(),
        Value::String(entry.process_name.clone()),
    );
    object.insert(APL_KEY_NAME.to_string(), Value::from(entry.apl.level()));
    object.insert(
        VERSION_KEY_NAME.to_string(),
        Value::from(DEFAULT_TOKEN_VERSION),
    );
    object.insert(
        TOKEN_ID_KEY_NAME.to_string(),
        Value::from(entry.token_id.as_u32()),
    );
    object.insert(TOKEN_ATTR_KEY_NAME.to_string(), Value::from(0u32));
    object.insert(DCAPS_KEY_NAME.to_string(), string_array(&entry.dcaps));
    object.insert(PERMS_KEY_NAME.to_string(), string_array(&entry.perms));
    object.insert(ACLS_KEY_NAME.to_string(), string_array(&entry.acls));
    Value::Object(object)
}

fn decode_string_array(
    object: &Map<String, Value>,
    key: &str,
    bounds: ListBounds,
) -> Result<Vec<String>> {
    let items = object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| TokenError::malformed(format!("{key} is missing or not an array")))?;

    let strings = items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| TokenError::malformed(format!("{key} holds a non-string")))
        })
        .collect::<Result<Vec<_>>>()?;

    bounds.check(&strings).map_err(TokenError::malformed)?;
    Ok(strings)
}

/// Decode and bound-check one JSON object
pub fn from_json(value: &Value) -> Result<TokenEntry> {
    let object = value
        .as_object()
        .ok_or_else(|| TokenError::malformed("record is not an object"))?;

    let process_name = object
        .get(PROCESS_KEY_NAME)
        .and_then(Value::as_str)
        .ok_or_else(|| TokenError::malformed("processName is missing or not a string"))?;
    check_process_name(process_name).map_err(TokenError::malformed)?;

    let raw_id = object
        .get(TOKEN_ID_KEY_NAME)
        .and_then(Value::as_u64)
        .and_then(|raw| u32::try_from(raw).ok())
        .ok_or_else(|| TokenError::malformed(format!("tokenId of {process_name} is invalid")))?;
    let token_id = TokenId::from_raw(raw_id);
    if token_id.token_type().is_none() {
        return Err(TokenError::malformed(format!(
            "tokenId {token_id} of {process_name} has type bits {}",
            token_id.type_bits()
        )));
    }

    let apl = object
        .get(APL_KEY_NAME)
        .and_then(Value::as_i64)
        .ok_or_else(|| TokenError::malformed(format!("APL of {process_name} is not an integer")))
        .and_then(Apl::try_from)?;

    let dcaps = decode_string_array(object, DCAPS_KEY_NAME, ListBounds::DCAPS)?;
    let perms = decode_string_array(object, PERMS_KEY_NAME, ListBounds::PERMS)?;
    let acls = decode_string_array(object, ACLS_KEY_NAME, ListBounds::ACLS)?;
    if acls.len() > perms.len() {
        return Err(TokenError::malformed(format!(
            "{process_name} lists more ACLs than permissions"
        )));
    }

    Ok(TokenEntry {
        token_id,
        apl,
        process_name: process_name.to_string(),
        dcaps,
        perms,
        acls,
    })
}

fn record_name(record: &Value) -> Option<&str> {
    record.get(PROCESS_KEY_NAME).and_then(Value::as_str)
}

/// Reads and rewrites the registry file through a store
#[derive(Debug)]
pub struct TokenFileCodec<'s, S> {
    store: &'s S,
    max_file_size: u64,
}

impl<'s, S: TokenStoreEffects> TokenFileCodec<'s, S> {
    /// Codec over `store`, refusing files larger than `max_file_size`
    pub fn new(store: &'s S, max_file_size: u64) -> Self {
        Self {
            store,
            max_file_size,
        }
    }

    /// Raw array; `None` if the file does not exist
    fn read_records(&self) -> Result<Option<Vec<Value>>> {
        let Some(text) = self.store.read(self.max_file_size)? else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Array(records) => Ok(Some(records)),
            _ => Err(TokenError::malformed("token file root is not an array")),
        }
    }

    fn write_records(&self, records: Vec<Value>) -> Result<()> {
        let text = serde_json::to_string(&Value::Array(records))?;
        self.store.write(&text)
    }

    /// Load every entry in file order.
    ///
    /// `Ok(None)` means the file does not exist (first run). Any invalid
    /// record fails the whole load.
    pub fn load(&self) -> Result<Option<Vec<TokenEntry>>> {
        let Some(records) = self.read_records()? else {
            return Ok(None);
        };
        let entries = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                from_json(record).map_err(|e| match e {
                    TokenError::MalformedRecord { message } => {
                        TokenError::malformed(format!("record {i}: {message}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "Loaded {} token entries from {}",
            entries.len(),
            self.store.location()
        );
        Ok(Some(entries))
    }

    /// Records to extend on append. A missing, unparseable or non-array
    /// file starts a new array.
    fn records_for_append(&self) -> Result<Vec<Value>> {
        match self.read_records() {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(e @ (TokenError::Serialization { .. } | TokenError::MalformedRecord { .. })) => {
                warn!(
                    "Replacing unreadable contents of {}: {}",
                    self.store.location(),
                    e
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Add one record to the end of the array
    pub fn append(&self, entry: &TokenEntry) -> Result<()> {
        let mut records = self.records_for_append()?;
        records.push(to_json(entry));
        self.write_records(records)
    }

    /// Append unless a record with the same process name is already in the
    /// file. Returns whether anything was written.
    pub fn append_if_absent(&self, entry: &TokenEntry) -> Result<bool> {
        let mut records = self.records_for_append()?;
        if records
            .iter()
            .any(|record| record_name(record) == Some(entry.process_name.as_str()))
        {
            return Ok(false);
        }
        records.push(to_json(entry));
        self.write_records(records)?;
        Ok(true)
    }

    /// Replace the declaration fields of the record named like `entry`.
    /// With duplicate names the last record is the live one.
    pub fn update(&self, entry: &TokenEntry) -> Result<()> {
        let mut records = self
            .read_records()?
            .ok_or_else(|| TokenError::not_found(format!("{} does not exist", self.store.location())))?;

        let record = records
            .iter_mut()
            .rev()
            .find(|record| record_name(record) == Some(entry.process_name.as_str()))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                TokenError::not_found(format!("no record for {}", entry.process_name))
            })?;

        record.insert(APL_KEY_NAME.to_string(), Value::from(entry.apl.level()));
        record.insert(DCAPS_KEY_NAME.to_string(), string_array(&entry.dcaps));
        record.insert(PERMS_KEY_NAME.to_string(), string_array(&entry.perms));
        record.insert(ACLS_KEY_NAME.to_string(), string_array(&entry.acls));

        self.write_records(records)
    }

    /// Delete every record named `process_name`; `false` if there was none
    pub fn remove(&self, process_name: &str) -> Result<bool> {
        let Some(mut records) = self.read_records()? else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|record| record_name(record) != Some(process_name));
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(records)?;
        Ok(true)
    }
}

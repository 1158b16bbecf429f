//! Token registry service
//!
//! [`TokenRegistry`] is the context object every registry operation goes
//! through. It owns its entropy source, its store and the in-memory list,
//! and initializes itself lazily from the store on first use.
//!
//! Operations take `&mut self`: the registry has no internal locking and
//! callers sharing one across threads must serialize access themselves.
//! Nothing guards the file against other processes; the last writer wins.

use crate::codec::TokenFileCodec;
use crate::id_generator::TokenIdGenerator;
use crate::token_list::TokenList;
use nativetoken_core::{
    Declaration, RandomEffects, RegistryConfig, Result, TokenEntry, TokenError, TokenIdEx,
    TokenInfoParams, TokenRequest, TokenStoreEffects, INVALID_TOKEN_ID,
};
use tracing::{debug, error, info, warn};

#[derive(Debug)]
enum RegistryState {
    Uninitialized,
    Ready(TokenList),
}

fn ready_list(state: &mut RegistryState) -> Result<&mut TokenList> {
    match state {
        RegistryState::Ready(list) => Ok(list),
        RegistryState::Uninitialized => Err(TokenError::storage("token registry is not initialized")),
    }
}

/// Assigns, persists and looks up native process tokens
#[derive(Debug)]
pub struct TokenRegistry<R, S> {
    random: R,
    store: S,
    config: RegistryConfig,
    generator: TokenIdGenerator,
    state: RegistryState,
    /// Registered in memory but not yet written to the file
    pending: Vec<String>,
}

impl<R: RandomEffects, S: TokenStoreEffects> TokenRegistry<R, S> {
    /// Create an uninitialized registry; nothing is read until first use
    pub fn new(random: R, store: S, config: RegistryConfig) -> Self {
        let generator =
            TokenIdGenerator::new(config.max_retry, config.shell_process_name.clone());
        Self {
            random,
            store,
            config,
            generator,
            state: RegistryState::Uninitialized,
            pending: Vec::new(),
        }
    }

    /// Whether the list has been loaded
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, RegistryState::Ready(_))
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Process names whose registration has not reached the file yet
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Load the list from the store if that has not happened yet.
    ///
    /// A missing file is created empty. On failure the registry stays
    /// uninitialized and the next call tries again.
    pub fn initialize(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let codec = TokenFileCodec::new(&self.store, self.config.max_file_size);
        let loaded = codec.load().and_then(|entries| match entries {
            Some(entries) => Ok(TokenList::from_entries(entries)),
            None => {
                self.store.create_empty()?;
                info!("Created token file {}", self.store.location());
                Ok(TokenList::new())
            }
        });

        match loaded {
            Ok(list) => {
                info!(
                    "Token registry initialized with {} entries from {}",
                    list.len(),
                    self.store.location()
                );
                self.state = RegistryState::Ready(list);
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to initialize token registry from {}: {}",
                    self.store.location(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Retry appends that failed on earlier calls. A name that reached the
    /// file some other way is not written twice.
    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let RegistryState::Ready(list) = &self.state else {
            return;
        };
        let codec = TokenFileCodec::new(&self.store, self.config.max_file_size);
        self.pending.retain(|name| match list.find(name) {
            None => false,
            Some(entry) => match codec.append_if_absent(entry) {
                Ok(true) => {
                    info!("Persisted deferred registration of {}", name);
                    false
                }
                Ok(false) => {
                    debug!("Deferred registration of {} already in file", name);
                    false
                }
                Err(e) => {
                    warn!("Registration of {} still not persisted: {}", name, e);
                    true
                }
            },
        });
    }

    /// Return the token for `request.process_name`, allocating and
    /// persisting one on first registration.
    ///
    /// A changed `apl`/`dcaps`/`perms` declaration replaces the stored one
    /// (ACLs included) and keeps the token id. If writing the change fails,
    /// the stored declaration is restored and the call fails. A failure to
    /// persist a new registration is logged and retried on later calls; the
    /// token is still returned.
    pub fn register(&mut self, request: &TokenRequest) -> Result<TokenIdEx> {
        self.initialize()?;
        let apl = request.validate()?;
        self.flush_pending();

        let list = ready_list(&mut self.state)?;
        let codec = TokenFileCodec::new(&self.store, self.config.max_file_size);
        let name = request.process_name.as_str();

        if let Some(existing) = list.find_mut(name) {
            if existing.declaration_differs(apl, request) {
                let previous =
                    existing.replace_declaration(Declaration::from_request(apl, request));
                if let Err(e) = codec.update(existing) {
                    existing.replace_declaration(previous);
                    warn!("Rolled back declaration change for {}: {}", name, e);
                    return Err(e);
                }
                info!("Updated declaration of {} ({})", name, existing.token_id);
            } else {
                debug!("Declaration of {} unchanged", name);
            }
            return Ok(TokenIdEx::new(existing.token_id, 0));
        }

        let token_id = self
            .generator
            .generate(&self.random, &list.unique_ids(), name)?;
        let entry = TokenEntry::from_request(token_id, apl, request);
        list.insert(entry.clone())?;
        info!("Allocated token {} for {}", token_id, name);

        if let Err(e) = codec.append(&entry) {
            warn!("Token for {} not persisted, will retry: {}", name, e);
            self.pending.push(entry.process_name);
        }

        Ok(TokenIdEx::new(token_id, 0))
    }

    /// C-shaped entry point: the packed 64-bit token, or
    /// [`INVALID_TOKEN_ID`] on any failure
    pub fn get_access_token_id(&mut self, params: &TokenInfoParams<'_>) -> u64 {
        let result = self
            .initialize()
            .and_then(|()| params.to_request())
            .and_then(|request| self.register(&request));

        match result {
            Ok(token) => token.as_u64(),
            Err(e) if e.is_validation() => {
                warn!("Rejected token request for {:?}: {}", params.process_name, e);
                INVALID_TOKEN_ID
            }
            Err(e) => {
                error!("Token request for {:?} failed: {}", params.process_name, e);
                INVALID_TOKEN_ID
            }
        }
    }

    /// Look up a registered entry by exact process name
    pub fn lookup(&mut self, process_name: &str) -> Result<Option<&TokenEntry>> {
        self.initialize()?;
        Ok(ready_list(&mut self.state)?.find(process_name))
    }

    /// All registered entries
    pub fn entries(&mut self) -> Result<&TokenList> {
        self.initialize()?;
        let list = ready_list(&mut self.state)?;
        Ok(&*list)
    }

    /// Delete a registration from memory and from the file.
    ///
    /// Not used on the allocation path; this is for operators and tests.
    /// If the file cannot be rewritten the in-memory entry is restored at
    /// its previous position.
    pub fn remove_token(&mut self, process_name: &str) -> Result<bool> {
        self.initialize()?;
        let list = ready_list(&mut self.state)?;
        let codec = TokenFileCodec::new(&self.store, self.config.max_file_size);

        let slot = list.position(process_name);
        let removed = list.remove(process_name);
        match codec.remove(process_name) {
            Ok(in_file) => {
                self.pending.retain(|name| name != process_name);
                if removed.is_some() || in_file {
                    info!("Removed token registration of {}", process_name);
                }
                Ok(removed.is_some() || in_file)
            }
            Err(e) => {
                if let (Some(slot), Some(entry)) = (slot, removed) {
                    list.insert_at(slot, entry)?;
                }
                Err(e)
            }
        }
    }
}

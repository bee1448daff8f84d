//! User name and uid resolution

use std::collections::HashMap;

use nix::unistd::{Uid, User};

/// Resolves a `--user` argument: a numeric uid or a user name.
///
/// A name that is not a known user but starts with digits resolves to
/// the uid those digits spell.
///
/// # Returns
/// * `Some(uid)` - the argument is numeric or names an existing user
/// * `None` - no such user
pub fn resolve_user(arg: &str) -> Option<u32> {
    if let Ok(uid) = arg.parse() {
        return Some(uid);
    }
    if let Some(user) = User::from_name(arg).ok().flatten() {
        return Some(user.uid.as_raw());
    }
    let digits = arg.find(|c: char| !c.is_ascii_digit()).unwrap_or(arg.len());
    arg[..digits].parse().ok()
}

/// Caches uid to name lookups across frames
#[derive(Debug, Default)]
pub struct UserNames {
    cache: HashMap<u32, String>,
}

impl UserNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user name for a uid, or the uid itself if unknown
    pub fn name(&mut self, uid: u32) -> &str {
        self.cache.entry(uid).or_insert_with(|| {
            User::from_uid(Uid::from_raw(uid))
                .ok()
                .flatten()
                .map(|user| user.name)
                .unwrap_or_else(|| uid.to_string())
        })
    }
}

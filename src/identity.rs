//! Identity cache: uid/gid to name resolution with memoization.
//!
//! # Overview
//!
//! Every reported file carries an owner and group name, but resolving a
//! numeric id against the platform account database is comparatively slow
//! and the same handful of ids recurs across a whole tree. The
//! [`IdentityCache`] memoizes every resolution for the life of one scan.
//!
//! Ids that no longer exist in the account database (deleted users, stale
//! groups) are not errors: `ls` prints the raw numeric id in that case and
//! so does this crate. The fallback is cached exactly like a successful
//! resolution so an unknown id never triggers repeated database queries.
//!
//! Owner and group ids live in independent numeric spaces, so the cache
//! keeps two separate maps rather than one keyed on the bare integer.
//!
//! # Example
//!
//! ```no_run
//! use dupels::identity::IdentityCache;
//!
//! let cache = IdentityCache::new();
//! println!("uid 0 is {}", cache.owner(0)); // "root" on any sane system
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

/// Oracle over the platform account database.
///
/// Abstracted behind a trait so tests can substitute an instrumented
/// implementation and count how often the database is actually queried.
pub trait AccountDatabase {
    /// Look up the user name for a uid, `None` if the account is unknown.
    fn user_name(&self, uid: u32) -> Option<String>;

    /// Look up the group name for a gid, `None` if the group is unknown.
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// The real account database, backed by `getpwuid`/`getgrgid`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAccounts;

impl AccountDatabase for SystemAccounts {
    fn user_name(&self, uid: u32) -> Option<String> {
        uzers::get_user_by_uid(uid).map(|u| u.name().to_string_lossy().into_owned())
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        uzers::get_group_by_gid(gid).map(|g| g.name().to_string_lossy().into_owned())
    }
}

/// Outcome of one id resolution.
///
/// The fallback is a first-class cached value, not an error: repeated
/// lookups of a dead id must be as cheap as lookups of a live one.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    /// The account database knew the id.
    Named(String),
    /// Unknown id; displayed as the stringified number, like `ls` does.
    FallbackToId(u32),
}

impl Resolution {
    fn display(&self) -> String {
        match self {
            Resolution::Named(name) => name.clone(),
            Resolution::FallbackToId(id) => id.to_string(),
        }
    }
}

/// Memoizing uid/gid resolver, scoped to one scan.
///
/// Safe for concurrent use: lookups take a read lock, and an unresolved id
/// is queried at most once because the miss path re-checks the map under
/// the write lock before touching the database.
pub struct IdentityCache<D = SystemAccounts> {
    database: D,
    owners: RwLock<HashMap<u32, Resolution>>,
    groups: RwLock<HashMap<u32, Resolution>>,
}

impl IdentityCache<SystemAccounts> {
    /// Create a cache backed by the real platform account database.
    #[must_use]
    pub fn new() -> Self {
        Self::with_database(SystemAccounts)
    }
}

impl Default for IdentityCache<SystemAccounts> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: AccountDatabase> IdentityCache<D> {
    /// Create a cache over a custom account database (used by tests).
    #[must_use]
    pub fn with_database(database: D) -> Self {
        Self {
            database,
            owners: RwLock::new(HashMap::new()),
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a uid to a user name, or to the stringified uid when the
    /// account no longer exists.
    pub fn owner(&self, uid: u32) -> String {
        Self::resolve(&self.owners, uid, || {
            self.database
                .user_name(uid)
                .map_or(Resolution::FallbackToId(uid), Resolution::Named)
        })
    }

    /// Resolve a gid to a group name, or to the stringified gid when the
    /// group no longer exists.
    pub fn group(&self, gid: u32) -> String {
        Self::resolve(&self.groups, gid, || {
            self.database
                .group_name(gid)
                .map_or(Resolution::FallbackToId(gid), Resolution::Named)
        })
    }

    fn resolve(
        map: &RwLock<HashMap<u32, Resolution>>,
        id: u32,
        query: impl FnOnce() -> Resolution,
    ) -> String {
        // Poisoning only happens if a writer panicked mid-insert; the map is
        // still a valid cache, so recover the guard either way.
        if let Some(hit) = map
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&id)
        {
            return hit.display();
        }

        let mut writer = map
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Re-check under the write lock so a lost race never re-queries.
        writer.entry(id).or_insert_with(query).display()
    }
}

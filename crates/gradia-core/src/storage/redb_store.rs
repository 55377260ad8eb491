//! Redb-backed member directory.
//!
//! Two tables, `profiles` and `competitions`, both keyed by the numeric
//! identifier with postcard-encoded rows. Single-row get/put run in their
//! own transactions; `load`/`store` move the whole directory in one
//! transaction for snapshot-style use.

use crate::completion::Competition;
use crate::directory::Directory;
use crate::profile::ProfileRecord;
use crate::{CompetitionId, Error, MemberId};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

const PROFILES: TableDefinition<u64, &[u8]> = TableDefinition::new("profiles");
const COMPETITIONS: TableDefinition<u64, &[u8]> = TableDefinition::new("competitions");

/// Disk-backed directory store.
pub struct RedbDirectory {
    db: Database,
}

impl RedbDirectory {
    /// Create a new database file (or open an existing one) and make sure
    /// both tables exist.
    pub fn create(path: &Path) -> Result<Self, Error> {
        let db = Database::create(path)?;
        let store = Self { db };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Open an existing database file.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let db = Database::open(path)?;
        let store = Self { db };
        store.ensure_tables()?;
        Ok(store)
    }

    // Opening a table inside a write transaction creates it when missing,
    // so reads never hit a TableDoesNotExist on a fresh database.
    fn ensure_tables(&self) -> Result<(), Error> {
        let txn = self.db.begin_write()?;
        txn.open_table(PROFILES)?;
        txn.open_table(COMPETITIONS)?;
        txn.commit()?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Single-row operations
    // -------------------------------------------------------------------------

    /// Insert or replace one member profile.
    pub fn put_profile(&self, member_id: MemberId, record: &ProfileRecord) -> Result<(), Error> {
        let bytes = postcard::to_stdvec(record)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PROFILES)?;
            table.insert(member_id.0, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Fetch one member profile.
    pub fn get_profile(&self, member_id: MemberId) -> Result<Option<ProfileRecord>, Error> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(PROFILES)?;
        let Some(guard) = table.get(member_id.0)? else {
            return Ok(None);
        };
        let record = postcard::from_bytes(guard.value())?;
        Ok(Some(record))
    }

    /// Insert or replace one competition listing.
    pub fn put_competition(&self, competition: &Competition) -> Result<(), Error> {
        let bytes = postcard::to_stdvec(competition)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(COMPETITIONS)?;
            table.insert(competition.id.0, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Fetch one competition listing.
    pub fn get_competition(&self, id: CompetitionId) -> Result<Option<Competition>, Error> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(COMPETITIONS)?;
        let Some(guard) = table.get(id.0)? else {
            return Ok(None);
        };
        let competition = postcard::from_bytes(guard.value())?;
        Ok(Some(competition))
    }

    // -------------------------------------------------------------------------
    // Whole-directory operations
    // -------------------------------------------------------------------------

    /// Load the full directory into memory.
    pub fn load(&self) -> Result<Directory, Error> {
        let txn = self.db.begin_read()?;
        let mut directory = Directory::new();

        let profiles = txn.open_table(PROFILES)?;
        for entry in profiles.iter()? {
            let (key, value) = entry?;
            let record: ProfileRecord = postcard::from_bytes(value.value())?;
            directory.upsert_profile(MemberId(key.value()), record);
        }

        let competitions = txn.open_table(COMPETITIONS)?;
        for entry in competitions.iter()? {
            let (_, value) = entry?;
            let competition: Competition = postcard::from_bytes(value.value())?;
            directory.insert_competition(competition);
        }

        Ok(directory)
    }

    /// Replace the database contents with the given directory.
    pub fn store(&self, directory: &Directory) -> Result<(), Error> {
        let txn = self.db.begin_write()?;
        txn.delete_table(PROFILES)?;
        txn.delete_table(COMPETITIONS)?;
        {
            let mut table = txn.open_table(PROFILES)?;
            for (member_id, record) in directory.members() {
                let bytes = postcard::to_stdvec(record)?;
                table.insert(member_id.0, bytes.as_slice())?;
            }
        }
        {
            let mut table = txn.open_table(COMPETITIONS)?;
            for (id, competition) in directory.competitions() {
                let bytes = postcard::to_stdvec(competition)?;
                table.insert(id.0, bytes.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! In-memory view of the category ↔ company link relation.
//!
//! The remote directory owns the truth: the full company catalog, and which
//! companies are linked to which category. [`RelationshipManager`] keeps the
//! last successfully fetched view of both and exposes the four operations an
//! interface layer needs: load the catalog, load one category's linked
//! companies, link, unlink.
//!
//! Two rules shape everything here:
//!
//! - **No optimistic mutation.** `link`/`unlink` never touch a cache. Success
//!   means the directory accepted the change; the caller re-fetches the linked
//!   list to obtain authoritative state. A failed mutation therefore cannot
//!   leave a phantom entry behind, and a timed-out one cannot hide a link that
//!   actually went through.
//! - **Last-issued fetch wins.** Fetches for the same key may overlap; each is
//!   tagged with a per-key sequence number and a response is applied only if
//!   no newer fetch for that key was issued in the meantime. Superseded
//!   responses are discarded, not cancelled.
//!
//! Failed reads leave the previous cache in place: showing slightly stale data
//! next to an error beats blanking the screen.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use api_types::{CategoryId, CompanyId, company::Company};

pub use error::{DirectoryError, RelationError};

mod error;

type ResultRelation<T> = Result<T, RelationError>;

/// Remote collaborator owning companies and the link relation.
///
/// Transport and wire format are the implementor's concern; list order is
/// preserved as received. Failures may carry a human-readable detail string,
/// which the manager surfaces verbatim.
pub trait Directory {
    /// Lists the full company catalog.
    fn companies(&self) -> impl Future<Output = Result<Vec<Company>, DirectoryError>> + Send;

    /// Lists the companies currently linked to `category`.
    fn companies_for_category(
        &self,
        category: CategoryId,
    ) -> impl Future<Output = Result<Vec<Company>, DirectoryError>> + Send;

    /// Links `company` to `category`. The directory is the authority on
    /// de-duplication.
    fn create_link(
        &self,
        company: CompanyId,
        category: CategoryId,
    ) -> impl Future<Output = Result<(), DirectoryError>> + Send;

    /// Removes the link between `company` and `category`.
    fn delete_link(
        &self,
        company: CompanyId,
        category: CategoryId,
    ) -> impl Future<Output = Result<(), DirectoryError>> + Send;
}

#[derive(Debug, Default)]
struct LinkedCache {
    /// Sequence number of the most recently issued fetch for this category.
    issued: u64,
    companies: Option<Vec<Company>>,
}

#[derive(Debug, Default)]
struct Caches {
    catalog_issued: u64,
    catalog: Option<Vec<Company>>,
    linked: HashMap<CategoryId, LinkedCache>,
}

/// Cached view of the link relation for one console session.
///
/// Calls may overlap (the interface layer is free to start a catalog load
/// while a linked-list fetch is in flight); the lock is only ever held between
/// awaits, never across one.
#[derive(Debug)]
pub struct RelationshipManager<D> {
    directory: D,
    caches: Mutex<Caches>,
}

impl<D: Directory> RelationshipManager<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            caches: Mutex::new(Caches::default()),
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    fn lock(&self) -> MutexGuard<'_, Caches> {
        self.caches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the full company catalog and returns it as cached.
    ///
    /// On failure the previously loaded catalog, if any, stays visible and
    /// [`RelationError::FetchFailed`] is returned. A superseded fetch reports
    /// the state left by the newer one instead of its own result.
    pub async fn load_company_catalog(&self) -> ResultRelation<Vec<Company>> {
        let seq = {
            let mut caches = self.lock();
            caches.catalog_issued += 1;
            caches.catalog_issued
        };

        let fetched = self.directory.companies().await;

        let mut caches = self.lock();
        if seq != caches.catalog_issued {
            tracing::debug!(seq, latest = caches.catalog_issued, "superseded catalog fetch discarded");
        } else {
            match fetched {
                Ok(companies) => caches.catalog = Some(companies),
                Err(err) => return Err(RelationError::fetch(err)),
            }
        }
        Ok(caches.catalog.clone().unwrap_or_default())
    }

    /// Fetches the companies linked to `category` and returns them as cached.
    ///
    /// Order is the directory's; a pair appearing twice in the response is
    /// collapsed to a single entry. Staleness and failure behave as in
    /// [`load_company_catalog`](Self::load_company_catalog).
    pub async fn load_linked_companies(
        &self,
        category: CategoryId,
    ) -> ResultRelation<Vec<Company>> {
        let seq = {
            let mut caches = self.lock();
            let entry = caches.linked.entry(category).or_default();
            entry.issued += 1;
            entry.issued
        };

        let fetched = self.directory.companies_for_category(category).await;

        let mut caches = self.lock();
        let Some(entry) = caches.linked.get_mut(&category) else {
            // Released while in flight; nothing to apply the response to.
            tracing::debug!(category, "fetch for released category discarded");
            return Ok(Vec::new());
        };
        if seq != entry.issued {
            tracing::debug!(category, seq, latest = entry.issued, "superseded linked fetch discarded");
        } else {
            match fetched {
                Ok(companies) => entry.companies = Some(dedup_by_id(companies)),
                Err(err) => return Err(RelationError::fetch(err)),
            }
        }
        Ok(entry.companies.clone().unwrap_or_default())
    }

    /// Links `company` to `category`.
    ///
    /// Rejects synchronously with [`RelationError::InvalidRequest`] when either
    /// identifier is unset — no directory call is made. Success does not touch
    /// any cache; call [`load_linked_companies`](Self::load_linked_companies)
    /// for the authoritative list.
    pub async fn link(
        &self,
        company: Option<CompanyId>,
        category: Option<CategoryId>,
    ) -> ResultRelation<()> {
        let (company, category) = selection(company, category)?;
        self.directory
            .create_link(company, category)
            .await
            .map_err(RelationError::link)?;
        tracing::debug!(company, category, "link created");
        Ok(())
    }

    /// Removes the link between `company` and `category`.
    ///
    /// Confirmation is the caller's job; the manager assumes it already
    /// happened. Same precondition and no-optimistic-update discipline as
    /// [`link`](Self::link).
    pub async fn unlink(
        &self,
        company: Option<CompanyId>,
        category: Option<CategoryId>,
    ) -> ResultRelation<()> {
        let (company, category) = selection(company, category)?;
        self.directory
            .delete_link(company, category)
            .await
            .map_err(RelationError::unlink)?;
        tracing::debug!(company, category, "link removed");
        Ok(())
    }

    /// Snapshot of the cached catalog, `None` before the first successful load.
    pub fn catalog(&self) -> Option<Vec<Company>> {
        self.lock().catalog.clone()
    }

    /// Snapshot of the cached linked list for `category`, `None` before the
    /// first successful load.
    pub fn linked(&self, category: CategoryId) -> Option<Vec<Company>> {
        self.lock()
            .linked
            .get(&category)
            .and_then(|entry| entry.companies.clone())
    }

    /// Drops the cached linked list for `category`, typically when its dialog
    /// closes. The catalog lives for the manager's lifetime and is unaffected.
    pub fn release_category(&self, category: CategoryId) {
        self.lock().linked.remove(&category);
    }
}

fn selection(
    company: Option<CompanyId>,
    category: Option<CategoryId>,
) -> ResultRelation<(CompanyId, CategoryId)> {
    match (company, category) {
        (Some(company), Some(category)) => Ok((company, category)),
        _ => Err(RelationError::InvalidRequest),
    }
}

fn dedup_by_id(companies: Vec<Company>) -> Vec<Company> {
    let mut seen = HashSet::new();
    companies
        .into_iter()
        .filter(|company| seen.insert(company.id))
        .collect()
}

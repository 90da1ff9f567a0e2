use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use api_types::company::Company;
use relations::{Directory, DirectoryError, RelationError, RelationshipManager};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Companies,
    Linked(i64),
    CreateLink(i64, i64),
    DeleteLink(i64, i64),
}

type ListReply = Result<Vec<Company>, DirectoryError>;

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    companies: VecDeque<(ListReply, Option<Arc<Notify>>)>,
    linked: VecDeque<(ListReply, Option<Arc<Notify>>)>,
    links: VecDeque<Result<(), DirectoryError>>,
    unlinks: VecDeque<Result<(), DirectoryError>>,
}

/// Directory double fed from scripted response queues. A reply can carry a
/// gate; the call then blocks until the test fires it, which is how response
/// ordering is forced in the staleness tests.
#[derive(Clone, Default)]
struct ScriptedDirectory {
    script: Arc<Mutex<Script>>,
}

impl ScriptedDirectory {
    fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push_companies(&self, reply: ListReply) {
        self.lock().companies.push_back((reply, None));
    }

    fn push_linked(&self, reply: ListReply) {
        self.lock().linked.push_back((reply, None));
    }

    fn push_linked_gated(&self, reply: ListReply, gate: Arc<Notify>) {
        self.lock().linked.push_back((reply, Some(gate)));
    }

    fn push_link(&self, reply: Result<(), DirectoryError>) {
        self.lock().links.push_back(reply);
    }

    fn push_unlink(&self, reply: Result<(), DirectoryError>) {
        self.lock().unlinks.push_back(reply);
    }

    fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }
}

impl Directory for ScriptedDirectory {
    async fn companies(&self) -> ListReply {
        let (reply, gate) = {
            let mut script = self.lock();
            script.calls.push(Call::Companies);
            script.companies.pop_front().expect("unscripted companies call")
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        reply
    }

    async fn companies_for_category(&self, category: i64) -> ListReply {
        let (reply, gate) = {
            let mut script = self.lock();
            script.calls.push(Call::Linked(category));
            script.linked.pop_front().expect("unscripted linked call")
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        reply
    }

    async fn create_link(&self, company: i64, category: i64) -> Result<(), DirectoryError> {
        let mut script = self.lock();
        script.calls.push(Call::CreateLink(company, category));
        script.links.pop_front().expect("unscripted create_link call")
    }

    async fn delete_link(&self, company: i64, category: i64) -> Result<(), DirectoryError> {
        let mut script = self.lock();
        script.calls.push(Call::DeleteLink(company, category));
        script.unlinks.pop_front().expect("unscripted delete_link call")
    }
}

fn company(id: i64, name: &str) -> Company {
    Company {
        id,
        name: name.to_string(),
        description: None,
        email: None,
        phone: None,
        address: None,
        is_active: true,
    }
}

#[tokio::test]
async fn link_then_refetch_lists_the_company_exactly_once() {
    let directory = ScriptedDirectory::new();
    directory.push_link(Ok(()));
    directory.push_linked(Ok(vec![company(1, "Marlin Tours")]));
    let manager = RelationshipManager::new(directory.clone());

    manager.link(Some(1), Some(7)).await.unwrap();
    // Success applies nothing locally until the caller re-fetches.
    assert_eq!(manager.linked(7), None);

    let linked = manager.load_linked_companies(7).await.unwrap();
    assert_eq!(linked.iter().filter(|c| c.id == 1).count(), 1);
    assert_eq!(
        directory.calls(),
        vec![Call::CreateLink(1, 7), Call::Linked(7)]
    );
}

#[tokio::test]
async fn unlink_then_refetch_drops_the_company() {
    let directory = ScriptedDirectory::new();
    directory.push_linked(Ok(vec![company(1, "Marlin Tours"), company(2, "Dune Rides")]));
    let manager = RelationshipManager::new(directory.clone());
    manager.load_linked_companies(7).await.unwrap();

    directory.push_unlink(Ok(()));
    manager.unlink(Some(1), Some(7)).await.unwrap();
    // No speculative removal before confirmation by re-fetch.
    assert_eq!(manager.linked(7).map(|l| l.len()), Some(2));

    directory.push_linked(Ok(vec![company(2, "Dune Rides")]));
    let linked = manager.load_linked_companies(7).await.unwrap();
    assert!(linked.iter().all(|c| c.id != 1));
}

#[tokio::test]
async fn missing_selection_is_rejected_before_any_directory_call() {
    let directory = ScriptedDirectory::new();
    let manager = RelationshipManager::new(directory.clone());

    assert_eq!(
        manager.link(None, Some(7)).await,
        Err(RelationError::InvalidRequest)
    );
    assert_eq!(
        manager.link(Some(1), None).await,
        Err(RelationError::InvalidRequest)
    );
    assert_eq!(
        manager.unlink(None, None).await,
        Err(RelationError::InvalidRequest)
    );
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn stale_linked_response_does_not_overwrite_a_newer_one() {
    let directory = ScriptedDirectory::new();
    let gate = Arc::new(Notify::new());
    directory.push_linked_gated(Ok(vec![company(1, "Old Crew")]), gate.clone());
    directory.push_linked(Ok(vec![company(2, "New Crew")]));
    let manager = Arc::new(RelationshipManager::new(directory.clone()));

    let older = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.load_linked_companies(7).await })
    };
    // Make sure the older fetch is issued (and parked on its gate) first.
    while directory.calls().is_empty() {
        tokio::task::yield_now().await;
    }

    let newer = manager.load_linked_companies(7).await.unwrap();
    assert_eq!(newer, vec![company(2, "New Crew")]);

    gate.notify_one();
    let older = older.await.unwrap().unwrap();
    // The superseded call reports the newer state, never its own stale data.
    assert_eq!(older, vec![company(2, "New Crew")]);
    assert_eq!(manager.linked(7), Some(vec![company(2, "New Crew")]));
}

#[tokio::test]
async fn rejected_link_carries_the_remote_detail_verbatim() {
    let directory = ScriptedDirectory::new();
    directory.push_link(Err(DirectoryError::Rejected {
        detail: Some("already linked".to_string()),
    }));
    let manager = RelationshipManager::new(directory);

    let err = manager.link(Some(1), Some(7)).await.unwrap_err();
    assert_eq!(err, RelationError::LinkFailed("already linked".to_string()));
}

#[tokio::test]
async fn rejected_unlink_without_detail_gets_a_generic_message() {
    let directory = ScriptedDirectory::new();
    directory.push_unlink(Err(DirectoryError::Rejected { detail: None }));
    let manager = RelationshipManager::new(directory);

    let err = manager.unlink(Some(1), Some(7)).await.unwrap_err();
    assert_eq!(
        err,
        RelationError::UnlinkFailed("rejected by the directory".to_string())
    );
}

#[tokio::test]
async fn catalog_failure_preserves_the_previous_catalog() {
    let directory = ScriptedDirectory::new();
    directory.push_companies(Ok(vec![
        company(1, "Marlin Tours"),
        company(2, "Dune Rides"),
        company(3, "Reef Divers"),
        company(4, "Cliff Walks"),
        company(5, "Bay Kayaks"),
    ]));
    let manager = RelationshipManager::new(directory.clone());
    assert_eq!(manager.load_company_catalog().await.unwrap().len(), 5);

    directory.push_companies(Err(DirectoryError::Unreachable(
        "connection refused".to_string(),
    )));
    let err = manager.load_company_catalog().await.unwrap_err();
    assert!(matches!(err, RelationError::FetchFailed(_)));
    assert_eq!(manager.catalog().map(|c| c.len()), Some(5));
}

#[tokio::test]
async fn linked_fetch_failure_preserves_the_previous_list() {
    let directory = ScriptedDirectory::new();
    directory.push_linked(Ok(vec![company(1, "Marlin Tours")]));
    let manager = RelationshipManager::new(directory.clone());
    manager.load_linked_companies(7).await.unwrap();

    directory.push_linked(Err(DirectoryError::Unreachable("timed out".to_string())));
    let err = manager.load_linked_companies(7).await.unwrap_err();
    assert_eq!(err, RelationError::FetchFailed("timed out".to_string()));
    assert_eq!(manager.linked(7), Some(vec![company(1, "Marlin Tours")]));
}

#[tokio::test]
async fn category_with_no_links_yields_an_empty_list() {
    let directory = ScriptedDirectory::new();
    directory.push_linked(Ok(Vec::new()));
    let manager = RelationshipManager::new(directory);

    assert_eq!(manager.load_linked_companies(7).await.unwrap(), Vec::new());
    assert_eq!(manager.linked(7), Some(Vec::new()));
}

#[tokio::test]
async fn duplicate_linked_rows_collapse_to_one_entry() {
    let directory = ScriptedDirectory::new();
    directory.push_linked(Ok(vec![
        company(1, "Marlin Tours"),
        company(1, "Marlin Tours"),
        company(2, "Dune Rides"),
    ]));
    let manager = RelationshipManager::new(directory);

    let linked = manager.load_linked_companies(7).await.unwrap();
    assert_eq!(
        linked.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[tokio::test]
async fn releasing_a_category_drops_its_list_but_not_the_catalog() {
    let directory = ScriptedDirectory::new();
    directory.push_companies(Ok(vec![company(1, "Marlin Tours")]));
    directory.push_linked(Ok(vec![company(1, "Marlin Tours")]));
    let manager = RelationshipManager::new(directory);
    manager.load_company_catalog().await.unwrap();
    manager.load_linked_companies(7).await.unwrap();

    manager.release_category(7);
    assert_eq!(manager.linked(7), None);
    assert!(manager.catalog().is_some());
}

//! In-memory [`Storage`] implementation.

use std::sync::{
    Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use common::{
    operations::{By, Delete, Insert, Select, Toggle, Update},
    pagination::Arguments,
};
use tracerr::Traced;

use crate::{
    domain::{distribution, request, Distribution, Request},
    infra::{storage, Storage},
    read,
};

/// In-memory [`Storage`] of distributions and requests.
///
/// A cheaply cloneable handle around the shared state. Every operation
/// acquires the state lock exactly once and completes inside it without
/// suspending, so mutations never interleave: a [`Request`] can never be
/// inserted against a concurrently deleted [`Distribution`], and the
/// derived request counts never drift.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Shared [`State`] of this [`Memory`] storage.
    state: Arc<RwLock<State>>,
}

/// State of a [`Memory`] storage.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Distribution`]s, most-recent-first.
    distributions: Vec<Distribution>,

    /// Stored [`Request`]s, in submission order.
    requests: Vec<Request>,
}

impl Memory {
    /// Creates a new [`Memory`] storage seeded with the provided entities.
    ///
    /// [`Request`]s not referencing any of the provided [`Distribution`]s
    /// are dropped, and every `request_count` is recomputed by scanning, so
    /// the seeded state always satisfies the same invariants the operations
    /// maintain incrementally.
    #[must_use]
    pub fn new(
        distributions: impl IntoIterator<Item = Distribution>,
        requests: impl IntoIterator<Item = Request>,
    ) -> Self {
        let mut distributions = distributions.into_iter().collect::<Vec<_>>();
        let requests = requests
            .into_iter()
            .filter(|r| {
                distributions.iter().any(|d| d.id == r.distribution_id)
            })
            .collect::<Vec<_>>();

        for d in &mut distributions {
            d.request_count = u32::try_from(
                requests
                    .iter()
                    .filter(|r| r.distribution_id == d.id)
                    .count(),
            )
            .unwrap_or(u32::MAX);
        }

        Self {
            state: Arc::new(RwLock::new(State {
                distributions,
                requests,
            })),
        }
    }

    /// Acquires the shared read lock on the [`State`].
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires the exclusive write lock on the [`State`].
    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage<Insert<Distribution>> for Memory {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Insert(distribution): Insert<Distribution>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write();
        state.distributions.insert(0, distribution);
        Ok(())
    }
}

impl Storage<Insert<Request>> for Memory {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut guard = self.write();
        let state = &mut *guard;

        let Some(distribution) = state
            .distributions
            .iter_mut()
            .find(|d| d.id == request.distribution_id)
        else {
            return Err(tracerr::new!(storage::Error::DistributionGone(
                request.distribution_id,
            )));
        };

        distribution.request_count =
            distribution.request_count.saturating_add(1);
        state.requests.push(request);

        Ok(())
    }
}

impl Storage<Update<distribution::Changes>> for Memory {
    type Ok = Distribution;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Update(changes): Update<distribution::Changes>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.write();

        let Some(distribution) =
            state.distributions.iter_mut().find(|d| d.id == changes.id)
        else {
            return Err(tracerr::new!(storage::Error::DistributionGone(
                changes.id,
            )));
        };

        changes.apply_to(distribution);

        Ok(distribution.clone())
    }
}

impl Storage<Toggle<By<Distribution, distribution::Id>>> for Memory {
    type Ok = Distribution;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Toggle(by): Toggle<By<Distribution, distribution::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut state = self.write();

        let Some(distribution) =
            state.distributions.iter_mut().find(|d| d.id == id)
        else {
            return Err(tracerr::new!(storage::Error::DistributionGone(id)));
        };

        // `Fulfilled` is terminal: left unchanged.
        if let Some(toggled) = distribution.status.toggled() {
            distribution.status = toggled;
        }

        Ok(distribution.clone())
    }
}

impl Storage<Update<request::StatusChange>> for Memory {
    type Ok = Request;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Update(change): Update<request::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let request::StatusChange { id, status } = change;
        let mut state = self.write();

        let Some(request) = state.requests.iter_mut().find(|r| r.id == id)
        else {
            return Err(tracerr::new!(storage::Error::RequestGone(id)));
        };

        request.status = request
            .status
            .transition_to(status)
            .map_err(|e| tracerr::new!(storage::Error::Transition(e)))?;

        Ok(request.clone())
    }
}

impl Storage<Delete<By<Distribution, distribution::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Distribution, distribution::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut guard = self.write();
        let state = &mut *guard;

        let Some(pos) = state.distributions.iter().position(|d| d.id == id)
        else {
            // Deletion is idempotent.
            return Ok(false);
        };

        _ = state.distributions.remove(pos);
        state.requests.retain(|r| r.distribution_id != id);

        Ok(true)
    }
}

impl Storage<Select<By<Option<Distribution>, distribution::Id>>> for Memory {
    type Ok = Option<Distribution>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Distribution>, distribution::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .read()
            .distributions
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }
}

impl Storage<Select<By<Option<Request>, request::Id>>> for Memory {
    type Ok = Option<Request>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Request>, request::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read().requests.iter().find(|r| r.id == id).cloned())
    }
}

impl Storage<Select<By<Vec<Request>, ()>>> for Memory {
    type Ok = Vec<Request>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Request>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.read().requests.clone())
    }
}

impl Storage<Select<By<Vec<Request>, distribution::Id>>> for Memory {
    type Ok = Vec<Request>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Request>, distribution::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .read()
            .requests
            .iter()
            .filter(|r| r.distribution_id == id)
            .cloned()
            .collect())
    }
}

impl
    Storage<
        Select<
            By<
                read::distribution::list::Page,
                read::distribution::list::Selector,
            >,
        >,
    > for Memory
{
    type Ok = read::distribution::list::Page;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                read::distribution::list::Page,
                read::distribution::list::Selector,
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::distribution::list::Selector { arguments, filter } =
            by.into_inner();

        let ids = self
            .read()
            .distributions
            .iter()
            .filter(|d| filter.matches(d))
            .map(|d| d.id)
            .collect::<Vec<_>>();
        let len = ids.len();

        let position =
            |cursor: &distribution::Id| ids.iter().position(|id| id == cursor);
        let (start, end, has_more) = match &arguments {
            Arguments::Forward {
                first,
                after,
                including,
            } => {
                let start = match after {
                    None => 0,
                    // Vanished cursor yields an empty page.
                    Some(cursor) => position(cursor)
                        .map_or(len, |pos| pos + usize::from(!*including)),
                };
                let end = start.saturating_add(*first).min(len);
                (start, end, end < len)
            }
            Arguments::Backward {
                last,
                before,
                including,
            } => {
                let end = match before {
                    None => len,
                    Some(cursor) => position(cursor)
                        .map_or(0, |pos| pos + usize::from(*including)),
                };
                let start = end.saturating_sub(*last);
                (start, end, start > 0)
            }
        };

        let edges = ids
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|id| (*id, *id));

        Ok(read::distribution::list::Page::new(
            &arguments, edges, has_more,
        ))
    }
}

impl
    Storage<Select<By<read::distribution::list::TotalCount, ()>>> for Memory
{
    type Ok = read::distribution::list::TotalCount;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::distribution::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(i32::try_from(self.read().distributions.len())
            .unwrap_or(i32::MAX)
            .into())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Delete, Insert, Select, Toggle, Update},
        pagination::Arguments,
        DateTime,
    };

    use crate::{
        domain::{distribution, request, Distribution, Request},
        infra::{storage, Storage as _},
        read::distribution::list,
    };

    use super::Memory;

    fn distribution(title: &str) -> Distribution {
        Distribution {
            id: distribution::Id::new(),
            title: title.parse().unwrap(),
            description: "Warm jackets for families in need".parse().unwrap(),
            category: "Clothing".parse().unwrap(),
            quantity: 10,
            location: "Downtown Community Center".parse().unwrap(),
            delivery_method: "Pickup".parse().unwrap(),
            status: distribution::Status::Active,
            request_count: 0,
            created_at: DateTime::now().coerce(),
            owner: "Sarah Johnson".parse().unwrap(),
        }
    }

    fn request(distribution_id: distribution::Id) -> Request {
        Request {
            id: request::Id::new(),
            distribution_id,
            requester_name: "Maria Rodriguez".parse().unwrap(),
            requester_email: "maria.rodriguez@email.com".parse().unwrap(),
            requester_phone: Some("+1-555-0123".parse().unwrap()),
            reason: "Need warm winter clothing for school".parse().unwrap(),
            additional_info: None,
            status: request::Status::default(),
            submitted_at: DateTime::now().coerce(),
        }
    }

    /// Recomputes the request count of the given [`Distribution`] by
    /// scanning, to prove the incrementally maintained counter equivalent.
    async fn recounted(
        memory: &Memory,
        id: distribution::Id,
    ) -> (u32, Option<u32>) {
        let requests: Vec<Request> = memory
            .execute(Select(By::<Vec<Request>, _>::new(id)))
            .await
            .unwrap();
        let stored: Option<Distribution> =
            memory.execute(Select(By::<Option<Distribution>, _>::new(id))).await.unwrap();
        (
            u32::try_from(requests.len()).unwrap(),
            stored.map(|d| d.request_count),
        )
    }

    #[tokio::test]
    async fn maintains_request_count_incrementally() {
        let memory = Memory::default();
        let d = distribution("Winter Coats");
        let other = distribution("Groceries");
        memory.execute(Insert(d.clone())).await.unwrap();
        memory.execute(Insert(other.clone())).await.unwrap();

        for expected in 1..=3_u32 {
            memory.execute(Insert(request(d.id))).await.unwrap();
            let (scanned, stored) = recounted(&memory, d.id).await;
            assert_eq!(scanned, expected);
            assert_eq!(stored, Some(expected));
        }

        let (scanned, stored) = recounted(&memory, other.id).await;
        assert_eq!((scanned, stored), (0, Some(0)));
    }

    #[tokio::test]
    async fn insert_prepends_distributions() {
        let memory = Memory::default();
        let first = distribution("First");
        let second = distribution("Second");
        memory.execute(Insert(first.clone())).await.unwrap();
        memory.execute(Insert(second.clone())).await.unwrap();

        let page: list::Page = memory
            .execute(Select(By::new(list::Selector {
                arguments: Arguments::Forward {
                    first: 10,
                    after: None,
                    including: false,
                },
                filter: list::Filter::default(),
            })))
            .await
            .unwrap();
        let ids = page.edges.iter().map(|e| e.node).collect::<Vec<_>>();

        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn insert_refuses_request_against_unknown_distribution() {
        let memory = Memory::default();
        let orphan = request(distribution::Id::new());

        let err = memory
            .execute(Insert(orphan.clone()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            storage::Error::DistributionGone(id)
                if *id == orphan.distribution_id,
        ));

        let requests: Vec<Request> = memory
            .execute(Select(By::<Vec<Request>, _>::new(orphan.distribution_id)))
            .await
            .unwrap();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_to_requests_and_is_idempotent() {
        let memory = Memory::default();
        let d = distribution("Winter Coats");
        memory.execute(Insert(d.clone())).await.unwrap();
        memory.execute(Insert(request(d.id))).await.unwrap();
        memory.execute(Insert(request(d.id))).await.unwrap();

        let removed: bool =
            memory.execute(Delete(By::new(d.id))).await.unwrap();
        assert!(removed);

        let requests: Vec<Request> =
            memory.execute(Select(By::<Vec<Request>, _>::new(d.id))).await.unwrap();
        assert!(requests.is_empty());

        let removed: bool =
            memory.execute(Delete(By::new(d.id))).await.unwrap();
        assert!(!removed);
    }

    #[tokio::test]
    async fn update_merges_changes_and_preserves_identity() {
        let memory = Memory::default();
        let d = distribution("Winter Coats");
        memory.execute(Insert(d.clone())).await.unwrap();

        let updated: Distribution = memory
            .execute(Update(distribution::Changes {
                id: d.id,
                title: Some("Winter Coats and Boots".parse().unwrap()),
                description: None,
                category: None,
                quantity: Some(25),
                location: None,
                delivery_method: None,
                status: None,
            }))
            .await
            .unwrap();

        assert_eq!(updated.id, d.id);
        assert_eq!(updated.created_at, d.created_at);
        assert_eq!(updated.title.to_string(), "Winter Coats and Boots");
        assert_eq!(updated.quantity, 25);
        assert_eq!(updated.description, d.description);
        assert_eq!(updated.owner, d.owner);
        assert_eq!(updated.status, d.status);
    }

    #[tokio::test]
    async fn toggle_flips_status_and_respects_terminal() {
        let memory = Memory::default();
        let d = distribution("Winter Coats");
        memory.execute(Insert(d.clone())).await.unwrap();

        let paused: Distribution =
            memory.execute(Toggle(By::new(d.id))).await.unwrap();
        assert_eq!(paused.status, distribution::Status::Paused);

        let active: Distribution =
            memory.execute(Toggle(By::new(d.id))).await.unwrap();
        assert_eq!(active.status, distribution::Status::Active);

        let _: Distribution = memory
            .execute(Update(distribution::Changes {
                id: d.id,
                title: None,
                description: None,
                category: None,
                quantity: None,
                location: None,
                delivery_method: None,
                status: Some(distribution::Status::Fulfilled),
            }))
            .await
            .unwrap();
        let unchanged: Distribution =
            memory.execute(Toggle(By::new(d.id))).await.unwrap();
        assert_eq!(unchanged.status, distribution::Status::Fulfilled);
    }

    #[tokio::test]
    async fn requests_keep_submission_order() {
        let memory = Memory::default();
        let d = distribution("Winter Coats");
        memory.execute(Insert(d.clone())).await.unwrap();

        let mut submitted = Vec::new();
        for _ in 0..3 {
            let r = request(d.id);
            submitted.push(r.id);
            memory.execute(Insert(r)).await.unwrap();
        }

        let requests: Vec<Request> =
            memory.execute(Select(By::<Vec<Request>, _>::new(d.id))).await.unwrap();
        assert_eq!(
            requests.iter().map(|r| r.id).collect::<Vec<_>>(),
            submitted,
        );
    }

    #[tokio::test]
    async fn seeding_recomputes_request_counts() {
        let d = distribution("Winter Coats");
        let requests = vec![request(d.id), request(d.id)];
        let orphan = request(distribution::Id::new());

        let memory = Memory::new(
            vec![d.clone()],
            requests.into_iter().chain([orphan]),
        );

        let (scanned, stored) = recounted(&memory, d.id).await;
        assert_eq!((scanned, stored), (2, Some(2)));
    }

    #[tokio::test]
    async fn paginates_forward_and_backward() {
        let memory = Memory::default();
        let mut newest_first = Vec::new();
        for i in 0..5 {
            let d = distribution(&format!("Distribution {i}"));
            newest_first.insert(0, d.id);
            memory.execute(Insert(d)).await.unwrap();
        }

        let select = |arguments| {
            memory.execute(Select(By::<list::Page, _>::new(list::Selector {
                arguments,
                filter: list::Filter::default(),
            })))
        };

        let page = select(Arguments::Forward {
            first: 2,
            after: None,
            including: false,
        })
        .await
        .unwrap();
        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            &newest_first[..2],
        );
        assert!(page.has_more);

        let page = select(Arguments::Forward {
            first: 2,
            after: Some(newest_first[1]),
            including: false,
        })
        .await
        .unwrap();
        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            &newest_first[2..4],
        );
        assert!(page.has_more);

        let page = select(Arguments::Backward {
            last: 2,
            before: Some(newest_first[2]),
            including: false,
        })
        .await
        .unwrap();
        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            &newest_first[..2],
        );
        assert!(!page.has_more);

        let page = select(Arguments::Forward {
            first: 1,
            after: Some(newest_first[3]),
            including: true,
        })
        .await
        .unwrap();
        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            &newest_first[3..4],
        );
    }

    #[tokio::test]
    async fn filters_by_category_and_status() {
        let memory = Memory::default();
        let mut clothing = distribution("Winter Coats");
        clothing.category = "Clothing".parse().unwrap();
        let mut food = distribution("Groceries");
        food.category = "Food".parse().unwrap();
        food.status = distribution::Status::Paused;
        memory.execute(Insert(clothing.clone())).await.unwrap();
        memory.execute(Insert(food.clone())).await.unwrap();

        let page: list::Page = memory
            .execute(Select(By::new(list::Selector {
                arguments: Arguments::Forward {
                    first: 10,
                    after: None,
                    including: false,
                },
                filter: list::Filter {
                    category: Some("Food".parse().unwrap()),
                    status: Some(distribution::Status::Paused),
                },
            })))
            .await
            .unwrap();

        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            vec![food.id],
        );
    }
}

//! In-process store implementing every driven port.
//!
//! Used when the server starts without a database URL and by behaviour
//! suites through the `test-support` feature. Semantics mirror the
//! PostgreSQL adapters: unique email, slug and name; newest-first article
//! listing; atomic archive-and-remove under one lock.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, CategoryRepository, CategoryRepositoryError,
    ClaimedJob, EmailJob, EmailJobStore, EmailJobStoreError, EmailQueue, EmailQueueError,
    IdentityRepository, IdentityRepositoryError, JobId, QueueName,
};
use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticlePatch, Category, CategoryDraft,
    CategoryId, EmailAddress, StoredIdentity, Tombstone, UserId,
};

/// Lifecycle of a queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
}

/// A job as held by the in-memory queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedJob {
    pub id: JobId,
    pub queue: QueueName,
    pub job: EmailJob,
    pub status: JobStatus,
    pub attempts: u32,
    pub run_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    identities: Vec<StoredIdentity>,
    categories: BTreeMap<i32, Category>,
    next_category_id: i32,
    articles: BTreeMap<i32, Article>,
    next_article_id: i32,
    tombstones: Vec<Tombstone>,
    jobs: Vec<QueuedJob>,
    next_job_id: i64,
    queue_offline: bool,
}

/// Shared in-memory backing store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

const POISONED: &str = "memory store lock poisoned";

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, State>> {
        self.state.lock().ok()
    }

    /// Every tombstone written so far, oldest first.
    pub fn tombstones(&self) -> Vec<Tombstone> {
        self.lock()
            .map(|state| state.tombstones.clone())
            .unwrap_or_default()
    }

    /// Every job enqueued so far.
    pub fn jobs(&self) -> Vec<QueuedJob> {
        self.lock().map(|state| state.jobs.clone()).unwrap_or_default()
    }

    /// Toggle an identity's active flag; `false` when no identity matches.
    pub fn set_active(&self, email: &EmailAddress, active: bool) -> bool {
        let Some(mut state) = self.lock() else {
            return false;
        };
        match state
            .identities
            .iter_mut()
            .find(|stored| stored.identity.email == *email)
        {
            Some(stored) => {
                stored.identity.is_active = active;
                true
            }
            None => false,
        }
    }

    /// Make every subsequent enqueue fail as if the broker were down.
    pub fn set_queue_offline(&self, offline: bool) {
        if let Some(mut state) = self.lock() {
            state.queue_offline = offline;
        }
    }
}

#[async_trait]
impl IdentityRepository for MemoryStore {
    async fn insert(&self, stored: &StoredIdentity) -> Result<(), IdentityRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| IdentityRepositoryError::query(POISONED))?;
        let email = &stored.identity.email;
        if state
            .identities
            .iter()
            .any(|existing| existing.identity.email == *email)
        {
            return Err(IdentityRepositoryError::duplicate_email(email.as_ref()));
        }
        state.identities.push(stored.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredIdentity>, IdentityRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| IdentityRepositoryError::query(POISONED))?;
        Ok(state
            .identities
            .iter()
            .find(|stored| stored.identity.email == *email)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn insert(
        &self,
        draft: &CategoryDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Category, CategoryRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| CategoryRepositoryError::query(POISONED))?;
        if state.categories.values().any(|c| c.slug == draft.slug) {
            return Err(CategoryRepositoryError::duplicate_slug(draft.slug.as_str()));
        }
        if state.categories.values().any(|c| c.name == draft.name) {
            return Err(CategoryRepositoryError::duplicate_name(draft.name.as_str()));
        }
        state.next_category_id += 1;
        let category = Category {
            id: CategoryId(state.next_category_id),
            name: draft.name.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
            created_at,
        };
        state.categories.insert(category.id.0, category.clone());
        Ok(category)
    }

    async fn list(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| CategoryRepositoryError::query(POISONED))?;
        Ok(state.categories.values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, CategoryRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| CategoryRepositoryError::query(POISONED))?;
        Ok(state.categories.get(&id.0).cloned())
    }

    async fn delete(&self, id: CategoryId) -> Result<bool, CategoryRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| CategoryRepositoryError::query(POISONED))?;
        Ok(state.categories.remove(&id.0).is_some())
    }
}

#[async_trait]
impl ArticleRepository for MemoryStore {
    async fn insert(
        &self,
        author: UserId,
        draft: &ArticleDraft,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| ArticleRepositoryError::query(POISONED))?;
        state.next_article_id += 1;
        let article = Article {
            id: ArticleId(state.next_article_id),
            title: draft.title.clone(),
            content: draft.content.clone(),
            excerpt: draft.excerpt.clone(),
            category_id: draft.category_id,
            author_id: author,
            image_url: draft.image_url.clone(),
            is_published: draft.is_published,
            created_at: now,
            updated_at: now,
        };
        state.articles.insert(article.id.0, article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticleRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| ArticleRepositoryError::query(POISONED))?;
        Ok(state.articles.get(&id.0).cloned())
    }

    async fn list(
        &self,
        filter: ArticleFilter,
        page: PageRequest,
    ) -> Result<Page<Article>, ArticleRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| ArticleRepositoryError::query(POISONED))?;
        let mut matching: Vec<&Article> = state
            .articles
            .values()
            .filter(|article| filter.matches(article))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn update(
        &self,
        caller: UserId,
        id: ArticleId,
        patch: &ArticlePatch,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| ArticleRepositoryError::query(POISONED))?;
        let article = state
            .articles
            .get_mut(&id.0)
            .ok_or_else(|| ArticleRepositoryError::missing(id.0))?;
        if article.author_id != caller {
            return Err(ArticleRepositoryError::not_author(id.0));
        }
        patch.clone().apply_to(article, now);
        Ok(article.clone())
    }

    async fn archive_and_remove(
        &self,
        caller: UserId,
        id: ArticleId,
        deleted_at: DateTime<Utc>,
    ) -> Result<Tombstone, ArticleRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| ArticleRepositoryError::query(POISONED))?;
        let author_id = state
            .articles
            .get(&id.0)
            .map(|article| article.author_id)
            .ok_or_else(|| ArticleRepositoryError::missing(id.0))?;
        if author_id != caller {
            return Err(ArticleRepositoryError::not_author(id.0));
        }
        let article = state
            .articles
            .remove(&id.0)
            .ok_or_else(|| ArticleRepositoryError::missing(id.0))?;
        let tombstone = Tombstone::capture(&article, deleted_at);
        state.tombstones.push(tombstone.clone());
        Ok(tombstone)
    }
}

#[async_trait]
impl EmailQueue for MemoryStore {
    async fn enqueue(&self, queue: QueueName, job: &EmailJob) -> Result<JobId, EmailQueueError> {
        let mut state = self
            .lock()
            .ok_or_else(|| EmailQueueError::unavailable(POISONED))?;
        if state.queue_offline {
            return Err(EmailQueueError::unavailable("queue offline"));
        }
        state.next_job_id += 1;
        let id = JobId(state.next_job_id);
        state.jobs.push(QueuedJob {
            id,
            queue,
            job: job.clone(),
            status: JobStatus::Pending,
            attempts: 0,
            run_at: Utc::now(),
            last_error: None,
        });
        Ok(id)
    }
}

impl State {
    fn job_mut(&mut self, id: JobId) -> Result<&mut QueuedJob, EmailJobStoreError> {
        self.jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or_else(|| EmailJobStoreError::query(format!("job {id} does not exist")))
    }
}

#[async_trait]
impl EmailJobStore for MemoryStore {
    async fn claim_next(
        &self,
        queues: &[QueueName],
        now: DateTime<Utc>,
    ) -> Result<Option<ClaimedJob>, EmailJobStoreError> {
        let mut state = self
            .lock()
            .ok_or_else(|| EmailJobStoreError::query(POISONED))?;
        let due = state
            .jobs
            .iter_mut()
            .filter(|job| {
                job.status == JobStatus::Pending && job.run_at <= now && queues.contains(&job.queue)
            })
            .min_by_key(|job| (job.run_at, job.id.0));
        Ok(due.map(|job| {
            job.status = JobStatus::Running;
            ClaimedJob {
                id: job.id,
                queue: job.queue,
                job: job.job.clone(),
                attempts: job.attempts,
            }
        }))
    }

    async fn complete(&self, id: JobId) -> Result<(), EmailJobStoreError> {
        let mut state = self
            .lock()
            .ok_or_else(|| EmailJobStoreError::query(POISONED))?;
        state.job_mut(id)?.status = JobStatus::Done;
        Ok(())
    }

    async fn reschedule(
        &self,
        id: JobId,
        attempts: u32,
        run_at: DateTime<Utc>,
        last_error: &str,
    ) -> Result<(), EmailJobStoreError> {
        let mut state = self
            .lock()
            .ok_or_else(|| EmailJobStoreError::query(POISONED))?;
        let job = state.job_mut(id)?;
        job.status = JobStatus::Pending;
        job.attempts = attempts;
        job.run_at = run_at;
        job.last_error = Some(last_error.to_owned());
        Ok(())
    }

    async fn fail(
        &self,
        id: JobId,
        attempts: u32,
        last_error: &str,
    ) -> Result<(), EmailJobStoreError> {
        let mut state = self
            .lock()
            .ok_or_else(|| EmailJobStoreError::query(POISONED))?;
        let job = state.job_mut(id)?;
        job.status = JobStatus::Failed;
        job.attempts = attempts;
        job.last_error = Some(last_error.to_owned());
        Ok(())
    }
}

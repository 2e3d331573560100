//! Contact service layer.
//!
//! Every operation takes the caller's [`AccessContext`] first and consults
//! the access policy before touching the repository. Writes then build the
//! whole contact aggregate in memory, validate it, and hand it to the
//! repository in one call.

use crate::auth::{AccessContext, AccessPolicy, Operation};
use crate::domain::{ContactId, UserId, ValidationErrors};
use crate::error::{ServiceError, ServiceResult};
use crate::export;
use crate::metrics::Metrics;
use crate::models::{Contact, ContactChanges, ContactDraft, ContactParams};
use crate::repositories::ContactRepository;
use crate::validation::{validate_contact, ContactFacts};
use async_trait::async_trait;
use std::sync::Arc;

/// Contacts whose last name starts with `letter`, ordered by last name, or
/// every contact in insertion order when no letter is given.
///
/// The prefix match is case-sensitive. This is the raw query; it does not
/// check any session.
pub async fn by_letter(
    contacts: &dyn ContactRepository,
    letter: Option<&str>,
) -> ServiceResult<Vec<Contact>> {
    let found = match letter {
        Some(letter) => contacts.by_lastname_prefix(letter).await?,
        None => contacts.all().await?,
    };
    Ok(found)
}

/// Contact service trait for business operations.
#[async_trait]
pub trait ContactService: Send + Sync {
    /// List contacts, optionally filtered by last-name initial.
    async fn list(&self, ctx: &AccessContext, letter: Option<&str>)
        -> ServiceResult<Vec<Contact>>;

    /// Get one contact.
    async fn show(&self, ctx: &AccessContext, id: ContactId) -> ServiceResult<Contact>;

    /// A blank contact form with three empty phone slots.
    async fn build(&self, ctx: &AccessContext) -> ServiceResult<ContactDraft>;

    /// Get one contact for editing.
    async fn edit(&self, ctx: &AccessContext, id: ContactId) -> ServiceResult<Contact>;

    /// Validate and store a new contact with its phones.
    async fn create(&self, ctx: &AccessContext, params: ContactParams) -> ServiceResult<Contact>;

    /// Apply `changes`, re-validate and store. On failure the stored record
    /// is unchanged and comes back inside the error.
    async fn update(
        &self,
        ctx: &AccessContext,
        id: ContactId,
        changes: ContactChanges,
    ) -> ServiceResult<Contact>;

    /// Mark a contact hidden. Hiding twice is not an error.
    async fn hide(&self, ctx: &AccessContext, id: ContactId) -> ServiceResult<Contact>;

    /// Delete a contact and its phones.
    async fn delete(&self, ctx: &AccessContext, id: ContactId) -> ServiceResult<()>;

    /// All contacts as `Name,Email` CSV.
    async fn export_csv(&self, ctx: &AccessContext) -> ServiceResult<String>;

    /// Run every contact rule against `draft`, looking up email ownership
    /// in the repository.
    async fn validate(&self, draft: &ContactDraft) -> ServiceResult<()>;
}

/// Default implementation of ContactService.
pub struct ContactServiceImpl {
    contacts: Arc<dyn ContactRepository>,
    policy: AccessPolicy,
    metrics: Metrics,
}

impl ContactServiceImpl {
    /// Create a new contact service.
    pub fn new(contacts: Arc<dyn ContactRepository>, policy: AccessPolicy, metrics: Metrics) -> Self {
        Self {
            contacts,
            policy,
            metrics,
        }
    }

    fn authorize(&self, ctx: &AccessContext, operation: Operation) -> ServiceResult<Option<UserId>> {
        self.policy.authorize(ctx, operation).map_err(|e| {
            self.metrics.record_authorization_denial();
            e
        })
    }

    async fn facts_for(&self, draft: &ContactDraft) -> ServiceResult<ContactFacts> {
        let email_owner = if draft.email.trim().is_empty() {
            None
        } else {
            self.contacts
                .find_by_email(&draft.email)
                .await?
                .map(|c| c.id)
        };
        Ok(ContactFacts { email_owner })
    }

    async fn check(&self, draft: &ContactDraft) -> ServiceResult<Result<(), ValidationErrors>> {
        let facts = self.facts_for(draft).await?;
        Ok(validate_contact(draft, &facts))
    }

    /// Count a write rejected with field errors before passing it on.
    fn rejected(&self, err: ServiceError) -> ServiceError {
        if err.field_errors().is_some() {
            self.metrics.record_validation_failure();
        }
        err
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn list(
        &self,
        ctx: &AccessContext,
        letter: Option<&str>,
    ) -> ServiceResult<Vec<Contact>> {
        self.authorize(ctx, Operation::List)?;
        let contacts = by_letter(self.contacts.as_ref(), letter).await?;
        tracing::debug!(letter = ?letter, count = contacts.len(), "Listed contacts");
        Ok(contacts)
    }

    async fn show(&self, ctx: &AccessContext, id: ContactId) -> ServiceResult<Contact> {
        self.authorize(ctx, Operation::Show)?;
        Ok(self.contacts.get(id).await?)
    }

    async fn build(&self, ctx: &AccessContext) -> ServiceResult<ContactDraft> {
        self.authorize(ctx, Operation::New)?;
        Ok(ContactDraft::blank())
    }

    async fn edit(&self, ctx: &AccessContext, id: ContactId) -> ServiceResult<Contact> {
        self.authorize(ctx, Operation::Edit)?;
        Ok(self.contacts.get(id).await?)
    }

    async fn create(&self, ctx: &AccessContext, params: ContactParams) -> ServiceResult<Contact> {
        let acting = self.authorize(ctx, Operation::Create)?;
        let draft = ContactDraft::from(params);

        if let Err(errors) = self.check(&draft).await? {
            tracing::info!(errors = %errors, "Rejected new contact");
            return Err(self.rejected(ServiceError::invalid(errors)));
        }

        let contact = self
            .contacts
            .insert(&draft)
            .await
            .map_err(|e| self.rejected(e.into()))?;

        self.metrics.record_contact_created();
        tracing::info!(contact_id = %contact.id, user_id = ?acting, "Contact created");
        Ok(contact)
    }

    async fn update(
        &self,
        ctx: &AccessContext,
        id: ContactId,
        changes: ContactChanges,
    ) -> ServiceResult<Contact> {
        let acting = self.authorize(ctx, Operation::Update)?;
        let current = self.contacts.get(id).await?;

        let mut draft = current.to_draft();
        draft.apply(changes);

        if let Err(errors) = self.check(&draft).await? {
            tracing::info!(contact_id = %id, errors = %errors, "Rejected contact update");
            return Err(self.rejected(ServiceError::invalid_update(errors, current)));
        }

        let contact = match self.contacts.update(id, &draft).await {
            Ok(contact) => contact,
            Err(e) => {
                let err = match ServiceError::from(e) {
                    ServiceError::Validation { errors, .. } => {
                        ServiceError::invalid_update(errors, current)
                    }
                    other => other,
                };
                return Err(self.rejected(err));
            }
        };

        self.metrics.record_contact_updated();
        tracing::info!(contact_id = %id, user_id = ?acting, "Contact updated");
        Ok(contact)
    }

    async fn hide(&self, ctx: &AccessContext, id: ContactId) -> ServiceResult<Contact> {
        self.authorize(ctx, Operation::Hide)?;
        let contact = self.contacts.set_hidden(id, true).await?;
        self.metrics.record_contact_hidden();
        tracing::info!(contact_id = %id, "Contact hidden");
        Ok(contact)
    }

    async fn delete(&self, ctx: &AccessContext, id: ContactId) -> ServiceResult<()> {
        let acting = self.authorize(ctx, Operation::Delete)?;
        self.contacts.delete(id).await?;
        self.metrics.record_contact_deleted();
        tracing::info!(contact_id = %id, user_id = ?acting, "Contact deleted");
        Ok(())
    }

    async fn export_csv(&self, ctx: &AccessContext) -> ServiceResult<String> {
        self.authorize(ctx, Operation::Export)?;
        let contacts = self.contacts.all().await?;
        tracing::debug!(count = contacts.len(), "Exporting contacts");
        Ok(export::to_csv(&contacts))
    }

    async fn validate(&self, draft: &ContactDraft) -> ServiceResult<()> {
        self.check(draft).await?.map_err(ServiceError::invalid)
    }
}

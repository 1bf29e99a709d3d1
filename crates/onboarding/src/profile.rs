use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use raisepath_core::{
    Aggregate, AggregateRoot, Amount, CompanyId, DocumentId, DomainError, OwnerId,
};
use raisepath_events::{Event, NotificationKind};

use crate::document::{Document, DocumentMeta, MediaType};

/// Partial field set for profile creation/update.
///
/// On first creation `name` and `sector` are required; amounts default to
/// zero. On update, `None` means "keep the existing value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub target_raise: Option<Amount>,
    pub revenue: Option<Amount>,
}

/// Aggregate root: CompanyProfile.
///
/// One profile per owner. `kyc_verified` and `financials_linked` are
/// monotonic flags; the document list is append-only. There is no enforced
/// ordering between verification, financials linking and document upload —
/// only profile existence gates them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfile {
    id: CompanyId,
    owner: Option<OwnerId>,
    name: String,
    sector: String,
    target_raise: Amount,
    revenue: Amount,
    kyc_verified: bool,
    financials_linked: bool,
    documents: Vec<Document>,
    version: u64,
    created: bool,
}

impl CompanyProfile {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: CompanyId) -> Self {
        Self {
            id,
            owner: None,
            name: String::new(),
            sector: String::new(),
            target_raise: Amount::ZERO,
            revenue: Amount::ZERO,
            kyc_verified: false,
            financials_linked: false,
            documents: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> CompanyId {
        self.id
    }

    pub fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn target_raise(&self) -> Amount {
        self.target_raise
    }

    pub fn revenue(&self) -> Amount {
        self.revenue
    }

    pub fn kyc_verified(&self) -> bool {
        self.kyc_verified
    }

    pub fn financials_linked(&self) -> bool {
        self.financials_linked
    }

    /// Documents in creation order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Whether the profile has been created (step 1 completed).
    pub fn exists(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for CompanyProfile {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateOrUpdateProfile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrUpdateProfile {
    pub owner: OwnerId,
    /// Server-assigned id used only when this call creates the profile.
    pub company_id: CompanyId,
    pub patch: ProfilePatch,
    pub occurred_at: DateTime<Utc>,
}

/// Command: VerifyIdentity (KYC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyIdentity {
    pub owner: OwnerId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: LinkFinancials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkFinancials {
    pub owner: OwnerId,
    /// Opaque bank token. Only presence is validated; this domain does not
    /// know how to validate bank tokens.
    pub token: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordDocument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDocument {
    pub owner: OwnerId,
    /// Server-assigned document id.
    pub document_id: DocumentId,
    pub meta: DocumentMeta,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProfileCommand {
    CreateOrUpdateProfile(CreateOrUpdateProfile),
    VerifyIdentity(VerifyIdentity),
    LinkFinancials(LinkFinancials),
    RecordDocument(RecordDocument),
}

/// Event: ProfileCreated. Emitted exactly once per owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCreated {
    pub company_id: CompanyId,
    pub owner: OwnerId,
    pub name: String,
    pub sector: String,
    pub target_raise: Amount,
    pub revenue: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProfileUpdated. Drives state evolution on re-submission; never
/// surfaced as a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdated {
    pub company_id: CompanyId,
    pub name: String,
    pub sector: String,
    pub target_raise: Amount,
    pub revenue: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: KycVerified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycVerified {
    pub company_id: CompanyId,
    pub owner: OwnerId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FinancialsLinked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialsLinked {
    pub company_id: CompanyId,
    pub owner: OwnerId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DocumentAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAdded {
    pub company_id: CompanyId,
    pub owner: OwnerId,
    pub document: Document,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProfileEvent {
    ProfileCreated(ProfileCreated),
    ProfileUpdated(ProfileUpdated),
    KycVerified(KycVerified),
    FinancialsLinked(FinancialsLinked),
    DocumentAdded(DocumentAdded),
}

impl Event for ProfileEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProfileEvent::ProfileCreated(_) => "onboarding.profile.created",
            ProfileEvent::ProfileUpdated(_) => "onboarding.profile.updated",
            ProfileEvent::KycVerified(_) => "onboarding.profile.kyc_verified",
            ProfileEvent::FinancialsLinked(_) => "onboarding.profile.financials_linked",
            ProfileEvent::DocumentAdded(_) => "onboarding.profile.document_added",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProfileEvent::ProfileCreated(e) => e.occurred_at,
            ProfileEvent::ProfileUpdated(e) => e.occurred_at,
            ProfileEvent::KycVerified(e) => e.occurred_at,
            ProfileEvent::FinancialsLinked(e) => e.occurred_at,
            ProfileEvent::DocumentAdded(e) => e.occurred_at,
        }
    }
}

impl ProfileEvent {
    /// Which user-facing notification (if any) this event should raise.
    ///
    /// `ProfileUpdated` stays internal: the notification kind set is closed.
    pub fn notification_intent(&self) -> Option<(NotificationKind, String)> {
        match self {
            ProfileEvent::ProfileCreated(_) => Some((
                NotificationKind::ProfileCreated,
                "Company profile created successfully".to_string(),
            )),
            ProfileEvent::ProfileUpdated(_) => None,
            ProfileEvent::KycVerified(_) => Some((
                NotificationKind::KycVerified,
                "KYC verification completed successfully".to_string(),
            )),
            ProfileEvent::FinancialsLinked(_) => Some((
                NotificationKind::FinancialsLinked,
                "Financial data linked successfully".to_string(),
            )),
            ProfileEvent::DocumentAdded(e) => Some((
                NotificationKind::DocumentAdded,
                format!("File \"{}\" uploaded successfully", e.document.name),
            )),
        }
    }
}

impl Aggregate for CompanyProfile {
    type Command = ProfileCommand;
    type Event = ProfileEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProfileEvent::ProfileCreated(e) => {
                self.id = e.company_id;
                self.owner = Some(e.owner.clone());
                self.name = e.name.clone();
                self.sector = e.sector.clone();
                self.target_raise = e.target_raise;
                self.revenue = e.revenue;
                self.kyc_verified = false;
                self.financials_linked = false;
                self.documents.clear();
                self.created = true;
            }
            ProfileEvent::ProfileUpdated(e) => {
                self.name = e.name.clone();
                self.sector = e.sector.clone();
                self.target_raise = e.target_raise;
                self.revenue = e.revenue;
            }
            ProfileEvent::KycVerified(_) => {
                self.kyc_verified = true;
            }
            ProfileEvent::FinancialsLinked(_) => {
                self.financials_linked = true;
            }
            ProfileEvent::DocumentAdded(e) => {
                self.documents.push(e.document.clone());
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProfileCommand::CreateOrUpdateProfile(cmd) => self.handle_create_or_update(cmd),
            ProfileCommand::VerifyIdentity(cmd) => self.handle_verify(cmd),
            ProfileCommand::LinkFinancials(cmd) => self.handle_link(cmd),
            ProfileCommand::RecordDocument(cmd) => self.handle_record_document(cmd),
        }
    }
}

impl CompanyProfile {
    fn ensure_owner(&self, owner: &OwnerId) -> Result<(), DomainError> {
        if !self.created {
            return Ok(());
        }
        if self.owner.as_ref() != Some(owner) {
            return Err(DomainError::invariant("owner mismatch"));
        }
        Ok(())
    }

    fn handle_create_or_update(
        &self,
        cmd: &CreateOrUpdateProfile,
    ) -> Result<Vec<ProfileEvent>, DomainError> {
        if !self.created {
            let name = match &cmd.patch.name {
                Some(n) if !n.trim().is_empty() => n.clone(),
                _ => return Err(DomainError::validation("company name is required")),
            };
            let sector = match &cmd.patch.sector {
                Some(s) if !s.trim().is_empty() => s.clone(),
                _ => return Err(DomainError::validation("sector is required")),
            };

            return Ok(vec![ProfileEvent::ProfileCreated(ProfileCreated {
                company_id: cmd.company_id,
                owner: cmd.owner.clone(),
                name,
                sector,
                target_raise: cmd.patch.target_raise.unwrap_or(Amount::ZERO),
                revenue: cmd.patch.revenue.unwrap_or(Amount::ZERO),
                occurred_at: cmd.occurred_at,
            })]);
        }

        self.ensure_owner(&cmd.owner)?;

        // Partial update: absent fields keep their current value.
        let name = cmd.patch.name.clone().unwrap_or_else(|| self.name.clone());
        if name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        let sector = cmd.patch.sector.clone().unwrap_or_else(|| self.sector.clone());
        if sector.trim().is_empty() {
            return Err(DomainError::validation("sector cannot be empty"));
        }

        Ok(vec![ProfileEvent::ProfileUpdated(ProfileUpdated {
            company_id: self.id,
            name,
            sector,
            target_raise: cmd.patch.target_raise.unwrap_or(self.target_raise),
            revenue: cmd.patch.revenue.unwrap_or(self.revenue),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_verify(&self, cmd: &VerifyIdentity) -> Result<Vec<ProfileEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_owner(&cmd.owner)?;

        // Idempotent: a second verification is a no-op, no duplicate event.
        if self.kyc_verified {
            return Ok(vec![]);
        }

        Ok(vec![ProfileEvent::KycVerified(KycVerified {
            company_id: self.id,
            owner: cmd.owner.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_link(&self, cmd: &LinkFinancials) -> Result<Vec<ProfileEvent>, DomainError> {
        if cmd.token.trim().is_empty() {
            return Err(DomainError::validation("token is required"));
        }
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_owner(&cmd.owner)?;

        Ok(vec![ProfileEvent::FinancialsLinked(FinancialsLinked {
            company_id: self.id,
            owner: cmd.owner.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_document(&self, cmd: &RecordDocument) -> Result<Vec<ProfileEvent>, DomainError> {
        let media_type = MediaType::from_mime(&cmd.meta.media_type)?;
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_owner(&cmd.owner)?;

        let document = Document {
            id: cmd.document_id,
            company_id: self.id,
            name: cmd.meta.name.clone(),
            media_type,
            size_bytes: cmd.meta.size_bytes,
            storage_ref: cmd.meta.storage_ref.clone(),
            created_at: cmd.occurred_at,
        };

        Ok(vec![ProfileEvent::DocumentAdded(DocumentAdded {
            company_id: self.id,
            owner: cmd.owner.clone(),
            document,
            occurred_at: cmd.occurred_at,
        })])
    }
}

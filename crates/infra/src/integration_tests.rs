//! Integration tests for the full onboarding pipeline.
//!
//! Tests: Command → Coordinator → ProfileStore → NotificationStore → Queries
//!
//! Verifies:
//! - The happy path from profile creation to a perfect score
//! - `profile_created` fires exactly once per owner, even under races
//! - Concurrent flag writes and document uploads all land
//! - Notification failures never fail the domain operation

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::convert::Infallible;
    use std::sync::Arc;

    use raisepath_core::{Amount, OwnerId};
    use raisepath_events::{NotificationKind, NotificationSink};
    use raisepath_onboarding::{DocumentMeta, MediaType, ProfilePatch};

    use crate::coordinator::{CoordinatorError, OnboardingCoordinator};
    use crate::notifications::{InMemoryNotificationStore, NotificationStore};
    use crate::queries;
    use crate::store::{InMemoryProfileStore, StoreError};

    fn owner() -> OwnerId {
        OwnerId::new("founder@example.com").unwrap()
    }

    fn setup() -> (
        OnboardingCoordinator<Arc<InMemoryProfileStore>, Arc<InMemoryNotificationStore>>,
        Arc<InMemoryProfileStore>,
        Arc<InMemoryNotificationStore>,
    ) {
        raisepath_observability::init();
        let store = Arc::new(InMemoryProfileStore::new());
        let sink = Arc::new(InMemoryNotificationStore::new());
        let coordinator = OnboardingCoordinator::new(store.clone(), sink.clone());
        (coordinator, store, sink)
    }

    fn full_patch() -> ProfilePatch {
        ProfilePatch {
            name: Some("Acme Robotics".to_string()),
            sector: Some("Hardware".to_string()),
            target_raise: Some(Amount::new(2_000_000.0).unwrap()),
            revenue: Some(Amount::new(1_000_000.0).unwrap()),
        }
    }

    fn pdf(name: &str) -> DocumentMeta {
        DocumentMeta {
            name: name.to_string(),
            media_type: MediaType::PDF_MIME.to_string(),
            size_bytes: 42_000,
            storage_ref: format!("uploads/{name}"),
        }
    }

    #[test]
    fn full_onboarding_reaches_a_perfect_score() {
        let (coordinator, store, sink) = setup();
        let owner = owner();

        coordinator.create_or_update_profile(&owner, full_patch()).unwrap();
        coordinator.verify_identity(&owner).unwrap();
        coordinator.link_financials(&owner, "plaid-token-1").unwrap();
        for name in ["deck.pdf", "financials.pdf", "cap-table.pdf"] {
            coordinator.record_document(&owner, pdf(name)).unwrap();
        }

        let view = queries::score_for_owner(&store, &owner).unwrap();
        assert_eq!(view.score, 100);
        assert_eq!(view.breakdown.kyc, 30);
        assert_eq!(view.breakdown.financials, 20);
        assert_eq!(view.breakdown.documents, 25);
        assert_eq!(view.breakdown.revenue, 25);

        // One notification per step: created, kyc, financials, 3 uploads.
        let notifications = sink.list(&owner).unwrap();
        assert_eq!(notifications.len(), 6);
        assert!(notifications.iter().all(|n| !n.is_read()));
    }

    #[test]
    fn repeated_creates_update_in_place_and_notify_creation_once() {
        let (coordinator, store, sink) = setup();
        let owner = owner();

        let first = coordinator.create_or_update_profile(&owner, full_patch()).unwrap();
        let second = coordinator
            .create_or_update_profile(
                &owner,
                ProfilePatch {
                    sector: Some("Robotics".to_string()),
                    ..ProfilePatch::default()
                },
            )
            .unwrap();

        // Same aggregate, patched fields only.
        assert_eq!(second.id_typed(), first.id_typed());
        assert_eq!(second.name(), "Acme Robotics");
        assert_eq!(second.sector(), "Robotics");

        let created: Vec<_> = sink
            .list(&owner)
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::ProfileCreated)
            .collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].message, "Company profile created successfully");

        let stored = queries::profile_for_owner(&store, &owner).unwrap().unwrap();
        assert_eq!(stored.sector(), "Robotics");
    }

    #[test]
    fn racing_creators_produce_one_profile_and_one_creation_notification() {
        let (coordinator, store, sink) = setup();
        let coordinator = Arc::new(coordinator);
        let owner = owner();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let coordinator = coordinator.clone();
                let owner = owner.clone();
                std::thread::spawn(move || {
                    coordinator.create_or_update_profile(&owner, full_patch()).unwrap()
                })
            })
            .collect();
        let profiles: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // All writers converged on one aggregate.
        let id = profiles[0].id_typed();
        assert!(profiles.iter().all(|p| p.id_typed() == id));

        let created = sink
            .list(&owner)
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::ProfileCreated)
            .count();
        assert_eq!(created, 1);
        assert!(queries::profile_for_owner(&store, &owner).unwrap().is_some());
    }

    #[test]
    fn concurrent_verify_and_link_both_land() {
        let (coordinator, store, _sink) = setup();
        let coordinator = Arc::new(coordinator);
        let owner = owner();
        coordinator.create_or_update_profile(&owner, full_patch()).unwrap();

        let verify = {
            let coordinator = coordinator.clone();
            let owner = owner.clone();
            std::thread::spawn(move || coordinator.verify_identity(&owner).unwrap())
        };
        let link = {
            let coordinator = coordinator.clone();
            let owner = owner.clone();
            std::thread::spawn(move || coordinator.link_financials(&owner, "token").unwrap())
        };
        verify.join().unwrap();
        link.join().unwrap();

        let profile = queries::profile_for_owner(&store, &owner).unwrap().unwrap();
        assert!(profile.kyc_verified());
        assert!(profile.financials_linked());
    }

    #[test]
    fn concurrent_uploads_are_all_counted() {
        let (coordinator, store, _sink) = setup();
        let coordinator = Arc::new(coordinator);
        let owner = owner();
        coordinator.create_or_update_profile(&owner, full_patch()).unwrap();

        let handles: Vec<_> = (0..3)
            .map(|i| {
                let coordinator = coordinator.clone();
                let owner = owner.clone();
                std::thread::spawn(move || {
                    coordinator.record_document(&owner, pdf(&format!("doc-{i}.pdf"))).unwrap()
                })
            })
            .collect();
        let ids: HashSet<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().id)
            .collect();
        assert_eq!(ids.len(), 3);

        let documents = queries::documents_for_owner(&store, &owner).unwrap();
        assert_eq!(documents.len(), 3);
    }

    #[test]
    fn reverifying_is_a_quiet_no_op() {
        let (coordinator, store, sink) = setup();
        let owner = owner();
        coordinator.create_or_update_profile(&owner, full_patch()).unwrap();

        coordinator.verify_identity(&owner).unwrap();
        let before = queries::profile_for_owner(&store, &owner).unwrap().unwrap();
        coordinator.verify_identity(&owner).unwrap();
        let after = queries::profile_for_owner(&store, &owner).unwrap().unwrap();

        assert_eq!(after, before);
        let kyc = sink
            .list(&owner)
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::KycVerified)
            .count();
        assert_eq!(kyc, 1);
    }

    #[test]
    fn relinking_financials_notifies_again() {
        let (coordinator, _store, sink) = setup();
        let owner = owner();
        coordinator.create_or_update_profile(&owner, full_patch()).unwrap();

        coordinator.link_financials(&owner, "token-a").unwrap();
        coordinator.link_financials(&owner, "token-b").unwrap();

        let linked = sink
            .list(&owner)
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::FinancialsLinked)
            .count();
        assert_eq!(linked, 2);
    }

    #[test]
    fn operations_on_missing_profiles_report_not_found() {
        let (coordinator, store, _sink) = setup();
        let owner = owner();

        assert!(matches!(
            coordinator.verify_identity(&owner),
            Err(CoordinatorError::NotFound)
        ));
        assert!(matches!(
            coordinator.link_financials(&owner, "token"),
            Err(CoordinatorError::NotFound)
        ));
        assert!(matches!(
            coordinator.record_document(&owner, pdf("deck.pdf")),
            Err(CoordinatorError::NotFound)
        ));
        assert!(matches!(
            queries::score_for_owner(&store, &owner),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn rejected_commands_leave_store_and_notifications_untouched() {
        let (coordinator, store, sink) = setup();
        let owner = owner();
        coordinator.create_or_update_profile(&owner, full_patch()).unwrap();
        let before = queries::profile_for_owner(&store, &owner).unwrap().unwrap();
        let sink_before = sink.list(&owner).unwrap().len();

        let rejected = coordinator.record_document(
            &owner,
            DocumentMeta {
                media_type: "image/png".to_string(),
                ..pdf("logo.png")
            },
        );
        assert!(matches!(rejected, Err(CoordinatorError::Validation(_))));

        let blank_token = coordinator.link_financials(&owner, "   ");
        assert!(matches!(blank_token, Err(CoordinatorError::Validation(_))));

        assert_eq!(queries::profile_for_owner(&store, &owner).unwrap().unwrap(), before);
        assert_eq!(sink.list(&owner).unwrap().len(), sink_before);
    }

    /// A sink whose delivery always fails, for exercising best-effort emit.
    struct FailingSink;

    impl NotificationSink for FailingSink {
        type Error = StoreError;

        fn emit(
            &self,
            _owner: &OwnerId,
            _kind: NotificationKind,
            _message: &str,
        ) -> Result<(), Self::Error> {
            Err(StoreError::Backend("sink unavailable".to_string()))
        }
    }

    #[test]
    fn notification_failure_does_not_fail_the_operation() {
        let store = Arc::new(InMemoryProfileStore::new());
        let coordinator = OnboardingCoordinator::new(store.clone(), FailingSink);
        let owner = owner();

        let profile = coordinator.create_or_update_profile(&owner, full_patch()).unwrap();
        assert!(profile.exists());
        coordinator.verify_identity(&owner).unwrap();

        let stored = queries::profile_for_owner(&store, &owner).unwrap().unwrap();
        assert!(stored.kyc_verified());
    }

    #[test]
    fn acknowledgment_flow_over_emitted_notifications() {
        let (coordinator, _store, sink) = setup();
        let owner = owner();
        coordinator.create_or_update_profile(&owner, full_patch()).unwrap();
        coordinator.verify_identity(&owner).unwrap();

        let listed = sink.list(&owner).unwrap();
        assert_eq!(listed.len(), 2);
        // Most recent first.
        assert_eq!(listed[0].kind, NotificationKind::KycVerified);
        assert_eq!(listed[0].message, "KYC verification completed successfully");

        sink.mark_read(&owner, listed[0].id).unwrap();
        let listed = sink.list(&owner).unwrap();
        assert!(listed[0].is_read());
        assert!(!listed[1].is_read());

        sink.mark_all_read(&owner).unwrap();
        assert!(sink.list(&owner).unwrap().iter().all(|n| n.is_read()));
    }

    // Make sure the infallible in-memory sink from the events crate also
    // plugs into the coordinator's sink seam.
    #[test]
    fn events_crate_sink_is_compatible() {
        let store = Arc::new(InMemoryProfileStore::new());
        let sink = Arc::new(raisepath_events::InMemorySink::new());
        let coordinator = OnboardingCoordinator::new(store, sink.clone());
        let owner = owner();

        coordinator.create_or_update_profile(&owner, full_patch()).unwrap();
        let recorded = sink.emitted();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].kind, NotificationKind::ProfileCreated);
        let _: Result<(), Infallible> =
            sink.emit(&owner, NotificationKind::ProfileCreated, "manual");
    }
}

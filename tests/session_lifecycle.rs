use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use posyandu::core::lifecycle::{can_complete, evaluate};
use posyandu::models::{OutcomeCounts, Session, SessionStatus, VaccineDefinition, VisitOutcome};
use posyandu::report::SessionSummary;
use posyandu::LifecycleError;

fn session_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 8).unwrap()
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 8, hour, 0, 0).unwrap()
}

fn started_session(patients: usize) -> (Session, Vec<Uuid>) {
    let mut session = Session::new(session_day());
    let ids: Vec<Uuid> = (0..patients).map(|_| Uuid::new_v4()).collect();
    for id in &ids {
        session.register(*id).unwrap();
    }
    session.start().unwrap();
    (session, ids)
}

#[test]
fn three_served_two_cancelled_may_complete() {
    let verdict = evaluate(
        SessionStatus::Ongoing,
        OutcomeCounts {
            waiting: 0,
            served: 3,
            cancelled: 2,
        },
    );
    assert!(verdict.can_complete);
    assert!(!verdict.is_locked);
}

#[test]
fn waiting_patients_block_completion_regardless_of_served() {
    for served in [0, 1, 10, 100] {
        let counts = OutcomeCounts {
            waiting: 1,
            served,
            cancelled: 0,
        };
        assert!(!can_complete(SessionStatus::Ongoing, counts));
        assert!(!can_complete(SessionStatus::Upcoming, counts));
    }
}

#[test]
fn completing_with_waiting_patients_is_refused() {
    let (mut session, ids) = started_session(2);
    let bcg = VaccineDefinition::single("bcg", "BCG", 0);
    session.record_dose(ids[0], &bcg, 1, at(9)).unwrap();

    assert_eq!(
        session.complete(),
        Err(LifecycleError::CannotComplete {
            waiting: 1,
            served: 1
        })
    );
    assert_eq!(session.status, SessionStatus::Ongoing);
}

#[test]
fn all_cancelled_session_cannot_complete() {
    let (mut session, ids) = started_session(2);
    for id in &ids {
        session.cancel_attendance(*id, Some("sakit".into())).unwrap();
    }
    assert!(matches!(session.complete(), Err(LifecycleError::CannotComplete { .. })));
    // the manual override still applies
    session.cancel().unwrap();
    assert_eq!(session.status, SessionStatus::Cancelled);
}

#[test]
fn completed_session_is_locked_for_every_write() {
    let (mut session, ids) = started_session(3);
    let polio = VaccineDefinition::series("polio", "Polio", 1, 4, 28);
    session.record_dose(ids[0], &polio, 1, at(9)).unwrap();
    session.record_dose(ids[1], &polio, 2, at(9)).unwrap();
    session.cancel_attendance(ids[2], None).unwrap();

    let transition = session.complete().unwrap();
    assert_eq!(transition.from, SessionStatus::Ongoing);
    let recorded: Vec<_> = session.doses().cloned().collect();

    assert!(session.is_locked());
    assert_eq!(
        session.record_dose(ids[0], &polio, 2, at(10)),
        Err(LifecycleError::Locked(session.id))
    );
    assert_eq!(session.mark_served(ids[2], None), Err(LifecycleError::Locked(session.id)));
    assert_eq!(session.cancel_attendance(ids[1], None), Err(LifecycleError::Locked(session.id)));
    assert!(matches!(session.cancel(), Err(LifecycleError::InvalidTransition { .. })));
    assert!(matches!(session.complete(), Err(LifecycleError::InvalidTransition { .. })));

    assert!(session.is_locked());
    assert_eq!(session.doses().cloned().collect::<Vec<_>>(), recorded);
}

#[test]
fn dose_numbers_are_checked_against_the_series() {
    let (mut session, ids) = started_session(1);
    let dpt = VaccineDefinition::series("dpt-hb-hib", "DPT-HB-Hib", 2, 3, 28);

    assert!(matches!(
        session.record_dose(ids[0], &dpt, 0, at(9)),
        Err(LifecycleError::DoseOutOfRange { dose_number: 0, .. })
    ));
    assert!(matches!(
        session.record_dose(ids[0], &dpt, 4, at(9)),
        Err(LifecycleError::DoseOutOfRange { total_doses: 3, .. })
    ));

    let record = session.record_dose(ids[0], &dpt, 2, at(9)).unwrap();
    assert_eq!(record.dose_number, Some(2));
    assert_eq!(record.session_id, session.id);
    assert!(matches!(
        session.record_dose(ids[0], &dpt, 2, at(10)),
        Err(LifecycleError::DuplicateDose { .. })
    ));
}

#[test]
fn attendance_rules() {
    let (mut session, ids) = started_session(2);
    let bcg = VaccineDefinition::single("bcg", "BCG", 0);
    let stranger = Uuid::new_v4();

    assert_eq!(
        session.record_dose(stranger, &bcg, 1, at(9)),
        Err(LifecycleError::UnknownPatient(stranger))
    );

    session.cancel_attendance(ids[0], None).unwrap();
    assert_eq!(
        session.record_dose(ids[0], &bcg, 1, at(9)),
        Err(LifecycleError::AttendanceCancelled(ids[0]))
    );

    session.record_dose(ids[1], &bcg, 1, at(9)).unwrap();
    assert_eq!(
        session.cancel_attendance(ids[1], None),
        Err(LifecycleError::AlreadyServed(ids[1]))
    );
    assert!(matches!(
        session.attendance_of(ids[1]).map(|a| &a.outcome),
        Some(VisitOutcome::Served { .. })
    ));
}

#[test]
fn served_without_doses_cannot_be_cancelled() {
    let (mut session, ids) = started_session(2);
    session.mark_served(ids[0], Some("timbang".into())).unwrap();
    session.cancel_attendance(ids[1], None).unwrap();
    assert!(session.verdict().can_complete);

    assert_eq!(
        session.cancel_attendance(ids[0], None),
        Err(LifecycleError::AlreadyServed(ids[0]))
    );
    assert!(matches!(
        session.attendance_of(ids[0]).map(|a| &a.outcome),
        Some(VisitOutcome::Served { .. })
    ));
    assert_eq!(session.counts().served, 1);
    assert!(session.verdict().can_complete);

    session.cancel_attendance(ids[1], Some("sakit".into())).unwrap();
    assert_eq!(session.counts().cancelled, 1);
}

#[test]
fn upcoming_session_accepts_registration_but_not_doses() {
    let mut session = Session::new(session_day());
    let child = Uuid::new_v4();
    session.register(child).unwrap();
    session.register(child).unwrap();
    assert_eq!(session.counts().waiting, 1);

    let bcg = VaccineDefinition::single("bcg", "BCG", 0);
    assert_eq!(
        session.record_dose(child, &bcg, 1, at(9)),
        Err(LifecycleError::NotStarted(session.id))
    );
}

#[test]
fn demo_session_export_summarizes() {
    let session: Session = serde_json::from_str(include_str!("../demos/session.json")).unwrap();
    let summary = SessionSummary::from_session(&session);

    assert_eq!(summary.target, 3);
    assert_eq!(summary.counts.served, 1);
    assert_eq!(summary.counts.cancelled, 1);
    assert_eq!(summary.counts.waiting, 1);
    assert_eq!(summary.doses_given, 2);
    assert!(!summary.verdict.can_complete);
    assert!(!summary.verdict.is_locked);
}

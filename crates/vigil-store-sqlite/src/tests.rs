//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use vigil_core::{
  booking::BookingStatus,
  exam::{ExamStatus, HallSlot, NewExam, SlotAssignment},
  hall::{HallStatus, NewHall},
  preference::SlotPreference,
  session::{Session, TimeSlot},
  store::DirectoryStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2026, 9, d).unwrap() }

fn hall(number: &str, capacity: u32) -> NewHall {
  NewHall {
    hall_number: number.into(),
    capacity,
    department:  "CS".into(),
  }
}

fn exam(course: &str, students: u32) -> NewExam {
  NewExam {
    title:          format!("{course} final"),
    course_code:    course.into(),
    department:     "CS".into(),
    date:           day(10),
    time_slot:      TimeSlot::Forenoon,
    total_students: students,
  }
}

// ─── Halls ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_hall() {
  let s = store().await;
  let creator = Uuid::new_v4();

  let h = s.insert_hall(hall("H101", 60), creator).await.unwrap();
  assert_eq!(h.status, HallStatus::Available);
  assert_eq!(h.current_exam, None);

  let fetched = s.get_hall(h.hall_id).await.unwrap().unwrap();
  assert_eq!(fetched.hall_number, "H101");
  assert_eq!(fetched.capacity, 60);
  assert_eq!(fetched.created_by, creator);
}

#[tokio::test]
async fn duplicate_hall_number_rejected() {
  let s = store().await;
  let creator = Uuid::new_v4();

  s.insert_hall(hall("H101", 60), creator).await.unwrap();
  let err = s.insert_hall(hall("H101", 40), creator).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(vigil_core::Error::DuplicateHallNumber { .. })
  ));
}

#[tokio::test]
async fn list_halls_filters_by_department() {
  let s = store().await;
  let creator = Uuid::new_v4();
  s.insert_hall(hall("H101", 60), creator).await.unwrap();
  s.insert_hall(hall("H102", 40), creator).await.unwrap();
  s.insert_hall(
    NewHall {
      hall_number: "E201".into(),
      capacity:    80,
      department:  "EE".into(),
    },
    creator,
  )
  .await
  .unwrap();

  let all = s.list_halls(None).await.unwrap();
  assert_eq!(all.len(), 3);

  let cs = s.list_halls(Some("CS".into())).await.unwrap();
  assert_eq!(cs.len(), 2);
  assert!(cs.iter().all(|h| h.department == "CS"));
}

// ─── Exams ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_exam_starts_in_draft_with_no_halls() {
  let s = store().await;
  let e = s.insert_exam(exam("CS101", 50), Uuid::new_v4()).await.unwrap();
  assert_eq!(e.status, ExamStatus::Draft);
  assert!(e.halls.is_empty());

  let fetched = s.get_exam(e.exam_id).await.unwrap().unwrap();
  assert_eq!(fetched.course_code, "CS101");
  assert_eq!(fetched.total_students, 50);
}

#[tokio::test]
async fn duplicate_exam_key_rejected() {
  let s = store().await;
  let creator = Uuid::new_v4();
  s.insert_exam(exam("CS101", 50), creator).await.unwrap();

  // Same (department, course_code, time_slot) key, different date.
  let mut again = exam("CS101", 70);
  again.date = day(11);
  let err = s.insert_exam(again, creator).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(vigil_core::Error::DuplicateExamKey { .. })
  ));
}

#[tokio::test]
async fn list_exams_for_session_matches_date_and_slot() {
  let s = store().await;
  let creator = Uuid::new_v4();
  s.insert_exam(exam("CS101", 50), creator).await.unwrap();
  let mut afternoon = exam("CS202", 30);
  afternoon.time_slot = TimeSlot::Afternoon;
  s.insert_exam(afternoon, creator).await.unwrap();

  let fn_session = Session::new(day(10), TimeSlot::Forenoon);
  let found = s.list_exams_for_session(fn_session).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].course_code, "CS101");
}

#[tokio::test]
async fn update_exam_status_missing_exam() {
  let s = store().await;
  let err = s
    .update_exam_status(Uuid::new_v4(), ExamStatus::Scheduled)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(vigil_core::Error::ExamNotFound(_))));
}

// ─── Hall allocation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn allocate_halls_snapshots_and_flips_hall_status() {
  let s = store().await;
  let creator = Uuid::new_v4();
  let h1 = s.insert_hall(hall("H101", 30), creator).await.unwrap();
  let h2 = s.insert_hall(hall("H102", 30), creator).await.unwrap();
  let e = s.insert_exam(exam("CS101", 50), creator).await.unwrap();

  let updated = s
    .allocate_halls(e.exam_id, vec![h1.hall_id, h2.hall_id], creator, Utc::now())
    .await
    .unwrap();
  assert_eq!(updated.status, ExamStatus::HallsAllocated);
  assert_eq!(updated.halls.len(), 2);
  assert_eq!(updated.allocated_capacity(), 60);
  assert!(updated.halls.iter().all(|slot| !slot.is_assigned()));

  let h1 = s.get_hall(h1.hall_id).await.unwrap().unwrap();
  assert_eq!(h1.status, HallStatus::Allocated);
  assert_eq!(h1.current_exam, Some(e.exam_id));
}

#[tokio::test]
async fn allocate_halls_insufficient_capacity_rolls_back() {
  let s = store().await;
  let creator = Uuid::new_v4();
  let h1 = s.insert_hall(hall("H101", 30), creator).await.unwrap();
  let e = s.insert_exam(exam("CS101", 50), creator).await.unwrap();

  let err = s
    .allocate_halls(e.exam_id, vec![h1.hall_id], creator, Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(vigil_core::Error::CapacityInsufficient {
      required:  50,
      available: 30,
    })
  ));

  // Rollback restored the hall and left the exam untouched.
  let h1 = s.get_hall(h1.hall_id).await.unwrap().unwrap();
  assert_eq!(h1.status, HallStatus::Available);
  let e = s.get_exam(e.exam_id).await.unwrap().unwrap();
  assert_eq!(e.status, ExamStatus::Draft);
  assert!(e.halls.is_empty());
}

#[tokio::test]
async fn allocate_halls_taken_hall_is_unavailable() {
  let s = store().await;
  let creator = Uuid::new_v4();
  let h1 = s.insert_hall(hall("H101", 60), creator).await.unwrap();
  let e1 = s.insert_exam(exam("CS101", 50), creator).await.unwrap();
  let e2 = s.insert_exam(exam("CS202", 40), creator).await.unwrap();

  s.allocate_halls(e1.exam_id, vec![h1.hall_id], creator, Utc::now())
    .await
    .unwrap();

  let err = s
    .allocate_halls(e2.exam_id, vec![h1.hall_id], creator, Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(vigil_core::Error::HallUnavailable { ref hall_number })
      if hall_number == "H101"
  ));
}

#[tokio::test]
async fn allocate_halls_rejects_standing_allocation() {
  let s = store().await;
  let creator = Uuid::new_v4();
  let h1 = s.insert_hall(hall("H101", 60), creator).await.unwrap();
  let h2 = s.insert_hall(hall("H102", 60), creator).await.unwrap();
  let e = s.insert_exam(exam("CS101", 50), creator).await.unwrap();
  s.allocate_halls(e.exam_id, vec![h1.hall_id], creator, Utc::now())
    .await
    .unwrap();

  // Overwriting the snapshot would leave h1 allocated but unreferenced.
  let err = s
    .allocate_halls(e.exam_id, vec![h2.hall_id], creator, Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(vigil_core::Error::HallsAlreadyAllocated(_))
  ));

  let e = s.get_exam(e.exam_id).await.unwrap().unwrap();
  assert_eq!(e.halls.len(), 1);
  assert_eq!(e.halls[0].hall_id, h1.hall_id);
  let h2 = s.get_hall(h2.hall_id).await.unwrap().unwrap();
  assert_eq!(h2.status, HallStatus::Available);
}

#[tokio::test]
async fn release_halls_reverts_both_sides() {
  let s = store().await;
  let creator = Uuid::new_v4();
  let h1 = s.insert_hall(hall("H101", 60), creator).await.unwrap();
  let e = s.insert_exam(exam("CS101", 50), creator).await.unwrap();
  s.allocate_halls(e.exam_id, vec![h1.hall_id], creator, Utc::now())
    .await
    .unwrap();

  let released = s.release_halls(e.exam_id).await.unwrap();
  assert_eq!(released.status, ExamStatus::HallsPending);
  assert!(released.halls.is_empty());

  let h1 = s.get_hall(h1.hall_id).await.unwrap().unwrap();
  assert_eq!(h1.status, HallStatus::Available);
  assert_eq!(h1.current_exam, None);
}

#[tokio::test]
async fn store_exam_assignments_persists_staff_ids() {
  let s = store().await;
  let creator = Uuid::new_v4();
  let h1 = s.insert_hall(hall("H101", 60), creator).await.unwrap();
  let e = s.insert_exam(exam("CS101", 50), creator).await.unwrap();
  let e = s
    .allocate_halls(e.exam_id, vec![h1.hall_id], creator, Utc::now())
    .await
    .unwrap();

  let staff = Uuid::new_v4();
  let halls: Vec<HallSlot> = e
    .halls
    .into_iter()
    .map(|mut slot| {
      slot.assignment = SlotAssignment::Assigned;
      slot.staff_id = Some(staff);
      slot
    })
    .collect();

  let assigner = Uuid::new_v4();
  let updated = s
    .store_exam_assignments(e.exam_id, halls, assigner, Utc::now())
    .await
    .unwrap();
  assert_eq!(updated.status, ExamStatus::StaffAssigned);
  assert_eq!(updated.assigned_by, Some(assigner));
  assert_eq!(updated.halls[0].staff_id, Some(staff));
  assert!(updated.halls[0].is_assigned());
}

// ─── Session bookings ────────────────────────────────────────────────────────

#[tokio::test]
async fn booking_key_unique_per_staff_and_session() {
  let s = store().await;
  let staff = Uuid::new_v4();
  let session = Session::new(day(10), TimeSlot::Forenoon);

  s.insert_booking(staff, session).await.unwrap();
  let err = s.insert_booking(staff, session).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(vigil_core::Error::AlreadyBooked { .. })
  ));

  // Same staff, other slot of the day is fine; and another staff member can
  // take the same session.
  s.insert_booking(staff, Session::new(day(10), TimeSlot::Afternoon))
    .await
    .unwrap();
  s.insert_booking(Uuid::new_v4(), session).await.unwrap();
}

#[tokio::test]
async fn concurrent_booking_inserts_exactly_one_row() {
  let s = store().await;
  let staff = Uuid::new_v4();
  let session = Session::new(day(10), TimeSlot::Forenoon);

  let (r1, r2) = tokio::join!(
    s.insert_booking(staff, session),
    s.insert_booking(staff, session),
  );
  let winners = [&r1, &r2].iter().filter(|r| r.is_ok()).count();
  assert_eq!(winners, 1);

  let all = s.list_bookings_for_session(session).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].staff_id, staff);
}

#[tokio::test]
async fn assign_booking_is_conditional_on_booked() {
  let s = store().await;
  let staff = Uuid::new_v4();
  let session = Session::new(day(10), TimeSlot::Forenoon);
  let booking = s.insert_booking(staff, session).await.unwrap();

  let exam_id = Uuid::new_v4();
  let hall_id = Uuid::new_v4();
  assert!(s.assign_booking(booking.booking_id, exam_id, hall_id).await.unwrap());

  // Second attempt loses the guard.
  assert!(
    !s.assign_booking(booking.booking_id, exam_id, Uuid::new_v4())
      .await
      .unwrap()
  );

  let fetched = s.get_booking(booking.booking_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, BookingStatus::Assigned);
  assert_eq!(fetched.assigned_exam_id, Some(exam_id));
  assert_eq!(fetched.assigned_hall_id, Some(hall_id));
}

#[tokio::test]
async fn delete_booking_refuses_assigned() {
  let s = store().await;
  let staff = Uuid::new_v4();
  let session = Session::new(day(10), TimeSlot::Forenoon);
  let booking = s.insert_booking(staff, session).await.unwrap();

  s.assign_booking(booking.booking_id, Uuid::new_v4(), Uuid::new_v4())
    .await
    .unwrap();
  assert!(!s.delete_booking(booking.booking_id).await.unwrap());
  assert!(s.get_booking(booking.booking_id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_booking_removes_booked() {
  let s = store().await;
  let staff = Uuid::new_v4();
  let session = Session::new(day(10), TimeSlot::Forenoon);
  let booking = s.insert_booking(staff, session).await.unwrap();

  assert!(s.delete_booking(booking.booking_id).await.unwrap());
  assert!(s.get_booking(booking.booking_id).await.unwrap().is_none());

  // The key is free again.
  s.insert_booking(staff, session).await.unwrap();
}

#[tokio::test]
async fn list_bookings_by_staff_ordered() {
  let s = store().await;
  let staff = Uuid::new_v4();
  s.insert_booking(staff, Session::new(day(12), TimeSlot::Forenoon))
    .await
    .unwrap();
  s.insert_booking(staff, Session::new(day(10), TimeSlot::Afternoon))
    .await
    .unwrap();
  s.insert_booking(Uuid::new_v4(), Session::new(day(10), TimeSlot::Forenoon))
    .await
    .unwrap();

  let mine = s.list_bookings_by_staff(staff).await.unwrap();
  assert_eq!(mine.len(), 2);
  assert_eq!(mine[0].date, day(10));
  assert_eq!(mine[1].date, day(12));
}

// ─── Staff preferences ───────────────────────────────────────────────────────

#[tokio::test]
async fn replace_preferences_is_wholesale() {
  let s = store().await;
  let staff = Uuid::new_v4();

  s.replace_preferences(staff, vec![
    SlotPreference { date: day(10), time_slot: TimeSlot::Forenoon },
    SlotPreference { date: day(11), time_slot: TimeSlot::Afternoon },
  ])
  .await
  .unwrap();

  s.replace_preferences(staff, vec![SlotPreference {
    date:      day(12),
    time_slot: TimeSlot::Forenoon,
  }])
  .await
  .unwrap();

  let prefs = s.preferences_for(staff).await.unwrap();
  assert_eq!(prefs.len(), 1);
  assert_eq!(prefs[0].date, day(12));
}

#[tokio::test]
async fn staff_preferring_matches_exact_session() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  s.replace_preferences(alice, vec![SlotPreference {
    date:      day(10),
    time_slot: TimeSlot::Forenoon,
  }])
  .await
  .unwrap();
  s.replace_preferences(bob, vec![SlotPreference {
    date:      day(10),
    time_slot: TimeSlot::Afternoon,
  }])
  .await
  .unwrap();

  let matched = s
    .staff_preferring(Session::new(day(10), TimeSlot::Forenoon))
    .await
    .unwrap();
  assert_eq!(matched, vec![alice]);

  let none = s
    .staff_preferring(Session::new(day(11), TimeSlot::Forenoon))
    .await
    .unwrap();
  assert!(none.is_empty());
}

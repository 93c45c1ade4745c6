//! [`SqliteStore`] — the SQLite implementation of [`DirectoryStore`].
//!
//! Multi-entity operations run in a single transaction and raise domain
//! guard errors (`HallUnavailable`, `CapacityInsufficient`, …) from inside
//! it, so a failed call rolls back completely. Guard errors travel out of
//! the `conn.call` closure as an inner `Result` and are re-wrapped as
//! [`Error::Core`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vigil_core::{
  booking::{BookingStatus, SessionBooking},
  exam::{Exam, ExamStatus, HallSlot, NewExam, SlotAssignment},
  hall::{Hall, HallStatus, NewHall},
  preference::SlotPreference,
  session::Session,
  store::DirectoryStore,
};

use crate::{
  Error, Result,
  encode::{
    RawBooking, RawExam, RawHall, RawPreference, decode_hall_slots,
    encode_booking_status, encode_day, encode_dt, encode_exam_status,
    encode_hall_slots, encode_hall_status, encode_slot, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

fn is_busy(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.code == rusqlite::ErrorCode::DatabaseBusy
        || f.code == rusqlite::ErrorCode::DatabaseLocked
  )
}

const SELECT_HALL: &str = "SELECT hall_id, hall_number, capacity, department, \
   status, current_exam, allocated_by, allocated_at, created_by, created_at \
   FROM halls";

const SELECT_EXAM: &str = "SELECT exam_id, title, course_code, department, \
   date, time_slot, total_students, status, halls_json, created_by, \
   created_at, assigned_by, assigned_at FROM exams";

const SELECT_BOOKING: &str = "SELECT booking_id, staff_id, date, time_slot, \
   status, assigned_exam_id, assigned_hall_id, booked_at \
   FROM session_bookings";

fn hall_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawHall> {
  Ok(RawHall {
    hall_id:      row.get(0)?,
    hall_number:  row.get(1)?,
    capacity:     row.get(2)?,
    department:   row.get(3)?,
    status:       row.get(4)?,
    current_exam: row.get(5)?,
    allocated_by: row.get(6)?,
    allocated_at: row.get(7)?,
    created_by:   row.get(8)?,
    created_at:   row.get(9)?,
  })
}

fn exam_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawExam> {
  Ok(RawExam {
    exam_id:        row.get(0)?,
    title:          row.get(1)?,
    course_code:    row.get(2)?,
    department:     row.get(3)?,
    date:           row.get(4)?,
    time_slot:      row.get(5)?,
    total_students: row.get(6)?,
    status:         row.get(7)?,
    halls_json:     row.get(8)?,
    created_by:     row.get(9)?,
    created_at:     row.get(10)?,
    assigned_by:    row.get(11)?,
    assigned_at:    row.get(12)?,
  })
}

fn booking_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawBooking> {
  Ok(RawBooking {
    booking_id:       row.get(0)?,
    staff_id:         row.get(1)?,
    date:             row.get(2)?,
    time_slot:        row.get(3)?,
    status:           row.get(4)?,
    assigned_exam_id: row.get(5)?,
    assigned_hall_id: row.get(6)?,
    booked_at:        row.get(7)?,
  })
}

/// Fetch one exam row inside an open connection/transaction.
fn select_exam_raw(
  conn: &rusqlite::Connection,
  exam_id: &str,
) -> rusqlite::Result<Option<RawExam>> {
  conn
    .query_row(
      &format!("{SELECT_EXAM} WHERE exam_id = ?1"),
      rusqlite::params![exam_id],
      exam_from_row,
    )
    .optional()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vigil directory store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` against the connection, retrying once if the database reports
  /// busy/locked. A second failure is surfaced as a store error.
  async fn call<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: Fn(&mut rusqlite::Connection) -> tokio_rusqlite::Result<T>
      + Clone
      + Send
      + 'static,
  {
    match self.conn.call(f.clone()).await {
      Err(e) if is_busy(&e) => Ok(self.conn.call(f).await?),
      other => Ok(other?),
    }
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = Error;

  // ── Halls ─────────────────────────────────────────────────────────────

  async fn insert_hall(&self, input: NewHall, created_by: Uuid) -> Result<Hall> {
    let hall = Hall {
      hall_id: Uuid::new_v4(),
      hall_number: input.hall_number,
      capacity: input.capacity,
      department: input.department,
      status: HallStatus::Available,
      current_exam: None,
      allocated_by: None,
      allocated_at: None,
      created_by,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(hall.hall_id);
    let number = hall.hall_number.clone();
    let capacity = hall.capacity as i64;
    let department = hall.department.clone();
    let status = encode_hall_status(hall.status).to_owned();
    let by_str = encode_uuid(created_by);
    let at_str = encode_dt(hall.created_at);

    let inserted: std::result::Result<(), vigil_core::Error> = self
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO halls (hall_id, hall_number, capacity, department, \
             status, created_by, created_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, number, capacity, department, status, by_str, at_str,
          ],
        );
        match res {
          Ok(_) => Ok(Ok(())),
          Err(e) if is_unique_violation(&e) => {
            Ok(Err(vigil_core::Error::DuplicateHallNumber {
              hall_number: number.clone(),
            }))
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    inserted.map_err(Error::Core)?;
    Ok(hall)
  }

  async fn get_hall(&self, id: Uuid) -> Result<Option<Hall>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawHall> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SELECT_HALL} WHERE hall_id = ?1"),
              rusqlite::params![id_str],
              hall_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawHall::into_hall).transpose()
  }

  async fn list_halls(&self, department: Option<String>) -> Result<Vec<Hall>> {
    let raws: Vec<RawHall> = self
      .call(move |conn| {
        let rows = if let Some(dept) = &department {
          let mut stmt = conn.prepare(&format!(
            "{SELECT_HALL} WHERE department = ?1 ORDER BY hall_number"
          ))?;
          stmt
            .query_map(rusqlite::params![dept], hall_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("{SELECT_HALL} ORDER BY hall_number"))?;
          stmt
            .query_map([], hall_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHall::into_hall).collect()
  }

  // ── Exams ─────────────────────────────────────────────────────────────

  async fn insert_exam(&self, input: NewExam, created_by: Uuid) -> Result<Exam> {
    let exam = Exam {
      exam_id: Uuid::new_v4(),
      title: input.title,
      course_code: input.course_code,
      department: input.department,
      date: input.date,
      time_slot: input.time_slot,
      total_students: input.total_students,
      status: ExamStatus::Draft,
      halls: Vec::new(),
      created_by,
      created_at: Utc::now(),
      assigned_by: None,
      assigned_at: None,
    };

    let id_str = encode_uuid(exam.exam_id);
    let title = exam.title.clone();
    let course_code = exam.course_code.clone();
    let department = exam.department.clone();
    let date_str = encode_day(exam.date);
    let slot_str = encode_slot(exam.time_slot).to_owned();
    let students = exam.total_students as i64;
    let status_str = encode_exam_status(exam.status).to_owned();
    let by_str = encode_uuid(created_by);
    let at_str = encode_dt(exam.created_at);
    let slot = exam.time_slot;

    let inserted: std::result::Result<(), vigil_core::Error> = self
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO exams (exam_id, title, course_code, department, date, \
             time_slot, total_students, status, halls_json, created_by, \
             created_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, '[]', ?9, ?10)",
          rusqlite::params![
            id_str, title, course_code, department, date_str, slot_str,
            students, status_str, by_str, at_str,
          ],
        );
        match res {
          Ok(_) => Ok(Ok(())),
          Err(e) if is_unique_violation(&e) => {
            Ok(Err(vigil_core::Error::DuplicateExamKey {
              department:  department.clone(),
              course_code: course_code.clone(),
              slot,
            }))
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    inserted.map_err(Error::Core)?;
    Ok(exam)
  }

  async fn get_exam(&self, id: Uuid) -> Result<Option<Exam>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawExam> = self
      .call(move |conn| Ok(select_exam_raw(conn, &id_str)?))
      .await?;

    raw.map(RawExam::into_exam).transpose()
  }

  async fn list_exams(&self) -> Result<Vec<Exam>> {
    let raws: Vec<RawExam> = self
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("{SELECT_EXAM} ORDER BY date, time_slot"))?;
        let rows = stmt
          .query_map([], exam_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExam::into_exam).collect()
  }

  async fn list_exams_for_session(&self, session: Session) -> Result<Vec<Exam>> {
    let date_str = encode_day(session.date);
    let slot_str = encode_slot(session.slot).to_owned();

    let raws: Vec<RawExam> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SELECT_EXAM} WHERE date = ?1 AND time_slot = ?2 \
           ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![date_str, slot_str], exam_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawExam::into_exam).collect()
  }

  async fn update_exam_status(&self, id: Uuid, status: ExamStatus) -> Result<()> {
    let id_str = encode_uuid(id);
    let status_str = encode_exam_status(status).to_owned();

    let updated: std::result::Result<(), vigil_core::Error> = self
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE exams SET status = ?1 WHERE exam_id = ?2",
          rusqlite::params![status_str, id_str],
        )?;
        if changed == 0 {
          return Ok(Err(vigil_core::Error::ExamNotFound(id)));
        }
        Ok(Ok(()))
      })
      .await?;

    updated.map_err(Error::Core)
  }

  // ── Hall allocation ───────────────────────────────────────────────────

  async fn allocate_halls(
    &self,
    exam_id: Uuid,
    hall_ids: Vec<Uuid>,
    allocated_by: Uuid,
    at: DateTime<Utc>,
  ) -> Result<Exam> {
    let exam_id_str = encode_uuid(exam_id);
    let by_str = encode_uuid(allocated_by);
    let at_str = encode_dt(at);
    let id_strs: Vec<String> =
      hall_ids.iter().copied().map(encode_uuid).collect();

    let out: std::result::Result<RawExam, vigil_core::Error> = self
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(exam_raw) = select_exam_raw(&tx, &exam_id_str)? else {
          return Ok(Err(vigil_core::Error::ExamNotFound(exam_id)));
        };
        let total_students: i64 = exam_raw.total_students;

        // A standing snapshot means halls still point at this exam; writing
        // a new one over it would strand them. Release comes first.
        match decode_hall_slots(&exam_raw.halls_json) {
          Ok(standing) if !standing.is_empty() => {
            return Ok(Err(vigil_core::Error::HallsAlreadyAllocated(exam_id)));
          }
          Ok(_) => {}
          Err(e) => return Ok(Err(e.into())),
        }

        // Flip each hall available -> allocated with a conditional update.
        // Any hall that lost the race (or vanished) aborts the whole
        // transaction; the rollback on drop restores every hall.
        let mut slots: Vec<HallSlot> = Vec::with_capacity(id_strs.len());
        for (hall_id, id_str) in hall_ids.iter().zip(&id_strs) {
          let row: Option<(String, i64)> = tx
            .query_row(
              "SELECT hall_number, capacity FROM halls WHERE hall_id = ?1",
              rusqlite::params![id_str],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
          let Some((hall_number, capacity)) = row else {
            return Ok(Err(vigil_core::Error::HallNotFound(*hall_id)));
          };

          let changed = tx.execute(
            "UPDATE halls SET status = 'allocated', current_exam = ?1, \
               allocated_by = ?2, allocated_at = ?3 \
             WHERE hall_id = ?4 AND status = 'available'",
            rusqlite::params![exam_id_str, by_str, at_str, id_str],
          )?;
          if changed == 0 {
            return Ok(Err(vigil_core::Error::HallUnavailable { hall_number }));
          }

          slots.push(HallSlot {
            hall_id: *hall_id,
            hall_number,
            capacity: capacity as u32,
            assignment: SlotAssignment::Unassigned,
            staff_id: None,
          });
        }

        let available: i64 = slots.iter().map(|s| s.capacity as i64).sum();
        if available < total_students {
          return Ok(Err(vigil_core::Error::CapacityInsufficient {
            required:  total_students as u32,
            available: available as u32,
          }));
        }

        let halls_json = match encode_hall_slots(&slots) {
          Ok(json) => json,
          Err(e) => return Ok(Err(e.into())),
        };
        tx.execute(
          "UPDATE exams SET halls_json = ?1, status = 'halls_allocated' \
           WHERE exam_id = ?2",
          rusqlite::params![halls_json, exam_id_str],
        )?;

        let Some(raw) = select_exam_raw(&tx, &exam_id_str)? else {
          return Ok(Err(vigil_core::Error::ExamNotFound(exam_id)));
        };
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    out.map_err(Error::Core)?.into_exam()
  }

  async fn release_halls(&self, exam_id: Uuid) -> Result<Exam> {
    let exam_id_str = encode_uuid(exam_id);

    let out: std::result::Result<RawExam, vigil_core::Error> = self
      .call(move |conn| {
        let tx = conn.transaction()?;

        if select_exam_raw(&tx, &exam_id_str)?.is_none() {
          return Ok(Err(vigil_core::Error::ExamNotFound(exam_id)));
        }

        tx.execute(
          "UPDATE halls SET status = 'available', current_exam = NULL, \
             allocated_by = NULL, allocated_at = NULL \
           WHERE current_exam = ?1",
          rusqlite::params![exam_id_str],
        )?;
        tx.execute(
          "UPDATE exams SET halls_json = '[]', status = 'halls_pending', \
             assigned_by = NULL, assigned_at = NULL \
           WHERE exam_id = ?1",
          rusqlite::params![exam_id_str],
        )?;

        let Some(raw) = select_exam_raw(&tx, &exam_id_str)? else {
          return Ok(Err(vigil_core::Error::ExamNotFound(exam_id)));
        };
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    out.map_err(Error::Core)?.into_exam()
  }

  async fn store_exam_assignments(
    &self,
    exam_id: Uuid,
    halls: Vec<HallSlot>,
    assigned_by: Uuid,
    at: DateTime<Utc>,
  ) -> Result<Exam> {
    let exam_id_str = encode_uuid(exam_id);
    let halls_json = encode_hall_slots(&halls)?;
    let by_str = encode_uuid(assigned_by);
    let at_str = encode_dt(at);

    let out: std::result::Result<RawExam, vigil_core::Error> = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE exams SET halls_json = ?1, status = 'staff_assigned', \
             assigned_by = ?2, assigned_at = ?3 \
           WHERE exam_id = ?4",
          rusqlite::params![halls_json, by_str, at_str, exam_id_str],
        )?;
        if changed == 0 {
          return Ok(Err(vigil_core::Error::ExamNotFound(exam_id)));
        }
        let Some(raw) = select_exam_raw(&tx, &exam_id_str)? else {
          return Ok(Err(vigil_core::Error::ExamNotFound(exam_id)));
        };
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    out.map_err(Error::Core)?.into_exam()
  }

  // ── Session bookings ──────────────────────────────────────────────────

  async fn insert_booking(
    &self,
    staff_id: Uuid,
    session: Session,
  ) -> Result<SessionBooking> {
    let booking = SessionBooking {
      booking_id: Uuid::new_v4(),
      staff_id,
      date: session.date,
      time_slot: session.slot,
      status: BookingStatus::Booked,
      assigned_exam_id: None,
      assigned_hall_id: None,
      booked_at: Utc::now(),
    };

    let id_str = encode_uuid(booking.booking_id);
    let staff_str = encode_uuid(staff_id);
    let date_str = encode_day(session.date);
    let slot_str = encode_slot(session.slot).to_owned();
    let status_str = encode_booking_status(booking.status).to_owned();
    let at_str = encode_dt(booking.booked_at);

    let inserted: std::result::Result<(), vigil_core::Error> = self
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO session_bookings (booking_id, staff_id, date, \
             time_slot, status, booked_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str, staff_str, date_str, slot_str, status_str, at_str,
          ],
        );
        match res {
          Ok(_) => Ok(Ok(())),
          Err(e) if is_unique_violation(&e) => {
            Ok(Err(vigil_core::Error::AlreadyBooked {
              date: session.date,
              slot: session.slot,
            }))
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    inserted.map_err(Error::Core)?;
    Ok(booking)
  }

  async fn get_booking(&self, id: Uuid) -> Result<Option<SessionBooking>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawBooking> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{SELECT_BOOKING} WHERE booking_id = ?1"),
              rusqlite::params![id_str],
              booking_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBooking::into_booking).transpose()
  }

  async fn list_bookings_by_staff(
    &self,
    staff_id: Uuid,
  ) -> Result<Vec<SessionBooking>> {
    let staff_str = encode_uuid(staff_id);

    let raws: Vec<RawBooking> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SELECT_BOOKING} WHERE staff_id = ?1 ORDER BY date, time_slot"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![staff_str], booking_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBooking::into_booking).collect()
  }

  async fn list_bookings_for_session(
    &self,
    session: Session,
  ) -> Result<Vec<SessionBooking>> {
    let date_str = encode_day(session.date);
    let slot_str = encode_slot(session.slot).to_owned();

    let raws: Vec<RawBooking> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SELECT_BOOKING} WHERE date = ?1 AND time_slot = ?2 \
           ORDER BY booked_at, booking_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![date_str, slot_str], booking_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBooking::into_booking).collect()
  }

  async fn list_bookings(&self) -> Result<Vec<SessionBooking>> {
    let raws: Vec<RawBooking> = self
      .call(move |conn| {
        let mut stmt = conn
          .prepare(&format!("{SELECT_BOOKING} ORDER BY date, time_slot"))?;
        let rows = stmt
          .query_map([], booking_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBooking::into_booking).collect()
  }

  async fn assign_booking(
    &self,
    booking_id: Uuid,
    exam_id: Uuid,
    hall_id: Uuid,
  ) -> Result<bool> {
    let booking_str = encode_uuid(booking_id);
    let exam_str = encode_uuid(exam_id);
    let hall_str = encode_uuid(hall_id);

    // Monotonic booked -> assigned; a booking assigned by a concurrent run
    // simply fails the guard and reports false.
    let changed: usize = self
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE session_bookings \
           SET status = 'assigned', assigned_exam_id = ?1, \
               assigned_hall_id = ?2 \
           WHERE booking_id = ?3 AND status = 'booked' \
             AND assigned_hall_id IS NULL",
          rusqlite::params![exam_str, hall_str, booking_str],
        )?)
      })
      .await?;

    Ok(changed == 1)
  }

  async fn delete_booking(&self, booking_id: Uuid) -> Result<bool> {
    let booking_str = encode_uuid(booking_id);

    let changed: usize = self
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM session_bookings \
           WHERE booking_id = ?1 AND status = 'booked'",
          rusqlite::params![booking_str],
        )?)
      })
      .await?;

    Ok(changed == 1)
  }

  // ── Staff preferences ─────────────────────────────────────────────────

  async fn replace_preferences(
    &self,
    staff_id: Uuid,
    prefs: Vec<SlotPreference>,
  ) -> Result<()> {
    let staff_str = encode_uuid(staff_id);
    let rows: Vec<(String, String)> = prefs
      .iter()
      .map(|p| (encode_day(p.date), encode_slot(p.time_slot).to_owned()))
      .collect();

    self
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM staff_preferences WHERE staff_id = ?1",
          rusqlite::params![staff_str],
        )?;
        for (date_str, slot_str) in &rows {
          tx.execute(
            "INSERT INTO staff_preferences (staff_id, date, time_slot) \
             VALUES (?1, ?2, ?3)",
            rusqlite::params![staff_str, date_str, slot_str],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn preferences_for(&self, staff_id: Uuid) -> Result<Vec<SlotPreference>> {
    let staff_str = encode_uuid(staff_id);

    let raws: Vec<RawPreference> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT date, time_slot FROM staff_preferences \
           WHERE staff_id = ?1 ORDER BY date",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![staff_str], |row| {
            Ok(RawPreference { date: row.get(0)?, time_slot: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPreference::into_preference).collect()
  }

  async fn staff_preferring(&self, session: Session) -> Result<Vec<Uuid>> {
    let date_str = encode_day(session.date);
    let slot_str = encode_slot(session.slot).to_owned();

    let ids: Vec<String> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT staff_id FROM staff_preferences \
           WHERE date = ?1 AND time_slot = ?2 ORDER BY staff_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![date_str, slot_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    ids
      .iter()
      .map(|s| crate::encode::decode_uuid(s))
      .collect()
  }
}

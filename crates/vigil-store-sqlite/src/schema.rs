//! SQL schema for the Vigil SQLite store.
//!
//! Executed once at connection startup. The unique indexes carry the
//! concurrency-critical invariants: the booking key, the exam key and the
//! per-staff preference dates are all rejected at insert time, so the loser
//! of two simultaneous writes gets a constraint violation rather than a
//! duplicate row.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS halls (
    hall_id      TEXT PRIMARY KEY,
    hall_number  TEXT NOT NULL UNIQUE,
    capacity     INTEGER NOT NULL CHECK (capacity >= 1),
    department   TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'available',  -- 'available' | 'allocated' | 'maintenance'
    current_exam TEXT,
    allocated_by TEXT,
    allocated_at TEXT,
    created_by   TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    -- status and exam reference move together
    CHECK (NOT (status = 'available' AND current_exam IS NOT NULL)),
    CHECK (NOT (status = 'allocated' AND current_exam IS NULL))
);

CREATE TABLE IF NOT EXISTS exams (
    exam_id        TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    course_code    TEXT NOT NULL,
    department     TEXT NOT NULL,
    date           TEXT NOT NULL,                    -- ISO 8601 calendar day
    time_slot      TEXT NOT NULL CHECK (time_slot IN ('FN','AN')),
    total_students INTEGER NOT NULL,
    status         TEXT NOT NULL DEFAULT 'draft',
    halls_json     TEXT NOT NULL DEFAULT '[]',       -- allocation-time snapshot list
    created_by     TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    assigned_by    TEXT,
    assigned_at    TEXT,
    UNIQUE (department, course_code, time_slot)
);

CREATE TABLE IF NOT EXISTS session_bookings (
    booking_id       TEXT PRIMARY KEY,
    staff_id         TEXT NOT NULL,
    date             TEXT NOT NULL,
    time_slot        TEXT NOT NULL CHECK (time_slot IN ('FN','AN')),
    status           TEXT NOT NULL DEFAULT 'booked', -- 'booked' | 'assigned' | 'completed'
    assigned_exam_id TEXT,
    assigned_hall_id TEXT,
    booked_at        TEXT NOT NULL,
    UNIQUE (staff_id, date, time_slot)
);

CREATE TABLE IF NOT EXISTS staff_preferences (
    staff_id  TEXT NOT NULL,
    date      TEXT NOT NULL,
    time_slot TEXT NOT NULL CHECK (time_slot IN ('FN','AN')),
    UNIQUE (staff_id, date)
);

CREATE INDEX IF NOT EXISTS halls_department_idx    ON halls(department);
CREATE INDEX IF NOT EXISTS halls_exam_idx          ON halls(current_exam);
CREATE INDEX IF NOT EXISTS exams_session_idx       ON exams(date, time_slot);
CREATE INDEX IF NOT EXISTS bookings_session_idx    ON session_bookings(date, time_slot);
CREATE INDEX IF NOT EXISTS bookings_staff_idx      ON session_bookings(staff_id);
CREATE INDEX IF NOT EXISTS preferences_session_idx ON staff_preferences(date, time_slot);

PRAGMA user_version = 1;
";

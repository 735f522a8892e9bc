//! Diesel schema for activity log persistence.

diesel::table! {
    /// Append-only activity entries. `task_id` is not a foreign key so that
    /// entries survive task deletion.
    activity_log (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Referenced task identifier.
        task_id -> Uuid,
        /// Action display name.
        #[max_length = 50]
        action -> Varchar,
        /// Prior status for status changes.
        #[max_length = 50]
        old_status -> Nullable<Varchar>,
        /// New status for status changes.
        #[max_length = 50]
        new_status -> Nullable<Varchar>,
        /// Task snapshot before the mutation.
        old_value -> Nullable<Jsonb>,
        /// Task snapshot after the mutation.
        new_value -> Nullable<Jsonb>,
        /// Write timestamp.
        recorded_at -> Timestamptz,
        /// Append sequence used to order same-instant rows.
        seq -> Int8,
    }
}

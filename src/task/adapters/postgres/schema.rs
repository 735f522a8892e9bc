//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Task category display name.
        #[max_length = 50]
        category -> Varchar,
        /// Task priority display name.
        #[max_length = 50]
        priority -> Varchar,
        /// Due date.
        due_date -> Date,
        /// Task status display name.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Insertion sequence used to order same-instant rows.
        seq -> Int8,
    }
}

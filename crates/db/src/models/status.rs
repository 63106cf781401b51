//! Status helper enum mapping to the `post_statuses` SMALLSERIAL lookup table.
//!
//! The variant discriminants match the seed data order (1-based).

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Post lifecycle status.
    PostStatus {
        Draft = 1,
        PendingReview = 2,
        Approved = 3,
        Scheduled = 4,
        Posted = 5,
        Failed = 6,
    }
}

impl PostStatus {
    /// Parse the seed-data name back into a status, for query-string use.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "draft" => Some(PostStatus::Draft),
            "pending_review" => Some(PostStatus::PendingReview),
            "approved" => Some(PostStatus::Approved),
            "scheduled" => Some(PostStatus::Scheduled),
            "posted" => Some(PostStatus::Posted),
            "failed" => Some(PostStatus::Failed),
            _ => None,
        }
    }
}

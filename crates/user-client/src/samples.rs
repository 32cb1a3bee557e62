//! Literal requests sent by the demonstration calls.

use crate::pb::User;

/// The single user sent by the unary and server-streaming calls.
pub fn sample_user() -> User {
    User {
        id: "0".to_string(),
        name: "Leonardo".to_string(),
        email: "leo@leo".to_string(),
    }
}

/// `leo1` through `leo5`, in send order.
pub fn sample_users() -> Vec<User> {
    (1..=5)
        .map(|n| User {
            id: format!("leo{n}"),
            name: format!("Leonardo {n}"),
            email: format!("leo{n}@leo.com"),
        })
        .collect()
}

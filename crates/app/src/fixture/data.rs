//! Pinned reqres data set.

use serde_json::{Value, json};

/// Users per page when the client does not ask for another size.
pub const DEFAULT_PER_PAGE: usize = 6;

/// Token handed out on successful register and login.
pub const TOKEN: &str = "QpwL5tke4Pnpja7X4";

/// A user known to the backend.
#[derive(Debug, Clone, Copy)]
pub struct User {
    pub id: u64,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
}

impl User {
    pub fn to_json(self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "avatar": format!("https://reqres.in/img/faces/{}-image.jpg", self.id),
        })
    }
}

const fn user(id: u64, email: &'static str, first_name: &'static str, last_name: &'static str) -> User {
    User {
        id,
        email,
        first_name,
        last_name,
    }
}

pub const USERS: [User; 12] = [
    user(1, "george.bluth@reqres.in", "George", "Bluth"),
    user(2, "janet.weaver@reqres.in", "Janet", "Weaver"),
    user(3, "emma.wong@reqres.in", "Emma", "Wong"),
    user(4, "eve.holt@reqres.in", "Eve", "Holt"),
    user(5, "charles.morris@reqres.in", "Charles", "Morris"),
    user(6, "tracey.ramos@reqres.in", "Tracey", "Ramos"),
    user(7, "michael.lawson@reqres.in", "Michael", "Lawson"),
    user(8, "lindsay.ferguson@reqres.in", "Lindsay", "Ferguson"),
    user(9, "tobias.funke@reqres.in", "Tobias", "Funke"),
    user(10, "byron.fields@reqres.in", "Byron", "Fields"),
    user(11, "george.edwards@reqres.in", "George", "Edwards"),
    user(12, "rachel.howell@reqres.in", "Rachel", "Howell"),
];

pub fn find_user(id: u64) -> Option<User> {
    USERS.iter().copied().find(|u| u.id == id)
}

pub fn find_by_email(email: &str) -> Option<User> {
    USERS.iter().copied().find(|u| u.email == email)
}

pub fn support() -> Value {
    json!({
        "url": "https://contentcaddy.io?utm_source=reqres&utm_medium=json&utm_campaign=referral",
        "text": "Tired of writing endless social media content? Let Content Caddy generate it for you.",
    })
}

/// One page of the user list, numbered from 1.
pub fn page(page: usize, per_page: usize) -> Value {
    let per_page = per_page.max(1);
    let total = USERS.len();
    let data: Vec<Value> = USERS
        .iter()
        .skip(page.saturating_sub(1).saturating_mul(per_page))
        .take(if page == 0 { 0 } else { per_page })
        .map(|u| u.to_json())
        .collect();

    json!({
        "page": page,
        "per_page": per_page,
        "total": total,
        "total_pages": total.div_ceil(per_page),
        "data": data,
        "support": support(),
    })
}

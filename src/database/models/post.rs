use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "posts";

/// Body of POST /posts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    #[serde(default, rename = "userid")]
    pub user_id: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default, rename = "url")]
    pub image_url: String,
}

/// Stored post document. `user_id` is the owner's id as a raw string and is not checked.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub user_id: String,
    pub caption: String,
    pub image_url: String,
    #[serde(rename = "postedat")]
    pub posted_at: bson::DateTime,
}

impl Post {
    pub const USER_ID_FIELD: &'static str = "user_id";
    pub const POSTED_AT_FIELD: &'static str = "postedat";

    pub fn new<Tz: TimeZone>(new_post: NewPost, posted_at: DateTime<Tz>) -> Self {
        Self {
            user_id: new_post.user_id,
            caption: new_post.caption,
            image_url: new_post.image_url,
            posted_at: bson::DateTime::from_chrono(posted_at),
        }
    }
}

pub mod friend;
pub mod user;

pub use friend::{Friend, FriendEdge};
pub use user::{NewUser, Sex, User, UserField};

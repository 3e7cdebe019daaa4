use serde::Deserialize;

use crate::database::FriendEdge;

#[derive(Debug, Deserialize)]
pub struct AddFriendRequest {
    pub uid: i64,
    pub fid: i64,
}

impl From<AddFriendRequest> for FriendEdge {
    fn from(req: AddFriendRequest) -> Self {
        FriendEdge::pair(req.uid, req.fid)
    }
}

#[derive(Debug, Deserialize)]
pub struct FriendsQuery {
    pub uid: i64,
}
